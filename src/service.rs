use chrono::{Duration, Local, NaiveDate};
use std::time::{Duration as StdDuration, Instant};
use tracing::{info, instrument, warn};

use crate::app::ports::FallbackPolicy;
use crate::config::Config;
use crate::error::{PriceIndexError, Result};
use crate::fetcher::BulletinFetcher;
use crate::infra::http_client::ReqwestHttp;
use crate::infra::pdf_decoder::PdfTextDecoder;
use crate::metrics::PriceMetrics;
use crate::parser::{parse_with_rules, HeaderRules};
use crate::types::{filter_empty, Catalog};

/// Bulletins are published once a day with at most a day of lag: try the
/// requested date, then the day before, nothing further.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviousDay;

impl FallbackPolicy for PreviousDay {
    fn candidates(&self, requested: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = vec![requested];
        if let Some(prev) = requested.checked_sub_signed(Duration::days(1)) {
            dates.push(prev);
        }
        dates
    }
}

/// Fetch, parse and filter in one call. Holds no per-request state.
pub struct PriceService {
    fetcher: BulletinFetcher,
    fallback: Box<dyn FallbackPolicy>,
    rules: HeaderRules,
}

impl PriceService {
    pub fn new(fetcher: BulletinFetcher, fallback: Box<dyn FallbackPolicy>, rules: HeaderRules) -> Self {
        Self { fetcher, fallback, rules }
    }

    /// Production wiring: reqwest transport with the configured timeout and
    /// the `pdf-extract` decoder.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = ReqwestHttp::new(StdDuration::from_secs(config.source.timeout_seconds))
            .map_err(|e| PriceIndexError::Config(format!("Failed to build HTTP client: {e}")))?;
        let fetcher = BulletinFetcher::new(
            config.source.base_url.clone(),
            Box::new(http),
            Box::new(PdfTextDecoder),
        );
        Ok(Self::new(fetcher, Box::new(PreviousDay), config.rules.clone()))
    }

    pub fn fetcher(&self) -> &BulletinFetcher {
        &self.fetcher
    }

    /// Today's prices by the local clock.
    pub async fn get_prices(&self) -> Result<Catalog> {
        self.get_prices_for(Local::now().date_naive()).await
    }

    #[instrument(skip(self))]
    pub async fn get_prices_for(&self, date: NaiveDate) -> Result<Catalog> {
        let (published, text) = self.fetch_with_fallback(date).await?;
        let catalog = filter_empty(parse_with_rules(&text, &self.rules));
        let prices = catalog.iter().map(|c| c.items.len()).sum::<usize>();
        PriceMetrics::record_catalog(catalog.len(), prices);
        info!(
            "Bulletin for {} yielded {} commodities with {} prices",
            published,
            catalog.len(),
            prices
        );
        Ok(catalog)
    }

    /// Candidates are tried one after another and each at most once.
    async fn fetch_with_fallback(&self, date: NaiveDate) -> Result<(NaiveDate, String)> {
        let mut attempts = Vec::new();
        for candidate in self.fallback.candidates(date) {
            let started = Instant::now();
            let result = self.fetcher.fetch_bulletin_text(candidate).await;
            let elapsed = started.elapsed().as_secs_f64();
            match result {
                Ok(text) => {
                    PriceMetrics::record_fetch_attempt("success", elapsed);
                    if candidate != date {
                        PriceMetrics::record_fallback_used();
                    }
                    return Ok((candidate, text));
                }
                Err(e) => {
                    PriceMetrics::record_fetch_attempt(e.kind(), elapsed);
                    warn!("No bulletin for {}: {}", candidate, e);
                    attempts.push((candidate, e));
                }
            }
        }
        PriceMetrics::record_unavailable();
        Err(PriceIndexError::Unavailable { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::{DocumentDecoderPort, HttpClientPort, HttpGetResult};
    use crate::error::FetchError;
    use crate::fetcher::bulletin_url;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    const BASE: &str = "http://bulletins.test";

    /// Serves fixed bodies per URL and records every request.
    struct MockHttp {
        bodies: HashMap<String, &'static str>,
        requests: Arc<tokio::sync::Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl HttpClientPort for MockHttp {
        async fn get(&self, url: &str) -> std::result::Result<HttpGetResult, String> {
            self.requests.lock().await.push(url.to_string());
            let (status, body) = match self.bodies.get(url) {
                Some(body) => (200, body.as_bytes().to_vec()),
                None => (404, Vec::new()),
            };
            Ok(HttpGetResult {
                status,
                content_length: body.len() as u64,
                bytes: body,
                content_type: "application/pdf".to_string(),
            })
        }
    }

    struct Utf8Decoder;

    impl DocumentDecoderPort for Utf8Decoder {
        fn decode(&self, bytes: &[u8]) -> std::result::Result<String, String> {
            String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(published: &[(NaiveDate, &'static str)]) -> (PriceService, Arc<tokio::sync::Mutex<Vec<String>>>) {
        let requests = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let bodies = published
            .iter()
            .map(|(d, body)| (bulletin_url(BASE, *d), *body))
            .collect();
        let http = MockHttp { bodies, requests: requests.clone() };
        let fetcher = BulletinFetcher::new(BASE, Box::new(http), Box::new(Utf8Decoder));
        (
            PriceService::new(fetcher, Box::new(PreviousDay), HeaderRules::default()),
            requests,
        )
    }

    #[test]
    fn test_previous_day_candidates() {
        assert_eq!(
            PreviousDay.candidates(date(2025, 3, 1)),
            vec![date(2025, 3, 1), date(2025, 2, 28)]
        );
        assert_eq!(
            PreviousDay.candidates(date(2025, 1, 1)),
            vec![date(2025, 1, 1), date(2024, 12, 31)]
        );
    }

    #[tokio::test]
    async fn test_today_available_uses_single_request() {
        let today = date(2025, 10, 6);
        let (svc, requests) = service(&[(today, "CHICKEN EGGS\nSmall 6.50\nFISH\n")]);

        let catalog = svc.get_prices_for(today).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "CHICKEN EGGS");
        assert_eq!(*requests.lock().await, vec![bulletin_url(BASE, today)]);
    }

    #[tokio::test]
    async fn test_falls_back_to_yesterday_exactly_once() {
        let today = date(2025, 10, 6);
        let yesterday = date(2025, 10, 5);
        let (svc, requests) = service(&[(yesterday, "PORK\nKasim 320.00\n")]);

        let catalog = svc.get_prices_for(today).await.unwrap();
        assert_eq!(catalog[0].items[0].price, Some(320.0));
        assert_eq!(
            *requests.lock().await,
            vec![bulletin_url(BASE, today), bulletin_url(BASE, yesterday)]
        );
    }

    #[test]
    fn test_fallback_and_catalog_sizes_are_counted() {
        let today = date(2025, 10, 6);
        let (svc, _) = service(&[(date(2025, 10, 5), "PORK\nKasim 320.00\nLiempo n/a\n")]);
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        // Local recorders are per thread, so drive the future on this one
        ::metrics::with_local_recorder(&recorder, || {
            let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            rt.block_on(svc.get_prices_for(today)).unwrap();
        });

        let text = handle.render();
        assert!(text.contains(r#"price_index_fetch_attempts_total{outcome="status"} 1"#));
        assert!(text.contains(r#"price_index_fetch_attempts_total{outcome="success"} 1"#));
        assert!(text.contains("price_index_fallback_used_total 1"));
        assert!(text.contains("price_index_prices_parsed_count 1"));
    }

    #[tokio::test]
    async fn test_fails_after_yesterday_without_going_further_back() {
        let today = date(2025, 10, 6);
        let (svc, requests) = service(&[(date(2025, 10, 4), "PORK\nKasim 320.00\n")]);

        let err = svc.get_prices_for(today).await.unwrap_err();
        match err {
            PriceIndexError::Unavailable { attempts } => {
                let dates: Vec<_> = attempts.iter().map(|(d, _)| *d).collect();
                assert_eq!(dates, vec![today, date(2025, 10, 5)]);
                assert!(attempts
                    .iter()
                    .all(|(_, e)| matches!(e, FetchError::Status { status: 404, .. })));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(requests.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_bulletin_is_empty_catalog_not_error() {
        let today = date(2025, 10, 6);
        let (svc, _) = service(&[(today, "DAILY PRICE INDEX\nPage 1 of 3\n")]);
        assert!(svc.get_prices_for(today).await.unwrap().is_empty());
    }
}
