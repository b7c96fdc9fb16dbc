use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::app::ports::{DocumentDecoderPort, HttpClientPort};
use crate::constants::{BULLETIN_FILE_PREFIX, UPLOADS_PATH};
use crate::error::FetchError;

/// Where the bulletin for `date` is published.
///
/// The month directory is zero-padded, the day in the filename is not:
/// `<base>/wp-content/uploads/2025/10/Daily-Price-Index-October-6-2025.pdf`.
pub fn bulletin_url(base_url: &str, date: NaiveDate) -> String {
    format!(
        "{}/{}/{}/{}-{}.pdf",
        base_url.trim_end_matches('/'),
        UPLOADS_PATH,
        date.format("%Y/%m"),
        BULLETIN_FILE_PREFIX,
        date.format("%B-%-d-%Y"),
    )
}

/// Downloads one day's bulletin and flattens it to text.
pub struct BulletinFetcher {
    base_url: String,
    http: Box<dyn HttpClientPort>,
    decoder: Box<dyn DocumentDecoderPort>,
}

impl BulletinFetcher {
    pub fn new(base_url: impl Into<String>, http: Box<dyn HttpClientPort>, decoder: Box<dyn DocumentDecoderPort>) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            decoder,
        }
    }

    pub fn url_for(&self, date: NaiveDate) -> String {
        bulletin_url(&self.base_url, date)
    }

    /// A non-success status fails this date outright; retrying another date
    /// is the caller's decision.
    #[instrument(skip(self))]
    pub async fn fetch_bulletin_text(&self, date: NaiveDate) -> Result<String, FetchError> {
        let url = self.url_for(date);
        debug!("GET {}", url);

        let resp = self.http.get(&url).await.map_err(|message| FetchError::Http {
            url: url.clone(),
            message,
        })?;
        if !resp.is_success() {
            return Err(FetchError::Status {
                url,
                status: resp.status,
            });
        }
        debug!(
            "Downloaded {} bytes ({}) from {}",
            resp.content_length, resp.content_type, url
        );

        let text = self
            .decoder
            .decode(&resp.bytes)
            .map_err(|message| FetchError::Decode { url: url.clone(), message })?;
        info!("Extracted {} lines of text from {}", text.lines().count(), url);
        Ok(text)
    }
}
