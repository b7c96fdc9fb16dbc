use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult, String>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub content_length: u64,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Turns a downloaded bulletin into reading-order text.
pub trait DocumentDecoderPort: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<String, String>;
}

/// Ordered dates to try when fetching the bulletin for `requested`.
pub trait FallbackPolicy: Send + Sync {
    fn candidates(&self, requested: NaiveDate) -> Vec<NaiveDate>;
}
