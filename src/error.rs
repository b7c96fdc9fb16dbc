use chrono::NaiveDate;
use thiserror::Error;

/// Failure to acquire the bulletin for one specific date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode PDF from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    /// Short label used when counting failures.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Http { .. } => "http",
            FetchError::Status { .. } => "status",
            FetchError::Decode { .. } => "decode",
        }
    }
}

#[derive(Error, Debug)]
pub enum PriceIndexError {
    #[error("Price data unavailable after {} attempt(s): {}", .attempts.len(), describe_attempts(.attempts))]
    Unavailable { attempts: Vec<(NaiveDate, FetchError)> },

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_attempts(attempts: &[(NaiveDate, FetchError)]) -> String {
    attempts
        .iter()
        .map(|(date, err)| format!("[{date}] {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, PriceIndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_lists_every_attempt() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 10, 5).unwrap();
        let err = PriceIndexError::Unavailable {
            attempts: vec![
                (today, FetchError::Status { url: "a".into(), status: 404 }),
                (yesterday, FetchError::Http { url: "b".into(), message: "timed out".into() }),
            ],
        };

        let msg = err.to_string();
        assert!(msg.contains("2 attempt(s)"));
        assert!(msg.contains("[2025-10-06] a responded with status 404"));
        assert!(msg.contains("[2025-10-05] HTTP request to b failed: timed out"));
    }
}
