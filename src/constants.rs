/// Publisher of the bulletin; the upload path is appended to this.
pub const DEFAULT_BASE_URL: &str = "https://www.da.gov.ph";

/// WordPress upload prefix under which the bulletins are published
pub const UPLOADS_PATH: &str = "wp-content/uploads";

/// Filename stem, followed by `-<MonthName>-<D>-<YYYY>.pdf`
pub const BULLETIN_FILE_PREFIX: &str = "Daily-Price-Index";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₱";
pub const DEFAULT_PORT: u16 = 3000;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "PRICE_INDEX_CONFIG";

/// Body returned by the HTTP endpoint when no bulletin could be loaded
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch the PDF file.";
pub const UNAVAILABLE_MESSAGE: &str = "Price data is currently unavailable. Please try again later.";
pub const NOT_AVAILABLE_MARKER: &str = "not available";
