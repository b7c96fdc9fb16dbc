pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetcher;
pub mod infra;
pub mod logging;
pub mod metrics;
pub mod parser;
pub mod render;
pub mod server;
pub mod service;
pub mod types;

pub use error::{FetchError, PriceIndexError, Result};
pub use parser::{parse, parse_with_rules, HeaderRules};
pub use service::PriceService;
pub use types::{filter_empty, Catalog, Commodity, PriceItem};
