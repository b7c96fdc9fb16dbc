use serde::{Deserialize, Serialize};

/// One priced row under a commodity section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceItem {
    pub specification: String,
    /// `None` when the bulletin explicitly marks the row `n/a`.
    pub price: Option<f64>,
}

impl PriceItem {
    pub fn new(specification: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            specification: specification.into(),
            price,
        }
    }
}

/// A section of the bulletin, named by its ALL-CAPS header line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commodity {
    #[serde(rename = "commodity")]
    pub name: String,
    pub items: Vec<PriceItem>,
}

impl Commodity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Commodities in the order they appear in the bulletin.
pub type Catalog = Vec<Commodity>;

/// Drops header-only sections that never collected a price row.
pub fn filter_empty(catalog: Catalog) -> Catalog {
    catalog.into_iter().filter(|c| !c.is_empty()).collect()
}
