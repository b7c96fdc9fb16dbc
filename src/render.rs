//! Plain-text rendering of a catalog: one section per commodity with a
//! specification/price table.

use std::fmt;

use crate::constants::{NOT_AVAILABLE_MARKER, UNAVAILABLE_MESSAGE};
use crate::types::Catalog;

/// Two decimals with thousands separators, e.g. `₱1,234.50`.
pub fn format_price(price: Option<f64>, currency_symbol: &str) -> String {
    let Some(value) = price else {
        return NOT_AVAILABLE_MARKER.to_string();
    };

    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{currency_symbol}{grouped}.{cents}")
}

/// Table view of a catalog; formatting errors propagate to the caller's writer.
pub struct CatalogTable<'a> {
    pub catalog: &'a Catalog,
    pub currency_symbol: &'a str,
}

impl fmt::Display for CatalogTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.catalog.is_empty() {
            return writeln!(f, "{UNAVAILABLE_MESSAGE}");
        }

        for commodity in self.catalog {
            let prices: Vec<String> = commodity
                .items
                .iter()
                .map(|item| format_price(item.price, self.currency_symbol))
                .collect();
            let spec_width = commodity
                .items
                .iter()
                .map(|i| i.specification.chars().count())
                .chain(std::iter::once("Specification".len()))
                .max()
                .unwrap_or(0);
            let price_width = prices
                .iter()
                .map(|p| p.chars().count())
                .chain(std::iter::once("Price".len()))
                .max()
                .unwrap_or(0);

            writeln!(f, "{}", commodity.name)?;
            writeln!(f, "  {:<spec_width$}  {:>price_width$}", "Specification", "Price")?;
            writeln!(f, "  {}  {}", "-".repeat(spec_width), "-".repeat(price_width))?;
            for (item, price) in commodity.items.iter().zip(&prices) {
                writeln!(f, "  {:<spec_width$}  {:>price_width$}", item.specification, price)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub fn render_catalog(catalog: &Catalog, currency_symbol: &str) -> String {
    CatalogTable { catalog, currency_symbol }.to_string()
}
