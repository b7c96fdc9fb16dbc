//! Line classifier that rebuilds the bulletin's commodity sections from
//! extracted PDF text.
//!
//! The bulletin has no structural markers once flattened to text, so lines are
//! told apart by shape alone: ALL-CAPS labels open a section and lines ending
//! in a number or `n/a` are price rows. Everything else is dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::types::{Catalog, Commodity, PriceItem};

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z\s\-/]+$").unwrap());
static ROW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+?)\s+([0-9]+(?:\.[0-9]+)?|n/a)$").unwrap());

/// Layout-specific exclusions for the header and row tests.
///
/// The header shape also matches document furniture such as titles, column
/// headings and page markers. Those known false positives are listed here so
/// they can be retuned from configuration when the bulletin layout changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeaderRules {
    /// Header-shaped labels that never name a commodity (exact match).
    pub excluded_headers: Vec<String>,
    /// Substrings that disqualify a header candidate.
    pub header_guards: Vec<String>,
    /// Substrings that disqualify the specification of a price row.
    pub row_guards: Vec<String>,
}

impl Default for HeaderRules {
    fn default() -> Self {
        Self {
            excluded_headers: vec![
                "DAILY PRICE INDEX".to_string(),
                "PREVAILING".to_string(),
                "RETAIL PRICE PER".to_string(),
                "OTHER LIVESTOCK MEAT".to_string(),
                "PAGE".to_string(),
            ],
            header_guards: vec!["Page".to_string(), "SPECIFICATION".to_string(), "UNIT".to_string()],
            row_guards: vec!["Page".to_string(), "PAGE".to_string()],
        }
    }
}

impl HeaderRules {
    pub fn is_header(&self, line: &str) -> bool {
        HEADER_RE.is_match(line)
            && !contains_any(line, &self.header_guards)
            && !self.excluded_headers.iter().any(|h| h == line)
    }

    /// Splits a price row into its item, if the line is shaped like one.
    pub fn price_row(&self, line: &str) -> Option<PriceItem> {
        let caps = ROW_RE.captures(line)?;
        let specification = caps.get(1)?.as_str().trim();
        if specification.is_empty() || contains_any(specification, &self.row_guards) {
            return None;
        }
        let price = match caps.get(2)?.as_str() {
            "n/a" => None,
            // Overlong digit runs parse to infinity; drop the row
            token => Some(token.parse::<f64>().ok().filter(|p| p.is_finite())?),
        };
        Some(PriceItem::new(specification, price))
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| !n.is_empty() && haystack.contains(n.as_str()))
}

/// Parses with the default exclusion table.
pub fn parse(text: &str) -> Catalog {
    parse_with_rules(text, &HeaderRules::default())
}

/// Single pass over the text; never fails, unrecognised lines are skipped.
///
/// Sections are emitted even when no row followed their header. Callers strip
/// those with [`crate::types::filter_empty`].
pub fn parse_with_rules(text: &str, rules: &HeaderRules) -> Catalog {
    let mut out: Catalog = Vec::new();
    let mut current: Option<Commodity> = None;
    let mut discarded = 0usize;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if rules.is_header(line) {
            if let Some(done) = current.take() {
                out.push(done);
            }
            current = Some(Commodity::new(line));
            continue;
        }

        match current.as_mut() {
            Some(commodity) => match rules.price_row(line) {
                Some(item) => commodity.items.push(item),
                None => discarded += 1,
            },
            None => discarded += 1,
        }
    }

    if let Some(done) = current {
        out.push(done);
    }

    debug!(
        "parsed {} sections, {} rows, discarded {} lines",
        out.len(),
        out.iter().map(|c| c.items.len()).sum::<usize>(),
        discarded
    );
    out
}
