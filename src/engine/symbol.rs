//! # engine::symbol
//!
//! Turns whatever the user typed into the identifiers each provider expects:
//!
//! ```text
//! "2330"    ─▶ market "2330.TW", stock id "2330"
//! "台積電"   ─▶ market "2330.TW", stock id "2330"   (alias table)
//! "6488.two" ─▶ market "6488.TWO", stock id "6488"
//! "aapl"    ─▶ market "AAPL",    stock id "AAPL"   (no flow lookup)
//! ```
//!
//! The alias table is a fixed stand-in for a real search/autocomplete
//! service.

use serde::Serialize;

use crate::error::AppError;

/// Suffix appended to bare numeric ids (TWSE main board).
pub const DEFAULT_MARKET_SUFFIX: &str = ".TW";

/// Market suffixes stripped to obtain the bare stock id.
const MARKET_SUFFIXES: [&str; 2] = [".TWO", ".TW"];

const MAX_SYMBOL_LEN: usize = 24;

/// Company names the dashboard search box accepts. Matched as substrings of
/// the query, first hit wins.
const ALIASES: [(&str, &str); 5] = [
    ("台積電", "2330.TW"),
    ("聯發科", "2454.TW"),
    ("長榮", "2603.TW"),
    ("鴻海", "2317.TW"),
    ("廣達", "2382.TW"),
];

/// How a query was turned into a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Alias,
    Numeric,
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    /// Symbol for the quote/chart/news provider, e.g. `2330.TW`
    pub market_symbol: String,
    /// Bare id for the flow provider, e.g. `2330`
    pub stock_id: String,
    pub resolution: Resolution,
}

impl Ticker {
    /// The flow provider only knows Taiwan-listed numeric ids.
    pub fn has_numeric_id(&self) -> bool {
        !self.stock_id.is_empty() && self.stock_id.chars().all(|c| c.is_ascii_digit())
    }
}

pub fn lookup_alias(query: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(name, _)| query.contains(name))
        .map(|(_, symbol)| *symbol)
}

/// Resolves a raw query. Blank or malformed input is `InvalidInput`.
pub fn resolve(raw: Option<&str>) -> Result<Ticker, AppError> {
    let query = raw.map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::InvalidInput("Missing symbol parameter".to_string()));
    }

    if query.chars().all(|c| c.is_ascii_digit()) {
        let market_symbol = format!("{query}{DEFAULT_MARKET_SUFFIX}");
        return Ok(Ticker { market_symbol, stock_id: query.to_string(), resolution: Resolution::Numeric });
    }

    if let Some(symbol) = lookup_alias(query) {
        return Ok(Ticker {
            market_symbol: symbol.to_string(),
            stock_id: strip_market_suffix(symbol).to_string(),
            resolution: Resolution::Alias,
        });
    }

    let market_symbol = query.to_ascii_uppercase();
    if market_symbol.len() > MAX_SYMBOL_LEN || !market_symbol.chars().all(is_symbol_char) {
        return Err(AppError::InvalidInput(format!("Invalid symbol: '{query}'")));
    }

    Ok(Ticker {
        stock_id: strip_market_suffix(&market_symbol).to_string(),
        market_symbol,
        resolution: Resolution::Passthrough,
    })
}

/// `"2330.TW"` → `"2330"`; symbols without a Taiwan suffix are unchanged.
pub fn strip_market_suffix(symbol: &str) -> &str {
    MARKET_SUFFIXES
        .iter()
        .find_map(|suffix| symbol.strip_suffix(suffix))
        .unwrap_or(symbol)
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_get_default_suffix() {
        let t = resolve(Some(" 2330 ")).unwrap();
        assert_eq!(t.market_symbol, "2330.TW");
        assert_eq!(t.stock_id, "2330");
        assert_eq!(t.resolution, Resolution::Numeric);
        assert!(t.has_numeric_id());
    }

    #[test]
    fn company_name_resolves_through_alias() {
        let t = resolve(Some("聯發科 2454")).unwrap();
        assert_eq!(t.market_symbol, "2454.TW");
        assert_eq!(t.stock_id, "2454");
        assert_eq!(t.resolution, Resolution::Alias);
    }

    #[test]
    fn suffixed_symbol_is_uppercased_and_stripped() {
        let t = resolve(Some("6488.two")).unwrap();
        assert_eq!(t.market_symbol, "6488.TWO");
        assert_eq!(t.stock_id, "6488");
        assert_eq!(t.resolution, Resolution::Passthrough);

        let t = resolve(Some("2330.TW")).unwrap();
        assert_eq!(t.stock_id, "2330");
    }

    #[test]
    fn foreign_symbol_has_no_numeric_id() {
        let t = resolve(Some("aapl")).unwrap();
        assert_eq!(t.market_symbol, "AAPL");
        assert!(!t.has_numeric_id());
    }

    #[test]
    fn blank_and_missing_input_is_rejected() {
        for raw in [None, Some(""), Some("   ")] {
            assert!(matches!(resolve(raw), Err(AppError::InvalidInput(_))));
        }
    }

    #[test]
    fn path_characters_are_rejected() {
        assert!(matches!(resolve(Some("../quote?x=1")), Err(AppError::InvalidInput(_))));
        assert!(matches!(resolve(Some("不存在的公司")), Err(AppError::InvalidInput(_))));
    }
}
