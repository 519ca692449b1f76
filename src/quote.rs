use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single symbol's entry in `stock_data.json`.
///
/// `data` is positional: price, absolute change and percent change, each of
/// which may be null when the producer had no usable closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub data: [Option<f64>; 3],
    pub logo: String,
}

impl Quote {
    pub fn new(
        price: Option<f64>,
        change: Option<f64>,
        percent: Option<f64>,
        logo: impl Into<String>,
    ) -> Self {
        Self {
            data: [price, change, percent],
            logo: logo.into(),
        }
    }

    /// Quote with every field null, used when fewer than two closes exist.
    pub fn unavailable(logo: impl Into<String>) -> Self {
        Self::new(None, None, None, logo)
    }

    /// Derive change and percent change from the two most recent closes.
    pub fn from_closes(previous: f64, current: f64, logo: impl Into<String>) -> Self {
        let change = current - previous;
        let percent = if previous != 0.0 {
            Some(change / previous * 100.0)
        } else {
            None
        };
        Self::new(Some(current), Some(change), percent, logo)
    }

    pub fn price(&self) -> Option<f64> {
        self.data[0]
    }

    pub fn change(&self) -> Option<f64> {
        self.data[1]
    }

    pub fn percent(&self) -> Option<f64> {
        self.data[2]
    }
}

/// Symbol → quote mapping, iterated in the order the producer wrote it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteSnapshot {
    quotes: IndexMap<String, Quote>,
}

impl QuoteSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, quote: Quote) -> Option<Quote> {
        self.quotes.insert(symbol.into(), quote)
    }

    pub fn get(&self, symbol: &str) -> Option<&Quote> {
        self.quotes.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Quote)> {
        self.quotes
            .iter()
            .map(|(symbol, quote)| (symbol.as_str(), quote))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.quotes.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, Quote)> for QuoteSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, Quote)>>(iter: I) -> Self {
        Self {
            quotes: iter
                .into_iter()
                .map(|(symbol, quote)| (symbol.into(), quote))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_deserializes_in_document_order() {
        let json = r#"{
            "TSLA": {"data": [250.1, -3.2, -1.26], "logo": "logos/TSLA.png"},
            "AAPL": {"data": [150.5, 2.3, 1.55], "logo": "logos/AAPL.png"},
            "RKLB": {"data": [null, null, null], "logo": "logos/RKLB.png"}
        }"#;

        let snapshot: QuoteSnapshot = serde_json::from_str(json).expect("valid snapshot");
        let symbols: Vec<_> = snapshot.symbols().collect();
        assert_eq!(symbols, vec!["TSLA", "AAPL", "RKLB"]);

        let tsla = snapshot.get("TSLA").expect("tsla present");
        assert_eq!(tsla.price(), Some(250.1));
        assert_eq!(tsla.change(), Some(-3.2));
        assert_eq!(tsla.percent(), Some(-1.26));
        assert_eq!(snapshot.get("RKLB").unwrap().price(), None);
    }

    #[test]
    fn data_must_have_three_entries() {
        let json = r#"{"AAPL": {"data": [150.5, 2.3], "logo": "a.png"}}"#;
        assert!(serde_json::from_str::<QuoteSnapshot>(json).is_err());
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let snapshot: QuoteSnapshot =
            [("AAPL", Quote::new(Some(150.5), None, None, "a.png"))]
                .into_iter()
                .collect();
        let json = serde_json::to_string(&snapshot).expect("serialise");
        assert_eq!(json, r#"{"AAPL":{"data":[150.5,null,null],"logo":"a.png"}}"#);
    }

    #[test]
    fn closes_produce_change_and_percent() {
        let quote = Quote::from_closes(100.0, 102.5, "logos/AAPL.png");
        assert_eq!(quote.price(), Some(102.5));
        assert_eq!(quote.change(), Some(2.5));
        assert!((quote.percent().unwrap() - 2.5).abs() < 1e-9);
    }
}
