use std::sync::Arc;

use parking_lot::RwLock;

use crate::constants::DEFAULT_TICKERS;
use crate::error::WatchlistError;

/// Ordered set of tracked symbols, shared between the publisher and the
/// HTTP API. Symbols are stored trimmed and upper-cased.
#[derive(Clone, Debug)]
pub struct Watchlist {
    symbols: Arc<RwLock<Vec<String>>>,
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::from_symbols(DEFAULT_TICKERS)
    }
}

impl Watchlist {
    /// Builds a list from arbitrary input, silently dropping blanks and repeats.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for symbol in symbols {
            if let Ok(symbol) = normalize(symbol.as_ref()) {
                if !normalized.contains(&symbol) {
                    normalized.push(symbol);
                }
            }
        }
        Self {
            symbols: Arc::new(RwLock::new(normalized)),
        }
    }

    pub fn add(&self, symbol: &str) -> Result<String, WatchlistError> {
        let symbol = normalize(symbol)?;
        let mut symbols = self.symbols.write();
        if symbols.contains(&symbol) {
            return Err(WatchlistError::AlreadyTracked(symbol));
        }
        symbols.push(symbol.clone());
        Ok(symbol)
    }

    pub fn remove(&self, symbol: &str) -> Result<String, WatchlistError> {
        let symbol = normalize(symbol)?;
        let mut symbols = self.symbols.write();
        match symbols.iter().position(|tracked| *tracked == symbol) {
            Some(index) => {
                symbols.remove(index);
                Ok(symbol)
            }
            None => Err(WatchlistError::NotTracked(symbol)),
        }
    }

    pub fn symbols(&self) -> Vec<String> {
        self.symbols.read().clone()
    }

    pub fn len(&self) -> usize {
        self.symbols.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.read().is_empty()
    }
}

fn normalize(symbol: &str) -> Result<String, WatchlistError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(WatchlistError::Empty);
    }
    Ok(symbol.to_uppercase())
}
