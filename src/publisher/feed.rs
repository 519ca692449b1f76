use std::collections::{HashMap, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Daily closes for a symbol, oldest first.
pub trait QuoteFeed: Send {
    /// Returns an empty list for symbols the feed does not know.
    fn closes(&mut self, symbol: &str) -> Vec<f64>;
}

const HISTORY_DAYS: usize = 5;
const DAILY_VOLATILITY: f64 = 0.015;

/// Random-walk stand-in for a market data vendor. Each call advances the
/// symbol by one close; a new symbol starts with a full window of history.
pub struct SimulatedFeed {
    rng: StdRng,
    history: HashMap<String, VecDeque<f64>>,
}

impl SimulatedFeed {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            history: HashMap::new(),
        }
    }

    fn step(rng: &mut StdRng, price: f64) -> f64 {
        let shock: f64 = rng.sample(StandardNormal);
        (price * (1.0 + shock * DAILY_VOLATILITY)).max(0.01)
    }
}

impl Default for SimulatedFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteFeed for SimulatedFeed {
    fn closes(&mut self, symbol: &str) -> Vec<f64> {
        if !is_listed(symbol) {
            return Vec::new();
        }

        let rng = &mut self.rng;
        let window = self.history.entry(symbol.to_string()).or_insert_with(|| {
            let mut price = rng.gen_range(80.0..150.0);
            let mut seeded = VecDeque::with_capacity(HISTORY_DAYS);
            for _ in 0..HISTORY_DAYS - 1 {
                seeded.push_back(price);
                price = Self::step(rng, price);
            }
            seeded
        });

        let last = window.back().copied().unwrap_or(100.0);
        window.push_back(Self::step(rng, last));
        while window.len() > HISTORY_DAYS {
            window.pop_front();
        }
        window.iter().copied().collect()
    }
}

/// Exchange-style tickers: letters, digits, `.` and `-`, at most ten characters.
pub(crate) fn is_listed(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol.len() <= 10
        && symbol
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '.' || ch == '-')
}
