//! Snapshot → ticker markup.

use std::fmt::Write;

use crate::quote::{Quote, QuoteSnapshot};

pub const FRAGMENT_OPEN: &str = "<div class='stock'>";
pub const MISSING_PRICE: &str = "N/A";

// 2^48 eighths; above this `value * 100.0` is no longer exact.
const MAX_EXACT_EIGHTHS: f64 = 281_474_976_710_656.0;

/// Colour bucket of a quote. Only a strictly positive change is a gain;
/// zero and missing changes fall into `Negative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Positive,
    Negative,
}

impl Trend {
    pub fn of(change: Option<f64>) -> Self {
        match change {
            Some(value) if value > 0.0 => Trend::Positive,
            _ => Trend::Negative,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Trend::Positive => "positive",
            Trend::Negative => "negative",
        }
    }

    /// Negative numbers already print their own minus.
    pub fn sign(self) -> &'static str {
        match self {
            Trend::Positive => "+",
            Trend::Negative => "",
        }
    }
}

pub fn format_price(price: Option<f64>) -> String {
    price.map(fixed2).unwrap_or_else(|| MISSING_PRICE.to_string())
}

/// Change and percent render blank when null instead of a literal
/// `undefined`; only price has a placeholder.
pub fn format_delta(value: Option<f64>) -> String {
    value.map(fixed2).unwrap_or_default()
}

/// Two decimals with exact halves rounded away from zero, where `{:.2}` alone
/// would round them to even. An `f64` lies exactly on a half cent only when it
/// is an odd number of eighths.
fn fixed2(value: f64) -> String {
    // -0.0 prints as "-0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 && eighths.abs() < MAX_EXACT_EIGHTHS {
        let cents = (value.abs() * 100.0 + 0.5) as u64;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}{}.{:02}", cents / 100, cents % 100);
    }
    format!("{value:.2}")
}

/// Markup for one symbol.
pub fn render_fragment(symbol: &str, quote: &Quote) -> String {
    let mut out = String::with_capacity(192);
    write_fragment(&mut out, symbol, quote);
    out
}

fn write_fragment(out: &mut String, symbol: &str, quote: &Quote) {
    let trend = Trend::of(quote.change());
    let sign = trend.sign();
    let symbol = escape_html(symbol);

    let _ = write!(
        out,
        "{FRAGMENT_OPEN}<img class='logo' src='{logo}' alt='{symbol}' /> {symbol}: {price} \
         <span class='{class}'>{sign}{change} ({sign}{percent}%)</span></div>",
        logo = escape_html(&quote.logo),
        price = format_price(quote.price()),
        class = trend.css_class(),
        change = format_delta(quote.change()),
        percent = format_delta(quote.percent()),
    );
}

/// Every fragment once, in snapshot order.
pub fn render_fragments(snapshot: &QuoteSnapshot) -> String {
    let mut out = String::with_capacity(snapshot.len() * 192);
    for (symbol, quote) in snapshot.iter() {
        write_fragment(&mut out, symbol, quote);
    }
    out
}

/// The container content: all fragments followed by the same fragments again,
/// so scrolling through the first copy wraps onto an identical second copy.
pub fn render_strip(snapshot: &QuoteSnapshot) -> String {
    render_fragments(snapshot).repeat(2)
}

pub fn fragment_count(markup: &str) -> usize {
    markup.matches(FRAGMENT_OPEN).count()
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
