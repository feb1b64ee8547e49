/// Symbol and price helpers
use crate::error::{Result, TradingError};

/// Underlying code of a contract symbol
///
/// Accepts plain ("rb2010") or exchange-qualified ("rb2010.SHFE") symbols and
/// returns the leading letters upper-cased ("RB").
pub fn underlying_symbol(symbol: &str) -> Result<String> {
    let contract = symbol.split('.').next().unwrap_or_default().trim();

    let underlying: String = contract
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    if underlying.is_empty() {
        return Err(TradingError::InvalidParameter(format!(
            "Cannot extract underlying from symbol {:?}",
            symbol
        )));
    }

    Ok(underlying.to_ascii_uppercase())
}

/// Round a price to the nearest multiple of `tick`
///
/// A zero (unset) tick leaves the price untouched.
pub fn round_to_tick(price: f64, tick: f64) -> f64 {
    if !tick.is_finite() || tick <= 0.0 {
        return price;
    }

    let rounded = (price / tick).round() * tick;

    // Trim float noise to the tick's own precision
    let scale = 10f64.powi(tick_precision(tick));
    (rounded * scale).round() / scale
}

fn tick_precision(tick: f64) -> i32 {
    (0..=10)
        .find(|p| {
            let scaled = tick * 10f64.powi(*p);
            (scaled - scaled.round()).abs() < 1e-9
        })
        .unwrap_or(10)
}
