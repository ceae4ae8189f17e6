//! Fixed-point price and quantity utilities.
//!
//! Prices and quantities are `u64` scaled by 10^8. All resting-volume
//! bookkeeping is exact integer arithmetic on these values; `rust_decimal`
//! is only used at the edges to parse and render human-readable amounts.
//!
//! ```
//! use spot_match::types::price::{to_fixed, from_fixed};
//!
//! let price = to_fixed("50000.12345678").unwrap();
//! assert_eq!(price, 5_000_012_345_678);
//! assert_eq!(from_fixed(price), "50000.12345678");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
pub const SCALE: u64 = 100_000_000;

/// Price given to market buys: no ceiling.
pub const MARKET_BUY_PRICE: u64 = u64::MAX;

/// Price given to market sells: no floor.
pub const MARKET_SELL_PRICE: u64 = 0;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Parse a decimal string into fixed-point.
///
/// Returns `None` for unparsable, negative or out-of-range input.
///
/// ```
/// use spot_match::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-1"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s.trim()).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal into fixed-point, rounding to 8 places.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert a fixed-point value back into a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Render with exactly 8 decimal places
///
/// ```
/// use spot_match::types::price::from_fixed;
///
/// assert_eq!(from_fixed(150_000_000), "1.50000000");
/// ```
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Render without trailing zeros
///
/// ```
/// use spot_match::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    fixed_to_decimal(value).normalize().to_string()
}

/// Multiply two fixed-point values (e.g. price * quantity = notional).
///
/// Returns `None` on overflow.
///
/// ```
/// use spot_match::types::price::checked_mul;
///
/// // 100.0 * 0.5 = 50.0
/// assert_eq!(checked_mul(10_000_000_000, 50_000_000), Some(5_000_000_000));
/// ```
pub fn checked_mul(a: u64, b: u64) -> Option<u64> {
    let result = fixed_to_decimal(a).checked_mul(fixed_to_decimal(b))?;
    decimal_to_fixed(result)
}

/// Whether a price is one of the market-order sentinels
#[inline]
pub fn is_sentinel(price: u64) -> bool {
    price == MARKET_BUY_PRICE || price == MARKET_SELL_PRICE
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_basic() {
        assert_eq!(to_fixed("1"), Some(100_000_000));
        assert_eq!(to_fixed(" 0.5 "), Some(50_000_000));
        assert_eq!(to_fixed("50000.12345678"), Some(5_000_012_345_678));
    }

    #[test]
    fn test_to_fixed_rejects() {
        assert_eq!(to_fixed("-1.0"), None);
        assert_eq!(to_fixed("abc"), None);
        assert_eq!(to_fixed(""), None);
    }

    #[test]
    fn test_to_fixed_rounds_extra_precision() {
        assert_eq!(to_fixed("0.000000014"), Some(1));
        assert_eq!(to_fixed("0.000000016"), Some(2));
    }

    #[test]
    fn test_from_fixed() {
        assert_eq!(from_fixed(0), "0.00000000");
        assert_eq!(from_fixed(1), "0.00000001");
        assert_eq!(from_fixed_trimmed(100_000_000), "1");
        assert_eq!(from_fixed_trimmed(123_456_789), "1.23456789");
    }

    #[test]
    fn test_checked_mul() {
        let price = to_fixed("50000").unwrap();
        let qty = to_fixed("0.5").unwrap();
        assert_eq!(checked_mul(price, qty), to_fixed("25000"));

        assert_eq!(checked_mul(u64::MAX, u64::MAX), None);
    }

    #[test]
    fn test_sentinels() {
        assert!(is_sentinel(MARKET_BUY_PRICE));
        assert!(is_sentinel(MARKET_SELL_PRICE));
        assert!(!is_sentinel(SCALE));
    }
}
