//! # Formatting Utilities
//!
//! Converts raw provider values into display strings. For address formatting,
//! use [`shared::utils::format_address`] or [`shared::utils::truncate_address`].
//!
//! ## Functions
//!
//! - [`format_balance`] - Wei (decimal or `0x` hex string) to ether with 2 decimals
//! - [`format_units_fixed`] - General fixed-precision unit conversion
//! - [`format_chain_as_num`] - Hex chain id to its numeric value
//! - [`parse_quantity`] - Parse a decimal or hex quantity string
//!
//! Balance output is a display string. It is rounded, so it does not
//! round-trip back to the raw wei amount.

use alloy_primitives::U256;

use crate::error::{Result, SessionError};
use crate::utils::constants::{DEFAULT_DISPLAY_PRECISION, NATIVE_DECIMALS};

/// Parse a quantity as returned by a provider.
///
/// Accepts `0x`-prefixed hex (`eth_getBalance`) and plain decimal strings.
pub fn parse_quantity(raw: &str) -> Result<U256> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SessionError::InvalidResponse("empty quantity".to_string()));
    }
    trimmed
        .parse::<U256>()
        .map_err(|e| SessionError::InvalidResponse(format!("invalid quantity {trimmed:?}: {e}")))
}

/// Convert `value` smallest units to a string with exactly `precision` decimals.
///
/// Rounds half-up at the last shown digit.
///
/// # Examples
///
/// ```rust
/// use alloy_primitives::U256;
/// use dapp_session::utils::format::format_units_fixed;
///
/// assert_eq!(format_units_fixed(U256::from(1_234_567u64), 6, 2), "1.23");
/// assert_eq!(format_units_fixed(U256::from(1_235_000u64), 6, 2), "1.24");
/// assert_eq!(format_units_fixed(U256::from(7u64), 0, 0), "7");
/// ```
pub fn format_units_fixed(value: U256, decimals: u8, precision: u8) -> String {
    let precision = precision.min(decimals);
    let ten = U256::from(10u8);
    let scale = ten.pow(U256::from(decimals - precision));

    let mut scaled = value / scale;
    let remainder = value % scale;
    if scale > U256::from(1u8) && remainder * U256::from(2u8) >= scale {
        scaled += U256::from(1u8);
    }

    if precision == 0 {
        return scaled.to_string();
    }

    let unit = ten.pow(U256::from(precision));
    let whole = scaled / unit;
    let fraction = (scaled % unit).to_string();
    format!("{}.{:0>width$}", whole, fraction, width = precision as usize)
}

/// Format a raw wei balance as ether with 2 decimals.
///
/// # Examples
///
/// ```rust
/// use dapp_session::utils::format::format_balance;
///
/// assert_eq!(format_balance("1000000000000000000").unwrap(), "1.00");
/// assert_eq!(format_balance("0").unwrap(), "0.00");
/// assert_eq!(format_balance("0xde0b6b3a7640000").unwrap(), "1.00");
/// ```
pub fn format_balance(raw: &str) -> Result<String> {
    format_balance_with(raw, NATIVE_DECIMALS, DEFAULT_DISPLAY_PRECISION)
}

/// [`format_balance`] with explicit decimals and display precision
pub fn format_balance_with(raw: &str, decimals: u8, precision: u8) -> Result<String> {
    parse_quantity(raw).map(|value| format_units_fixed(value, decimals, precision))
}

/// Numeric form of a chain id such as `"0xaa36a7"`.
///
/// Returns `None` when the id does not parse or does not fit in a `u64`.
///
/// ```rust
/// use dapp_session::utils::format::format_chain_as_num;
///
/// assert_eq!(format_chain_as_num("0x1"), Some(1));
/// assert_eq!(format_chain_as_num("0xaa36a7"), Some(11155111));
/// assert_eq!(format_chain_as_num(""), None);
/// ```
pub fn format_chain_as_num(chain_id_hex: &str) -> Option<u64> {
    parse_quantity(chain_id_hex)
        .ok()
        .and_then(|id| u64::try_from(id).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance("1000000000000000000").unwrap(), "1.00");
        assert_eq!(format_balance("0").unwrap(), "0.00");
        assert_eq!(format_balance("2500000000000000000").unwrap(), "2.50");
        assert_eq!(format_balance("123456789000000000000").unwrap(), "123.46");
    }

    #[test]
    fn test_format_balance_hex() {
        assert_eq!(format_balance("0x0").unwrap(), "0.00");
        assert_eq!(format_balance("0x1bc16d674ec80000").unwrap(), "2.00");
    }

    #[test]
    fn test_format_balance_rounding() {
        // 0.005 ether rounds up, 0.004999.. rounds down
        assert_eq!(format_balance("5000000000000000").unwrap(), "0.01");
        assert_eq!(format_balance("4999999999999999").unwrap(), "0.00");
        assert_eq!(format_balance("999999999999999999").unwrap(), "1.00");
    }

    #[test]
    fn test_format_balance_invalid() {
        assert!(matches!(format_balance(""), Err(SessionError::InvalidResponse(_))));
        assert!(format_balance("ten").is_err());
        assert!(format_balance("-1").is_err());
    }

    #[test]
    fn test_format_output_is_not_raw_units() {
        let display = format_balance("1000000000000000000").unwrap();
        // Re-formatting the display string treats it as wei, not ether
        assert!(format_balance(&display).is_err());
    }

    #[test]
    fn test_format_balance_with_precision() {
        assert_eq!(format_balance_with("1234567890000000000", 18, 4).unwrap(), "1.2346");
        assert_eq!(format_balance_with("1500000000000000000", 18, 0).unwrap(), "2");
    }

    #[test]
    fn test_format_chain_as_num() {
        assert_eq!(format_chain_as_num("0x89"), Some(137));
        assert_eq!(format_chain_as_num("5"), Some(5));
        assert_eq!(format_chain_as_num("0xzz"), None);
        assert_eq!(
            format_chain_as_num("0x10000000000000000"),
            None,
            "ids above u64::MAX are not representable"
        );
    }
}
