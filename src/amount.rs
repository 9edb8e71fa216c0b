//! Conversion between user-entered decimal strings and token base units.

use alloy_primitives::U256;
use alloy_primitives::utils::{ParseUnits, format_units, parse_units};
use serde::{Deserialize, Serialize};

/// Decimals assumed until the token metadata has been loaded.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Largest decimals value whose scale `10^decimals` still fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount cannot be negative")]
    Negative,
    #[error("amount has more than {decimals} decimal places")]
    TooPrecise { decimals: u8 },
    #[error("invalid amount '{input}': {reason}")]
    Invalid { input: String, reason: String },
}

/// Parse a decimal string such as `"12.5"` into the token's smallest unit.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative);
    }
    if decimals > MAX_DECIMALS {
        return Err(AmountError::Invalid {
            input: trimmed.to_string(),
            reason: format!("{} decimals are not supported", decimals),
        });
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(AmountError::Invalid {
            input: trimmed.to_string(),
            reason: "only digits and a decimal point are allowed".to_string(),
        });
    }
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > decimals as usize {
            return Err(AmountError::TooPrecise { decimals });
        }
    }

    match parse_units(trimmed, decimals) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(AmountError::Negative),
        Err(e) => Err(AmountError::Invalid {
            input: trimmed.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Format a base-unit value for display, without trailing fractional zeros.
pub fn format_amount(value: U256, decimals: u8) -> String {
    match format_units(value, decimals) {
        Ok(formatted) => trim_fraction(&formatted),
        Err(e) => {
            log::warn!("Could not format {} with {} decimals: {}", value, decimals, e);
            value.to_string()
        }
    }
}

/// Placeholder-aware formatting: unloaded values render as `0`.
pub fn format_or_zero(value: Option<U256>, decimals: u8) -> String {
    value
        .map(|v| format_amount(v, decimals))
        .unwrap_or_else(|| "0".to_string())
}

fn trim_fraction(formatted: &str) -> String {
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn test_parse_whole_amount() {
        assert_eq!(parse_amount("10", 18), Ok(ether(10)));
        assert_eq!(parse_amount("  3 ", 18), Ok(ether(3)));
    }

    #[test]
    fn test_parse_fractional_amount() {
        let half = U256::from(500_000_000_000_000_000u64);
        assert_eq!(parse_amount("0.5", 18), Ok(half));
        assert_eq!(parse_amount("1.000000000000000001", 18), Ok(ether(1) + U256::from(1u64)));
        assert_eq!(parse_amount("2.25", 6), Ok(U256::from(2_250_000u64)));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(parse_amount("", 18), Err(AmountError::Empty));
        assert_eq!(parse_amount("   ", 18), Err(AmountError::Empty));
        assert_eq!(parse_amount("-1", 18), Err(AmountError::Negative));
        assert_eq!(
            parse_amount("0.0000001", 6),
            Err(AmountError::TooPrecise { decimals: 6 })
        );
        assert!(matches!(
            parse_amount("abc", 18),
            Err(AmountError::Invalid { .. })
        ));
    }

    #[test]
    fn test_format_trims_zeros() {
        assert_eq!(format_amount(ether(10), 18), "10");
        assert_eq!(format_amount(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_amount(U256::ZERO, 18), "0");
    }

    #[test]
    fn test_format_or_zero_placeholder() {
        assert_eq!(format_or_zero(None, 18), "0");
        assert_eq!(format_or_zero(Some(ether(7)), 18), "7");
    }

    #[test]
    fn test_parse_loose_shapes() {
        assert_eq!(parse_amount("1.", 18), Ok(ether(1)));
        assert_eq!(parse_amount(".5", 18), parse_amount("0.5", 18));
        assert_eq!(format_amount(parse_amount("0.50", 18).unwrap(), 18), "0.5");
        assert_eq!(parse_amount("-0", 18), Err(AmountError::Negative));
        assert!(matches!(
            parse_amount("1_000", 18),
            Err(AmountError::Invalid { .. })
        ));
        assert!(matches!(
            parse_amount("1e18", 18),
            Err(AmountError::Invalid { .. })
        ));
    }

    #[test]
    fn test_unsupported_decimals() {
        assert!(matches!(
            parse_amount("5", MAX_DECIMALS + 3),
            Err(AmountError::Invalid { .. })
        ));
    }

    fn decimal_string(integer: &str, fraction: &str) -> String {
        if fraction.is_empty() {
            integer.to_string()
        } else {
            format!("{}.{}", integer, fraction)
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_decimal_strings_survive_round_trip(
            integer in "[0-9]{1,20}",
            fraction in "[0-9]{0,36}",
            decimals in 0u8..=36u8,
        ) {
            let fraction: String = fraction.chars().take(decimals as usize).collect();
            let input = decimal_string(&integer, &fraction);

            let units = parse_amount(&input, decimals);
            prop_assert!(units.is_ok(), "input {} rejected: {:?}", input, units);
            let shown = format_amount(units.clone().unwrap(), decimals);
            prop_assert_eq!(parse_amount(&shown, decimals), units);
        }

        #[test]
        fn prop_extra_fraction_digits_are_too_precise(
            integer in "[0-9]{1,20}",
            fraction in "[0-9]{42}",
            decimals in 0u8..=36u8,
            extra in 1usize..=5usize,
        ) {
            let fraction: String = fraction.chars().take(decimals as usize + extra).collect();
            let input = decimal_string(&integer, &fraction);

            prop_assert_eq!(
                parse_amount(&input, decimals),
                Err(AmountError::TooPrecise { decimals })
            );
        }
    }
}
