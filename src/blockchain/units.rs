// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversion between smallest-unit integers and decimal strings.

use alloy::primitives::U256;

/// Errors from parsing a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Invalid amount format: {0}")]
    Format(String),

    #[error("Too many decimal places (max {0})")]
    TooPrecise(u8),

    #[error("Amount overflow")]
    Overflow,
}

/// Parse a human-readable amount to wei (or token units).
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "0.0000031")
/// * `decimals` - Number of decimals (18 for ETH)
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let amount = amount.trim();
    let (whole_str, frac_str) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };

    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole_str.is_empty() && frac_str.is_empty()) || !is_digits(whole_str) || !is_digits(frac_str)
    {
        return Err(AmountError::Format(amount.to_string()));
    }

    if frac_str.len() > decimals as usize {
        return Err(AmountError::TooPrecise(decimals));
    }

    let whole = if whole_str.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole_str, 10).map_err(|_| AmountError::Overflow)?
    };

    // Pad with zeros to match decimals
    let padded = format!("{:0<width$}", frac_str, width = decimals as usize);
    let fraction = if padded.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&padded, 10).map_err(|_| AmountError::Overflow)?
    };

    let multiplier = U256::from(10u64).pow(U256::from(decimals));
    whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(fraction))
        .ok_or(AmountError::Overflow)
}

/// Format wei (or token units) to a human-readable amount.
///
/// The result is exact: trailing zeros are trimmed, no digits are dropped.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{}.{}", whole, trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_whole() {
        let result = parse_amount("1", 18).unwrap();
        assert_eq!(result, U256::from(1_000_000_000_000_000_000u64));
    }

    #[test]
    fn test_parse_amount_threshold() {
        // 0.0000031 ETH
        let result = parse_amount("0.0000031", 18).unwrap();
        assert_eq!(result, U256::from(3_100_000_000_000u64));
    }

    #[test]
    fn test_parse_amount_leading_dot() {
        let result = parse_amount(".5", 18).unwrap();
        assert_eq!(result, U256::from(500_000_000_000_000_000u64));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(matches!(parse_amount("", 18), Err(AmountError::Format(_))));
        assert!(matches!(parse_amount("-1", 18), Err(AmountError::Format(_))));
        assert!(matches!(parse_amount("1.2.3", 18), Err(AmountError::Format(_))));
        assert!(matches!(parse_amount("1e-6", 18), Err(AmountError::Format(_))));
        assert_eq!(
            parse_amount("0.0000000000000000001", 18),
            Err(AmountError::TooPrecise(18))
        );
    }

    #[test]
    fn test_format_amount() {
        let one_eth = U256::from(1_000_000_000_000_000_000u64);
        assert_eq!(format_amount(one_eth, 18), "1");

        let one_and_half = U256::from(1_500_000_000_000_000_000u64);
        assert_eq!(format_amount(one_and_half, 18), "1.5");

        assert_eq!(format_amount(U256::ZERO, 18), "0");

        // No truncation of small balances
        assert_eq!(format_amount(U256::from(3_100_000_000_001u64), 18), "0.000003100000000001");
        assert_eq!(format_amount(U256::from(1u64), 18), "0.000000000000000001");
    }

    #[test]
    fn test_format_amount_six_decimals() {
        let one_and_half = U256::from(1_500_000u64);
        assert_eq!(format_amount(one_and_half, 6), "1.5");
    }
}
