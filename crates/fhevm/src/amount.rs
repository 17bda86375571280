// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::ValidationError;

/// Parse a free-text decimal amount into minor units scaled by `10^decimals`.
///
/// Accepts `12`, `12.5`, `.5` and `12.` with at most `decimals` fractional digits. Anything that
/// is not such a number, is negative, or does not fit in a `u64` after scaling is refused.
pub fn parse_amount(input: &str, decimals: u8) -> Result<u64, ValidationError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ValidationError::Empty);
    }
    if text.starts_with('-') {
        return Err(ValidationError::Negative);
    }

    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(ValidationError::NotANumber(text.to_owned()));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(ValidationError::TooManyDecimals { max: decimals });
    }

    let overflow = ValidationError::Overflow { decimals };
    let scale = 10u64.checked_pow(decimals as u32).ok_or(overflow.clone())?;

    let whole_units = whole
        .bytes()
        .try_fold(0u64, |acc, b| {
            acc.checked_mul(10)?.checked_add(u64::from(b - b'0'))
        })
        .and_then(|w| w.checked_mul(scale))
        .ok_or(overflow.clone())?;

    // fraction.len() <= decimals so the padded fraction is below `scale`
    let fraction_units = fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(decimals as usize)
        .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'));

    whole_units.checked_add(fraction_units).ok_or(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_by_decimals() {
        assert_eq!(parse_amount("100", 6), Ok(100_000_000));
        assert_eq!(parse_amount(" 1.5 ", 6), Ok(1_500_000));
        assert_eq!(parse_amount(".000001", 6), Ok(1));
        assert_eq!(parse_amount("7.", 6), Ok(7_000_000));
        assert_eq!(parse_amount("0", 6), Ok(0));
        assert_eq!(parse_amount("2.50000000", 6), Ok(2_500_000));
        assert_eq!(parse_amount("42", 0), Ok(42));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(parse_amount("", 6), Err(ValidationError::Empty));
        assert_eq!(parse_amount("   ", 6), Err(ValidationError::Empty));
        assert_eq!(parse_amount("-3", 6), Err(ValidationError::Negative));
        assert_eq!(
            parse_amount("abc", 6),
            Err(ValidationError::NotANumber("abc".into()))
        );
        assert_eq!(
            parse_amount("1.2.3", 6),
            Err(ValidationError::NotANumber("1.2.3".into()))
        );
        assert_eq!(
            parse_amount(".", 6),
            Err(ValidationError::NotANumber(".".into()))
        );
        assert_eq!(
            parse_amount("1e6", 6),
            Err(ValidationError::NotANumber("1e6".into()))
        );
        assert_eq!(
            parse_amount("0.0000001", 6),
            Err(ValidationError::TooManyDecimals { max: 6 })
        );
    }

    #[test]
    fn test_rejects_amounts_beyond_64_bits() {
        // u64::MAX is 18446744073709551615
        assert_eq!(
            parse_amount("18446744073709.551615", 6),
            Ok(u64::MAX)
        );
        assert_eq!(
            parse_amount("18446744073709.551616", 6),
            Err(ValidationError::Overflow { decimals: 6 })
        );
        assert_eq!(
            parse_amount("18446744073710", 6),
            Err(ValidationError::Overflow { decimals: 6 })
        );
        assert_eq!(
            parse_amount("99999999999999999999999", 0),
            Err(ValidationError::Overflow { decimals: 0 })
        );
    }
}
