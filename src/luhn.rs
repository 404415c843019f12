//! Luhn algorithm implementation.
//!
//! The Luhn algorithm (also known as the "modulus 10" algorithm) is a checksum
//! formula used to catch single-digit entry errors in card numbers.

use crate::digits::{digit_values, extract_digits};

/// Lookup table for doubled digits: double the value, subtract 9 if >= 10.
/// Index is the digit (0-9), value is the transformed result.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Minimum number of digits `validate` will judge.
pub const MIN_LUHN_DIGITS: usize = 2;

/// Computes the Luhn checksum (0-9) of a digit string.
///
/// Walks the digits right to left. With `parity = len % 2`, the digit at
/// index `i` is doubled when `i % 2 == parity`; doubled values above 9 have 9
/// subtracted. The checksum is the sum modulo 10, so a number with a correct
/// check digit has checksum 0.
///
/// Non-digit characters are ignored.
///
/// # Example
///
/// ```
/// use cc_fields::luhn::checksum;
///
/// assert_eq!(checksum("4111111111111111"), 0);
/// assert_eq!(checksum("4111111111111112"), 1);
/// ```
pub fn checksum(digits: &str) -> u8 {
    checksum_values(&digit_values(digits))
}

/// Computes the Luhn checksum of digit values (0-9).
#[inline]
pub fn checksum_values(digits: &[u8]) -> u8 {
    let parity = digits.len() % 2;
    let mut sum: u32 = 0;

    for (i, &digit) in digits.iter().enumerate().rev() {
        if i % 2 == parity {
            sum += u32::from(DOUBLE_TABLE[usize::from(digit)]);
        } else {
            sum += u32::from(digit);
        }
    }

    (sum % 10) as u8
}

/// Validates raw input with the Luhn algorithm.
///
/// Non-digits are stripped first. Fewer than two remaining digits is never
/// valid; otherwise the input is valid when the checksum is 0.
///
/// # Example
///
/// ```
/// use cc_fields::luhn::validate;
///
/// assert!(validate("4111 1111 1111 1111"));
/// assert!(!validate("4111111111111112"));
/// assert!(!validate("0"));
/// ```
pub fn validate(raw: &str) -> bool {
    validate_with(raw, checksum)
}

/// Validates raw input with a caller-supplied checksum function.
///
/// Applies the same stripping and minimum length as [`validate`].
pub fn validate_with(raw: &str, checksum_fn: impl Fn(&str) -> u8) -> bool {
    let digits = extract_digits(raw);
    if digits.len() < MIN_LUHN_DIGITS {
        return false;
    }
    checksum_fn(&digits) == 0
}

/// Generates the check digit that completes a partial number.
///
/// # Example
///
/// ```
/// use cc_fields::luhn::check_digit;
///
/// assert_eq!(check_digit("411111111111111"), 1);
/// assert_eq!(check_digit("37828224631000"), 5);
/// ```
pub fn check_digit(partial: &str) -> u8 {
    let mut digits = digit_values(partial);
    digits.push(0);
    (10 - checksum_values(&digits)) % 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cards() {
        assert!(validate("4111111111111111"));
        assert!(validate("4012888888881881"));
        assert!(validate("5500000000000004"));
        assert!(validate("5105105105105100"));
        assert!(validate("378282246310005"));
        assert!(validate("340000000000009"));
        assert!(validate("6011000000000004"));
        assert!(validate("30569309025904"));
    }

    #[test]
    fn test_invalid_cards() {
        assert!(!validate("4111111111111112"));
        assert!(!validate("5111111111111111"));
        assert!(!validate("1234567890123456"));
    }

    #[test]
    fn test_too_short() {
        assert!(!validate(""));
        assert!(!validate("0"));
        assert!(!validate("a0b"));
        // Two zeros is the shortest passing input
        assert!(validate("00"));
        assert!(validate("18"));
    }

    #[test]
    fn test_separators_ignored() {
        assert!(validate("4111-1111-1111-1111"));
        assert!(validate("3782 822463 10005"));
    }

    #[test]
    fn test_checksum_values() {
        assert_eq!(checksum("4111111111111111"), 0);
        assert_eq!(checksum("4111111111111110"), 9);
        assert_eq!(checksum("378282246310005"), 0);
        assert_eq!(checksum(""), 0);
    }

    #[test]
    fn test_checksum_odd_length_parity() {
        // "79927398713" is the classic odd-length example
        assert_eq!(checksum("79927398713"), 0);
        assert_eq!(checksum("79927398710"), 7);
    }

    #[test]
    fn test_check_digit() {
        assert_eq!(check_digit("411111111111111"), 1);
        assert_eq!(check_digit("550000000000000"), 4);
        assert_eq!(check_digit("37828224631000"), 5);
        assert_eq!(check_digit("7992739871"), 3);
        assert_eq!(check_digit(""), 0);
    }

    #[test]
    fn test_validate_with_custom_checksum() {
        assert!(validate_with("12", |_| 0));
        assert!(!validate_with("4111111111111111", |_| 3));
        // Length floor still applies
        assert!(!validate_with("1", |_| 0));
    }

    #[test]
    fn test_double_table_values() {
        for i in 0..10 {
            let doubled = i * 2;
            let expected = if doubled > 9 { doubled - 9 } else { doubled };
            assert_eq!(DOUBLE_TABLE[i], expected as u8);
        }
    }
}
