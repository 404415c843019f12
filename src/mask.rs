//! Masking for field contents that reach `Debug` output or the CLI.
//!
//! Card digits and security codes are sensitive even while half typed, so
//! nothing in this crate prints them verbatim. A card number shows at most its
//! last four digits, and only once it is long enough that four digits are a
//! small share of it. Security codes are always fully masked.

/// Digits required before the last four of a card number are revealed.
pub const REVEAL_MIN_DIGITS: usize = 12;

/// Masks a card number for display, grouping masked digits in fours.
///
/// Non-digits are ignored. Numbers shorter than [`REVEAL_MIN_DIGITS`] are
/// masked entirely.
///
/// # Example
///
/// ```
/// use cc_fields::mask::mask_card_number;
///
/// assert_eq!(mask_card_number("4111 1111 1111 1111"), "****-****-****-1111");
/// assert_eq!(mask_card_number("378282246310005"), "****-****-***0005");
/// assert_eq!(mask_card_number("41111"), "*****");
/// ```
pub fn mask_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let len = digits.len();

    if len < REVEAL_MIN_DIGITS {
        return "*".repeat(len);
    }

    let masked_count = len - 4;
    let mut result = String::with_capacity(len + (len / 4));

    for i in 0..masked_count {
        if i > 0 && i % 4 == 0 {
            result.push('-');
        }
        result.push('*');
    }

    if masked_count % 4 == 0 {
        result.push('-');
    }

    result.extend(&digits[len - 4..]);
    result
}

/// Masks a security code completely, keeping only its length visible.
#[inline]
pub fn mask_secret(input: &str) -> String {
    "*".repeat(input.chars().filter(char::is_ascii_digit).count())
}
