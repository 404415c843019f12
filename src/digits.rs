//! Digit extraction.
//!
//! Every formatter and evaluator starts from the same place: the raw field
//! text with everything except `0`-`9` thrown away.

/// Strips every character that is not an ASCII digit.
///
/// Total over all inputs; an empty or digit-free string yields an empty string.
///
/// # Example
///
/// ```
/// use cc_fields::digits::extract_digits;
///
/// assert_eq!(extract_digits("4111 1111-1111.1111"), "4111111111111111");
/// assert_eq!(extract_digits("12 / 3a"), "123");
/// assert_eq!(extract_digits("abc"), "");
/// ```
pub fn extract_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Counts the digits that appear before char offset `cursor` in `raw`.
///
/// Offsets past the end count every digit in the string.
#[inline]
pub fn count_digits_before(raw: &str, cursor: usize) -> usize {
    raw.chars()
        .take(cursor)
        .filter(|c| c.is_ascii_digit())
        .count()
}

/// Converts an ASCII digit string into digit values (0-9).
///
/// Non-digit characters are skipped.
#[inline]
pub(crate) fn digit_values(digits: &str) -> Vec<u8> {
    digits
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}
