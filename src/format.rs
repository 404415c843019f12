//! As-you-type field formatters.
//!
//! Each formatter takes the raw text of a field together with the caret
//! position and returns the reformatted text and a remapped caret. Offsets are
//! counted in characters.
//!
//! # Format Conventions
//!
//! - **Card number, American Express** (15 digits): `XXXX XXXXXX XXXXX`
//! - **Card number, everything else** (16 digits): `XXXX XXXX XXXX XXXX`
//! - **Expiry** (4 digits): `MM / YY`
//! - **CVV** (3-4 digits): no separators
//!
//! # Cursor Remapping
//!
//! Before reformatting, the digits left of the caret are counted. After
//! reformatting, the caret is placed right after that many digits in the new
//! text, or at the end if the text holds fewer. The caret therefore stays
//! anchored to the same digit while separators appear and disappear around it.
//!
//! # Example
//!
//! ```
//! use cc_fields::format::{format_card_number, format_expiry};
//!
//! // Typing the fifth digit pushes the caret past the new separator
//! let out = format_card_number("12345", 5);
//! assert_eq!(out.text, "1234 5");
//! assert_eq!(out.cursor, 6);
//!
//! let out = format_expiry("1228", 4);
//! assert_eq!(out.text, "12 / 28");
//! assert_eq!(out.cursor, 7);
//! ```

use zeroize::Zeroizing;

use crate::detect::{is_probably_amex, max_digits_for};
use crate::digits::{count_digits_before, extract_digits};

/// Digit groups of an American Express number.
const AMEX_GROUPS: [usize; 3] = [4, 6, 5];

/// Digit groups of every other card number.
const STANDARD_GROUPS: [usize; 4] = [4, 4, 4, 4];

/// Separator between card number groups.
pub const CARD_SEPARATOR: char = ' ';

/// Separator between expiry month and year.
pub const EXPIRY_SEPARATOR: &str = " / ";

/// Maximum digits in the expiry field (`MMYY`).
pub const EXPIRY_MAX_DIGITS: usize = 4;

/// Maximum digits in the CVV field.
pub const CVV_MAX_DIGITS: usize = 4;

/// Result of a formatting pass: new text and remapped caret.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Formatted {
    /// The reformatted field text.
    pub text: String,
    /// Caret offset into `text`, in characters.
    pub cursor: usize,
}

impl Formatted {
    /// Creates a formatting result.
    #[inline]
    pub fn new(text: impl Into<String>, cursor: usize) -> Self {
        Self {
            text: text.into(),
            cursor,
        }
    }
}

/// Formats a card number, grouping by brand and capping the digit count.
///
/// Amex numbers (prefix 34/37) keep 15 digits grouped 4-6-5; everything else
/// keeps 16 digits grouped in fours.
pub fn format_card_number(raw: &str, cursor: usize) -> Formatted {
    format_card_number_with(raw, cursor, is_probably_amex)
}

/// Formats a card number using a caller-supplied Amex predicate.
///
/// This is the hook used when the Amex rule has been overridden, so that
/// grouping, digit limit and evaluation all agree.
pub fn format_card_number_with(
    raw: &str,
    cursor: usize,
    is_amex: impl Fn(&str) -> bool,
) -> Formatted {
    let digits_before = count_digits_before(raw, cursor);
    let mut digits = Zeroizing::new(extract_digits(raw));

    let amex = is_amex(digits.as_str());
    digits.truncate(max_digits_for(amex));

    let text = group_digits(digits.as_str(), grouping(amex), CARD_SEPARATOR);
    let cursor = remap_cursor(&text, digits_before);
    Formatted { text, cursor }
}

/// Formats an expiry date as `MM / YY`.
///
/// Up to two digits are left as typed; the separator is inserted once the
/// third digit arrives.
pub fn format_expiry(raw: &str, cursor: usize) -> Formatted {
    let digits_before = count_digits_before(raw, cursor);
    let mut digits = Zeroizing::new(extract_digits(raw));
    digits.truncate(EXPIRY_MAX_DIGITS);

    let text = if digits.len() <= 2 {
        digits.as_str().to_owned()
    } else {
        let mut text = String::with_capacity(digits.len() + EXPIRY_SEPARATOR.len());
        text.push_str(&digits[..2]);
        text.push_str(EXPIRY_SEPARATOR);
        text.push_str(&digits[2..]);
        text
    };

    let cursor = remap_cursor(&text, digits_before);
    Formatted { text, cursor }
}

/// Formats a CVV: digits only, at most four.
///
/// The value has no separators, so the caret is only clamped to the new
/// length.
pub fn format_cvv(raw: &str, cursor: usize) -> Formatted {
    let mut text = extract_digits(raw);
    text.truncate(CVV_MAX_DIGITS);
    let cursor = cursor.min(text.len());
    Formatted { text, cursor }
}

/// Places the caret right after the `digits_before`-th digit of `formatted`.
///
/// Falls back to the end of the string when it holds fewer digits.
///
/// # Example
///
/// ```
/// use cc_fields::format::remap_cursor;
///
/// assert_eq!(remap_cursor("1234 5678", 4), 4);
/// assert_eq!(remap_cursor("1234 5678", 5), 6);
/// assert_eq!(remap_cursor("1234 5678", 0), 0);
/// assert_eq!(remap_cursor("12", 7), 2);
/// ```
pub fn remap_cursor(formatted: &str, digits_before: usize) -> usize {
    let mut pos = 0;
    let mut seen = 0;

    for c in formatted.chars() {
        if seen >= digits_before {
            break;
        }
        if c.is_ascii_digit() {
            seen += 1;
        }
        pos += 1;
    }

    pos
}

/// Returns the digit grouping pattern for the Amex/non-Amex branch.
#[inline]
fn grouping(is_amex: bool) -> &'static [usize] {
    if is_amex {
        &AMEX_GROUPS
    } else {
        &STANDARD_GROUPS
    }
}

/// Joins `digits` into groups of the given sizes.
///
/// No separator is emitted after the last group, or before a group that
/// would be empty. Digits beyond the pattern are appended to the last group.
fn group_digits(digits: &str, groups: &[usize], separator: char) -> String {
    let mut result = String::with_capacity(digits.len() + groups.len());
    let mut pos = 0;

    for (i, &size) in groups.iter().enumerate() {
        if pos >= digits.len() {
            break;
        }
        if i > 0 {
            result.push(separator);
        }
        let end = (pos + size).min(digits.len());
        result.push_str(&digits[pos..end]);
        pos = end;
    }

    if pos < digits.len() {
        result.push_str(&digits[pos..]);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_visa_16() {
        let out = format_card_number("4111111111111111", 16);
        assert_eq!(out.text, "4111 1111 1111 1111");
        assert_eq!(out.text.len(), 19);
        assert_eq!(out.cursor, 19);
    }

    #[test]
    fn test_format_amex() {
        let out = format_card_number("378282246310005", 15);
        assert_eq!(out.text, "3782 822463 10005");
        assert_eq!(out.text.len(), 17);
        assert_eq!(out.cursor, 17);
    }

    #[test]
    fn test_format_partial_card() {
        assert_eq!(format_card_number("", 0).text, "");
        assert_eq!(format_card_number("4", 1).text, "4");
        assert_eq!(format_card_number("4111", 4).text, "4111");
        assert_eq!(format_card_number("41111", 5).text, "4111 1");
        assert_eq!(format_card_number("411111111", 9).text, "4111 1111 1");
    }

    #[test]
    fn test_format_partial_amex() {
        assert_eq!(format_card_number("3782", 4).text, "3782");
        assert_eq!(format_card_number("37828", 5).text, "3782 8");
        assert_eq!(format_card_number("3782822463", 10).text, "3782 822463");
        assert_eq!(format_card_number("37828224631", 11).text, "3782 822463 1");
    }

    #[test]
    fn test_card_truncates_to_max_digits() {
        let out = format_card_number("41111111111111119999", 20);
        assert_eq!(out.text, "4111 1111 1111 1111");
        assert_eq!(out.cursor, 19);

        let out = format_card_number("3782822463100059", 16);
        assert_eq!(out.text, "3782 822463 10005");
    }

    #[test]
    fn test_card_reformats_messy_input() {
        let out = format_card_number("4111-1111 1111.1111", 19);
        assert_eq!(out.text, "4111 1111 1111 1111");
        assert_eq!(out.cursor, 19);

        let out = format_card_number("abc", 3);
        assert_eq!(out.text, "");
        assert_eq!(out.cursor, 0);
    }

    #[test]
    fn test_cursor_crosses_group_boundary() {
        // "1234" with caret at 4, then "5" typed
        let out = format_card_number("12345", 5);
        assert_eq!(out.text, "1234 5");
        assert_eq!(out.cursor, 6);
    }

    #[test]
    fn test_cursor_insert_in_middle() {
        // "1234 5678", "9" typed after "12"
        let out = format_card_number("12934 5678", 3);
        assert_eq!(out.text, "1293 4567 8");
        assert_eq!(out.cursor, 3);

        // Typed right before a separator shifts the caret over it
        let out = format_card_number("12349 5678", 5);
        assert_eq!(out.text, "1234 9567 8");
        assert_eq!(out.cursor, 6);
    }

    #[test]
    fn test_cursor_after_deleting_separator() {
        // Backspace over the space in "1234 5678"
        let out = format_card_number("12345678", 4);
        assert_eq!(out.text, "1234 5678");
        assert_eq!(out.cursor, 4);
    }

    #[test]
    fn test_cursor_at_start() {
        let out = format_card_number("41111", 0);
        assert_eq!(out.cursor, 0);
    }

    #[test]
    fn test_format_card_with_custom_amex_rule() {
        let out = format_card_number_with("4111111111111111", 16, |_| true);
        assert_eq!(out.text, "4111 111111 11111");

        let out = format_card_number_with("378282246310005", 15, |_| false);
        assert_eq!(out.text, "3782 8224 6310 005");
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry("", 0), Formatted::new("", 0));
        assert_eq!(format_expiry("1", 1), Formatted::new("1", 1));
        assert_eq!(format_expiry("12", 2), Formatted::new("12", 2));
        assert_eq!(format_expiry("122", 3), Formatted::new("12 / 2", 6));
        assert_eq!(format_expiry("1228", 4), Formatted::new("12 / 28", 7));
        assert_eq!(format_expiry("12 / 289", 8), Formatted::new("12 / 28", 7));
    }

    #[test]
    fn test_format_expiry_backspace() {
        // "12 / 2" with the trailing digit removed leaves "12 / "
        let out = format_expiry("12 / ", 5);
        assert_eq!(out, Formatted::new("12", 2));

        // Caret between month digits survives the reformat
        let out = format_expiry("1 / 28", 1);
        assert_eq!(out, Formatted::new("12 / 8", 1));
    }

    #[test]
    fn test_format_cvv() {
        assert_eq!(format_cvv("", 0), Formatted::new("", 0));
        assert_eq!(format_cvv("123", 3), Formatted::new("123", 3));
        assert_eq!(format_cvv("12345", 5), Formatted::new("1234", 4));
        assert_eq!(format_cvv("1a2", 3), Formatted::new("12", 2));
        assert_eq!(format_cvv("12", 1), Formatted::new("12", 1));
    }

    #[test]
    fn test_remap_cursor() {
        assert_eq!(remap_cursor("", 0), 0);
        assert_eq!(remap_cursor("", 3), 0);
        assert_eq!(remap_cursor("12 / 28", 2), 2);
        assert_eq!(remap_cursor("12 / 28", 3), 6);
        assert_eq!(remap_cursor("12 / 28", 4), 7);
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("", &AMEX_GROUPS, ' '), "");
        assert_eq!(group_digits("1234", &AMEX_GROUPS, ' '), "1234");
        assert_eq!(group_digits("12345", &STANDARD_GROUPS, '-'), "1234-5");
        assert_eq!(group_digits("123456789", &[2, 2], ' '), "12 3456789");
    }
}
