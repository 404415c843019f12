//! Card brand classification from the leading digits.
//!
//! Classification is prefix driven and evaluated in a fixed precedence order;
//! the first matching rule wins. A rule that needs a longer prefix than has
//! been typed so far is simply not satisfied, so partial input falls through
//! to later rules (and eventually to `Unknown`).
//!
//! | Precedence | Brand | Prefix |
//! |---|---|---|
//! | 1 | Visa | 4 |
//! | 2 | Mastercard | 51-55, 2221-2720 |
//! | 3 | American Express | 34, 37 |
//! | 4 | Discover | 6011, 65, 644-649 |
//! | 5 | JCB | 35 |
//! | 6 | Diners Club | 36, 38, 300-305 |
//! | 7 | UnionPay | 62 |

use crate::card::{BrandLabel, CardBrand, AMEX_MAX_DIGITS, DEFAULT_MAX_DIGITS};
use crate::digits::digit_values;

/// Classifies a digit string into a brand label.
///
/// Empty input yields the empty label, not `"Unknown"`.
///
/// # Example
///
/// ```
/// use cc_fields::detect::classify;
///
/// assert_eq!(classify("4111111111111111").as_str(), "Visa");
/// assert_eq!(classify("340000000000009").as_str(), "American Express");
/// assert_eq!(classify("9").as_str(), "Unknown");
/// assert!(classify("").is_empty());
/// ```
pub fn classify(digits: &str) -> BrandLabel {
    match detect_brand(&digit_values(digits)) {
        Some(brand) => brand.into(),
        None => BrandLabel::empty(),
    }
}

/// Detects the card brand from a sequence of digit values (0-9).
///
/// Returns `None` only for empty input; unmatched prefixes are
/// `Some(CardBrand::Unknown)`.
#[inline]
pub fn detect_brand(digits: &[u8]) -> Option<CardBrand> {
    if digits.is_empty() {
        return None;
    }

    let brand = match digits {
        [4, ..] => CardBrand::Visa,

        // Mastercard: 51-55 or 2221-2720 (the 2-series needs four digits)
        [5, 1..=5, ..] => CardBrand::Mastercard,
        [2, 2, 2, 1..=9, ..] => CardBrand::Mastercard, // 2221-2229
        [2, 2, 3..=9, _, ..] => CardBrand::Mastercard, // 2230-2299
        [2, 3..=6, _, _, ..] => CardBrand::Mastercard, // 2300-2699
        [2, 7, 0..=1, _, ..] => CardBrand::Mastercard, // 2700-2719
        [2, 7, 2, 0, ..] => CardBrand::Mastercard,     // 2720

        [3, 4, ..] | [3, 7, ..] => CardBrand::Amex,

        // Discover: 6011, 65, 644-649
        [6, 0, 1, 1, ..] => CardBrand::Discover,
        [6, 5, ..] => CardBrand::Discover,
        [6, 4, 4..=9, ..] => CardBrand::Discover,

        [3, 5, ..] => CardBrand::Jcb,

        // Diners Club: 36, 38, 300-305
        [3, 6, ..] | [3, 8, ..] => CardBrand::DinersClub,
        [3, 0, 0..=5, ..] => CardBrand::DinersClub,

        [6, 2, ..] => CardBrand::UnionPay,

        _ => CardBrand::Unknown,
    };

    Some(brand)
}

/// Cheap Amex check used wherever only the Amex/non-Amex branch matters.
///
/// True iff at least two digits are present and they start with `34` or `37`.
/// Always agrees with the Amex rule of [`classify`].
///
/// # Example
///
/// ```
/// use cc_fields::detect::is_probably_amex;
///
/// assert!(is_probably_amex("37"));
/// assert!(!is_probably_amex("3"));
/// assert!(!is_probably_amex("4111"));
/// ```
#[inline]
pub fn is_probably_amex(digits: &str) -> bool {
    digits.len() >= 2 && (digits.starts_with("34") || digits.starts_with("37"))
}

/// Returns the digit limit of the card field for the Amex/non-Amex branch.
#[inline]
pub const fn max_digits_for(is_amex: bool) -> usize {
    if is_amex {
        AMEX_MAX_DIGITS
    } else {
        DEFAULT_MAX_DIGITS
    }
}
