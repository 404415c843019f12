//! Per-field status evaluation.
//!
//! Each field is judged from scratch on every input event: the evaluator
//! takes the current (formatted) field text and produces a complete new state.
//! Nothing from the previous state is carried over, so a state value is
//! replaced wholesale and never patched.
//!
//! - `neutral`: not enough input to judge yet.
//! - `valid` / `invalid`: a definitive judgment.

use std::fmt;
use std::str::FromStr;

use zeroize::Zeroize;

use crate::card::{BrandLabel, CardBrand};
use crate::clock::YearMonth;
use crate::detect::max_digits_for;
use crate::digits::extract_digits;
use crate::error::EngineError;
use crate::mask::{mask_card_number, mask_secret};
use crate::rules::Rules;

/// Expiry dates further ahead than this many years are rejected by default.
pub const DEFAULT_EXPIRY_WINDOW_YEARS: u32 = 10;

/// Verdict for one field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum Status {
    /// Not enough input to judge.
    #[default]
    Neutral,
    /// Complete and acceptable.
    Valid,
    /// Complete (or over-long) and unacceptable.
    Invalid,
}

impl Status {
    /// Returns the lowercase name used in notifications and CLI output.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }

    /// Returns true for [`Status::Valid`].
    #[inline]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum Field {
    /// Card number.
    Card,
    /// Expiry date.
    Expiry,
    /// Security code.
    Cvv,
}

impl Field {
    /// All fields, in evaluation order.
    pub const ALL: [Field; 3] = [Self::Card, Self::Expiry, Self::Cvv];

    /// Returns the lowercase field name.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Expiry => "expiry",
            Self::Cvv => "cvv",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" | "number" | "card-number" => Ok(Self::Card),
            "expiry" | "exp" => Ok(Self::Expiry),
            "cvv" | "cvc" => Ok(Self::Cvv),
            _ => Err(EngineError::UnknownField(s.to_owned())),
        }
    }
}

/// Evaluated state of the card number field.
///
/// Brand, Amex flag and digit limit are reported whatever the status, so a
/// UI can show the brand while the number is still being typed.
///
/// The digits themselves stay inside the crate; listeners only see the
/// verdict and its metadata.
///
/// ```compile_fail
/// use cc_fields::{CardFieldState, Rules};
///
/// let state = CardFieldState::evaluate("4111111111111111", &Rules::default());
/// let _ = state.digits();
/// ```
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CardFieldState {
    status: Status,
    #[cfg_attr(feature = "serde", serde(skip))]
    digits: String,
    brand: BrandLabel,
    is_amex: bool,
    is_valid: bool,
    max_digits: usize,
}

impl CardFieldState {
    /// Evaluates a card number field.
    ///
    /// Neutral until the digit limit for the Amex/non-Amex branch is reached;
    /// then valid iff the Luhn check passes.
    pub fn evaluate(value: &str, rules: &Rules) -> Self {
        let digits = extract_digits(value);
        let is_amex = rules.is_probably_amex(&digits);
        let max_digits = max_digits_for(is_amex);
        let brand = rules.classify(&digits);

        let (status, is_valid) = if digits.len() < max_digits {
            (Status::Neutral, false)
        } else if rules.luhn_validate(&digits) {
            (Status::Valid, true)
        } else {
            (Status::Invalid, false)
        };

        Self {
            status,
            digits,
            brand,
            is_amex,
            is_valid,
            max_digits,
        }
    }

    /// Returns the field status.
    #[inline]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the classifier's label.
    #[inline]
    pub fn brand(&self) -> &BrandLabel {
        &self.brand
    }

    /// Returns the built-in brand, if the label names one.
    #[inline]
    pub fn card_brand(&self) -> Option<CardBrand> {
        self.brand.brand()
    }

    /// Returns true if the number was judged to be American Express.
    #[inline]
    pub const fn is_amex(&self) -> bool {
        self.is_amex
    }

    /// Returns the Luhn result; always false while neutral.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Returns the digit limit in force for this number.
    #[inline]
    pub const fn max_digits(&self) -> usize {
        self.max_digits
    }

    /// True when both states report the same verdict and metadata.
    pub(crate) fn same_report(&self, other: &Self) -> bool {
        self.status == other.status
            && self.brand == other.brand
            && self.is_amex == other.is_amex
            && self.is_valid == other.is_valid
            && self.max_digits == other.max_digits
    }
}

impl Default for CardFieldState {
    fn default() -> Self {
        Self::evaluate("", &Rules::default())
    }
}

impl fmt::Debug for CardFieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardFieldState")
            .field("status", &self.status)
            .field("digits", &mask_card_number(&self.digits))
            .field("brand", &self.brand)
            .field("is_amex", &self.is_amex)
            .field("is_valid", &self.is_valid)
            .field("max_digits", &self.max_digits)
            .finish()
    }
}

impl Drop for CardFieldState {
    fn drop(&mut self) {
        self.digits.zeroize();
    }
}

/// Evaluated state of the expiry field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExpiryFieldState {
    status: Status,
    digits: String,
    month: Option<u32>,
    year: Option<i32>,
}

impl ExpiryFieldState {
    /// Evaluates an expiry field against the month `today`.
    ///
    /// Neutral unless exactly four digits (`MMYY`) are present. The month
    /// must be 1-12, and the date must fall between `today` and
    /// `today + window_years` inclusive, counted in whole months.
    pub fn evaluate(value: &str, today: YearMonth, window_years: u32) -> Self {
        let digits = extract_digits(value);

        if digits.len() != 4 {
            return Self {
                status: Status::Neutral,
                digits,
                month: None,
                year: None,
            };
        }

        // Four ASCII digits always parse
        let month: u32 = digits[..2].parse().unwrap_or_default();
        let year: i32 = 2000 + digits[2..].parse::<i32>().unwrap_or_default();

        let Ok(expiry) = YearMonth::new(year, month) else {
            return Self {
                status: Status::Invalid,
                digits,
                month: None,
                year: None,
            };
        };

        let current_total = today.total_months();
        let max_total = current_total + i64::from(window_years) * 12;
        let input_total = expiry.total_months();

        let status = if input_total < current_total || input_total > max_total {
            Status::Invalid
        } else {
            Status::Valid
        };

        Self {
            status,
            digits,
            month: Some(month),
            year: Some(year),
        }
    }

    /// Returns the field status.
    #[inline]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the digits the state was evaluated from.
    #[inline]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Returns the month (1-12) once four digits with a real month are typed.
    #[inline]
    pub const fn month(&self) -> Option<u32> {
        self.month
    }

    /// Returns the four-digit year once four digits with a real month are typed.
    #[inline]
    pub const fn year(&self) -> Option<i32> {
        self.year
    }

    /// True when both states report the same verdict and date.
    pub(crate) fn same_report(&self, other: &Self) -> bool {
        self.status == other.status && self.month == other.month && self.year == other.year
    }
}

/// Evaluated state of the security code field.
///
/// `is_amex` mirrors the card field's classification at the time of
/// evaluation; it is never derived from the code itself. The code's digits
/// are not readable from outside the crate.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CvvFieldState {
    status: Status,
    #[cfg_attr(feature = "serde", serde(skip))]
    digits: String,
    expected_length: usize,
    is_amex: bool,
}

impl CvvFieldState {
    /// Evaluates a CVV field for the given card branch.
    ///
    /// Amex expects 4 digits, everything else 3. Empty is neutral; the exact
    /// expected length is valid; anything else is invalid.
    pub fn evaluate(value: &str, is_amex: bool) -> Self {
        let digits = extract_digits(value);
        let expected_length = cvv_length_for(is_amex);

        let status = if digits.is_empty() {
            Status::Neutral
        } else if digits.len() == expected_length {
            Status::Valid
        } else {
            Status::Invalid
        };

        Self {
            status,
            digits,
            expected_length,
            is_amex,
        }
    }

    /// Returns the field status.
    #[inline]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the number of digits the current card requires.
    #[inline]
    pub const fn expected_length(&self) -> usize {
        self.expected_length
    }

    /// Returns the card field's Amex flag this state was evaluated with.
    #[inline]
    pub const fn is_amex(&self) -> bool {
        self.is_amex
    }

    /// True when both states report the same verdict and expected length.
    pub(crate) fn same_report(&self, other: &Self) -> bool {
        self.status == other.status
            && self.expected_length == other.expected_length
            && self.is_amex == other.is_amex
    }
}

impl Default for CvvFieldState {
    fn default() -> Self {
        Self::evaluate("", false)
    }
}

impl fmt::Debug for CvvFieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CvvFieldState")
            .field("status", &self.status)
            .field("digits", &mask_secret(&self.digits))
            .field("expected_length", &self.expected_length)
            .field("is_amex", &self.is_amex)
            .finish()
    }
}

impl Drop for CvvFieldState {
    fn drop(&mut self) {
        self.digits.zeroize();
    }
}

/// Returns the expected security code length for the Amex/non-Amex branch.
#[inline]
pub const fn cvv_length_for(is_amex: bool) -> usize {
    if is_amex {
        CardBrand::Amex.cvv_length()
    } else {
        CardBrand::Visa.cvv_length()
    }
}
