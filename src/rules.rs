//! Injectable formatting and classification rules.
//!
//! The engine never calls the built-in formatters, classifier or Luhn
//! functions directly; it goes through a [`Rules`] value. Any slot can be
//! replaced with a closure at construction time, and slots left empty fall
//! back to the built-ins. Built-ins that depend on another rule resolve it
//! through the same `Rules`, so an override is seen consistently:
//!
//! - the default card formatter groups by the active Amex predicate;
//! - the default Luhn validation uses the active checksum.
//!
//! # Example
//!
//! ```
//! use cc_fields::card::BrandLabel;
//! use cc_fields::rules::Rules;
//!
//! let rules = Rules::new().with_classifier(|digits: &str| {
//!     if digits.starts_with("50") {
//!         BrandLabel::custom("Maestro")
//!     } else {
//!         cc_fields::detect::classify(digits)
//!     }
//! });
//!
//! assert_eq!(rules.classify("5018").as_str(), "Maestro");
//! assert_eq!(rules.classify("4111").as_str(), "Visa");
//! ```

use std::fmt;

use crate::card::BrandLabel;
use crate::detect;
use crate::format::{self, Formatted};
use crate::luhn;

/// A formatter: `(raw, cursor) -> (text, cursor)`.
pub type FormatFn = Box<dyn Fn(&str, usize) -> Formatted>;

/// A brand classifier over a digit string.
pub type ClassifyFn = Box<dyn Fn(&str) -> BrandLabel>;

/// A predicate over a digit string.
pub type PredicateFn = Box<dyn Fn(&str) -> bool>;

/// A Luhn-style checksum over a digit string, 0 meaning "passes".
pub type ChecksumFn = Box<dyn Fn(&str) -> u8>;

/// The set of rules the engine formats and evaluates with.
#[derive(Default)]
pub struct Rules {
    card_formatter: Option<FormatFn>,
    expiry_formatter: Option<FormatFn>,
    cvv_formatter: Option<FormatFn>,
    classifier: Option<ClassifyFn>,
    amex_predicate: Option<PredicateFn>,
    luhn_checksum: Option<ChecksumFn>,
    luhn_validator: Option<PredicateFn>,
}

impl Rules {
    /// Creates a rule set that uses only the built-ins.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the card number formatter.
    pub fn with_card_formatter(mut self, f: impl Fn(&str, usize) -> Formatted + 'static) -> Self {
        self.card_formatter = Some(Box::new(f));
        self
    }

    /// Replaces the expiry formatter.
    pub fn with_expiry_formatter(
        mut self,
        f: impl Fn(&str, usize) -> Formatted + 'static,
    ) -> Self {
        self.expiry_formatter = Some(Box::new(f));
        self
    }

    /// Replaces the CVV formatter.
    pub fn with_cvv_formatter(mut self, f: impl Fn(&str, usize) -> Formatted + 'static) -> Self {
        self.cvv_formatter = Some(Box::new(f));
        self
    }

    /// Replaces the brand classifier.
    pub fn with_classifier(mut self, f: impl Fn(&str) -> BrandLabel + 'static) -> Self {
        self.classifier = Some(Box::new(f));
        self
    }

    /// Replaces the Amex predicate.
    pub fn with_amex_predicate(mut self, f: impl Fn(&str) -> bool + 'static) -> Self {
        self.amex_predicate = Some(Box::new(f));
        self
    }

    /// Replaces the Luhn checksum.
    pub fn with_luhn_checksum(mut self, f: impl Fn(&str) -> u8 + 'static) -> Self {
        self.luhn_checksum = Some(Box::new(f));
        self
    }

    /// Replaces Luhn validation as a whole.
    pub fn with_luhn_validator(mut self, f: impl Fn(&str) -> bool + 'static) -> Self {
        self.luhn_validator = Some(Box::new(f));
        self
    }

    /// Formats the card number field.
    pub fn format_card_number(&self, raw: &str, cursor: usize) -> Formatted {
        match &self.card_formatter {
            Some(f) => f(raw, cursor),
            None => format::format_card_number_with(raw, cursor, |d| self.is_probably_amex(d)),
        }
    }

    /// Formats the expiry field.
    pub fn format_expiry(&self, raw: &str, cursor: usize) -> Formatted {
        match &self.expiry_formatter {
            Some(f) => f(raw, cursor),
            None => format::format_expiry(raw, cursor),
        }
    }

    /// Formats the CVV field.
    pub fn format_cvv(&self, raw: &str, cursor: usize) -> Formatted {
        match &self.cvv_formatter {
            Some(f) => f(raw, cursor),
            None => format::format_cvv(raw, cursor),
        }
    }

    /// Classifies a digit string.
    pub fn classify(&self, digits: &str) -> BrandLabel {
        match &self.classifier {
            Some(f) => f(digits),
            None => detect::classify(digits),
        }
    }

    /// Runs the Amex predicate.
    pub fn is_probably_amex(&self, digits: &str) -> bool {
        match &self.amex_predicate {
            Some(f) => f(digits),
            None => detect::is_probably_amex(digits),
        }
    }

    /// Computes the Luhn checksum.
    pub fn luhn_checksum(&self, digits: &str) -> u8 {
        match &self.luhn_checksum {
            Some(f) => f(digits),
            None => luhn::checksum(digits),
        }
    }

    /// Runs Luhn validation.
    pub fn luhn_validate(&self, raw: &str) -> bool {
        match &self.luhn_validator {
            Some(f) => f(raw),
            None => luhn::validate_with(raw, |d| self.luhn_checksum(d)),
        }
    }

    fn overridden(&self) -> Vec<&'static str> {
        [
            ("card_formatter", self.card_formatter.is_some()),
            ("expiry_formatter", self.expiry_formatter.is_some()),
            ("cvv_formatter", self.cvv_formatter.is_some()),
            ("classifier", self.classifier.is_some()),
            ("amex_predicate", self.amex_predicate.is_some()),
            ("luhn_checksum", self.luhn_checksum.is_some()),
            ("luhn_validator", self.luhn_validator.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("overridden", &self.overridden())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtins() {
        let rules = Rules::new();
        assert_eq!(
            rules.format_card_number("378282246310005", 15),
            format::format_card_number("378282246310005", 15)
        );
        assert_eq!(rules.format_expiry("1228", 4), format::format_expiry("1228", 4));
        assert_eq!(rules.format_cvv("12345", 5), format::format_cvv("12345", 5));
        assert_eq!(rules.classify("6011"), detect::classify("6011"));
        assert!(rules.is_probably_amex("34"));
        assert_eq!(rules.luhn_checksum("4111111111111111"), 0);
        assert!(rules.luhn_validate("4111111111111111"));
    }

    #[test]
    fn test_amex_override_drives_default_card_formatter() {
        let rules = Rules::new().with_amex_predicate(|d: &str| d.starts_with('9'));
        let out = rules.format_card_number("9999999999999999", 16);
        assert_eq!(out.text, "9999 999999 99999");

        let out = rules.format_card_number("378282246310005", 15);
        assert_eq!(out.text, "3782 8224 6310 005");
    }

    #[test]
    fn test_checksum_override_drives_default_validator() {
        let rules = Rules::new().with_luhn_checksum(|_: &str| 0);
        assert!(rules.luhn_validate("4111111111111112"));
        // Minimum length still enforced by the default validator
        assert!(!rules.luhn_validate("4"));
    }

    #[test]
    fn test_validator_override_wins() {
        let rules = Rules::new()
            .with_luhn_checksum(|_: &str| 0)
            .with_luhn_validator(|_: &str| false);
        assert!(!rules.luhn_validate("4111111111111111"));
    }

    #[test]
    fn test_formatter_overrides() {
        let rules = Rules::new()
            .with_card_formatter(|raw: &str, _| Formatted::new(raw.to_uppercase(), 0))
            .with_expiry_formatter(|_: &str, _| Formatted::new("MM/YY", 5))
            .with_cvv_formatter(|raw: &str, c| Formatted::new(raw, c));
        assert_eq!(rules.format_card_number("abc", 3).text, "ABC");
        assert_eq!(rules.format_expiry("1", 1).cursor, 5);
        assert_eq!(rules.format_cvv("x1", 2), Formatted::new("x1", 2));
    }

    #[test]
    fn test_debug_lists_overrides() {
        let rules = Rules::new().with_classifier(|_: &str| BrandLabel::empty());
        let debug = format!("{:?}", rules);
        assert!(debug.contains("classifier"));
        assert!(!debug.contains("luhn_checksum"));
    }
}
