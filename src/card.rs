//! Card brand types.
//!
//! This module provides the `CardBrand` enum for the networks the built-in
//! classifier knows about, and `BrandLabel`, the value the classifier actually
//! hands to field state: possibly empty (nothing typed yet) and possibly a
//! custom name produced by an overridden classifier.

use std::borrow::Cow;
use std::fmt;

/// Maximum number of digits accepted in an American Express number.
pub const AMEX_MAX_DIGITS: usize = 15;

/// Maximum number of digits accepted for every non-Amex number.
pub const DEFAULT_MAX_DIGITS: usize = 16;

/// Card networks recognised by the built-in classifier.
///
/// Each variant represents a payment network identified by the leading
/// digits of the card number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CardBrand {
    /// Visa - Prefix 4
    Visa,
    /// Mastercard - Prefix 51-55, 2221-2720
    Mastercard,
    /// American Express - Prefix 34, 37
    Amex,
    /// Discover - Prefix 6011, 644-649, 65
    Discover,
    /// JCB - Prefix 35
    Jcb,
    /// Diners Club - Prefix 36, 38, 300-305
    DinersClub,
    /// UnionPay - Prefix 62
    UnionPay,
    /// Digits were present but matched no known prefix.
    Unknown,
}

impl CardBrand {
    /// Every brand, in classifier precedence order.
    pub const ALL: [CardBrand; 8] = [
        Self::Visa,
        Self::Mastercard,
        Self::Amex,
        Self::Discover,
        Self::Jcb,
        Self::DinersClub,
        Self::UnionPay,
        Self::Unknown,
    ];

    /// Returns a human-readable name for the card brand.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Visa => "Visa",
            Self::Mastercard => "Mastercard",
            Self::Amex => "American Express",
            Self::Discover => "Discover",
            Self::Jcb => "JCB",
            Self::DinersClub => "Diners Club",
            Self::UnionPay => "UnionPay",
            Self::Unknown => "Unknown",
        }
    }

    /// Looks a brand up by the name returned from [`CardBrand::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Returns the security code length printed on cards of this brand.
    ///
    /// - American Express: 4 digits
    /// - All other brands: 3 digits
    #[inline]
    pub const fn cvv_length(&self) -> usize {
        match self {
            Self::Amex => 4,
            _ => 3,
        }
    }

    /// Returns the number of digits the card field accepts for this brand.
    #[inline]
    pub const fn max_digits(&self) -> usize {
        match self {
            Self::Amex => AMEX_MAX_DIGITS,
            _ => DEFAULT_MAX_DIGITS,
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Display label produced by a brand classifier.
///
/// The empty label means "nothing to classify yet" and is distinct from
/// `"Unknown"`, which means digits were typed but no rule matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct BrandLabel(Cow<'static, str>);

impl BrandLabel {
    /// The empty label.
    #[inline]
    pub const fn empty() -> Self {
        Self(Cow::Borrowed(""))
    }

    /// A free-form label, e.g. from a custom classifier.
    pub fn custom(label: impl Into<String>) -> Self {
        Self(Cow::Owned(label.into()))
    }

    /// Returns the label text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty label.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the built-in brand this label names, if any.
    pub fn brand(&self) -> Option<CardBrand> {
        CardBrand::from_name(&self.0)
    }
}

impl From<CardBrand> for BrandLabel {
    fn from(brand: CardBrand) -> Self {
        Self(Cow::Borrowed(brand.name()))
    }
}

impl fmt::Display for BrandLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
