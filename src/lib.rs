//! # cc_fields
//!
//! Live formatting and validation for payment card input fields.
//!
//! Bind a [`PaymentFields`] engine to a card form with three text inputs:
//! card number, expiry date and security code. On every edit the engine
//! reformats the field, moves the caret to the right spot, re-evaluates the
//! field and tells listeners when anything changed.
//!
//! ## Features
//!
//! - As-you-type card grouping (`4-4-4-4`, Amex `4-6-5`) with caret tracking
//! - `MM / YY` expiry formatting, checked against a rolling window
//! - Brand classification for seven networks, Amex-aware CVV length
//! - Luhn checksum validation
//! - Replaceable rules: every formatter, classifier and checksum
//! - Change-only notifications plus a single "ready to pay" flag
//!
//! ## Quick Start
//!
//! ```rust
//! use cc_fields::{EngineOptions, FixedClock, Status, YearMonth};
//!
//! let mut fields = EngineOptions::new()
//!     .clock(FixedClock(YearMonth::new(2024, 6).unwrap()))
//!     .build();
//! fields.on_all_valid(|ready| println!("submit enabled: {}", ready));
//! fields.initialize();
//!
//! // The host writes the returned text and caret back into the input
//! let out = fields.input_card_number("37828224631", 11);
//! assert_eq!(out.text, "3782 822463 1");
//! assert_eq!(out.cursor, 13);
//! assert!(fields.card_state().is_amex());
//!
//! fields.input_card_number("378282246310005", 15);
//! fields.input_expiry("1226", 4);
//! fields.input_cvv("1234", 4);
//!
//! assert_eq!(fields.cvv_state().status(), Status::Valid);
//! assert!(fields.status().all_valid());
//! ```
//!
//! ## Pure Helpers
//!
//! The building blocks are usable without an engine:
//!
//! ```rust
//! use cc_fields::{format, luhn, detect};
//!
//! assert_eq!(format::format_expiry("122", 3).text, "12 / 2");
//! assert_eq!(format::format_cvv("12a34", 5).text, "1234");
//! assert_eq!(luhn::checksum("4111111111111111"), 0);
//! assert_eq!(detect::classify("6011").as_str(), "Discover");
//! ```
//!
//! ## Supported Card Brands
//!
//! | Brand | Prefix | Digits | CVV |
//! |-------|--------|--------|-----|
//! | Visa | 4 | 16 | 3 |
//! | Mastercard | 51-55, 2221-2720 | 16 | 3 |
//! | American Express | 34, 37 | 15 | 4 |
//! | Discover | 6011, 644-649, 65 | 16 | 3 |
//! | JCB | 35 | 16 | 3 |
//! | Diners Club | 36, 38, 300-305 | 16 | 3 |
//! | UnionPay | 62 | 16 | 3 |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | `Serialize` for states and snapshots |
//! | `cli` | The `ccfields` command-line tool |
//!
//! ## Security
//!
//! - Field text held by the engine and the digits inside evaluated states
//!   are zeroized when dropped; the text handed back to the host is the
//!   host's to manage
//! - Listeners see verdicts and metadata, never the digits
//! - `Debug` output masks card numbers and security codes
//! - Log events carry statuses and lengths, never digits
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod card;
pub mod clock;
pub mod detect;
pub mod digits;
pub mod engine;
pub mod error;
pub mod events;
pub mod format;
pub mod luhn;
pub mod mask;
pub mod rules;
pub mod status;

// Re-export main types at crate root
pub use aggregate::{AggregateState, Aggregator};
pub use card::{BrandLabel, CardBrand};
pub use clock::{Clock, FixedClock, SystemClock, YearMonth};
pub use engine::{EngineOptions, PaymentFields};
pub use error::EngineError;
pub use events::{Event, EventKind, SubscriptionId};
pub use format::Formatted;
pub use rules::Rules;
pub use status::{CardFieldState, CvvFieldState, ExpiryFieldState, Field, Status};
