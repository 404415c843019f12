//! Fuzz target for field formatting.
//!
//! Tests that formatters never panic, keep the caret in bounds and keep the
//! leading digits of arbitrary input.

#![no_main]

use cc_fields::detect::{is_probably_amex, max_digits_for};
use cc_fields::digits::{count_digits_before, extract_digits};
use cc_fields::format;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, u16)| {
    let (data, cursor) = input;
    let cursor = usize::from(cursor);
    let digits = extract_digits(data);

    let card = format::format_card_number(data, cursor);
    let expiry = format::format_expiry(data, cursor);
    let cvv = format::format_cvv(data, cursor);

    for out in [&card, &expiry, &cvv] {
        assert!(out.cursor <= out.text.chars().count(), "caret out of bounds");
    }

    // Digits survive formatting, up to the field limit
    let limit = max_digits_for(is_probably_amex(&digits));
    let kept = &digits[..digits.len().min(limit)];
    assert_eq!(extract_digits(&card.text), kept, "card digits changed");
    assert_eq!(extract_digits(&cvv.text), &digits[..digits.len().min(4)]);

    // The caret stays after the same logical digit
    let before = count_digits_before(data, cursor);
    assert_eq!(
        count_digits_before(&card.text, card.cursor),
        before.min(kept.len())
    );
});
