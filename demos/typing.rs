//! Simulated card form typing session.
//!
//! Run with: `cargo run --example typing`

use cc_fields::{EngineOptions, Event, Field, FixedClock, PaymentFields, YearMonth};

/// Types `text` into `field` one character at a time, echoing each pass.
fn type_slowly(fields: &mut PaymentFields, field: Field, text: &str) {
    for c in text.chars() {
        let mut raw = fields.text(field).to_owned();
        raw.push(c);
        let cursor = raw.chars().count();
        let out = fields.input(field, &raw, cursor);

        // Show the caret inside the field
        let (left, right) = out.text.split_at(out.cursor);
        println!("    {:<7} [{}|{}]", field, left, right);
    }
}

fn main() {
    println!("=== Card Form Typing ===\n");

    let today = YearMonth::new(2024, 6).expect("valid month");
    let mut fields = EngineOptions::new().clock(FixedClock(today)).build();

    fields.subscribe_all(|event| match event {
        Event::CardStatusChanged(card) => println!(
            "      -> card {} (brand: {:?}, max {} digits)",
            card.status(),
            card.brand().as_str(),
            card.max_digits()
        ),
        Event::ExpiryStatusChanged(expiry) => println!("      -> expiry {}", expiry.status()),
        Event::CvvStatusChanged(cvv) => println!(
            "      -> cvv {} (expects {} digits)",
            cvv.status(),
            cvv.expected_length()
        ),
        Event::AllValidChanged(ready) => println!("      => ready to pay: {}", ready),
    });
    fields.initialize();

    // -------------------------------------------------------------------------
    // American Express: 4-6-5 grouping and a four-digit code
    // -------------------------------------------------------------------------
    println!("\n--- Amex ---\n");
    type_slowly(&mut fields, Field::Card, "378282246310005");
    type_slowly(&mut fields, Field::Expiry, "1128");
    type_slowly(&mut fields, Field::Cvv, "1234");

    // -------------------------------------------------------------------------
    // Switching to Visa invalidates the four-digit code
    // -------------------------------------------------------------------------
    println!("\n--- Switch to Visa ---\n");
    let out = fields.input_card_number("4111111111111111", 16);
    println!("    card    [{}]", out.text);

    // -------------------------------------------------------------------------
    // Editing in the middle keeps the caret on the same digit
    // -------------------------------------------------------------------------
    println!("\n--- Mid-field edit ---\n");
    let out = fields.input_card_number("4111 91111 1111 1111", 6);
    let (left, right) = out.text.split_at(out.cursor);
    println!("    card    [{}|{}]", left, right);

    println!("\nFinal: {:?}", fields.status());
}
