//! Fuzz target for the stateful engine.
//!
//! Replays arbitrary edit sequences and checks that the engine never panics
//! and that its aggregate flag always matches the three field statuses.

#![no_main]

use arbitrary::Arbitrary;
use cc_fields::{EngineOptions, Field, FixedClock, Status, YearMonth};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Edit {
    field: u8,
    raw: String,
    cursor: u8,
}

fuzz_target!(|edits: Vec<Edit>| {
    let Ok(today) = YearMonth::new(2024, 6) else {
        return;
    };
    let mut fields = EngineOptions::new().clock(FixedClock(today)).build();
    fields.on_all_valid(|_| {});
    fields.initialize();

    for edit in edits.iter().take(64) {
        let field = Field::ALL[usize::from(edit.field) % Field::ALL.len()];
        let out = fields.input(field, &edit.raw, usize::from(edit.cursor));
        assert_eq!(fields.text(field), out.text);

        let status = fields.status();
        assert_eq!(
            status.all_valid(),
            [status.card(), status.expiry(), status.cvv()]
                .iter()
                .all(|s| *s == Status::Valid)
        );
    }
});
