//! The stateful engine bound to one card form.
//!
//! `PaymentFields` owns the text of the three fields, their evaluated states,
//! the aggregate flag and the listeners. Every public mutation runs one
//! complete pass (format, evaluate, aggregate, notify) before returning:
//!
//! ```text
//! raw + cursor -> formatter -> text + cursor -> evaluator -> state -> aggregator -> flag
//! ```
//!
//! Editing the card number always re-evaluates the CVV as well, because the
//! expected CVV length follows the card's Amex flag.
//!
//! The engine is single threaded by construction: listeners are plain
//! `FnMut` closures and are invoked synchronously. One form, one engine.
//!
//! # Example
//!
//! ```
//! use cc_fields::clock::{FixedClock, YearMonth};
//! use cc_fields::engine::EngineOptions;
//!
//! let mut fields = EngineOptions::new()
//!     .clock(FixedClock(YearMonth::new(2024, 6).unwrap()))
//!     .build();
//! fields.initialize();
//!
//! let out = fields.input_card_number("41111", 5);
//! assert_eq!(out.text, "4111 1");
//! assert_eq!(out.cursor, 6);
//!
//! fields.input_card_number("4111111111111111", 16);
//! fields.input_expiry("1228", 4);
//! fields.input_cvv("123", 3);
//! assert!(fields.status().all_valid());
//! ```

use std::fmt;

use zeroize::Zeroizing;

use crate::aggregate::{AggregateState, Aggregator};
use crate::clock::{Clock, SystemClock};
use crate::error::EngineError;
use crate::events::{Event, EventBus, EventKind, SubscriptionId};
use crate::format::Formatted;
use crate::rules::Rules;
use crate::status::{
    CardFieldState, CvvFieldState, ExpiryFieldState, Field, Status, DEFAULT_EXPIRY_WINDOW_YEARS,
};

/// Construction options for [`PaymentFields`].
pub struct EngineOptions {
    card: Zeroizing<String>,
    expiry: Zeroizing<String>,
    cvv: Zeroizing<String>,
    rules: Rules,
    clock: Box<dyn Clock>,
    expiry_window_years: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            card: Zeroizing::new(String::new()),
            expiry: Zeroizing::new(String::new()),
            cvv: Zeroizing::new(String::new()),
            rules: Rules::default(),
            clock: Box::new(SystemClock),
            expiry_window_years: DEFAULT_EXPIRY_WINDOW_YEARS,
        }
    }
}

impl EngineOptions {
    /// Options with empty fields, built-in rules and the system clock.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current text of the card number field.
    pub fn card_number(mut self, text: impl Into<String>) -> Self {
        self.card = Zeroizing::new(text.into());
        self
    }

    /// Sets the current text of the expiry field.
    pub fn expiry(mut self, text: impl Into<String>) -> Self {
        self.expiry = Zeroizing::new(text.into());
        self
    }

    /// Sets the current text of the CVV field.
    pub fn cvv(mut self, text: impl Into<String>) -> Self {
        self.cvv = Zeroizing::new(text.into());
        self
    }

    /// Replaces the formatting and classification rules.
    pub fn rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the source of the current month.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Sets how many years ahead an expiry date may be.
    pub fn expiry_window_years(mut self, years: u32) -> Self {
        self.expiry_window_years = years;
        self
    }

    /// Builds the engine. Call [`PaymentFields::initialize`] before use.
    pub fn build(self) -> PaymentFields {
        PaymentFields {
            card_text: self.card,
            expiry_text: self.expiry,
            cvv_text: self.cvv,
            card: CardFieldState::default(),
            expiry: ExpiryFieldState::default(),
            cvv: CvvFieldState::default(),
            aggregator: Aggregator::new(),
            rules: self.rules,
            clock: self.clock,
            expiry_window_years: self.expiry_window_years,
            bus: EventBus::new(),
        }
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("rules", &self.rules)
            .field("expiry_window_years", &self.expiry_window_years)
            .finish_non_exhaustive()
    }
}

/// Formatting and validation state for one card form.
pub struct PaymentFields {
    card_text: Zeroizing<String>,
    expiry_text: Zeroizing<String>,
    cvv_text: Zeroizing<String>,
    card: CardFieldState,
    expiry: ExpiryFieldState,
    cvv: CvvFieldState,
    aggregator: Aggregator,
    rules: Rules,
    clock: Box<dyn Clock>,
    expiry_window_years: u32,
    bus: EventBus,
}

impl PaymentFields {
    /// Creates an engine over the given field texts with default options.
    pub fn new(
        card: impl Into<String>,
        expiry: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        EngineOptions::new()
            .card_number(card)
            .expiry(expiry)
            .cvv(cvv)
            .build()
    }

    /// Runs the first pass over all three fields.
    ///
    /// Each stored text is formatted with the caret at its end, then every
    /// field is evaluated. All three field events are published regardless
    /// of change so listeners registered up front see the starting picture;
    /// the all-valid event follows the usual flip-only rule.
    pub fn initialize(&mut self) {
        for field in Field::ALL {
            let text = Zeroizing::new(self.text(field).to_owned());
            let end = text.chars().count();
            self.apply_format(field, &text, end);
        }
        tracing::debug!("initializing payment fields");
        self.refresh(&Field::ALL, true);
    }

    /// Handles an edit of the card number field.
    ///
    /// Returns the reformatted text and caret for the host to write back.
    pub fn input_card_number(&mut self, raw: &str, cursor: usize) -> Formatted {
        self.input(Field::Card, raw, cursor)
    }

    /// Handles an edit of the expiry field.
    pub fn input_expiry(&mut self, raw: &str, cursor: usize) -> Formatted {
        self.input(Field::Expiry, raw, cursor)
    }

    /// Handles an edit of the CVV field.
    pub fn input_cvv(&mut self, raw: &str, cursor: usize) -> Formatted {
        self.input(Field::Cvv, raw, cursor)
    }

    /// Handles an edit of any field.
    pub fn input(&mut self, field: Field, raw: &str, cursor: usize) -> Formatted {
        let out = self.apply_format(field, raw, cursor);
        match field {
            Field::Card => self.refresh(&[Field::Card, Field::Cvv], false),
            Field::Expiry => self.refresh(&[Field::Expiry], false),
            Field::Cvv => self.refresh(&[Field::Cvv], false),
        }
        out
    }

    /// Returns the current aggregate snapshot.
    #[inline]
    pub fn status(&self) -> AggregateState {
        self.aggregator.state()
    }

    /// Returns a copy of the card field state.
    pub fn card_state(&self) -> CardFieldState {
        self.card.clone()
    }

    /// Returns a copy of the expiry field state.
    pub fn expiry_state(&self) -> ExpiryFieldState {
        self.expiry.clone()
    }

    /// Returns a copy of the CVV field state.
    pub fn cvv_state(&self) -> CvvFieldState {
        self.cvv.clone()
    }

    /// Returns the current (formatted) text of a field.
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Card => &self.card_text,
            Field::Expiry => &self.expiry_text,
            Field::Cvv => &self.cvv_text,
        }
    }

    /// Registers a listener for one kind of event.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&Event) + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(kind, listener)
    }

    /// Registers a listener for every event.
    pub fn subscribe_all(&mut self, listener: impl FnMut(&Event) + 'static) -> SubscriptionId {
        self.bus.subscribe_all(listener)
    }

    /// Registers a listener for card field changes.
    pub fn on_card_status(
        &mut self,
        mut listener: impl FnMut(&CardFieldState) + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(EventKind::CardStatus, move |event| {
            if let Event::CardStatusChanged(state) = event {
                listener(state);
            }
        })
    }

    /// Registers a listener for expiry field changes.
    pub fn on_expiry_status(
        &mut self,
        mut listener: impl FnMut(&ExpiryFieldState) + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(EventKind::ExpiryStatus, move |event| {
            if let Event::ExpiryStatusChanged(state) = event {
                listener(state);
            }
        })
    }

    /// Registers a listener for CVV field changes.
    pub fn on_cvv_status(
        &mut self,
        mut listener: impl FnMut(&CvvFieldState) + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(EventKind::CvvStatus, move |event| {
            if let Event::CvvStatusChanged(state) = event {
                listener(state);
            }
        })
    }

    /// Registers a listener for flips of the all-valid flag.
    pub fn on_all_valid(&mut self, mut listener: impl FnMut(bool) + 'static) -> SubscriptionId {
        self.bus.subscribe(EventKind::AllValid, move |event| {
            if let Event::AllValidChanged(all_valid) = event {
                listener(*all_valid);
            }
        })
    }

    /// Removes a listener.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSubscription`] if `id` is not registered
    /// with this engine.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), EngineError> {
        self.bus.unsubscribe(id)
    }

    /// Returns how many listener invocations have panicked so far.
    #[inline]
    pub fn failed_notifications(&self) -> usize {
        self.bus.failed_notifications()
    }

    fn apply_format(&mut self, field: Field, raw: &str, cursor: usize) -> Formatted {
        let out = match field {
            Field::Card => self.rules.format_card_number(raw, cursor),
            Field::Expiry => self.rules.format_expiry(raw, cursor),
            Field::Cvv => self.rules.format_cvv(raw, cursor),
        };

        tracing::trace!(
            %field,
            cursor_in = cursor,
            cursor_out = out.cursor,
            len = out.text.len(),
            "formatted"
        );

        let slot = match field {
            Field::Card => &mut self.card_text,
            Field::Expiry => &mut self.expiry_text,
            Field::Cvv => &mut self.cvv_text,
        };
        *slot = Zeroizing::new(out.text.clone());
        out
    }

    /// Re-evaluates `fields` in order, commits, then publishes.
    ///
    /// A field event is published only when the verdict or its metadata
    /// moved; new digits alone are not news.
    fn refresh(&mut self, fields: &[Field], force: bool) {
        let mut events = Vec::with_capacity(fields.len() + 1);

        for &field in fields {
            match field {
                Field::Card => {
                    let next = CardFieldState::evaluate(&self.card_text, &self.rules);
                    log_transition(field, self.card.status(), next.status());
                    if force || !next.same_report(&self.card) {
                        events.push(Event::CardStatusChanged(next.clone()));
                    }
                    self.card = next;
                }
                Field::Expiry => {
                    let next = ExpiryFieldState::evaluate(
                        &self.expiry_text,
                        self.clock.today(),
                        self.expiry_window_years,
                    );
                    log_transition(field, self.expiry.status(), next.status());
                    if force || !next.same_report(&self.expiry) {
                        events.push(Event::ExpiryStatusChanged(next.clone()));
                    }
                    self.expiry = next;
                }
                Field::Cvv => {
                    let next = CvvFieldState::evaluate(&self.cvv_text, self.card.is_amex());
                    log_transition(field, self.cvv.status(), next.status());
                    if force || !next.same_report(&self.cvv) {
                        events.push(Event::CvvStatusChanged(next.clone()));
                    }
                    self.cvv = next;
                }
            }
        }

        if let Some(all_valid) =
            self.aggregator
                .update(self.card.status(), self.expiry.status(), self.cvv.status())
        {
            tracing::debug!(all_valid, "all-valid flag flipped");
            events.push(Event::AllValidChanged(all_valid));
        }

        for event in &events {
            self.bus.emit(event);
        }
    }
}

fn log_transition(field: Field, from: Status, to: Status) {
    if from != to {
        tracing::debug!(%field, %from, %to, "field status changed");
    }
}

impl fmt::Debug for PaymentFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentFields")
            .field("card", &self.card)
            .field("expiry", &self.expiry)
            .field("cvv", &self.cvv)
            .field("status", &self.aggregator.state())
            .field("rules", &self.rules)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{BrandLabel, CardBrand};
    use crate::clock::{FixedClock, YearMonth};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine() -> PaymentFields {
        let mut fields = EngineOptions::new()
            .clock(FixedClock(YearMonth::new(2024, 6).unwrap()))
            .build();
        fields.initialize();
        fields
    }

    fn event_log(fields: &mut PaymentFields) -> Rc<RefCell<Vec<Event>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        fields.subscribe_all(move |e| sink.borrow_mut().push(e.clone()));
        log
    }

    #[test]
    fn test_initialize_formats_and_evaluates_existing_text() {
        let mut fields = EngineOptions::new()
            .card_number("4111111111111111")
            .expiry("0626")
            .cvv("123")
            .clock(FixedClock(YearMonth::new(2024, 6).unwrap()))
            .build();
        let log = event_log(&mut fields);
        fields.initialize();

        assert_eq!(fields.text(Field::Card), "4111 1111 1111 1111");
        assert_eq!(fields.text(Field::Expiry), "06 / 26");
        assert!(fields.status().all_valid());

        let kinds: Vec<_> = log.borrow().iter().map(Event::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::CardStatus,
                EventKind::ExpiryStatus,
                EventKind::CvvStatus,
                EventKind::AllValid
            ]
        );
    }

    #[test]
    fn test_initialize_empty_announces_fields_but_not_flag() {
        let mut fields = PaymentFields::new("", "", "");
        let log = event_log(&mut fields);
        fields.initialize();

        assert_eq!(log.borrow().len(), 3);
        assert!(!log
            .borrow()
            .iter()
            .any(|e| e.kind() == EventKind::AllValid));
        assert_eq!(fields.status(), AggregateState::default());
    }

    #[test]
    fn test_card_edit_reevaluates_cvv() {
        let mut fields = engine();
        fields.input_cvv("1234", 4);
        assert_eq!(fields.cvv_state().status(), Status::Invalid);
        assert_eq!(fields.cvv_state().expected_length(), 3);

        // CVV text untouched, but the card turns Amex
        fields.input_card_number("37", 2);
        assert_eq!(fields.cvv_state().status(), Status::Valid);
        assert_eq!(fields.cvv_state().expected_length(), 4);
        assert!(fields.cvv_state().is_amex());
        assert_eq!(fields.text(Field::Cvv), "1234");
    }

    #[test]
    fn test_unchanged_report_is_silent() {
        let mut fields = engine();
        let log = event_log(&mut fields);

        // Still neutral with no month: nothing to report
        fields.input_expiry("1", 1);
        fields.input_expiry("12 / 2", 6);
        assert!(log.borrow().is_empty());

        fields.input_expiry("12 / 28", 7);
        assert_eq!(log.borrow().len(), 1);

        // Same text again: nothing changes, nothing is published
        fields.input_expiry("1228", 4);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_card_event_carries_brand_while_neutral() {
        let mut fields = engine();
        let brands = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&brands);
        fields.on_card_status(move |state| {
            sink.borrow_mut()
                .push((state.brand().clone(), state.status()))
        });

        fields.input_card_number("4", 1);
        fields.input_card_number("41", 2);
        fields.input_card_number("4111111111111111", 16);

        let visa = BrandLabel::from(CardBrand::Visa);
        let brands = brands.borrow();
        assert_eq!(
            *brands,
            vec![(visa.clone(), Status::Neutral), (visa, Status::Valid)]
        );
    }

    #[test]
    fn test_all_valid_flips() {
        let mut fields = engine();
        let flips = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&flips);
        fields.on_all_valid(move |v| sink.borrow_mut().push(v));

        fields.input_card_number("4111111111111111", 16);
        fields.input_expiry("0626", 4);
        assert!(flips.borrow().is_empty());

        fields.input_cvv("123", 3);
        assert_eq!(*flips.borrow(), vec![true]);

        fields.input_cvv("123", 3);
        fields.input_expiry("06 / 26", 7);
        assert_eq!(*flips.borrow(), vec![true]);

        fields.input_cvv("12", 2);
        assert_eq!(*flips.borrow(), vec![true, false]);
    }

    #[test]
    fn test_listener_panic_does_not_corrupt_state() {
        let mut fields = engine();
        fields.on_card_status(|_| panic!("bad listener"));
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        fields.on_card_status(move |_| *sink.borrow_mut() += 1);

        let out = fields.input_card_number("4111111111111111", 16);
        assert_eq!(out.text, "4111 1111 1111 1111");
        assert_eq!(fields.card_state().status(), Status::Valid);
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(fields.failed_notifications(), 1);
    }

    #[test]
    fn test_unsubscribe_through_engine() {
        let mut fields = engine();
        let id = fields.on_all_valid(|_| {});
        assert!(fields.unsubscribe(id).is_ok());
        assert!(matches!(
            fields.unsubscribe(id),
            Err(EngineError::UnknownSubscription(_))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_digits() {
        let mut fields = engine();
        fields.input_card_number("4111111111111111", 16);
        fields.input_cvv("987", 3);
        let debug = format!("{:?}", fields);
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("987"));
    }
}
