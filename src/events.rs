//! Status notifications.
//!
//! The engine publishes four kinds of [`Event`]. Hosts register listeners per
//! kind (or for all kinds) and get back a [`SubscriptionId`] that releases the
//! listener again via [`EventBus::unsubscribe`].
//!
//! Listeners run synchronously, in registration order, after the engine has
//! committed its new state. A listener that panics is logged and skipped: the
//! remaining listeners for the same event still run, and the panic never
//! reaches the code that triggered the update.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::error::EngineError;
use crate::status::{CardFieldState, CvvFieldState, ExpiryFieldState};

/// A notification published by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The card field state changed (status, brand, Amex flag, limit).
    CardStatusChanged(CardFieldState),
    /// The expiry field state changed (status, month, year).
    ExpiryStatusChanged(ExpiryFieldState),
    /// The CVV field state changed (status, expected length, Amex flag).
    CvvStatusChanged(CvvFieldState),
    /// The all-fields-valid flag flipped.
    AllValidChanged(bool),
}

impl Event {
    /// Returns the kind of this event.
    #[inline]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::CardStatusChanged(_) => EventKind::CardStatus,
            Self::ExpiryStatusChanged(_) => EventKind::ExpiryStatus,
            Self::CvvStatusChanged(_) => EventKind::CvvStatus,
            Self::AllValidChanged(_) => EventKind::AllValid,
        }
    }
}

/// Discriminant of [`Event`], used to filter subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`Event::CardStatusChanged`]
    CardStatus,
    /// [`Event::ExpiryStatusChanged`]
    ExpiryStatus,
    /// [`Event::CvvStatusChanged`]
    CvvStatus,
    /// [`Event::AllValidChanged`]
    AllValid,
}

/// Handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wraps a raw id. Ids handed out by an [`EventBus`] start at 1.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[inline]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A boxed listener callback.
pub type Listener = Box<dyn FnMut(&Event)>;

struct Subscriber {
    id: SubscriptionId,
    kind: Option<EventKind>,
    listener: Listener,
}

impl Subscriber {
    #[inline]
    fn wants(&self, kind: EventKind) -> bool {
        self.kind.map_or(true, |k| k == kind)
    }
}

/// Ordered registry of listeners.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
    failures: usize,
}

impl EventBus {
    /// Creates an empty bus.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for one kind of event.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&Event) + 'static,
    ) -> SubscriptionId {
        self.register(Some(kind), Box::new(listener))
    }

    /// Registers a listener for every event.
    pub fn subscribe_all(&mut self, listener: impl FnMut(&Event) + 'static) -> SubscriptionId {
        self.register(None, Box::new(listener))
    }

    fn register(&mut self, kind: Option<EventKind>, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push(Subscriber { id, kind, listener });
        tracing::trace!(subscription = %id, ?kind, "listener registered");
        id
    }

    /// Removes a listener.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSubscription`] if `id` is not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), EngineError> {
        let index = self
            .subscribers
            .iter()
            .position(|s| s.id == id)
            .ok_or(EngineError::UnknownSubscription(id))?;
        self.subscribers.remove(index);
        tracing::trace!(subscription = %id, "listener removed");
        Ok(())
    }

    /// Delivers `event` to every interested listener.
    ///
    /// Returns the number of listeners that panicked.
    pub fn emit(&mut self, event: &Event) -> usize {
        let kind = event.kind();
        let mut failed = 0;

        for subscriber in self.subscribers.iter_mut().filter(|s| s.wants(kind)) {
            let listener = &mut subscriber.listener;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(event)));
            if outcome.is_err() {
                failed += 1;
                tracing::warn!(
                    subscription = %subscriber.id,
                    ?kind,
                    "listener panicked; continuing with remaining listeners"
                );
            }
        }

        self.failures += failed;
        failed
    }

    /// Returns the number of registered listeners.
    #[inline]
    pub fn listener_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns how many listener invocations have panicked so far.
    #[inline]
    pub fn failed_notifications(&self) -> usize {
        self.failures
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.subscribers.len())
            .field("failures", &self.failures)
            .finish()
    }
}
