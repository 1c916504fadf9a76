use std::time::{Duration, Instant};

/// A one-shot payload that becomes available once its due instant passes.
///
/// The payload is owned by value, so whatever produced it can be dropped or
/// replaced before the deferred value fires.
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    due: Instant,
    payload: T,
}

impl<T> Deferred<T> {
    pub fn new(now: Instant, delay: Duration, payload: T) -> Self {
        Self {
            due: now + delay,
            payload,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}

/// Take the payload out of `slot` if it is due. Leaves a pending value in
/// place otherwise.
pub fn take_due<T>(slot: &mut Option<Deferred<T>>, now: Instant) -> Option<T> {
    match slot {
        Some(d) if d.is_due(now) => slot.take().map(|d| d.payload),
        _ => None,
    }
}
