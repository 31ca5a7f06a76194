//! Generation tracking for repeated searches.
//!
//! Each logical query (the job search box, say) owns one [`RequestTracker`].
//! Every issued request takes a ticket with a fresh generation number, and a
//! response may only be applied if its ticket is still the newest one. A
//! request whose key matches the last completed request is skipped outright.

use std::sync::{Mutex, PoisonError};

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    key: String,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    generation: u64,
    latest_key: Option<String>,
    completed: bool,
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    state: Mutex<TrackerState>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for `key`, or `None` when the newest request already
    /// completed for the same key.
    pub fn begin(&self, key: &str) -> Option<RequestTicket> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.completed && state.latest_key.as_deref() == Some(key) {
            debug!(key, "skipping duplicate request");
            return None;
        }

        state.generation += 1;
        state.latest_key = Some(key.to_string());
        state.completed = false;
        Some(RequestTicket {
            generation: state.generation,
            key: key.to_string(),
        })
    }

    /// Marks `ticket` complete. Returns false when a newer request has been
    /// issued since, in which case the response must be discarded.
    pub fn finish(&self, ticket: &RequestTicket) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket.generation != state.generation {
            debug!(
                key = %ticket.key,
                generation = ticket.generation,
                latest = state.generation,
                "discarding superseded response"
            );
            return false;
        }
        state.completed = true;
        true
    }

    /// Forgets a failed request so the same key can be retried.
    pub fn abandon(&self, ticket: &RequestTicket) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket.generation == state.generation {
            state.latest_key = None;
            state.completed = false;
        }
    }

    pub fn latest_generation(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_key_is_not_fetched_again() {
        let tracker = RequestTracker::new();
        let ticket = tracker.begin("a").expect("first request issues");
        assert!(tracker.finish(&ticket));
        assert!(tracker.begin("a").is_none());
        assert!(tracker.begin("b").is_some());
    }

    #[test]
    fn in_flight_key_may_be_reissued() {
        let tracker = RequestTracker::new();
        let first = tracker.begin("a").expect("issues");
        let second = tracker.begin("a").expect("not completed yet, so reissued");
        assert!(second.generation() > first.generation());
        assert!(!tracker.finish(&first));
        assert!(tracker.finish(&second));
    }

    #[test]
    fn older_response_cannot_overwrite_newer_query() {
        let tracker = RequestTracker::new();
        let old = tracker.begin("filters=a").expect("issues");
        let newer = tracker.begin("filters=b").expect("issues");
        let back = tracker.begin("filters=a").expect("issues");

        assert!(!tracker.finish(&old));
        assert!(!tracker.finish(&newer));
        assert!(tracker.finish(&back));
        assert_eq!(tracker.latest_generation(), back.generation());
    }

    #[test]
    fn abandoned_request_can_be_retried() {
        let tracker = RequestTracker::new();
        let ticket = tracker.begin("a").expect("issues");
        tracker.abandon(&ticket);
        let retry = tracker.begin("a").expect("retry issues");
        assert!(tracker.finish(&retry));
        assert_eq!(retry.key(), "a");
    }
}
