use crate::models::{MatchupRequest, PredictionResultView};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Data carried across one redirect hop
///
/// Mirrors the two redirect targets of the prediction flow: back to the
/// submission step with the echoed input and an error message, or forward
/// to the result step with the full computed view.
#[derive(Debug, Clone)]
pub enum FlashPayload {
    SubmitRetry {
        request: MatchupRequest,
        error: String,
    },
    ResultView(Box<PredictionResultView>),
}

struct FlashEntry {
    payload: FlashPayload,
    placed_at: Instant,
}

/// Single-use handoff between request/response cycles
///
/// An arena of pending payloads keyed by a short-lived token. A value
/// placed here is visible to exactly one subsequent `take_once`; a second
/// read of the same token observes absent, never stale data. Entries that
/// outlive the TTL are pruned on insert, so an abandoned redirect cannot
/// grow the arena unboundedly. This is deliberately not a session store.
pub struct FlashStore {
    ttl: Duration,
    entries: Mutex<HashMap<Uuid, FlashEntry>>,
}

impl FlashStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a payload for the immediately following read and return the
    /// token that claims it.
    pub fn place(&self, payload: FlashPayload) -> Uuid {
        let token = Uuid::new_v4();
        let mut entries = self.entries.lock().expect("flash store mutex poisoned");
        entries.retain(|_, entry| entry.placed_at.elapsed() <= self.ttl);
        entries.insert(
            token,
            FlashEntry {
                payload,
                placed_at: Instant::now(),
            },
        );
        tracing::debug!("Flashed payload under token {}", token);
        token
    }

    /// Consume and clear the payload for a token.
    ///
    /// Returns `None` for unknown, already-consumed, and expired tokens
    /// alike; the caller cannot distinguish them and must not try.
    pub fn take_once(&self, token: &Uuid) -> Option<FlashPayload> {
        let mut entries = self.entries.lock().expect("flash store mutex poisoned");
        let entry = entries.remove(token)?;
        if entry.placed_at.elapsed() > self.ttl {
            tracing::debug!("Flash token {} expired before it was read", token);
            return None;
        }
        Some(entry.payload)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().expect("flash store mutex poisoned").len()
    }
}
