//! Ping round trips and retry continuations.
//!
//! When a backup request arrives for a partition this member does not
//! own, the gate pings the originating member once and suspends the
//! request. The remainder of processing resumes later, on whatever
//! thread delivers the ping response, through a [`RetryContinuation`].
//! No thread waits during the round trip, and no state beyond the
//! request instance itself is needed to resume.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::backup::gate::BackupReceiver;
use crate::backup::request::BackupRequest;

/// Result of a ping round trip.
///
/// Advisory only: the gate re-checks origin liveness itself on resume,
/// so a response racing with a member departure cannot bypass the
/// terminal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingOutcome {
    /// The originating member answered.
    Responded,
    /// The round trip failed or timed out.
    Unreachable,
}

/// One-shot resumption of a suspended backup request.
///
/// The request's `confirmed` flag is the continuation's state machine:
/// pending while false, confirmed forever once [`resume`](Self::resume)
/// runs. Resuming consumes the continuation, so the transition can only
/// happen once, and a resumed gate can never ping again.
#[derive(Debug)]
pub struct RetryContinuation {
    receiver: BackupReceiver,
    request: BackupRequest,
}

impl RetryContinuation {
    pub(crate) fn new(receiver: BackupReceiver, request: BackupRequest) -> Self {
        Self { receiver, request }
    }

    /// The suspended request, for transport-side diagnostics.
    pub fn request(&self) -> &BackupRequest {
        &self.request
    }

    /// Mark the request confirmed and re-run the ownership gate on it.
    pub fn resume(mut self, outcome: PingOutcome) {
        tracing::debug!(
            outcome = ?outcome,
            request = %self.request,
            "resuming backup request after ping"
        );
        self.request.mark_confirmed();
        self.receiver.on_received(self.request);
    }
}

// ---------------------------------------------------------------------------
// Outstanding-ping registry
// ---------------------------------------------------------------------------

/// Registry pairing in-flight pings with their continuations.
///
/// A transport registers the continuation when it issues the ping and
/// completes it when the response (or a delivery failure) comes back.
#[derive(Debug, Default)]
pub struct PingRegistry {
    pending: Mutex<HashMap<u64, RetryContinuation>>,
    next_id: AtomicU64,
}

impl PingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a continuation, returning the ping correlation id.
    pub fn register(&self, continuation: RetryContinuation) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.pending.lock().insert(id, continuation);
        id
    }

    /// Complete one ping, resuming its continuation. Returns false when
    /// the id is unknown (already completed, or never registered).
    pub fn complete(&self, ping_id: u64, outcome: PingOutcome) -> bool {
        let continuation = self.pending.lock().remove(&ping_id);
        match continuation {
            Some(continuation) => {
                continuation.resume(outcome);
                true
            }
            None => false,
        }
    }

    /// Resume every outstanding continuation with the given outcome.
    /// Used when the transport to the pinged member is torn down.
    pub fn complete_all(&self, outcome: PingOutcome) -> usize {
        let drained = std::mem::take(&mut *self.pending.lock());
        let count = drained.len();
        for (_, continuation) in drained {
            continuation.resume(outcome);
        }
        count
    }

    pub fn outstanding(&self) -> usize {
        self.pending.lock().len()
    }
}
