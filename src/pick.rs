//! Interactive folder pick bookkeeping.
//!
//! A pick is a single-shot continuation. `begin` parks a reply channel under a
//! fresh request id and the chooser outcome later resolves it through
//! `finish`. At most `capacity` picks may be pending; extra attempts are
//! refused rather than displacing the caller already waiting.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::Result;
use crate::error::PluginError;
use crate::library::AudioFile;

pub type RequestId = Uuid;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PickState {
    Idle,
    AwaitingUserSelection,
    Resolving,
    Scanning,
    Resolved,
    Failed,
}

impl PickState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PickState::Resolved | PickState::Failed)
    }

    fn can_advance_to(self, next: PickState) -> bool {
        use PickState::*;
        matches!(
            (self, next),
            (AwaitingUserSelection, Resolving)
                | (Resolving, Scanning)
                | (AwaitingUserSelection | Resolving | Scanning, Failed)
                | (Scanning, Resolved)
        )
    }
}

/// What the folder chooser handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooserOutcome {
    Selected(String),
    Cancelled,
}

impl From<Option<String>> for ChooserOutcome {
    fn from(uri: Option<String>) -> Self {
        match uri {
            Some(uri) if !uri.is_empty() => ChooserOutcome::Selected(uri),
            _ => ChooserOutcome::Cancelled,
        }
    }
}

/// Successful pick payload, shaped by how the folder was scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PickResponse {
    Path {
        files: Vec<AudioFile>,
        path: PathBuf,
    },
    Tree {
        files: Vec<AudioFile>,
        uri: String,
        count: usize,
    },
}

impl PickResponse {
    pub fn files(&self) -> &[AudioFile] {
        match self {
            PickResponse::Path { files, .. } | PickResponse::Tree { files, .. } => files,
        }
    }
}

type Reply = Result<PickResponse>;

/// The caller's side of a pending pick.
pub struct PickHandle {
    id: RequestId,
    rx: Receiver<Reply>,
}

impl PickHandle {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Block until the pick resolves.
    pub fn wait(self) -> Result<PickResponse> {
        self.rx
            .recv()
            .unwrap_or_else(|_| Err(PluginError::Pick("pick abandoned".to_string())))
    }

    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<PickResponse>> {
        match self.rx.recv_timeout(timeout) {
            Ok(reply) => Some(reply),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                Some(Err(PluginError::Pick("pick abandoned".to_string())))
            }
        }
    }

    /// Non-blocking poll; `None` while the pick is still pending.
    pub fn try_result(&self) -> Option<Result<PickResponse>> {
        match self.rx.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(PluginError::Pick("pick abandoned".to_string())))
            }
        }
    }
}

struct Pending {
    state: PickState,
    reply: SyncSender<Reply>,
}

#[derive(Default)]
struct Slots {
    pending: HashMap<RequestId, Pending>,
    last_finished: Option<(RequestId, PickState)>,
}

pub struct PickRegistry {
    capacity: usize,
    slots: Mutex<Slots>,
}

impl Default for PickRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PickRegistry {
    /// A registry allowing a single pick in flight.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            slots: Mutex::new(Slots::default()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve a slot and return the caller's handle.
    pub fn begin(&self) -> Result<PickHandle> {
        let mut slots = self.slots();
        if slots.pending.len() >= self.capacity {
            return Err(PluginError::PickInFlight);
        }

        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::sync_channel(1);
        slots.pending.insert(
            id,
            Pending {
                state: PickState::AwaitingUserSelection,
                reply: tx,
            },
        );
        debug!(%id, "pick awaiting user selection");
        Ok(PickHandle { id, rx })
    }

    pub fn state(&self, id: RequestId) -> PickState {
        let slots = self.slots();
        if let Some(p) = slots.pending.get(&id) {
            return p.state;
        }
        match slots.last_finished {
            Some((last, state)) if last == id => state,
            _ => PickState::Idle,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.slots().pending.len()
    }

    /// Move a pending pick to a non-terminal state.
    pub fn advance(&self, id: RequestId, next: PickState) -> Result<()> {
        let mut slots = self.slots();
        let pending = slots
            .pending
            .get_mut(&id)
            .ok_or(PluginError::UnknownRequest(id))?;
        if next.is_terminal() || !pending.state.can_advance_to(next) {
            return Err(PluginError::Pick(format!(
                "invalid pick transition {:?} -> {next:?}",
                pending.state
            )));
        }
        debug!(%id, from = ?pending.state, to = ?next, "pick transition");
        pending.state = next;
        Ok(())
    }

    /// Deliver the outcome and release the slot.
    pub fn finish(&self, id: RequestId, outcome: Result<PickResponse>) -> Result<()> {
        let mut slots = self.slots();
        let pending = slots
            .pending
            .remove(&id)
            .ok_or(PluginError::UnknownRequest(id))?;

        let terminal = match &outcome {
            Ok(_) if pending.state == PickState::Scanning => PickState::Resolved,
            Ok(_) => {
                warn!(%id, state = ?pending.state, "pick resolved before scanning");
                PickState::Resolved
            }
            Err(_) => PickState::Failed,
        };
        debug!(%id, from = ?pending.state, to = ?terminal, "pick finished");
        slots.last_finished = Some((id, terminal));
        drop(slots);

        if pending.reply.send(outcome).is_err() {
            debug!(%id, "pick caller went away before the result arrived");
        }
        Ok(())
    }
}
