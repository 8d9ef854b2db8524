//! The per-request state machine and its cancellable handle.
//!
//! # Design
//! Each operation spawns one worker that drives transport then mapping,
//! racing a cancellation signal. The task's state lives in one `AtomicU8`
//! advanced only by compare-and-set, so a cancellation and a concurrent
//! transport completion cannot both commit a terminal state: the first CAS
//! wins and the loser becomes a no-op. The outcome travels over a oneshot
//! channel with a single sender that sends exactly once, which makes
//! "exactly one terminal delivery per task" structural rather than a
//! discipline.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ClientError;
use crate::http::OutboundRequest;
use crate::mapper::{MappingResult, ResponseDescriptor, ResponseMapper};
use crate::transport::Transport;

const CREATED: u8 = 0;
const DISPATCHED: u8 = 1;
const SUCCEEDED: u8 = 2;
const FAILED: u8 = 3;
const CANCELLED: u8 = 4;

/// Observable task state. `Succeeded`, `Failed`, and `Cancelled` are
/// absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Created,
    Dispatched,
    Succeeded,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            CREATED => TaskStatus::Created,
            DISPATCHED => TaskStatus::Dispatched,
            SUCCEEDED => TaskStatus::Succeeded,
            FAILED => TaskStatus::Failed,
            _ => TaskStatus::Cancelled,
        }
    }
}

/// The single terminal result of a task.
pub type TaskOutcome = Result<MappingResult, ClientError>;

#[derive(Debug)]
struct Shared {
    id: Uuid,
    state: AtomicU8,
    cancel: watch::Sender<bool>,
}

impl Shared {
    fn try_transition(&self, from: u8, to: u8) -> bool {
        self.state
            .compare_exchange(from, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn status(&self) -> TaskStatus {
        TaskStatus::from_raw(self.state.load(Ordering::Acquire))
    }

    fn request_cancel(&self) {
        if self.try_transition(CREATED, CANCELLED) || self.try_transition(DISPATCHED, CANCELLED) {
            debug!(task_id = %self.id, "task cancelled");
        }
        // Wake the worker; harmless if it already finished.
        let _ = self.cancel.send(true);
    }
}

/// Handle to one in-flight request: returned synchronously by every entry
/// point, cancellable, and awaitable for its single outcome.
#[derive(Debug)]
pub struct RequestTask {
    shared: Arc<Shared>,
    outcome: oneshot::Receiver<TaskOutcome>,
}

impl RequestTask {
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn status(&self) -> TaskStatus {
        self.shared.status()
    }

    /// Request cancellation. If the task already reached a terminal state
    /// this is a no-op; otherwise the outcome resolves to
    /// `Err(ClientError::Cancelled)`.
    pub fn cancel(&self) {
        self.shared.request_cancel();
    }

    /// A detachable cancellation handle, usable while another owner awaits
    /// the outcome.
    pub fn canceller(&self) -> TaskCanceller {
        TaskCanceller {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Await the task's terminal outcome. Resolves exactly once.
    pub async fn outcome(self) -> TaskOutcome {
        // The sender only drops without sending if the worker is torn down
        // with the runtime; report that as cancellation.
        self.outcome.await.unwrap_or(Err(ClientError::Cancelled))
    }
}

/// Clonable cancellation handle detached from outcome ownership.
#[derive(Clone)]
pub struct TaskCanceller {
    shared: Arc<Shared>,
}

impl TaskCanceller {
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn status(&self) -> TaskStatus {
        self.shared.status()
    }

    pub fn cancel(&self) {
        self.shared.request_cancel();
    }
}

/// Spawn the worker for a built request and hand back its task.
///
/// Must be called within a tokio runtime context.
pub(crate) fn dispatch(
    request: OutboundRequest,
    transport: Arc<dyn Transport>,
    mapper: Arc<dyn ResponseMapper>,
    descriptors: Vec<ResponseDescriptor>,
) -> RequestTask {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let shared = Arc::new(Shared {
        id: Uuid::new_v4(),
        state: AtomicU8::new(CREATED),
        cancel: cancel_tx,
    });
    let (outcome_tx, outcome_rx) = oneshot::channel();

    let worker_shared = Arc::clone(&shared);
    tokio::spawn(async move {
        let outcome = run(&worker_shared, request, transport, mapper, descriptors, cancel_rx).await;
        let _ = outcome_tx.send(outcome);
    });

    RequestTask {
        shared,
        outcome: outcome_rx,
    }
}

async fn run(
    shared: &Shared,
    request: OutboundRequest,
    transport: Arc<dyn Transport>,
    mapper: Arc<dyn ResponseMapper>,
    descriptors: Vec<ResponseDescriptor>,
    mut cancel_rx: watch::Receiver<bool>,
) -> TaskOutcome {
    if !shared.try_transition(CREATED, DISPATCHED) {
        // Cancelled before the worker got to dispatch.
        return Err(ClientError::Cancelled);
    }
    debug!(task_id = %shared.id, method = %request.method, url = %request.url, "dispatching");

    tokio::select! {
        result = transport.issue(&request) => match result {
            Ok(response) => match mapper.map(&request.path, &response, &descriptors) {
                Ok(mapped) => {
                    if shared.try_transition(DISPATCHED, SUCCEEDED) {
                        debug!(task_id = %shared.id, objects = mapped.count(), "request succeeded");
                        Ok(mapped)
                    } else {
                        Err(ClientError::Cancelled)
                    }
                }
                Err(e) => {
                    if shared.try_transition(DISPATCHED, FAILED) {
                        warn!(task_id = %shared.id, error = %e, "response mapping failed");
                        Err(ClientError::Mapping(e))
                    } else {
                        Err(ClientError::Cancelled)
                    }
                }
            },
            Err(e) => {
                if shared.try_transition(DISPATCHED, FAILED) {
                    warn!(task_id = %shared.id, error = %e, "transport failed");
                    Err(ClientError::Transport(e))
                } else {
                    Err(ClientError::Cancelled)
                }
            }
        },
        _ = cancel_rx.changed() => {
            // State was already committed by the cancelling side.
            Err(ClientError::Cancelled)
        }
    }
}
