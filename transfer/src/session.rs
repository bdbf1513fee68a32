use progress_tracking::{ProgressSink, TransferEvent};
use tracing::debug;

/// Lifecycle of one transfer invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferState {
    Initiation,
    InProgress,
    Complete,
    Failed,
}

/// Per-session bookkeeping: state machine, monotonic byte counter, total
/// length when known, and event emission in the fixed order
/// `initiation-started, initiation-complete, {in-progress}*, complete`.
///
/// Owned exclusively by one engine invocation and dropped when it returns.
pub struct TransferSession<'a> {
    state: TransferState,
    bytes_transferred: u64,
    total: Option<u64>,
    progress: &'a dyn ProgressSink,
}

impl<'a> TransferSession<'a> {
    pub fn new(total: Option<u64>, progress: &'a dyn ProgressSink) -> Self {
        Self {
            state: TransferState::Initiation,
            bytes_transferred: 0,
            total,
            progress,
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn initiation_started(&self) {
        debug_assert_eq!(self.state, TransferState::Initiation);
        self.progress.update(TransferEvent::InitiationStarted);
    }

    pub fn initiation_complete(&self) {
        debug_assert_eq!(self.state, TransferState::Initiation);
        self.progress.update(TransferEvent::InitiationComplete);
    }

    /// Account for one transmitted chunk and emit an in-progress event.
    pub fn advance(&mut self, n: u64) {
        debug_assert!(matches!(
            self.state,
            TransferState::Initiation | TransferState::InProgress
        ));
        self.bytes_transferred += n;
        if let Some(total) = self.total {
            debug_assert!(self.bytes_transferred <= total);
        }
        self.state = TransferState::InProgress;
        self.progress.update(TransferEvent::InProgress {
            bytes: self.bytes_transferred,
            total: self.total,
        });
    }

    /// Terminal success; the emitted byte count is the true transferred
    /// total. Returns it for the caller's convenience.
    pub fn complete(&mut self) -> u64 {
        debug_assert_ne!(self.state, TransferState::Failed);
        self.state = TransferState::Complete;
        self.progress.update(TransferEvent::Complete {
            bytes: self.bytes_transferred,
        });
        self.bytes_transferred
    }

    /// Terminal failure, reachable from any state. Emits nothing: the
    /// error itself travels through the return path.
    pub fn fail(&mut self) {
        debug!(
            "transfer failed after {} bytes in state {:?}",
            self.bytes_transferred, self.state
        );
        self.state = TransferState::Failed;
    }
}
