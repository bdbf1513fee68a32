//! Progress reporting interface for chunked transfers.
//!
//! The transfer engine emits a closed set of events; rendering them is a
//! presentation concern that lives with whoever implements [`ProgressSink`].

use std::fmt::Debug;

/// One observable step of a transfer.
///
/// Uploads emit `InitiationStarted, InitiationComplete, InProgress*, Complete`;
/// downloads emit `InProgress*, Complete`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferEvent {
    /// The resumable session is being opened against the remote endpoint.
    InitiationStarted,
    /// The resumable session is open; chunk transmission follows.
    InitiationComplete,
    /// One chunk moved. `total` is `None` for unknown-length sources.
    InProgress { bytes: u64, total: Option<u64> },
    /// The transfer finished; `bytes` is the exact transferred total.
    Complete { bytes: u64 },
}

impl TransferEvent {
    /// Completion percentage, defined only when the total length is known
    /// and nonzero.
    pub fn percent(&self) -> Option<f64> {
        match self {
            TransferEvent::InProgress {
                bytes,
                total: Some(total),
            } if *total > 0 => Some(*bytes as f64 * 100.0 / *total as f64),
            _ => None,
        }
    }
}

/// Receiver for transfer events.
///
/// Invoked synchronously from inside the transfer loop, so implementations
/// must not block on anything slower than the transfer itself.
pub trait ProgressSink: Debug {
    fn update(&self, event: TransferEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default)]
pub struct NoOpProgressSink;

impl ProgressSink for NoOpProgressSink {
    fn update(&self, _event: TransferEvent) {}
}

/// Sink that records every event, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingProgressSink {
    events: std::sync::Mutex<Vec<TransferEvent>>,
}

impl RecordingProgressSink {
    pub fn events(&self) -> Vec<TransferEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn update(&self, event: TransferEvent) {
        self.events.lock().unwrap().push(event);
    }
}
