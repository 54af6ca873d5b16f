//! Collection point for per-file failures.
//!
//! Every worker holds a [`FailureSender`]; the orchestrator keeps the single
//! [`FailureDrain`]. The sink closes once the last sender is dropped, which
//! the orchestrator arranges to happen only after the join barrier.

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::models::UploadFailure;

/// Create a connected sender/drain pair.
pub fn channel() -> (FailureSender, FailureDrain) {
    let (tx, rx) = mpsc::unbounded_channel();
    (FailureSender { tx }, FailureDrain { rx })
}

/// Write side of the sink. Cloned once per worker; never blocks.
#[derive(Clone, Debug)]
pub struct FailureSender {
    tx: mpsc::UnboundedSender<UploadFailure>,
}

impl FailureSender {
    pub fn report(&self, failure: UploadFailure) {
        debug!("Recording failure for {}", failure.path.display());
        if let Err(mpsc::error::SendError(failure)) = self.tx.send(failure) {
            // Only reachable if the drain was dropped early
            warn!("Failure sink already closed, dropping: {}", failure);
        }
    }

    /// Close this handle. The sink itself closes when every handle is gone.
    pub fn close(self) {
        drop(self);
    }
}

/// Read side of the sink.
#[derive(Debug)]
pub struct FailureDrain {
    rx: mpsc::UnboundedReceiver<UploadFailure>,
}

impl FailureDrain {
    /// Wait for the sink to close and return every recorded failure.
    ///
    /// Only call this after all senders have been dropped; otherwise it waits
    /// for them.
    pub async fn drain(mut self) -> Vec<UploadFailure> {
        let mut failures = Vec::new();
        while let Some(failure) = self.rx.recv().await {
            failures.push(failure);
        }
        failures
    }
}
