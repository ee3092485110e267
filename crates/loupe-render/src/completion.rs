//! Single-shot completion primitive.
//!
//! The render callback and the routing layer both hand their result back
//! through a [`Completion`]. `complete` consumes the completion, so a value is
//! delivered at most once; dropping a completion without completing it wakes
//! the receiver with [`Abandoned`] instead of leaving it hanging.

use thiserror::Error;
use tokio::sync::oneshot;

/// Sending half: completed exactly once or dropped.
#[derive(Debug)]
pub struct Completion<T> {
    tx: oneshot::Sender<T>,
}

/// Receiving half of a [`Completion`].
#[derive(Debug)]
pub struct CompletionReceiver<T> {
    rx: oneshot::Receiver<T>,
}

/// The completion was dropped without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("completion dropped without a value")]
pub struct Abandoned;

impl<T> Completion<T> {
    /// Create a connected completion / receiver pair.
    pub fn channel() -> (Self, CompletionReceiver<T>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, CompletionReceiver { rx })
    }

    /// Deliver the value. A receiver that already went away is not an error.
    pub fn complete(self, value: T) {
        let _ = self.tx.send(value);
    }

    /// Whether the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl<T> CompletionReceiver<T> {
    /// Wait for the value.
    pub async fn wait(self) -> Result<T, Abandoned> {
        self.rx.await.map_err(|_| Abandoned)
    }
}
