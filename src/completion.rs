// Completion delivery primitives.
// Single-use completion slots for cancellable tasks and an async bridge over callback APIs.

use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;

/// Callback invoked at most once with the outcome of an asynchronous operation.
pub type Completion<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// Owns a completion until it is either delivered or invalidated.
///
/// Both paths empty the slot, so a late result can never reach a completion
/// that has already fired or been cancelled.
pub struct CompletionSlot<T> {
    completion: Mutex<Option<Completion<T>>>,
}

impl<T> CompletionSlot<T> {
    pub fn new(completion: Completion<T>) -> Self {
        Self {
            completion: Mutex::new(Some(completion)),
        }
    }

    /// Deliver `value` if the completion is still held.
    ///
    /// Returns `false` when the value was dropped instead.
    pub fn complete(&self, value: T) -> bool {
        // Take before calling so the completion may cancel its own task.
        match self.take() {
            Some(completion) => {
                completion(value);
                true
            }
            None => false,
        }
    }

    /// Drop the completion without calling it. Safe to repeat.
    pub fn invalidate(&self) {
        drop(self.take());
    }

    /// Whether the completion is still waiting for a result.
    pub fn is_pending(&self) -> bool {
        self.completion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn take(&self) -> Option<Completion<T>> {
        self.completion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Run a callback-style operation and await its delivery.
///
/// Resolves to `None` when the completion is dropped without firing, which is
/// what happens when the owning loader is discarded or the task is cancelled.
pub async fn wait<T, F>(start: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce(Completion<T>),
{
    let (tx, rx) = oneshot::channel();
    start(Box::new(move |value| {
        // The receiver may have been dropped by a caller that stopped waiting.
        let _ = tx.send(value);
    }));
    rx.await.ok()
}
