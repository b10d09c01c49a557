// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Shared one-shot reply slot handed to every listener of a single dispatch.
///
/// Only the first [`resume`](Continuation::resume) is delivered.
pub struct Continuation<R> {
    slot: Arc<Mutex<Option<oneshot::Sender<R>>>>,
}

impl<R> Clone for Continuation<R> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<R> Continuation<R> {
    /// Create a continuation and the receiver the dispatcher awaits on.
    pub fn channel() -> (Self, oneshot::Receiver<R>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                slot: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Deliver `value`. Returns false if the continuation was already resumed
    /// or the receiving side has gone away.
    pub fn resume(&self, value: R) -> bool {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match sender {
            Some(tx) => tx.send(value).is_ok(),
            None => false,
        }
    }

    pub fn is_resumed(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_resume_wins() {
        let (continuation, rx) = Continuation::channel();
        let other = continuation.clone();

        assert!(continuation.resume(1));
        assert!(!other.resume(2));
        assert!(other.is_resumed());
        assert_eq!(rx.await.unwrap(), 1);
    }

    #[test]
    fn resume_after_receiver_dropped() {
        let (continuation, rx) = Continuation::<u8>::channel();
        drop(rx);
        assert!(!continuation.resume(1));
    }
}
