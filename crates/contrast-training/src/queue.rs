//! FIFO between the self-play workers and the updater.

use std::sync::{Mutex, PoisonError};

use crossbeam_channel::{Receiver, Sender};

/// Multi-producer, single-consumer FIFO with an explicit end-of-input signal.
///
/// [`pop`](Self::pop) blocks until an item arrives, and returns `None` only
/// after [`close`](Self::close) has been called and every pushed item has
/// been taken.
#[derive(Debug)]
pub struct ResultQueue<T> {
    sender: Mutex<Option<Sender<T>>>,
    receiver: Receiver<T>,
}

impl<T> Default for ResultQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender: Mutex::new(Some(sender)),
            receiver,
        }
    }

    /// Enqueues `item`. Returns `false` (dropping the item) once closed.
    pub fn push(&self, item: T) -> bool {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        match &*sender {
            Some(sender) => sender.send(item).is_ok(),
            None => false,
        }
    }

    pub fn pop(&self) -> Option<T> {
        self.receiver.recv().ok()
    }

    /// Signals that no more items will be pushed.
    pub fn close(&self) {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    /// Items waiting to be popped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
