//! Single-slot handoff from the reply-delivery context
//!
//! `deposit` may be called from any thread, concurrently with itself and
//! with `drain`. The slot holds at most one item: a deposit over an
//! undrained item replaces it (last write wins). The waker runs once per
//! empty -> filled transition, never while the lock is held.

use crossbeam::channel::{Receiver, TryRecvError};
use std::sync::{Mutex, MutexGuard};

type Waker = Box<dyn Fn() + Send + Sync>;

pub struct RequestMailbox<T> {
    slot: Mutex<Option<T>>,
    wake: Waker,
}

impl<T: Send> RequestMailbox<T> {
    /// Mailbox calling `wake` whenever it goes from empty to filled
    pub fn new(wake: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            slot: Mutex::new(None),
            wake: Box::new(wake),
        }
    }

    /// Mailbox paired with a capacity-1 wake channel
    ///
    /// The owning context selects on the receiver and drains on each token.
    pub fn with_wake_channel() -> (Self, Receiver<()>) {
        let (wake_tx, wake_rx) = crossbeam::channel::bounded(1);
        let mailbox = Self::new(move || {
            // Full means a wake-up is already queued
            let _ = wake_tx.try_send(());
        });
        (mailbox, wake_rx)
    }

    // A panic while holding the lock can't leave the Option half-written
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store `item`, replacing any undrained one
    ///
    /// Returns true if an undrained item was replaced.
    pub fn deposit(&self, item: T) -> bool {
        let was_empty = {
            let mut slot = self.lock();
            slot.replace(item).is_none()
        };
        if was_empty {
            (self.wake)();
        }
        !was_empty
    }

    /// Take the pending item, leaving the slot empty
    pub fn drain(&self) -> Option<T> {
        self.lock().take()
    }
}

/// Consume every queued wake token without blocking
///
/// Returns false once the sending side is gone.
pub fn drain_wakeups(wake_rx: &Receiver<()>) -> bool {
    loop {
        match wake_rx.try_recv() {
            Ok(()) => continue,
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}
