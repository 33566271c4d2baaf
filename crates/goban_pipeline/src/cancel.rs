//! # Cooperative Cancellation
//!
//! A [`CancelToken`] is signalled once and observed everywhere.
//!
//! Internally it holds the receiving end of a zero-capacity channel whose
//! only sender is dropped on cancel. A disconnected receiver is ready
//! forever, so tasks can put [`CancelToken::receiver`] into a
//! `crossbeam_channel::select!` next to their timer or handoff and wake up
//! the moment cancellation happens.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;

struct Inner {
    cancelled: AtomicBool,
    /// Dropped on cancel. Never used to send.
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
}

/// Shared, clonable cancellation signal.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Creates an untriggered token.
    #[must_use]
    pub fn new() -> Self {
        let (trigger, signal) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                signal,
            }),
        }
    }

    /// Signals cancellation to every clone.
    ///
    /// Returns `true` for the call that actually cancelled.
    pub fn cancel(&self) -> bool {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.inner.trigger.lock().take();
        true
    }

    /// Checks if cancellation was signalled.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Receiver that becomes permanently ready once cancelled.
    ///
    /// Never yields a value; a ready `recv` always reports disconnection.
    #[inline]
    #[must_use]
    pub fn receiver(&self) -> &Receiver<()> {
        &self.inner.signal
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
