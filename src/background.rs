//! Handing background results back to the UI thread.
//!
//! Slow work (shelling out to git, diffing) runs off the UI thread. When it
//! finishes, the result has to reach the context that asked for it, and
//! must be thrown away if the user has since moved on.
//!
//! [`ResultInbox`] is owned by that context. Each request calls
//! [`begin`](ResultInbox::begin), which bumps a generation counter and
//! returns a [`ResultSender`] stamped with the new generation. Workers send
//! through it from any thread or task. The UI thread later calls
//! [`drain`](ResultInbox::drain) or [`latest`](ResultInbox::latest), which
//! only return results from the current generation; anything older is
//! dropped.
//!
//! ```rust
//! use lazylist::background::ResultInbox;
//!
//! let mut inbox = ResultInbox::new();
//! let slow = inbox.begin();
//! let fast = inbox.begin();
//!
//! fast.send("new diff");
//! slow.send("old diff");
//! assert_eq!(inbox.drain(), vec!["new diff"]);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Receiving end owned by the UI thread.
pub struct ResultInbox<T> {
    generation: Arc<AtomicU64>,
    tx: UnboundedSender<(u64, T)>,
    rx: UnboundedReceiver<(u64, T)>,
}

impl<T> fmt::Debug for ResultInbox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultInbox")
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

impl<T> Default for ResultInbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultInbox<T> {
    /// Creates an inbox at generation 0.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
        }
    }

    /// Starts a new request. Results from earlier senders become stale.
    pub fn begin(&self) -> ResultSender<T> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(generation, "began background request");
        ResultSender {
            generation,
            current: Arc::clone(&self.generation),
            tx: self.tx.clone(),
        }
    }

    /// Makes every outstanding sender stale without starting new work.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// The current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Takes every queued result from the current generation, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        let current = self.generation();
        let mut results = Vec::new();
        while let Ok((generation, value)) = self.rx.try_recv() {
            if generation == current {
                results.push(value);
            } else {
                tracing::debug!(generation, current, "discarding stale background result");
            }
        }
        results
    }

    /// The newest current-generation result, discarding the rest.
    pub fn latest(&mut self) -> Option<T> {
        self.drain().pop()
    }

    /// Waits for the next current-generation result.
    ///
    /// The inbox holds a sender of its own, so the channel never closes and
    /// this only returns once a current result arrives.
    pub async fn recv(&mut self) -> T {
        loop {
            let Some((generation, value)) = self.rx.recv().await else {
                return std::future::pending().await;
            };
            let current = self.generation();
            if generation == current {
                return value;
            }
            tracing::debug!(generation, current, "discarding stale background result");
        }
    }
}

/// Sending end handed to one piece of background work.
pub struct ResultSender<T> {
    generation: u64,
    current: Arc<AtomicU64>,
    tx: UnboundedSender<(u64, T)>,
}

impl<T> Clone for ResultSender<T> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            current: Arc::clone(&self.current),
            tx: self.tx.clone(),
        }
    }
}

impl<T> fmt::Debug for ResultSender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSender")
            .field("generation", &self.generation)
            .field("stale", &self.is_stale())
            .finish()
    }
}

impl<T> ResultSender<T> {
    /// Generation this sender was stamped with.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once a newer request has started or the inbox was invalidated.
    /// Workers can check this to stop early.
    pub fn is_stale(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.generation
    }

    /// Delivers a result. Returns false if it was dropped because the
    /// sender is stale or the inbox is gone.
    pub fn send(&self, value: T) -> bool {
        if self.is_stale() {
            tracing::debug!(generation = self.generation, "dropping stale background result");
            return false;
        }
        self.tx.send((self.generation, value)).is_ok()
    }
}
