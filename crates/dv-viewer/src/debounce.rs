//! Trailing-edge debouncing of high-frequency input.
//!
//! Scroll and search input arrive far more often than the work they trigger
//! should run. Each source gets one [`Debouncer`] holding at most one pending
//! value: recording a new value replaces the old one and pushes the deadline
//! back, so only the last value of a burst is ever delivered.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Pending value waiting to be delivered.
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Thread-safe single-slot debouncer.
pub struct Debouncer<T> {
    pending: Mutex<Option<Pending<T>>>,
    delay: Duration,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            pending: Mutex::new(None),
            delay,
        }
    }

    /// Record a value, replacing any pending one and restarting the delay.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn record(&self, value: T) {
        let deadline = Instant::now() + self.delay;
        *self.pending.lock().unwrap() = Some(Pending { value, deadline });
    }

    /// Take the pending value if its deadline has passed.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn take_ready(&self) -> Option<T> {
        let mut pending = self.pending.lock().unwrap();
        if pending.as_ref()?.deadline <= Instant::now() {
            pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Drop the pending value without delivering it.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn cancel(&self) -> Option<T> {
        self.pending.lock().unwrap().take().map(|p| p.value)
    }

    /// Deadline of the pending value, for timer scheduling.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.lock().unwrap().as_ref().map(|p| p.deadline)
    }

    /// Wait until the pending value settles and take it.
    ///
    /// Values recorded while waiting postpone delivery. Returns `None` once
    /// nothing is pending.
    pub async fn settled(&self) -> Option<T> {
        loop {
            let deadline = self.next_deadline()?;
            tokio::time::sleep_until(deadline).await;
            if let Some(value) = self.take_ready() {
                return Some(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(start_paused = true)]
    async fn test_value_delivered_after_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.record(1);

        // Before deadline
        assert_eq!(debouncer.take_ready(), None);

        tokio::time::advance(Duration::from_millis(10)).await;
        assert_eq!(debouncer.take_ready(), Some(1));

        // Should be empty after take
        assert_eq!(debouncer.take_ready(), None);
        assert_eq!(debouncer.next_deadline(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_keeps_last_value_and_reschedules() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.record("i");
        tokio::time::advance(Duration::from_millis(6)).await;
        debouncer.record("in");
        tokio::time::advance(Duration::from_millis(6)).await;

        // The first deadline has passed but was replaced.
        assert_eq!(debouncer.take_ready(), None);

        tokio::time::advance(Duration::from_millis(4)).await;
        assert_eq!(debouncer.take_ready(), Some("in"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_waits_for_last_record() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        let start = Instant::now();
        debouncer.record(1);
        debouncer.record(2);
        assert_eq!(debouncer.settled().await, Some(2));
        assert!(start.elapsed() >= Duration::from_millis(10));
        assert_eq!(debouncer.settled().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.record(1);
        assert_eq!(debouncer.cancel(), Some(1));
        tokio::time::advance(Duration::from_millis(20)).await;
        assert_eq!(debouncer.take_ready(), None);
    }
}
