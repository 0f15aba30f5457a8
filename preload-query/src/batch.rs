//! Batch window arithmetic for batched root execution.
//!
//! Batching re-runs the base query with successive limit/offset windows. The
//! windows must respect any skip/take already present on the base query: the
//! first window starts at the base offset, and the windows together never
//! exceed the base limit. Early exhaustion (a short read) is detected by the
//! caller from the returned row count, not here.

/// Successive `(skip, take)` windows over a base query.
///
/// Yields windows of `batch_size` rows starting at `base_skip`, shrinking
/// the final window so the total never exceeds `base_take`. Infinite when
/// `base_take` is `None`; the consumer stops on a short read.
#[derive(Debug, Clone)]
pub(crate) struct BatchWindows {
    base_skip: u64,
    remaining: Option<u64>,
    batch_size: u64,
    consumed: u64,
}

impl BatchWindows {
    pub(crate) fn new(base_skip: Option<u64>, base_take: Option<u64>, batch_size: u64) -> Self {
        Self {
            base_skip: base_skip.unwrap_or(0),
            remaining: base_take,
            batch_size: batch_size.max(1),
            consumed: 0,
        }
    }

    /// Record that a window actually returned `count` rows. Needed when a
    /// window comes back short but non-empty and the base limit must still
    /// be respected.
    pub(crate) fn advance(&mut self, count: u64) {
        self.consumed += count;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(count);
        }
    }

    /// The next window, or `None` once the base limit is consumed.
    pub(crate) fn next_window(&self) -> Option<(u64, u64)> {
        let take = match self.remaining {
            Some(0) => return None,
            Some(remaining) => remaining.min(self.batch_size),
            None => self.batch_size,
        };
        Some((self.base_skip + self.consumed, take))
    }
}
