//! Adaptive sizing of source reads.
//!
//! Every compress step returns the engine's preferred size for the next input
//! chunk.  [`ChunkPlanner`] holds that preference as explicit state and keeps
//! it inside the input buffer: hints larger than the buffer are cut down to
//! its capacity, and a zero hint ("no preference") falls back to the full
//! capacity, since a zero-byte read would be indistinguishable from EOF.

/// Next desired read size, bounded by the input buffer capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlanner {
    capacity: usize,
    next: usize,
}

impl ChunkPlanner {
    /// Planner for an input buffer of `capacity` bytes; the first read asks
    /// for the whole buffer.
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "input buffer capacity must be non-zero");
        ChunkPlanner {
            capacity,
            next: capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size of the next read, always in `1..=capacity`.
    #[inline]
    pub fn next_read_size(&self) -> usize {
        self.next
    }

    /// Records an engine hint.  Returns `true` when the hint had to be
    /// clamped to the buffer capacity.
    pub fn apply_hint(&mut self, hint: usize) -> bool {
        if hint == 0 {
            self.next = self.capacity;
            false
        } else if hint > self.capacity {
            self.next = self.capacity;
            true
        } else {
            self.next = hint;
            false
        }
    }
}
