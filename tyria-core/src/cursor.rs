//! Offset/max cursor over an identifier set

/// Default and documented upper bound of a batch. Larger values are passed
/// through and silently ignored by the upstream.
pub const DEFAULT_BATCH_MAX: usize = 200;

/// Client-supplied offset/limit pair bounding a result batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub offset: usize,
    pub max: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            offset: 0,
            max: DEFAULT_BATCH_MAX,
        }
    }
}

impl Cursor {
    pub fn new(offset: usize, max: usize) -> Self {
        Self { offset, max }
    }

    /// Slice `ids` to `[offset, offset + max)`, clamped to the list bounds.
    ///
    /// The slice is only taken when the set holds at least `max` ids; smaller
    /// sets pass through whole, offset included.
    pub fn apply<T>(&self, ids: Vec<T>) -> Vec<T> {
        if ids.len() < self.max {
            return ids;
        }
        ids.into_iter().skip(self.offset).take(self.max).collect()
    }
}
