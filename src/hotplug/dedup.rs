//! Duplicate output-event filter
//!
//! The X server fires several identical OutputChange notifications for one
//! physical plug event. One slot remembers the last emitted message and
//! suppresses exact repeats. The slot is shared across all outputs, not
//! keyed per output: two different outputs producing the same text
//! back-to-back will have the second suppressed. Long-standing behavior,
//! kept as-is.

/// Last-message filter with a single shared slot
#[derive(Debug, Default)]
pub struct DedupFilter {
    last: Option<String>,
}

impl DedupFilter {
    pub fn new() -> Self {
        DedupFilter::default()
    }

    /// Returns true when `msg` differs from the previous emission and
    /// records it; an exact repeat is suppressed and leaves the slot alone.
    pub fn should_emit(&mut self, msg: &str) -> bool {
        if self.last.as_deref() == Some(msg) {
            return false;
        }
        self.last = Some(msg.to_string());
        true
    }
}
