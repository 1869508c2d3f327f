//! Size observation for content that changes without scrolling.

use std::cell::Cell;

/// The sizes that determine thumb geometry, apart from the scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentSize {
    pub content_height: f32,
    pub visible_height: f32,
    pub track_height: f32,
}

/// Watches content, viewport, and track sizes and reports when they change.
///
/// The widget feeds it the live sizes on every render
/// ([`observe`](MeasurementTracker::observe)); a change is reported once, and
/// the caller recomputes the thumb. Uses interior mutability because
/// observation happens during `view`.
#[derive(Debug, Default)]
pub struct MeasurementTracker {
    attached: Cell<bool>,
    last: Cell<Option<ContentSize>>,
}

impl MeasurementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing, with `initial` as the baseline. `None` means the
    /// content or track has not been laid out yet: nothing attaches.
    pub fn attach(&self, initial: Option<ContentSize>) -> bool {
        let Some(size) = initial else {
            return false;
        };
        if !self.attached.replace(true) {
            tracing::debug!(?size, "resize observation attached");
        }
        self.last.set(Some(size));
        true
    }

    /// Stop observing. Safe to call any number of times.
    pub fn detach(&self) {
        if self.attached.replace(false) {
            tracing::debug!("resize observation detached");
        }
        self.last.set(None);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Record the current sizes. Returns them if attached and they differ
    /// from the last observation.
    pub fn observe(&self, size: ContentSize) -> Option<ContentSize> {
        if !self.attached.get() {
            return None;
        }
        if self.last.get() == Some(size) {
            return None;
        }
        tracing::trace!(?size, "content resized");
        self.last.set(Some(size));
        Some(size)
    }
}
