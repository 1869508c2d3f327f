//! Press-and-hold scrolling from the up/down buttons.

use std::time::{Duration, Instant};

/// Which way a held button scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    pub fn sign(self) -> f32 {
        match self {
            ScrollDirection::Up => -1.0,
            ScrollDirection::Down => 1.0,
        }
    }
}

/// One press-and-hold session.
///
/// Motion is integrated from the press time, so a late or dropped frame
/// never changes where the content ends up.
#[derive(Debug, PartialEq)]
pub struct ContinuousTask {
    direction: ScrollDirection,
    started_at: Instant,
    start_offset: f32,
}

impl ContinuousTask {
    pub fn new(direction: ScrollDirection, started_at: Instant, start_offset: f32) -> Self {
        Self {
            direction,
            started_at,
            start_offset,
        }
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Offset after `elapsed` at `speed` units per second, clamped into
    /// `[0, max_offset]`.
    pub fn offset_after(&self, elapsed: Duration, max_offset: f32, speed: f32) -> f32 {
        let travelled = self.direction.sign() * elapsed.as_secs_f32() * speed;
        (self.start_offset + travelled).clamp(0.0, max_offset.max(0.0))
    }

    /// End the session. Consumes the task so it cannot be finished twice.
    pub fn finish(self) -> ScrollDirection {
        tracing::debug!(direction = ?self.direction, "continuous scroll stopped");
        self.direction
    }
}

/// Idle/scrolling state machine shared by both buttons.
#[derive(Debug, Default)]
pub struct ContinuousScroll {
    task: Option<ContinuousTask>,
}

impl ContinuousScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start scrolling in `direction` from `start_offset`. A session in the
    /// other direction is replaced; pressing the active direction again
    /// keeps the running session.
    pub fn press(&mut self, direction: ScrollDirection, now: Instant, start_offset: f32) {
        if self.active_direction() == Some(direction) {
            return;
        }
        if let Some(replaced) = self.task.take() {
            replaced.finish();
        }
        tracing::debug!(?direction, start_offset, "continuous scroll started");
        self.task = Some(ContinuousTask::new(direction, now, start_offset));
    }

    /// Release the button for `direction`. Only ends a session running in
    /// that direction.
    pub fn release(&mut self, direction: ScrollDirection) -> bool {
        if self.active_direction() == Some(direction) {
            self.cancel()
        } else {
            false
        }
    }

    /// End any session. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.finish();
                true
            }
            None => false,
        }
    }

    /// Target offset for the frame at `now`, if scrolling.
    pub fn tick(&self, now: Instant, max_offset: f32, speed: f32) -> Option<f32> {
        let task = self.task.as_ref()?;
        let elapsed = now.saturating_duration_since(task.started_at);
        let offset = task.offset_after(elapsed, max_offset, speed);
        tracing::trace!(?elapsed, offset, "continuous scroll frame");
        Some(offset)
    }

    pub fn active_direction(&self) -> Option<ScrollDirection> {
        self.task.as_ref().map(|task| task.direction)
    }

    pub fn is_scrolling(&self) -> bool {
        self.task.is_some()
    }
}
