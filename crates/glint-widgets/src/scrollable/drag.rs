//! Thumb dragging with a pointer or a single touch.
//!
//! [`DragController`] only tracks the session and turns input into thumb
//! positions. Mapping a thumb position to a scroll offset, and listening
//! for input outside the widget while a drag is active, are the
//! [`Scrollable`](super::Scrollable)'s job.

use glint_core::{PointerEvent, PointerKind, TouchEvent, TouchId, TouchPhase};

/// Which input is driving a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedPointer {
    Mouse,
    /// A touch, identified once the first touch event names one.
    Touch(Option<TouchId>),
}

/// An active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pointer: TrackedPointer,
    /// Distance from the thumb's top edge to where it was grabbed. Fixed
    /// once known.
    grab_offset: Option<f32>,
    thumb_top_at_start: f32,
}

impl DragSession {
    pub fn pointer(&self) -> TrackedPointer {
        self.pointer
    }

    pub fn grab_offset(&self) -> Option<f32> {
        self.grab_offset
    }

    fn thumb_top_for(&mut self, y: f32) -> f32 {
        let grab = *self
            .grab_offset
            .get_or_insert(y - self.thumb_top_at_start);
        y - grab
    }
}

/// Result of feeding an event to a [`DragController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// Not for this session.
    Ignored,
    /// Move the thumb's top edge to this absolute position.
    MoveTo(f32),
    /// The session is over.
    Ended,
}

/// Idle/dragging state machine for the thumb.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag with the thumb's top edge at `thumb_top`.
    ///
    /// `pointer_y` is the grab position when known; otherwise the grab
    /// offset is taken from the first move. Returns `false` if a drag is
    /// already running, which is left untouched.
    pub fn begin(
        &mut self,
        pointer: TrackedPointer,
        pointer_y: Option<f32>,
        thumb_top: f32,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        let grab_offset = pointer_y.map(|y| y - thumb_top);
        tracing::debug!(?pointer, ?grab_offset, "drag started");
        self.session = Some(DragSession {
            pointer,
            grab_offset,
            thumb_top_at_start: thumb_top,
        });
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// End the drag, if any. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        let ended = self.session.take().is_some();
        if ended {
            tracing::debug!("drag cancelled");
        }
        ended
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> DragUpdate {
        let Some(session) = self.session.as_mut() else {
            return DragUpdate::Ignored;
        };
        if session.pointer != TrackedPointer::Mouse {
            return DragUpdate::Ignored;
        }
        match event.kind {
            PointerKind::Move => {
                let top = session.thumb_top_for(event.y);
                tracing::trace!(top, "drag move");
                DragUpdate::MoveTo(top)
            }
            PointerKind::Up => self.end(),
            PointerKind::Down | PointerKind::Wheel { .. } => DragUpdate::Ignored,
        }
    }

    pub fn handle_touch(&mut self, event: &TouchEvent) -> DragUpdate {
        let Some(session) = self.session.as_mut() else {
            return DragUpdate::Ignored;
        };
        let TrackedPointer::Touch(tracked) = session.pointer else {
            return DragUpdate::Ignored;
        };

        match event.phase {
            TouchPhase::Start => {
                if tracked.is_none() {
                    session.pointer = TrackedPointer::Touch(event.changed.first().map(|t| t.id));
                }
                DragUpdate::Ignored
            }
            TouchPhase::Move => {
                let id = match tracked {
                    Some(id) => id,
                    None => match event.touches.first() {
                        Some(first) => {
                            session.pointer = TrackedPointer::Touch(Some(first.id));
                            first.id
                        }
                        None => return DragUpdate::Ignored,
                    },
                };
                let Some(touch) = event.active(id) else {
                    return DragUpdate::Ignored;
                };
                let top = session.thumb_top_for(touch.y);
                tracing::trace!(id, top, "drag move");
                DragUpdate::MoveTo(top)
            }
            TouchPhase::End | TouchPhase::Cancel => {
                let lifted = match tracked {
                    None => true,
                    Some(id) => event.changed_contains(id) || event.active(id).is_none(),
                };
                if lifted {
                    self.end()
                } else {
                    DragUpdate::Ignored
                }
            }
        }
    }

    fn end(&mut self) -> DragUpdate {
        self.session = None;
        tracing::debug!("drag ended");
        DragUpdate::Ended
    }
}
