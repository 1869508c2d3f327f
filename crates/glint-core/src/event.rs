use crossterm::event::{Event, KeyEvent, MouseButton, MouseEventKind};

/// Identifier of a single touch point, stable for the touch's lifetime.
pub type TouchId = u64;

/// Input events delivered to components.
///
/// The runtime converts crossterm events with [`InputEvent::from_crossterm`]
/// and publishes them on the input bus (see
/// [`input_events`](crate::subscriptions::input_events)). Hosts that have
/// touch input can publish [`InputEvent::Touch`] themselves with
/// [`publish_input`](crate::subscriptions::publish_input).
///
/// Pointer coordinates are `f32` so the same widgets work in terminal cells
/// and in pixel-based hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A primary-button pointer event.
    Pointer(PointerEvent),
    /// A touch event carrying the full touch list.
    Touch(TouchEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
    /// Bracketed paste content.
    Paste(String),
}

impl InputEvent {
    /// Convert a crossterm event. Mouse events for non-primary buttons have no
    /// counterpart and yield `None`.
    pub fn from_crossterm(event: Event) -> Option<Self> {
        match event {
            Event::Key(k) => Some(InputEvent::Key(k)),
            Event::Mouse(m) => {
                let kind = match m.kind {
                    MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
                    MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
                    MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                        PointerKind::Move
                    }
                    MouseEventKind::ScrollUp => PointerKind::Wheel { delta: -1.0 },
                    MouseEventKind::ScrollDown => PointerKind::Wheel { delta: 1.0 },
                    _ => return None,
                };
                Some(InputEvent::Pointer(PointerEvent::new(
                    kind,
                    f32::from(m.column),
                    f32::from(m.row),
                )))
            }
            Event::Resize(w, h) => Some(InputEvent::Resize(w, h)),
            Event::FocusGained => Some(InputEvent::FocusGained),
            Event::FocusLost => Some(InputEvent::FocusLost),
            Event::Paste(s) => Some(InputEvent::Paste(s)),
        }
    }

    /// Whether this event moves or releases a pointer or touch, i.e. the
    /// events a drag listener cares about.
    pub fn is_drag_relevant(&self) -> bool {
        match self {
            InputEvent::Pointer(p) => matches!(p.kind, PointerKind::Move | PointerKind::Up),
            InputEvent::Touch(t) => t.phase != TouchPhase::Start,
            _ => false,
        }
    }
}

/// What happened to the primary pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerKind {
    /// Button pressed.
    Down,
    /// Pointer moved, with or without the button held.
    Move,
    /// Button released.
    Up,
    /// Wheel turned; positive `delta` scrolls down.
    Wheel { delta: f32 },
}

/// A primary-button pointer event at an absolute position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Up, x, y)
    }
}

/// Lifecycle phase of a [`TouchEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: TouchId,
    pub x: f32,
    pub y: f32,
}

impl Touch {
    pub fn new(id: TouchId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// A touch event.
///
/// `touches` lists every touch still on the surface after the event;
/// `changed` lists the touches this event is about (the ones that started,
/// moved, or lifted).
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<Touch>,
    pub changed: Vec<Touch>,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase) -> Self {
        Self {
            phase,
            touches: Vec::new(),
            changed: Vec::new(),
        }
    }

    pub fn with_touches(mut self, touches: impl IntoIterator<Item = Touch>) -> Self {
        self.touches = touches.into_iter().collect();
        self
    }

    pub fn with_changed(mut self, changed: impl IntoIterator<Item = Touch>) -> Self {
        self.changed = changed.into_iter().collect();
        self
    }

    /// Find an active touch by id.
    pub fn active(&self, id: TouchId) -> Option<&Touch> {
        self.touches.iter().find(|t| t.id == id)
    }

    /// Whether the touch with `id` is one of the touches this event changed.
    pub fn changed_contains(&self, id: TouchId) -> bool {
        self.changed.iter().any(|t| t.id == id)
    }

    /// The first touch this event is about, falling back to the first active
    /// touch.
    pub fn primary(&self) -> Option<&Touch> {
        self.changed.first().or_else(|| self.touches.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEvent};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn left_press_becomes_pointer_down() {
        let ev = InputEvent::from_crossterm(mouse(MouseEventKind::Down(MouseButton::Left), 4, 7));
        assert_eq!(ev, Some(InputEvent::Pointer(PointerEvent::down(4.0, 7.0))));
    }

    #[test]
    fn drag_becomes_pointer_move() {
        let ev = InputEvent::from_crossterm(mouse(MouseEventKind::Drag(MouseButton::Left), 1, 2));
        assert_eq!(ev, Some(InputEvent::Pointer(PointerEvent::moved(1.0, 2.0))));
    }

    #[test]
    fn right_button_is_dropped() {
        let ev = InputEvent::from_crossterm(mouse(MouseEventKind::Down(MouseButton::Right), 0, 0));
        assert_eq!(ev, None);
    }

    #[test]
    fn wheel_direction() {
        let down = InputEvent::from_crossterm(mouse(MouseEventKind::ScrollDown, 0, 0));
        assert_eq!(
            down,
            Some(InputEvent::Pointer(PointerEvent::new(
                PointerKind::Wheel { delta: 1.0 },
                0.0,
                0.0
            )))
        );
    }

    #[test]
    fn drag_relevance() {
        assert!(InputEvent::Pointer(PointerEvent::up(0.0, 0.0)).is_drag_relevant());
        assert!(!InputEvent::Pointer(PointerEvent::down(0.0, 0.0)).is_drag_relevant());
        assert!(!InputEvent::Touch(TouchEvent::new(TouchPhase::Start)).is_drag_relevant());
        assert!(InputEvent::Touch(TouchEvent::new(TouchPhase::Cancel)).is_drag_relevant());
        assert!(!InputEvent::FocusLost.is_drag_relevant());
    }

    #[test]
    fn touch_lookup() {
        let ev = TouchEvent::new(TouchPhase::End)
            .with_touches([Touch::new(2, 0.0, 5.0)])
            .with_changed([Touch::new(1, 0.0, 3.0)]);
        assert!(ev.changed_contains(1));
        assert!(!ev.changed_contains(2));
        assert_eq!(ev.active(2).map(|t| t.y), Some(5.0));
        assert!(ev.active(1).is_none());
        assert_eq!(ev.primary().map(|t| t.id), Some(1));
    }
}
