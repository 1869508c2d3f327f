//! A scrollable region with its own scrollbar.
//!
//! [`Scrollable`] wraps a [`ScrollHost`] (the content) and draws a one-column
//! bar next to it: an up button, a track with a thumb, and a down button.
//! The bar is only shown while the content overflows. It mirrors the host's
//! scroll position and drives it back:
//!
//! - dragging the thumb, with the mouse or a single touch
//! - holding the up/down buttons, which scrolls at a fixed speed per second
//! - pressing the track, which pages toward the pointer
//! - the wheel, and Up/Down/PageUp/PageDown/Home/End while focused
//!
//! Every write to the host is followed by [`Message::Scrolled`], which
//! moves the thumb. Content size changes are picked up on render (see
//! [`ResizeObservation`]).
//!
//! While a drag runs the widget listens to input document-wide, and while a
//! button is held it runs a frame loop. Both are subscriptions that only
//! exist for the duration of the session, so the parent must forward
//! [`Component::subscriptions`] for them to run.
//!
//! # Example
//!
//! ```rust,ignore
//! use glint_core::{input_events, InputEvent};
//! use glint_widgets::scrollable::{self, Scrollable, TextPane};
//!
//! let mut log = Scrollable::new(TextPane::new("first\nsecond\nthird"));
//! log.focus();
//!
//! // In the parent's subscriptions:
//! let input = input_events(|event| Some(Msg::Log(scrollable::Message::Input(event))));
//! ```

pub mod config;
pub mod continuous;
pub mod drag;
pub mod geometry;
pub mod host;
pub mod measure;

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use glint_core::{
    input_events_keyed, subscribe, AnimationFrames, Command, Component, InputEvent, PointerEvent,
    PointerKind, Subscription, SubscriptionId, TouchEvent, TouchPhase,
};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::Frame;

pub use config::{
    Affordances, ConfigError, DragMode, ResizeObservation, ScrollConfig, SCROLL_SPEED,
};
pub use continuous::{ContinuousScroll, ContinuousTask, ScrollDirection};
pub use drag::{DragController, DragSession, DragUpdate, TrackedPointer};
pub use geometry::{
    scroll_offset_for_thumb_top, thumb_geometry, DragMapping, ScrollRegion, ThumbGeometry,
    MIN_THUMB_HEIGHT,
};
pub use host::{ScrollBehavior, ScrollHost, TextPane};
pub use measure::{ContentSize, MeasurementTracker};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Marker for the document-wide input subscription held during a drag.
pub struct DragListeners;

/// Messages for the [`Scrollable`] component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Input forwarded by the parent: presses, releases, wheel, and keys.
    Input(InputEvent),
    /// Pointer and touch input from the drag listener.
    DragInput(InputEvent),
    /// A frame of the press-and-hold loop.
    Frame(Instant),
    /// The host's scroll position changed.
    Scrolled,
    /// The host's content changed outside of a render.
    ContentChanged,
    /// End every session and stop observing the content.
    Unmount,
}

/// Colors and glyphs for the scrollbar.
#[derive(Debug, Clone)]
pub struct ScrollableStyle {
    pub track: Style,
    pub thumb: Style,
    /// Thumb style while it is being dragged.
    pub active_thumb: Style,
    pub button: Style,
    /// Button style while it is held.
    pub pressed_button: Style,
    pub track_symbol: &'static str,
    pub thumb_symbol: &'static str,
    pub up_symbol: &'static str,
    pub down_symbol: &'static str,
}

impl Default for ScrollableStyle {
    fn default() -> Self {
        Self {
            track: Style::default().fg(Color::DarkGray),
            thumb: Style::default().fg(Color::Gray),
            active_thumb: Style::default().fg(Color::Cyan),
            button: Style::default().fg(Color::Gray),
            pressed_button: Style::default().fg(Color::Cyan),
            track_symbol: "░",
            thumb_symbol: "█",
            up_symbol: "▲",
            down_symbol: "▼",
        }
    }
}

/// Where the scrollbar parts were drawn on the last render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    pub up: Option<Rect>,
    pub track: Rect,
    pub down: Option<Rect>,
}

impl BarLayout {
    fn column(area: Rect, affordances: Affordances) -> Self {
        let x = area.right() - 1;
        if affordances == Affordances::Shown && area.height >= 3 {
            Self {
                up: Some(Rect::new(x, area.y, 1, 1)),
                track: Rect::new(x, area.y + 1, 1, area.height - 2),
                down: Some(Rect::new(x, area.bottom() - 1, 1, 1)),
            }
        } else {
            Self {
                up: None,
                track: Rect::new(x, area.y, 1, area.height),
                down: None,
            }
        }
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        let column = Rect {
            y: self.up.unwrap_or(self.track).y,
            height: self.up.map_or(0, |r| r.height)
                + self.track.height
                + self.down.map_or(0, |r| r.height),
            ..self.track
        };
        hit(column, x, y)
    }
}

fn hit(rect: Rect, x: f32, y: f32) -> bool {
    x >= f32::from(rect.x)
        && x < f32::from(rect.right())
        && y >= f32::from(rect.y)
        && y < f32::from(rect.bottom())
}

/// Rows of the track covered by the thumb, at least one.
fn thumb_rows(thumb: ThumbGeometry, track_height: u16) -> (u16, u16) {
    let limit = f32::from(track_height);
    let first = (thumb.offset.round().clamp(0.0, limit) as u16)
        .min(track_height.saturating_sub(1));
    let last = (thumb.bottom().round().clamp(0.0, limit) as u16)
        .max(first + 1)
        .min(track_height);
    (first, last)
}

/// A scrollable region with a custom scrollbar.
///
/// Geometry is measured during [`view`](Component::view), so the widget is
/// inert until it has been rendered once with overflowing content. That
/// first render mounts it: the thumb is computed and, with
/// [`ResizeObservation::Observe`], content size changes are tracked from
/// then on.
pub struct Scrollable<H: ScrollHost> {
    host: H,
    config: ScrollConfig,
    style: ScrollableStyle,
    focus: bool,
    instance: u64,
    tracker: MeasurementTracker,
    drag: DragController,
    continuous: ContinuousScroll,
    mounted: Cell<bool>,
    thumb: Cell<ThumbGeometry>,
    /// Updated during each `view()` call; `None` while the bar is hidden.
    bar: Cell<Option<BarLayout>>,
    content_area: Cell<Option<Rect>>,
}

impl<H: ScrollHost> Scrollable<H> {
    /// Wrap `host` with the terminal defaults from [`ScrollConfig::cells`].
    pub fn new(host: H) -> Self {
        Self::with_config(host, ScrollConfig::cells())
    }

    pub fn with_config(host: H, config: ScrollConfig) -> Self {
        Self {
            host,
            config,
            style: ScrollableStyle::default(),
            focus: false,
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            tracker: MeasurementTracker::new(),
            drag: DragController::new(),
            continuous: ContinuousScroll::new(),
            mounted: Cell::new(false),
            thumb: Cell::new(ThumbGeometry::default()),
            bar: Cell::new(None),
            content_area: Cell::new(None),
        }
    }

    pub fn with_style(mut self, style: ScrollableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the content. Send [`Message::ContentChanged`]
    /// afterwards if the bar should update before the next render.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Distinguishes this widget's subscriptions from other instances'.
    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// The thumb as last published.
    pub fn thumb(&self) -> ThumbGeometry {
        self.thumb.get()
    }

    /// The scrollbar layout from the last render, if the bar was shown.
    pub fn bar_layout(&self) -> Option<BarLayout> {
        self.bar.get()
    }

    pub fn is_bar_visible(&self) -> bool {
        self.bar.get().is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn is_observing(&self) -> bool {
        self.tracker.is_attached()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn is_scrolling(&self) -> bool {
        self.continuous.is_scrolling()
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// Cancel the drag and the press-and-hold loop and stop observing the
    /// content. The next render mounts the widget again.
    pub fn unmount(&mut self) {
        self.drag.cancel();
        self.continuous.cancel();
        self.tracker.detach();
        if self.mounted.replace(false) {
            tracing::debug!(instance = self.instance, "scrollable unmounted");
        }
    }

    fn region(&self, track: Rect) -> ScrollRegion {
        ScrollRegion::new(
            self.host.scroll_height(),
            self.host.client_height(),
            f32::from(track.height),
        )
        .with_scroll_offset(self.host.scroll_top())
    }

    fn content_size(&self, bar: &BarLayout) -> ContentSize {
        ContentSize {
            content_height: self.host.scroll_height(),
            visible_height: self.host.client_height(),
            track_height: f32::from(bar.track.height),
        }
    }

    fn recompute(&self, bar: &BarLayout) {
        let thumb = thumb_geometry(&self.region(bar.track), self.config.min_thumb_height);
        self.thumb.set(thumb);
    }

    /// Mount on the first measurement, afterwards recompute on size changes.
    fn measure(&self, bar: &BarLayout) {
        let size = self.content_size(bar);
        if !self.mounted.get() {
            self.mounted.set(true);
            if self.config.resize_observation == ResizeObservation::Observe {
                self.tracker.attach(Some(size));
            }
            tracing::debug!(instance = self.instance, ?size, "scrollable mounted");
            self.recompute(bar);
        } else if self.tracker.observe(size).is_some() {
            self.recompute(bar);
        }
    }

    fn scroll_host_to(&mut self, top: f32, behavior: ScrollBehavior) -> Command<Message> {
        self.host.scroll_to(top, behavior);
        Command::message(Message::Scrolled)
    }

    fn scroll_host_by(&mut self, delta: f32, behavior: ScrollBehavior) -> Command<Message> {
        let top = self.host.scroll_top() + delta;
        self.scroll_host_to(top, behavior)
    }

    fn max_scroll_top(&self) -> f32 {
        (self.host.scroll_height() - self.host.client_height()).max(0.0)
    }

    fn handle_input(&mut self, event: InputEvent) -> Command<Message> {
        match event {
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer),
            InputEvent::Touch(touch) => self.handle_touch(touch),
            InputEvent::Key(key) => self.handle_key(key),
            _ => Command::none(),
        }
    }

    fn handle_pointer(&mut self, pointer: PointerEvent) -> Command<Message> {
        match pointer.kind {
            PointerKind::Down => self.press(pointer.x, pointer.y, TrackedPointer::Mouse),
            PointerKind::Up => {
                // A quick click can release before the drag listener is running.
                self.drag.handle_pointer(&pointer);
                self.continuous.cancel();
                Command::none()
            }
            PointerKind::Wheel { delta } => {
                let over_content = self
                    .content_area
                    .get()
                    .is_some_and(|area| hit(area, pointer.x, pointer.y));
                let over_bar = self
                    .bar
                    .get()
                    .is_some_and(|bar| bar.contains(pointer.x, pointer.y));
                if over_content || over_bar {
                    self.scroll_host_by(delta * self.config.wheel_step, ScrollBehavior::Instant)
                } else {
                    Command::none()
                }
            }
            // Moves only matter to an active drag, which has its own listener.
            PointerKind::Move => Command::none(),
        }
    }

    fn handle_touch(&mut self, touch: TouchEvent) -> Command<Message> {
        match touch.phase {
            TouchPhase::Start => {
                let Some(primary) = touch.primary().copied() else {
                    return Command::none();
                };
                let tracked = TrackedPointer::Touch(touch.changed.first().map(|t| t.id));
                self.press(primary.x, primary.y, tracked)
            }
            TouchPhase::End | TouchPhase::Cancel => {
                self.drag.handle_touch(&touch);
                self.continuous.cancel();
                Command::none()
            }
            TouchPhase::Move => Command::none(),
        }
    }

    /// A press on the bar: buttons start the hold loop, the thumb starts a
    /// drag, and the rest of the track pages.
    fn press(&mut self, x: f32, y: f32, pointer: TrackedPointer) -> Command<Message> {
        let Some(bar) = self.bar.get() else {
            return Command::none();
        };

        let direction = if bar.up.is_some_and(|r| hit(r, x, y)) {
            Some(ScrollDirection::Up)
        } else if bar.down.is_some_and(|r| hit(r, x, y)) {
            Some(ScrollDirection::Down)
        } else {
            None
        };
        if let Some(direction) = direction {
            self.continuous
                .press(direction, Instant::now(), self.host.scroll_top());
            return Command::none();
        }

        if !hit(bar.track, x, y) {
            return Command::none();
        }
        let thumb = self.thumb.get();
        // Pointer positions name a cell; test its centre.
        let along_track = y - f32::from(bar.track.y) + 0.5;
        if thumb.contains(along_track) {
            if self.config.drag.mapping().is_some() {
                self.drag
                    .begin(pointer, Some(y), f32::from(bar.track.y) + thumb.offset);
            }
            return Command::none();
        }

        let page = self.host.client_height();
        let delta = if along_track < thumb.offset { -page } else { page };
        self.scroll_host_by(delta, ScrollBehavior::Smooth)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        if !self.focus {
            return Command::none();
        }
        let top = self.host.scroll_top();
        let page = self.host.client_height();
        let target = match key.code {
            KeyCode::Up => top - self.config.line_step,
            KeyCode::Down => top + self.config.line_step,
            KeyCode::PageUp => top - page,
            KeyCode::PageDown => top + page,
            KeyCode::Home => 0.0,
            KeyCode::End => self.max_scroll_top(),
            _ => {
                return if self.host.handle_key(key) {
                    Command::message(Message::ContentChanged)
                } else {
                    Command::none()
                };
            }
        };
        self.scroll_host_to(target, ScrollBehavior::Instant)
    }

    fn handle_drag_input(&mut self, event: InputEvent) -> Command<Message> {
        let update = match &event {
            InputEvent::Pointer(pointer) => self.drag.handle_pointer(pointer),
            InputEvent::Touch(touch) => self.drag.handle_touch(touch),
            _ => DragUpdate::Ignored,
        };
        let DragUpdate::MoveTo(top) = update else {
            return Command::none();
        };
        let (Some(bar), Some(mapping)) = (self.bar.get(), self.config.drag.mapping()) else {
            return Command::none();
        };
        let region = self.region(bar.track);
        let thumb_top = top - f32::from(bar.track.y);
        let thumb_height = self.thumb.get().height;
        let offset = scroll_offset_for_thumb_top(&region, thumb_height, thumb_top, mapping);
        self.scroll_host_to(offset, ScrollBehavior::Instant)
    }

    fn render_bar(&self, frame: &mut Frame, bar: &BarLayout) {
        let buf = frame.buffer_mut();
        let track = bar.track;
        let (first, last) = thumb_rows(self.thumb.get(), track.height);
        let thumb_style = if self.drag.is_dragging() {
            self.style.active_thumb
        } else {
            self.style.thumb
        };
        for row in 0..track.height {
            let cell = &mut buf[(track.x, track.y + row)];
            if (first..last).contains(&row) {
                cell.set_symbol(self.style.thumb_symbol).set_style(thumb_style);
            } else {
                cell.set_symbol(self.style.track_symbol).set_style(self.style.track);
            }
        }

        let held = self.continuous.active_direction();
        let buttons = [
            (bar.up, ScrollDirection::Up, self.style.up_symbol),
            (bar.down, ScrollDirection::Down, self.style.down_symbol),
        ];
        for (rect, direction, symbol) in buttons {
            let Some(rect) = rect else { continue };
            let style = if held == Some(direction) {
                self.style.pressed_button
            } else {
                self.style.button
            };
            buf[(rect.x, rect.y)].set_symbol(symbol).set_style(style);
        }
    }
}

impl<H: ScrollHost> Component for Scrollable<H> {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Input(event) => self.handle_input(event),
            Message::DragInput(event) => self.handle_drag_input(event),
            Message::Frame(now) => {
                let max = self.max_scroll_top();
                match self.continuous.tick(now, max, self.config.scroll_speed) {
                    Some(offset) => self.scroll_host_to(offset, ScrollBehavior::Smooth),
                    None => Command::none(),
                }
            }
            Message::Scrolled => {
                if let Some(bar) = self.bar.get() {
                    let region = self.region(bar.track);
                    self.thumb.set(self.thumb.get().reposition(&region));
                }
                Command::none()
            }
            Message::ContentChanged => {
                if let Some(bar) = self.bar.get() {
                    if self.mounted.get() {
                        self.measure(&bar);
                    }
                    let region = self.region(bar.track);
                    self.thumb.set(self.thumb.get().reposition(&region));
                }
                Command::none()
            }
            Message::Unmount => {
                self.unmount();
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let overflows = self.host.scroll_height() > f32::from(area.height);
        if !overflows || area.width < 2 || area.height == 0 {
            self.bar.set(None);
            self.content_area.set(Some(area));
            self.host.render(frame, area);
            return;
        }

        let content = Rect {
            width: area.width - 1,
            ..area
        };
        let bar = BarLayout::column(area, self.config.affordances);
        self.bar.set(Some(bar));
        self.content_area.set(Some(content));
        self.host.render(frame, content);
        self.measure(&bar);
        self.render_bar(frame, &bar);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        let mut subs = Vec::new();
        if self.drag.is_dragging() {
            subs.push(input_events_keyed(
                SubscriptionId::new::<DragListeners>(self.instance),
                |event| event.is_drag_relevant().then(|| Message::DragInput(event)),
            ));
        }
        if self.continuous.is_scrolling() {
            subs.push(
                subscribe(AnimationFrames::with_rate(self.instance, self.config.frame_rate))
                    .map(Message::Frame),
            );
        }
        subs
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
