//! The content side of a scrollable region.

use std::cell::Cell;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// How a programmatic scroll should move the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Jump straight to the target. Used while dragging so the content
    /// tracks the pointer one-to-one.
    #[default]
    Instant,
    /// Animate towards the target if the host can.
    Smooth,
}

/// A content container whose scroll position a [`Scrollable`](super::Scrollable)
/// mirrors and drives.
///
/// This is the only thing the scrollbar knows about its content. Heights
/// share one unit with the track (terminal rows, pixels, ...).
pub trait ScrollHost: Send + 'static {
    /// Current scroll position.
    fn scroll_top(&self) -> f32;

    /// Total height of the content.
    fn scroll_height(&self) -> f32;

    /// Height of the visible part, as of the last render. Zero before the
    /// first render.
    fn client_height(&self) -> f32;

    /// Move the scroll position. Implementations clamp `top` into
    /// `[0, scroll_height - client_height]`, and keep it at zero until the
    /// first render has laid them out.
    fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior);

    /// Draw the visible part of the content into `area` and remember
    /// `area.height` as the client height.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Offer a key the scrollbar did not use. Return `true` if it was
    /// consumed.
    fn handle_key(&mut self, _key: KeyEvent) -> bool {
        false
    }
}

/// A [`ScrollHost`] holding pre-styled lines of text.
///
/// One line is one unit of height. Smooth scrolls land immediately: a
/// terminal cannot draw between rows.
pub struct TextPane {
    text: Text<'static>,
    top: Cell<f32>,
    last_behavior: ScrollBehavior,
    client_height: Cell<f32>,
}

impl TextPane {
    pub fn new(content: impl Into<Text<'static>>) -> Self {
        Self {
            text: content.into(),
            top: Cell::new(0.0),
            last_behavior: ScrollBehavior::default(),
            client_height: Cell::new(0.0),
        }
    }

    /// Replace the content. The scroll position is kept and re-clamped.
    pub fn set_content(&mut self, content: impl Into<Text<'static>>) {
        self.text = content.into();
        self.top.set(self.clamp(self.top.get()));
    }

    /// Append one line.
    pub fn push_line(&mut self, line: impl Into<Line<'static>>) {
        self.text.lines.push(line.into());
    }

    pub fn line_count(&self) -> usize {
        self.text.lines.len()
    }

    /// Behavior requested by the most recent [`ScrollHost::scroll_to`].
    pub fn last_behavior(&self) -> ScrollBehavior {
        self.last_behavior
    }

    fn max_top(&self) -> f32 {
        (self.scroll_height() - self.client_height.get()).max(0.0)
    }

    /// Offsets collapse to zero until a render has laid the pane out.
    fn clamp(&self, top: f32) -> f32 {
        if top.is_nan() || self.client_height.get() <= 0.0 {
            0.0
        } else {
            top.clamp(0.0, self.max_top())
        }
    }
}

impl ScrollHost for TextPane {
    fn scroll_top(&self) -> f32 {
        self.top.get()
    }

    fn scroll_height(&self) -> f32 {
        self.text.lines.len() as f32
    }

    fn client_height(&self) -> f32 {
        self.client_height.get()
    }

    fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior) {
        self.top.set(self.clamp(top));
        self.last_behavior = behavior;
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.client_height.set(f32::from(area.height));
        let top = self.clamp(self.top.get());
        self.top.set(top);
        let row = top.round().min(f32::from(u16::MAX)) as u16;
        let paragraph = Paragraph::new(self.text.clone()).scroll((row, 0));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::Component;

    fn numbered(n: usize) -> TextPane {
        let lines: Vec<Line<'static>> = (0..n).map(|i| Line::from(format!("line {i}"))).collect();
        TextPane::new(lines)
    }

    // Renders through a throwaway component so the pane records its height.
    struct PaneView(TextPane);

    impl Component for PaneView {
        type Message = ();
        fn update(&mut self, _: ()) -> glint_core::Command<()> {
            glint_core::Command::none()
        }
        fn view(&self, frame: &mut Frame, area: Rect) {
            self.0.render(frame, area);
        }
    }

    #[test]
    fn scroll_is_zero_before_render() {
        let mut pane = numbered(10);
        pane.scroll_to(5.0, ScrollBehavior::Instant);
        assert_eq!(pane.scroll_top(), 0.0);
    }

    #[test]
    fn render_records_client_height_and_clamps() {
        let mut harness = glint_core::testing::TestComponent::new(PaneView(numbered(10)));
        let output = harness.render_string(Rect::new(0, 0, 8, 4));
        assert!(output.starts_with("line 0"));

        let pane = &mut harness.component_mut().0;
        assert_eq!(pane.client_height(), 4.0);
        pane.scroll_to(100.0, ScrollBehavior::Smooth);
        assert_eq!(pane.scroll_top(), 6.0);
        assert_eq!(pane.last_behavior(), ScrollBehavior::Smooth);
    }

    #[test]
    fn render_reclamps_stored_offset_after_resize() {
        let mut harness = glint_core::testing::TestComponent::new(PaneView(numbered(10)));
        harness.render(Rect::new(0, 0, 8, 4));
        harness.component_mut().0.scroll_to(6.0, ScrollBehavior::Instant);

        harness.render(Rect::new(0, 0, 8, 8));
        assert_eq!(harness.component().0.scroll_top(), 2.0);
    }

    #[test]
    fn set_content_reclamps() {
        let mut pane = numbered(10);
        pane.client_height.set(4.0);
        pane.scroll_to(6.0, ScrollBehavior::Instant);
        pane.set_content(Text::from("a\nb\nc\nd\ne"));
        assert_eq!(pane.scroll_top(), 1.0);
    }

    #[test]
    fn push_line_grows_scroll_height() {
        let mut pane = numbered(2);
        pane.push_line("third");
        assert_eq!(pane.scroll_height(), 3.0);
        assert_eq!(pane.line_count(), 3);
    }
}
