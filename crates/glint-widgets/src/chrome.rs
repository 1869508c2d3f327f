//! Window chrome: a titled frame and centered placement.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Padding};

/// A window frame with a centered title bar.
///
/// Focused windows get a bright double border; unfocused ones a plain gray
/// border.
pub fn window_block(title: &str, focused: bool) -> Block<'_> {
    let (border_type, color) = if focused {
        (BorderType::Double, Color::Cyan)
    } else {
        (BorderType::Plain, Color::DarkGray)
    };
    Block::new()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(color))
        .title(Line::from(title).centered())
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .padding(Padding::horizontal(1))
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
