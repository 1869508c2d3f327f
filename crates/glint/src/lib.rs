//! **glint** -- game-style UI components for [`ratatui`].
//!
//! The umbrella crate: depend on it alone to get the runtime and the widgets.
//!
//! ```toml
//! [dependencies]
//! glint = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * Everything public in [`glint_core`] is available at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Subscription`], [`Program`],
//!   [`run`], [`run_with`], ...).
//! * [`widgets`] re-exports [`glint_widgets`]: the
//!   [`Scrollable`](widgets::Scrollable) region and window chrome.
//! * [`ratatui`], [`crossterm`], [`tokio`], and [`tracing`] are re-exported
//!   so applications do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use glint::widgets::scrollable::{self, Scrollable, TextPane};
//! use glint::{input_events, Command, Component, Model, Subscription};
//!
//! struct Log {
//!     pane: Scrollable<TextPane>,
//! }
//!
//! enum Msg {
//!     Pane(scrollable::Message),
//! }
//!
//! impl Model for Log {
//!     type Message = Msg;
//!     type Flags = String;
//!
//!     fn init(text: String) -> (Self, Command<Msg>) {
//!         (Log { pane: Scrollable::new(TextPane::new(text)) }, Command::none())
//!     }
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Pane(m) => self.pane.update(m).map(Msg::Pane),
//!         }
//!     }
//!     fn view(&self, frame: &mut glint::ratatui::Frame) {
//!         self.pane.view(frame, frame.area());
//!     }
//!     fn subscriptions(&self) -> Vec<Subscription<Msg>> {
//!         let mut subs = vec![input_events(|e| Some(Msg::Pane(scrollable::Message::Input(e))))];
//!         subs.extend(self.pane.subscriptions().into_iter().map(|s| s.map(Msg::Pane)));
//!         subs
//!     }
//! }
//! ```

pub use glint_core::*;
pub mod widgets {
    pub use glint_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
pub use tracing;
