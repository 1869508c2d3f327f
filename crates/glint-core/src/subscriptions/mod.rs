//! Built-in subscription sources.
//!
//! - **Input events** ([`input_events`], [`input_events_keyed`]) -- keys,
//!   pointer, touch, resize, focus, and paste events from the shared input
//!   bus.
//! - **Animation frames** ([`AnimationFrames`]) -- a frame-paced clock for
//!   anything that animates while some state holds.

mod frames;
mod input;

pub use frames::*;
pub use input::*;
pub(crate) use input::spawn_terminal_pump;
