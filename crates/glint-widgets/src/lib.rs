//! Ready-made widgets for **glint**.
//!
//! Every widget implements [`glint_core::Component`], so it can be embedded
//! in any [`glint_core::Model`] and placed anywhere in a [`ratatui`] layout.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`scrollable`] | Scrollable region with a custom thumb, track, and up/down buttons |
//! | [`chrome`] | Window frames and centered placement |

pub mod chrome;
pub mod scrollable;

pub use scrollable::{ScrollConfig, ScrollHost, Scrollable, TextPane};
