//! Core runtime for the **glint** UI component library.
//!
//! `glint-core` provides the traits, types, and runtime behind every glint
//! widget. Programs follow the [Elm Architecture]: state changes only in
//! **update**, drawing happens in **view**, and side effects are pushed to the
//! edges through [`Command`]s and [`Subscription`]s.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view) |
//! | [`Component`] | Reusable sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | A side effect for the runtime to execute |
//! | [`Subscription`] | Long-lived event source, started and stopped by diffing |
//! | [`InputEvent`] | Key, pointer, and touch input shared by every widget |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the event loop |
//! | [`testing`] | Headless harnesses ([`TestProgram`](testing::TestProgram), [`TestComponent`](testing::TestComponent)) |
//!
//! Session-scoped resources (document-wide pointer listeners while a thumb is
//! dragged, a frame loop while a button is held) are plain subscriptions that
//! a component only declares while the session is active. The runtime's
//! diffing starts them when they appear and aborts them when they disappear.
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use event::{InputEvent, PointerEvent, PointerKind, Touch, TouchEvent, TouchId, TouchPhase};
pub use model::Model;
pub use runtime::{log_to_file, OutputTarget, Program, ProgramError, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{input_events, input_events_keyed, publish_input, AnimationFrames};

/// Run a glint application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
