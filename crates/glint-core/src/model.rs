use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application trait.
///
/// A `Model` owns the whole application state and drives the
/// **init -> update -> view** cycle:
///
/// 1. [`init`](Model::init) builds the initial state from `Flags`.
/// 2. [`update`](Model::update) handles one message and returns a
///    [`Command`] describing follow-up side effects.
/// 3. [`view`](Model::view) draws the current state; it must not mutate
///    observable state (widgets may cache layout in `Cell`s).
/// 4. [`subscriptions`](Model::subscriptions) declares the long-lived event
///    sources the model needs right now. It is re-evaluated after every
///    update and diffed against the running set.
///
/// [`Program`](crate::Program) runs a model against a real terminal;
/// [`TestProgram`](crate::testing::TestProgram) runs it headless.
pub trait Model: Sized + Send + 'static {
    /// The message type that drives state transitions.
    type Message: Send + 'static;

    /// Initialization data passed to [`init`](Model::init).
    type Flags: Send + 'static;

    /// Create the initial state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Handle a message, mutate state, and return a command.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the whole frame.
    fn view(&self, frame: &mut Frame);

    /// The subscriptions that should be active for the current state.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
