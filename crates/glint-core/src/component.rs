use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// `Component` mirrors [`Model`](crate::Model) with two differences: its
/// [`view`](Component::view) receives the `area` to draw into, and it has no
/// `init`. A parent decides where each child renders and routes messages to
/// it by wrapping the child's message type in one of its own variants.
///
/// # Composition pattern
///
/// ```rust,ignore
/// use glint_core::{Command, Component, Model, Subscription};
/// use glint_widgets::scrollable::{self, Scrollable, TextPane};
///
/// struct TaskWindow {
///     tasks: Scrollable<TextPane>,
/// }
///
/// enum Msg {
///     Tasks(scrollable::Message),
/// }
///
/// impl Model for TaskWindow {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<Msg>) {
///         let tasks = Scrollable::new(TextPane::new("Chop logs\nMine ore"));
///         (TaskWindow { tasks }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Tasks(m) => self.tasks.update(m).map(Msg::Tasks),
///         }
///     }
///
///     fn view(&self, frame: &mut ratatui::Frame) {
///         self.tasks.view(frame, frame.area());
///     }
///
///     fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///         self.tasks
///             .subscriptions()
///             .into_iter()
///             .map(|sub| sub.map(Msg::Tasks))
///             .collect()
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    ///
    /// The returned command uses the component's own `Message` type; the
    /// parent lifts it with [`Command::map`].
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into a specific `area` of the [`Frame`].
    ///
    /// Implementations should confine all rendering to the given rectangle.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Declare the subscriptions this component needs right now.
    ///
    /// The parent collects these and returns them from its own
    /// [`Model::subscriptions`](crate::Model::subscriptions). Because the
    /// runtime diffs the list after every update, a subscription that is only
    /// returned while some session is active is started when the session
    /// begins and aborted when it ends, or when the parent stops asking the
    /// child at all.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently has focus.
    fn focused(&self) -> bool {
        false
    }
}
