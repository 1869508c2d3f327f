use crate::command::{Command, CommandInner};
use crate::component::Component;
use crate::model::Model;
use crate::subscription::{Subscription, SubscriptionId};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// Synchronous commands ([`Command::message`]) are queued and flushed with
/// [`drain_messages`](TestProgram::drain_messages). No tokio runtime or TTY
/// is needed.
///
/// # Example
///
/// ```rust,ignore
/// let mut prog = TestProgram::<Counter>::new(0);
/// prog.send(CounterMsg::Increment);
/// assert_eq!(prog.model().count, 1);
/// assert!(prog.render_string(40, 1).contains("Count: 1"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            quit: false,
        };
        collect_sync(init_cmd, &mut program.pending_messages, &mut program.quit);
        program
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        collect_sync(cmd, &mut self.pending_messages, &mut self.quit);
    }

    /// Process pending synchronous messages until none are left.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                collect_sync(cmd, &mut self.pending_messages, &mut self.quit);
            }
        }
    }

    /// Whether any processed command asked the program to quit.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Ids of the subscriptions the model currently declares.
    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.model
            .subscriptions()
            .iter()
            .map(|sub| sub.id().clone())
            .collect()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a ratatui [`Buffer`] of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        render_with(width, height, |frame| self.model.view(frame))
    }

    /// Render the model and return the screen as newline-separated rows.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }
}

/// A headless harness for a single [`Component`].
///
/// Works like [`TestProgram`] but for components: messages go straight to
/// [`Component::update`], `Command::message` chains can be drained, and
/// [`render`](TestComponent::render) draws into an explicit area so tests
/// control the layout the component sees.
///
/// ```rust,ignore
/// let mut harness = TestComponent::new(Scrollable::new(TextPane::new(text)));
/// harness.render(Rect::new(0, 0, 20, 5));
/// harness.send(Message::Input(InputEvent::Pointer(PointerEvent::down(19.0, 4.0))));
/// harness.drain_messages();
/// ```
pub struct TestComponent<C: Component> {
    component: C,
    pending_messages: Vec<C::Message>,
    processed: usize,
}

impl<C: Component> TestComponent<C> {
    pub fn new(component: C) -> Self {
        Self {
            component,
            pending_messages: Vec::new(),
            processed: 0,
        }
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: C::Message) {
        let cmd = self.component.update(msg);
        self.processed += 1;
        let mut quit = false;
        collect_sync(cmd, &mut self.pending_messages, &mut quit);
    }

    /// Process pending synchronous messages until none are left.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                self.send(msg);
            }
        }
    }

    /// Messages queued by commands and not yet drained.
    pub fn pending(&self) -> &[C::Message] {
        &self.pending_messages
    }

    /// Number of update cycles run so far, including drained messages.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Ids of the subscriptions the component currently declares.
    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.component
            .subscriptions()
            .iter()
            .map(|sub| sub.id().clone())
            .collect()
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Render the component into `area` of a buffer just large enough to
    /// contain it.
    pub fn render(&self, area: Rect) -> Buffer {
        render_with(area.right(), area.bottom(), |frame| {
            self.component.view(frame, area)
        })
    }

    /// Render into `area` and return the whole buffer as text rows.
    pub fn render_string(&self, area: Rect) -> String {
        buffer_to_string(&self.render(area))
    }
}

/// Start a subscription outside the runtime, sending its messages to `tx`.
///
/// Must be called inside a tokio runtime. Abort the returned handle to stop
/// it, as the runtime would on diffing.
pub fn spawn_subscription<Msg: Send + 'static>(
    subscription: Subscription<Msg>,
    tx: mpsc::UnboundedSender<Msg>,
) -> AbortHandle {
    (subscription.spawn)(tx)
}

fn render_with(width: u16, height: u16, draw: impl FnOnce(&mut ratatui::Frame)) -> Buffer {
    let backend = ratatui::backend::TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test backend never fails");
    terminal.draw(draw).expect("test backend never fails");
    terminal.backend().buffer().clone()
}

fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}

fn collect_sync<Msg: Send + 'static>(cmd: Command<Msg>, pending: &mut Vec<Msg>, quit: &mut bool) {
    match cmd.inner {
        CommandInner::None => {}
        CommandInner::Message(msg) => pending.push(msg),
        CommandInner::Quit => *quit = true,
        CommandInner::Batch(cmds) => {
            for cmd in cmds {
                collect_sync(cmd, pending, quit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::{subscribe, SubscriptionSource};
    use futures::stream::BoxStream;
    use futures::StreamExt;
    use ratatui::widgets::Paragraph;

    struct Counter {
        count: i64,
    }

    #[derive(Debug)]
    enum CounterMsg {
        Increment,
        Decrement,
        Twice,
        Quit,
    }

    impl Model for Counter {
        type Message = CounterMsg;
        type Flags = i64;

        fn init(initial: i64) -> (Self, Command<CounterMsg>) {
            (Counter { count: initial }, Command::none())
        }

        fn update(&mut self, msg: CounterMsg) -> Command<CounterMsg> {
            match msg {
                CounterMsg::Increment => self.count += 1,
                CounterMsg::Decrement => self.count -= 1,
                CounterMsg::Twice => {
                    return Command::batch([
                        Command::message(CounterMsg::Increment),
                        Command::message(CounterMsg::Increment),
                    ])
                }
                CounterMsg::Quit => return Command::quit(),
            }
            Command::none()
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            let text = format!("Count: {}", self.count);
            frame.render_widget(Paragraph::new(text), frame.area());
        }
    }

    impl Component for Counter {
        type Message = CounterMsg;

        fn update(&mut self, msg: CounterMsg) -> Command<CounterMsg> {
            <Self as Model>::update(self, msg)
        }

        fn view(&self, frame: &mut ratatui::Frame, area: Rect) {
            let text = format!("Count: {}", self.count);
            frame.render_widget(Paragraph::new(text), area);
        }
    }

    #[test]
    fn program_init_with_flags() {
        let prog = TestProgram::<Counter>::new(42);
        assert_eq!(prog.model().count, 42);
    }

    #[test]
    fn program_send() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send(CounterMsg::Increment);
        prog.send(CounterMsg::Increment);
        prog.send(CounterMsg::Decrement);
        assert_eq!(prog.model().count, 1);
    }

    #[test]
    fn program_drains_batched_messages() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send(CounterMsg::Twice);
        assert_eq!(prog.model().count, 0);
        prog.drain_messages();
        assert_eq!(prog.model().count, 2);
    }

    #[test]
    fn program_records_quit() {
        let mut prog = TestProgram::<Counter>::new(0);
        assert!(!prog.quit_requested());
        prog.send(CounterMsg::Quit);
        assert!(prog.quit_requested());
    }

    #[test]
    fn program_render() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send(CounterMsg::Decrement);
        assert!(prog.render_string(40, 1).contains("Count: -1"));
    }

    #[test]
    fn component_harness_counts_cycles() {
        let mut harness = TestComponent::new(Counter { count: 0 });
        harness.send(CounterMsg::Twice);
        assert_eq!(harness.pending().len(), 2);
        harness.drain_messages();
        assert_eq!(harness.component().count, 2);
        assert_eq!(harness.processed(), 3);
    }

    #[test]
    fn component_harness_renders_into_area() {
        let harness = TestComponent::new(Counter { count: 7 });
        let output = harness.render_string(Rect::new(2, 1, 10, 1));
        let rows: Vec<&str> = output.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].starts_with("  Count: 7"));
    }

    struct Numbers(Vec<i32>);

    impl SubscriptionSource for Numbers {
        type Output = i32;

        fn id(&self) -> SubscriptionId {
            SubscriptionId::of::<Numbers>()
        }

        fn stream(self) -> BoxStream<'static, i32> {
            futures::stream::iter(self.0).boxed()
        }
    }

    #[tokio::test]
    async fn spawned_subscription_forwards_until_aborted() {
        let sub = subscribe(Numbers(vec![1, 2]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_subscription(sub, tx);
        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
        handle.abort();
    }

    #[test]
    fn no_subscriptions_by_default() {
        let harness = TestComponent::new(Counter { count: 0 });
        assert!(harness.subscription_ids().is_empty());
    }
}
