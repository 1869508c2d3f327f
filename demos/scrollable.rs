//! # Scrollable Demo
//!
//! A task list inside a window, scrolled by a custom scrollbar:
//! - Drag the thumb, hold the ▲/▼ buttons, click the track, or use the wheel
//! - `Tab` focuses the list so Up/Down/PageUp/PageDown/Home/End scroll it
//! - `a` adds a task, `d` completes the next open one
//! - Forwarding the widget's own subscriptions so drags and button holds run
//!
//! Scroll behavior can be tuned with a TOML file named by `GLINT_CONFIG`
//! (see `demos/scroll.toml`).
//! Logs go to `glint-demo.log`; set `RUST_LOG=glint_widgets=debug` to see
//! drag and hold sessions start and stop.
//!
//! Run with: `cargo run --example scrollable`

use glint::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use glint::ratatui::layout::{Constraint, Layout};
use glint::ratatui::style::{Color, Modifier, Style};
use glint::ratatui::text::{Line, Span};
use glint::ratatui::widgets::{Gauge, Paragraph};
use glint::ratatui::Frame;
use glint::widgets::chrome::{centered, window_block};
use glint::widgets::scrollable::{self, ScrollConfig, Scrollable, TextPane};
use glint::{input_events, Command, Component, InputEvent, Model, Subscription};
use tracing_subscriber::EnvFilter;

const DONE: &str = "✅ ";

const STARTER_TASKS: &[&str] = &[
    "make breakfast",
    "make lunch",
    "make dinner",
    "chop firewood",
    "mine copper ore",
    "smelt copper bars",
    "craft a pickaxe",
    "feed the chickens",
    "repair the fence",
    "sell surplus wheat",
    "visit the blacksmith",
    "plant turnips",
    "water the garden",
    "fish at the pier",
    "cook fish stew",
    "read the notice board",
];

struct TaskWindow {
    tasks: Vec<String>,
    list: Scrollable<TextPane>,
    added: usize,
}

#[derive(Debug)]
enum Msg {
    List(scrollable::Message),
    AddTask,
    CompleteNext,
    ToggleFocus,
    Quit,
}

impl TaskWindow {
    fn completed(&self) -> usize {
        self.tasks.iter().filter(|t| t.starts_with(DONE)).count()
    }

    fn progress(&self) -> f64 {
        self.completed() as f64 / self.tasks.len().max(1) as f64
    }

    fn task_lines(tasks: &[String]) -> Vec<Line<'static>> {
        tasks
            .iter()
            .map(|task| {
                if let Some(rest) = task.strip_prefix(DONE) {
                    Line::from(vec![
                        Span::raw(DONE),
                        Span::styled(
                            rest.to_string(),
                            Style::default()
                                .fg(Color::DarkGray)
                                .add_modifier(Modifier::CROSSED_OUT),
                        ),
                    ])
                } else {
                    Line::from(format!("   {task}"))
                }
            })
            .collect()
    }

    /// Push the task text into the pane and tell the scrollbar it changed.
    fn refresh(&mut self) -> Command<Msg> {
        self.list
            .host_mut()
            .set_content(Self::task_lines(&self.tasks));
        Command::message(Msg::List(scrollable::Message::ContentChanged))
    }
}

impl Model for TaskWindow {
    type Message = Msg;
    type Flags = ScrollConfig;

    fn init(config: ScrollConfig) -> (Self, Command<Msg>) {
        let mut tasks: Vec<String> = STARTER_TASKS.iter().map(|t| t.to_string()).collect();
        tasks[0] = format!("{DONE}{}", tasks[0]);
        let list = Scrollable::with_config(TextPane::new(Self::task_lines(&tasks)), config);
        (
            TaskWindow {
                tasks,
                list,
                added: 0,
            },
            Command::none(),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::List(m) => self.list.update(m).map(Msg::List),
            Msg::AddTask => {
                self.added += 1;
                self.tasks.push(format!("side quest #{}", self.added));
                tracing::info!(count = self.tasks.len(), "task added");
                self.refresh()
            }
            Msg::CompleteNext => {
                let Some(task) = self.tasks.iter_mut().find(|t| !t.starts_with(DONE)) else {
                    return Command::none();
                };
                *task = format!("{DONE}{task}");
                if self.completed() == self.tasks.len() {
                    tracing::info!("all tasks complete");
                }
                self.refresh()
            }
            Msg::ToggleFocus => {
                if self.list.focused() {
                    self.list.blur();
                } else {
                    self.list.focus();
                }
                Command::none()
            }
            Msg::Quit => {
                self.list.unmount();
                Command::quit()
            }
        }
    }

    fn view(&self, frame: &mut Frame) {
        let window = centered(frame.area(), 44, 22);
        let block = window_block(" Tasks ", self.list.focused());
        let inner = block.inner(window);
        frame.render_widget(block, window);

        let [list_area, progress_area, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .spacing(1)
        .areas(inner);

        self.list.view(frame, list_area);

        let label = format!("{}/{}", self.completed(), self.tasks.len());
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Yellow))
            .ratio(self.progress())
            .label(label);
        frame.render_widget(gauge, progress_area);

        let key = Style::default().fg(Color::Cyan);
        let help = Line::from(vec![
            Span::styled("a", key),
            Span::raw(" add  "),
            Span::styled("d", key),
            Span::raw(" done  "),
            Span::styled("tab", key),
            Span::raw(" focus  "),
            Span::styled("q", key),
            Span::raw(" quit"),
        ]);
        frame.render_widget(Paragraph::new(help).centered(), help_area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![input_events(|event| {
            if let InputEvent::Key(key) = &event {
                if let Some(msg) = app_key(key) {
                    return Some(msg);
                }
            }
            Some(Msg::List(scrollable::Message::Input(event)))
        })];
        subs.extend(
            self.list
                .subscriptions()
                .into_iter()
                .map(|sub| sub.map(Msg::List)),
        );
        subs
    }
}

// Keys the window handles itself; everything else goes to the list.
fn app_key(key: &KeyEvent) -> Option<Msg> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Msg::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Msg::Quit),
        KeyCode::Char('a') => Some(Msg::AddTask),
        KeyCode::Char('d') => Some(Msg::CompleteNext),
        KeyCode::Tab => Some(Msg::ToggleFocus),
        _ => None,
    }
}

fn load_config() -> Result<ScrollConfig, scrollable::ConfigError> {
    match std::env::var_os("GLINT_CONFIG") {
        Some(path) => ScrollConfig::load(path),
        None => Ok(ScrollConfig::cells()),
    }
}

#[glint::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = glint::log_to_file("glint-demo.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let config = load_config()?;
    tracing::info!(?config, "starting scrollable demo");
    let model = glint::run::<TaskWindow>(config).await?;
    println!(
        "Completed {} of {} tasks",
        model.completed(),
        model.tasks.len()
    );
    Ok(())
}
