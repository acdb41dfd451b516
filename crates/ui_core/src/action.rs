//! Configured actions and their dispatch.

use std::{
    fmt,
    process::{Command, Stdio},
    rc::Rc,
};

use serde::{Deserialize, Deserializer};
use toolkit::{SignalValue, WidgetRef};
use tracing::warn;

/// Placeholder token substituted with the stringified event value when a
/// template command is dispatched.
pub const PLACEHOLDER: &str = "{}";

pub type ActionFn = dyn Fn(&WidgetRef, Option<&SignalValue>);

/// A configured action: a callback invoked with event context, a shell
/// command template, or nothing. Exactly one shape is active per instance.
#[derive(Clone, Default)]
pub enum Action {
    #[default]
    None,
    Callback(Rc<ActionFn>),
    Template(String),
}

impl Action {
    pub fn callback(callback: impl Fn(&WidgetRef, Option<&SignalValue>) + 'static) -> Self {
        Self::Callback(Rc::new(callback))
    }

    pub fn template(template: impl Into<String>) -> Self {
        let template = template.into();
        if template.is_empty() {
            Self::None
        } else {
            Self::Template(template)
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("Action::None"),
            Self::Callback(_) => f.write_str("Action::Callback(..)"),
            Self::Template(template) => write!(f, "Action::Template({template:?})"),
        }
    }
}

// Configuration files can only express templates; callbacks are attached
// programmatically. An absent, null, or empty string means no action.
impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw {
            Some(template) if !template.is_empty() => Self::Template(template),
            _ => Self::None,
        })
    }
}

/// External process-execution collaborator. The dispatcher hands over a
/// fully substituted command string and never looks at output or exit
/// status.
pub trait CommandExecutor {
    fn run(&self, command: &str);
}

/// Runs commands through `sh -c`, fire-and-forget. The child is reaped on a
/// detached thread so the UI thread never blocks on it.
#[derive(Default)]
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn run(&self, command: &str) {
        let spawned = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(mut child) => {
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(error) => warn!(%error, command, "failed to spawn shell command"),
        }
    }
}

pub struct Dispatcher {
    executor: Rc<dyn CommandExecutor>,
}

impl Dispatcher {
    pub fn new(executor: Rc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    pub fn shell() -> Self {
        Self::new(Rc::new(ShellExecutor))
    }

    /// Resolves `action` against the event context. Callbacks run inline;
    /// templates get every placeholder occurrence substituted with the
    /// stringified payload and go to the executor.
    pub fn dispatch(&self, action: &Action, widget: &WidgetRef, payload: Option<&SignalValue>) {
        match action {
            Action::None => {}
            Action::Callback(callback) => callback(widget, payload),
            Action::Template(template) => {
                let value = payload.map(ToString::to_string).unwrap_or_default();
                self.executor.run(&template.replace(PLACEHOLDER, &value));
            }
        }
    }
}
