//! Declarative widget composition.
//!
//! A [`spec::WidgetSpec`] is a validated, statically typed configuration
//! record; the [`factory::Factory`] turns one spec tree into a live,
//! event-bound widget tree on whatever toolkit backend it is given.
//! Configured actions (callbacks or shell-command templates) are resolved
//! through the [`action::Dispatcher`].

pub mod action;
pub mod factory;
pub mod spec;

pub use action::{Action, CommandExecutor, Dispatcher, ShellExecutor};
pub use factory::{show_child, Factory, PageTarget};
pub use spec::WidgetSpec;
