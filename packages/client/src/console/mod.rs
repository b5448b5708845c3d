//! Terminal agent console: a thin front-end over the real-time pipeline.

mod command;
mod formatter;
mod runner;
mod ui;

pub use command::{Command, parse_command};
pub use formatter::MessageFormatter;
pub use runner::{ConsoleOptions, run_console};
pub use ui::{TerminalNavigator, TerminalNotifier, VisibilityFlag};
