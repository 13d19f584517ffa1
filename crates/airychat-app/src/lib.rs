//! Airy AI terminal chat client

pub mod app;
pub mod cli;
pub mod logging;
pub mod view;

pub use app::{AppConfig, run_repl_mode, run_task_mode, setup_from_cli};
pub use cli::Cli;
pub use view::{CodeHighlighter, TerminalView, ViewOptions};
