pub mod setup;
pub mod task;
pub mod repl;
pub mod transcript;

pub use setup::{setup_from_cli, AppConfig};
pub use task::run_task_mode;
pub use repl::run_repl_mode;
