use anyhow::Result;
use clap::Parser;

use airychat::logging::init_tracing;
use airychat::{run_repl_mode, run_task_mode, setup_from_cli, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    let _log_guard = init_tracing(cli.verbose)?;

    let app_config = setup_from_cli(&cli)?;

    if let Some(task_text) = cli.task.clone() {
        return run_task_mode(app_config, task_text, cli.pretty).await;
    }

    run_repl_mode(app_config).await
}
