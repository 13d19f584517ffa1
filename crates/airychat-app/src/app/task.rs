use anyhow::{bail, Result};

use airychat_chat::{RejectReason, SubmitOutcome};
use airychat_logging::ConversationLogger;

use crate::app::setup::{AppConfig, MISSING_KEY_WARNING};
use crate::app::transcript::TranscriptObserver;

/// Run in task mode - send a single message, print the reply and exit.
///
/// A provider failure still prints the fallback reply and exits normally.
pub async fn run_task_mode(config: AppConfig, task_text: String, pretty: bool) -> Result<()> {
    // Blank input is a no-op, same as in the REPL
    if task_text.trim().is_empty() {
        return Ok(());
    }

    if !config.has_api_key {
        eprintln!("{}", MISSING_KEY_WARNING);
    }

    let mut writer = None;
    if config.log_conversation {
        match ConversationLogger::new(&config.work_dir).await {
            Ok(logger) => {
                let (observer, handle) = TranscriptObserver::spawn(logger, config.model.clone());
                config.controller.subscribe(std::sync::Arc::new(observer));
                writer = Some(handle);
            }
            Err(e) => eprintln!("Task logging disabled: {}", e),
        }
    }

    let reply = match config.controller.submit(&task_text).await {
        SubmitOutcome::Completed { reply } => reply,
        SubmitOutcome::Rejected(RejectReason::Empty) => return Ok(()),
        SubmitOutcome::Rejected(RejectReason::Busy) | SubmitOutcome::Discarded => {
            bail!("request did not complete")
        }
    };

    if pretty {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "prompt": task_text.trim(),
                "response": reply,
                "model": config.model,
            }))
            .unwrap_or_else(|_| reply.clone())
        );
    } else {
        println!("{}", reply);
    }

    // Dropping the controller closes the transcript channel
    let AppConfig { controller, .. } = config;
    drop(controller);
    if let Some(handle) = writer {
        let _ = handle.await;
    }

    Ok(())
}
