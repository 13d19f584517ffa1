use anyhow::Result;
use colored::Colorize;
use crossterm::cursor::MoveToPreviousLine;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, IsTerminal};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use unicode_width::UnicodeWidthStr;

use airychat_chat::{RejectReason, SessionController, SubmitOutcome};
use airychat_logging::ConversationLogger;

use crate::app::setup::{AppConfig, MISSING_KEY_WARNING};
use crate::app::transcript::TranscriptObserver;
use crate::view::TerminalView;

/// Outcome of one prompt line
enum LineAction {
    Submit(String),
    Skip,
    Exit,
}

fn classify_line(line: &str) -> LineAction {
    let line = line.trim();
    if line.is_empty() {
        return LineAction::Skip;
    }
    if line == "exit" || line == "quit" || line == "/exit" || line == "/quit" {
        return LineAction::Exit;
    }
    LineAction::Submit(line.to_string())
}

/// Display width of the "› " prompt
const PROMPT_COLUMNS: usize = 2;

/// Rows used by the placeholder line and the echoed input line, which may
/// have wrapped at `width`
fn echoed_rows(line: &str, width: usize) -> u16 {
    let columns = PROMPT_COLUMNS + UnicodeWidthStr::width(line);
    let input_rows = columns.div_ceil(width.max(1)).max(1);
    u16::try_from(input_rows + 1).unwrap_or(u16::MAX)
}

/// Remove the editor's echo so the view's rendering of the turn is the only copy
fn erase_echo(rows: u16) {
    let mut stdout = io::stdout();
    if !stdout.is_terminal() {
        return;
    }
    if let Err(e) = execute!(stdout, MoveToPreviousLine(rows), Clear(ClearType::FromCursorDown)) {
        tracing::debug!("failed to erase prompt echo: {}", e);
    }
}

/// Run interactive REPL mode
pub async fn run_repl_mode(config: AppConfig) -> Result<()> {
    let AppConfig {
        controller,
        locale,
        view_options,
        work_dir,
        backend,
        model,
        api_url,
        has_api_key,
        log_conversation,
    } = config;

    let view = Arc::new(TerminalView::stdout(&view_options, locale));
    controller.subscribe(view.clone());

    println!("{}", view.render_header());
    let endpoint = api_url.unwrap_or_else(|| backend.to_string());
    println!("{}", format!("Model: {} • {}", model, endpoint).bright_black());
    println!("{}", "Type 'exit' or 'quit' to exit\n".bright_black());

    if !has_api_key {
        eprintln!("{} {}", "⚠️".yellow(), MISSING_KEY_WARNING.yellow());
    }

    let mut transcript_writer = None;
    if log_conversation {
        match ConversationLogger::new(&work_dir).await {
            Ok(logger) => {
                println!("{}", format!("📝 Logging conversation to {}", logger.file_path().display()).bright_blue());
                let (observer, handle) = TranscriptObserver::spawn(logger, model.clone());
                controller.subscribe(Arc::new(observer));
                transcript_writer = Some(handle);
            }
            Err(e) => eprintln!("Logging disabled: {}", e),
        }
    }

    // Holds the token of the request currently awaiting a reply
    let current_token: Arc<Mutex<Option<CancellationToken>>> = Arc::new(Mutex::new(None));
    let current_token_for_handler = current_token.clone();

    // Spawn a single Ctrl-C handler that lasts the entire session
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_ok() {
                if let Ok(guard) = current_token_for_handler.lock() {
                    if let Some(ref token) = *guard {
                        token.cancel();
                    }
                }
            }
        }
    });

    let mut rl = DefaultEditor::new()?;
    let prompt = format!("{} ", "›".bright_green().bold());

    loop {
        println!("{}", locale.input_placeholder().bright_black());
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".bright_black());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", locale.goodbye_message().bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red().bold(), err);
                break;
            }
        };

        let text = match classify_line(&line) {
            LineAction::Skip => continue,
            LineAction::Exit => {
                println!("{}", locale.goodbye_message().bright_cyan());
                break;
            }
            LineAction::Submit(text) => text,
        };

        rl.add_history_entry(text.as_str())?;
        erase_echo(echoed_rows(&line, view.width()));
        controller.set_draft(text);

        let cancel_token = CancellationToken::new();
        set_current(&current_token, Some(cancel_token.clone()));
        submit_with_interrupt(&controller, cancel_token, locale.interrupted_message()).await;
        set_current(&current_token, None);
    }

    drop(controller);
    if let Some(handle) = transcript_writer {
        // An abandoned request may still hold the controller; don't wait on it forever
        let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
    }

    Ok(())
}

fn set_current(slot: &Mutex<Option<CancellationToken>>, token: Option<CancellationToken>) {
    if let Ok(mut guard) = slot.lock() {
        *guard = token;
    }
}

/// Submit the draft; Ctrl-C abandons the request and its late reply is dropped
async fn submit_with_interrupt(controller: &Arc<SessionController>, cancel_token: CancellationToken, interrupted: &str) {
    let pending = match controller.begin(&controller.draft()) {
        Ok(pending) => pending,
        Err(RejectReason::Empty) => return,
        Err(RejectReason::Busy) => {
            eprintln!("{}", "A request is already in progress".bright_yellow());
            return;
        }
    };
    let token = pending.token;

    let mut request = tokio::spawn({
        let controller = Arc::clone(controller);
        async move { controller.complete(pending).await }
    });

    tokio::select! {
        result = &mut request => match result {
            Ok(SubmitOutcome::Discarded) => tracing::debug!("reply arrived after the request was abandoned"),
            Ok(_) => {}
            Err(e) => {
                tracing::error!("request task failed: {}", e);
                controller.abandon(token);
            }
        },
        _ = cancel_token.cancelled() => {
            if controller.abandon(token) {
                println!("{}", interrupted.bright_yellow());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airychat_chat::{CompletionGateway, Locale};
    use airychat_llm_api::{Completion, LlmClient, LlmError};
    use airychat_models::{ChatMessage, Turn};
    use async_trait::async_trait;

    struct NeverReplies;

    #[async_trait]
    impl LlmClient for NeverReplies {
        async fn chat_completion(&self, _messages: &[ChatMessage]) -> Result<Completion, LlmError> {
            std::future::pending().await
        }

        fn model(&self) -> &str {
            "never"
        }
    }

    struct InstantReply;

    #[async_trait]
    impl LlmClient for InstantReply {
        async fn chat_completion(&self, _messages: &[ChatMessage]) -> Result<Completion, LlmError> {
            Ok(Completion { content: "4".to_string(), usage: None })
        }

        fn model(&self) -> &str {
            "instant"
        }
    }

    #[test]
    fn test_classify_line() {
        assert!(matches!(classify_line("   "), LineAction::Skip));
        assert!(matches!(classify_line("quit"), LineAction::Exit));
        assert!(matches!(classify_line(" exit "), LineAction::Exit));
        assert!(matches!(classify_line(" 2+2? "), LineAction::Submit(ref text) if text == "2+2?"));
    }

    #[test]
    fn test_echoed_rows_counts_placeholder_and_wrapped_input() {
        assert_eq!(echoed_rows("", 80), 2);
        assert_eq!(echoed_rows("2+2?", 80), 2);
        assert_eq!(echoed_rows(&"a".repeat(78), 80), 2);
        assert_eq!(echoed_rows(&"a".repeat(79), 80), 3);
        // wide characters take two columns each
        assert_eq!(echoed_rows(&"漢".repeat(40), 80), 3);
    }

    #[tokio::test]
    async fn test_interrupt_clears_busy_flag() {
        let controller = Arc::new(SessionController::new(CompletionGateway::new(Arc::new(NeverReplies), Locale::En)));
        controller.set_draft("hello");

        let cancel_token = CancellationToken::new();
        cancel_token.cancel();
        submit_with_interrupt(&controller, cancel_token, "interrupted").await;

        assert!(!controller.is_busy());
        assert_eq!(controller.turns(), vec![Turn::user("hello")]);
    }

    #[tokio::test]
    async fn test_reply_appended_without_interrupt() {
        let controller = Arc::new(SessionController::new(CompletionGateway::new(Arc::new(InstantReply), Locale::En)));
        controller.set_draft("2+2?");

        submit_with_interrupt(&controller, CancellationToken::new(), "interrupted").await;

        assert_eq!(controller.turns(), vec![Turn::user("2+2?"), Turn::assistant("4")]);
        assert_eq!(controller.draft(), "");
    }
}
