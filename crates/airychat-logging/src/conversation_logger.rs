use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use airychat_models::Turn;

#[derive(Serialize)]
struct LogEntry<'a> {
    timestamp: String, // ISO‑8601 Local time
    role: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

/// Append-only JSONL transcript of one run, one line per turn.
///
/// The file is written for diagnostics only and never read back.
pub struct ConversationLogger {
    file_path: PathBuf,
    file: Option<tokio::fs::File>,
}

impl ConversationLogger {
    /// Create a new logger; generates the file name based on the current local time.
    pub async fn new(workspace: &Path) -> Result<Self> {
        let logs_dir = workspace.join("logs");
        fs::create_dir_all(&logs_dir).await?;

        let filename = format!(
            "airychat-{}.jsonl",
            Local::now().format("%Y-%m-%d-%H%M%S")
        );
        let file_path = logs_dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;
        Ok(Self { file_path, file: Some(file) })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Append a single log entry.
    pub async fn log(&mut self, role: &str, content: &str, model: Option<&str>) {
        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            role,
            content,
            model,
        };
        let Some(file) = &mut self.file else {
            return;
        };
        let Ok(mut json) = serde_json::to_string(&entry) else {
            return;
        };
        json.push('\n');
        if let Err(e) = file.write_all(json.as_bytes()).await {
            tracing::warn!("conversation log write failed: {}", e);
        } else {
            let _ = file.flush().await;
        }
    }

    pub async fn log_turn(&mut self, turn: &Turn, model: Option<&str>) {
        self.log(turn.role().as_str(), turn.content(), model).await;
    }

    /// Close the logger (explicit drop). Called on graceful shutdown.
    pub async fn shutdown(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.sync_all().await;
        }
    }
}
