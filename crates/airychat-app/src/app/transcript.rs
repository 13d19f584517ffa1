use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use airychat_chat::{SessionEvent, SessionObserver};
use airychat_logging::ConversationLogger;
use airychat_models::Turn;

/// Forwards appended turns to the conversation log.
///
/// Observers are synchronous, so turns travel over a channel to a task that
/// owns the logger and does the async file writes.
pub struct TranscriptObserver {
    sender: mpsc::UnboundedSender<Turn>,
}

impl TranscriptObserver {
    /// Spawn the writer task. It exits, flushing the log, once every sender
    /// is dropped.
    pub fn spawn(mut logger: ConversationLogger, model: String) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Turn>();

        let handle = tokio::spawn(async move {
            while let Some(turn) = receiver.recv().await {
                let turn_model = (!turn.is_user()).then_some(model.as_str());
                logger.log_turn(&turn, turn_model).await;
            }
            logger.shutdown().await;
        });

        (Self { sender }, handle)
    }
}

impl SessionObserver for TranscriptObserver {
    fn on_event(&self, event: &SessionEvent) {
        if let SessionEvent::TurnAppended { turn, .. } = event {
            if self.sender.send(turn.clone()).is_err() {
                tracing::warn!("conversation log writer has stopped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_turns_reach_the_log_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let logger = ConversationLogger::new(temp.path()).await.unwrap();
        let path = logger.file_path().to_path_buf();

        let (observer, handle) = TranscriptObserver::spawn(logger, "llama3-8b-8192".to_string());
        observer.on_event(&SessionEvent::TurnAppended { index: 0, turn: Turn::user("hi") });
        observer.on_event(&SessionEvent::BusyChanged(true));
        observer.on_event(&SessionEvent::TurnAppended { index: 1, turn: Turn::assistant("hello") });
        drop(observer);
        handle.await.unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<serde_json::Value> = contents.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["role"], "user");
        assert!(lines[0].get("model").is_none());
        assert_eq!(lines[1]["content"], "hello");
        assert_eq!(lines[1]["model"], "llama3-8b-8192");
    }
}
