use std::sync::{Arc, Mutex};

use airychat_chat::{CompletionGateway, Locale, SessionController, SessionEvent, SessionObserver, SubmitOutcome};
use airychat_llm_api::{BackendType, ClientFactory, ClientOptions};
use airychat_models::Turn;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "llama3-8b-8192";

#[derive(Default)]
struct BusyRecorder(Mutex<Vec<bool>>);

impl SessionObserver for BusyRecorder {
    fn on_event(&self, event: &SessionEvent) {
        if let SessionEvent::BusyChanged(busy) = event {
            self.0.lock().unwrap().push(*busy);
        }
    }
}

fn controller_for(server: &MockServer, api_key: &str) -> SessionController {
    let client = ClientFactory::create(
        BackendType::Groq,
        Some(api_key.to_string()),
        MODEL.to_string(),
        Some(server.uri()),
        ClientOptions::default(),
    );
    SessionController::new(CompletionGateway::new(client, Locale::En))
}

#[tokio::test]
async fn test_question_gets_provider_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer gsk_test"))
        .and(body_json(json!({
            "messages": [{ "role": "user", "content": "2+2?" }],
            "model": MODEL
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "2 + 2 = 4" }, "finish_reason": "stop" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server, "gsk_test");
    let busy = Arc::new(BusyRecorder::default());
    controller.subscribe(busy.clone());

    assert!(!controller.is_busy());
    let outcome = controller.submit("2+2?").await;

    assert_eq!(outcome, SubmitOutcome::Completed { reply: "2 + 2 = 4".to_string() });
    assert_eq!(controller.turns(), vec![Turn::user("2+2?"), Turn::assistant("2 + 2 = 4")]);
    assert_eq!(*busy.0.lock().unwrap(), vec![true, false]);
}

#[tokio::test]
async fn test_provider_failure_becomes_fallback_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server, "gsk_test");
    controller.submit("hi").await;

    assert_eq!(
        controller.turns(),
        vec![Turn::user("hi"), Turn::assistant("An error occurred. Please try again.")]
    );
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_second_question_sends_no_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "messages": [{ "role": "user", "content": "first" }],
            "model": MODEL
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "one" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "messages": [{ "role": "user", "content": "second" }],
            "model": MODEL
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "two" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server, "gsk_test");
    controller.submit("first").await;
    controller.submit("second").await;

    assert_eq!(controller.turns().len(), 4);
    assert_eq!(controller.turns()[3], Turn::assistant("two"));
}
