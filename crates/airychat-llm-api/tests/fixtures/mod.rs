use serde_json::json;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "llama3-8b-8192";

/// Mock server utilities for testing the completion client
pub struct LLMMockServer {
    server: MockServer,
}

impl LLMMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::builder().start().await,
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.server.uri())
    }

    /// Mock successful Groq API response for exactly one user message
    pub async fn mock_groq_success(&self, request_content: &str, response_content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .and(body_json(json!({
                "model": TEST_MODEL,
                "messages": [{
                    "role": "user",
                    "content": request_content
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl_test123",
                "object": "chat.completion",
                "created": 1700000000,
                "model": TEST_MODEL,
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": response_content
                    },
                    "finish_reason": "stop"
                }],
                "usage": {
                    "prompt_tokens": 10,
                    "completion_tokens": 20,
                    "total_tokens": 30
                }
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock Groq API error response
    pub async fn mock_groq_error(&self, status: u16, error_message: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "message": error_message,
                    "type": "invalid_request_error"
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a 200 response whose body is not a chat completion
    pub async fn mock_raw_body(&self, body: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Fail the test on drop if any request reaches the server
    pub async fn expect_no_requests(&self) {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }
}
