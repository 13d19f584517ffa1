//! # airychat-llm-api
//!
//! Client for OpenAI-compatible chat completion providers (Groq by default).
//!
//! ## Features
//!
//! - **Single Interface**: one `LlmClient` trait the chat layer depends on
//! - **One-shot Requests**: every call carries exactly the messages it is given
//! - **Typed Failures**: transport, HTTP status, decoding and missing-key errors
//! - **Debug Logging**: optional request/response dumps to console and files
//!
//! ## Example
//!
//! ```rust,no_run
//! use airychat_llm_api::{BackendType, ClientFactory, ClientOptions, DEFAULT_MODEL};
//! use airychat_models::ChatMessage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), airychat_llm_api::LlmError> {
//!     let client = ClientFactory::create(
//!         BackendType::Groq,
//!         Some("your-api-key".to_string()),
//!         DEFAULT_MODEL.to_string(),
//!         None,
//!         ClientOptions::default(),
//!     );
//!
//!     let completion = client.chat_completion(&[ChatMessage::user("Hello!")]).await?;
//!     println!("Response: {}", completion.content);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;


pub use client::{
    Completion,
    LlmClient,
    groq::GroqLlmClient,
};

pub use config::{
    BackendType,
    ClientFactory,
    ClientOptions,
    AIRY_API_KEY_ENV,
    DEFAULT_MODEL,
    GROQ_API_URL,
    OPENAI_API_URL,
    get_default_url_for_backend,
    normalize_api_url,
    parse_model_spec,
};

pub use error::LlmError;
