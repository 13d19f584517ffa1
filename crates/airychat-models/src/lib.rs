// Models module - chat turns and data structures for API communication
pub mod turn;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use turn::{Role, Turn};
pub use requests::{ChatMessage, ChatRequest};
pub use responses::{ChatResponse, Choice, ResponseMessage, Usage};
