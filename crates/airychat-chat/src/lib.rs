//! Chat session for airychat: the ordered list of turns, the busy flag,
//! and the gateway that turns a prompt into an assistant reply.

pub mod controller;
pub mod gateway;
pub mod locale;
pub mod session;

pub use controller::{PendingRequest, RejectReason, RequestToken, SessionController, SubmitOutcome};
pub use gateway::CompletionGateway;
pub use locale::Locale;
pub use session::{SessionEvent, SessionObserver, SessionSnapshot};
