use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use airychat_models::Turn;

use crate::gateway::CompletionGateway;
use crate::session::{SessionEvent, SessionObserver, SessionSnapshot, SessionState};

/// Identifies one accepted submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// An accepted submission whose reply has not been appended yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub token: RequestToken,
    /// Trimmed user text, sent as the whole prompt
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Input was empty after trimming
    Empty,
    /// Another request is outstanding
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// User and assistant turns were appended; `reply` is the assistant text
    Completed { reply: String },
    /// Nothing was appended
    Rejected(RejectReason),
    /// The request was abandoned before its reply arrived; the reply was dropped
    Discarded,
}

/// Owns the session and serializes submissions through the busy flag.
///
/// The lock is never held across the provider call, so `submit` can be
/// driven from a spawned task while the caller keeps reading state or
/// abandons the request.
pub struct SessionController {
    gateway: CompletionGateway,
    state: Mutex<SessionState>,
    observers: Mutex<Vec<Arc<dyn SessionObserver>>>,
}

impl SessionController {
    pub fn new(gateway: CompletionGateway) -> Self {
        Self {
            gateway,
            state: Mutex::new(SessionState::default()),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn gateway(&self) -> &CompletionGateway {
        &self.gateway
    }

    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        lock(&self.observers).push(observer);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.state).snapshot()
    }

    pub fn turns(&self) -> Vec<Turn> {
        lock(&self.state).turns.clone()
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.state).busy
    }

    pub fn draft(&self) -> String {
        lock(&self.state).draft.clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        lock(&self.state).draft = text.into();
    }

    /// Submit whatever is in the input buffer
    pub async fn submit_draft(&self) -> SubmitOutcome {
        let text = self.draft();
        self.submit(&text).await
    }

    /// Append the user turn, ask the gateway, append the reply.
    ///
    /// Empty input and submissions while busy are no-ops.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        match self.begin(text) {
            Ok(pending) => self.complete(pending).await,
            Err(reason) => SubmitOutcome::Rejected(reason),
        }
    }

    /// First half of `submit`: validate, append the user turn, raise the busy flag
    pub fn begin(&self, text: &str) -> Result<PendingRequest, RejectReason> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Err(RejectReason::Empty);
        }

        let mut events = Vec::new();
        let pending = {
            let mut state = lock(&self.state);
            if state.busy {
                tracing::debug!("submission rejected: request already in flight");
                return Err(RejectReason::Busy);
            }

            state.generation += 1;
            let token = RequestToken(state.generation);
            state.in_flight = Some(token.0);
            state.append(Turn::user(prompt), &mut events);
            state.set_busy(true, &mut events);

            PendingRequest { token, prompt: prompt.to_string() }
        };

        self.notify(&events);
        Ok(pending)
    }

    /// Run the gateway for an accepted request and record its reply
    pub async fn complete(&self, pending: PendingRequest) -> SubmitOutcome {
        let reply = self.gateway.complete(&pending.prompt).await;
        if self.finish(pending.token, reply.clone()) {
            SubmitOutcome::Completed { reply }
        } else {
            SubmitOutcome::Discarded
        }
    }

    /// Second half of `submit`: append the assistant turn, clear the busy
    /// flag and the input buffer.
    ///
    /// Returns false, changing nothing, when `token` is not the request in
    /// flight (it was abandoned).
    pub fn finish(&self, token: RequestToken, reply: impl Into<String>) -> bool {
        let mut events = Vec::new();
        {
            let mut state = lock(&self.state);
            if state.in_flight != Some(token.0) {
                tracing::debug!(generation = token.0, "discarding reply for stale request");
                return false;
            }

            state.in_flight = None;
            state.append(Turn::assistant(reply), &mut events);
            state.set_busy(false, &mut events);
            state.draft.clear();
        }

        self.notify(&events);
        true
    }

    /// Give up waiting for `token`'s reply. The user turn stays; a reply
    /// arriving later is discarded by `finish`.
    pub fn abandon(&self, token: RequestToken) -> bool {
        let mut events = Vec::new();
        {
            let mut state = lock(&self.state);
            if state.in_flight != Some(token.0) {
                return false;
            }
            state.in_flight = None;
            state.set_busy(false, &mut events);
        }

        tracing::debug!(generation = token.0, "request abandoned");
        self.notify(&events);
        true
    }

    fn notify(&self, events: &[SessionEvent]) {
        // Clone the list so observers may call back into the controller
        let observers = lock(&self.observers).clone();
        for event in events {
            for observer in &observers {
                observer.on_event(event);
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
