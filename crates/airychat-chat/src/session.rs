use airychat_models::Turn;

/// Change notification delivered to observers after the session lock is released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A turn was appended at `index`
    TurnAppended { index: usize, turn: Turn },
    /// The busy flag changed to the carried value
    BusyChanged(bool),
}

/// Receives session changes; the terminal view is the usual implementor
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// Mutable session data. Only the controller touches it.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) turns: Vec<Turn>,
    pub(crate) busy: bool,
    pub(crate) draft: String,
    /// Incremented for every accepted submission
    pub(crate) generation: u64,
    /// Generation of the request whose reply may still be appended
    pub(crate) in_flight: Option<u64>,
}

impl SessionState {
    pub(crate) fn append(&mut self, turn: Turn, events: &mut Vec<SessionEvent>) {
        let index = self.turns.len();
        self.turns.push(turn.clone());
        events.push(SessionEvent::TurnAppended { index, turn });
    }

    pub(crate) fn set_busy(&mut self, busy: bool, events: &mut Vec<SessionEvent>) {
        if self.busy != busy {
            self.busy = busy;
            events.push(SessionEvent::BusyChanged(busy));
        }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            turns: self.turns.clone(),
            busy: self.busy,
            draft: self.draft.clone(),
        }
    }
}

/// Point-in-time copy of the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub turns: Vec<Turn>,
    pub busy: bool,
    pub draft: String,
}

impl SessionSnapshot {
    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
