/// Identifies one outbound call so its completion can be matched to the
/// submit that issued it.
pub type RequestTicket = u64;

/// The four mutually exclusive conditions of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<R> {
    Idle,
    Pending { ticket: RequestTicket },
    Success(R),
    Failure(String),
}

impl<R> Default for ViewState<R> {
    fn default() -> Self {
        ViewState::Idle
    }
}

/// Data-free projection of [`ViewState`], for rendering and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Success,
    Failure,
}

impl<R> ViewState<R> {
    pub fn phase(&self) -> Phase {
        match self {
            ViewState::Idle => Phase::Idle,
            ViewState::Pending { .. } => Phase::Pending,
            ViewState::Success(_) => Phase::Success,
            ViewState::Failure(_) => Phase::Failure,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ViewState::Pending { .. })
    }

    pub fn pending_ticket(&self) -> Option<RequestTicket> {
        match self {
            ViewState::Pending { ticket } => Some(*ticket),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&R> {
        match self {
            ViewState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Pending => "Pending",
            Phase::Success => "Success",
            Phase::Failure => "Failure",
        }
    }
}

/// Hands out increasing tickets, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct TicketCounter {
    last: RequestTicket,
}

impl TicketCounter {
    pub(crate) fn next(&mut self) -> RequestTicket {
        self.last += 1;
        self.last
    }
}
