use std::fmt;

use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
    Saving,
}

/// Identifies one in-flight save so its completion can be matched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ticket #{}", self.0)
    }
}

#[derive(Debug, Default)]
pub(crate) struct TicketSeq(u64);

impl TicketSeq {
    pub(crate) fn next(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }
}

/// What happened to a cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The draft was discarded and the view is back to the committed value.
    Reverted,
    /// A save is in flight; the cancel is applied when it resolves.
    Deferred,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct InFlight {
    pub(crate) ticket: Ticket,
    pub(crate) cancel_requested: bool,
}

impl InFlight {
    pub(crate) fn new(ticket: Ticket) -> Self {
        Self {
            ticket,
            cancel_requested: false,
        }
    }
}
