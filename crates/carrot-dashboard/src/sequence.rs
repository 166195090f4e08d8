use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request numbering for one kind of poll.
///
/// Every fetch takes a [`Ticket`] before it goes out; when the response
/// arrives it is only rendered if no newer ticket has been issued since.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn number(&self) -> u64 {
        self.0
    }
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}
