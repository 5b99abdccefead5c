/// Ticket handed out when an asynchronous load starts.
///
/// Results arriving with a ticket that is no longer current belong to a superseded
/// request and must be discarded by the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Monotonic load generation counter.
#[derive(Debug, Default, Clone)]
pub struct LoadGeneration {
    current: u64,
}

impl LoadGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation, invalidating every previously issued ticket.
    pub fn begin(&mut self) -> LoadTicket {
        self.current = self.current.wrapping_add(1);
        LoadTicket(self.current)
    }

    /// Invalidates outstanding tickets without starting a new load.
    pub fn invalidate(&mut self) {
        self.current = self.current.wrapping_add(1);
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.current
    }

    pub fn current(&self) -> u64 {
        self.current
    }
}
