//! Sequencing for overlapping refresh requests.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Manual,
    Timer,
}

/// Hands out sequence numbers and decides which completions still matter.
#[derive(Debug, Default, Clone)]
pub struct RefreshTracker {
    last_issued: u64,
    last_applied: u64,
    in_flight: usize,
}

impl RefreshTracker {
    /// Returns the sequence number for a new request, or `None` when a timer
    /// tick arrives while another request is still running.
    pub fn begin(&mut self, trigger: RefreshTrigger) -> Option<u64> {
        if trigger == RefreshTrigger::Timer && self.in_flight > 0 {
            return None;
        }
        self.last_issued += 1;
        self.in_flight += 1;
        Some(self.last_issued)
    }

    /// Records a completion. Returns `false` when a newer response was
    /// already applied and this one must be dropped.
    pub fn complete(&mut self, sequence: u64) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if sequence <= self.last_applied {
            return false;
        }
        self.last_applied = sequence;
        true
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight > 0
    }
}
