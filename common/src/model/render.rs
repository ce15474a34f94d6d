use serde::{Deserialize, Serialize};

/// Markup produced by the render pipeline together with the component it used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub html: String,
    pub entry_point: String,
}

/// Orders overlapping render requests so a slow, older response can never
/// overwrite the result of a newer one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSequence {
    latest: u64,
}

impl RenderSequence {
    /// Issues the ticket for a new request; it becomes the only current one.
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_ticket_is_current() {
        let mut seq = RenderSequence::default();
        let first = seq.next();
        let second = seq.next();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }
}
