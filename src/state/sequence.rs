//! Request sequencing so late responses cannot clobber newer state

use std::collections::HashMap;

/// Independent streams of requests; a newer request only supersedes older
/// ones on the same channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Anything that replaces the grid contents
    Grid,
    Stats,
    Categories,
    History,
}

/// Stamp carried by an outstanding request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub channel: Channel,
    pub seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    latest: HashMap<Channel, u64>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket, superseding every earlier one on the channel
    pub fn issue(&mut self, channel: Channel) -> Ticket {
        let seq = self.latest.entry(channel).or_insert(0);
        *seq += 1;
        Ticket { channel, seq: *seq }
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.get(&ticket.channel) == Some(&ticket.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes() {
        let mut seq = Sequencer::new();
        let first = seq.issue(Channel::Grid);
        let second = seq.issue(Channel::Grid);
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
        assert!(second.seq > first.seq);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut seq = Sequencer::new();
        let grid = seq.issue(Channel::Grid);
        let stats = seq.issue(Channel::Stats);
        seq.issue(Channel::Stats);
        assert!(seq.is_latest(grid));
        assert!(!seq.is_latest(stats));
    }

    #[test]
    fn test_unissued_ticket_is_stale() {
        let seq = Sequencer::new();
        assert!(!seq.is_latest(Ticket {
            channel: Channel::History,
            seq: 1
        }));
    }
}
