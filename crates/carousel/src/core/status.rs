//! Playback status machine

use std::fmt;

use serde::{Deserialize, Serialize};

use super::events::Channel;

/// Playback status; exactly one holds at any time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Playing,
    Paused,
    #[default]
    Stopped,
}

impl Status {
    /// Event published when the machine enters this status
    pub fn channel(self) -> Channel {
        match self {
            Status::Playing => Channel::Play,
            Status::Paused => Channel::Pause,
            Status::Stopped => Channel::Stop,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Playing => "playing",
            Status::Paused => "paused",
            Status::Stopped => "stopped",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds the current [`Status`] and reports which event a change should fire
///
/// Every status is reachable from every other one. Entering the status the
/// machine is already in changes nothing and yields no event.
#[derive(Debug, Clone, Default)]
pub struct StatusMachine {
    status: Status,
}

impl StatusMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == Status::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.status == Status::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.status == Status::Stopped
    }

    pub fn to_playing(&mut self) -> Option<Channel> {
        self.enter(Status::Playing)
    }

    pub fn to_paused(&mut self) -> Option<Channel> {
        self.enter(Status::Paused)
    }

    pub fn to_stopped(&mut self) -> Option<Channel> {
        self.enter(Status::Stopped)
    }

    fn enter(&mut self, target: Status) -> Option<Channel> {
        if self.status == target {
            return None;
        }
        tracing::trace!(from = %self.status, to = %target, "status change");
        self.status = target;
        Some(target.channel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_is_stopped() {
        let machine = StatusMachine::new();
        assert!(machine.is_stopped());
        assert!(!machine.is_playing());
        assert!(!machine.is_paused());
    }

    #[test]
    fn test_transitions_report_channel_once() {
        let mut machine = StatusMachine::new();
        assert_eq!(machine.to_playing(), Some(Channel::Play));
        assert_eq!(machine.to_playing(), None);
        assert_eq!(machine.to_paused(), Some(Channel::Pause));
        assert_eq!(machine.to_stopped(), Some(Channel::Stop));
        assert_eq!(machine.to_stopped(), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Playing.to_string(), "playing");
        assert_eq!(Status::Paused.to_string(), "paused");
        assert_eq!(Status::Stopped.to_string(), "stopped");
    }
}
