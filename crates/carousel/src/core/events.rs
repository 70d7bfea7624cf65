//! Lifecycle notifications
//!
//! Listeners subscribe to a [`Channel`] and are called synchronously, in
//! registration order, each time the engine publishes on it. They receive a
//! [`Snapshot`] of the engine rather than an event payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::status::Status;

/// Named lifecycle channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    Ready,
    Play,
    Pause,
    Stop,
    Restart,
    TransitionStart,
    TransitionComplete,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::Ready,
        Channel::Play,
        Channel::Pause,
        Channel::Stop,
        Channel::Restart,
        Channel::TransitionStart,
        Channel::TransitionComplete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Ready => "ready",
            Channel::Play => "play",
            Channel::Pause => "pause",
            Channel::Stop => "stop",
            Channel::Restart => "restart",
            Channel::TransitionStart => "transitionStart",
            Channel::TransitionComplete => "transitionComplete",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown channel: {}", s))
    }
}

/// Observable engine state at the moment an event is published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub current: usize,
    pub next: usize,
    pub previous: usize,
    pub last: usize,
    pub len: usize,
    pub status: Status,
    pub animating: bool,
    pub iteration: u64,
    pub disabled: bool,
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Boxed listener callback
pub type Handler = Box<dyn FnMut(&Snapshot)>;

struct Subscription {
    id: SubscriptionId,
    channel: Channel,
    handler: Handler,
}

/// Ordered publish/subscribe over [`Channel`]s
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` on `channel`; any number of handlers may share a channel
    pub fn subscribe<F>(&mut self, channel: Channel, handler: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.subscribe_boxed(channel, Box::new(handler))
    }

    pub fn subscribe_boxed(&mut self, channel: Channel, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            channel,
            handler,
        });
        id
    }

    /// Remove a handler; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.subscriptions
            .iter()
            .filter(|subscription| subscription.channel == channel)
            .count()
    }

    /// Call every handler registered on `channel`, oldest first
    pub fn publish(&mut self, channel: Channel, snapshot: &Snapshot) {
        tracing::trace!(%channel, current = snapshot.current, "publish");
        for subscription in self
            .subscriptions
            .iter_mut()
            .filter(|subscription| subscription.channel == channel)
        {
            (subscription.handler)(snapshot);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn snapshot() -> Snapshot {
        Snapshot {
            current: 0,
            next: 1,
            previous: 2,
            last: 2,
            len: 3,
            status: Status::Stopped,
            animating: false,
            iteration: 0,
            disabled: false,
        }
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            bus.subscribe(Channel::Play, move |_| log.borrow_mut().push(tag));
        }

        bus.publish(Channel::Play, &snapshot());
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_publish_only_reaches_matching_channel() {
        let hits = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let counter = Rc::clone(&hits);
        bus.subscribe(Channel::Pause, move |_| *counter.borrow_mut() += 1);

        bus.publish(Channel::Play, &snapshot());
        bus.publish(Channel::Pause, &snapshot());
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_handler() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let a = Rc::clone(&log);
        let first = bus.subscribe(Channel::Stop, move |_| a.borrow_mut().push("a"));
        let b = Rc::clone(&log);
        bus.subscribe(Channel::Stop, move |_| b.borrow_mut().push("b"));

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        bus.publish(Channel::Stop, &snapshot());
        assert_eq!(*log.borrow(), vec!["b"]);
        assert_eq!(bus.subscriber_count(Channel::Stop), 1);
    }

    #[test]
    fn test_channel_names_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(channel.as_str().parse::<Channel>().unwrap(), channel);
        }
        assert_eq!(
            "transitioncomplete".parse::<Channel>().unwrap(),
            Channel::TransitionComplete
        );
        assert!("explode".parse::<Channel>().is_err());
    }
}
