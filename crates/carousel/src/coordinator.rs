//! Single-flight transition coordinator
//!
//! At most one transition is open at a time. A request made while one is open
//! is dropped, not queued. Accepting a request commits the ring to the new
//! slide immediately; the visual effect catches up later and reports back
//! through its [`Completion`].

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use tracing::{debug, span, trace, warn, Level};

use crate::core::{
    millis, Channel, Completion, Dimensions, EventBus, Result, SlideRing, Snapshot, Stage,
    Status, TransitionId, TransitionOptions, TransitionOverrides,
};
use crate::transitions::{TransitionContext, TransitionRegistry};

/// Mutable engine parts a transition touches
pub struct Scene<'a, S> {
    pub ring: &'a mut SlideRing<S>,
    pub stage: &'a mut dyn Stage,
    pub bus: &'a mut EventBus,
    pub status: Status,
    pub now: Duration,
}

#[derive(Debug, Clone)]
struct OpenTransition {
    id: TransitionId,
    started_at: Duration,
}

/// Accepts transition requests and drives the start/complete protocol
#[derive(Debug)]
pub struct TransitionCoordinator {
    registry: TransitionRegistry,
    defaults: TransitionOptions,
    dimensions: Dimensions,
    watchdog: Option<Duration>,
    open: Option<OpenTransition>,
    iteration: u64,
    next_id: u64,
    sender: Sender<TransitionId>,
    receiver: Receiver<TransitionId>,
}

impl TransitionCoordinator {
    pub fn new(
        registry: TransitionRegistry,
        defaults: TransitionOptions,
        dimensions: Dimensions,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            registry,
            defaults,
            dimensions,
            watchdog: None,
            open: None,
            iteration: 0,
            next_id: 1,
            sender,
            receiver,
        }
    }

    /// Force-complete transitions left open longer than `timeout`
    pub fn with_watchdog(mut self, timeout: Option<Duration>) -> Self {
        self.watchdog = timeout;
        self
    }

    pub fn is_animating(&self) -> bool {
        self.open.is_some()
    }

    /// Accepted transitions since creation
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn open_transition(&self) -> Option<TransitionId> {
        self.open.as_ref().map(|open| open.id)
    }

    pub fn defaults(&self) -> &TransitionOptions {
        &self.defaults
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
    }

    pub fn registry(&self) -> &TransitionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TransitionRegistry {
        &mut self.registry
    }

    /// Check that `overrides` resolve to a registered strategy
    pub fn check(&self, overrides: &TransitionOverrides) -> Result<()> {
        self.registry.check(&self.defaults.merged(overrides))
    }

    pub fn snapshot<S>(&self, ring: &SlideRing<S>, status: Status, disabled: bool) -> Snapshot {
        Snapshot {
            current: ring.current(),
            next: ring.peek_next(),
            previous: ring.peek_previous(),
            last: ring.peek_last(),
            len: ring.len(),
            status,
            animating: self.is_animating(),
            iteration: self.iteration,
            disabled,
        }
    }

    /// Move to the ring's next slide unless a transition is already open
    ///
    /// Returns `Ok(false)` when the request was dropped. An unknown transition
    /// type fails before anything changes. Completions already signalled are
    /// settled first.
    pub fn request<S>(
        &mut self,
        scene: &mut Scene<'_, S>,
        overrides: &TransitionOverrides,
    ) -> Result<bool> {
        self.settle(scene);
        if let Some(open) = &self.open {
            trace!(open = %open.id, "Transition in flight, dropping request");
            return Ok(false);
        }

        let options = self.defaults.merged(overrides);
        let strategy = self.registry.resolve(&options)?;

        let id = TransitionId(self.next_id);
        self.next_id += 1;
        let from = scene.ring.current();
        let to = scene.ring.peek_next();

        let transition_span = span!(Level::DEBUG, "transition", %id, from, to, kind = %options.kind);
        let _enter = transition_span.enter();

        self.open = Some(OpenTransition {
            id,
            started_at: scene.now,
        });

        let cx = TransitionContext {
            id,
            from,
            to,
            len: scene.ring.len(),
            iteration: self.iteration,
            options: &options,
            dimensions: self.dimensions,
            now: scene.now,
        };
        strategy.apply(&cx, &mut *scene.stage, Completion::new(id, self.sender.clone()));

        scene.ring.advance_to(to)?;
        self.iteration += 1;
        debug!(iteration = self.iteration, "Transition started");
        self.publish(scene, Channel::TransitionStart);

        // Strategies such as `none` complete before returning
        self.settle(scene);
        Ok(true)
    }

    /// Close the open transition if its completion has arrived
    ///
    /// Returns true if a transition was closed.
    pub fn settle<S>(&mut self, scene: &mut Scene<'_, S>) -> bool {
        let mut closed = false;
        while let Ok(id) = self.receiver.try_recv() {
            if self.open_transition() != Some(id) {
                warn!(transition = %id, "Ignoring completion for a transition that is not open");
                continue;
            }
            self.open = None;
            closed = true;
            debug!(transition = %id, "Transition complete");
            self.publish(scene, Channel::TransitionComplete);
        }
        closed
    }

    /// Force-complete the open transition if the watchdog has expired
    pub fn expire<S>(&mut self, scene: &mut Scene<'_, S>) -> bool {
        let (Some(open), Some(timeout)) = (&self.open, self.watchdog) else {
            return false;
        };
        if scene.now.saturating_sub(open.started_at) < timeout {
            return false;
        }
        warn!(
            transition = %open.id,
            timeout_ms = millis(timeout),
            "Transition never completed, forcing completion"
        );
        self.open = None;
        self.publish(scene, Channel::TransitionComplete);
        true
    }

    /// When the watchdog will next need a tick
    pub fn watchdog_deadline(&self) -> Option<Duration> {
        match (&self.open, self.watchdog) {
            (Some(open), Some(timeout)) => Some(open.started_at + timeout),
            _ => None,
        }
    }

    fn publish<S>(&self, scene: &mut Scene<'_, S>, channel: Channel) {
        let snapshot = self.snapshot(scene.ring, scene.status, false);
        scene.bus.publish(channel, &snapshot);
    }
}
