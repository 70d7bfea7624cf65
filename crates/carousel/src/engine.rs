//! Engine facade
//!
//! [`Engine`] ties the ring, status machine, event bus, coordinator and
//! autoplay scheduler together behind the public command surface. An engine
//! built with fewer than two slides is disabled for life: every command
//! returns `Ok(())` without changing state or publishing events.

use std::time::Duration;

use tracing::{debug, info, span, trace, Level};

use crate::coordinator::{Scene, TransitionCoordinator};
use crate::core::{
    millis, AutoplayScheduler, Channel, Clock, Completion, Dimensions, Direction, EngineConfig,
    EventBus, Handler, Result, SlideRing, Snapshot, Stage, Status, StatusMachine, SubscriptionId,
    SystemClock, TimedStage, TransitionId, TransitionOverrides,
};
use crate::transitions::{TransitionContext, TransitionRegistry, TransitionStrategy};

/// Collects slides, collaborators and early subscriptions for an [`Engine`]
pub struct EngineBuilder<S> {
    config: EngineConfig,
    slides: Vec<S>,
    registry: TransitionRegistry,
    clock: Option<Box<dyn Clock>>,
    stage: Option<Box<dyn Stage>>,
    handlers: Vec<(Channel, Handler)>,
}

impl<S> EngineBuilder<S> {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            slides: Vec::new(),
            registry: TransitionRegistry::with_builtin_transitions(),
            clock: None,
            stage: None,
            handlers: Vec::new(),
        }
    }

    pub fn slide(mut self, slide: S) -> Self {
        self.slides.push(slide);
        self
    }

    pub fn slides(mut self, slides: impl IntoIterator<Item = S>) -> Self {
        self.slides.extend(slides);
        self
    }

    /// Time source; defaults to [`SystemClock`]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Presentation layer; defaults to a [`TimedStage`]
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stage = Some(Box::new(stage));
        self
    }

    /// Replace the whole strategy registry
    pub fn registry(mut self, registry: TransitionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn transition(
        mut self,
        kind: impl Into<String>,
        strategy: impl TransitionStrategy + 'static,
    ) -> Self {
        self.registry.register(kind, strategy);
        self
    }

    pub fn transition_fn<F>(mut self, kind: impl Into<String>, strategy: F) -> Self
    where
        F: FnMut(&TransitionContext<'_>, &mut dyn Stage, Completion) + 'static,
    {
        self.registry.register_fn(kind, strategy);
        self
    }

    pub fn directional_transition(
        mut self,
        kind: impl Into<String>,
        direction: Direction,
        strategy: impl TransitionStrategy + 'static,
    ) -> Self {
        self.registry.register_directional(kind, direction, strategy);
        self
    }

    /// Subscribe before the engine announces `ready` and starts autoplay
    pub fn on<F>(mut self, channel: Channel, handler: F) -> Self
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.handlers.push((channel, Box::new(handler)));
        self
    }

    /// Validate the configuration and build the engine
    ///
    /// Fails on an invalid config or an unregistered default transition.
    /// With autoplay enabled the engine starts playing before this returns.
    pub fn build(self) -> Result<Engine<S>> {
        let build_span = span!(Level::INFO, "build_engine", slides = self.slides.len());
        let _enter = build_span.enter();

        self.config.validate()?;
        self.registry.check(&self.config.transition)?;

        let coordinator = TransitionCoordinator::new(
            self.registry,
            self.config.transition.clone(),
            self.config.dimensions,
        )
        .with_watchdog(self.config.transition_timeout());

        let mut bus = EventBus::new();
        for (channel, handler) in self.handlers {
            bus.subscribe_boxed(channel, handler);
        }

        let disabled = self.slides.len() <= 1;
        let mut engine = Engine {
            ring: SlideRing::new(self.slides),
            status: StatusMachine::new(),
            bus,
            coordinator,
            scheduler: AutoplayScheduler::new(),
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock::new())),
            stage: self.stage.unwrap_or_else(|| Box::new(TimedStage::new())),
            disabled,
            config: self.config,
        };

        if disabled {
            info!(slides = engine.len(), "Not enough slides, engine disabled");
            return Ok(engine);
        }

        info!(slides = engine.len(), "Engine ready");
        engine.publish(Channel::Ready);

        if engine.config.auto_play {
            engine.play_deferred()?;
        }
        Ok(engine)
    }
}

impl<S> Default for EngineBuilder<S> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Carousel engine over slide handles of type `S`
pub struct Engine<S> {
    config: EngineConfig,
    ring: SlideRing<S>,
    status: StatusMachine,
    bus: EventBus,
    coordinator: TransitionCoordinator,
    scheduler: AutoplayScheduler,
    clock: Box<dyn Clock>,
    stage: Box<dyn Stage>,
    disabled: bool,
}

impl<S> Engine<S> {
    pub fn builder(config: EngineConfig) -> EngineBuilder<S> {
        EngineBuilder::new(config)
    }

    // Commands

    /// Start playing and move to the next slide right away
    pub fn play(&mut self, overrides: &TransitionOverrides) -> Result<()> {
        self.start_playing(overrides, true)
    }

    /// Start playing without moving; the first move happens after one dwell period
    pub fn play_deferred(&mut self) -> Result<()> {
        self.start_playing(&TransitionOverrides::default(), false)
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.disabled {
            return Ok(());
        }
        let Some(channel) = self.status.to_paused() else {
            trace!("Already paused");
            return Ok(());
        };
        info!("Paused");
        self.publish(channel);
        self.scheduler.cancel();
        Ok(())
    }

    /// Stop autoplay and stage a return to the first slide
    ///
    /// The first slide is staged even when already stopped, so `restart`
    /// always begins from slide 0.
    pub fn stop(&mut self) -> Result<()> {
        if self.disabled {
            return Ok(());
        }
        match self.status.to_stopped() {
            Some(channel) => {
                info!("Stopped");
                self.publish(channel);
                self.scheduler.cancel();
            }
            None => trace!("Already stopped"),
        }
        self.reset()
    }

    /// Stage the first slide as the next one
    ///
    /// Nothing moves until the next transition.
    pub fn reset(&mut self) -> Result<()> {
        if self.disabled || self.ring.current() == 0 {
            return Ok(());
        }
        debug!("Staging first slide");
        self.ring.stage(0)
    }

    /// Stop, then play again with an immediate transition
    pub fn restart(&mut self, overrides: &TransitionOverrides) -> Result<()> {
        if self.disabled {
            return Ok(());
        }
        self.coordinator.check(overrides)?;
        info!("Restarting");
        self.publish(Channel::Restart);
        self.stop()?;
        self.start_playing(overrides, true)
    }

    /// Move to slide `index`
    ///
    /// While playing this pauses and plays again, so the autoplay period
    /// starts over from the moment of the jump.
    pub fn go_to(&mut self, index: usize, overrides: &TransitionOverrides) -> Result<()> {
        if self.disabled || index == self.ring.current() {
            return Ok(());
        }
        self.coordinator.check(overrides)?;
        self.ring.stage(index)?;
        debug!(index, "Going to slide");

        if self.status.is_playing() {
            self.pause()?;
            self.start_playing(overrides, true)
        } else {
            self.request_transition(overrides)
        }
    }

    pub fn first(&mut self, overrides: &TransitionOverrides) -> Result<()> {
        self.go_to(0, overrides)
    }

    pub fn previous(&mut self, overrides: &TransitionOverrides) -> Result<()> {
        self.go_to(self.ring.peek_previous(), overrides)
    }

    pub fn next(&mut self, overrides: &TransitionOverrides) -> Result<()> {
        self.go_to(self.ring.peek_next(), overrides)
    }

    pub fn last(&mut self, overrides: &TransitionOverrides) -> Result<()> {
        self.go_to(self.ring.peek_last(), overrides)
    }

    /// Transition to the staged next slide unless one is already in flight
    ///
    /// Completions signalled since the last call are applied first, so a
    /// finished effect never blocks the request.
    pub fn request_transition(&mut self, overrides: &TransitionOverrides) -> Result<()> {
        if self.disabled {
            return Ok(());
        }
        self.settle();
        let (coordinator, mut scene) = self.scene();
        coordinator.request(&mut scene, overrides)?;
        Ok(())
    }

    /// Close the open transition if its effect has finished
    ///
    /// Transition requests and [`Engine::tick`] settle on their own. A host
    /// whose stage completes effects outside of `tick` calls this to publish
    /// `transitionComplete` right away. Returns true if a transition closed.
    pub fn settle(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        let (coordinator, mut scene) = self.scene();
        scene.stage.advance(scene.now);
        coordinator.settle(&mut scene)
    }

    /// Drive the engine from the host event loop
    ///
    /// Settles finished effects, applies the watchdog, then fires at most one
    /// autoplay tick. A tick that lands while a transition is in flight is
    /// dropped.
    pub fn tick(&mut self) -> Result<()> {
        if self.disabled {
            return Ok(());
        }
        self.settle();
        let now = {
            let (coordinator, mut scene) = self.scene();
            coordinator.expire(&mut scene);
            scene.now
        };

        if self.status.is_playing() && self.scheduler.poll(now) {
            debug!(now_ms = millis(now), "Autoplay tick");
            self.request_transition(&TransitionOverrides::default())?;
        }
        Ok(())
    }

    /// Earliest engine time at which [`Engine::tick`] has work to do
    pub fn next_wakeup(&self) -> Option<Duration> {
        if self.disabled {
            return None;
        }
        let autoplay = self
            .scheduler
            .next_deadline()
            .filter(|_| self.status.is_playing());
        [
            autoplay,
            self.stage.next_deadline(),
            self.coordinator.watchdog_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // Subscriptions

    pub fn on<F>(&mut self, channel: Channel, handler: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.bus.subscribe(channel, handler)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // State

    pub fn snapshot(&self) -> Snapshot {
        self.coordinator
            .snapshot(&self.ring, self.status.status(), self.disabled)
    }

    pub fn status(&self) -> Status {
        self.status.status()
    }

    pub fn is_playing(&self) -> bool {
        self.status.is_playing()
    }

    pub fn is_paused(&self) -> bool {
        self.status.is_paused()
    }

    pub fn is_stopped(&self) -> bool {
        self.status.is_stopped()
    }

    /// Whether a transition is open
    ///
    /// A completion signalled since the last command, `tick` or `settle` is
    /// not reflected until one of those runs.
    pub fn is_animating(&self) -> bool {
        self.coordinator.is_animating()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn iteration(&self) -> u64 {
        self.coordinator.iteration()
    }

    pub fn open_transition(&self) -> Option<TransitionId> {
        self.coordinator.open_transition()
    }

    pub fn current_index(&self) -> usize {
        self.ring.current()
    }

    pub fn next_index(&self) -> usize {
        self.ring.peek_next()
    }

    pub fn previous_index(&self) -> usize {
        self.ring.peek_previous()
    }

    pub fn last_index(&self) -> usize {
        self.ring.peek_last()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn slides(&self) -> &[S] {
        self.ring.slides()
    }

    pub fn slide(&self, index: usize) -> Option<&S> {
        self.ring.get(index)
    }

    pub fn current_slide(&self) -> Option<&S> {
        self.ring.current_slide()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn transitions(&self) -> &TransitionRegistry {
        self.coordinator.registry()
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Update the container size after the host has re-measured it
    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.config.dimensions = dimensions;
        self.coordinator.set_dimensions(dimensions);
    }

    fn start_playing(&mut self, overrides: &TransitionOverrides, immediate: bool) -> Result<()> {
        if self.disabled || self.status.is_playing() {
            return Ok(());
        }
        if immediate {
            self.coordinator.check(overrides)?;
        }
        if let Some(channel) = self.status.to_playing() {
            info!(immediate, "Playing");
            self.publish(channel);
        }
        if immediate {
            self.request_transition(overrides)?;
        }
        let now = self.clock.now();
        self.scheduler.start(now, self.config.rotation_speed());
        Ok(())
    }

    fn publish(&mut self, channel: Channel) {
        let snapshot = self.snapshot();
        self.bus.publish(channel, &snapshot);
    }

    fn scene(&mut self) -> (&mut TransitionCoordinator, Scene<'_, S>) {
        let now = self.clock.now();
        (
            &mut self.coordinator,
            Scene {
                ring: &mut self.ring,
                stage: self.stage.as_mut(),
                bus: &mut self.bus,
                status: self.status.status(),
                now,
            },
        )
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Engine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("slides", &self.ring.slides())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
