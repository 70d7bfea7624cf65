//! Presentation boundary
//!
//! Strategies describe the visual side of a transition as an [`Effect`]: a
//! set of slides moving between two [`Frame`]s over a duration. A [`Stage`]
//! is the host's presentation layer (DOM, canvas, terminal, native widgets)
//! and turns effects into pixels. Whoever finishes an effect reports it
//! through its single-use [`Completion`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use serde::Serialize;

use super::config::Dimensions;
use super::options::Easing;

/// Identifies one accepted transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TransitionId(pub(crate) u64);

impl TransitionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Single-use completion signal for one transition
///
/// Consumed by [`Completion::complete`], so a handle can signal at most once.
/// Signals that arrive after the engine has moved on are ignored. Dropping a
/// handle without completing it leaves the engine animating until the
/// optional watchdog steps in.
#[must_use = "the engine stays animating until the completion is signalled"]
#[derive(Debug)]
pub struct Completion {
    id: TransitionId,
    sender: Sender<TransitionId>,
}

impl Completion {
    pub(crate) fn new(id: TransitionId, sender: Sender<TransitionId>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> TransitionId {
        self.id
    }

    pub fn complete(self) {
        if self.sender.send(self.id).is_err() {
            tracing::trace!(transition = %self.id, "completion after engine was dropped");
        }
    }
}

/// Geometry and visibility of one slide
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub visible: bool,
}

impl Frame {
    /// Fully visible, filling the container
    pub fn shown(dimensions: Dimensions) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: dimensions.width,
            height: dimensions.height,
            opacity: 1.0,
            visible: true,
        }
    }

    pub fn hidden(dimensions: Dimensions) -> Self {
        Self {
            visible: false,
            ..Self::shown(dimensions)
        }
    }

    pub fn at(mut self, left: f64, top: f64) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Motion of a single slide during an effect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerMotion {
    pub slide: usize,
    pub z_index: u64,
    pub from: Frame,
    pub to: Frame,
    /// Hide the slide once the effect has finished
    pub hide_on_complete: bool,
}

impl LayerMotion {
    /// Frame at eased progress `t` in `[0, 1]`
    pub fn frame_at(&self, t: f64) -> Frame {
        if t >= 1.0 {
            return self.end_frame();
        }
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        Frame {
            left: lerp(self.from.left, self.to.left),
            top: lerp(self.from.top, self.to.top),
            width: lerp(self.from.width, self.to.width),
            height: lerp(self.from.height, self.to.height),
            opacity: lerp(self.from.opacity, self.to.opacity),
            visible: self.from.visible || self.to.visible,
        }
    }

    /// Frame once the effect has finished
    pub fn end_frame(&self) -> Frame {
        Frame {
            visible: self.to.visible && !self.hide_on_complete,
            ..self.to
        }
    }
}

/// Visual work for one transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Effect {
    pub id: TransitionId,
    pub kind: String,
    pub from: usize,
    pub to: usize,
    pub started_at: Duration,
    pub duration: Duration,
    pub easing: Easing,
    pub layers: Vec<LayerMotion>,
}

impl Effect {
    pub fn ends_at(&self) -> Duration {
        self.started_at + self.duration
    }

    /// Linear progress in `[0, 1]` at `now`
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() || now >= self.ends_at() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        elapsed.as_secs_f64() / self.duration.as_secs_f64()
    }

    /// Every layer's frame at `now`, eased
    pub fn frames_at(&self, now: Duration) -> Vec<(usize, Frame)> {
        let t = self.progress(now);
        let eased = if t >= 1.0 { 1.0 } else { self.easing.ease(t) };
        self.layers
            .iter()
            .map(|layer| (layer.slide, layer.frame_at(eased)))
            .collect()
    }
}

/// Host presentation layer
pub trait Stage {
    /// Apply the effect's end frames immediately
    fn snap(&mut self, effect: &Effect);

    /// Run the effect and call `done.complete()` once it has finished
    fn animate(&mut self, effect: Effect, done: Completion);

    /// Let a time-driven stage settle whatever finished by `now`
    fn advance(&mut self, _now: Duration) {}

    /// Earliest time at which `advance` has work to do
    fn next_deadline(&self) -> Option<Duration> {
        None
    }
}

/// Shared stage: the engine owns one handle, the host keeps another to read state
impl<T: Stage + ?Sized> Stage for Rc<RefCell<T>> {
    fn snap(&mut self, effect: &Effect) {
        self.borrow_mut().snap(effect);
    }

    fn animate(&mut self, effect: Effect, done: Completion) {
        self.borrow_mut().animate(effect, done);
    }

    fn advance(&mut self, now: Duration) {
        self.borrow_mut().advance(now);
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.borrow().next_deadline()
    }
}

/// Stage that finishes every effect the moment it is handed over
#[derive(Debug, Default)]
pub struct InstantStage {
    frames: BTreeMap<usize, Frame>,
}

impl InstantStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self, slide: usize) -> Option<Frame> {
        self.frames.get(&slide).copied()
    }
}

impl Stage for InstantStage {
    fn snap(&mut self, effect: &Effect) {
        record_end_frames(&mut self.frames, effect);
    }

    fn animate(&mut self, effect: Effect, done: Completion) {
        record_end_frames(&mut self.frames, &effect);
        done.complete();
    }
}

/// Headless stage that finishes each effect once its duration has elapsed
///
/// Time comes from [`Stage::advance`], which the engine calls with its own
/// clock on every tick.
#[derive(Debug, Default)]
pub struct TimedStage {
    running: Vec<(Effect, Completion)>,
    frames: BTreeMap<usize, Frame>,
    finished: u64,
}

impl TimedStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last settled frame of a slide
    pub fn frame(&self, slide: usize) -> Option<Frame> {
        self.frames.get(&slide).copied()
    }

    /// Slides whose settled frame is visible, in slide order
    pub fn visible_slides(&self) -> Vec<usize> {
        self.frames
            .iter()
            .filter(|(_, frame)| frame.visible)
            .map(|(slide, _)| *slide)
            .collect()
    }

    pub fn running(&self) -> impl Iterator<Item = &Effect> {
        self.running.iter().map(|(effect, _)| effect)
    }

    pub fn finished_count(&self) -> u64 {
        self.finished
    }
}

impl Stage for TimedStage {
    fn snap(&mut self, effect: &Effect) {
        record_end_frames(&mut self.frames, effect);
    }

    fn animate(&mut self, effect: Effect, done: Completion) {
        if effect.duration.is_zero() {
            record_end_frames(&mut self.frames, &effect);
            self.finished += 1;
            done.complete();
            return;
        }
        self.running.push((effect, done));
    }

    fn advance(&mut self, now: Duration) {
        let (due, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.running)
            .into_iter()
            .partition(|(effect, _)| effect.ends_at() <= now);
        self.running = running;
        for (effect, done) in due {
            record_end_frames(&mut self.frames, &effect);
            self.finished += 1;
            done.complete();
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.running.iter().map(|(effect, _)| effect.ends_at()).min()
    }
}

fn record_end_frames(frames: &mut BTreeMap<usize, Frame>, effect: &Effect) {
    for layer in &effect.layers {
        frames.insert(layer.slide, layer.end_frame());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn dims() -> Dimensions {
        Dimensions::new(100.0, 50.0)
    }

    fn effect(duration_ms: u64) -> Effect {
        Effect {
            id: TransitionId(1),
            kind: "fade".into(),
            from: 0,
            to: 1,
            started_at: Duration::from_millis(1_000),
            duration: Duration::from_millis(duration_ms),
            easing: Easing::Linear,
            layers: vec![
                LayerMotion {
                    slide: 0,
                    z_index: 2,
                    from: Frame::shown(dims()),
                    to: Frame::shown(dims()).with_opacity(0.0),
                    hide_on_complete: true,
                },
                LayerMotion {
                    slide: 1,
                    z_index: 1,
                    from: Frame::shown(dims()),
                    to: Frame::shown(dims()),
                    hide_on_complete: false,
                },
            ],
        }
    }

    #[test]
    fn test_effect_progress() {
        let effect = effect(200);
        assert_eq!(effect.progress(Duration::from_millis(900)), 0.0);
        assert!((effect.progress(Duration::from_millis(1_100)) - 0.5).abs() < 1e-9);
        assert_eq!(effect.progress(Duration::from_millis(1_300)), 1.0);
    }

    #[test]
    fn test_frames_interpolate_then_hide() {
        let effect = effect(200);
        let mid = effect.frames_at(Duration::from_millis(1_100));
        assert!((mid[0].1.opacity - 0.5).abs() < 1e-9);
        assert!(mid[0].1.visible);

        let end = effect.frames_at(Duration::from_millis(1_200));
        assert!(!end[0].1.visible);
        assert!(end[1].1.visible);
    }

    #[test]
    fn test_timed_stage_completes_after_duration() {
        let (tx, rx) = mpsc::channel();
        let mut stage = TimedStage::new();
        stage.animate(effect(200), Completion::new(TransitionId(1), tx));

        assert_eq!(stage.next_deadline(), Some(Duration::from_millis(1_200)));
        stage.advance(Duration::from_millis(1_199));
        assert!(rx.try_recv().is_err());

        stage.advance(Duration::from_millis(1_200));
        assert_eq!(rx.try_recv().unwrap(), TransitionId(1));
        assert_eq!(stage.visible_slides(), vec![1]);
        assert_eq!(stage.finished_count(), 1);
        assert!(stage.next_deadline().is_none());
    }

    #[test]
    fn test_instant_stage_completes_immediately() {
        let (tx, rx) = mpsc::channel();
        let mut stage = InstantStage::new();
        stage.animate(effect(5_000), Completion::new(TransitionId(7), tx));
        assert_eq!(rx.try_recv().unwrap(), TransitionId(7));
        assert!(!stage.frame(0).unwrap().visible);
    }
}
