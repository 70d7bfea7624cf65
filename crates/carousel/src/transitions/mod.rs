//! Transition strategies
//!
//! A strategy owns the visual half of a transition. It receives the slide
//! being left, the slide being entered and the merged options, hands an
//! [`Effect`] to the host [`Stage`], and makes sure the [`Completion`] is
//! eventually signalled exactly once.
//!
//! Built-in identifiers: `none`, `fade`, `slide` (directional: `left`,
//! `right`, `up`, `down`) and `reveal`. Custom strategies are added through
//! the [`TransitionRegistry`].

use std::time::Duration;

use crate::core::{
    Completion, Dimensions, Effect, LayerMotion, Stage, TransitionId, TransitionOptions,
};

mod fade;
mod none;
mod registry;
mod reveal;
mod slide;

pub use fade::*;
pub use none::*;
pub use registry::*;
pub use reveal::*;
pub use slide::*;

/// Everything a strategy knows about the transition it is running
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub id: TransitionId,
    /// Slide being left
    pub from: usize,
    /// Slide being entered
    pub to: usize,
    /// Number of slides in the ring
    pub len: usize,
    /// Transitions accepted before this one
    pub iteration: u64,
    pub options: &'a TransitionOptions,
    pub dimensions: Dimensions,
    pub now: Duration,
}

impl TransitionContext<'_> {
    /// Effect for this transition, timed by the merged options
    pub fn effect(&self, layers: Vec<LayerMotion>) -> Effect {
        Effect {
            id: self.id,
            kind: self.options.kind.clone(),
            from: self.from,
            to: self.to,
            started_at: self.now,
            duration: self.options.speed(),
            easing: self.options.easing,
            layers,
        }
    }

    /// Stacking order that puts a slide above every other one
    pub fn top_z(&self) -> u64 {
        self.len as u64
    }
}

/// Visual effect selected by `transition.type`
pub trait TransitionStrategy {
    fn apply(&mut self, cx: &TransitionContext<'_>, stage: &mut dyn Stage, done: Completion);
}

/// Adapter that lets a closure act as a strategy
pub struct FnStrategy<F>(pub F);

impl<F> TransitionStrategy for FnStrategy<F>
where
    F: FnMut(&TransitionContext<'_>, &mut dyn Stage, Completion),
{
    fn apply(&mut self, cx: &TransitionContext<'_>, stage: &mut dyn Stage, done: Completion) {
        (self.0)(cx, stage, done)
    }
}
