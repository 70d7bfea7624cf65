//! `reveal`: wipe the incoming slide in from the left edge

use super::{TransitionContext, TransitionStrategy};
use crate::core::{Completion, Frame, LayerMotion, Stage};

/// Grows the incoming slide's width from zero on top of the stack
///
/// Each reveal stacks one higher than the last (`iteration + 1`), so the
/// newest slide always covers the older ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct RevealTransition;

impl TransitionStrategy for RevealTransition {
    fn apply(&mut self, cx: &TransitionContext<'_>, stage: &mut dyn Stage, done: Completion) {
        let shown = Frame::shown(cx.dimensions);
        let effect = cx.effect(vec![
            LayerMotion {
                slide: cx.from,
                z_index: cx.iteration,
                from: shown,
                to: shown,
                hide_on_complete: true,
            },
            LayerMotion {
                slide: cx.to,
                z_index: cx.iteration + 1,
                from: shown.with_width(0.0),
                to: shown,
                hide_on_complete: false,
            },
        ]);
        stage.animate(effect, done);
    }
}
