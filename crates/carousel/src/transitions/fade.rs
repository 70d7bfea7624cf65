//! `fade`: fade the outgoing slide away over the incoming one

use super::{TransitionContext, TransitionStrategy};
use crate::core::{Completion, Frame, LayerMotion, Stage};

/// Raises the outgoing slide above the incoming one and fades it out
#[derive(Debug, Clone, Copy, Default)]
pub struct FadeTransition;

impl TransitionStrategy for FadeTransition {
    fn apply(&mut self, cx: &TransitionContext<'_>, stage: &mut dyn Stage, done: Completion) {
        let shown = Frame::shown(cx.dimensions);
        let effect = cx.effect(vec![
            LayerMotion {
                slide: cx.from,
                z_index: cx.top_z(),
                from: shown,
                to: shown.with_opacity(0.0),
                hide_on_complete: true,
            },
            LayerMotion {
                slide: cx.to,
                z_index: cx.to as u64,
                from: shown,
                to: shown,
                hide_on_complete: false,
            },
        ]);
        stage.animate(effect, done);
    }
}
