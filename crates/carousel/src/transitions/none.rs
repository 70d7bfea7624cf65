//! `none`: swap slides without animating

use std::time::Duration;

use super::{TransitionContext, TransitionStrategy};
use crate::core::{Completion, Frame, LayerMotion, Stage};

/// Hides the outgoing slide, shows the incoming one and completes at once
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneTransition;

impl TransitionStrategy for NoneTransition {
    fn apply(&mut self, cx: &TransitionContext<'_>, stage: &mut dyn Stage, done: Completion) {
        let shown = Frame::shown(cx.dimensions);
        let mut effect = cx.effect(vec![
            LayerMotion {
                slide: cx.from,
                z_index: cx.from as u64,
                from: shown,
                to: Frame::hidden(cx.dimensions),
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
        effect.duration = Duration::ZERO;

        stage.snap(&effect);
        done.complete();
    }
}
