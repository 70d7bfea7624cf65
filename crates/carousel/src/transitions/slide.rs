//! `slide`: push the incoming slide in from one side

use super::{TransitionContext, TransitionStrategy};
use crate::core::{Completion, Direction, Frame, LayerMotion, Stage};

/// Moves both slides one container length in `direction`
///
/// `left` means the content travels leftwards: the incoming slide starts
/// one width to the right and the outgoing one leaves through the left edge.
#[derive(Debug, Clone, Copy)]
pub struct SlideTransition {
    direction: Direction,
}

impl SlideTransition {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Offset of the side the incoming slide enters from
    fn entry_offset(&self, width: f64, height: f64) -> (f64, f64) {
        match self.direction {
            Direction::Left => (width, 0.0),
            Direction::Right => (-width, 0.0),
            Direction::Up => (0.0, height),
            Direction::Down => (0.0, -height),
        }
    }
}

impl TransitionStrategy for SlideTransition {
    fn apply(&mut self, cx: &TransitionContext<'_>, stage: &mut dyn Stage, done: Completion) {
        let shown = Frame::shown(cx.dimensions);
        let (dx, dy) = self.entry_offset(cx.dimensions.width, cx.dimensions.height);
        let effect = cx.effect(vec![
            LayerMotion {
                slide: cx.from,
                z_index: cx.from as u64,
                from: shown,
                to: shown.at(-dx, -dy),
                hide_on_complete: true,
            },
            LayerMotion {
                slide: cx.to,
                z_index: cx.top_z(),
                from: shown.at(dx, dy),
                to: shown,
                hide_on_complete: false,
            },
        ]);
        stage.animate(effect, done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_offsets() {
        let offset = |direction| SlideTransition::new(direction).entry_offset(800.0, 600.0);
        assert_eq!(offset(Direction::Left), (800.0, 0.0));
        assert_eq!(offset(Direction::Right), (-800.0, 0.0));
        assert_eq!(offset(Direction::Up), (0.0, 600.0));
        assert_eq!(offset(Direction::Down), (0.0, -600.0));
    }
}
