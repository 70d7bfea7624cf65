//! Circular index model over the slide handles

use super::error::{EngineError, Result};

/// Ordered, fixed-size ring of opaque slide handles
///
/// The handle sequence is frozen once the ring is built. Only the indices move:
/// `advance_to` commits a new current slide, `stage` picks which slide the next
/// transition will land on.
#[derive(Debug, Clone)]
pub struct SlideRing<S> {
    slides: Vec<S>,
    current: usize,
    next: usize,
}

impl<S> SlideRing<S> {
    /// Build a ring positioned on the first slide
    pub fn new(slides: Vec<S>) -> Self {
        let mut ring = Self {
            slides,
            current: 0,
            next: 0,
        };
        ring.next = ring.successor(0);
        ring
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[S] {
        &self.slides
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.slides.get(index)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> Option<&S> {
        self.slides.get(self.current)
    }

    /// Slide the next transition will land on
    pub fn peek_next(&self) -> usize {
        self.next
    }

    /// Slide before the current one, wrapping to the last slide
    pub fn peek_previous(&self) -> usize {
        match self.len() {
            0 => 0,
            len => (self.current + len - 1) % len,
        }
    }

    pub fn peek_last(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Commit `target` as the current slide and restore the successor as next
    pub fn advance_to(&mut self, target: usize) -> Result<()> {
        self.check(target)?;
        self.current = target;
        self.next = self.successor(target);
        Ok(())
    }

    /// Stage `target` as the slide the next transition lands on
    pub fn stage(&mut self, target: usize) -> Result<()> {
        self.check(target)?;
        self.next = target;
        Ok(())
    }

    /// Whether a non-successor target is staged
    pub fn is_staged(&self) -> bool {
        self.next != self.successor(self.current)
    }

    fn successor(&self, index: usize) -> usize {
        match self.len() {
            0 => 0,
            len => (index + 1) % len,
        }
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(EngineError::index_out_of_range(index, self.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(len: usize) -> SlideRing<usize> {
        SlideRing::new((0..len).collect())
    }

    #[test]
    fn test_new_ring_indices() {
        let ring = ring(4);
        assert_eq!(ring.current(), 0);
        assert_eq!(ring.peek_next(), 1);
        assert_eq!(ring.peek_previous(), 3);
        assert_eq!(ring.peek_last(), 3);
        assert!(!ring.is_staged());
    }

    #[test]
    fn test_advance_wraps() {
        let mut ring = ring(3);
        ring.advance_to(2).unwrap();
        assert_eq!(ring.peek_next(), 0);
        assert_eq!(ring.peek_previous(), 1);
    }

    #[test]
    fn test_advance_out_of_range() {
        let mut ring = ring(3);
        let err = ring.advance_to(3).unwrap_err();
        assert!(matches!(
            err,
            EngineError::IndexOutOfRange { index: 3, len: 3 }
        ));
        assert_eq!(ring.current(), 0);
    }

    #[test]
    fn test_stage_then_advance_clears_staging() {
        let mut ring = ring(5);
        ring.stage(3).unwrap();
        assert!(ring.is_staged());
        let target = ring.peek_next();
        ring.advance_to(target).unwrap();
        assert_eq!(ring.current(), 3);
        assert_eq!(ring.peek_next(), 4);
        assert!(!ring.is_staged());
    }

    #[test]
    fn test_single_slide_ring() {
        let ring = ring(1);
        assert_eq!(ring.current(), 0);
        assert_eq!(ring.peek_next(), 0);
        assert_eq!(ring.peek_previous(), 0);
        assert_eq!(ring.peek_last(), 0);
    }

    #[test]
    fn test_empty_ring_rejects_everything() {
        let mut ring = ring(0);
        assert!(ring.is_empty());
        assert!(ring.current_slide().is_none());
        assert!(ring.advance_to(0).is_err());
        assert!(ring.stage(0).is_err());
    }
}
