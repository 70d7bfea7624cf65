//! Strategy registry
//!
//! Maps `transition.type` (and `transition.direction` for directional types)
//! to a [`TransitionStrategy`]. Registration is explicit; lookups of anything
//! not registered fail with [`EngineError::UnknownTransitionType`].

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use super::{
    FadeTransition, FnStrategy, NoneTransition, RevealTransition, SlideTransition,
    TransitionContext, TransitionStrategy,
};
use crate::core::{Completion, Direction, EngineError, Result, Stage, TransitionOptions};

enum Entry {
    Single(Box<dyn TransitionStrategy>),
    Directional(HashMap<Direction, Box<dyn TransitionStrategy>>),
}

/// Registry of transition strategies keyed by type and direction
pub struct TransitionRegistry {
    entries: HashMap<String, Entry>,
}

impl TransitionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry with `none`, `fade`, `slide` and `reveal` registered
    pub fn with_builtin_transitions() -> Self {
        let mut registry = Self::new();
        registry.register("none", NoneTransition);
        registry.register("fade", FadeTransition);
        registry.register("reveal", RevealTransition);
        for direction in Direction::ALL {
            registry.register_directional("slide", direction, SlideTransition::new(direction));
        }
        registry
    }

    /// Register a strategy for every direction of `kind`, replacing any previous entry
    pub fn register<T>(&mut self, kind: impl Into<String>, strategy: T)
    where
        T: TransitionStrategy + 'static,
    {
        let kind = kind.into();
        debug!(kind, "Registering transition");
        self.entries.insert(kind, Entry::Single(Box::new(strategy)));
    }

    /// Register a closure as a strategy
    pub fn register_fn<F>(&mut self, kind: impl Into<String>, strategy: F)
    where
        F: FnMut(&TransitionContext<'_>, &mut dyn Stage, Completion) + 'static,
    {
        self.register(kind, FnStrategy(strategy));
    }

    /// Register a strategy for one direction of a directional `kind`
    ///
    /// A non-directional entry under the same name is replaced.
    pub fn register_directional<T>(
        &mut self,
        kind: impl Into<String>,
        direction: Direction,
        strategy: T,
    ) where
        T: TransitionStrategy + 'static,
    {
        let kind = kind.into();
        debug!(kind, %direction, "Registering directional transition");
        let entry = self
            .entries
            .entry(kind)
            .or_insert_with(|| Entry::Directional(HashMap::new()));
        if let Entry::Single(_) = entry {
            *entry = Entry::Directional(HashMap::new());
        }
        if let Entry::Directional(by_direction) = entry {
            by_direction.insert(direction, Box::new(strategy));
        }
    }

    /// Remove every strategy registered under `kind`
    pub fn unregister(&mut self, kind: &str) -> bool {
        self.entries.remove(kind).is_some()
    }

    /// Registered type names, sorted
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.entries.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Directions registered for a directional `kind`; empty otherwise
    pub fn directions(&self, kind: &str) -> Vec<Direction> {
        match self.entries.get(kind) {
            Some(Entry::Directional(by_direction)) => Direction::ALL
                .into_iter()
                .filter(|direction| by_direction.contains_key(direction))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_directional(&self, kind: &str) -> bool {
        matches!(self.entries.get(kind), Some(Entry::Directional(_)))
    }

    /// Check that `options` selects a registered strategy
    pub fn check(&self, options: &TransitionOptions) -> Result<()> {
        match self.entries.get(&options.kind) {
            Some(Entry::Single(_)) => Ok(()),
            Some(Entry::Directional(by_direction))
                if by_direction.contains_key(&options.direction) =>
            {
                Ok(())
            }
            Some(Entry::Directional(_)) => Err(EngineError::unknown_transition(
                options.kind.clone(),
                Some(options.direction),
            )),
            None => Err(EngineError::unknown_transition(options.kind.clone(), None)),
        }
    }

    /// Strategy selected by `options`
    pub fn resolve(
        &mut self,
        options: &TransitionOptions,
    ) -> Result<&mut (dyn TransitionStrategy + 'static)> {
        trace!(kind = options.kind, direction = %options.direction, "Resolving transition");
        match self.entries.get_mut(&options.kind) {
            Some(Entry::Single(strategy)) => Ok(strategy.as_mut()),
            Some(Entry::Directional(by_direction)) => by_direction
                .get_mut(&options.direction)
                .map(|strategy| strategy.as_mut())
                .ok_or_else(|| {
                    EngineError::unknown_transition(options.kind.clone(), Some(options.direction))
                }),
            None => Err(EngineError::unknown_transition(options.kind.clone(), None)),
        }
    }
}

impl Default for TransitionRegistry {
    fn default() -> Self {
        Self::with_builtin_transitions()
    }
}

impl fmt::Debug for TransitionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
