//! Carousel - a markup-agnostic carousel engine
//!
//! The engine decides which slide is current, which comes next and when to
//! advance. It guarantees that only one transition is ever in flight and
//! leaves the visual effect to pluggable strategies and a host-provided
//! [`Stage`].
//!
//! # Quick Start
//!
//! ```rust
//! use carousel::prelude::*;
//!
//! let config = EngineConfig {
//!     auto_play: false,
//!     transition: TransitionOptions {
//!         kind: "none".into(),
//!         ..TransitionOptions::default()
//!     },
//!     ..EngineConfig::default()
//! };
//!
//! let mut engine = Engine::builder(config)
//!     .slides(["intro", "features", "pricing"])
//!     .build()
//!     .unwrap();
//!
//! engine.next(&TransitionOverrides::new()).unwrap();
//! assert_eq!(engine.current_slide(), Some(&"features"));
//! ```
//!
//! # Driving time
//!
//! Autoplay and timed effects advance when the host calls [`Engine::tick`].
//! [`Engine::next_wakeup`] says when that is next needed:
//!
//! ```rust
//! use carousel::prelude::*;
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let mut engine = Engine::builder(EngineConfig::default())
//!     .slides(1..=3)
//!     .clock(clock.clone())
//!     .build()
//!     .unwrap();
//!
//! assert!(engine.is_playing());
//! clock.set(engine.next_wakeup().unwrap());
//! engine.tick().unwrap();
//! assert_eq!(engine.current_index(), 1);
//! assert!(engine.is_animating());
//!
//! clock.advance(Duration::from_millis(500));
//! engine.tick().unwrap();
//! assert!(!engine.is_animating());
//! ```

pub mod coordinator;
pub mod core;
pub mod engine;
pub mod transitions;

pub use crate::core::*;
pub use crate::coordinator::{Scene, TransitionCoordinator};
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::transitions::{
    FadeTransition, FnStrategy, NoneTransition, RevealTransition, SlideTransition,
    TransitionContext, TransitionRegistry, TransitionStrategy,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Channel, Clock, Completion, Dimensions, Direction, Easing, Effect, EngineConfig,
        EngineError, Frame, InstantStage, LayerMotion, ManualClock, Snapshot, Stage, Status,
        SystemClock, TimedStage, TransitionOptions, TransitionOverrides,
    };
    pub use crate::engine::{Engine, EngineBuilder};
    pub use crate::transitions::{TransitionContext, TransitionRegistry, TransitionStrategy};
}
