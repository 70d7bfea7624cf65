//! Core building blocks of the carousel engine
//!
//! Everything here is independent of any particular transition effect: the
//! slide ring, the playback status machine, lifecycle events, the autoplay
//! timer, time sources, configuration and the presentation boundary.

mod clock;
mod config;
mod error;
mod events;
pub mod logging;
mod options;
mod ring;
mod scheduler;
mod stage;
mod status;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use logging::*;
pub use options::*;
pub use ring::*;
pub use scheduler::*;
pub use stage::*;
pub use status::*;
