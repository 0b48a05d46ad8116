//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the engine and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod clock;
pub mod event_bus;
pub mod light_commander;

pub use clock::{Clock, SystemClock};
pub use event_bus::EventPublisher;
pub use light_commander::LightCommander;
