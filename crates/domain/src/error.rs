//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`LumenError`]
//! via `#[from]`. No bare `String` variants.

use crate::id::EntityId;
use crate::light::Attribute;
use crate::time::TimeOfDay;

/// Top-level error type shared across the workspace.
#[derive(Debug, thiserror::Error)]
pub enum LumenError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("unknown scene")]
    UnknownScene(#[from] UnknownSceneError),

    #[error("malformed curve")]
    Curve(#[from] CurveError),

    #[error("command delivery failed")]
    Delivery(#[from] DeliveryError),
}

/// Invariant violations raised while constructing domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("entity id must not be empty")]
    EmptyEntityId,

    #[error("scene name must not be empty")]
    EmptySceneName,

    #[error("unparsable time of day: {value:?}")]
    InvalidTime { value: String },

    #[error("time of day out of range: {secs} seconds")]
    TimeOutOfRange { secs: u32 },

    #[error("duplicate scene name: {name}")]
    DuplicateScene { name: String },
}

/// Raised when a service call names a scene that is not loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scene: {name}")]
pub struct UnknownSceneError {
    pub name: String,
}

/// Raised by light-control adapters when a command cannot reach a device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot deliver command to {entity_id}: {reason}")]
pub struct DeliveryError {
    pub entity_id: EntityId,
    pub reason: String,
}

/// A value that does not fit the attribute it was authored for.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("{attribute} expects a number")]
    ExpectedNumber { attribute: Attribute },

    #[error("{attribute} expects a power state")]
    ExpectedPower { attribute: Attribute },

    #[error("{attribute} value {value} is not finite")]
    NotFinite { attribute: Attribute, value: f64 },

    #[error("{attribute} value {value} outside {min}..={max}")]
    OutOfRange {
        attribute: Attribute,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Why a curve failed validation.
///
/// A malformed curve is never fatal to its scene: the compiler drops the
/// curve and reports the error, and the remaining attributes keep working.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("curve has no points")]
    Empty,

    #[error("duplicate point at {at}")]
    DuplicateTime { at: TimeOfDay },

    #[error("invalid value at {at}: {source}")]
    InvalidValue {
        at: TimeOfDay,
        #[source]
        source: ValueError,
    },
}
