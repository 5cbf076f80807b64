//! Error types for tween requests and registry lookups.

use crate::binding::TargetProperty;
use crate::ids::{TargetId, TweenId};
use crate::value::ValueKind;

/// Configuration and lookup failures. Nothing inside a tick returns these;
/// per-tick problems degrade to diagnostics instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TweenError {
    /// No live tween occupies this slot
    #[error("Tween not found: {id}")]
    TweenNotFound { id: TweenId },

    /// Initialization requested for a tween that is already running its lifecycle
    #[error("Tween {id} is already initialized")]
    AlreadyInitialized { id: TweenId },

    /// Property writes to an object but no target was given
    #[error("Missing target for {property:?} tween")]
    MissingTarget { property: TargetProperty },

    /// Target kind cannot carry the property (e.g. widget shear on an actor)
    #[error("{property:?} cannot be applied to a {target_kind} target")]
    TargetKindMismatch {
        property: TargetProperty,
        target_kind: &'static str,
    },

    /// End value kind does not match what the property expects
    #[error("Value type mismatch: {property:?} expects {expected:?}, got {actual:?}")]
    ValueKindMismatch {
        property: TargetProperty,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Start and end values are of different kinds
    #[error("Start value is {from:?} but end value is {to:?}")]
    MismatchedEndpoints { from: ValueKind, to: ValueKind },

    /// Data tweens have no target to read a start value from
    #[error("Data tween requires an explicit start value")]
    MissingFromValue,

    /// Every tween id has been handed out; ids are never reused
    #[error("Tween registry is full: no tween ids left")]
    RegistryFull,

    /// Followers only drive transform and widget properties
    #[error("{property:?} cannot be followed")]
    NotFollowable { property: TargetProperty },

    /// Target is gone or does not expose the property right now
    #[error("Target {target:?} is unavailable")]
    TargetUnavailable { target: TargetId },

    /// Spline properties need a spline route
    #[error("{property:?} requires a spline route")]
    MissingSpline { property: TargetProperty },
}
