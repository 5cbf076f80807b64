//! Vizij Tween Core (engine-agnostic)
//!
//! Time-driven interpolation of target properties: easing curves, value
//! interpolation with axis constraints, the per-tween lifecycle state machine
//! and a registry that ticks every live tween once per frame. Stateless
//! per-frame followers live in [`follow`]. Hosts (Bevy, tests) plug in through
//! the traits in [`binding`] and [`callback`].

pub mod binding;
pub mod callback;
pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod event;
pub mod follow;
pub mod ids;
pub mod interp;
pub mod outputs;
pub mod params;
pub mod request;
pub mod value;

// Re-exports for consumers (adapters)
pub use binding::{
    CoordinateSpace, NullHost, SplineEvaluator, SplineSample, TargetDirectory, TargetProperty,
    TargetWriter, TweenHost, TweenTarget,
};
pub use callback::{
    Callback, CallbackArgs, CallbackError, CallbackInvoker, CallbackTable, Hook, Hooks,
};
pub use config::Config;
pub use easing::{ease, CurveTable, CustomCurve, EaseCurve, EaseType};
pub use engine::{MatchMode, Selector, TweenContext, TweenEngine};
pub use error::TweenError;
pub use event::{Phase, TweenEvent};
pub use follow::Follow;
pub use ids::{IdAllocator, TargetId, TweenId};
pub use interp::{apply_constraint, interp_to, interpolate, AxisConstraint};
pub use outputs::{Change, CoreEvent, DiagnosticLevel, Outputs};
pub use params::{parse_parameters, ParamError, ParamReport};
pub use request::{
    DelayPolicy, DurationMode, LookMode, LoopMode, Orientation, SplineRoute, TweenRequest,
};
pub use value::{Value, ValueKind};
