//! Value interpolation and per-axis constraints.
//!
//! `functions` holds the affine helpers and the kind-dispatching `interpolate`;
//! `constraints` restores masked-out components from the previous value.

pub mod constraints;
pub mod functions;

pub use constraints::{apply_constraint, AxisConstraint};
pub use functions::{
    interp_to, interpolate, lerp_f32, lerp_rotation, lerp_vec2, lerp_vec3, lerp_vec4,
    normalize_axis, travel_distance,
};
