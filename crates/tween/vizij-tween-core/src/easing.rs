//! Easing curves.
//!
//! `ease()` maps linear progress in [0,1] to eased progress. Named curves are
//! pinned to exactly 0.0 at t=0 and 1.0 at t=1; between the endpoints the
//! back, elastic, spring and punch families overshoot. A custom curve, when
//! supplied, replaces the named curve and is sampled as-is.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Named easing curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EaseType {
    #[default]
    Linear,
    Spring,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    /// Overshoots and decays oscillating toward the end value; scaled by punch amplitude.
    Punch,
}

#[derive(Clone, Copy)]
enum Dir {
    In,
    Out,
    InOut,
}

// (canonical family, accepted spellings)
const FAMILIES: &[(&str, &[&str])] = &[
    ("quad", &["quad", "quadratic"]),
    ("cubic", &["cubic"]),
    ("quart", &["quart", "quartic"]),
    ("quint", &["quint", "quintic"]),
    ("sine", &["sine", "sin", "sinusoidal"]),
    ("expo", &["expo", "exponential"]),
    ("circ", &["circ", "circular"]),
    ("bounce", &["bounce"]),
    ("back", &["back"]),
    ("elastic", &["elastic"]),
];

impl EaseType {
    /// Every named curve, in declaration order.
    pub const ALL: [EaseType; 33] = [
        EaseType::Linear,
        EaseType::Spring,
        EaseType::EaseInQuad,
        EaseType::EaseOutQuad,
        EaseType::EaseInOutQuad,
        EaseType::EaseInCubic,
        EaseType::EaseOutCubic,
        EaseType::EaseInOutCubic,
        EaseType::EaseInQuart,
        EaseType::EaseOutQuart,
        EaseType::EaseInOutQuart,
        EaseType::EaseInQuint,
        EaseType::EaseOutQuint,
        EaseType::EaseInOutQuint,
        EaseType::EaseInSine,
        EaseType::EaseOutSine,
        EaseType::EaseInOutSine,
        EaseType::EaseInExpo,
        EaseType::EaseOutExpo,
        EaseType::EaseInOutExpo,
        EaseType::EaseInCirc,
        EaseType::EaseOutCirc,
        EaseType::EaseInOutCirc,
        EaseType::EaseInBounce,
        EaseType::EaseOutBounce,
        EaseType::EaseInOutBounce,
        EaseType::EaseInBack,
        EaseType::EaseOutBack,
        EaseType::EaseInOutBack,
        EaseType::EaseInElastic,
        EaseType::EaseOutElastic,
        EaseType::EaseInOutElastic,
        EaseType::Punch,
    ];

    /// Families whose output leaves [0,1] between the endpoints.
    #[inline]
    pub fn overshoots(&self) -> bool {
        matches!(
            self,
            Self::Spring
                | Self::EaseInBack
                | Self::EaseOutBack
                | Self::EaseInOutBack
                | Self::EaseInElastic
                | Self::EaseOutElastic
                | Self::EaseInOutElastic
                | Self::Punch
        )
    }

    /// Parse a curve name. Case, `_`, `-` and spaces are ignored, a leading
    /// `ease` is optional and the direction may come before or after the
    /// family: `easeInOutQuad`, `quad_in_out`, `in-out-quadratic` all match.
    pub fn parse(name: &str) -> Option<Self> {
        let norm: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let n = norm.strip_prefix("ease").unwrap_or(&norm);
        match n {
            "linear" => return Some(Self::Linear),
            "spring" => return Some(Self::Spring),
            "punch" => return Some(Self::Punch),
            _ => {}
        }
        for (family, spellings) in FAMILIES {
            for spelling in spellings.iter() {
                for (dir_name, dir) in [("inout", Dir::InOut), ("in", Dir::In), ("out", Dir::Out)] {
                    let prefixed = n.strip_prefix(dir_name) == Some(spelling);
                    let suffixed = n.strip_suffix(dir_name) == Some(spelling);
                    if prefixed || suffixed {
                        return Self::compose(family, dir);
                    }
                }
            }
        }
        None
    }

    fn compose(family: &str, dir: Dir) -> Option<Self> {
        use EaseType::*;
        let e = match (family, dir) {
            ("quad", Dir::In) => EaseInQuad,
            ("quad", Dir::Out) => EaseOutQuad,
            ("quad", Dir::InOut) => EaseInOutQuad,
            ("cubic", Dir::In) => EaseInCubic,
            ("cubic", Dir::Out) => EaseOutCubic,
            ("cubic", Dir::InOut) => EaseInOutCubic,
            ("quart", Dir::In) => EaseInQuart,
            ("quart", Dir::Out) => EaseOutQuart,
            ("quart", Dir::InOut) => EaseInOutQuart,
            ("quint", Dir::In) => EaseInQuint,
            ("quint", Dir::Out) => EaseOutQuint,
            ("quint", Dir::InOut) => EaseInOutQuint,
            ("sine", Dir::In) => EaseInSine,
            ("sine", Dir::Out) => EaseOutSine,
            ("sine", Dir::InOut) => EaseInOutSine,
            ("expo", Dir::In) => EaseInExpo,
            ("expo", Dir::Out) => EaseOutExpo,
            ("expo", Dir::InOut) => EaseInOutExpo,
            ("circ", Dir::In) => EaseInCirc,
            ("circ", Dir::Out) => EaseOutCirc,
            ("circ", Dir::InOut) => EaseInOutCirc,
            ("bounce", Dir::In) => EaseInBounce,
            ("bounce", Dir::Out) => EaseOutBounce,
            ("bounce", Dir::InOut) => EaseInOutBounce,
            ("back", Dir::In) => EaseInBack,
            ("back", Dir::Out) => EaseOutBack,
            ("back", Dir::InOut) => EaseInOutBack,
            ("elastic", Dir::In) => EaseInElastic,
            ("elastic", Dir::Out) => EaseOutElastic,
            ("elastic", Dir::InOut) => EaseInOutElastic,
            _ => return None,
        };
        Some(e)
    }

    /// Apply the curve with the default punch amplitude.
    #[inline]
    pub fn apply(&self, t: f32) -> f32 {
        self.apply_with_amplitude(t, 1.0)
    }

    /// Apply the curve to a progress value (0.0 to 1.0).
    pub fn apply_with_amplitude(&self, t: f32, punch_amplitude: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            EaseType::Linear => t,
            EaseType::Spring => spring(t),
            EaseType::EaseInQuad => t * t,
            EaseType::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EaseType::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EaseType::EaseInCubic => t * t * t,
            EaseType::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EaseType::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EaseType::EaseInQuart => t.powi(4),
            EaseType::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            EaseType::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            EaseType::EaseInQuint => t.powi(5),
            EaseType::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            EaseType::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            EaseType::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            EaseType::EaseOutSine => (t * PI / 2.0).sin(),
            EaseType::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            EaseType::EaseInExpo => 2f32.powf(10.0 * t - 10.0),
            EaseType::EaseOutExpo => 1.0 - 2f32.powf(-10.0 * t),
            EaseType::EaseInOutExpo => {
                if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            EaseType::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            EaseType::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            EaseType::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            EaseType::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            EaseType::EaseOutBounce => bounce_out(t),
            EaseType::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
            EaseType::EaseInBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            EaseType::EaseOutBack => {
                let u = t - 1.0;
                1.0 + BACK_C3 * u.powi(3) + BACK_C1 * u.powi(2)
            }
            EaseType::EaseInOutBack => {
                let c2 = BACK_C1 * 1.525;
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (t * 2.0 - 2.0) + c2) + 2.0) / 2.0
                }
            }
            EaseType::EaseInElastic => {
                let c4 = (2.0 * PI) / 3.0;
                -(2f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * c4).sin()
            }
            EaseType::EaseOutElastic => {
                let c4 = (2.0 * PI) / 3.0;
                2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
            }
            EaseType::EaseInOutElastic => {
                let c5 = (2.0 * PI) / 4.5;
                if t < 0.5 {
                    -(2f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
                } else {
                    (2f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0 + 1.0
                }
            }
            EaseType::Punch => punch(t, punch_amplitude),
        }
    }
}

impl From<&str> for EaseType {
    /// Unknown names fall back to linear so a bad name never aborts a tween.
    fn from(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            log::warn!("unknown ease type '{s}', falling back to linear");
            Self::Linear
        })
    }
}

const BACK_C1: f32 = 1.70158;
const BACK_C3: f32 = BACK_C1 + 1.0;
const PUNCH_PERIOD: f32 = 0.3;

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

fn spring(t: f32) -> f32 {
    let s = (t * PI * (0.2 + 2.5 * t * t * t)).sin() * (1.0 - t).powf(2.2) + t;
    s * (1.0 + 1.2 * (1.0 - t))
}

fn punch(t: f32, amplitude: f32) -> f32 {
    let w = 2.0 * PI / PUNCH_PERIOD;
    1.0 - 2f32.powf(-10.0 * t) * ((w * t).cos() - amplitude * (w * t).sin())
}

/// Externally supplied easing sampler. Overrides the named curve when present.
pub trait EaseCurve: Send + Sync {
    fn sample(&self, t: f32) -> f32;
}

impl<F> EaseCurve for F
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    fn sample(&self, t: f32) -> f32 {
        self(t)
    }
}

/// Piecewise-linear keyed curve, e.g. authored in a tool and shipped as data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveTable {
    /// (time, value) keys; sorted by time on construction.
    pub keys: Vec<(f32, f32)>,
}

impl CurveTable {
    pub fn new(mut keys: Vec<(f32, f32)>) -> Self {
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }
}

impl EaseCurve for CurveTable {
    fn sample(&self, t: f32) -> f32 {
        let keys = &self.keys;
        match keys.len() {
            0 => t,
            1 => keys[0].1,
            n => {
                if t <= keys[0].0 {
                    return keys[0].1;
                }
                if t >= keys[n - 1].0 {
                    return keys[n - 1].1;
                }
                let i = keys.partition_point(|k| k.0 <= t);
                let (t0, v0) = keys[i - 1];
                let (t1, v1) = keys[i];
                let span = (t1 - t0).max(f32::EPSILON);
                v0 + (v1 - v0) * ((t - t0) / span)
            }
        }
    }
}

/// Custom curve attached to a request: serializable table or opaque sampler.
#[derive(Clone, Serialize, Deserialize)]
pub enum CustomCurve {
    Table(CurveTable),
    #[serde(skip)]
    Sampler(Arc<dyn EaseCurve>),
}

impl CustomCurve {
    pub fn sampler<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        CustomCurve::Sampler(Arc::new(f))
    }
}

impl fmt::Debug for CustomCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomCurve::Table(t) => f.debug_tuple("Table").field(t).finish(),
            CustomCurve::Sampler(_) => f.write_str("Sampler(..)"),
        }
    }
}

impl EaseCurve for CustomCurve {
    fn sample(&self, t: f32) -> f32 {
        match self {
            CustomCurve::Table(table) => table.sample(t),
            CustomCurve::Sampler(s) => s.sample(t),
        }
    }
}

/// Eased progress for `t`. `custom` wins over `curve` when supplied.
#[inline]
pub fn ease(
    curve: EaseType,
    custom: Option<&dyn EaseCurve>,
    punch_amplitude: f32,
    t: f32,
) -> f32 {
    match custom {
        Some(c) => c.sample(t),
        None => curve.apply_with_amplitude(t, punch_amplitude),
    }
}
