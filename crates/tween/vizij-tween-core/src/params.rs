//! String parameter overrides.
//!
//! Decodes `"key=value;key=value"` onto a [`TweenRequest`]. Keys are case
//! insensitive and ignore `_`/`-`. A malformed token or value leaves the field
//! untouched and is reported in the [`ParamReport`]; parsing never fails as a
//! whole.

use crate::binding::CoordinateSpace;
use crate::easing::EaseType;
use crate::interp::AxisConstraint;
use crate::request::{DelayPolicy, DurationMode, LookMode, LoopMode, TweenRequest};
use crate::value::{Value, ValueKind};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("Malformed parameter token '{token}' (expected key=value)")]
    MalformedToken { token: String },

    #[error("Unknown parameter '{key}'")]
    UnknownKey { key: String },

    #[error("Invalid value '{value}' for parameter '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Outcome of one parse: keys applied and problems skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamReport {
    pub applied: Vec<String>,
    pub errors: Vec<ParamError>,
}

impl ParamReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_f32(s: &str) -> Option<f32> {
    s.parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_components(s: &str) -> Option<Vec<f32>> {
    s.split(',').map(|c| parse_f32(c.trim())).collect()
}

/// Parse a value of `kind` from comma separated components.
fn parse_value(kind: ValueKind, s: &str) -> Option<Value> {
    let c = parse_components(s)?;
    let v = match (kind, c.as_slice()) {
        (ValueKind::Float, [x]) => Value::Float(*x),
        (ValueKind::Vec2, [x, y]) => Value::Vec2([*x, *y]),
        (ValueKind::Vec3, [x, y, z]) => Value::Vec3([*x, *y, *z]),
        (ValueKind::Rotation, [p, y, r]) => Value::Rotation([*p, *y, *r]),
        (ValueKind::Color, [r, g, b]) => Value::Color([*r, *g, *b, 1.0]),
        (ValueKind::Color, [r, g, b, a]) => Value::Color([*r, *g, *b, *a]),
        _ => return None,
    };
    Some(v)
}

fn endpoint_kind(request: &TweenRequest) -> ValueKind {
    request
        .property
        .value_kind()
        .unwrap_or_else(|| request.to.kind())
}

/// Apply `text` onto `request`. Unspecified fields keep their current values.
pub fn parse_parameters(text: &str, request: &mut TweenRequest) -> ParamReport {
    let mut report = ParamReport::default();
    for token in text.split(';').map(str::trim).filter(|t| !t.is_empty()) {
        let Some((raw_key, raw_value)) = token.split_once('=') else {
            report.errors.push(ParamError::MalformedToken {
                token: token.to_string(),
            });
            continue;
        };
        let key: String = raw_key
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let value = raw_value.trim();
        match apply(&key, value, request) {
            Ok(()) => report.applied.push(key),
            Err(err) => report.errors.push(err),
        }
    }
    report
}

fn apply(key: &str, value: &str, r: &mut TweenRequest) -> Result<(), ParamError> {
    let invalid = || ParamError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };
    let float = || parse_f32(value).ok_or_else(invalid);
    let flag = || parse_bool(value).ok_or_else(invalid);

    match key {
        "name" | "tag" | "tweenname" => {
            if value.is_empty() {
                return Err(invalid());
            }
            r.tag = Some(value.to_string());
        }
        "from" | "start" => {
            r.from = Some(parse_value(endpoint_kind(r), value).ok_or_else(invalid)?);
        }
        "to" | "end" => {
            r.to = parse_value(endpoint_kind(r), value).ok_or_else(invalid)?;
        }
        "time" | "duration" => {
            let v = float()?;
            if v < 0.0 {
                return Err(invalid());
            }
            r.duration_mode = DurationMode::FixedSeconds;
            r.duration = v;
        }
        "speed" | "rate" => {
            let v = float()?;
            if v <= 0.0 {
                return Err(invalid());
            }
            r.duration_mode = DurationMode::RateUnitsPerSecond;
            r.duration = v;
        }
        "delay" => {
            let v = float()?;
            if v < 0.0 {
                return Err(invalid());
            }
            r.delay = v;
        }
        "delaytype" | "delaypolicy" => r.delay_policy = DelayPolicy::parse(value).ok_or_else(invalid)?,
        "ease" | "easetype" => r.ease = EaseType::parse(value).ok_or_else(invalid)?,
        "punchamplitude" | "amplitude" => r.punch_amplitude = float()?,
        "loop" | "looptype" => r.loop_mode = LoopMode::parse(value).ok_or_else(invalid)?,
        "loops" | "maxloops" | "maxloopsections" => {
            r.max_loops = value.parse::<u32>().map_err(|_| invalid())?;
        }
        "enforce" | "enforceto" | "enforcevalueto" => r.enforce_exact_to = flag()?,
        "constraint" | "constraints" | "vectorconstraints" | "rotatorconstraints" => {
            r.constraint = AxisConstraint::parse(value).ok_or_else(invalid)?;
        }
        "shortestpath" => r.shortest_path = flag()?,
        "tickwhenpaused" => r.tick_when_paused = flag()?,
        "ignoretimedilation" => r.ignore_time_dilation = flag()?,
        "tietoobjectvalidity" | "destroywheninvalid" => r.destroy_when_target_invalid = flag()?,
        "cull" | "cullnonrendered" | "cullnonrenderedtweens" => r.cull_when_not_rendered = flag()?,
        "culldelay" | "secondsbeforecull" | "secondstowaitbeforecull" => {
            let v = float()?;
            if v < 0.0 {
                return Err(invalid());
            }
            r.seconds_before_cull = v;
        }
        "interval" | "timerinterval" => {
            let v = float()?;
            if v < 0.0 {
                return Err(invalid());
            }
            r.timer_interval = v;
        }
        "space" | "coordinatespace" => r.space = CoordinateSpace::parse(value).ok_or_else(invalid)?,
        "orientation" | "orient" => r.orientation.mode = LookMode::parse(value).ok_or_else(invalid)?,
        "orientationspeed" => r.orientation.speed = float()?,
        "orientationconstraint" => {
            r.orientation.constraint = AxisConstraint::parse(value).ok_or_else(invalid)?;
        }
        "interpolatetopath" | "interpolatetospline" | "movetopath" => {
            let v = flag()?;
            r.spline.as_mut().ok_or_else(invalid)?.interpolate_to_path = v;
        }
        "reverseorientation" | "switchpathorientationdirection" => {
            let v = flag()?;
            r.spline.as_mut().ok_or_else(invalid)?.reverse_orientation = v;
        }
        "destroyspline" | "destroysplinecomponent" => {
            let v = flag()?;
            r.spline.as_mut().ok_or_else(invalid)?.destroy_spline_on_complete = v;
        }
        "retain" | "retainwhenfinished" => r.retain_when_finished = flag()?,
        _ => {
            return Err(ParamError::UnknownKey {
                key: key.to_string(),
            })
        }
    }
    Ok(())
}
