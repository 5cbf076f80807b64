//! Tween requests.
//!
//! A [`TweenRequest`] is the single configuration struct consumed by
//! `TweenEngine::create`/`spawn`. The preset constructors only pre-fill it for
//! the common target/property pairs; every field stays public so callers can
//! tweak anything afterwards. Requests deserialize from JSON (callbacks and
//! sampler curves are skipped).

use serde::{Deserialize, Serialize};

use crate::binding::{CoordinateSpace, TargetProperty, TweenTarget};
use crate::callback::{Callback, Hook, Hooks};
use crate::config::Config;
use crate::easing::{CustomCurve, EaseType};
use crate::ids::TargetId;
use crate::interp::AxisConstraint;
use crate::value::Value;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationMode {
    /// `duration` is in seconds.
    #[default]
    FixedSeconds,
    /// `duration` is a speed in value units per second; the run time is
    /// `distance(from, to) / speed`.
    RateUnitsPerSecond,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayPolicy {
    #[default]
    BeforeFirstIterationOnly,
    BeforeEveryIteration,
}

impl DelayPolicy {
    pub fn parse(name: &str) -> Option<Self> {
        match normalize(name).as_str() {
            "first" | "firstonly" | "beforefirst" | "firstloopiterationonly"
            | "beforefirstiterationonly" | "once" => Some(DelayPolicy::BeforeFirstIterationOnly),
            "every" | "each" | "always" | "beforeevery" | "everyloopiteration"
            | "beforeeveryiteration" => Some(DelayPolicy::BeforeEveryIteration),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    #[default]
    Once,
    Loop,
    PingPong,
    /// One forward and one backward pass.
    PingPongOnce,
}

impl LoopMode {
    pub fn parse(name: &str) -> Option<Self> {
        match normalize(name).as_str() {
            "once" | "none" | "noloop" => Some(LoopMode::Once),
            "loop" | "rewind" | "restart" => Some(LoopMode::Loop),
            "pingpong" | "yoyo" => Some(LoopMode::PingPong),
            "pingpongonce" | "yoyoonce" | "backandforth" => Some(LoopMode::PingPongOnce),
            _ => None,
        }
    }
}

impl From<&str> for LoopMode {
    /// Unknown names fall back to `Once`.
    fn from(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            log::warn!("unknown loop type '{s}', falling back to once");
            LoopMode::Once
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookMode {
    #[default]
    NoOrientationChange,
    /// Face `Orientation::target` while moving.
    OrientToTarget,
    /// Face the direction of travel.
    OrientToPath,
}

impl LookMode {
    pub fn parse(name: &str) -> Option<Self> {
        match normalize(name).as_str() {
            "none" | "noorientationchange" | "off" => Some(LookMode::NoOrientationChange),
            "target" | "orienttotarget" | "lookat" => Some(LookMode::OrientToTarget),
            "path" | "orienttopath" | "travel" => Some(LookMode::OrientToPath),
            _ => None,
        }
    }
}

/// Orientation while moving (location and spline location tweens).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Orientation {
    pub mode: LookMode,
    pub target: Option<TargetId>,
    /// Blend rate toward the look rotation, per second.
    pub speed: f32,
    pub constraint: AxisConstraint,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            mode: LookMode::NoOrientationChange,
            target: None,
            speed: 5.0,
            constraint: AxisConstraint::None,
        }
    }
}

/// Route along a spline for `SplineLocation`/`SplineRotation` tweens.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplineRoute {
    pub spline: TargetId,
    /// Blend from the target's start location onto the path by eased progress.
    #[serde(default)]
    pub interpolate_to_path: bool,
    /// Turn sampled rotations by 180 degrees of yaw.
    #[serde(default)]
    pub reverse_orientation: bool,
    /// Start at this control point instead of the spline start.
    #[serde(default)]
    pub from_point: Option<usize>,
    /// End at this control point instead of the spline end.
    #[serde(default)]
    pub to_point: Option<usize>,
    #[serde(default)]
    pub destroy_spline_on_complete: bool,
}

impl SplineRoute {
    pub fn new(spline: TargetId) -> Self {
        Self {
            spline,
            interpolate_to_path: false,
            reverse_orientation: false,
            from_point: None,
            to_point: None,
            destroy_spline_on_complete: false,
        }
    }
}

/// Everything needed to create one tween.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenRequest {
    /// User tag used by `Selector::Tag`.
    pub tag: Option<String>,
    pub target: TweenTarget,
    pub property: TargetProperty,

    /// Start value; `None` reads the target's current value when the tween starts.
    pub from: Option<Value>,
    pub to: Value,
    /// Write exactly `to` on the final step.
    pub enforce_exact_to: bool,

    pub delay: f32,
    pub delay_policy: DelayPolicy,
    pub duration_mode: DurationMode,
    /// Seconds, or units per second under `RateUnitsPerSecond`.
    pub duration: f32,

    pub ease: EaseType,
    pub custom_curve: Option<CustomCurve>,
    pub punch_amplitude: f32,

    pub loop_mode: LoopMode,
    /// 0 = unbounded.
    pub max_loops: u32,

    pub constraint: AxisConstraint,
    /// Rotation only: each axis takes the short way round.
    pub shortest_path: bool,
    pub space: CoordinateSpace,
    pub orientation: Orientation,
    pub spline: Option<SplineRoute>,

    /// Advance at most once per this many seconds (0 = every tick).
    pub timer_interval: f32,
    pub tick_when_paused: bool,
    pub ignore_time_dilation: bool,
    pub destroy_when_target_invalid: bool,
    pub cull_when_not_rendered: bool,
    pub seconds_before_cull: f32,

    pub initialize_on_spawn: bool,
    pub retain_when_finished: bool,

    /// `key=value;...` overrides applied at initialization.
    pub parameters: Option<String>,

    #[serde(skip)]
    pub hooks: Hooks,
}

impl Default for TweenRequest {
    fn default() -> Self {
        Self::with_config(&Config::default())
    }
}

impl TweenRequest {
    /// Blank data request using the config's defaults.
    pub fn with_config(cfg: &Config) -> Self {
        Self {
            tag: None,
            target: TweenTarget::None,
            property: TargetProperty::Data,
            from: None,
            to: Value::Float(0.0),
            enforce_exact_to: true,
            delay: 0.0,
            delay_policy: DelayPolicy::default(),
            duration_mode: DurationMode::FixedSeconds,
            duration: cfg.default_duration,
            ease: cfg.default_ease,
            custom_curve: None,
            punch_amplitude: cfg.default_punch_amplitude,
            loop_mode: LoopMode::Once,
            max_loops: 0,
            constraint: AxisConstraint::None,
            shortest_path: false,
            space: CoordinateSpace::World,
            orientation: Orientation::default(),
            spline: None,
            timer_interval: 0.0,
            tick_when_paused: false,
            ignore_time_dilation: false,
            destroy_when_target_invalid: true,
            cull_when_not_rendered: false,
            seconds_before_cull: cfg.default_cull_delay,
            initialize_on_spawn: true,
            retain_when_finished: false,
            parameters: None,
            hooks: Hooks::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn bound(target: TweenTarget, property: TargetProperty, to: Value) -> Self {
        Self {
            target,
            property,
            to,
            ..Self::default()
        }
    }

    // Presets

    pub fn actor_move(actor: TargetId, to: [f32; 3]) -> Self {
        Self::bound(TweenTarget::Actor(actor), TargetProperty::Location, Value::Vec3(to))
    }

    pub fn actor_rotate(actor: TargetId, to: [f32; 3]) -> Self {
        Self::bound(TweenTarget::Actor(actor), TargetProperty::Rotation, Value::Rotation(to))
    }

    pub fn actor_scale(actor: TargetId, to: [f32; 3]) -> Self {
        Self::bound(TweenTarget::Actor(actor), TargetProperty::Scale, Value::Vec3(to))
    }

    pub fn component_move(component: TargetId, to: [f32; 3]) -> Self {
        Self::bound(
            TweenTarget::Component(component),
            TargetProperty::Location,
            Value::Vec3(to),
        )
    }

    pub fn component_rotate(component: TargetId, to: [f32; 3]) -> Self {
        Self::bound(
            TweenTarget::Component(component),
            TargetProperty::Rotation,
            Value::Rotation(to),
        )
    }

    pub fn component_scale(component: TargetId, to: [f32; 3]) -> Self {
        Self::bound(
            TweenTarget::Component(component),
            TargetProperty::Scale,
            Value::Vec3(to),
        )
    }

    pub fn widget_move(widget: TargetId, to: [f32; 2]) -> Self {
        Self::bound(
            TweenTarget::Widget(widget),
            TargetProperty::WidgetTranslation,
            Value::Vec2(to),
        )
    }

    pub fn widget_rotate(widget: TargetId, to_angle: f32) -> Self {
        Self::bound(
            TweenTarget::Widget(widget),
            TargetProperty::WidgetAngle,
            Value::Float(to_angle),
        )
    }

    pub fn widget_scale(widget: TargetId, to: [f32; 2]) -> Self {
        Self::bound(
            TweenTarget::Widget(widget),
            TargetProperty::WidgetScale,
            Value::Vec2(to),
        )
    }

    pub fn widget_shear(widget: TargetId, to: [f32; 2]) -> Self {
        Self::bound(
            TweenTarget::Widget(widget),
            TargetProperty::WidgetShear,
            Value::Vec2(to),
        )
    }

    /// Move along the whole spline; endpoints come from the route.
    pub fn actor_move_along_spline(actor: TargetId, route: SplineRoute) -> Self {
        Self {
            spline: Some(route),
            ..Self::bound(
                TweenTarget::Actor(actor),
                TargetProperty::SplineLocation,
                Value::Float(0.0),
            )
        }
    }

    pub fn actor_rotate_along_spline(actor: TargetId, route: SplineRoute) -> Self {
        Self {
            spline: Some(route),
            ..Self::bound(
                TweenTarget::Actor(actor),
                TargetProperty::SplineRotation,
                Value::Float(0.0),
            )
        }
    }

    fn data(from: Value, to: Value) -> Self {
        Self {
            from: Some(from),
            to,
            ..Self::default()
        }
    }

    pub fn float(from: f32, to: f32) -> Self {
        Self::data(Value::Float(from), Value::Float(to))
    }

    pub fn vector(from: [f32; 3], to: [f32; 3]) -> Self {
        Self::data(Value::Vec3(from), Value::Vec3(to))
    }

    pub fn vector2(from: [f32; 2], to: [f32; 2]) -> Self {
        Self::data(Value::Vec2(from), Value::Vec2(to))
    }

    /// Rotation data tween; `shortest_path` defaults on.
    pub fn rotator(from: [f32; 3], to: [f32; 3]) -> Self {
        Self {
            shortest_path: true,
            ..Self::data(Value::Rotation(from), Value::Rotation(to))
        }
    }

    pub fn color(from: [f32; 4], to: [f32; 4]) -> Self {
        Self::data(Value::Color(from), Value::Color(to))
    }

    // Builders

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn starting_at(mut self, from: Value) -> Self {
        self.from = Some(from);
        self
    }

    pub fn over(mut self, seconds: f32) -> Self {
        self.duration_mode = DurationMode::FixedSeconds;
        self.duration = seconds;
        self
    }

    pub fn at_speed(mut self, units_per_second: f32) -> Self {
        self.duration_mode = DurationMode::RateUnitsPerSecond;
        self.duration = units_per_second;
        self
    }

    pub fn after(mut self, delay: f32, policy: DelayPolicy) -> Self {
        self.delay = delay;
        self.delay_policy = policy;
        self
    }

    pub fn eased(mut self, ease: EaseType) -> Self {
        self.ease = ease;
        self
    }

    pub fn looping(mut self, mode: LoopMode, max_loops: u32) -> Self {
        self.loop_mode = mode;
        self.max_loops = max_loops;
        self
    }

    pub fn constrained(mut self, constraint: AxisConstraint) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn in_space(mut self, space: CoordinateSpace) -> Self {
        self.space = space;
        self
    }

    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.parameters = Some(parameters.into());
        self
    }

    pub fn on(mut self, hook: Hook, callback: Callback) -> Self {
        self.hooks.push(hook, callback);
        self
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
