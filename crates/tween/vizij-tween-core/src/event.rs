//! TweenEvent: one animation instance and its per-step state machine.
//!
//! Phases: Uninitialized -> Pending -> (Delaying) -> Running -> (Looping <-> Running)
//! -> Finished. `paused` and `stopped` are orthogonal flags. A step never
//! returns an error; problems are pushed to the [`StepSink`] as diagnostics.

use serde::{Deserialize, Serialize};

use crate::binding::{CoordinateSpace, TargetProperty, TweenHost, TweenTarget};
use crate::callback::{CallbackArgs, Hook};
use crate::easing::{ease, EaseCurve};
use crate::error::TweenError;
use crate::ids::TweenId;
use crate::interp::{apply_constraint, interpolate, lerp_rotation, lerp_vec3, travel_distance};
use crate::outputs::{Change, CoreEvent, DiagnosticLevel};
use crate::params::{parse_parameters, ParamReport};
use crate::request::{DelayPolicy, DurationMode, LookMode, LoopMode, Orientation, TweenRequest};
use crate::value::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Uninitialized,
    Pending,
    Delaying,
    Running,
    /// Iteration boundary crossed; the next step re-enters Delaying or Running.
    Looping,
    Finished,
}

/// Everything one step produced. Drained by the engine after the step.
#[derive(Debug, Default)]
pub(crate) struct StepSink {
    pub changes: Vec<Change>,
    pub events: Vec<CoreEvent>,
    pub fired: Vec<CallbackArgs>,
    pub diagnostics: Vec<(DiagnosticLevel, String)>,
}

impl StepSink {
    fn diag(&mut self, level: DiagnosticLevel, message: String) {
        self.diagnostics.push((level, message));
    }
}

/// Request checks done at initialization.
pub(crate) fn validate(r: &TweenRequest) -> Result<(), TweenError> {
    if r.property != TargetProperty::Data && r.target == TweenTarget::None {
        return Err(TweenError::MissingTarget {
            property: r.property,
        });
    }
    if !r.property.accepts(&r.target) {
        return Err(TweenError::TargetKindMismatch {
            property: r.property,
            target_kind: r.target.kind_name(),
        });
    }
    if r.property.is_spline() {
        if r.spline.is_none() {
            return Err(TweenError::MissingSpline {
                property: r.property,
            });
        }
        return Ok(());
    }
    if let Some(expected) = r.property.value_kind() {
        if r.to.kind() != expected {
            return Err(TweenError::ValueKindMismatch {
                property: r.property,
                expected,
                actual: r.to.kind(),
            });
        }
    }
    match r.from {
        Some(from) if from.kind() != r.to.kind() => Err(TweenError::MismatchedEndpoints {
            from: from.kind(),
            to: r.to.kind(),
        }),
        None if r.property == TargetProperty::Data => Err(TweenError::MissingFromValue),
        _ => Ok(()),
    }
}

/// Turn `target` toward its look target after a location write. Blends the
/// current rotation by `dt * speed` along the shortest path, keeps roll,
/// applies the rotation constraint and writes the result.
pub(crate) fn orient(
    o: &Orientation,
    target: TweenTarget,
    space: CoordinateSpace,
    previous: Option<Value>,
    location: Value,
    dt: f32,
    host: &mut dyn TweenHost,
) -> Option<Value> {
    let here = location.as_vec3()?;
    let desired = match o.mode {
        LookMode::NoOrientationChange => return None,
        LookMode::OrientToTarget => {
            let at = host.location_of(o.target?)?;
            host.look_rotation(here, at)?
        }
        LookMode::OrientToPath => {
            let before = previous?.as_vec3()?;
            host.look_rotation(before, here)?
        }
    };
    let current = host
        .current_value(target, TargetProperty::Rotation, space)
        .and_then(|v| v.as_rotation())
        .unwrap_or([0.0; 3]);
    let desired = [desired[0], desired[1], current[2]];
    let blend = (dt * o.speed).clamp(0.0, 1.0);
    let rotation = Value::Rotation(lerp_rotation(current, desired, blend, true));
    let rotation = apply_constraint(rotation, &Value::Rotation(current), o.constraint);
    host.write(target, TargetProperty::Rotation, space, rotation);
    Some(rotation)
}

#[derive(Debug)]
pub struct TweenEvent {
    id: TweenId,
    request: TweenRequest,
    phase: Phase,
    paused: bool,
    stopped: bool,
    started: bool,

    progress: f32,
    /// Time accumulated in the current Delaying phase.
    elapsed: f32,
    iteration: u32,
    reversed: bool,

    // Resolved when the tween first starts running.
    from: Option<Value>,
    to: Option<Value>,
    base: Option<Value>,
    spline_anchor: Option<[f32; 3]>,
    effective_duration: f32,

    last_applied: Option<Value>,
    interval_acc: f32,
    unrendered_for: f32,
    culled: bool,
}

impl TweenEvent {
    pub(crate) fn new(id: TweenId, request: TweenRequest) -> Self {
        Self {
            id,
            request,
            phase: Phase::Uninitialized,
            paused: false,
            stopped: false,
            started: false,
            progress: 0.0,
            elapsed: 0.0,
            iteration: 0,
            reversed: false,
            from: None,
            to: None,
            base: None,
            spline_anchor: None,
            effective_duration: 0.0,
            last_applied: None,
            interval_acc: 0.0,
            unrendered_for: 0.0,
            culled: false,
        }
    }

    pub fn id(&self) -> TweenId {
        self.id
    }

    pub fn request(&self) -> &TweenRequest {
        &self.request
    }

    pub(crate) fn request_mut(&mut self) -> &mut TweenRequest {
        &mut self.request
    }

    pub fn tag(&self) -> Option<&str> {
        self.request.tag.as_deref()
    }

    pub fn target(&self) -> TweenTarget {
        self.request.target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn is_culled(&self) -> bool {
        self.culled
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Completed loop iterations.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// True while a ping-pong pass runs backward.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Start/end of the current pass, once resolved.
    pub fn endpoints(&self) -> Option<(Value, Value)> {
        let (from, to) = (self.from?, self.to?);
        Some(if self.reversed { (to, from) } else { (from, to) })
    }

    pub fn effective_duration(&self) -> f32 {
        self.effective_duration
    }

    pub fn last_applied(&self) -> Option<Value> {
        self.last_applied
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::debug!("{} {:?} -> {:?}", self.id, self.phase, phase);
            self.phase = phase;
        }
    }

    fn fire(&self, hook: Hook, sink: &mut StepSink) {
        if self.request.hooks.for_hook(hook).is_empty() {
            return;
        }
        sink.fired.push(CallbackArgs {
            tween: self.id,
            tag: self.request.tag.clone(),
            hook,
            value: self.last_applied,
            progress: self.progress,
            iteration: self.iteration,
        });
    }

    /// Uninitialized (or retained Finished) -> Pending. Applies string
    /// overrides and validates the request.
    pub(crate) fn initialize(&mut self) -> Result<ParamReport, TweenError> {
        if !matches!(self.phase, Phase::Uninitialized | Phase::Finished) {
            return Err(TweenError::AlreadyInitialized { id: self.id });
        }
        let report = match self.request.parameters.clone() {
            Some(text) => parse_parameters(&text, &mut self.request),
            None => ParamReport::default(),
        };
        validate(&self.request)?;
        self.request.delay = self.request.delay.max(0.0);

        let id = self.id;
        let request = std::mem::take(&mut self.request);
        *self = TweenEvent::new(id, request);
        self.set_phase(Phase::Pending);
        Ok(report)
    }

    /// Advance by one host time step.
    pub(crate) fn advance(&mut self, dt: f32, host: &mut dyn TweenHost, sink: &mut StepSink) {
        if matches!(self.phase, Phase::Uninitialized | Phase::Finished) || self.paused {
            return;
        }
        if !self.request.tick_when_paused && host.is_paused() {
            return;
        }

        let target_id = self.request.target.id();
        if let Some(id) = target_id {
            if self.request.destroy_when_target_invalid && !host.is_valid(id) {
                self.stopped = true;
                self.set_phase(Phase::Finished);
                sink.events.push(CoreEvent::TargetInvalidated {
                    tween: self.id,
                    target: id,
                });
                sink.diag(
                    DiagnosticLevel::Debug,
                    format!("{} target {:?} is gone, tween terminated", self.id, id),
                );
                return;
            }
        }

        let raw_dt = dt.max(0.0);
        if self.request.cull_when_not_rendered {
            if let Some(id) = target_id {
                if host.is_rendered(id) {
                    self.unrendered_for = 0.0;
                    self.culled = false;
                } else {
                    self.unrendered_for += raw_dt;
                    if self.unrendered_for >= self.request.seconds_before_cull {
                        if !self.culled {
                            self.culled = true;
                            sink.events.push(CoreEvent::TweenCulled { tween: self.id });
                        }
                        return;
                    }
                }
            }
        }

        let mut dt = raw_dt;
        if !self.request.ignore_time_dilation {
            dt *= host.time_dilation().max(0.0);
        }
        if self.request.timer_interval > 0.0 {
            self.interval_acc += dt;
            if self.interval_acc < self.request.timer_interval {
                return;
            }
            dt = std::mem::take(&mut self.interval_acc);
        }

        self.step(dt, host, sink);
    }

    fn step(&mut self, dt: f32, host: &mut dyn TweenHost, sink: &mut StepSink) {
        let mut remaining = dt;
        loop {
            match self.phase {
                Phase::Pending => {
                    if self.request.delay > 0.0 {
                        self.elapsed = 0.0;
                        self.set_phase(Phase::Delaying);
                    } else if !self.begin_running(host, sink) {
                        return;
                    }
                }
                Phase::Looping => {
                    if self.request.delay_policy == DelayPolicy::BeforeEveryIteration
                        && self.request.delay > 0.0
                    {
                        self.elapsed = 0.0;
                        self.set_phase(Phase::Delaying);
                    } else {
                        self.set_phase(Phase::Running);
                    }
                }
                Phase::Delaying => {
                    self.elapsed += remaining;
                    if self.elapsed < self.request.delay {
                        return;
                    }
                    remaining = self.elapsed - self.request.delay;
                    self.elapsed = 0.0;
                    if !self.begin_running(host, sink) {
                        return;
                    }
                }
                Phase::Running => {
                    self.run(remaining, host, sink);
                    return;
                }
                Phase::Uninitialized | Phase::Finished => return,
            }
        }
    }

    /// Enter Running; the first time through resolves endpoints and fires start.
    fn begin_running(&mut self, host: &mut dyn TweenHost, sink: &mut StepSink) -> bool {
        if !self.started {
            if let Err(message) = self.resolve(host) {
                sink.diag(DiagnosticLevel::Warning, format!("{}: {message}", self.id));
                self.stopped = true;
                self.set_phase(Phase::Finished);
                return false;
            }
            self.started = true;
            self.fire(Hook::Start, sink);
            sink.events.push(CoreEvent::TweenStarted {
                tween: self.id,
                tag: self.request.tag.clone(),
            });
        }
        self.set_phase(Phase::Running);
        true
    }

    fn resolve(&mut self, host: &mut dyn TweenHost) -> Result<(), String> {
        let r = &self.request;
        let space = r.space.host_space();
        let (from, to) = if let (true, Some(route)) = (r.property.is_spline(), r.spline) {
            let length = host
                .spline_length(route.spline)
                .ok_or_else(|| format!("spline {:?} is unavailable", route.spline))?;
            let start = route
                .from_point
                .and_then(|p| host.distance_at_point(route.spline, p))
                .unwrap_or(0.0);
            let end = route
                .to_point
                .and_then(|p| host.distance_at_point(route.spline, p))
                .unwrap_or(length);
            if route.interpolate_to_path {
                self.spline_anchor = host
                    .current_value(r.target, TargetProperty::Location, space)
                    .and_then(|v| v.as_vec3());
            }
            (Value::Float(start), Value::Float(end))
        } else {
            let current = match (r.property, r.target.id()) {
                (TargetProperty::Data, _) | (_, None) => None,
                _ => host.current_value(r.target, r.property, space),
            };
            let relative = r.space == CoordinateSpace::Relative;
            if relative {
                self.base = current;
            }
            let from = match r.from {
                Some(v) => v,
                None if relative => Value::zero(r.to.kind()),
                None => current
                    .ok_or_else(|| format!("cannot read start value of {:?}", r.property))?,
            };
            (from, r.to)
        };

        self.effective_duration = match r.duration_mode {
            DurationMode::FixedSeconds => r.duration,
            DurationMode::RateUnitsPerSecond if r.duration > 0.0 => {
                travel_distance(&from, &to, r.shortest_path).unwrap_or(0.0) / r.duration
            }
            DurationMode::RateUnitsPerSecond => 0.0,
        };
        self.from = Some(from);
        self.to = Some(to);
        Ok(())
    }

    fn run(&mut self, dt: f32, host: &mut dyn TweenHost, sink: &mut StepSink) {
        let Some((a, b)) = self.endpoints() else {
            return;
        };
        let duration = self.effective_duration;
        self.progress = if duration > 0.0 {
            (self.progress + dt / duration).min(1.0)
        } else {
            1.0
        };
        let done = self.progress >= 1.0;
        let r = &self.request;
        let custom = r.custom_curve.as_ref().map(|c| c as &dyn EaseCurve);
        let eased = ease(r.ease, custom, r.punch_amplitude, self.progress);
        let raw = if done && r.enforce_exact_to {
            b
        } else {
            interpolate(&a, &b, eased, r.shortest_path)
        };

        self.apply(raw, eased, dt, host, sink);
        if done {
            self.end_iteration(host, sink);
        }
    }

    fn apply(
        &mut self,
        raw: Value,
        eased: f32,
        dt: f32,
        host: &mut dyn TweenHost,
        sink: &mut StepSink,
    ) {
        let target = self.request.target;
        let property = self.request.property;
        let space = self.request.space.host_space();

        let value = if property.is_spline() {
            match self.sample_spline(raw, eased, host) {
                Some(v) => v,
                None => {
                    sink.diag(
                        DiagnosticLevel::Warning,
                        format!("{} spline sample unavailable", self.id),
                    );
                    return;
                }
            }
        } else {
            match self.base {
                Some(base) => base.add(&raw),
                None => raw,
            }
        };

        let writes = property != TargetProperty::Data && target.id().is_some();
        let previous = if writes {
            host.current_value(target, property, space)
        } else {
            None
        }
        .or(self.last_applied)
        .or(self.from);
        let value = match previous {
            Some(prev) => apply_constraint(value, &prev, self.request.constraint),
            None => value,
        };

        if writes {
            host.write(target, property, space, value);
            if property.moves_target() {
                let o = &self.request.orientation;
                if let Some(rotation) = orient(o, target, space, previous, value, dt, host) {
                    sink.changes.push(Change {
                        tween: self.id,
                        target,
                        property: TargetProperty::Rotation,
                        value: rotation,
                    });
                }
            }
        }
        self.last_applied = Some(value);
        sink.changes.push(Change {
            tween: self.id,
            target,
            property,
            value,
        });
        self.fire(Hook::Update, sink);
    }

    fn sample_spline(&self, distance: Value, eased: f32, host: &dyn TweenHost) -> Option<Value> {
        let route = self.request.spline?;
        let sample = host.evaluate_at_distance(
            route.spline,
            distance.as_float()?,
            self.request.space.host_space(),
        )?;
        match self.request.property {
            TargetProperty::SplineLocation => {
                let location = match self.spline_anchor {
                    Some(anchor) if route.interpolate_to_path => {
                        lerp_vec3(anchor, sample.location, eased)
                    }
                    _ => sample.location,
                };
                Some(Value::Vec3(location))
            }
            TargetProperty::SplineRotation => {
                let mut rotation = sample.rotation;
                if route.reverse_orientation {
                    rotation[1] += 180.0;
                }
                Some(Value::Rotation(rotation))
            }
            _ => None,
        }
    }

    fn end_iteration(&mut self, host: &mut dyn TweenHost, sink: &mut StepSink) {
        let mode = self.request.loop_mode;
        if mode == LoopMode::Once || (mode == LoopMode::PingPongOnce && self.reversed) {
            self.complete(host, sink);
            return;
        }
        self.iteration += 1;
        self.fire(Hook::Loop, sink);
        sink.events.push(CoreEvent::TweenLooped {
            tween: self.id,
            iteration: self.iteration,
        });
        if self.request.max_loops > 0 && self.iteration >= self.request.max_loops {
            self.complete(host, sink);
            return;
        }
        if matches!(mode, LoopMode::PingPong | LoopMode::PingPongOnce) {
            self.reversed = !self.reversed;
        }
        self.progress = 0.0;
        self.set_phase(Phase::Looping);
    }

    fn complete(&mut self, host: &mut dyn TweenHost, sink: &mut StepSink) {
        self.progress = 1.0;
        self.set_phase(Phase::Finished);
        self.fire(Hook::Complete, sink);
        sink.events.push(CoreEvent::TweenCompleted { tween: self.id });
        if let Some(route) = self.request.spline {
            if route.destroy_spline_on_complete {
                host.release_spline(route.spline);
            }
        }
    }

    /// Cancel. Completion fires only if the tween had started.
    pub(crate) fn stop(&mut self, sink: &mut StepSink) -> bool {
        if self.phase == Phase::Finished {
            return false;
        }
        self.stopped = true;
        self.set_phase(Phase::Finished);
        if self.started {
            self.fire(Hook::Complete, sink);
            sink.events.push(CoreEvent::TweenCompleted { tween: self.id });
        }
        sink.events.push(CoreEvent::TweenStopped { tween: self.id });
        true
    }

    pub(crate) fn pause(&mut self, sink: &mut StepSink) -> bool {
        if self.paused || self.phase == Phase::Finished {
            return false;
        }
        self.paused = true;
        sink.events.push(CoreEvent::TweenPaused { tween: self.id });
        true
    }

    pub(crate) fn resume(&mut self, sink: &mut StepSink) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        sink.events.push(CoreEvent::TweenResumed { tween: self.id });
        true
    }

    /// Rewind to the first iteration. Delay applies again; start does not refire.
    pub(crate) fn restart(&mut self, sink: &mut StepSink) -> bool {
        if self.phase == Phase::Uninitialized {
            return false;
        }
        self.progress = 0.0;
        self.elapsed = 0.0;
        self.iteration = 0;
        self.reversed = false;
        self.interval_acc = 0.0;
        self.unrendered_for = 0.0;
        self.culled = false;
        self.stopped = false;
        self.set_phase(Phase::Pending);
        sink.events.push(CoreEvent::TweenRestarted { tween: self.id });
        true
    }
}
