#![allow(dead_code)]
//! Shared test host: records writes and callback invocations.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use vizij_tween_core::{
    Callback, CallbackArgs, CallbackError, CallbackInvoker, CoordinateSpace, Hook,
    SplineEvaluator, SplineSample, TargetDirectory, TargetId, TargetProperty, TargetWriter,
    TweenTarget, Value,
};

pub fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

pub fn approx3(a: [f32; 3], b: [f32; 3], eps: f32) {
    for i in 0..3 {
        assert!((a[i] - b[i]).abs() <= eps, "left={a:?} right={b:?} eps={eps}");
    }
}

pub fn float(v: Option<Value>) -> f32 {
    v.and_then(|v| v.as_float()).expect("float value")
}

/// Straight spline along +X, control points every 5 units.
pub const SPLINE: TargetId = TargetId(100);
pub const SPLINE_LENGTH: f32 = 10.0;

pub struct RecordingHost {
    pub values: HashMap<(TargetId, TargetProperty), Value>,
    pub writes: Vec<(TweenTarget, TargetProperty, Value)>,
    pub invalid: HashSet<TargetId>,
    pub hidden: HashSet<TargetId>,
    pub names: HashMap<TargetId, String>,
    pub locations: HashMap<TargetId, [f32; 3]>,
    pub paused: bool,
    pub dilation: f32,
    pub receivers: HashSet<(TargetId, String)>,
    pub invoked: Vec<(TargetId, String, Hook)>,
    pub released: Vec<TargetId>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            writes: Vec::new(),
            invalid: HashSet::new(),
            hidden: HashSet::new(),
            names: HashMap::new(),
            locations: HashMap::new(),
            paused: false,
            dilation: 1.0,
            receivers: HashSet::new(),
            invoked: Vec::new(),
            released: Vec::new(),
        }
    }
}

impl RecordingHost {
    pub fn with_value(mut self, target: TargetId, property: TargetProperty, value: Value) -> Self {
        self.values.insert((target, property), value);
        self
    }

    pub fn value(&self, target: TargetId, property: TargetProperty) -> Option<Value> {
        self.values.get(&(target, property)).copied()
    }
}

impl TargetDirectory for RecordingHost {
    fn is_valid(&self, target: TargetId) -> bool {
        !self.invalid.contains(&target)
    }

    fn display_name(&self, target: TargetId) -> Option<String> {
        self.names.get(&target).cloned()
    }

    fn is_rendered(&self, target: TargetId) -> bool {
        !self.hidden.contains(&target)
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn time_dilation(&self) -> f32 {
        self.dilation
    }

    fn location_of(&self, target: TargetId) -> Option<[f32; 3]> {
        self.locations.get(&target).copied()
    }
}

impl TargetWriter for RecordingHost {
    fn current_value(
        &self,
        target: TweenTarget,
        property: TargetProperty,
        _space: CoordinateSpace,
    ) -> Option<Value> {
        self.value(target.id()?, property)
    }

    fn write(
        &mut self,
        target: TweenTarget,
        property: TargetProperty,
        _space: CoordinateSpace,
        value: Value,
    ) {
        if let Some(id) = target.id() {
            self.values.insert((id, property), value);
        }
        self.writes.push((target, property, value));
    }
}

impl SplineEvaluator for RecordingHost {
    fn spline_length(&self, spline: TargetId) -> Option<f32> {
        (spline == SPLINE).then_some(SPLINE_LENGTH)
    }

    fn distance_at_point(&self, spline: TargetId, point: usize) -> Option<f32> {
        (spline == SPLINE && point <= 2).then(|| point as f32 * 5.0)
    }

    fn evaluate_at_distance(
        &self,
        spline: TargetId,
        distance: f32,
        _space: CoordinateSpace,
    ) -> Option<SplineSample> {
        (spline == SPLINE).then(|| SplineSample {
            location: [distance, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
        })
    }

    fn release_spline(&mut self, spline: TargetId) {
        self.released.push(spline);
    }
}

impl CallbackInvoker for RecordingHost {
    fn invoke(
        &mut self,
        receiver: TargetId,
        function: &str,
        args: &CallbackArgs,
    ) -> Result<(), CallbackError> {
        if !self.receivers.iter().any(|(r, _)| *r == receiver) {
            return Err(CallbackError::ReceiverMissing { receiver });
        }
        if !self.receivers.contains(&(receiver, function.to_string())) {
            return Err(CallbackError::FunctionMissing {
                receiver,
                function: function.to_string(),
            });
        }
        self.invoked.push((receiver, function.to_string(), args.hook));
        Ok(())
    }
}

/// Shared log of fired hooks, plus a closure callback that appends to it.
#[derive(Clone, Default)]
pub struct HookLog(pub Arc<Mutex<Vec<(vizij_tween_core::TweenId, Hook)>>>);

impl HookLog {
    pub fn callback(&self) -> Callback {
        let log = self.0.clone();
        Callback::closure(move |_engine, args| {
            log.lock().unwrap().push((args.tween, args.hook));
        })
    }

    pub fn count(&self, hook: Hook) -> usize {
        self.0.lock().unwrap().iter().filter(|(_, h)| *h == hook).count()
    }

    pub fn hooks(&self) -> Vec<Hook> {
        self.0.lock().unwrap().iter().map(|(_, h)| *h).collect()
    }

    pub fn entries(&self) -> Vec<(vizij_tween_core::TweenId, Hook)> {
        self.0.lock().unwrap().clone()
    }
}

/// Attach `log` to every lifecycle hook of `request`.
pub fn observed(
    request: vizij_tween_core::TweenRequest,
    log: &HookLog,
) -> vizij_tween_core::TweenRequest {
    request
        .on(Hook::Start, log.callback())
        .on(Hook::Update, log.callback())
        .on(Hook::Loop, log.callback())
        .on(Hook::Complete, log.callback())
}
