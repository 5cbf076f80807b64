mod common;

use common::approx;
use vizij_tween_core::{
    apply_constraint, ease, interpolate, AxisConstraint, CurveTable, EaseCurve, EaseType, Value,
};

/// it should pin every named curve to 0 and 1 at the ends of the range
#[test]
fn named_curves_hit_endpoints() {
    for e in EaseType::ALL {
        assert_eq!(ease(e, None, 1.0, 0.0), 0.0, "{e:?}");
        assert_eq!(ease(e, None, 1.0, 1.0), 1.0, "{e:?}");
        // Out-of-range progress clamps to the endpoints.
        assert_eq!(ease(e, None, 1.0, -0.5), 0.0, "{e:?}");
        assert_eq!(ease(e, None, 1.0, 1.5), 1.0, "{e:?}");
    }
}

/// it should keep non-overshooting curves inside [0, 1]
#[test]
fn monotone_curves_stay_in_range() {
    for e in EaseType::ALL.into_iter().filter(|e| !e.overshoots()) {
        for i in 1..20 {
            let y = e.apply(i as f32 / 20.0);
            assert!((-1e-5..=1.0 + 1e-5).contains(&y), "{e:?} gave {y}");
        }
    }
}

/// it should match textbook values at the midpoint
#[test]
fn known_midpoints() {
    approx(EaseType::Linear.apply(0.5), 0.5, 1e-6);
    approx(EaseType::EaseInQuad.apply(0.5), 0.25, 1e-6);
    approx(EaseType::EaseOutQuad.apply(0.5), 0.75, 1e-6);
    approx(EaseType::EaseInCubic.apply(0.5), 0.125, 1e-6);
    approx(EaseType::EaseInOutSine.apply(0.5), 0.5, 1e-6);
    assert!(EaseType::EaseInBack.apply(0.2) < 0.0);
    assert!(EaseType::EaseOutBack.apply(0.8) > 1.0);
}

/// it should prefer a supplied custom curve over the named one
#[test]
fn custom_curve_overrides_named() {
    let half = |_t: f32| 0.5;
    assert_eq!(ease(EaseType::EaseInQuad, Some(&half), 1.0, 0.9), 0.5);

    let table = CurveTable::new(vec![(1.0, 1.0), (0.0, 0.0), (0.5, 0.8)]);
    assert_eq!(table.keys[1], (0.5, 0.8), "keys are sorted by time");
    approx(ease(EaseType::Linear, Some(&table), 1.0, 0.25), 0.4, 1e-6);
    approx(table.sample(0.75), 0.9, 1e-6);
}

/// it should parse curve names loosely and fall back to Linear
#[test]
fn curve_names() {
    assert_eq!(EaseType::parse("easeInOutQuad"), Some(EaseType::EaseInOutQuad));
    assert_eq!(EaseType::parse("quad_in_out"), Some(EaseType::EaseInOutQuad));
    assert_eq!(EaseType::parse("out-bounce"), Some(EaseType::EaseOutBounce));
    assert_eq!(EaseType::parse("punch"), Some(EaseType::Punch));
    assert_eq!(EaseType::parse("wobble"), None);
    assert_eq!(EaseType::from("wobble"), EaseType::Linear);
}

/// it should interpolate each value kind and keep `from` on kind mismatch
#[test]
fn interpolation_kinds() {
    assert_eq!(
        interpolate(&Value::vec2(0.0, 10.0), &Value::vec2(10.0, 0.0), 0.25, false),
        Value::vec2(2.5, 7.5)
    );
    assert_eq!(
        interpolate(
            &Value::color(0.0, 0.0, 0.0, 1.0),
            &Value::color(1.0, 0.5, 0.0, 1.0),
            0.5,
            false
        ),
        Value::color(0.5, 0.25, 0.0, 1.0)
    );
    let from = Value::f(1.0);
    assert_eq!(interpolate(&from, &Value::vec3(1.0, 2.0, 3.0), 0.5, false), from);
}

/// it should take the short way round for rotations only when asked
#[test]
fn rotation_paths() {
    let a = Value::rotation(0.0, 350.0, 0.0);
    let b = Value::rotation(0.0, 10.0, 0.0);
    let short = interpolate(&a, &b, 0.5, true).as_rotation().unwrap();
    approx(short[1], 360.0, 1e-4);
    let long = interpolate(&a, &b, 0.5, false).as_rotation().unwrap();
    approx(long[1], 180.0, 1e-4);
}

/// it should keep masked axes at their previous values
#[test]
fn constraint_masks() {
    let prev = Value::rotation(10.0, 20.0, 30.0);
    let next = Value::rotation(1.0, 2.0, 3.0);
    assert_eq!(
        apply_constraint(next, &prev, AxisConstraint::XzOnly),
        Value::rotation(1.0, 20.0, 3.0)
    );
    assert_eq!(
        apply_constraint(next, &prev, AxisConstraint::YOnly),
        Value::rotation(10.0, 2.0, 30.0)
    );
    assert_eq!(apply_constraint(next, &prev, AxisConstraint::None), next);
    assert_eq!(
        apply_constraint(Value::f(4.0), &Value::f(1.0), AxisConstraint::XOnly),
        Value::f(4.0)
    );
}
