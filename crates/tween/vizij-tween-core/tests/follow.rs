mod common;

use common::{approx3, RecordingHost};
use vizij_tween_core::{
    AxisConstraint, Follow, LookMode, NullHost, Orientation, TargetId, TargetProperty,
    TweenError, TweenTarget, Value,
};

const ACTOR: TargetId = TargetId(7);
const WIDGET: TargetId = TargetId(8);

fn host_at(location: [f32; 3]) -> RecordingHost {
    RecordingHost::default().with_value(ACTOR, TargetProperty::Location, Value::Vec3(location))
}

fn location(host: &RecordingHost) -> [f32; 3] {
    host.value(ACTOR, TargetProperty::Location)
        .and_then(|v| v.as_vec3())
        .expect("location")
}

/// it should close dt * speed of the remaining gap every frame
#[test]
fn move_follower_approaches_goal() {
    let mut host = host_at([0.0; 3]);
    let follow = Follow::actor_move(ACTOR, [10.0, 0.0, 0.0], 2.0);
    assert_eq!(follow.step(0.25, &mut host), Ok(Value::vec3(5.0, 0.0, 0.0)));
    follow.step(0.25, &mut host).unwrap();
    approx3(location(&host), [7.5, 0.0, 0.0], 1e-6);
    // A long frame lands on the goal instead of passing it.
    follow.step(5.0, &mut host).unwrap();
    assert_eq!(location(&host), [10.0, 0.0, 0.0]);
}

/// it should leave masked-out axes where they were
#[test]
fn follower_respects_axis_constraint() {
    let mut host = host_at([0.0, 1.0, 2.0]);
    let follow =
        Follow::actor_move(ACTOR, [10.0, 10.0, 10.0], 1.0).constrained(AxisConstraint::XOnly);
    for _ in 0..3 {
        follow.step(0.5, &mut host).unwrap();
        let [_, y, z] = location(&host);
        assert_eq!((y, z), (1.0, 2.0));
    }
    approx3(location(&host), [8.75, 1.0, 2.0], 1e-5);
}

/// it should turn rotation followers the short way round
#[test]
fn rotate_follower_takes_shortest_path() {
    let mut host = RecordingHost::default().with_value(
        ACTOR,
        TargetProperty::Rotation,
        Value::rotation(0.0, 350.0, 0.0),
    );
    let follow = Follow::actor_rotate(ACTOR, [0.0, 10.0, 0.0], 1.0);
    let v = follow.step(0.5, &mut host).unwrap();
    approx3(v.as_rotation().unwrap(), [0.0, 0.0, 0.0], 1e-4);
}

/// it should face the direction of travel when oriented to the path
#[test]
fn move_follower_orients_to_path() {
    let mut host = host_at([0.0; 3]);
    let follow = Follow::actor_move(ACTOR, [0.0, 10.0, 0.0], 1.0).oriented(Orientation {
        mode: LookMode::OrientToPath,
        speed: 2.0,
        ..Orientation::default()
    });
    follow.step(0.5, &mut host).unwrap();
    approx3(location(&host), [0.0, 5.0, 0.0], 1e-6);
    let rotation = host
        .value(ACTOR, TargetProperty::Rotation)
        .and_then(|v| v.as_rotation())
        .expect("rotation written");
    approx3(rotation, [0.0, 90.0, 0.0], 1e-4);
}

/// it should drive widget render transforms
#[test]
fn widget_angle_follower() {
    let mut host = RecordingHost::default().with_value(
        WIDGET,
        TargetProperty::WidgetAngle,
        Value::f(0.0),
    );
    let follow = Follow::widget_rotate(WIDGET, 90.0, 4.0);
    assert_eq!(follow.step(0.125, &mut host), Ok(Value::f(45.0)));
    assert_eq!(
        host.writes.last(),
        Some(&(
            TweenTarget::Widget(WIDGET),
            TargetProperty::WidgetAngle,
            Value::f(45.0)
        ))
    );
}

/// it should refuse followers it cannot apply without writing anything
#[test]
fn follower_errors() {
    let mut host = host_at([0.0; 3]);
    let mut bad = Follow::actor_move(ACTOR, [1.0; 3], 1.0);
    bad.target = TweenTarget::Widget(ACTOR);
    assert!(matches!(
        bad.step(0.1, &mut host),
        Err(TweenError::TargetKindMismatch { .. })
    ));

    let mut data = Follow::actor_scale(ACTOR, [1.0; 3], 1.0);
    data.property = TargetProperty::Data;
    assert!(matches!(
        data.validate(),
        Err(TweenError::NotFollowable { .. })
    ));

    host.invalid.insert(ACTOR);
    assert_eq!(
        Follow::actor_move(ACTOR, [1.0; 3], 1.0).step(0.1, &mut host),
        Err(TweenError::TargetUnavailable { target: ACTOR })
    );
    assert_eq!(
        Follow::component_scale(TargetId(3), [1.0; 3], 1.0).step(0.1, &mut NullHost),
        Err(TweenError::TargetUnavailable {
            target: TargetId(3)
        })
    );
    assert!(host.writes.is_empty());
}
