mod common;

use std::sync::{Arc, Mutex};

use common::{HookLog, RecordingHost};
use vizij_tween_core::{
    Callback, Config, CoreEvent, DiagnosticLevel, Hook, MatchMode, NullHost, Phase, Selector,
    TargetId, TargetProperty, TweenContext, TweenEngine, TweenId, TweenRequest, Value,
};

fn engine() -> TweenEngine {
    TweenEngine::new(Config::default())
}

/// it should never reuse a slot index after removal
#[test]
fn ids_are_stable_across_removal() {
    let mut eng = engine();
    let a = eng.spawn(TweenRequest::float(0.0, 1.0)).unwrap();
    let b = eng.spawn(TweenRequest::float(0.0, 1.0)).unwrap();
    assert!(eng.remove(a));
    assert!(!eng.remove(a));
    let c = eng.spawn(TweenRequest::float(0.0, 1.0)).unwrap();
    assert_eq!((a, b, c), (TweenId(0), TweenId(1), TweenId(2)));
    assert!(eng.get(a).is_none());
    assert_eq!(eng.get(b).unwrap().id(), b);
    assert_eq!(eng.all(), vec![b, c]);
    assert_eq!(eng.len(), 2);
}

/// it should find tweens by target, tag and host display name
#[test]
fn lookup_filters() {
    let mut eng = engine();
    let mut host = RecordingHost::default()
        .with_value(TargetId(1), TargetProperty::Scale, Value::vec3(1.0, 1.0, 1.0))
        .with_value(TargetId(2), TargetProperty::Scale, Value::vec3(1.0, 1.0, 1.0));
    host.names.insert(TargetId(1), "Cube".into());
    host.names.insert(TargetId(2), "Sphere".into());

    let a = eng
        .spawn(TweenRequest::actor_scale(TargetId(1), [2.0; 3]).tagged("grow"))
        .unwrap();
    let b = eng
        .spawn(TweenRequest::actor_scale(TargetId(2), [2.0; 3]).tagged("grow"))
        .unwrap();
    let c = eng
        .spawn(TweenRequest::float(0.0, 1.0).tagged("fade"))
        .unwrap();

    assert_eq!(eng.find_by_target(TargetId(1)), vec![a]);
    assert_eq!(eng.find_by_tag("grow"), vec![a, b]);
    assert_eq!(eng.find_by_tag("fade"), vec![c]);
    assert_eq!(eng.find_by_target_name("Sphere", &host), vec![b]);
    assert_eq!(eng.find_by_target_name("Cube", &host), vec![a]);
    // Names are asked for at query time, so a rename is seen at once.
    host.names.insert(TargetId(2), "Ball".into());
    assert!(eng.find_by_target_name("Sphere", &host).is_empty());
    assert_eq!(eng.find_by_target_name("Ball", &host), vec![b]);

    assert_eq!(
        eng.select(&Selector::Tag("grow".into()), MatchMode::FirstMatch, &host),
        vec![a]
    );
    assert_eq!(
        eng.select(&Selector::All, MatchMode::AllMatching, &host),
        vec![a, b, c]
    );
    assert_eq!(
        eng.select(&Selector::Tween(c), MatchMode::AllMatching, &host),
        vec![c]
    );
}

/// it should match target names for tweens that have not advanced yet
#[test]
fn target_names_match_before_first_tick() {
    let mut eng = engine();
    let mut host = RecordingHost::default().with_value(
        TargetId(1),
        TargetProperty::Scale,
        Value::vec3(1.0, 1.0, 1.0),
    );
    host.names.insert(TargetId(1), "Cube".into());
    let cube = Selector::TargetName("Cube".into());

    let a = eng
        .spawn(TweenRequest::actor_scale(TargetId(1), [2.0; 3]))
        .unwrap();
    assert_eq!(eng.stop_all(&cube, MatchMode::AllMatching, &host), 1);
    assert!(eng.get(a).is_none());

    // Paused before it ever ran, then held through several ticks.
    let b = eng
        .spawn(TweenRequest::actor_scale(TargetId(1), [2.0; 3]))
        .unwrap();
    assert!(eng.pause(b).unwrap());
    for _ in 0..5 {
        eng.update(0.1, &mut host);
    }
    assert_eq!(
        host.value(TargetId(1), TargetProperty::Scale),
        Some(Value::vec3(1.0, 1.0, 1.0))
    );

    let mut deferred = TweenRequest::actor_scale(TargetId(1), [3.0; 3]);
    deferred.initialize_on_spawn = false;
    let c = eng.spawn(deferred).unwrap();
    assert_eq!(eng.find_by_target_name("Cube", &host), vec![b, c]);

    assert_eq!(eng.resume_all(&cube, MatchMode::FirstMatch, &host), 1);
    assert!(!eng.get(b).unwrap().is_paused());
    eng.update(0.5, &mut host);
    assert_eq!(
        host.value(TargetId(1), TargetProperty::Scale),
        Some(Value::vec3(1.5, 1.5, 1.5))
    );

    // A host pause holds the tween but not the lookup.
    host.paused = true;
    assert_eq!(eng.pause_all(&cube, MatchMode::AllMatching, &host), 2);
    assert!(eng.find_by_target_name("Nobody", &host).is_empty());
}

/// it should pause, resume and restart only the selected tweens
#[test]
fn bulk_pause_resume_restart() {
    let mut eng = engine();
    let a = eng.spawn(TweenRequest::float(0.0, 1.0).tagged("ui")).unwrap();
    let b = eng.spawn(TweenRequest::float(0.0, 1.0).tagged("ui")).unwrap();
    let c = eng.spawn(TweenRequest::float(0.0, 1.0).tagged("world")).unwrap();
    eng.update(0.5, &mut NullHost);

    let ui = Selector::Tag("ui".into());
    assert_eq!(eng.pause_all(&ui, MatchMode::AllMatching, &NullHost), 2);
    assert_eq!(eng.pause_all(&ui, MatchMode::AllMatching, &NullHost), 0);
    let out = eng.update(0.25, &mut NullHost);
    assert_eq!(out.changes.len(), 1);
    assert_eq!(out.changes[0].tween, c);

    assert_eq!(eng.resume_all(&ui, MatchMode::FirstMatch, &NullHost), 1);
    assert!(!eng.get(a).unwrap().is_paused());
    assert!(eng.get(b).unwrap().is_paused());

    assert_eq!(
        eng.restart_all(&Selector::All, MatchMode::AllMatching, &NullHost),
        3
    );
    assert!(eng.all().iter().all(|id| eng.get(*id).unwrap().phase() == Phase::Pending));
}

/// it should stop exactly the tweens matched at sweep start even when a callback
/// stops one of them mid-sweep
#[test]
fn stop_all_is_snapshot_safe_under_reentrancy() {
    let mut eng = engine();
    let log = HookLog::default();

    let a = eng
        .spawn(
            TweenRequest::float(0.0, 1.0)
                .tagged("grp")
                .on(Hook::Complete, log.callback()),
        )
        .unwrap();
    let b = eng
        .spawn(
            TweenRequest::float(0.0, 1.0)
                .tagged("grp")
                .on(Hook::Complete, log.callback()),
        )
        .unwrap();
    // Stopping C (first in the reverse sweep) stops A from inside its callback.
    let c = eng
        .spawn(
            TweenRequest::float(0.0, 1.0)
                .tagged("grp")
                .on(Hook::Complete, log.callback())
                .on(
                    Hook::Complete,
                    Callback::closure(move |engine, _| {
                        let _ = engine.stop(a);
                    }),
                ),
        )
        .unwrap();
    let d = eng
        .spawn(
            TweenRequest::float(0.0, 1.0)
                .tagged("other")
                .on(Hook::Complete, log.callback()),
        )
        .unwrap();
    eng.update(0.1, &mut NullHost);

    let stopped = eng.stop_all(
        &Selector::Tag("grp".into()),
        MatchMode::AllMatching,
        &NullHost,
    );
    assert_eq!(stopped, 2, "A was already stopped by C's callback");

    let completed: Vec<TweenId> = log.entries().into_iter().map(|(id, _)| id).collect();
    assert_eq!(completed, vec![c, a, b]);
    assert!(eng.find_by_tag("grp").is_empty());
    assert_eq!(eng.all(), vec![d]);
    assert_eq!(eng.get(d).unwrap().phase(), Phase::Running);
}

/// it should finish a stop sweep when a callback removes a tween still ahead
/// in the snapshot
#[test]
fn stop_all_survives_removal_from_callback() {
    let mut eng = engine();
    let log = HookLog::default();
    let grouped = |log: &HookLog| {
        TweenRequest::float(0.0, 1.0)
            .tagged("grp")
            .on(Hook::Complete, log.callback())
    };

    let a = eng.spawn(grouped(&log)).unwrap();
    let b = eng.spawn(grouped(&log)).unwrap();
    // The reverse sweep reaches C before A; C's completion removes A.
    let c = eng
        .spawn(grouped(&log).on(
            Hook::Complete,
            Callback::closure(move |engine, _| {
                assert!(engine.remove(a));
            }),
        ))
        .unwrap();
    let d = eng.spawn(grouped(&log)).unwrap();
    let other = eng
        .spawn(TweenRequest::float(0.0, 1.0).tagged("other"))
        .unwrap();
    eng.update(0.1, &mut NullHost);

    let stopped = eng.stop_all(
        &Selector::Tag("grp".into()),
        MatchMode::AllMatching,
        &NullHost,
    );
    assert_eq!(stopped, 3, "A was removed before the sweep reached it");

    let completed: Vec<TweenId> = log.entries().into_iter().map(|(id, _)| id).collect();
    assert_eq!(completed, vec![d, c, b]);
    assert!(eng.get(a).is_none());
    assert!(eng.find_by_tag("grp").is_empty());
    assert_eq!(eng.all(), vec![other]);
    assert_eq!(eng.get(other).unwrap().phase(), Phase::Running);
}

/// it should tolerate a callback removing a tween later in the same tick
#[test]
fn callback_removes_tween_during_update() {
    let mut eng = engine();
    let victim = TweenId(1);
    eng.spawn(TweenRequest::float(0.0, 1.0).over(0.1).on(
        Hook::Complete,
        Callback::closure(move |engine, _| {
            engine.remove(victim);
        }),
    ))
    .unwrap();
    eng.spawn(TweenRequest::float(0.0, 1.0)).unwrap();
    let out = eng.update(0.5, &mut NullHost);
    assert_eq!(out.changes.len(), 1);
    assert!(eng.is_empty());
}

/// it should let callbacks spawn tweens that first tick on the next update
#[test]
fn callback_spawns_chained_tween() {
    let mut eng = engine();
    let chained = Arc::new(Mutex::new(None));
    let slot = chained.clone();
    eng.spawn(TweenRequest::float(0.0, 1.0).over(0.5).on(
        Hook::Complete,
        Callback::closure(move |engine, _| {
            *slot.lock().unwrap() = engine.spawn(TweenRequest::float(1.0, 0.0).over(0.5));
        }),
    ))
    .unwrap();
    let out = eng.update(0.5, &mut NullHost);
    assert_eq!(out.changes.len(), 1);
    let next = chained.lock().unwrap().expect("chained tween");
    assert_eq!(eng.get(next).unwrap().phase(), Phase::Pending);
    let out = eng.update(0.25, &mut NullHost);
    assert_eq!(out.changes[0].tween, next);
    assert_eq!(out.changes[0].value, Value::Float(0.5));
}

/// it should invoke named callbacks through the host and skip missing receivers
#[test]
fn named_callbacks_dispatch_and_degrade() {
    let mut eng = engine();
    let mut host = RecordingHost::default();
    host.receivers.insert((TargetId(50), "OnDone".into()));

    eng.spawn(
        TweenRequest::float(0.0, 1.0)
            .over(0.5)
            .on(Hook::Complete, Callback::named(TargetId(50), "OnDone"))
            .on(Hook::Start, Callback::named(TargetId(51), "OnStart")),
    )
    .unwrap();
    let out = eng.update(0.5, &mut host);
    assert_eq!(
        host.invoked,
        vec![(TargetId(50), "OnDone".to_string(), Hook::Complete)]
    );
    assert_eq!(out.changes.len(), 1, "missing receiver must not interrupt the tween");
    assert!(out.events.iter().any(|e| matches!(
        e,
        CoreEvent::Diagnostic {
            level: DiagnosticLevel::Warning,
            ..
        }
    )));
}

/// it should queue named callbacks raised outside update until the next update
#[test]
fn named_callbacks_from_stop_wait_for_host() {
    let mut eng = engine();
    let mut host = RecordingHost::default();
    host.receivers.insert((TargetId(50), "OnDone".into()));
    let id = eng
        .spawn(
            TweenRequest::float(0.0, 1.0)
                .on(Hook::Complete, Callback::named(TargetId(50), "OnDone")),
        )
        .unwrap();
    eng.update(0.1, &mut host);
    eng.stop(id).unwrap();
    assert!(host.invoked.is_empty());
    eng.update(0.1, &mut host);
    assert_eq!(host.invoked.len(), 1);
}

/// it should cap the number of events surfaced per tick
#[test]
fn events_are_capped_per_tick() {
    let mut eng = TweenEngine::new(Config {
        max_events_per_tick: 2,
        ..Config::default()
    });
    for _ in 0..5 {
        eng.spawn(TweenRequest::float(0.0, 1.0)).unwrap();
    }
    let out = eng.update(0.1, &mut NullHost);
    assert_eq!(out.events.len(), 2);
    assert_eq!(out.changes.len(), 5);
}

/// it should surface debug diagnostics only when enabled
#[test]
fn debug_messages_toggle() {
    let mut quiet = engine();
    quiet.spawn(TweenRequest::float(0.0, 1.0)).unwrap();
    assert!(!quiet
        .update(0.1, &mut NullHost)
        .events
        .iter()
        .any(|e| matches!(e, CoreEvent::Diagnostic { .. })));

    let mut chatty = TweenEngine::new(Config {
        debug_messages: true,
        ..Config::default()
    });
    chatty.spawn(TweenRequest::float(0.0, 1.0)).unwrap();
    assert!(chatty.update(0.1, &mut NullHost).events.iter().any(|e| matches!(
        e,
        CoreEvent::Diagnostic {
            level: DiagnosticLevel::Debug,
            ..
        }
    )));
}

/// it should create the registry lazily and drop it on teardown
#[test]
fn context_is_lazy() {
    let mut ctx = TweenContext::new(Config::default());
    assert!(!ctx.is_live());
    assert!(ctx.update(0.1, &mut NullHost).is_none());
    let id = ctx.spawn(TweenRequest::float(0.0, 2.0)).unwrap();
    assert!(ctx.is_live());
    let out = ctx.update(0.5, &mut NullHost).unwrap();
    assert_eq!(out.changes[0].value, Value::Float(1.0));
    assert!(ctx.get().unwrap().get(id).is_some());
    let engine = ctx.teardown().unwrap();
    assert_eq!(engine.len(), 1);
    assert!(!ctx.is_live());
}
