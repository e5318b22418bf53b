//! Integration tests for handler + sequences + tweens
//!
//! These tests drive a `TweenHandler` the way a frame loop would and verify:
//! - Grouped and single tweens inside one sequence progress in lockstep
//! - Completion of nested composites bubbles up to the handler
//! - Completion can be awaited from a task other than the updater
//! - Settings loaded from TOML configure handlers and timelines

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tweenkit::{
    tween, Binding, Easing, ProgressFunction, Sequence, Timeline, TimelineExt, TimelineSettings,
    TweenBuilder, TweenError, TweenHandler, TweenHandlerConfig, TweenPool, INFINITE_REPEAT,
};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Rect {
    x: f64,
    y: f64,
    z: f64,
}

fn rect() -> Arc<Mutex<Rect>> {
    Arc::new(Mutex::new(Rect::default()))
}

fn run_simulation(handler: &mut TweenHandler, seconds: u32, step_ms: u32) {
    for _ in 0..seconds * 1000 / step_ms {
        handler.update(step_ms);
    }
}

/// A lerp that logs every value it produces
fn recording_lerp(log: &Arc<Mutex<Vec<String>>>) -> ProgressFunction<f64> {
    let log = log.clone();
    Arc::new(move |start: &f64, end: &f64, progress| {
        let value = start + (end - start) * progress;
        log.lock().unwrap().push(format!("{:.2}", value));
        value
    })
}

#[test]
fn test_group_and_single_tween_in_sequence() {
    let mut handler = TweenHandler::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let target = rect();

    let x = Binding::from_mutex(&target, |r| r.x, |r, v| r.x = v);
    let y = Binding::from_mutex(&target, |r| r.y, |r, v| r.y = v);
    let z = Binding::from_mutex(&target, |r| r.z, |r, v| r.z = v);

    let group = TweenBuilder::new(&target, x, recording_lerp(&log))
        .and(y)
        .to(5.0)
        .in_secs(2.0);
    let single = TweenBuilder::new(&target, z, recording_lerp(&log))
        .to(50.0)
        .in_secs(5.0);

    handler.add(Sequence::new(Vec::<Box<dyn Timeline>>::new()).then(group).then(single));
    run_simulation(&mut handler, 5, 100);

    let mut expected = Vec::new();
    for tick in 1..=50 {
        if tick <= 20 {
            let xy = format!("{:.2}", tick as f64 * 0.25);
            expected.push(xy.clone());
            expected.push(xy);
        }
        expected.push(format!("{:.2}", tick as f64));
    }
    assert_eq!(*log.lock().unwrap(), expected);

    let snapshot = *target.lock().unwrap();
    assert_eq!((snapshot.x, snapshot.y), (5.0, 5.0));
}

#[test]
fn test_single_tween_ten_steps() {
    let mut handler = TweenHandler::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let target = rect();
    let x = Binding::from_mutex(&target, |r| r.x, |r, v| r.x = v);

    handler.add(TweenBuilder::new(&target, x, recording_lerp(&log)).to(10.0).in_secs(1.0));
    run_simulation(&mut handler, 1, 100);

    let expected: Vec<String> = (1..=10).map(|i| format!("{:.2}", i as f64)).collect();
    assert_eq!(*log.lock().unwrap(), expected);
}

#[test]
fn test_repeat_cycles_through_handler() {
    let mut handler = TweenHandler::new();
    let target = rect();
    let sweeps = Arc::new(Mutex::new(0));
    let sweeps_clone = sweeps.clone();
    let x = Binding::from_mutex(&target, |r| r.x, |r, v| r.x = v);

    handler.add(
        tween(&target, x)
            .to(1.0)
            .in_secs(0.25)
            .repeat(3)
            .on_repeat(move |_, _| *sweeps_clone.lock().unwrap() += 1),
    );

    // 4 sweeps of 250ms each
    for _ in 0..3 {
        handler.update(250);
    }
    assert_eq!(handler.len(), 1);
    handler.update(250);
    assert!(handler.is_empty());
    assert_eq!(*sweeps.lock().unwrap(), 3);
}

#[test]
fn test_cleared_tweens_return_to_pool() {
    let mut handler = TweenHandler::new();
    let mut pool = TweenPool::new();
    let target = rect();

    let x = Binding::from_mutex(&target, |r| r.x, |r, v| r.x = v);
    let tween = tween(&target, x).build_in(&mut pool, 3.0, tweenkit::TweenDirection::ToValue);
    handler.add(tween.in_secs(1.0));

    for timeline in handler.clear_tweens_of(&target).unwrap() {
        pool.release_timeline(timeline);
    }
    assert!(handler.is_empty());
    assert_eq!(pool.available::<Mutex<Rect>, f64>(), 1);
}

#[test]
fn test_config_and_settings_from_toml() {
    #[derive(serde::Deserialize)]
    struct AnimationFile {
        handler: TweenHandlerConfig,
        slide: TimelineSettings,
    }

    let file: AnimationFile = toml::from_str(
        r#"
        [handler]
        time_modifier = 2.0

        [slide]
        duration = 1.0
        delay = 0.5
        easing = "ease_in_quad"
        "#,
    )
    .unwrap();

    assert!(!file.handler.forbid_removing);
    let mut handler = TweenHandler::from_config(&file.handler);
    let target = rect();
    let x = Binding::from_mutex(&target, |r| r.x, |r, v| r.x = v);
    handler.add(tween(&target, x).to(100.0).with_settings(&file.slide));
    assert_eq!(file.slide.easing, Some(Easing::EaseInQuad));

    // 250ms at 2x eats the delay exactly
    handler.update(250);
    assert_eq!(target.lock().unwrap().x, 0.0);
    // another 250ms: progress 0.5, eased to 0.25
    handler.update(250);
    assert!((target.lock().unwrap().x - 25.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_await_completion_from_another_task() {
    let target = rect();
    let x = Binding::from_mutex(&target, |r| r.x, |r, v| r.x = v);
    let tween = tween(&target, x).to(8.0).in_secs(0.2);
    let completion = tween.await_completion();

    let mut handler = TweenHandler::new();
    handler.add(tween);
    let driver = tokio::spawn(async move {
        while !handler.is_empty() {
            handler.update(50);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    });

    completion.await.unwrap();
    driver.await.unwrap();
    assert_eq!(target.lock().unwrap().x, 8.0);
}

#[tokio::test]
async fn test_await_infinite_repeat_is_rejected() {
    let target = rect();
    let x = Binding::from_mutex(&target, |r| r.x, |r, v| r.x = v);
    let tween = tween(&target, x).to(1.0).in_secs(1.0).repeat(INFINITE_REPEAT);

    assert_eq!(tween.await_completion().await, Err(TweenError::InfiniteAwait));
}

#[tokio::test]
async fn test_await_done_timeline_returns_immediately() {
    let target = rect();
    let x = Binding::from_mutex(&target, |r| r.x, |r, v| r.x = v);
    let mut tween = tween(&target, x).to(1.0);
    tween.update(0.0);
    assert!(tween.is_done());

    tween.await_completion().await.unwrap();
}
