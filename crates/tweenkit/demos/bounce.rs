//! Bounce Demo
//!
//! Drives a `TweenHandler` from a fixed 60fps loop and logs a ball's position:
//! - A grouped x/y slide loaded from TOML settings
//! - A yoyo bounce on the y axis with a blocking intro in front of it
//! - A shake that fades out once the ball lands
//!
//! Run with: RUST_LOG=debug cargo run -p tweenkit --example bounce

use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use tweenkit::{
    shake_tween, tween, Binding, Easing, Sequence, Timeline, TimelineExt, TimelineSettings,
    TweenHandler,
};

const FRAME_MS: u32 = 16;

#[derive(Debug, Default)]
struct Ball {
    x: f64,
    y: f64,
    scale: f64,
}

const SLIDE: &str = r#"
duration = 0.6
easing = "ease_out_cubic"
"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let ball = Arc::new(Mutex::new(Ball {
        scale: 1.0,
        ..Default::default()
    }));
    let x = || Binding::from_mutex(&ball, |b: &Ball| b.x, |b: &mut Ball, v| b.x = v);
    let y = || Binding::from_mutex(&ball, |b: &Ball| b.y, |b: &mut Ball, v| b.y = v);
    let scale = || Binding::from_mutex(&ball, |b: &Ball| b.scale, |b: &mut Ball, v| b.scale = v);

    let slide: TimelineSettings = match toml::from_str(SLIDE) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("invalid slide settings: {}", err);
            return;
        }
    };

    let mut handler = TweenHandler::new();

    handler.add(
        tween(&ball, scale())
            .from(0.0)
            .in_secs(0.3)
            .ease_with(Easing::EaseOutBack)
            .blocking(true)
            .on_complete(|_, _| tracing::info!("intro finished")),
    );

    let bounce = tween(&ball, y())
        .to(120.0)
        .in_secs(0.4)
        .ease_with(Easing::EaseOutBounce)
        .repeat(3)
        .yoyo(true)
        .yoyo_delay(0.1)
        .on_repeat(|_, _| tracing::info!("bounce"));
    let drift = tween(&ball, x()).and(y()).to(200.0).with_settings(&slide);
    handler.add(
        Sequence::new(Vec::<Box<dyn Timeline>>::new())
            .then(bounce)
            .then(drift.delay(1.6))
            .on_complete(|_, _| tracing::info!("ball settled")),
    );

    handler.add(
        shake_tween(&ball, x())
            .to(8.0)
            .in_secs(0.5)
            .delay(2.5),
    );

    let mut frame = 0u32;
    while !handler.is_empty() {
        handler.update(FRAME_MS);
        frame += 1;
        if frame % 10 == 0 {
            let ball = ball.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            tracing::info!(
                "frame {:>3}: x={:>7.2} y={:>7.2} scale={:.2}",
                frame,
                ball.x,
                ball.y,
                ball.scale
            );
        }
    }

    tracing::info!("all timelines finished after {} frames", frame);
}
