//! Timeline contract shared by tweens and sequences
//!
//! A timeline is Active until it becomes Done; nothing leaves Done. Leaves and
//! composites both implement [`Timeline`], and every timeline gets the fluent
//! configuration methods of [`TimelineExt`].

use crate::easing::Easing;
use crate::error::{Result, TweenError};
use crate::options::{EventParam, TimelineOptions, TimelineSettings};
use crate::target::TracksTarget;
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Polling interval of [`Completion::wait`]
pub const COMPLETION_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shared done flag that can be watched from another task
#[derive(Clone, Debug, Default)]
pub struct Completion {
    done: Arc<AtomicBool>,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    /// A completion that is already resolved
    pub fn finished() -> Self {
        let completion = Self::new();
        completion.mark_done();
        completion
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    pub(crate) fn mark_done(&self) {
        self.done.store(true, Ordering::Release);
    }

    /// Resolve once the timeline is done, checking every 100ms.
    ///
    /// Must not run on the task that drives `update`, or it never resolves.
    pub async fn wait(&self) {
        while !self.is_done() {
            tokio::time::sleep(COMPLETION_POLL_INTERVAL).await;
        }
    }
}

/// State every timeline carries
#[derive(Debug, Default)]
pub struct TimelineState {
    pub options: TimelineOptions,
    /// Elapsed seconds; negative while an initial or repeat delay runs
    pub run_time: f64,
    /// Stops the handler from updating later roots while this one is active
    pub is_blocking: bool,
    pub priority: i32,
    completion: Completion,
}

impl TimelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completion(&self) -> &Completion {
        &self.completion
    }

    pub(crate) fn mark_done(&self) {
        self.completion.mark_done();
    }

    /// Restore defaults with a fresh completion flag
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A schedulable animation unit, leaf or composite
pub trait Timeline: Any + Send {
    /// Advance by `passed_seconds`; a no-op once done
    fn update(&mut self, passed_seconds: f64);

    fn is_done(&self) -> bool;

    /// Force the timeline (and anything it owns) into Done
    fn dispose(&mut self);

    fn state(&self) -> &TimelineState;

    fn state_mut(&mut self) -> &mut TimelineState;

    /// Apply configuration that a group shares with its members.
    ///
    /// Plain timelines only configure themselves.
    fn configure_shared(&mut self, apply: &mut dyn FnMut(&mut TimelineState)) {
        apply(self.state_mut());
    }

    fn tracks_target(&self) -> Option<&dyn TracksTarget> {
        None
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;

    fn options(&self) -> &TimelineOptions {
        &self.state().options
    }

    fn options_mut(&mut self) -> &mut TimelineOptions {
        &mut self.state_mut().options
    }

    fn run_time(&self) -> f64 {
        self.state().run_time
    }

    fn is_blocking(&self) -> bool {
        self.state().is_blocking
    }

    fn priority(&self) -> i32 {
        self.state().priority
    }

    /// Watch handle for awaiting this timeline from another task.
    ///
    /// Resolved at once when `is_done` already holds. Fails for infinitely
    /// repeating timelines, which would never finish.
    fn completion(&self) -> Result<Completion> {
        if self.is_done() {
            return Ok(Completion::finished());
        }
        if self.options().is_infinite() {
            return Err(TweenError::InfiniteAwait);
        }
        Ok(self.state().completion().clone())
    }
}

/// A timeline that is done from the start
#[derive(Debug)]
pub struct EmptyTimeline {
    state: TimelineState,
}

impl EmptyTimeline {
    pub fn new() -> Self {
        let state = TimelineState::new();
        state.mark_done();
        Self { state }
    }
}

impl Default for EmptyTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline for EmptyTimeline {
    fn update(&mut self, _passed_seconds: f64) {}

    fn is_done(&self) -> bool {
        true
    }

    fn dispose(&mut self) {}

    fn state(&self) -> &TimelineState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TimelineState {
        &mut self.state
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// Fluent configuration for any timeline
///
/// ```ignore
/// let tween = tween(&sprite, x_binding)
///     .to(100.0)
///     .in_secs(0.5)
///     .delay(0.1)
///     .ease_with(Easing::EaseOutQuad)
///     .repeat(2)
///     .yoyo(true);
/// ```
pub trait TimelineExt: Timeline + Sized {
    /// Set the duration of one sweep
    fn in_secs(mut self, seconds: f64) -> Self {
        self.configure_shared(&mut |state| state.options.duration = seconds);
        self
    }

    /// Wait `seconds` before the first sweep starts
    fn delay(mut self, seconds: f64) -> Self {
        self.configure_shared(&mut |state| state.run_time = -seconds);
        self
    }

    fn repeat(mut self, repeats: i32) -> Self {
        self.configure_shared(&mut |state| state.options.repeat = repeats);
        self
    }

    fn repeat_delay(mut self, seconds: f64) -> Self {
        self.configure_shared(&mut |state| state.options.repeat_delay = seconds);
        self
    }

    fn yoyo(mut self, enabled: bool) -> Self {
        self.configure_shared(&mut |state| state.options.yoyo = enabled);
        self
    }

    fn yoyo_delay(mut self, seconds: f64) -> Self {
        self.configure_shared(&mut |state| state.options.yoyo_delay = seconds);
        self
    }

    fn ease<F>(mut self, easing: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let easing: crate::easing::EasingFunction = Arc::new(easing);
        self.configure_shared(&mut |state| state.options.easing = Some(easing.clone()));
        self
    }

    fn ease_with(mut self, easing: Easing) -> Self {
        let easing = easing.into_fn();
        self.configure_shared(&mut |state| state.options.easing = Some(easing.clone()));
        self
    }

    fn always_on_current_value(mut self, enabled: bool) -> Self {
        self.configure_shared(&mut |state| state.options.always_on_current_value = enabled);
        self
    }

    /// Scales time for this timeline and everything it owns
    fn speed(mut self, multiplier: f64) -> Self {
        self.state_mut().options.speed_multiplier = multiplier;
        self
    }

    fn blocking(mut self, blocking: bool) -> Self {
        self.state_mut().is_blocking = blocking;
        self
    }

    fn with_priority(mut self, priority: i32) -> Self {
        self.state_mut().priority = priority;
        self
    }

    fn on_begin<F>(mut self, handler: F) -> Self
    where
        F: Fn(&dyn Timeline, &[EventParam]) + Send + Sync + 'static,
    {
        let handler: crate::options::TimelineEventHandler = Arc::new(handler);
        self.configure_shared(&mut |state| state.options.on_begin.add(handler.clone()));
        self
    }

    fn on_begin_params(mut self, params: Vec<EventParam>) -> Self {
        self.configure_shared(&mut |state| state.options.on_begin.set_params(params.clone()));
        self
    }

    fn on_update<F>(mut self, handler: F) -> Self
    where
        F: Fn(&dyn Timeline, &[EventParam]) + Send + Sync + 'static,
    {
        let handler: crate::options::TimelineEventHandler = Arc::new(handler);
        self.configure_shared(&mut |state| state.options.on_update.add(handler.clone()));
        self
    }

    fn on_update_params(mut self, params: Vec<EventParam>) -> Self {
        self.configure_shared(&mut |state| state.options.on_update.set_params(params.clone()));
        self
    }

    fn on_repeat<F>(mut self, handler: F) -> Self
    where
        F: Fn(&dyn Timeline, &[EventParam]) + Send + Sync + 'static,
    {
        let handler: crate::options::TimelineEventHandler = Arc::new(handler);
        self.configure_shared(&mut |state| state.options.on_repeat.add(handler.clone()));
        self
    }

    fn on_repeat_params(mut self, params: Vec<EventParam>) -> Self {
        self.configure_shared(&mut |state| state.options.on_repeat.set_params(params.clone()));
        self
    }

    /// Fires once when the timeline itself completes (groups fire it once, not per member)
    fn on_complete<F>(mut self, handler: F) -> Self
    where
        F: Fn(&dyn Timeline, &[EventParam]) + Send + Sync + 'static,
    {
        self.options_mut().on_complete.add(Arc::new(handler));
        self
    }

    fn on_complete_params(mut self, params: Vec<EventParam>) -> Self {
        self.options_mut().on_complete.set_params(params);
        self
    }

    /// Apply a loaded [`TimelineSettings`] block
    fn with_settings(self, settings: &TimelineSettings) -> Self {
        let mut timeline = self
            .in_secs(settings.duration)
            .repeat(settings.repeat)
            .repeat_delay(settings.repeat_delay)
            .yoyo(settings.yoyo)
            .yoyo_delay(settings.yoyo_delay)
            .always_on_current_value(settings.always_on_current_value)
            .speed(settings.speed_multiplier);
        if settings.delay > 0.0 {
            timeline = timeline.delay(settings.delay);
        }
        match settings.easing {
            Some(easing) => timeline.ease_with(easing),
            None => timeline,
        }
    }

    /// Wait until the timeline is done, polling every 100ms.
    ///
    /// Rejected up front for infinitely repeating timelines.
    fn await_completion(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let completion = self.completion();
        Box::pin(async move {
            completion?.wait().await;
            Ok(())
        })
    }
}

impl<T: Timeline> TimelineExt for T {}
