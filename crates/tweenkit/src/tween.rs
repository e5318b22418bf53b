//! Leaf tweens
//!
//! A [`Tween`] drives one bound property from a start value to a target value.
//! The start value is captured lazily on the first non-delayed update unless the
//! direction (or [`Tween::set_start_value`]) fixes it earlier.

use crate::target::{TargetHandle, TracksTarget};
use crate::timeline::{Timeline, TimelineState};
use std::any::{Any, TypeId};
use std::sync::{Arc, Mutex, PoisonError};

/// Value-space interpolation: `(start, end, progress) -> value`
pub type ProgressFunction<V> = Arc<dyn Fn(&V, &V, f64) -> V + Send + Sync>;

/// How the tween's endpoints are resolved when it is created
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TweenDirection {
    /// Animate from the live value (captured on first update) to the target
    #[default]
    ToValue,
    /// Jump to the given value now, then animate back to the original live value
    FromValue,
    /// Capture the live value now and animate it to the target
    FromToValue,
}

/// Getter/setter pair bound to one property of a target
pub struct Binding<V> {
    getter: Box<dyn Fn() -> V + Send>,
    setter: Box<dyn FnMut(V) + Send>,
}

impl<V> Binding<V> {
    pub fn new<G, S>(getter: G, setter: S) -> Self
    where
        G: Fn() -> V + Send + 'static,
        S: FnMut(V) + Send + 'static,
    {
        Self {
            getter: Box::new(getter),
            setter: Box::new(setter),
        }
    }

    pub fn get(&self) -> V {
        (self.getter)()
    }

    pub fn set(&mut self, value: V) {
        (self.setter)(value)
    }
}

impl<V: 'static> Binding<V> {
    /// Bind a field of a mutex-guarded object through plain accessor functions
    pub fn from_mutex<S>(target: &Arc<Mutex<S>>, get: fn(&S) -> V, set: fn(&mut S, V)) -> Self
    where
        S: Send + 'static,
    {
        let read = target.clone();
        let write = target.clone();
        Self::new(
            move || get(&read.lock().unwrap_or_else(PoisonError::into_inner)),
            move |value| set(&mut write.lock().unwrap_or_else(PoisonError::into_inner), value),
        )
    }
}

/// Progress for a run time, or `None` while still delayed.
///
/// Durations that are zero, negative or NaN complete immediately; non-finite
/// progress saturates to 1.
pub(crate) fn progress_at(run_time: f64, duration: f64) -> Option<f64> {
    if run_time < 0.0 {
        return None;
    }
    if !(duration > 0.0) {
        return Some(1.0);
    }
    let progress = run_time / duration;
    if progress.is_finite() {
        Some(progress.min(1.0))
    } else {
        Some(1.0)
    }
}

/// A leaf timeline animating one bound property of `T`
pub struct Tween<T, V> {
    state: TimelineState,
    target: Arc<T>,
    binding: Binding<V>,
    progress_fn: ProgressFunction<V>,
    start_value: Option<V>,
    target_value: V,
    direction: TweenDirection,
    yoyo_toggle: bool,
    done: bool,
}

impl<T, V> Tween<T, V>
where
    T: Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    pub fn new(
        target: Arc<T>,
        binding: Binding<V>,
        progress_fn: ProgressFunction<V>,
        target_value: V,
        direction: TweenDirection,
    ) -> Self {
        let mut tween = Self {
            state: TimelineState::new(),
            target,
            binding,
            progress_fn,
            start_value: None,
            target_value,
            direction,
            yoyo_toggle: false,
            done: false,
        };
        tween.init();
        tween
    }

    /// Resolve the direction against the live value
    pub(crate) fn init(&mut self) {
        match self.direction {
            TweenDirection::ToValue => {}
            TweenDirection::FromValue => {
                let current = self.binding.get();
                self.binding.set(self.target_value.clone());
                self.target_value = current;
            }
            TweenDirection::FromToValue => {
                self.start_value = Some(self.binding.get());
            }
        }
    }

    /// Return to a pristine, unbound-equivalent state for reuse
    pub fn reset(&mut self) {
        self.state.reset();
        self.start_value = None;
        self.yoyo_toggle = false;
        self.done = false;
    }

    pub(crate) fn rebind(
        &mut self,
        target: Arc<T>,
        binding: Binding<V>,
        progress_fn: ProgressFunction<V>,
        target_value: V,
        direction: TweenDirection,
    ) {
        self.target = target;
        self.binding = binding;
        self.progress_fn = progress_fn;
        self.target_value = target_value;
        self.direction = direction;
    }

    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    pub fn target_value(&self) -> &V {
        &self.target_value
    }

    pub fn set_target_value(&mut self, value: V) {
        self.target_value = value;
    }

    /// Captured start value, `None` until the first non-delayed update
    pub fn start_value(&self) -> Option<&V> {
        self.start_value.as_ref()
    }

    /// Fix the start value instead of capturing it on the first update
    pub fn set_start_value(&mut self, value: V) {
        self.start_value = Some(value);
    }

    pub fn direction(&self) -> TweenDirection {
        self.direction
    }

    /// Flips on every yoyo repeat; `true` while on the return leg
    pub fn yoyo_toggle(&self) -> bool {
        self.yoyo_toggle
    }

    /// Current value of the bound property
    pub fn current_value(&self) -> V {
        self.binding.get()
    }

    fn finish_sweep(&mut self) {
        let options = &mut self.state.options;
        if options.should_repeat() {
            if !options.is_infinite() {
                options.repeat -= 1;
            }
            self.state.run_time = -options.repeat_delay;

            if options.yoyo {
                if let Some(start) = self.start_value.as_mut() {
                    std::mem::swap(start, &mut self.target_value);
                }
                self.yoyo_toggle = !self.yoyo_toggle;
                if !self.yoyo_toggle {
                    self.state.run_time = -options.yoyo_delay;
                }
            }

            self.state.options.on_repeat.fire(&*self);
            return;
        }

        self.state.options.on_complete.fire(&*self);
        self.done = true;
        self.state.mark_done();
        tracing::trace!("Tween<{}> completed", std::any::type_name::<T>());
    }
}

impl<T, V> Timeline for Tween<T, V>
where
    T: Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    fn update(&mut self, passed_seconds: f64) {
        if self.done {
            return;
        }

        self.state.run_time += passed_seconds * self.state.options.speed_multiplier;
        let Some(progress) = progress_at(self.state.run_time, self.state.options.duration) else {
            return;
        };

        let start = match self.start_value.clone() {
            Some(start) => start,
            None => {
                self.state.options.on_begin.fire(&*self);
                let start = self.binding.get();
                self.start_value = Some(start.clone());
                start
            }
        };

        let eased = self.state.options.ease(progress);
        let from = if self.state.options.always_on_current_value {
            self.binding.get()
        } else {
            start
        };
        let value = (self.progress_fn)(&from, &self.target_value, eased);
        self.binding.set(value);

        self.state.options.on_update.fire(&*self);

        if progress >= 1.0 {
            self.finish_sweep();
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn dispose(&mut self) {
        self.done = true;
        self.state.mark_done();
    }

    fn state(&self) -> &TimelineState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TimelineState {
        &mut self.state
    }

    fn tracks_target(&self) -> Option<&dyn TracksTarget> {
        Some(self)
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl<T, V> TracksTarget for Tween<T, V>
where
    T: Send + Sync + 'static,
{
    fn has_target(&self, target: &TargetHandle) -> bool {
        target.refers_to(&self.target)
    }

    fn target_is_type(&self, type_id: TypeId) -> bool {
        type_id == TypeId::of::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::INFINITE_REPEAT;
    use crate::timeline::TimelineExt;

    fn lerp() -> ProgressFunction<f64> {
        Arc::new(|start: &f64, end: &f64, t| start + (end - start) * t)
    }

    fn cell(value: f64) -> (Arc<Mutex<f64>>, Binding<f64>) {
        let target = Arc::new(Mutex::new(value));
        let binding = Binding::from_mutex(&target, |v| *v, |v, new| *v = new);
        (target, binding)
    }

    fn value_of(target: &Arc<Mutex<f64>>) -> f64 {
        *target.lock().unwrap()
    }

    #[test]
    fn test_linear_interpolation() {
        let (target, binding) = cell(10.0);
        let mut tween = Tween::new(target.clone(), binding, lerp(), 20.0, TweenDirection::ToValue)
            .in_secs(2.0);

        tween.update(0.5);
        assert!((value_of(&target) - 12.5).abs() < 1e-9);
        tween.update(1.0);
        assert!((value_of(&target) - 17.5).abs() < 1e-9);
        assert!(!tween.is_done());

        tween.update(1.0);
        assert_eq!(value_of(&target), 20.0);
        assert!(tween.is_done());
    }

    #[test]
    fn test_update_after_done_is_noop() {
        let (target, binding) = cell(0.0);
        let mut tween =
            Tween::new(target.clone(), binding, lerp(), 1.0, TweenDirection::ToValue).in_secs(1.0);
        tween.update(1.0);
        assert!(tween.is_done());

        *target.lock().unwrap() = 42.0;
        tween.update(1.0);
        assert_eq!(value_of(&target), 42.0);
    }

    #[test]
    fn test_delay_has_no_side_effects() {
        let (target, binding) = cell(0.0);
        let begun = Arc::new(Mutex::new(0));
        let begun_clone = begun.clone();
        let mut tween = Tween::new(target.clone(), binding, lerp(), 10.0, TweenDirection::ToValue)
            .in_secs(1.0)
            .delay(0.5)
            .on_begin(move |_, _| *begun_clone.lock().unwrap() += 1);

        tween.update(0.25);
        assert_eq!(value_of(&target), 0.0);
        assert!(tween.start_value().is_none());
        assert_eq!(*begun.lock().unwrap(), 0);

        tween.update(0.75);
        assert!((value_of(&target) - 5.0).abs() < 1e-9);
        assert_eq!(*begun.lock().unwrap(), 1);
    }

    #[test]
    fn test_start_captured_lazily() {
        let (target, binding) = cell(0.0);
        let mut tween =
            Tween::new(target.clone(), binding, lerp(), 10.0, TweenDirection::ToValue).in_secs(1.0);

        // Live value changes before the first update are picked up
        *target.lock().unwrap() = 4.0;
        tween.update(0.5);
        assert_eq!(tween.start_value(), Some(&4.0));
        assert!((value_of(&target) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_value_swaps_immediately() {
        let (target, binding) = cell(3.0);
        let mut tween =
            Tween::new(target.clone(), binding, lerp(), 9.0, TweenDirection::FromValue).in_secs(1.0);

        assert_eq!(value_of(&target), 9.0);
        assert_eq!(*tween.target_value(), 3.0);

        tween.update(1.0);
        assert_eq!(value_of(&target), 3.0);
    }

    #[test]
    fn test_from_to_captures_start_at_creation() {
        let (target, binding) = cell(2.0);
        let mut tween =
            Tween::new(target.clone(), binding, lerp(), 12.0, TweenDirection::FromToValue)
                .in_secs(1.0);
        assert_eq!(tween.start_value(), Some(&2.0));

        *target.lock().unwrap() = 100.0;
        tween.update(0.5);
        assert!((value_of(&target) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeat_sweeps() {
        let (target, binding) = cell(0.0);
        let repeats = Arc::new(Mutex::new(0));
        let repeats_clone = repeats.clone();
        let mut tween = Tween::new(target, binding, lerp(), 1.0, TweenDirection::ToValue)
            .in_secs(1.0)
            .repeat(2)
            .on_repeat(move |_, _| *repeats_clone.lock().unwrap() += 1);

        tween.update(1.0);
        tween.update(1.0);
        assert!(!tween.is_done());
        tween.update(1.0);
        assert!(tween.is_done());
        assert_eq!(*repeats.lock().unwrap(), 2);
    }

    #[test]
    fn test_infinite_repeat_never_completes() {
        let (target, binding) = cell(0.0);
        let mut tween = Tween::new(target, binding, lerp(), 1.0, TweenDirection::ToValue)
            .in_secs(0.1)
            .repeat(INFINITE_REPEAT);

        for _ in 0..1000 {
            tween.update(0.1);
        }
        assert!(!tween.is_done());
        assert_eq!(tween.options().repeat, INFINITE_REPEAT);
    }

    #[test]
    fn test_yoyo_reverses() {
        let (target, binding) = cell(0.0);
        let mut tween = Tween::new(target.clone(), binding, lerp(), 10.0, TweenDirection::ToValue)
            .in_secs(1.0)
            .repeat(2)
            .yoyo(true);

        tween.update(1.0);
        assert_eq!(value_of(&target), 10.0);
        assert!(tween.yoyo_toggle());

        tween.update(0.5);
        assert!((value_of(&target) - 5.0).abs() < 1e-9);
        tween.update(0.5);
        assert_eq!(value_of(&target), 0.0);
        assert!(!tween.yoyo_toggle());

        tween.update(1.0);
        assert_eq!(value_of(&target), 10.0);
        assert!(tween.is_done());
    }

    #[test]
    fn test_yoyo_delay_on_return_to_origin() {
        let (target, binding) = cell(0.0);
        let mut tween = Tween::new(target, binding, lerp(), 10.0, TweenDirection::ToValue)
            .in_secs(1.0)
            .repeat(INFINITE_REPEAT)
            .yoyo(true)
            .repeat_delay(0.25)
            .yoyo_delay(0.5);

        tween.update(1.0);
        assert_eq!(tween.run_time(), -0.25);
        tween.update(1.25);
        assert_eq!(tween.run_time(), -0.5);
    }

    #[test]
    fn test_always_on_current_value() {
        let (target, binding) = cell(0.0);
        let mut tween = Tween::new(target.clone(), binding, lerp(), 10.0, TweenDirection::ToValue)
            .in_secs(1.0)
            .always_on_current_value(true);

        tween.update(0.5);
        assert!((value_of(&target) - 5.0).abs() < 1e-9);
        // Interpolates from 5.0 now, not from the captured 0.0
        tween.update(0.25);
        assert!((value_of(&target) - 8.75).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let (target, binding) = cell(0.0);
        let mut tween = Tween::new(target.clone(), binding, lerp(), 5.0, TweenDirection::ToValue);

        tween.update(0.0);
        assert_eq!(value_of(&target), 5.0);
        assert!(tween.is_done());
    }

    #[test]
    fn test_easing_output_not_clamped() {
        let (target, binding) = cell(0.0);
        let mut tween = Tween::new(target.clone(), binding, lerp(), 10.0, TweenDirection::ToValue)
            .in_secs(1.0)
            .ease(|t| t * 1.5);

        tween.update(1.0);
        assert!((value_of(&target) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_multiplier() {
        let (target, binding) = cell(0.0);
        let mut tween = Tween::new(target.clone(), binding, lerp(), 10.0, TweenDirection::ToValue)
            .in_secs(1.0)
            .speed(2.0);

        tween.update(0.25);
        assert!((value_of(&target) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_dispose_forces_done() {
        let (target, binding) = cell(0.0);
        let mut tween =
            Tween::new(target.clone(), binding, lerp(), 10.0, TweenDirection::ToValue).in_secs(1.0);
        tween.dispose();
        assert!(tween.is_done());
        assert!(tween.state().completion().is_done());
        // Bindings survive disposal
        assert_eq!(tween.current_value(), 0.0);
    }

    #[test]
    fn test_tracks_target() {
        let (target, binding) = cell(0.0);
        let other = Arc::new(Mutex::new(0.0f64));
        let tween = Tween::new(target.clone(), binding, lerp(), 1.0, TweenDirection::ToValue);

        let tracker = tween.tracks_target().unwrap();
        assert!(tracker.has_target(&TargetHandle::new(&target)));
        assert!(!tracker.has_target(&TargetHandle::new(&other)));
        assert!(tracker.target_is::<Mutex<f64>>());
        assert!(!tracker.target_is::<Mutex<i32>>());
    }

    #[test]
    fn test_progress_at() {
        assert_eq!(progress_at(-0.1, 1.0), None);
        assert_eq!(progress_at(0.5, 2.0), Some(0.25));
        assert_eq!(progress_at(3.0, 2.0), Some(1.0));
        assert_eq!(progress_at(0.0, 0.0), Some(1.0));
        assert_eq!(progress_at(1.0, -1.0), Some(1.0));
        assert_eq!(progress_at(1.0, f64::NAN), Some(1.0));
        assert_eq!(progress_at(f64::INFINITY, 1.0), Some(1.0));
    }
}
