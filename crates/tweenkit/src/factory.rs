//! Builders that turn a target and its property bindings into tweens
//!
//! ```ignore
//! let sprite = Arc::new(Mutex::new(Sprite::default()));
//! let x = Binding::from_mutex(&sprite, |s| s.x, |s, v| s.x = v);
//! let y = Binding::from_mutex(&sprite, |s| s.y, |s, v| s.y = v);
//!
//! handler.add(tween(&sprite, x).to(100.0).in_secs(0.5));
//! ```

use crate::pool::TweenPool;
use crate::sequence::Sequence;
use crate::target::TargetHandle;
use crate::tween::{Binding, ProgressFunction, Tween, TweenDirection};
use std::sync::Arc;

/// Scalar values the bundled progress functions know how to blend
pub trait Numeric: Copy + Send + Sync + 'static {
    fn to_f64(self) -> f64;

    /// Convert back, truncating toward zero for integer types
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_numeric {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_numeric!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64);

/// `start + (end - start) * progress`
pub fn arithmetic<V: Numeric>() -> ProgressFunction<V> {
    Arc::new(|start: &V, end: &V, progress| {
        let start = start.to_f64();
        V::from_f64(start + (end.to_f64() - start) * progress)
    })
}

/// Random jitter around the start value with amplitude `end`, fading out over time
pub fn shake<V: Numeric>() -> ProgressFunction<V> {
    Arc::new(|start: &V, end: &V, progress| {
        let jitter = rand::random::<f64>() - 0.5;
        V::from_f64(start.to_f64() + jitter * (1.0 - progress) * end.to_f64())
    })
}

/// Random jitter that grows over time and snaps back to the start value at the end
pub fn shake_with_increasing_intensity<V: Numeric>() -> ProgressFunction<V> {
    Arc::new(|start: &V, end: &V, progress| {
        if progress >= 1.0 {
            return *start;
        }
        let jitter = rand::random::<f64>() - 0.5;
        V::from_f64(start.to_f64() + jitter * progress * end.to_f64())
    })
}

/// Start building a linear tween of one numeric property
pub fn tween<T, V>(target: &Arc<T>, binding: Binding<V>) -> TweenBuilder<T, V>
where
    T: Send + Sync + 'static,
    V: Numeric,
{
    TweenBuilder::new(target, binding, arithmetic())
}

/// Start building a shake of one numeric property; the value passed to
/// `to`/`from` is the shake amplitude
pub fn shake_tween<T, V>(target: &Arc<T>, binding: Binding<V>) -> TweenBuilder<T, V>
where
    T: Send + Sync + 'static,
    V: Numeric,
{
    TweenBuilder::new(target, binding, shake())
}

pub fn shake_tween_with_increasing_intensity<T, V>(
    target: &Arc<T>,
    binding: Binding<V>,
) -> TweenBuilder<T, V>
where
    T: Send + Sync + 'static,
    V: Numeric,
{
    TweenBuilder::new(target, binding, shake_with_increasing_intensity())
}

/// Builder for a tween of one property
pub struct TweenBuilder<T, V> {
    target: Arc<T>,
    binding: Binding<V>,
    progress_fn: ProgressFunction<V>,
}

impl<T, V> TweenBuilder<T, V>
where
    T: Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    pub fn new(target: &Arc<T>, binding: Binding<V>, progress_fn: ProgressFunction<V>) -> Self {
        Self {
            target: target.clone(),
            binding,
            progress_fn,
        }
    }

    /// Tween a second property of the same target with the same configuration
    pub fn and(self, binding: Binding<V>) -> TweenGroupBuilder<T, V> {
        TweenGroupBuilder {
            target: self.target,
            bindings: vec![self.binding, binding],
            progress_fn: self.progress_fn,
        }
    }

    pub fn to(self, value: V) -> Tween<T, V> {
        self.build(value, TweenDirection::ToValue)
    }

    pub fn from(self, value: V) -> Tween<T, V> {
        self.build(value, TweenDirection::FromValue)
    }

    pub fn from_to(self, value: V) -> Tween<T, V> {
        self.build(value, TweenDirection::FromToValue)
    }

    pub fn build(self, value: V, direction: TweenDirection) -> Tween<T, V> {
        Tween::new(self.target, self.binding, self.progress_fn, value, direction)
    }

    /// Like [`build`](Self::build), reusing a retired tween from `pool` when one is available
    pub fn build_in(self, pool: &mut TweenPool, value: V, direction: TweenDirection) -> Tween<T, V> {
        pool.acquire(self.target, self.binding, self.progress_fn, value, direction)
    }
}

/// Builder for several properties of one target tweened as a group
pub struct TweenGroupBuilder<T, V> {
    target: Arc<T>,
    bindings: Vec<Binding<V>>,
    progress_fn: ProgressFunction<V>,
}

impl<T, V> TweenGroupBuilder<T, V>
where
    T: Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    pub fn and(mut self, binding: Binding<V>) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn to(self, value: V) -> Sequence<Tween<T, V>> {
        self.build(value, TweenDirection::ToValue)
    }

    pub fn from(self, value: V) -> Sequence<Tween<T, V>> {
        self.build(value, TweenDirection::FromValue)
    }

    pub fn from_to(self, value: V) -> Sequence<Tween<T, V>> {
        self.build(value, TweenDirection::FromToValue)
    }

    /// One tween per binding, all driven by the group's configuration
    pub fn build(self, value: V, direction: TweenDirection) -> Sequence<Tween<T, V>> {
        let Self {
            target,
            bindings,
            progress_fn,
        } = self;
        let handle = TargetHandle::new(&target);
        let tweens = bindings.into_iter().map(|binding| {
            Box::new(Tween::new(
                target.clone(),
                binding,
                progress_fn.clone(),
                value.clone(),
                direction,
            ))
        });
        Sequence::group(handle, tweens)
    }
}
