//! Reuse cache for retired tweens
//!
//! The pool is an explicit value owned by whoever composes the scheduler. It
//! keeps one queue per concrete `Tween<T, V>` type; a queue exists once that
//! type has been acquired at least once. Tweens only come back through
//! [`TweenPool::release`] or [`TweenPool::release_timeline`].

use crate::timeline::Timeline;
use crate::tween::{Binding, ProgressFunction, Tween, TweenDirection};
use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Default)]
pub struct TweenPool {
    queues: FxHashMap<TypeId, VecDeque<Box<dyn Any + Send>>>,
}

impl TweenPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a reset tween bound to the given parameters
    pub fn acquire<T, V>(
        &mut self,
        target: Arc<T>,
        binding: Binding<V>,
        progress_fn: ProgressFunction<V>,
        target_value: V,
        direction: TweenDirection,
    ) -> Tween<T, V>
    where
        T: Send + Sync + 'static,
        V: Clone + Send + 'static,
    {
        let queue = self.queues.entry(TypeId::of::<Tween<T, V>>()).or_default();
        let recycled = queue
            .pop_front()
            .and_then(|entry| entry.downcast::<Tween<T, V>>().ok());

        match recycled {
            Some(mut tween) => {
                tween.reset();
                tween.rebind(target, binding, progress_fn, target_value, direction);
                tween.init();
                *tween
            }
            None => {
                tracing::trace!(
                    "TweenPool: allocating Tween<{}, {}>",
                    std::any::type_name::<T>(),
                    std::any::type_name::<V>()
                );
                Tween::new(target, binding, progress_fn, target_value, direction)
            }
        }
    }

    /// Return a tween for reuse; dropped if its type was never acquired
    pub fn release<T, V>(&mut self, tween: Tween<T, V>)
    where
        T: Send + Sync + 'static,
        V: Clone + Send + 'static,
    {
        self.release_any(Box::new(tween));
    }

    /// Return a type-erased timeline, e.g. one handed back by a handler clear.
    ///
    /// Anything that is not a pooled tween type is dropped.
    pub fn release_timeline(&mut self, timeline: Box<dyn Timeline>) {
        self.release_any(timeline.into_any());
    }

    fn release_any(&mut self, entry: Box<dyn Any + Send>) {
        let type_id = (*entry).type_id();
        match self.queues.get_mut(&type_id) {
            Some(queue) => queue.push_back(entry),
            None => tracing::trace!("TweenPool: dropping release of unpooled type"),
        }
    }

    /// Number of retired tweens waiting in the `Tween<T, V>` queue
    pub fn available<T, V>(&self) -> usize
    where
        T: 'static,
        V: 'static,
    {
        self.queues
            .get(&TypeId::of::<Tween<T, V>>())
            .map_or(0, VecDeque::len)
    }
}
