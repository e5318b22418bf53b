//! Tween scheduler
//!
//! Owns the root timelines and advances them once per frame.

use crate::error::{Result, TweenError};
use crate::target::{TargetHandle, TracksTarget};
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use std::any::Any;

/// Time modifiers closer to zero than this pause the handler
pub const TIME_MODIFIER_TOLERANCE: f64 = 0.000001;

new_key_type! {
    /// Identifier of a root timeline inside a [`TweenHandler`]
    pub struct TimelineId;
}

/// Handler configuration, loadable from settings files
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenHandlerConfig {
    /// Scales every update; 0 pauses
    pub time_modifier: f64,
    /// Reject clear/remove calls so running timelines can't be interrupted
    pub forbid_removing: bool,
}

impl Default for TweenHandlerConfig {
    fn default() -> Self {
        Self {
            time_modifier: 1.0,
            forbid_removing: false,
        }
    }
}

/// The scheduler that ticks all root timelines
pub struct TweenHandler {
    timelines: SlotMap<TimelineId, Box<dyn Timeline>>,
    /// Update order of the roots
    order: Vec<TimelineId>,
    time_modifier: f64,
    forbid_removing: bool,
}

impl TweenHandler {
    pub fn new() -> Self {
        Self::from_config(&TweenHandlerConfig::default())
    }

    pub fn from_config(config: &TweenHandlerConfig) -> Self {
        Self {
            timelines: SlotMap::with_key(),
            order: Vec::new(),
            time_modifier: config.time_modifier,
            forbid_removing: config.forbid_removing,
        }
    }

    pub fn time_modifier(&self) -> f64 {
        self.time_modifier
    }

    pub fn set_time_modifier(&mut self, modifier: f64) {
        self.time_modifier = modifier;
    }

    pub fn forbid_removing(&self) -> bool {
        self.forbid_removing
    }

    pub fn set_forbid_removing(&mut self, forbid: bool) {
        self.forbid_removing = forbid;
    }

    /// Add a root timeline; it is updated after every existing root
    pub fn add<T: Timeline>(&mut self, timeline: T) -> TimelineId {
        self.add_boxed(Box::new(timeline))
    }

    pub fn add_boxed(&mut self, timeline: Box<dyn Timeline>) -> TimelineId {
        let id = self.timelines.insert(timeline);
        self.order.push(id);
        id
    }

    pub fn get(&self, id: TimelineId) -> Option<&dyn Timeline> {
        self.timelines.get(id).map(|timeline| timeline.as_ref())
    }

    pub fn get_mut(&mut self, id: TimelineId) -> Option<&mut dyn Timeline> {
        self.timelines.get_mut(id).map(|timeline| timeline.as_mut())
    }

    pub fn contains(&self, id: TimelineId) -> bool {
        self.timelines.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Root ids in update order
    pub fn ids(&self) -> impl Iterator<Item = TimelineId> + '_ {
        self.order.iter().copied()
    }

    /// Reorder roots by ascending priority, keeping insertion order among equals
    pub fn sort_by_priority(&mut self) {
        let timelines = &self.timelines;
        self.order
            .sort_by_key(|id| timelines.get(*id).map_or(0, |timeline| timeline.priority()));
    }

    /// Advance every root by `elapsed_ms`, then evict and return the finished ones.
    ///
    /// A blocking root stops later roots from being updated this tick. Evicted
    /// roots are already disposed; hand pooled tweens among them back with
    /// [`TweenPool::release_timeline`](crate::pool::TweenPool::release_timeline)
    /// or just drop them.
    pub fn update(&mut self, elapsed_ms: u32) -> Vec<Box<dyn Timeline>> {
        if self.time_modifier.abs() < TIME_MODIFIER_TOLERANCE {
            return Vec::new();
        }

        let passed_seconds = f64::from(elapsed_ms) / 1000.0 * self.time_modifier;

        // Callbacks cannot reach the handler, so the order is stable for the whole pass
        for id in &self.order {
            let Some(timeline) = self.timelines.get_mut(*id) else {
                continue;
            };
            timeline.update(passed_seconds);
            if timeline.is_blocking() {
                break;
            }
        }

        let finished = self.remove_where(|timeline| timeline.is_done());
        if !finished.is_empty() {
            tracing::debug!("TweenHandler: evicted {} finished timelines", finished.len());
        }
        finished
    }

    /// Remove every root animating `target`
    pub fn clear_tweens_of(
        &mut self,
        target: impl Into<TargetHandle>,
    ) -> Result<Vec<Box<dyn Timeline>>> {
        let target = target.into();
        self.clear_tweens(|tracker| tracker.has_target(&target))
    }

    /// Remove every target-tracking root matching `predicate`
    pub fn clear_tweens<F>(&mut self, predicate: F) -> Result<Vec<Box<dyn Timeline>>>
    where
        F: Fn(&dyn TracksTarget) -> bool,
    {
        self.check_removal_allowed()?;
        let removed = self.remove_where(|timeline| {
            timeline
                .tracks_target()
                .is_some_and(|tracker| predicate(tracker))
        });
        tracing::debug!("TweenHandler: cleared {} timelines", removed.len());
        Ok(removed)
    }

    /// Remove every root whose target has concrete type `T`
    pub fn clear_tweens_with_target_of_type<T: Any>(&mut self) -> Result<Vec<Box<dyn Timeline>>> {
        self.clear_tweens(|tracker| tracker.target_is::<T>())
    }

    /// Remove a single root by id
    pub fn remove(&mut self, id: TimelineId) -> Result<Option<Box<dyn Timeline>>> {
        self.check_removal_allowed()?;
        let removed = self.timelines.remove(id).map(|mut timeline| {
            timeline.dispose();
            timeline
        });
        if removed.is_some() {
            self.order.retain(|other| *other != id);
        }
        Ok(removed)
    }

    /// Whether any root animates `target`
    pub fn has_tween(&self, target: impl Into<TargetHandle>) -> bool {
        let target = target.into();
        self.timelines.values().any(|timeline| {
            timeline
                .tracks_target()
                .is_some_and(|tracker| tracker.has_target(&target))
        })
    }

    fn check_removal_allowed(&self) -> Result<()> {
        if self.forbid_removing {
            tracing::warn!("TweenHandler: rejected removal, removing is forbidden");
            return Err(TweenError::RemovalForbidden);
        }
        Ok(())
    }

    /// Dispose and take out every root matching `predicate`, in update order
    fn remove_where<F>(&mut self, predicate: F) -> Vec<Box<dyn Timeline>>
    where
        F: Fn(&dyn Timeline) -> bool,
    {
        let timelines = &mut self.timelines;
        let mut removed = Vec::new();
        self.order.retain(|id| {
            let matches = timelines
                .get(*id)
                .is_some_and(|timeline| predicate(timeline.as_ref()));
            if matches {
                if let Some(mut timeline) = timelines.remove(*id) {
                    timeline.dispose();
                    removed.push(timeline);
                }
            }
            !matches
        });
        removed
    }
}

impl Default for TweenHandler {
    fn default() -> Self {
        Self::new()
    }
}
