//! Composite timelines
//!
//! A [`Sequence`] advances all of its children every tick (in insertion order),
//! evicts the ones that finished and completes on the same tick its last child
//! is evicted. Children inherit the sequence's speed multiplier on top of their
//! own.

use crate::target::{TargetHandle, TracksTarget};
use crate::timeline::{Timeline, TimelineState};
use std::any::{Any, TypeId};

/// Target metadata carried by a sequence for cancellation lookups
#[derive(Clone, Debug, Default)]
pub enum SequenceTargets {
    #[default]
    None,
    Single(TargetHandle),
    Many(Vec<TargetHandle>),
}

/// A composite timeline that is done once every child is done
pub struct Sequence<C: Timeline + ?Sized = dyn Timeline> {
    state: TimelineState,
    timelines: Vec<Box<C>>,
    targets: SequenceTargets,
    /// Configuration applied to the sequence is mirrored onto every child
    shares_options: bool,
}

impl<C: Timeline + ?Sized> Sequence<C> {
    pub fn new(timelines: impl IntoIterator<Item = Box<C>>) -> Self {
        Self::build(timelines, SequenceTargets::None, false)
    }

    /// A sequence animating a single object
    pub fn with_target(target: TargetHandle, timelines: impl IntoIterator<Item = Box<C>>) -> Self {
        Self::build(timelines, SequenceTargets::Single(target), false)
    }

    /// A sequence animating several objects
    pub fn with_targets(
        targets: Vec<TargetHandle>,
        timelines: impl IntoIterator<Item = Box<C>>,
    ) -> Self {
        Self::build(timelines, SequenceTargets::Many(targets), false)
    }

    /// Several properties of one target tweened together with one configuration
    pub(crate) fn group(target: TargetHandle, timelines: impl IntoIterator<Item = Box<C>>) -> Self {
        Self::build(timelines, SequenceTargets::Single(target), true)
    }

    fn build(
        timelines: impl IntoIterator<Item = Box<C>>,
        targets: SequenceTargets,
        shares_options: bool,
    ) -> Self {
        Self {
            state: TimelineState::new(),
            timelines: timelines.into_iter().collect(),
            targets,
            shares_options,
        }
    }

    /// Append a child; it is advanced after every existing child
    pub fn push(&mut self, timeline: Box<C>) {
        self.timelines.push(timeline);
    }

    /// Children that have not been evicted yet
    pub fn timelines(&self) -> &[Box<C>] {
        &self.timelines
    }

    pub fn timelines_mut(&mut self) -> &mut [Box<C>] {
        &mut self.timelines
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    pub fn targets(&self) -> &SequenceTargets {
        &self.targets
    }

    /// Take the remaining children out of the sequence
    pub fn into_timelines(self) -> Vec<Box<C>> {
        self.timelines
    }
}

impl Sequence<dyn Timeline> {
    /// Builder-style append for heterogeneous sequences
    pub fn then<T: Timeline>(mut self, timeline: T) -> Self {
        self.timelines.push(Box::new(timeline));
        self
    }
}

impl<C: Timeline + ?Sized> Timeline for Sequence<C> {
    fn update(&mut self, passed_seconds: f64) {
        // Set once drained or disposed
        if self.state.completion().is_done() {
            return;
        }

        let passed_seconds = passed_seconds * self.state.options.speed_multiplier;
        for timeline in self.timelines.iter_mut() {
            timeline.update(passed_seconds);
        }

        self.timelines.retain_mut(|timeline| {
            if timeline.is_done() {
                timeline.dispose();
                false
            } else {
                true
            }
        });

        if !self.timelines.is_empty() {
            return;
        }

        self.state.options.on_complete.fire(&*self);
        self.state.mark_done();
        tracing::trace!("Sequence drained, targets: {:?}", self.targets);
    }

    fn is_done(&self) -> bool {
        self.timelines.iter().all(|timeline| timeline.is_done())
    }

    fn dispose(&mut self) {
        for timeline in self.timelines.iter_mut() {
            timeline.dispose();
        }
        self.state.mark_done();
    }

    fn state(&self) -> &TimelineState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TimelineState {
        &mut self.state
    }

    fn configure_shared(&mut self, apply: &mut dyn FnMut(&mut TimelineState)) {
        apply(&mut self.state);
        if self.shares_options {
            for timeline in self.timelines.iter_mut() {
                timeline.configure_shared(apply);
            }
        }
    }

    fn tracks_target(&self) -> Option<&dyn TracksTarget> {
        match self.targets {
            SequenceTargets::None => None,
            _ => Some(self),
        }
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl<C: Timeline + ?Sized> TracksTarget for Sequence<C> {
    fn has_target(&self, target: &TargetHandle) -> bool {
        match &self.targets {
            SequenceTargets::None => false,
            SequenceTargets::Single(own) => own == target,
            SequenceTargets::Many(own) => own.iter().any(|t| t == target),
        }
    }

    fn target_is_type(&self, type_id: TypeId) -> bool {
        match &self.targets {
            SequenceTargets::None => false,
            SequenceTargets::Single(own) => own.target_type_id() == type_id,
            SequenceTargets::Many(own) => own.iter().any(|t| t.target_type_id() == type_id),
        }
    }
}

/// Collect boxed timelines into a sequence
pub trait IntoSequence<C: Timeline + ?Sized>: Iterator<Item = Box<C>> + Sized {
    fn into_sequence(self) -> Sequence<C> {
        Sequence::new(self)
    }

    fn into_sequence_with_target(self, target: TargetHandle) -> Sequence<C> {
        Sequence::with_target(target, self)
    }

    fn into_sequence_with_targets(self, targets: Vec<TargetHandle>) -> Sequence<C> {
        Sequence::with_targets(targets, self)
    }
}

impl<C, I> IntoSequence<C> for I
where
    C: Timeline + ?Sized,
    I: Iterator<Item = Box<C>>,
{
}
