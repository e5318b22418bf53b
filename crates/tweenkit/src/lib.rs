//! Tweenkit
//!
//! Tweens, sequences and a per-frame scheduler for animating numeric
//! properties of arbitrary objects.
//!
//! # Features
//!
//! - **Tweens**: animate one bound property toward a target, from a value, or
//!   between two values, with delays, repeats, yoyo and easing
//! - **Sequences**: composite timelines that finish when all children finish
//! - **Groups**: several properties of one target sharing one configuration
//! - **TweenHandler**: ticks root timelines every frame, supports blocking
//!   roots, pausing and cancellation by target
//! - **TweenPool**: reuse of retired tweens per concrete tween type
//!
//! The engine is single-threaded: drive `TweenHandler::update` from one frame
//! loop and serialize any other access to the handler and pool.

pub mod easing;
pub mod error;
pub mod factory;
pub mod handler;
pub mod options;
pub mod pool;
pub mod sequence;
pub mod target;
pub mod timeline;
pub mod tween;

pub use easing::{Easing, EasingFunction};
pub use error::{Result, TweenError};
pub use factory::{
    arithmetic, shake, shake_tween, shake_tween_with_increasing_intensity,
    shake_with_increasing_intensity, tween, Numeric, TweenBuilder, TweenGroupBuilder,
};
pub use handler::{TimelineId, TweenHandler, TweenHandlerConfig, TIME_MODIFIER_TOLERANCE};
pub use options::{
    EventParam, EventSlot, TimelineEventHandler, TimelineOptions, TimelineSettings,
    INFINITE_REPEAT,
};
pub use pool::TweenPool;
pub use sequence::{IntoSequence, Sequence, SequenceTargets};
pub use target::{TargetHandle, TracksTarget};
pub use timeline::{
    Completion, EmptyTimeline, Timeline, TimelineExt, TimelineState, COMPLETION_POLL_INTERVAL,
};
pub use tween::{Binding, ProgressFunction, Tween, TweenDirection};
