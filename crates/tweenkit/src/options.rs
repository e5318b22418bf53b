//! Timeline options and event handler slots

use crate::easing::{Easing, EasingFunction};
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Repeat count meaning "repeat forever"
pub const INFINITE_REPEAT: i32 = -1;

/// Opaque value handed to an event handler alongside the firing timeline
pub type EventParam = Arc<dyn Any + Send + Sync>;

/// Callback fired by a timeline during `update`
pub type TimelineEventHandler = Arc<dyn Fn(&dyn Timeline, &[EventParam]) + Send + Sync>;

/// One event slot: every attached handler plus the parameters passed to them
#[derive(Clone, Default)]
pub struct EventSlot {
    handlers: SmallVec<[TimelineEventHandler; 1]>,
    params: Vec<EventParam>,
}

impl EventSlot {
    /// Attach a handler; handlers fire in attachment order
    pub fn add(&mut self, handler: TimelineEventHandler) {
        self.handlers.push(handler);
    }

    /// Replace the parameter list passed to every handler in this slot
    pub fn set_params(&mut self, params: Vec<EventParam>) {
        self.params = params;
    }

    pub fn params(&self) -> &[EventParam] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn fire(&self, sender: &dyn Timeline) {
        for handler in &self.handlers {
            handler(sender, &self.params);
        }
    }
}

impl fmt::Debug for EventSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSlot")
            .field("handlers", &self.handlers.len())
            .field("params", &self.params.len())
            .finish()
    }
}

/// Playback configuration of a timeline
#[derive(Clone)]
pub struct TimelineOptions {
    /// Duration of one sweep in seconds
    pub duration: f64,
    /// Reverse direction after every repeat
    pub yoyo: bool,
    /// Remaining repeats: `-1` forever, `0` none
    pub repeat: i32,
    /// Pause in seconds before a repeat starts
    pub repeat_delay: f64,
    /// Pause in seconds before the return leg of a yoyo cycle
    pub yoyo_delay: f64,
    /// Scales the time passed into `update`
    pub speed_multiplier: f64,
    /// Interpolate from the live value every tick instead of the captured start
    pub always_on_current_value: bool,
    pub easing: Option<EasingFunction>,
    pub on_begin: EventSlot,
    pub on_update: EventSlot,
    pub on_complete: EventSlot,
    pub on_repeat: EventSlot,
}

impl TimelineOptions {
    pub fn new() -> Self {
        Self {
            duration: 0.0,
            yoyo: false,
            repeat: 0,
            repeat_delay: 0.0,
            yoyo_delay: 0.0,
            speed_multiplier: 1.0,
            always_on_current_value: false,
            easing: None,
            on_begin: EventSlot::default(),
            on_update: EventSlot::default(),
            on_complete: EventSlot::default(),
            on_repeat: EventSlot::default(),
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.repeat == INFINITE_REPEAT
    }

    /// Whether finishing a sweep should start another one
    pub fn should_repeat(&self) -> bool {
        self.repeat > 0 || self.is_infinite()
    }

    /// Apply the easing function, or pass progress through untouched
    pub fn ease(&self, progress: f64) -> f64 {
        match &self.easing {
            Some(easing) => easing(progress),
            None => progress,
        }
    }
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineOptions")
            .field("duration", &self.duration)
            .field("yoyo", &self.yoyo)
            .field("repeat", &self.repeat)
            .field("repeat_delay", &self.repeat_delay)
            .field("yoyo_delay", &self.yoyo_delay)
            .field("speed_multiplier", &self.speed_multiplier)
            .field("always_on_current_value", &self.always_on_current_value)
            .field("easing", &self.easing.is_some())
            .field("on_begin", &self.on_begin)
            .field("on_update", &self.on_update)
            .field("on_complete", &self.on_complete)
            .field("on_repeat", &self.on_repeat)
            .finish()
    }
}

/// Plain-data timeline configuration, loadable from settings files
///
/// ```toml
/// duration = 0.4
/// repeat = 2
/// yoyo = true
/// easing = "ease_out_quad"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    pub duration: f64,
    /// Initial delay in seconds
    pub delay: f64,
    pub yoyo: bool,
    pub repeat: i32,
    pub repeat_delay: f64,
    pub yoyo_delay: f64,
    pub speed_multiplier: f64,
    pub always_on_current_value: bool,
    pub easing: Option<Easing>,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            duration: 0.0,
            delay: 0.0,
            yoyo: false,
            repeat: 0,
            repeat_delay: 0.0,
            yoyo_delay: 0.0,
            speed_multiplier: 1.0,
            always_on_current_value: false,
            easing: None,
        }
    }
}
