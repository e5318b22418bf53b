//! Easing functions for tweens
//!
//! A tween only sees an [`EasingFunction`]: any `Fn(f64) -> f64` that remaps
//! linear progress. [`Easing`] bundles the common curves so they can be named in
//! settings files and turned into an easing function with [`Easing::into_fn`].

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::Arc;

/// Time-space remapping applied to progress before value interpolation.
///
/// Output is not clamped: overshooting curves pass through untouched.
pub type EasingFunction = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Named easing curves
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInBack,
    EaseOutBack,
    EaseOutElastic,
    EaseOutBounce,
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Apply the easing curve to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        match *self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::EaseInBack => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                C3 * t * t * t - C1 * t * t
            }
            Easing::EaseOutBack => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Easing::EaseOutElastic => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    const C4: f64 = (2.0 * PI) / 3.0;
                    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
                }
            }
            Easing::EaseOutBounce => bounce_out(t),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
        }
    }

    /// Wrap this curve as a pluggable easing function
    pub fn into_fn(self) -> EasingFunction {
        Arc::new(move |t| self.apply(t))
    }
}

fn bounce_out(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

const BEZIER_EPSILON: f64 = 1e-7;

/// One axis of a bezier from (0, 0) to (1, 1) with control coordinates `p1`, `p2`,
/// stored as the coefficients of `a*s^3 + b*s^2 + c*s`
#[derive(Clone, Copy)]
struct BezierAxis {
    a: f64,
    b: f64,
    c: f64,
}

impl BezierAxis {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        Self {
            a: 1.0 - c - b,
            b,
            c,
        }
    }

    #[inline]
    fn at(self, s: f64) -> f64 {
        ((self.a * s + self.b) * s + self.c) * s
    }

    #[inline]
    fn slope(self, s: f64) -> f64 {
        (3.0 * self.a * s + 2.0 * self.b) * s + self.c
    }

    /// Curve parameter whose value on this axis is `target`
    fn solve(self, target: f64) -> f64 {
        let mut s = target;
        for _ in 0..8 {
            let error = self.at(s) - target;
            if error.abs() < BEZIER_EPSILON {
                return s;
            }
            let slope = self.slope(s);
            if slope.abs() < BEZIER_EPSILON {
                break;
            }
            s -= error / slope;
        }

        // Newton stalled on a flat stretch: bisect instead
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        s = target;
        while hi - lo > BEZIER_EPSILON {
            let value = self.at(s);
            if (value - target).abs() < BEZIER_EPSILON {
                break;
            }
            if value < target {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        s
    }
}

/// CSS `cubic-bezier(x1, y1, x2, y2)`: find the curve point at `x = t`, return its `y`
fn cubic_bezier(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let s = BezierAxis::new(x1, x2).solve(t);
    BezierAxis::new(y1, y2).at(s)
}
