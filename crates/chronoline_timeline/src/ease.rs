// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves.
//!
//! `ease(kind, direction, t)` maps progress `t` in `[0, 1]` onto a shaped
//! progress value. Every kind except `None` maps 0 to 0 and 1 to 1; `Back`
//! and `Elastic` overshoot in between.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const BACK_C1: f64 = 1.70158;
const BACK_C2: f64 = BACK_C1 * 1.525;
const BACK_C3: f64 = BACK_C1 + 1.0;
const ELASTIC_C4: f64 = 2.0 * PI / 3.0;
const ELASTIC_C5: f64 = 2.0 * PI / 4.5;
const BOUNCE_N1: f64 = 7.5625;
const BOUNCE_D1: f64 = 2.75;

/// Shape of an easing curve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EaseKind {
    /// Holds the start value (always 0)
    None,
    /// Straight line
    #[default]
    Linear,
    /// Quarter sine wave
    Sine,
    /// Power of two
    Quad,
    /// Power of three
    Cubic,
    /// Power of four
    Quart,
    /// Power of five
    Quint,
    /// Exponential
    Expo,
    /// Circular arc
    Circ,
    /// Overshoots, then settles
    Back,
    /// Damped spring
    Elastic,
    /// Bouncing ball
    Bounce,
}

impl EaseKind {
    /// All easing kinds, in declaration order
    pub fn all() -> &'static [EaseKind] {
        &[
            EaseKind::None,
            EaseKind::Linear,
            EaseKind::Sine,
            EaseKind::Quad,
            EaseKind::Cubic,
            EaseKind::Quart,
            EaseKind::Quint,
            EaseKind::Expo,
            EaseKind::Circ,
            EaseKind::Back,
            EaseKind::Elastic,
            EaseKind::Bounce,
        ]
    }
}

/// Which end of the curve the shaping applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EaseDirection {
    /// Slow start
    #[default]
    In,
    /// Slow finish
    Out,
    /// Slow start and finish
    InOut,
}

/// Evaluate an easing curve at progress `t`
pub fn ease(kind: EaseKind, direction: EaseDirection, t: f64) -> f64 {
    use EaseDirection::{In, InOut, Out};

    match (kind, direction) {
        (EaseKind::None, _) => 0.0,
        (EaseKind::Linear, _) => t,

        (EaseKind::Sine, In) => 1.0 - (t * PI / 2.0).cos(),
        (EaseKind::Sine, Out) => (t * PI / 2.0).sin(),
        (EaseKind::Sine, InOut) => -((PI * t).cos() - 1.0) / 2.0,

        (EaseKind::Quad, _) => power(direction, t, 2),
        (EaseKind::Cubic, _) => power(direction, t, 3),
        (EaseKind::Quart, _) => power(direction, t, 4),
        (EaseKind::Quint, _) => power(direction, t, 5),

        (EaseKind::Expo, In) => {
            if t == 0.0 {
                0.0
            } else {
                2f64.powf(10.0 * t - 10.0)
            }
        }
        (EaseKind::Expo, Out) => {
            if t == 1.0 {
                1.0
            } else {
                1.0 - 2f64.powf(-10.0 * t)
            }
        }
        (EaseKind::Expo, InOut) => {
            if t == 0.0 || t == 1.0 {
                t
            } else if t < 0.5 {
                2f64.powf(20.0 * t - 10.0) / 2.0
            } else {
                (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
            }
        }

        (EaseKind::Circ, In) => 1.0 - (1.0 - t * t).sqrt(),
        (EaseKind::Circ, Out) => (1.0 - (t - 1.0).powi(2)).sqrt(),
        (EaseKind::Circ, InOut) => {
            if t < 0.5 {
                (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
            } else {
                ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
            }
        }

        (EaseKind::Back, In) => BACK_C3 * t * t * t - BACK_C1 * t * t,
        (EaseKind::Back, Out) => {
            1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2)
        }
        (EaseKind::Back, InOut) => {
            if t < 0.5 {
                ((2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
            } else {
                ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2) + 2.0)
                    / 2.0
            }
        }

        (EaseKind::Elastic, _) if t == 0.0 || t == 1.0 => t,
        (EaseKind::Elastic, In) => {
            -2f64.powf(10.0 * t - 10.0) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
        }
        (EaseKind::Elastic, Out) => {
            2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
        }
        (EaseKind::Elastic, InOut) => {
            if t < 0.5 {
                -(2f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0
            } else {
                2f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin() / 2.0 + 1.0
            }
        }

        (EaseKind::Bounce, In) => 1.0 - bounce_out(1.0 - t),
        (EaseKind::Bounce, Out) => bounce_out(t),
        (EaseKind::Bounce, InOut) => {
            if t < 0.5 {
                (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
            } else {
                (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
            }
        }
    }
}

/// Polynomial ease of the given degree
fn power(direction: EaseDirection, t: f64, degree: i32) -> f64 {
    match direction {
        EaseDirection::In => t.powi(degree),
        EaseDirection::Out => 1.0 - (1.0 - t).powi(degree),
        EaseDirection::InOut => {
            if t < 0.5 {
                2f64.powi(degree - 1) * t.powi(degree)
            } else {
                1.0 - (-2.0 * t + 2.0).powi(degree) / 2.0
            }
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    if t < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * t * t
    } else if t < 2.0 / BOUNCE_D1 {
        let t = t - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.75
    } else if t < 2.5 / BOUNCE_D1 {
        let t = t - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTIONS: [EaseDirection; 3] =
        [EaseDirection::In, EaseDirection::Out, EaseDirection::InOut];

    #[test]
    fn test_endpoints_are_fixed() {
        for &kind in EaseKind::all().iter().filter(|k| **k != EaseKind::None) {
            for direction in DIRECTIONS {
                assert!(
                    ease(kind, direction, 0.0).abs() < 1e-9,
                    "{kind:?} {direction:?} at 0"
                );
                assert!(
                    (ease(kind, direction, 1.0) - 1.0).abs() < 1e-9,
                    "{kind:?} {direction:?} at 1"
                );
            }
        }
    }

    #[test]
    fn test_none_and_linear() {
        for direction in DIRECTIONS {
            assert_eq!(ease(EaseKind::None, direction, 0.7), 0.0);
            assert_eq!(ease(EaseKind::Linear, direction, 0.7), 0.7);
        }
    }

    #[test]
    fn test_known_midpoints() {
        assert!((ease(EaseKind::Quad, EaseDirection::In, 0.5) - 0.25).abs() < 1e-12);
        assert!((ease(EaseKind::Quad, EaseDirection::Out, 0.5) - 0.75).abs() < 1e-12);
        assert!((ease(EaseKind::Cubic, EaseDirection::InOut, 0.5) - 0.5).abs() < 1e-12);
        assert!((ease(EaseKind::Sine, EaseDirection::InOut, 0.5) - 0.5).abs() < 1e-12);
        let quint = ease(EaseKind::Quint, EaseDirection::InOut, 0.25);
        assert!((quint - 16.0 * 0.25f64.powi(5)).abs() < 1e-12);
        // Back dips below zero before heading to 1
        assert!(ease(EaseKind::Back, EaseDirection::In, 0.2) < 0.0);
    }

    #[test]
    fn test_in_out_symmetry() {
        for &kind in EaseKind::all().iter().filter(|k| **k != EaseKind::None) {
            for t in [0.1, 0.3, 0.45] {
                let low = ease(kind, EaseDirection::InOut, t);
                let high = ease(kind, EaseDirection::InOut, 1.0 - t);
                assert!((low + high - 1.0).abs() < 1e-9, "{kind:?} at {t}");
            }
        }
    }
}
