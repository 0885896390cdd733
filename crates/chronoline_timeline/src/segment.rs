// SPDX-License-Identifier: MIT OR Apache-2.0
//! Segment definitions for timelines.
//!
//! A segment only stores its start time. Its end is the next segment's start
//! (or infinity for the last one), so every bound-checked call takes the end
//! from the owning timeline as `segment_end`.

use crate::ease::{ease, EaseDirection, EaseKind};
use crate::error::{Result, TimelineError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One piece of a piecewise function, as seen by a timeline
pub trait Segment: Clone + fmt::Debug {
    /// Open-ended constant segment starting at `time_start`
    fn tail(time_start: f64, value: f64) -> Self;

    /// Inclusive start time
    fn time_start(&self) -> f64;

    /// Value at the start of the segment
    fn value_start(&self) -> f64;

    /// Value at the end of the segment
    fn value_end(&self) -> f64;

    /// Replace the start value (the only value, for a tail)
    fn set_value_start(&mut self, value: f64);

    /// Replace the end value (the only value, for a tail)
    fn set_value_end(&mut self, value: f64);

    /// Whether this is the open-ended constant variant
    fn is_tail(&self) -> bool;

    /// Value at `time`, which must lie in `[time_start, segment_end]`
    fn value_at(&self, time: f64, segment_end: f64) -> Result<f64>;

    /// Two segments meeting at `time` that together reproduce this one
    fn split(&self, time: f64, segment_end: f64) -> Result<[Self; 2]>;

    /// Single segment spanning `first` through `last`.
    ///
    /// `open_ended` is set when `last` is the final segment of its timeline,
    /// in which case the result must be a tail.
    fn merged(first: &Self, last: &Self, open_ended: bool) -> Self;

    /// Same segment starting at a different time
    fn retimed(&self, time_start: f64) -> Self;
}

/// Reject an empty span or a time outside `[time_start, segment_end]`
fn check_span(time_start: f64, time: f64, segment_end: f64) -> Result<()> {
    if !(segment_end > time_start) {
        return Err(TimelineError::EmptySpan {
            start: time_start,
            end: segment_end,
        });
    }
    if !(time >= time_start && time <= segment_end) {
        return Err(TimelineError::TimeOutsideSegment {
            time,
            start: time_start,
            end: segment_end,
        });
    }
    Ok(())
}

/// Reject a time before an open-ended segment starts
fn check_open_span(time_start: f64, time: f64) -> Result<()> {
    if time >= time_start {
        Ok(())
    } else {
        Err(TimelineError::TimeOutsideSegment {
            time,
            start: time_start,
            end: f64::INFINITY,
        })
    }
}

/// Segment of a curve timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CurveSegment {
    /// Eases from `value_start` to `value_end` over its span
    Eased {
        /// Inclusive start time
        time_start: f64,
        /// Value at the start
        value_start: f64,
        /// Value at the end
        value_end: f64,
        /// Curve shape
        kind: EaseKind,
        /// Curve direction
        direction: EaseDirection,
    },
    /// Holds a constant value forever
    Tail {
        /// Inclusive start time
        time_start: f64,
        /// Constant value
        value: f64,
    },
}

impl CurveSegment {
    /// Create an eased segment
    pub fn eased(
        time_start: f64,
        value_start: f64,
        value_end: f64,
        kind: EaseKind,
        direction: EaseDirection,
    ) -> Self {
        Self::Eased {
            time_start,
            value_start,
            value_end,
            kind,
            direction,
        }
    }

    /// Easing of an eased segment
    pub fn easing(&self) -> Option<(EaseKind, EaseDirection)> {
        match *self {
            Self::Eased { kind, direction, .. } => Some((kind, direction)),
            Self::Tail { .. } => None,
        }
    }

    /// Change the easing of an eased segment
    pub fn set_easing(&mut self, new_kind: EaseKind, new_direction: EaseDirection) -> Result<()> {
        match self {
            Self::Eased { kind, direction, .. } => {
                *kind = new_kind;
                *direction = new_direction;
                Ok(())
            }
            Self::Tail { .. } => Err(TimelineError::TailHasNoEasing),
        }
    }
}

impl Segment for CurveSegment {
    fn tail(time_start: f64, value: f64) -> Self {
        Self::Tail { time_start, value }
    }

    fn time_start(&self) -> f64 {
        match *self {
            Self::Eased { time_start, .. } | Self::Tail { time_start, .. } => time_start,
        }
    }

    fn value_start(&self) -> f64 {
        match *self {
            Self::Eased { value_start, .. } => value_start,
            Self::Tail { value, .. } => value,
        }
    }

    fn value_end(&self) -> f64 {
        match *self {
            Self::Eased { value_end, .. } => value_end,
            Self::Tail { value, .. } => value,
        }
    }

    fn set_value_start(&mut self, new_value: f64) {
        match self {
            Self::Eased { value_start, .. } => *value_start = new_value,
            Self::Tail { value, .. } => *value = new_value,
        }
    }

    fn set_value_end(&mut self, new_value: f64) {
        match self {
            Self::Eased { value_end, .. } => *value_end = new_value,
            Self::Tail { value, .. } => *value = new_value,
        }
    }

    fn is_tail(&self) -> bool {
        matches!(self, Self::Tail { .. })
    }

    fn value_at(&self, time: f64, segment_end: f64) -> Result<f64> {
        match *self {
            Self::Eased {
                time_start,
                value_start,
                value_end,
                kind,
                direction,
            } => {
                check_span(time_start, time, segment_end)?;
                let progress = (time - time_start) / (segment_end - time_start);
                Ok(value_start + ease(kind, direction, progress) * (value_end - value_start))
            }
            Self::Tail { time_start, value } => {
                check_open_span(time_start, time)?;
                Ok(value)
            }
        }
    }

    fn split(&self, time: f64, segment_end: f64) -> Result<[Self; 2]> {
        match *self {
            Self::Eased {
                time_start,
                value_start,
                value_end,
                kind,
                direction,
            } => {
                let value = self.value_at(time, segment_end)?;
                Ok([
                    Self::eased(time_start, value_start, value, kind, direction),
                    Self::eased(time, value, value_end, kind, direction),
                ])
            }
            Self::Tail { time_start, value } => {
                check_open_span(time_start, time)?;
                Ok([
                    Self::eased(time_start, value, value, EaseKind::Linear, EaseDirection::In),
                    Self::Tail { time_start: time, value },
                ])
            }
        }
    }

    fn merged(first: &Self, last: &Self, open_ended: bool) -> Self {
        if open_ended {
            return Self::tail(first.time_start(), last.value_end());
        }

        let (kind, direction) = first
            .easing()
            .unwrap_or((EaseKind::Linear, EaseDirection::In));
        Self::eased(first.time_start(), first.value_start(), last.value_end(), kind, direction)
    }

    fn retimed(&self, new_start: f64) -> Self {
        let mut segment = *self;
        match &mut segment {
            Self::Eased { time_start, .. } | Self::Tail { time_start, .. } => {
                *time_start = new_start;
            }
        }
        segment
    }
}

/// Segment of a rate timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RateSegment {
    /// Rate changes linearly from `rate_start` to `rate_end`
    Linear {
        /// Inclusive start time
        time_start: f64,
        /// Rate at the start
        rate_start: f64,
        /// Rate at the end
        rate_end: f64,
    },
    /// Constant rate forever
    Tail {
        /// Inclusive start time
        time_start: f64,
        /// Constant rate
        rate: f64,
    },
}

impl RateSegment {
    /// Create a linearly varying segment
    pub fn linear(time_start: f64, rate_start: f64, rate_end: f64) -> Self {
        Self::Linear {
            time_start,
            rate_start,
            rate_end,
        }
    }

    /// Integral of the rate over `[from, to]`, both inside the segment span
    pub fn integral(&self, from: f64, to: f64, segment_end: f64) -> Result<f64> {
        let time_start = self.time_start();
        check_span(time_start, from, segment_end)?;
        check_span(time_start, to, segment_end)?;
        if to < from {
            return Err(TimelineError::TimeOutsideSegment {
                time: to,
                start: from,
                end: segment_end,
            });
        }

        match *self {
            Self::Linear { .. } => {
                let rate_from = self.value_at(from, segment_end)?;
                let rate_to = self.value_at(to, segment_end)?;
                Ok((rate_from + rate_to) * (to - from) / 2.0)
            }
            Self::Tail { rate, .. } => Ok(rate * (to - from)),
        }
    }

    /// Integral from the segment start to `time`
    pub fn integral_to(&self, time: f64, segment_end: f64) -> Result<f64> {
        self.integral(self.time_start(), time, segment_end)
    }

    /// Integral over the whole segment
    pub fn total_integral(&self, segment_end: f64) -> Result<f64> {
        self.integral(self.time_start(), segment_end, segment_end)
    }

    /// Split the segment at `time`
    pub fn divide(&self, time: f64, segment_end: f64) -> Result<[Self; 2]> {
        self.split(time, segment_end)
    }
}

impl Segment for RateSegment {
    fn tail(time_start: f64, rate: f64) -> Self {
        Self::Tail { time_start, rate }
    }

    fn time_start(&self) -> f64 {
        match *self {
            Self::Linear { time_start, .. } | Self::Tail { time_start, .. } => time_start,
        }
    }

    fn value_start(&self) -> f64 {
        match *self {
            Self::Linear { rate_start, .. } => rate_start,
            Self::Tail { rate, .. } => rate,
        }
    }

    fn value_end(&self) -> f64 {
        match *self {
            Self::Linear { rate_end, .. } => rate_end,
            Self::Tail { rate, .. } => rate,
        }
    }

    fn set_value_start(&mut self, value: f64) {
        match self {
            Self::Linear { rate_start, .. } => *rate_start = value,
            Self::Tail { rate, .. } => *rate = value,
        }
    }

    fn set_value_end(&mut self, value: f64) {
        match self {
            Self::Linear { rate_end, .. } => *rate_end = value,
            Self::Tail { rate, .. } => *rate = value,
        }
    }

    fn is_tail(&self) -> bool {
        matches!(self, Self::Tail { .. })
    }

    fn value_at(&self, time: f64, segment_end: f64) -> Result<f64> {
        match *self {
            Self::Linear {
                time_start,
                rate_start,
                rate_end,
            } => {
                check_span(time_start, time, segment_end)?;
                let progress = (time - time_start) / (segment_end - time_start);
                Ok(rate_start + progress * (rate_end - rate_start))
            }
            Self::Tail { time_start, rate } => {
                check_open_span(time_start, time)?;
                Ok(rate)
            }
        }
    }

    fn split(&self, time: f64, segment_end: f64) -> Result<[Self; 2]> {
        match *self {
            Self::Linear {
                time_start,
                rate_start,
                rate_end,
            } => {
                let rate = self.value_at(time, segment_end)?;
                Ok([
                    Self::linear(time_start, rate_start, rate),
                    Self::linear(time, rate, rate_end),
                ])
            }
            Self::Tail { time_start, rate } => {
                check_open_span(time_start, time)?;
                Ok([
                    Self::linear(time_start, rate, rate),
                    Self::Tail { time_start: time, rate },
                ])
            }
        }
    }

    fn merged(first: &Self, last: &Self, open_ended: bool) -> Self {
        if open_ended {
            Self::tail(first.time_start(), last.value_end())
        } else {
            Self::linear(first.time_start(), first.value_start(), last.value_end())
        }
    }

    fn retimed(&self, new_start: f64) -> Self {
        let mut segment = *self;
        match &mut segment {
            Self::Linear { time_start, .. } | Self::Tail { time_start, .. } => {
                *time_start = new_start;
            }
        }
        segment
    }
}
