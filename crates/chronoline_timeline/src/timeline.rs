// SPDX-License-Identifier: MIT OR Apache-2.0
//! Segmented timelines.
//!
//! A timeline is an ordered run of segments covering `[0, inf)`. Only start
//! times are stored, so neighbouring segments always meet exactly: segment
//! `i` ends where segment `i + 1` starts and the last one never ends.
//!
//! Edits validate every argument before touching the segment list, so a
//! rejected call leaves the timeline unchanged.

use crate::ease::{EaseDirection, EaseKind};
use crate::error::{check_time, Result, TimelineError};
use crate::segment::{CurveSegment, Segment};
use crate::settings::TimelineSettings;

/// Timeline of interpolated values
pub type CurveTimeline = SegmentedTimeline<CurveSegment>;

/// Ordered, contiguous segments starting at time 0 and ending in a tail
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedTimeline<S> {
    segments: Vec<S>,
    settings: TimelineSettings,
}

impl<S: Segment> SegmentedTimeline<S> {
    /// Create a timeline holding `initial_value` forever
    pub fn new(initial_value: f64) -> Self {
        Self::with_settings(initial_value, TimelineSettings::default())
    }

    /// Create a timeline with explicit settings
    pub fn with_settings(initial_value: f64, settings: TimelineSettings) -> Self {
        Self {
            segments: vec![S::tail(0.0, initial_value)],
            settings,
        }
    }

    /// Settings in effect
    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    /// Number of segments (always at least one)
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// All segments in time order
    pub fn segments(&self) -> &[S] {
        &self.segments
    }

    /// Segment at `index`
    pub fn segment(&self, index: usize) -> Result<&S> {
        self.segments.get(index).ok_or(TimelineError::IndexOutOfRange {
            index,
            len: self.segments.len(),
        })
    }

    /// Start time of segment `index`
    pub fn time_start(&self, index: usize) -> Result<f64> {
        self.segment(index).map(Segment::time_start)
    }

    /// End time of segment `index` (infinity for the last one)
    pub fn time_end(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        Ok(self.end_of(index))
    }

    /// Start value of segment `index`
    pub fn value_start(&self, index: usize) -> Result<f64> {
        self.segment(index).map(Segment::value_start)
    }

    /// End value of segment `index`
    pub fn value_end(&self, index: usize) -> Result<f64> {
        self.segment(index).map(Segment::value_end)
    }

    /// Index of the segment with `time_start <= time < time_end`
    pub fn find_index(&self, time: f64) -> Result<usize> {
        check_time(time)?;
        Ok(self.locate(time))
    }

    /// Value of the timeline at `time`
    pub fn value_at(&self, time: f64) -> Result<f64> {
        check_time(time)?;
        let index = self.locate(time);
        self.segments[index].value_at(time, self.end_of(index))
    }

    /// Split the segment owning `time` so a new segment starts exactly there.
    ///
    /// Returns the index of the new segment. `time` must fall strictly inside
    /// an existing segment.
    pub fn split(&mut self, time: f64) -> Result<usize> {
        check_time(time)?;
        let index = self.locate(time);
        let segment = &self.segments[index];
        let end = self.end_of(index);
        if time <= segment.time_start() || time >= end {
            return Err(TimelineError::DegenerateSplit(time));
        }

        let pieces = segment.split(time, end)?;
        self.segments.splice(index..=index, pieces);
        tracing::debug!(time, index, "split timeline segment");
        Ok(index + 1)
    }

    /// Split at every time in `times`, or at none of them if any split fails
    pub fn split_many(&mut self, times: &[f64]) -> Result<()> {
        let mut staged = self.clone();
        for &time in times {
            staged.split(time)?;
        }
        *self = staged;
        Ok(())
    }

    /// Collapse segments `from..=to` into one.
    ///
    /// The merged segment starts where `from` starts, takes its start value
    /// from `from` and its end value from `to`. A range reaching the last
    /// segment collapses into a tail holding the last segment's value.
    pub fn merge(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from > to {
            return Err(TimelineError::InvertedRange { from, to });
        }
        if from == to {
            return Ok(());
        }

        let open_ended = to == self.segments.len() - 1;
        let merged = S::merged(&self.segments[from], &self.segments[to], open_ended);
        self.segments.splice(from..=to, std::iter::once(merged));
        tracing::debug!(from, to, "merged timeline segments");
        Ok(())
    }

    /// Move the boundary between segments `index - 1` and `index` to `time`.
    ///
    /// Equivalent to merging the two segments and re-splitting them at `time`,
    /// with both pieces keeping their own endpoint values and shapes. `time`
    /// must stay strictly between the start of `index - 1` and the end of
    /// `index`. The first segment always starts at 0.
    pub fn set_time_start(&mut self, index: usize, time: f64) -> Result<()> {
        check_time(time)?;
        self.check_index(index)?;
        if index == 0 {
            return Err(TimelineError::FixedOrigin);
        }

        let previous_start = self.segments[index - 1].time_start();
        if !(time > previous_start && time < self.end_of(index)) {
            return Err(TimelineError::DegenerateSplit(time));
        }

        self.segments[index] = self.segments[index].retimed(time);
        tracing::debug!(index, time, "moved timeline boundary");
        Ok(())
    }

    /// Move the end of segment `index`, which is the start of `index + 1`
    pub fn set_time_end(&mut self, index: usize, time: f64) -> Result<()> {
        self.check_index(index)?;
        if index + 1 == self.segments.len() {
            return Err(TimelineError::TailHasNoEnd);
        }
        self.set_time_start(index + 1, time)
    }

    /// Replace the start value of segment `index`
    pub fn set_value_start(&mut self, index: usize, value: f64) -> Result<()> {
        self.check_index(index)?;
        self.segments[index].set_value_start(value);
        Ok(())
    }

    /// Replace the end value of segment `index`
    pub fn set_value_end(&mut self, index: usize, value: f64) -> Result<()> {
        self.check_index(index)?;
        self.segments[index].set_value_end(value);
        Ok(())
    }

    /// Reset to a single tail holding the current value at time 0
    pub fn clear(&mut self) {
        let value = self.segments[0].value_start();
        self.segments = vec![S::tail(0.0, value)];
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        if index < self.segments.len() {
            Ok(())
        } else {
            Err(TimelineError::IndexOutOfRange {
                index,
                len: self.segments.len(),
            })
        }
    }

    /// End of segment `index`, which must exist
    pub(crate) fn end_of(&self, index: usize) -> f64 {
        self.segments
            .get(index + 1)
            .map_or(f64::INFINITY, Segment::time_start)
    }

    /// Owning segment of a validated, non-negative `time`
    pub(crate) fn locate(&self, time: f64) -> usize {
        let last = self.segments.len() - 1;
        if self.segments.len() <= self.settings.linear_search_threshold {
            (0..last)
                .find(|&index| time < self.end_of(index))
                .unwrap_or(last)
        } else {
            self.segments
                .partition_point(|segment| segment.time_start() <= time)
                .saturating_sub(1)
        }
    }
}

impl SegmentedTimeline<CurveSegment> {
    /// Change the easing of segment `index`; the last segment is constant
    pub fn set_easing(
        &mut self,
        index: usize,
        kind: EaseKind,
        direction: EaseDirection,
    ) -> Result<()> {
        self.check_index(index)?;
        self.segments[index].set_easing(kind, direction)
    }
}
