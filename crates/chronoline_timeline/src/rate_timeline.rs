// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rate timelines with a cumulative displacement cache.
//!
//! Segments describe a rate of change. The cache holds, for every segment,
//! the integral of all segments before it, so the displacement at any time is
//! one cache read plus an integral inside a single segment.

use crate::error::{check_time, Result, TimelineError};
use crate::segment::{RateSegment, Segment};
use crate::settings::TimelineSettings;
use crate::timeline::SegmentedTimeline;

/// Timeline of rates that can answer "how far by time T"
#[derive(Debug, Clone, PartialEq)]
pub struct RateTimeline {
    timeline: SegmentedTimeline<RateSegment>,
    /// `displacement_cache[i]` is the integral of segments `0..i`
    displacement_cache: Vec<f64>,
    /// First cache slot that no longer matches the segments
    dirty_from: Option<usize>,
}

impl RateTimeline {
    /// Create a timeline with a constant rate
    pub fn new(initial_rate: f64) -> Self {
        Self::with_settings(initial_rate, TimelineSettings::default())
    }

    /// Create a timeline with explicit settings
    pub fn with_settings(initial_rate: f64, settings: TimelineSettings) -> Self {
        Self {
            timeline: SegmentedTimeline::with_settings(initial_rate, settings),
            displacement_cache: vec![0.0],
            dirty_from: None,
        }
    }

    /// Underlying segment timeline
    pub fn timeline(&self) -> &SegmentedTimeline<RateSegment> {
        &self.timeline
    }

    /// Number of segments
    pub fn segment_count(&self) -> usize {
        self.timeline.segment_count()
    }

    /// All segments in time order
    pub fn segments(&self) -> &[RateSegment] {
        self.timeline.segments()
    }

    /// Cached prefix integrals, one per segment
    pub fn displacement_cache(&self) -> &[f64] {
        &self.displacement_cache
    }

    /// First stale cache slot, if edits are waiting for a refresh
    pub fn dirty_from(&self) -> Option<usize> {
        self.dirty_from
    }

    /// Index of the segment owning `time`
    pub fn find_index(&self, time: f64) -> Result<usize> {
        self.timeline.find_index(time)
    }

    /// Instantaneous rate at `time`
    pub fn value_at(&self, time: f64) -> Result<f64> {
        self.timeline.value_at(time)
    }

    /// Alias of [`RateTimeline::value_at`]
    pub fn rate_at(&self, time: f64) -> Result<f64> {
        self.value_at(time)
    }

    /// Integral of the rate from 0 to `time`
    pub fn displacement_at(&self, time: f64) -> Result<f64> {
        self.rate_and_displacement_at(time)
            .map(|(_, displacement)| displacement)
    }

    /// Instantaneous rate and integral from 0 at `time`
    pub fn rate_and_displacement_at(&self, time: f64) -> Result<(f64, f64)> {
        check_time(time)?;
        let index = self.timeline.locate(time);
        if let Some(from) = self.dirty_from {
            if index >= from {
                return Err(TimelineError::StaleDisplacementCache { from });
            }
        }

        let segment = &self.timeline.segments()[index];
        let end = self.timeline.end_of(index);
        let rate = segment.value_at(time, end)?;
        let displacement = self.displacement_cache[index] + segment.integral_to(time, end)?;
        Ok((rate, displacement))
    }

    /// Integral of the rate over `[from, to]`; negative when `to < from`
    pub fn displacement_between(&self, from: f64, to: f64) -> Result<f64> {
        Ok(self.displacement_at(to)? - self.displacement_at(from)?)
    }

    /// Split the segment owning `time`; see [`SegmentedTimeline::split`]
    pub fn split(&mut self, time: f64) -> Result<usize> {
        let index = self.timeline.split(time)?;
        self.displacement_cache.insert(index, 0.0);
        self.invalidate_from(index);
        Ok(index)
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

    /// Collapse segments `from..=to` into one linear (or tail) segment
    pub fn merge(&mut self, from: usize, to: usize) -> Result<()> {
        self.timeline.merge(from, to)?;
        if from < to {
            self.displacement_cache.drain(from + 1..=to);
            self.invalidate_from(from + 1);
        }
        Ok(())
    }

    /// Move the start of segment `index`; see [`SegmentedTimeline::set_time_start`]
    pub fn set_time_start(&mut self, index: usize, time: f64) -> Result<()> {
        self.timeline.set_time_start(index, time)?;
        self.invalidate_from(index);
        Ok(())
    }

    /// Move the end of segment `index`
    pub fn set_time_end(&mut self, index: usize, time: f64) -> Result<()> {
        self.timeline.set_time_end(index, time)?;
        self.invalidate_from(index + 1);
        Ok(())
    }

    /// Replace the start rate of segment `index`
    pub fn set_value_start(&mut self, index: usize, rate: f64) -> Result<()> {
        self.timeline.set_value_start(index, rate)?;
        self.invalidate_from(index + 1);
        Ok(())
    }

    /// Replace the end rate of segment `index`
    pub fn set_value_end(&mut self, index: usize, rate: f64) -> Result<()> {
        self.timeline.set_value_end(index, rate)?;
        self.invalidate_from(index + 1);
        Ok(())
    }

    /// Reset to a single tail holding the current first rate
    pub fn clear(&mut self) {
        self.timeline.clear();
        self.displacement_cache = vec![0.0];
        self.dirty_from = None;
    }

    /// Recompute every stale cache slot
    pub fn refresh_displacement_cache(&mut self) {
        let Some(from) = self.dirty_from.take() else {
            return;
        };

        let segments = self.timeline.segments();
        tracing::trace!(from, count = segments.len(), "refreshing displacement cache");

        self.displacement_cache[0] = 0.0;
        for index in from.max(1)..segments.len() {
            let previous = &segments[index - 1];
            let area = match previous.total_integral(segments[index].time_start()) {
                Ok(area) => area,
                Err(err) => {
                    tracing::error!(
                        %err,
                        index = index - 1,
                        "segment span broken while refreshing displacement cache"
                    );
                    0.0
                }
            };
            self.displacement_cache[index] = self.displacement_cache[index - 1] + area;
        }
    }

    fn invalidate_from(&mut self, index: usize) {
        let from = self.dirty_from.map_or(index, |dirty| dirty.min(index));
        self.dirty_from = Some(from);
        if self.timeline.settings().auto_update_displacement_cache {
            self.refresh_displacement_cache();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_cache(timeline: &RateTimeline) -> Vec<f64> {
        let segments = timeline.segments();
        let mut cache = vec![0.0];
        for index in 1..segments.len() {
            let area = segments[index - 1]
                .total_integral(segments[index].time_start())
                .unwrap();
            cache.push(cache[index - 1] + area);
        }
        cache
    }

    #[test]
    fn test_constant_rate_displacement() {
        let timeline = RateTimeline::new(3.0);
        assert_eq!(timeline.displacement_at(0.0), Ok(0.0));
        assert_eq!(timeline.displacement_at(5.0), Ok(15.0));
        assert_eq!(timeline.rate_and_displacement_at(2.0), Ok((3.0, 6.0)));
    }

    #[test]
    fn test_rate_change_after_split() {
        let mut timeline = RateTimeline::new(2.0);
        timeline.split(4.0).unwrap();
        timeline.set_value_start(1, 4.0).unwrap();

        assert_eq!(timeline.displacement_cache(), &[0.0, 8.0]);
        assert_eq!(timeline.displacement_at(4.0), Ok(8.0));
        assert_eq!(timeline.displacement_at(6.0), Ok(16.0));
        assert_eq!(timeline.value_at(6.0), Ok(4.0));
        assert_eq!(timeline.rate_at(6.0), timeline.value_at(6.0));
        assert_eq!(timeline.value_at(3.0), Ok(2.0));
        assert_eq!(timeline.displacement_between(4.0, 6.0), Ok(8.0));
    }

    #[test]
    fn test_linear_ramp_displacement() {
        let mut timeline = RateTimeline::new(0.0);
        timeline.split(10.0).unwrap();
        timeline.set_value_end(0, 10.0).unwrap();
        timeline.set_value_start(1, 10.0).unwrap();

        assert_eq!(timeline.rate_at(5.0), Ok(5.0));
        assert_eq!(timeline.displacement_at(5.0), Ok(12.5));
        assert_eq!(timeline.displacement_at(10.0), Ok(50.0));
        assert_eq!(timeline.displacement_at(12.0), Ok(70.0));
    }

    #[test]
    fn test_cache_follows_edits() {
        let mut timeline = RateTimeline::new(1.0);
        timeline.split_many(&[1.0, 3.0, 6.0, 10.0]).unwrap();
        for index in 0..timeline.segment_count() {
            timeline.set_value_start(index, index as f64 + 1.0).unwrap();
        }
        assert_eq!(timeline.displacement_cache(), brute_force_cache(&timeline).as_slice());

        timeline.merge(1, 2).unwrap();
        assert_eq!(timeline.segments()[1], RateSegment::linear(1.0, 2.0, 1.0));
        assert_eq!(timeline.displacement_cache(), brute_force_cache(&timeline).as_slice());

        timeline.set_time_start(2, 7.0).unwrap();
        timeline.set_value_end(0, 9.0).unwrap();
        assert_eq!(timeline.displacement_cache(), brute_force_cache(&timeline).as_slice());

        timeline.merge(0, timeline.segment_count() - 1).unwrap();
        assert_eq!(timeline.displacement_cache(), &[0.0]);
        assert_eq!(timeline.displacement_at(2.0), Ok(2.0 * timeline.rate_at(0.0).unwrap()));
    }

    #[test]
    fn test_deferred_cache_refresh() {
        let mut timeline = RateTimeline::with_settings(2.0, TimelineSettings::deferred_cache());
        timeline.split(4.0).unwrap();
        timeline.split(8.0).unwrap();
        timeline.set_value_start(2, 5.0).unwrap();

        assert_eq!(timeline.dirty_from(), Some(1));
        assert_eq!(timeline.displacement_at(3.0), Ok(6.0));
        assert_eq!(
            timeline.displacement_at(9.0),
            Err(TimelineError::StaleDisplacementCache { from: 1 })
        );

        timeline.refresh_displacement_cache();
        assert_eq!(timeline.dirty_from(), None);
        assert_eq!(timeline.displacement_cache(), &[0.0, 8.0, 16.0]);
        assert_eq!(timeline.displacement_at(9.0), Ok(21.0));
    }

    #[test]
    fn test_failed_edit_keeps_cache() {
        let mut timeline = RateTimeline::new(1.0);
        timeline.split(2.0).unwrap();
        let before = timeline.clone();

        assert!(timeline.split(2.0).is_err());
        assert!(timeline.merge(1, 0).is_err());
        assert!(timeline.set_value_start(5, 1.0).is_err());
        assert!(timeline.split_many(&[3.0, -1.0]).is_err());
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_split_at_infinity_keeps_cache() {
        let mut timeline = RateTimeline::new(2.0);
        assert_eq!(
            timeline.split(f64::INFINITY),
            Err(TimelineError::DegenerateSplit(f64::INFINITY))
        );
        assert_eq!(timeline.segment_count(), 1);
        assert_eq!(timeline.displacement_cache(), &[0.0]);
        assert_eq!(timeline.displacement_at(5.0), Ok(10.0));

        timeline.split(4.0).unwrap();
        let before = timeline.clone();
        assert!(timeline.split(f64::INFINITY).is_err());
        assert!(timeline.split_many(&[6.0, f64::INFINITY]).is_err());
        assert_eq!(timeline, before);
        assert_eq!(timeline.displacement_cache(), &[0.0, 8.0]);
    }

    #[test]
    fn test_clear_resets_cache() {
        let mut timeline = RateTimeline::new(1.5);
        timeline.split_many(&[1.0, 2.0]).unwrap();
        timeline.clear();

        assert_eq!(timeline.segment_count(), 1);
        assert_eq!(timeline.displacement_cache(), &[0.0]);
        assert_eq!(timeline.displacement_at(2.0), Ok(3.0));
    }
}
