// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tempo map: BPM over time plus a playhead.
//!
//! Conversions between seconds and beats use the instantaneous beat length
//! at the reference time, not an integral over the tempo curve.

use crate::error::{check_time, Result, TimelineError};
use crate::timeline::CurveTimeline;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Tempo curve in BPM with a playhead position in seconds
#[derive(Debug, Clone, PartialEq)]
pub struct TempoMap {
    timeline: CurveTimeline,
    position: f64,
}

impl TempoMap {
    /// Constant tempo with the playhead at 0
    pub fn new(initial_bpm: f64) -> Result<Self> {
        Self::from_timeline(CurveTimeline::new(initial_bpm))
    }

    /// Wrap an existing BPM curve
    pub fn from_timeline(timeline: CurveTimeline) -> Result<Self> {
        let tempo = Self {
            timeline,
            position: 0.0,
        };
        tempo.beat_duration_at(0.0)?;
        Ok(tempo)
    }

    /// BPM curve
    pub fn timeline(&self) -> &CurveTimeline {
        &self.timeline
    }

    /// BPM curve, for editing
    pub fn timeline_mut(&mut self) -> &mut CurveTimeline {
        &mut self.timeline
    }

    /// Tempo at `seconds`
    pub fn bpm_at(&self, seconds: f64) -> Result<f64> {
        self.timeline.value_at(seconds)
    }

    /// Length of one beat in seconds at `seconds`
    pub fn beat_duration_at(&self, seconds: f64) -> Result<f64> {
        let bpm = self.bpm_at(seconds)?;
        if !(bpm > 0.0) {
            return Err(TimelineError::NonPositiveTempo(bpm));
        }
        Ok(SECONDS_PER_MINUTE / bpm)
    }

    /// Beat count matching `seconds` at the tempo in effect there
    pub fn seconds_to_beats(&self, seconds: f64) -> Result<f64> {
        Ok(seconds / self.beat_duration_at(seconds)?)
    }

    /// Seconds matching `beats` at the tempo in effect at `reference_seconds`
    pub fn beats_to_seconds(&self, beats: f64, reference_seconds: f64) -> Result<f64> {
        Ok(beats * self.beat_duration_at(reference_seconds)?)
    }

    /// Snap `beats` to a grid.
    ///
    /// A positive `subdivision` snaps to the nearest `1 / subdivision` beat, a
    /// negative one to the nearest multiple of `|subdivision|` beats, and zero
    /// leaves the value alone. Halves round away from zero.
    pub fn round_beats(beats: f64, subdivision: i32) -> f64 {
        match subdivision {
            0 => beats,
            d if d > 0 => {
                let d = f64::from(d);
                (beats * d).round() / d
            }
            d => {
                let step = f64::from(d).abs();
                (beats / step).round() * step
            }
        }
    }

    /// Snap `seconds` to a beat grid measured at the tempo in effect there
    pub fn round_seconds(&self, seconds: f64, subdivision: i32) -> Result<f64> {
        let beats = Self::round_beats(self.seconds_to_beats(seconds)?, subdivision);
        self.beats_to_seconds(beats, seconds)
    }

    /// Playhead position in seconds
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Move the playhead
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        check_time(seconds)?;
        self.position = seconds;
        Ok(())
    }

    /// Move the playhead forward by `delta` seconds and return the new position
    pub fn advance(&mut self, delta: f64) -> Result<f64> {
        let target = self.position + delta;
        self.seek(target)?;
        Ok(target)
    }

    /// Tempo at the playhead
    pub fn current_bpm(&self) -> Result<f64> {
        self.bpm_at(self.position)
    }

    /// Beat length at the playhead
    pub fn current_beat_duration(&self) -> Result<f64> {
        self.beat_duration_at(self.position)
    }

    /// Playhead position in beats
    pub fn beat_position(&self) -> Result<f64> {
        self.seconds_to_beats(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_tempo_conversions() {
        let tempo = TempoMap::new(120.0).unwrap();
        assert_eq!(tempo.beat_duration_at(3.0), Ok(0.5));
        assert_eq!(tempo.seconds_to_beats(3.0), Ok(6.0));
        assert_eq!(tempo.beats_to_seconds(6.0, 0.0), Ok(3.0));
    }

    #[test]
    fn test_conversion_uses_instantaneous_tempo() {
        let mut tempo = TempoMap::new(60.0).unwrap();
        tempo.timeline_mut().split(10.0).unwrap();
        tempo.timeline_mut().set_value_start(1, 120.0).unwrap();

        assert_eq!(tempo.seconds_to_beats(5.0), Ok(5.0));
        assert_eq!(tempo.seconds_to_beats(12.0), Ok(24.0));
        assert_eq!(tempo.beats_to_seconds(4.0, 12.0), Ok(2.0));
    }

    #[test]
    fn test_round_beats() {
        assert_eq!(TempoMap::round_beats(1.3, 0), 1.3);
        assert_eq!(TempoMap::round_beats(1.3, 4), 1.25);
        assert_eq!(TempoMap::round_beats(1.4, 4), 1.5);
        assert_eq!(TempoMap::round_beats(1.125, 4), 1.25);
        assert_eq!(TempoMap::round_beats(-1.125, 4), -1.25);
        assert_eq!(TempoMap::round_beats(5.0, -4), 4.0);
        assert_eq!(TempoMap::round_beats(6.0, -4), 8.0);
        assert_eq!(TempoMap::round_beats(-6.5, -4), -8.0);
    }

    #[test]
    fn test_round_seconds() {
        let tempo = TempoMap::new(120.0).unwrap();
        // 1.1s is 2.2 beats, nearest half beat is 2.0
        assert_eq!(tempo.round_seconds(1.1, 2), Ok(1.0));
        assert_eq!(tempo.round_seconds(1.1, 0), Ok(1.1));
    }

    #[test]
    fn test_non_positive_tempo_is_rejected() {
        assert_eq!(TempoMap::new(0.0), Err(TimelineError::NonPositiveTempo(0.0)));

        let mut tempo = TempoMap::new(100.0).unwrap();
        tempo.timeline_mut().split(2.0).unwrap();
        tempo.timeline_mut().set_value_start(1, -5.0).unwrap();
        assert_eq!(tempo.beat_duration_at(3.0), Err(TimelineError::NonPositiveTempo(-5.0)));
        assert_eq!(tempo.beat_duration_at(1.0), Ok(0.6));
    }

    #[test]
    fn test_playhead() {
        let mut tempo = TempoMap::new(120.0).unwrap();
        tempo.timeline_mut().split(4.0).unwrap();
        tempo.timeline_mut().set_value_start(1, 180.0).unwrap();

        assert_eq!(tempo.advance(2.0), Ok(2.0));
        assert_eq!(tempo.current_bpm(), Ok(120.0));
        assert_eq!(tempo.current_beat_duration(), Ok(0.5));
        assert_eq!(tempo.beat_position(), Ok(4.0));

        tempo.seek(5.0).unwrap();
        assert_eq!(tempo.current_bpm(), Ok(180.0));
        assert!(tempo.advance(-10.0).is_err());
        assert_eq!(tempo.position(), 5.0);
    }
}
