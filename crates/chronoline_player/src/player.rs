// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixed-step playback over a tempo map, a scroll speed timeline and a note
//! queue.

use crate::config::{Note, PlayerSettings, SpeedChange, TempoChange};
use crate::error::Result;
use chronoline_collections::{Comparator, SortedList};
use chronoline_timeline::{CurveTimeline, RateTimeline, TempoMap, TimelineSettings};

fn by_time(a: &Note, b: &Note) -> std::cmp::Ordering {
    a.time.total_cmp(&b.time)
}

/// Build the BPM curve from keyframes, in time order
pub fn build_tempo_map(
    initial_bpm: f64,
    changes: &[TempoChange],
    settings: TimelineSettings,
) -> Result<TempoMap> {
    let mut changes = changes.to_vec();
    changes.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut timeline = CurveTimeline::with_settings(initial_bpm, settings);
    for change in &changes {
        let index = timeline.split(change.time)?;
        timeline.set_value_start(index, change.bpm)?;
        timeline.set_value_end(index - 1, change.bpm)?;
        timeline.set_easing(index - 1, change.ease, change.direction)?;
    }
    Ok(TempoMap::from_timeline(timeline)?)
}

/// Build the scroll speed timeline from keyframes, in time order
pub fn build_scroll_timeline(
    initial_speed: f64,
    changes: &[SpeedChange],
    settings: TimelineSettings,
) -> Result<RateTimeline> {
    let mut changes = changes.to_vec();
    changes.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut scroll = RateTimeline::with_settings(initial_speed, settings);
    for change in &changes {
        let index = scroll.split(change.time)?;
        scroll.set_value_start(index, change.speed)?;
        if change.ramp {
            scroll.set_value_end(index - 1, change.speed)?;
        }
    }
    scroll.refresh_displacement_cache();
    Ok(scroll)
}

/// State after one playback step
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Playhead in seconds
    pub time: f64,
    /// Tempo at the playhead
    pub bpm: f64,
    /// Playhead in beats
    pub beat: f64,
    /// Scroll speed at the playhead
    pub scroll_speed: f64,
    /// Scroll distance covered since time 0
    pub scroll_position: f64,
    /// Notes that reached the playhead during this step
    pub notes_passed: usize,
    /// Scroll distance left until the next pending note
    pub next_note_distance: Option<f64>,
}

/// Headless playback host
pub struct Player {
    tempo: TempoMap,
    scroll: RateTimeline,
    pending: SortedList<Note>,
    frame_duration: f64,
    duration: f64,
    notes_passed: usize,
}

impl Player {
    /// Build timelines and the note queue from settings
    pub fn new(settings: &PlayerSettings) -> Result<Self> {
        settings.validate()?;

        let tempo = build_tempo_map(
            settings.initial_bpm,
            &settings.tempo_changes,
            settings.timeline,
        )?;
        let scroll = build_scroll_timeline(
            settings.initial_scroll_speed,
            &settings.speed_changes,
            settings.timeline,
        )?;

        let mut pending = SortedList::new(by_time as Comparator<Note>);
        pending.extend(settings.notes.iter().copied());

        tracing::info!(
            notes = pending.len(),
            tempo_segments = tempo.timeline().segment_count(),
            speed_segments = scroll.segment_count(),
            "Player ready"
        );

        Ok(Self {
            tempo,
            scroll,
            pending,
            frame_duration: 1.0 / settings.frame_rate,
            duration: settings.duration,
            notes_passed: 0,
        })
    }

    /// Playhead in seconds
    pub fn position(&self) -> f64 {
        self.tempo.position()
    }

    /// Whether the playhead reached the configured duration
    pub fn is_finished(&self) -> bool {
        self.position() >= self.duration
    }

    /// Notes not yet reached
    pub fn pending_notes(&self) -> usize {
        self.pending.len()
    }

    /// Notes reached so far
    pub fn notes_passed(&self) -> usize {
        self.notes_passed
    }

    /// Advance one frame, clamped to the configured duration
    pub fn step(&mut self) -> Result<FrameReport> {
        let now = (self.position() + self.frame_duration).min(self.duration);
        self.tempo.seek(now)?;

        let mut passed = 0;
        while self.pending.first().is_some_and(|note| note.time <= now) {
            if let Some(note) = self.pending.pop_first() {
                tracing::debug!(time = note.time, lane = note.lane, "Note reached playhead");
                passed += 1;
            }
        }
        self.notes_passed += passed;

        let (scroll_speed, scroll_position) = self.scroll.rate_and_displacement_at(now)?;
        let next_note_distance = match self.pending.first() {
            Some(note) => Some(self.scroll.displacement_at(note.time)? - scroll_position),
            None => None,
        };

        Ok(FrameReport {
            time: now,
            bpm: self.tempo.current_bpm()?,
            beat: self.tempo.beat_position()?,
            scroll_speed,
            scroll_position,
            notes_passed: passed,
            next_note_distance,
        })
    }

    /// Step until the duration is reached; returns the number of frames
    pub fn run(&mut self) -> Result<usize> {
        let mut frames = 0;
        while !self.is_finished() {
            let previous = self.position();
            let report = self.step()?;
            frames += 1;

            if report.time.floor() > previous.floor() || self.is_finished() {
                tracing::info!(
                    time = report.time,
                    bpm = report.bpm,
                    beat = report.beat,
                    speed = report.scroll_speed,
                    scroll = report.scroll_position,
                    next_note_distance = ?report.next_note_distance,
                    "Playback"
                );
            } else {
                tracing::debug!(
                    time = report.time,
                    scroll = report.scroll_position,
                    notes = report.notes_passed,
                    next_note_distance = ?report.next_note_distance,
                    "Frame"
                );
            }
        }

        tracing::info!(
            frames,
            notes_passed = self.notes_passed(),
            notes_pending = self.pending_notes(),
            "Playback finished"
        );
        Ok(frames)
    }
}
