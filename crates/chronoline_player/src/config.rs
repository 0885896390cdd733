// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player settings and chart data.
//!
//! Settings are stored as RON:
//! - Timeline tuning shared by the tempo and scroll timelines
//! - Tempo changes (BPM keyframes)
//! - Scroll speed changes
//! - Note times
//! - Playback frame rate and duration

use crate::error::{PlayerError, Result};
use chronoline_timeline::{EaseDirection, EaseKind, TimelineSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file used when none is given on the command line
pub const SETTINGS_FILE_NAME: &str = "chronoline.ron";

fn step_ease() -> EaseKind {
    EaseKind::None
}

/// Tempo keyframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    /// Time in seconds at which `bpm` is reached
    pub time: f64,
    /// Tempo from `time` on
    pub bpm: f64,
    /// Shape of the approach from the previous tempo; `None` jumps at `time`
    #[serde(default = "step_ease")]
    pub ease: EaseKind,
    /// Direction of `ease`
    #[serde(default)]
    pub direction: EaseDirection,
}

/// Scroll speed keyframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedChange {
    /// Time in seconds at which `speed` is reached
    pub time: f64,
    /// Scroll units per second from `time` on
    pub speed: f64,
    /// Ramp linearly from the previous speed instead of jumping
    #[serde(default)]
    pub ramp: bool,
}

/// Note in the chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Hit time in seconds
    pub time: f64,
    /// Lane the note sits in
    #[serde(default)]
    pub lane: u32,
}

/// Complete player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// Settings format version
    pub version: u32,
    /// Timeline tuning
    #[serde(default)]
    pub timeline: TimelineSettings,
    /// Tempo at time 0
    pub initial_bpm: f64,
    /// Tempo keyframes after time 0
    #[serde(default)]
    pub tempo_changes: Vec<TempoChange>,
    /// Scroll speed at time 0
    pub initial_scroll_speed: f64,
    /// Scroll speed keyframes after time 0
    #[serde(default)]
    pub speed_changes: Vec<SpeedChange>,
    /// Chart notes, in any order
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Update steps per second
    pub frame_rate: f64,
    /// Playback length in seconds
    pub duration: f64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            timeline: TimelineSettings::default(),
            initial_bpm: 120.0,
            tempo_changes: vec![TempoChange {
                time: 8.0,
                bpm: 150.0,
                ease: EaseKind::Sine,
                direction: EaseDirection::InOut,
            }],
            initial_scroll_speed: 4.0,
            speed_changes: vec![SpeedChange {
                time: 6.0,
                speed: 8.0,
                ramp: true,
            }],
            notes: (1..=16u32)
                .map(|i| Note {
                    time: f64::from(i) * 0.5,
                    lane: i % 4,
                })
                .collect(),
            frame_rate: 60.0,
            duration: 10.0,
        }
    }
}

impl PlayerSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: PlayerSettings = ron::from_str(&content)?;

        // Version check
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(PlayerError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the values the playback loop relies on
    pub fn validate(&self) -> Result<()> {
        if !(self.frame_rate > 0.0) {
            return Err(PlayerError::InvalidSettings(format!(
                "frame rate must be positive, got {}",
                self.frame_rate
            )));
        }
        if !(self.duration >= 0.0) {
            return Err(PlayerError::InvalidSettings(format!(
                "duration must not be negative, got {}",
                self.duration
            )));
        }
        if let Some(note) = self.notes.iter().find(|note| !(note.time >= 0.0)) {
            return Err(PlayerError::InvalidSettings(format!(
                "note time must not be negative, got {}",
                note.time
            )));
        }
        Ok(())
    }
}
