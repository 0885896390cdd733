// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tuning knobs shared by every timeline.

use serde::{Deserialize, Serialize};

/// Segment counts at or below this use a linear scan in `find_index`
pub const DEFAULT_LINEAR_SEARCH_THRESHOLD: usize = 12;

/// Timeline behaviour settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Largest segment count still searched linearly
    pub linear_search_threshold: usize,
    /// Recompute the displacement cache on every edit of a rate timeline.
    /// When off, edits only mark the cache dirty until it is refreshed.
    pub auto_update_displacement_cache: bool,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            linear_search_threshold: DEFAULT_LINEAR_SEARCH_THRESHOLD,
            auto_update_displacement_cache: true,
        }
    }
}

impl TimelineSettings {
    /// Settings that defer displacement cache refreshes to the caller
    pub fn deferred_cache() -> Self {
        Self {
            auto_update_displacement_cache: false,
            ..Self::default()
        }
    }
}
