// SPDX-License-Identifier: MIT OR Apache-2.0
//! Piecewise timelines for Chronoline.
//!
//! This crate provides time-indexed functions for playback:
//! - Easing curves
//! - Curve timelines (interpolated values)
//! - Rate timelines (rates with accumulated displacement)
//! - Tempo map (BPM curve and beat conversions)
//!
//! ## Architecture
//!
//! Timelines are built on:
//! - Segment variants as enums behind the `Segment` trait
//! - A generic segment container covering `[0, inf)`
//! - A prefix-integral cache for rate timelines

pub mod ease;
pub mod error;
pub mod rate_timeline;
pub mod segment;
pub mod settings;
pub mod tempo;
pub mod timeline;

pub use ease::{ease, EaseDirection, EaseKind};
pub use error::{Result, TimelineError};
pub use rate_timeline::RateTimeline;
pub use segment::{CurveSegment, RateSegment, Segment};
pub use settings::{TimelineSettings, DEFAULT_LINEAR_SEARCH_THRESHOLD};
pub use tempo::TempoMap;
pub use timeline::{CurveTimeline, SegmentedTimeline};
