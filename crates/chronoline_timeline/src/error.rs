// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised by timeline queries and edits.

/// Result alias for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Caller-contract violation reported by a timeline, segment or tempo map.
///
/// Every operation validates before it mutates, so receiving one of these
/// means the timeline is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    /// Time is negative or NaN
    #[error("Time must be a non-negative number, got {0}")]
    NegativeTime(f64),

    /// Segment index past the end
    #[error("Segment index {index} out of range for {len} segments")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Segment count
        len: usize,
    },

    /// Range bounds given in the wrong order
    #[error("Range start {from} is after range end {to}")]
    InvertedRange {
        /// Range start
        from: usize,
        /// Range end
        to: usize,
    },

    /// Time outside the span of the segment asked to handle it
    #[error("Time {time} lies outside segment span [{start}, {end}]")]
    TimeOutsideSegment {
        /// Offending time
        time: f64,
        /// Segment start
        start: f64,
        /// Segment end
        end: f64,
    },

    /// Segment end not after its start
    #[error("Segment end {end} must be greater than its start {start}")]
    EmptySpan {
        /// Segment start
        start: f64,
        /// Segment end
        end: f64,
    },

    /// Split or boundary move would create a zero-length segment
    #[error("Time {0} is not strictly inside a segment")]
    DegenerateSplit(f64),

    /// The first segment always starts at zero
    #[error("The first segment's start time is fixed at 0")]
    FixedOrigin,

    /// The last segment extends to infinity
    #[error("The last segment has no end time to set")]
    TailHasNoEnd,

    /// Open-ended segments hold a constant value
    #[error("The last segment is constant and cannot be eased")]
    TailHasNoEasing,

    /// Tempo lookups need a positive BPM
    #[error("Tempo must be positive, got {0} BPM")]
    NonPositiveTempo(f64),

    /// Displacement requested past a cache suffix that has not been refreshed
    #[error("Displacement cache is stale from segment {from}; refresh it first")]
    StaleDisplacementCache {
        /// First stale cache slot
        from: usize,
    },
}

/// Reject negative and NaN times at a public boundary
pub(crate) fn check_time(time: f64) -> Result<()> {
    if time >= 0.0 {
        Ok(())
    } else {
        Err(TimelineError::NegativeTime(time))
    }
}
