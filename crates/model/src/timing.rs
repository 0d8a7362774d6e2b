//! Segment timing for chained cross-fades.
//!
//! Every image is a segment of `D` seconds. Adjacent segments overlap by
//! `T` seconds while the transition runs, so each new transition starts one
//! hold time (`D - T`) after the previous one:
//!
//! ```text
//! image 0 |-------- D --------|
//! image 1             |-- T --|-------- D --------|
//! image 2                                 |-- T --|---- ...
//!         0        offset(0)          offset(1)
//! ```

use serde::{Deserialize, Serialize};
use slidecut_common::error::{SlidecutError, SlidecutResult};

/// Segment and transition durations, in seconds.
///
/// Invariant: `segment_secs > transition_secs > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentTiming {
    segment_secs: f64,
    transition_secs: f64,
}

impl SegmentTiming {
    /// Create a timing, rejecting transitions that are not strictly shorter
    /// than the segment.
    pub fn new(segment_secs: f64, transition_secs: f64) -> SlidecutResult<Self> {
        if !segment_secs.is_finite() || !transition_secs.is_finite() {
            return Err(SlidecutError::invalid_timing("durations must be finite"));
        }
        if transition_secs <= 0.0 {
            return Err(SlidecutError::invalid_timing(format!(
                "transition must be positive, got {transition_secs}s"
            )));
        }
        if segment_secs <= transition_secs {
            return Err(SlidecutError::invalid_timing(format!(
                "segment ({segment_secs}s) must be longer than transition ({transition_secs}s)"
            )));
        }
        Ok(Self {
            segment_secs,
            transition_secs,
        })
    }

    /// Segment duration `D`.
    pub fn segment_secs(&self) -> f64 {
        self.segment_secs
    }

    /// Transition duration `T`.
    pub fn transition_secs(&self) -> f64 {
        self.transition_secs
    }

    /// Hold time `D - T`.
    pub fn hold_secs(&self) -> f64 {
        self.segment_secs - self.transition_secs
    }

    /// Start of the `index`-th transition on the output timeline.
    pub fn offset(&self, index: usize) -> f64 {
        self.hold_secs() * index as f64 + self.hold_secs()
    }

    /// Offsets of every transition between `image_count` images.
    pub fn offsets(&self, image_count: usize) -> Vec<f64> {
        (0..image_count.saturating_sub(1))
            .map(|i| self.offset(i))
            .collect()
    }

    /// Output duration for `image_count` images: `D + (D - T) * (N - 2)`.
    ///
    /// This is passed to the encoder as a hard bound because the looped
    /// still-image inputs have no natural end.
    pub fn total_duration(&self, image_count: usize) -> f64 {
        let pairs_after_first = image_count.saturating_sub(2) as f64;
        self.segment_secs + self.hold_secs() * pairs_after_first
    }
}

impl Default for SegmentTiming {
    fn default() -> Self {
        Self {
            segment_secs: 3.0,
            transition_secs: 1.0,
        }
    }
}
