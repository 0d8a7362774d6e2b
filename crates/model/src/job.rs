//! Render job inputs and lifecycle.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slidecut_common::error::{SlidecutError, SlidecutResult};

use crate::timing::SegmentTiming;
use crate::transition::TransitionPlan;

/// Ordered local image paths, first image shown first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    paths: Vec<PathBuf>,
}

impl ImageSet {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Fail with `WrongImageCount` unless exactly `expected` images are present.
    pub fn validate(&self, expected: usize) -> SlidecutResult<()> {
        if self.paths.len() != expected {
            return Err(SlidecutError::WrongImageCount {
                expected,
                actual: self.paths.len(),
            });
        }
        Ok(())
    }
}

/// Output frame size and the canvas color used for letterboxing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
    pub background: String,
}

impl FrameGeometry {
    pub fn new(width: u32, height: u32, background: impl Into<String>) -> Self {
        Self {
            width,
            height,
            background: background.into(),
        }
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self::new(1080, 1920, "black")
    }
}

/// Everything needed to render one video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderJob {
    pub images: ImageSet,
    pub plan: TransitionPlan,
    pub timing: SegmentTiming,
    pub output_path: PathBuf,
}

impl RenderJob {
    pub fn new(
        images: ImageSet,
        plan: TransitionPlan,
        timing: SegmentTiming,
        output_path: impl AsRef<Path>,
    ) -> Self {
        Self {
            images,
            plan,
            timing,
            output_path: output_path.as_ref().to_path_buf(),
        }
    }
}

/// Lifecycle of a single render job.
///
/// `Created -> Validated -> Encoding -> {Succeeded | Failed}`; validation may
/// also fail directly, without an encoder ever being started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Created,
    Validated,
    Encoding,
    Succeeded,
    Failed,
}

impl JobState {
    /// Whether the job has finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }

    /// Whether moving from `self` to `next` is a legal step.
    pub fn can_transition_to(self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::Created, JobState::Validated)
                | (JobState::Created, JobState::Failed)
                | (JobState::Validated, JobState::Encoding)
                | (JobState::Encoding, JobState::Succeeded)
                | (JobState::Encoding, JobState::Failed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Created => "created",
            JobState::Validated => "validated",
            JobState::Encoding => "encoding",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        }
    }
}
