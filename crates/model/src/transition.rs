//! Transition effects and ordered plans of them.
//!
//! Each [`Transition`] maps one-to-one onto an ffmpeg `xfade` transition
//! name. A [`TransitionPlan`] is the ordered list applied between adjacent
//! images, labelled with the template that produced it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slidecut_common::error::SlidecutError;

/// A cross-fade effect from the supported catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Fade,
    SlideLeft,
    SlideRight,
    CircleCrop,
    RectCrop,
    Distance,
    SlideUp,
    SlideDown,
    SmoothLeft,
}

impl Transition {
    /// Every supported effect, in catalog order.
    pub const CATALOG: [Transition; 9] = [
        Transition::Fade,
        Transition::SlideLeft,
        Transition::SlideRight,
        Transition::CircleCrop,
        Transition::RectCrop,
        Transition::Distance,
        Transition::SlideUp,
        Transition::SlideDown,
        Transition::SmoothLeft,
    ];

    /// The ffmpeg `xfade` transition name.
    pub fn as_str(self) -> &'static str {
        match self {
            Transition::Fade => "fade",
            Transition::SlideLeft => "slideleft",
            Transition::SlideRight => "slideright",
            Transition::CircleCrop => "circlecrop",
            Transition::RectCrop => "rectcrop",
            Transition::Distance => "distance",
            Transition::SlideUp => "slideup",
            Transition::SlideDown => "slidedown",
            Transition::SmoothLeft => "smoothleft",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transition {
    type Err = SlidecutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept "slide-left" and "slide_left" alongside the ffmpeg spelling.
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        Transition::CATALOG
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| SlidecutError::UnknownTransition {
                name: s.to_string(),
            })
    }
}

/// Ordered transitions for one render job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionPlan {
    /// Name of the template that produced this plan.
    pub template: String,

    /// One entry per adjacent image pair.
    pub transitions: Vec<Transition>,
}

impl TransitionPlan {
    pub fn new(template: impl Into<String>, transitions: Vec<Transition>) -> Self {
        Self {
            template: template.into(),
            transitions,
        }
    }

    /// Number of transitions in the plan.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Transition applied between image `index` and `index + 1`.
    ///
    /// A plan shorter than the number of image pairs wraps around, so a plan
    /// `[a, b]` over nine pairs yields `a, b, a, b, a, b, a, b, a`. Returns
    /// `None` only for an empty plan.
    pub fn transition_for(&self, index: usize) -> Option<Transition> {
        if self.transitions.is_empty() {
            return None;
        }
        Some(self.transitions[index % self.transitions.len()])
    }

    /// The effective transitions for `pairs` adjacent image pairs.
    pub fn resolve(&self, pairs: usize) -> Vec<Transition> {
        (0..pairs).filter_map(|i| self.transition_for(i)).collect()
    }

    /// Parse a comma-separated list such as `"fade,slideleft"`.
    pub fn parse_list(template: impl Into<String>, list: &str) -> Result<Self, SlidecutError> {
        let transitions = list
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Transition>, _>>()?;
        Ok(Self::new(template, transitions))
    }
}
