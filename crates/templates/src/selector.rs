//! Template catalog and selection.

use std::fmt;
use std::str::FromStr;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use slidecut_common::error::{SlidecutError, SlidecutResult};
use slidecut_model::transition::{Transition, TransitionPlan};

const SLIDE_SEQUENCE: [Transition; 4] = [
    Transition::SlideLeft,
    Transition::SlideRight,
    Transition::SlideUp,
    Transition::SlideDown,
];

const MIX_SEQUENCE: [Transition; 9] = [
    Transition::Fade,
    Transition::SlideLeft,
    Transition::CircleCrop,
    Transition::RectCrop,
    Transition::Distance,
    Transition::SlideUp,
    Transition::SlideDown,
    Transition::SmoothLeft,
    Transition::SlideRight,
];

/// A named, reusable choice of transitions for a whole job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Classic,
    Slide,
    Mix,
    Random,
}

impl Template {
    /// All templates, in the order they are offered.
    pub const ALL: [Template; 4] = [
        Template::Classic,
        Template::Slide,
        Template::Mix,
        Template::Random,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Template::Classic => "classic",
            Template::Slide => "slide",
            Template::Mix => "mix",
            Template::Random => "random",
        }
    }

    /// Whether repeated calls can yield different plans.
    pub fn is_sampled(self) -> bool {
        matches!(self, Template::Random)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = SlidecutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Template::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| SlidecutError::UnknownTemplate {
                name: s.to_string(),
            })
    }
}

/// Builds transition plans with exactly `slots` entries.
#[derive(Debug, Clone)]
pub struct TemplateSelector {
    catalog: Vec<Transition>,
    slots: usize,
}

impl TemplateSelector {
    /// Create a selector over `catalog` for jobs with `slots` image pairs.
    ///
    /// Duplicate catalog entries are dropped.
    pub fn new(catalog: &[Transition], slots: usize) -> Self {
        let mut distinct: Vec<Transition> = Vec::with_capacity(catalog.len());
        for transition in catalog {
            if !distinct.contains(transition) {
                distinct.push(*transition);
            }
        }

        Self {
            catalog: distinct,
            slots,
        }
    }

    /// Selector over the full transition catalog.
    pub fn standard(slots: usize) -> Self {
        Self::new(&Transition::CATALOG, slots)
    }

    /// Selector sized for a job with `image_count` images.
    pub fn for_image_count(image_count: usize) -> Self {
        Self::standard(image_count.saturating_sub(1))
    }

    /// Number of transitions every plan contains.
    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn catalog(&self) -> &[Transition] {
        &self.catalog
    }

    /// Whether `template` can fill every slot.
    ///
    /// `random` samples without replacement, so it needs at least as many
    /// distinct catalog entries as there are slots.
    pub fn supports(&self, template: Template) -> bool {
        match template {
            Template::Random => self.catalog.len() >= self.slots,
            _ => true,
        }
    }

    /// Templates this selector can build plans for.
    pub fn available(&self) -> Vec<Template> {
        Template::ALL
            .into_iter()
            .filter(|t| self.supports(*t))
            .collect()
    }

    /// Pick a plan. With no template given, one is chosen uniformly at random
    /// among the available templates.
    pub fn select<R: Rng + ?Sized>(
        &self,
        template: Option<Template>,
        rng: &mut R,
    ) -> SlidecutResult<TransitionPlan> {
        let template = match template {
            Some(template) => template,
            None => *self.available().choose(rng).unwrap_or(&Template::Classic),
        };

        let plan = self.plan_for(template, rng)?;
        tracing::debug!(
            template = %template,
            transitions = ?plan.transitions,
            "Selected transition template"
        );
        Ok(plan)
    }

    /// Build the plan for a named template.
    ///
    /// Deterministic for every template except `random`, which re-samples on
    /// each call and fails when the catalog is too small.
    pub fn plan_for<R: Rng + ?Sized>(
        &self,
        template: Template,
        rng: &mut R,
    ) -> SlidecutResult<TransitionPlan> {
        if !self.supports(template) {
            return Err(SlidecutError::template(format!(
                "{} needs {} distinct transitions but the catalog has {}",
                template,
                self.slots,
                self.catalog.len()
            )));
        }

        let transitions = match template {
            Template::Classic => vec![Transition::Fade; self.slots],
            Template::Slide => cycle(&SLIDE_SEQUENCE, self.slots),
            Template::Mix => cycle(&MIX_SEQUENCE, self.slots),
            Template::Random => self
                .catalog
                .choose_multiple(rng, self.slots)
                .copied()
                .collect(),
        };
        Ok(TransitionPlan::new(template.as_str(), transitions))
    }
}

fn cycle(sequence: &[Transition], slots: usize) -> Vec<Transition> {
    sequence.iter().copied().cycle().take(slots).collect()
}
