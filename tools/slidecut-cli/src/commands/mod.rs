pub mod check;
pub mod demo;
pub mod init_config;
pub mod render;
pub mod templates;

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use slidecut_common::config::config_file_path;
use slidecut_model::transition::TransitionPlan;
use slidecut_render::{ProgressCallback, RenderProgress};
use slidecut_templates::{Template, TemplateSelector};

/// Config file in effect: the `--config` override, else the default location.
pub fn config_path(config_override: Option<&Path>) -> PathBuf {
    config_override
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path)
}

/// Seeded generator when a seed is given, OS-seeded otherwise.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Resolve the plan from an explicit list, a template name, or a random template.
pub fn resolve_plan(
    image_count: usize,
    template: Option<&str>,
    transitions: Option<&str>,
    seed: Option<u64>,
) -> anyhow::Result<TransitionPlan> {
    if let Some(list) = transitions {
        return Ok(TransitionPlan::parse_list("custom", list)?);
    }

    let template = template.map(str::parse::<Template>).transpose()?;
    let selector = TemplateSelector::for_image_count(image_count);
    Ok(selector.select(template, &mut rng(seed))?)
}

pub fn progress_printer() -> ProgressCallback {
    Box::new(|p: RenderProgress| {
        print!(
            "\r  {:<9} {:>5.1}% ({}/{} frames, ETA: {:.0}s)  ",
            p.state.as_str(),
            p.progress * 100.0,
            p.frames_rendered,
            p.total_frames,
            p.eta_secs,
        );
    })
}

pub fn describe_plan(plan: &TransitionPlan) -> String {
    plan.transitions
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
