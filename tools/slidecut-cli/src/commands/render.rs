//! Render a set of images into a video.

use std::path::PathBuf;

use slidecut_common::config::AppConfig;
use slidecut_model::job::ImageSet;
use slidecut_render::{compose_video, VideoCompositor};

use super::{describe_plan, progress_printer, resolve_plan};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: &AppConfig,
    images: Vec<PathBuf>,
    output: PathBuf,
    template: Option<String>,
    transitions: Option<String>,
    seed: Option<u64>,
    segment_secs: Option<f64>,
    transition_secs: Option<f64>,
) -> anyhow::Result<()> {
    let mut defaults = config.render.clone();
    if let Some(secs) = segment_secs {
        defaults.segment_secs = secs;
    }
    if let Some(secs) = transition_secs {
        defaults.transition_secs = secs;
    }

    let compositor = VideoCompositor::from_defaults(&defaults)?;
    let plan = resolve_plan(
        defaults.image_count,
        template.as_deref(),
        transitions.as_deref(),
        seed,
    )?;

    tracing::debug!(
        template = %plan.template,
        transitions = %describe_plan(&plan),
        seed = ?seed,
        "Resolved transition plan"
    );

    println!("Rendering {} images", images.len());
    println!("  Output: {}", output.display());
    println!("  Template: {}", plan.template);
    println!("  Transitions: {}", describe_plan(&plan));
    println!("  Frame: {}x{}", defaults.width, defaults.height);

    let job = compositor.job(ImageSet::new(images), plan, &output);
    match compose_video(compositor, job, Some(progress_printer())).await {
        Ok(path) => {
            println!("\nRender complete: {}", path.display());
            Ok(())
        }
        Err(e) => {
            println!("\nRender failed: {e}");
            Err(e.into())
        }
    }
}
