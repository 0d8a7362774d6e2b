//! Render generated placeholder images end to end.

use std::path::PathBuf;

use slidecut_common::config::AppConfig;
use slidecut_model::job::ImageSet;
use slidecut_render::placeholder::write_placeholder_images;
use slidecut_render::{compose_video, JobWorkspace, VideoCompositor};

use super::{describe_plan, progress_printer, resolve_plan};

const PLACEHOLDER_WIDTH: u32 = 640;
const PLACEHOLDER_HEIGHT: u32 = 480;

pub async fn run(
    config: &AppConfig,
    output: PathBuf,
    template: Option<String>,
    seed: Option<u64>,
    keep_workdir: bool,
) -> anyhow::Result<()> {
    let defaults = &config.render;
    let compositor = VideoCompositor::from_defaults(defaults)?;
    let plan = resolve_plan(defaults.image_count, template.as_deref(), None, seed)?;

    let workspace = JobWorkspace::create_in(&config.work_dir)?;
    let images = write_placeholder_images(
        workspace.path(),
        defaults.image_count,
        PLACEHOLDER_WIDTH,
        PLACEHOLDER_HEIGHT,
    )?;
    println!(
        "Generated {} placeholder images in {}",
        images.len(),
        workspace.path().display()
    );
    println!("  Template: {} ({})", plan.template, describe_plan(&plan));

    let job = compositor.job(ImageSet::new(images), plan, &output);
    let result = compose_video(compositor, job, Some(progress_printer())).await;

    if let Err(e) = &result {
        tracing::warn!(error = %e, "Demo render failed");
    }

    if keep_workdir {
        println!("\nKept working directory: {}", workspace.keep().display());
    } else {
        workspace.close()?;
    }

    let path = result?;
    println!("\nDemo complete: {}", path.display());
    Ok(())
}
