//! Check encoder availability.

use std::path::Path;
use std::process::Command;

use slidecut_common::config::AppConfig;
use slidecut_render::encoder::command_exists;

pub fn run(config: &AppConfig, config_override: Option<&Path>) -> anyhow::Result<()> {
    println!("Slidecut System Check");
    println!("{}", "=".repeat(50));

    let render = &config.render;
    let config_path = super::config_path(config_override);
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!("[INFO] Config: defaults (no file at {})", config_path.display());
    }

    match render.validate() {
        Ok(()) => println!(
            "[OK] Render settings: {} images, {}x{}, {}s/{}s, {}fps",
            render.image_count,
            render.width,
            render.height,
            render.segment_secs,
            render.transition_secs,
            render.fps
        ),
        Err(e) => println!("[FAIL] Render settings: {e}"),
    }

    let encoder_ok = command_exists(&render.ffmpeg_binary);
    if !encoder_ok {
        println!("[FAIL] Encoder: {} not found", render.ffmpeg_binary);
        println!("\nInstall ffmpeg or set render.ffmpeg_binary in the config file.");
        return Ok(());
    }
    println!("[OK] Encoder: {}", render.ffmpeg_binary);

    let codec_ok = Command::new(&render.ffmpeg_binary)
        .args(["-hide_banner", "-encoders"])
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).contains(&render.video_codec))
        .unwrap_or(false);
    if codec_ok {
        println!("[OK] Codec: {}", render.video_codec);
        println!("\nSlidecut is ready.");
    } else {
        println!(
            "[FAIL] Codec: {} not supported by {}",
            render.video_codec, render.ffmpeg_binary
        );
    }

    Ok(())
}
