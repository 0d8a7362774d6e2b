//! Render jobs: validate inputs, build the encoder invocation, run it once.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use slidecut_common::config::RenderDefaults;
use slidecut_common::error::{SlidecutError, SlidecutResult};
use slidecut_model::job::{FrameGeometry, ImageSet, JobState, RenderJob};
use slidecut_model::timing::SegmentTiming;
use slidecut_model::transition::TransitionPlan;

use crate::compositor::{build_filter_graph, FilterGraph, OUTPUT_LABEL};
use crate::encoder::{EncodeRequest, Encoder, FfmpegEncoder};
use crate::progress::{ProgressCallback, RenderProgress};

/// Settings shared by every job a compositor runs.
#[derive(Debug, Clone)]
pub struct CompositorSettings {
    /// Exact number of images each job must provide.
    pub image_count: usize,

    /// Output frame.
    pub geometry: FrameGeometry,

    /// Timing used by [`VideoCompositor::job`].
    pub timing: SegmentTiming,

    /// Output frame rate.
    pub fps: u32,

    /// Video codec.
    pub video_codec: String,

    /// Output pixel format.
    pub pixel_format: String,
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self {
            image_count: 10,
            geometry: FrameGeometry::default(),
            timing: SegmentTiming::default(),
            fps: 30,
            video_codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
        }
    }
}

impl CompositorSettings {
    /// Build settings from configured render defaults.
    pub fn from_defaults(defaults: &RenderDefaults) -> SlidecutResult<Self> {
        defaults.validate()?;
        Ok(Self {
            image_count: defaults.image_count,
            geometry: FrameGeometry::new(defaults.width, defaults.height, &defaults.background),
            timing: SegmentTiming::new(defaults.segment_secs, defaults.transition_secs)?,
            fps: defaults.fps,
            video_codec: defaults.video_codec.clone(),
            pixel_format: defaults.pixel_format.clone(),
        })
    }

    /// Number of transitions per job.
    pub fn transition_slots(&self) -> usize {
        self.image_count.saturating_sub(1)
    }
}

/// Ffmpeg encoder configured from render defaults.
pub fn ffmpeg_encoder(defaults: &RenderDefaults) -> FfmpegEncoder {
    FfmpegEncoder::new(&defaults.ffmpeg_binary)
        .with_timeout(defaults.timeout_secs.map(Duration::from_secs))
}

/// Turns image sets and transition plans into finished videos.
pub struct VideoCompositor<E: Encoder = FfmpegEncoder> {
    settings: CompositorSettings,
    encoder: E,
}

impl VideoCompositor<FfmpegEncoder> {
    /// Compositor backed by ffmpeg, configured from render defaults.
    pub fn from_defaults(defaults: &RenderDefaults) -> SlidecutResult<Self> {
        Ok(Self::new(
            CompositorSettings::from_defaults(defaults)?,
            ffmpeg_encoder(defaults),
        ))
    }
}

impl<E: Encoder> VideoCompositor<E> {
    pub fn new(settings: CompositorSettings, encoder: E) -> Self {
        Self { settings, encoder }
    }

    pub fn settings(&self) -> &CompositorSettings {
        &self.settings
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// A job using the compositor's default timing.
    pub fn job(
        &self,
        images: ImageSet,
        plan: TransitionPlan,
        output_path: impl AsRef<Path>,
    ) -> RenderJob {
        RenderJob::new(images, plan, self.settings.timing, output_path)
    }

    /// Render `job`, blocking until the encoder exits.
    ///
    /// Returns the output path on success. On failure the caller owns any
    /// partially written output file.
    pub fn compose(
        &mut self,
        job: &RenderJob,
        progress: Option<ProgressCallback>,
    ) -> SlidecutResult<PathBuf> {
        let started = std::time::Instant::now();
        let mut tracker = JobTracker::new(progress);
        tracing::info!(
            output = %job.output_path.display(),
            images = job.images.len(),
            template = %job.plan.template,
            "Starting render"
        );

        let (request, graph) = match self.prepare(job) {
            Ok(prepared) => prepared,
            Err(err) => {
                tracker.advance(JobState::Failed, 0);
                return Err(err);
            }
        };
        let total_frames = request.total_frames;
        tracker.advance(JobState::Validated, total_frames);

        tracing::info!(
            backend = self.encoder.name(),
            transitions = graph.steps.len(),
            duration_secs = request.expected_duration_secs,
            frames = total_frames,
            "Render plan built"
        );
        tracker.advance(JobState::Encoding, total_frames);

        if !self.encoder.is_available() {
            tracker.advance(JobState::Failed, total_frames);
            return Err(SlidecutError::EncoderUnavailable {
                binary: self.encoder.name().to_string(),
            });
        }

        if let Some(parent) = job.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    tracker.advance(JobState::Failed, total_frames);
                    return Err(err.into());
                }
            }
        }

        let result = self
            .encoder
            .encode(&request, tracker.encoder_callback())
            .and_then(|outcome| {
                if !outcome.success() {
                    tracing::warn!(
                        status = %outcome.status_text(),
                        diagnostics = %outcome.diagnostics,
                        "Encoder failed"
                    );
                    return Err(SlidecutError::encoding_failed(
                        outcome.status_text(),
                        outcome.diagnostics,
                    ));
                }
                if !job.output_path.is_file() {
                    return Err(SlidecutError::encoding_failed(
                        outcome.status_text(),
                        format!(
                            "encoder reported success but {} was not written",
                            job.output_path.display()
                        ),
                    ));
                }
                Ok(())
            });

        match result {
            Ok(()) => {
                tracker.advance(JobState::Succeeded, total_frames);
                tracing::info!(
                    output = %job.output_path.display(),
                    elapsed_secs = started.elapsed().as_secs_f64(),
                    "Render finished"
                );
                Ok(job.output_path.clone())
            }
            Err(err) => {
                tracker.advance(JobState::Failed, total_frames);
                Err(err)
            }
        }
    }

    /// Validate `job` and build its encoder request without running it.
    pub fn prepare(&self, job: &RenderJob) -> SlidecutResult<(EncodeRequest, FilterGraph)> {
        job.images.validate(self.settings.image_count)?;

        let pairs = self.settings.transition_slots();
        if job.plan.is_empty() {
            return Err(SlidecutError::EmptyTransitionPlan);
        }
        if job.plan.len() < pairs {
            tracing::warn!(
                plan_len = job.plan.len(),
                pairs,
                "Transition plan is shorter than the number of image pairs; cycling it"
            );
        }

        let graph = build_filter_graph(
            self.settings.image_count,
            &job.plan,
            &job.timing,
            &self.settings.geometry,
            &self.settings.pixel_format,
        )?;

        let duration_secs = job.timing.total_duration(self.settings.image_count);
        let total_frames = (duration_secs * self.settings.fps as f64).ceil() as u64;
        let args = build_encoder_args(job, &graph, &self.settings, duration_secs);

        Ok((
            EncodeRequest {
                args,
                output_path: job.output_path.clone(),
                expected_duration_secs: duration_secs,
                total_frames,
            },
            graph,
        ))
    }
}

/// Render on a blocking thread, for callers running inside a tokio runtime.
pub async fn compose_video<E>(
    mut compositor: VideoCompositor<E>,
    job: RenderJob,
    progress: Option<ProgressCallback>,
) -> SlidecutResult<PathBuf>
where
    E: Encoder + 'static,
{
    tokio::task::spawn_blocking(move || compositor.compose(&job, progress))
        .await
        .map_err(|e| SlidecutError::Other(anyhow::anyhow!("Render task failed: {e}")))?
}

/// Full argument list for one ffmpeg invocation.
///
/// Paths are passed through as OS strings so non-UTF-8 names survive.
fn build_encoder_args(
    job: &RenderJob,
    graph: &FilterGraph,
    settings: &CompositorSettings,
    duration_secs: f64,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-y",
        "-hide_banner",
        "-loglevel",
        "error",
        "-nostats",
        "-progress",
        "pipe:1",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();

    // Each still is looped into a finite stream one segment long.
    let segment = job.timing.segment_secs().to_string();
    for path in job.images.paths() {
        args.extend(["-loop", "1", "-t", segment.as_str(), "-i"].map(OsString::from));
        args.push(path.clone().into_os_string());
    }

    let tail = [
        "-filter_complex".to_string(),
        graph.to_filter_complex(),
        "-map".to_string(),
        format!("[{OUTPUT_LABEL}]"),
        "-t".to_string(),
        duration_secs.to_string(),
        "-r".to_string(),
        settings.fps.to_string(),
        "-pix_fmt".to_string(),
        settings.pixel_format.clone(),
        "-c:v".to_string(),
        settings.video_codec.clone(),
        "-movflags".to_string(),
        "+faststart".to_string(),
    ];
    args.extend(tail.map(OsString::from));

    args.push(job.output_path.clone().into_os_string());
    args
}

/// Tracks one job through its state machine and reports each change.
struct JobTracker {
    state: JobState,
    progress: Option<Arc<dyn Fn(RenderProgress) + Send + Sync>>,
}

impl JobTracker {
    fn new(progress: Option<ProgressCallback>) -> Self {
        let tracker = Self {
            state: JobState::Created,
            progress: progress.map(Arc::from),
        };
        tracker.report(0);
        tracker
    }

    fn advance(&mut self, next: JobState, total_frames: u64) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal job state change {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!(from = self.state.as_str(), to = next.as_str(), "Job state");
        self.state = next;
        self.report(total_frames);
    }

    fn report(&self, total_frames: u64) {
        if let Some(cb) = &self.progress {
            cb(RenderProgress::at_state(self.state, total_frames));
        }
    }

    /// Callback forwarding in-flight encoder progress to the same sink.
    fn encoder_callback(&self) -> Option<ProgressCallback> {
        self.progress.as_ref().map(|cb| {
            let cb = Arc::clone(cb);
            Box::new(move |p: RenderProgress| cb(p)) as ProgressCallback
        })
    }
}
