use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slidecut_common::error::{SlidecutError, SlidecutResult};
use slidecut_model::job::{FrameGeometry, ImageSet, JobState};
use slidecut_model::timing::SegmentTiming;
use slidecut_model::transition::{Transition, TransitionPlan};
use slidecut_render::{
    compose_video, CompositorSettings, EncodeOutcome, EncodeRequest, Encoder, JobWorkspace,
    ProgressCallback, RenderProgress, VideoCompositor,
};
use slidecut_templates::{Template, TemplateSelector};

/// Records every request; optionally writes a fake output file.
#[derive(Clone)]
struct RecordingEncoder {
    calls: Arc<Mutex<Vec<EncodeRequest>>>,
    exit_code: Option<i32>,
    diagnostics: String,
    write_output: bool,
    available: bool,
}

impl RecordingEncoder {
    fn succeeding() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            exit_code: Some(0),
            diagnostics: String::new(),
            write_output: true,
            available: true,
        }
    }

    fn failing(code: i32, diagnostics: &str) -> Self {
        Self {
            exit_code: Some(code),
            diagnostics: diagnostics.to_string(),
            write_output: false,
            ..Self::succeeding()
        }
    }

    fn calls(&self) -> Vec<EncodeRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl Encoder for RecordingEncoder {
    fn encode(
        &mut self,
        request: &EncodeRequest,
        _progress: Option<ProgressCallback>,
    ) -> SlidecutResult<EncodeOutcome> {
        self.calls.lock().unwrap().push(request.clone());
        if self.write_output {
            std::fs::write(&request.output_path, b"\x00\x00\x00\x18ftypmp42")?;
        }
        Ok(EncodeOutcome {
            exit_code: self.exit_code,
            diagnostics: self.diagnostics.clone(),
        })
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "recording"
    }
}

fn images(count: usize) -> ImageSet {
    ImageSet::new((1..=count).map(|i| PathBuf::from(format!("/srv/jobs/42/image{i}.jpg"))))
}

fn classic() -> TransitionPlan {
    TransitionPlan::new("classic", vec![Transition::Fade; 9])
}

fn state_recorder() -> (ProgressCallback, Arc<Mutex<Vec<JobState>>>) {
    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&states);
    let callback: ProgressCallback = Box::new(move |p: RenderProgress| {
        let mut states = sink.lock().unwrap();
        if states.last() != Some(&p.state) {
            states.push(p.state);
        }
    });
    (callback, states)
}

fn filter_of(request: &EncodeRequest) -> String {
    let pos = request
        .args
        .iter()
        .position(|a| a == "-filter_complex")
        .expect("filter_complex argument");
    request.args[pos + 1].to_string_lossy().into_owned()
}

#[test]
fn valid_job_succeeds_with_single_encoder_call() {
    let dir = tempfile::tempdir().unwrap();
    let encoder = RecordingEncoder::succeeding();
    let mut compositor = VideoCompositor::new(CompositorSettings::default(), encoder.clone());
    let output = dir.path().join("nested").join("output.mp4");

    let job = compositor.job(images(10), classic(), &output);
    let result = compositor.compose(&job, None).unwrap();

    assert_eq!(result, output);
    assert!(std::fs::metadata(&output).unwrap().len() > 0);

    let calls = encoder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].expected_duration_secs, 19.0);
    assert_eq!(calls[0].output_path, output);
}

#[test]
fn wrong_image_count_never_invokes_encoder() {
    for count in [0, 1, 9, 11] {
        let encoder = RecordingEncoder::succeeding();
        let mut compositor = VideoCompositor::new(CompositorSettings::default(), encoder.clone());
        let job = compositor.job(images(count), classic(), "/tmp/never-written.mp4");

        let err = compositor.compose(&job, None).unwrap_err();
        match err {
            SlidecutError::WrongImageCount { expected, actual } => {
                assert_eq!(expected, 10);
                assert_eq!(actual, count);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(encoder.calls().is_empty());
    }
}

#[test]
fn encoder_failure_carries_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let encoder = RecordingEncoder::failing(1, "/srv/jobs/42/image3.jpg: Invalid data found");
    let mut compositor = VideoCompositor::new(CompositorSettings::default(), encoder.clone());
    let job = compositor.job(images(10), classic(), dir.path().join("output.mp4"));

    let err = compositor.compose(&job, None).unwrap_err();
    assert!(matches!(err, SlidecutError::EncodingFailed { .. }));
    assert_eq!(
        err.diagnostics(),
        Some("/srv/jobs/42/image3.jpg: Invalid data found")
    );
    assert_eq!(encoder.calls().len(), 1);
}

#[test]
fn success_without_output_file_is_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let encoder = RecordingEncoder {
        write_output: false,
        ..RecordingEncoder::succeeding()
    };
    let mut compositor = VideoCompositor::new(CompositorSettings::default(), encoder);
    let job = compositor.job(images(10), classic(), dir.path().join("output.mp4"));

    let err = compositor.compose(&job, None).unwrap_err();
    assert!(matches!(err, SlidecutError::EncodingFailed { .. }));
    assert!(err.diagnostics().unwrap().contains("was not written"));
}

#[test]
fn unavailable_encoder_is_reported_without_running() {
    let encoder = RecordingEncoder {
        available: false,
        ..RecordingEncoder::succeeding()
    };
    let mut compositor = VideoCompositor::new(CompositorSettings::default(), encoder.clone());
    let job = compositor.job(images(10), classic(), "/tmp/never-written.mp4");

    let err = compositor.compose(&job, None).unwrap_err();
    assert!(matches!(err, SlidecutError::EncoderUnavailable { .. }));
    assert!(encoder.calls().is_empty());
}

#[test]
fn empty_plan_is_rejected_before_encoding() {
    let encoder = RecordingEncoder::succeeding();
    let mut compositor = VideoCompositor::new(CompositorSettings::default(), encoder.clone());
    let job = compositor.job(
        images(10),
        TransitionPlan::new("custom", Vec::new()),
        "/tmp/never-written.mp4",
    );

    assert!(matches!(
        compositor.compose(&job, None),
        Err(SlidecutError::EmptyTransitionPlan)
    ));
    assert!(encoder.calls().is_empty());
}

#[test]
fn job_states_are_reported_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut compositor =
        VideoCompositor::new(CompositorSettings::default(), RecordingEncoder::succeeding());
    let job = compositor.job(images(10), classic(), dir.path().join("output.mp4"));

    let (callback, states) = state_recorder();
    compositor.compose(&job, Some(callback)).unwrap();
    assert_eq!(
        *states.lock().unwrap(),
        vec![
            JobState::Created,
            JobState::Validated,
            JobState::Encoding,
            JobState::Succeeded
        ]
    );

    let (callback, states) = state_recorder();
    let bad = compositor.job(images(3), classic(), dir.path().join("bad.mp4"));
    compositor.compose(&bad, Some(callback)).unwrap_err();
    assert_eq!(
        *states.lock().unwrap(),
        vec![JobState::Created, JobState::Failed]
    );

    let mut failing =
        VideoCompositor::new(CompositorSettings::default(), RecordingEncoder::failing(1, "boom"));
    let (callback, states) = state_recorder();
    failing.compose(&job, Some(callback)).unwrap_err();
    assert_eq!(
        *states.lock().unwrap(),
        vec![
            JobState::Created,
            JobState::Validated,
            JobState::Encoding,
            JobState::Failed
        ]
    );
}

#[test]
fn short_plan_wraps_around_in_filter_graph() {
    let dir = tempfile::tempdir().unwrap();
    let encoder = RecordingEncoder::succeeding();
    let mut compositor = VideoCompositor::new(CompositorSettings::default(), encoder.clone());
    let plan = TransitionPlan::new("custom", vec![Transition::SlideUp, Transition::RectCrop]);
    let job = compositor.job(images(10), plan, dir.path().join("output.mp4"));

    compositor.compose(&job, None).unwrap();
    let filter = filter_of(&encoder.calls()[0]);

    let used: Vec<&str> = filter
        .split("xfade=transition=")
        .skip(1)
        .map(|rest| rest.split(':').next().unwrap())
        .collect();
    assert_eq!(
        used,
        vec![
            "slideup",
            "rectcrop",
            "slideup",
            "rectcrop",
            "slideup",
            "rectcrop",
            "slideup",
            "rectcrop",
            "slideup"
        ]
    );
}

#[test]
fn seeded_random_template_renders_distinct_transitions() {
    let dir = tempfile::tempdir().unwrap();
    let selector = TemplateSelector::for_image_count(10);
    let plan = selector
        .select(Some(Template::Random), &mut StdRng::seed_from_u64(9))
        .unwrap();

    let encoder = RecordingEncoder::succeeding();
    let mut compositor = VideoCompositor::new(CompositorSettings::default(), encoder.clone());
    let job = compositor.job(images(10), plan.clone(), dir.path().join("output.mp4"));
    compositor.compose(&job, None).unwrap();

    let filter = filter_of(&encoder.calls()[0]);
    for transition in &plan.transitions {
        assert_eq!(
            filter
                .matches(&format!("transition={}:", transition.as_str()))
                .count(),
            1
        );
    }
}

#[test]
fn configured_image_count_and_geometry_are_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let settings = CompositorSettings {
        image_count: 4,
        geometry: FrameGeometry::new(720, 1280, "white"),
        timing: SegmentTiming::new(2.0, 0.5).unwrap(),
        ..CompositorSettings::default()
    };
    let encoder = RecordingEncoder::succeeding();
    let mut compositor = VideoCompositor::new(settings, encoder.clone());

    let plan = TransitionPlan::new("classic", vec![Transition::Fade; 3]);
    let job = compositor.job(images(4), plan.clone(), dir.path().join("output.mp4"));
    compositor.compose(&job, None).unwrap();

    let calls = encoder.calls();
    let request = &calls[0];
    assert_eq!(request.expected_duration_secs, 5.0);
    let filter = filter_of(request);
    assert!(filter.contains("pad=720:1280:(ow-iw)/2:(oh-ih)/2:color=white"));
    assert!(filter.contains("[x1][v3]xfade=transition=fade:duration=0.5:offset=4.5[x2]"));

    let ten = compositor.job(images(10), plan, dir.path().join("ten.mp4"));
    assert!(matches!(
        compositor.compose(&ten, None),
        Err(SlidecutError::WrongImageCount {
            expected: 4,
            actual: 10
        })
    ));
}

#[test]
fn renders_into_isolated_workspaces() {
    let root = tempfile::tempdir().unwrap();
    let encoder = RecordingEncoder::succeeding();
    let mut compositor = VideoCompositor::new(CompositorSettings::default(), encoder.clone());

    let first = JobWorkspace::create_in(root.path()).unwrap();
    let second = JobWorkspace::create_in(root.path()).unwrap();
    for workspace in [&first, &second] {
        let job = compositor.job(images(10), classic(), workspace.output_path());
        compositor.compose(&job, None).unwrap();
        assert!(workspace.output_path().is_file());
    }

    let calls = encoder.calls();
    assert_ne!(calls[0].output_path, calls[1].output_path);

    let first_dir = first.path().to_path_buf();
    drop(first);
    assert!(!first_dir.exists());
    assert!(second.output_path().is_file());
}

#[tokio::test]
async fn async_compose_runs_on_blocking_pool() {
    let dir = tempfile::tempdir().unwrap();
    let encoder = RecordingEncoder::succeeding();
    let compositor = VideoCompositor::new(CompositorSettings::default(), encoder.clone());
    let job = compositor.job(images(10), classic(), dir.path().join("output.mp4"));

    let output = compose_video(compositor, job, None).await.unwrap();
    assert!(output.is_file());
    assert_eq!(encoder.calls().len(), 1);
}

proptest! {
    #[test]
    fn any_wrong_count_fails_fast(count in 0usize..40) {
        prop_assume!(count != 10);
        let encoder = RecordingEncoder::succeeding();
        let mut compositor = VideoCompositor::new(CompositorSettings::default(), encoder.clone());
        let job = compositor.job(images(count), classic(), "/tmp/never-written.mp4");

        let is_wrong_count = matches!(
            compositor.compose(&job, None),
            Err(SlidecutError::WrongImageCount { .. })
        );
        prop_assert!(is_wrong_count);
        prop_assert!(encoder.calls().is_empty());
    }
}
