//! Filter graph construction: scale/pad every image, then chain cross-fades.
//!
//! Each input `i` is normalised to the output frame as `[v{i}]`. Transition
//! `i` blends the running composite with the next image and emits `[x{i}]`:
//!
//! ```text
//! [v0]─┐
//! [v1]─┴─ xfade ─[x0]─┐
//! [v2]────────────────┴─ xfade ─[x1]─┐
//! [v3]───────────────────────────────┴─ xfade ─[x2] ... ─ format ─[v]
//! ```
//!
//! The chain is strictly linear; `xfade` only ever takes two inputs.

use slidecut_common::error::{SlidecutError, SlidecutResult};
use slidecut_model::job::FrameGeometry;
use slidecut_model::timing::SegmentTiming;
use slidecut_model::transition::{Transition, TransitionPlan};

/// Label of the final video stream, passed to `-map`.
pub const OUTPUT_LABEL: &str = "v";

/// Pixel format used inside the graph; the alpha plane lets `xfade` blend.
const WORKING_PIXEL_FORMAT: &str = "yuva420p";

/// One cross-fade between the running composite and the next image.
#[derive(Debug, Clone, PartialEq)]
pub struct XfadeStep {
    /// Zero-based transition index.
    pub index: usize,

    /// Effect used for this pair.
    pub transition: Transition,

    /// Start time on the output timeline, in seconds.
    pub offset_secs: f64,

    /// Overlap length, in seconds.
    pub duration_secs: f64,

    /// Label of the running composite (or the first image).
    pub from_label: String,

    /// Label of the incoming image.
    pub to_label: String,

    /// Label this step produces.
    pub output_label: String,
}

impl XfadeStep {
    fn to_filter(&self) -> String {
        format!(
            "[{from}][{to}]xfade=transition={transition}:duration={duration}:offset={offset}[{out}]",
            from = self.from_label,
            to = self.to_label,
            transition = self.transition.as_str(),
            duration = self.duration_secs,
            offset = self.offset_secs,
            out = self.output_label,
        )
    }
}

/// A complete `-filter_complex` description for one job.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGraph {
    /// Per-input normalisation chains, one per image.
    pub input_chains: Vec<String>,

    /// Cross-fades in application order.
    pub steps: Vec<XfadeStep>,

    /// Label of the last composite before final format conversion.
    pub last_label: String,

    /// Pixel format of the mapped output stream.
    pub pixel_format: String,
}

impl FilterGraph {
    /// Render the graph as an ffmpeg `-filter_complex` argument.
    pub fn to_filter_complex(&self) -> String {
        let mut parts: Vec<String> = self.input_chains.clone();
        parts.extend(self.steps.iter().map(XfadeStep::to_filter));
        parts.push(format!(
            "[{last}]format={fmt}[{out}]",
            last = self.last_label,
            fmt = self.pixel_format,
            out = OUTPUT_LABEL,
        ));
        parts.join(";")
    }

    /// Offsets of every transition, in order.
    pub fn offsets(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.offset_secs).collect()
    }
}

/// Build the filter graph for `image_count` images.
///
/// A plan shorter than `image_count - 1` is cycled; see
/// [`TransitionPlan::transition_for`].
pub fn build_filter_graph(
    image_count: usize,
    plan: &TransitionPlan,
    timing: &SegmentTiming,
    geometry: &FrameGeometry,
    pixel_format: &str,
) -> SlidecutResult<FilterGraph> {
    if image_count < 2 {
        return Err(SlidecutError::WrongImageCount {
            expected: 2,
            actual: image_count,
        });
    }
    if plan.is_empty() {
        return Err(SlidecutError::EmptyTransitionPlan);
    }

    let input_chains = (0..image_count)
        .map(|i| normalize_input_chain(i, geometry))
        .collect();

    // Thread the previous composite label into each next step.
    let (steps, last_label) = plan
        .resolve(image_count - 1)
        .into_iter()
        .enumerate()
        .fold(
            (Vec::with_capacity(image_count - 1), input_label(0)),
            |(mut steps, previous), (i, transition)| {
                let output_label = format!("x{i}");
                steps.push(XfadeStep {
                    index: i,
                    transition,
                    offset_secs: timing.offset(i),
                    duration_secs: timing.transition_secs(),
                    from_label: previous,
                    to_label: input_label(i + 1),
                    output_label: output_label.clone(),
                });
                (steps, output_label)
            },
        );

    Ok(FilterGraph {
        input_chains,
        steps,
        last_label,
        pixel_format: pixel_format.to_string(),
    })
}

/// Scale to fit inside the frame, keeping aspect ratio, then center on a
/// solid canvas of exactly the frame size.
fn normalize_input_chain(index: usize, geometry: &FrameGeometry) -> String {
    format!(
        "[{index}:v]scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color={bg},format={fmt},setsar=1[{label}]",
        w = geometry.width,
        h = geometry.height,
        bg = geometry.background,
        fmt = WORKING_PIXEL_FORMAT,
        label = input_label(index),
    )
}

fn input_label(index: usize) -> String {
    format!("v{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic(pairs: usize) -> TransitionPlan {
        TransitionPlan::new("classic", vec![Transition::Fade; pairs])
    }

    #[test]
    fn test_input_chain_letterboxes_to_frame() {
        let chain = normalize_input_chain(3, &FrameGeometry::default());
        assert_eq!(
            chain,
            "[3:v]scale=1080:1920:force_original_aspect_ratio=decrease,pad=1080:1920:(ow-iw)/2:(oh-ih)/2:color=black,format=yuva420p,setsar=1[v3]"
        );
    }

    #[test]
    fn test_chain_is_linear() {
        let graph = build_filter_graph(
            10,
            &classic(9),
            &SegmentTiming::default(),
            &FrameGeometry::default(),
            "yuv420p",
        )
        .unwrap();

        assert_eq!(graph.input_chains.len(), 10);
        assert_eq!(graph.steps.len(), 9);
        assert_eq!(graph.steps[0].from_label, "v0");
        assert_eq!(graph.steps[0].to_label, "v1");
        for pair in graph.steps.windows(2) {
            assert_eq!(pair[1].from_label, pair[0].output_label);
            assert_eq!(pair[1].to_label, format!("v{}", pair[1].index + 1));
        }
        assert_eq!(graph.last_label, "x8");
    }

    #[test]
    fn test_filter_complex_text() {
        let graph = build_filter_graph(
            3,
            &TransitionPlan::new("custom", vec![Transition::SlideLeft, Transition::CircleCrop]),
            &SegmentTiming::default(),
            &FrameGeometry::default(),
            "yuv420p",
        )
        .unwrap();

        let text = graph.to_filter_complex();
        let parts: Vec<&str> = text.split(';').collect();
        assert_eq!(parts.len(), 3 + 2 + 1);
        assert_eq!(
            parts[3],
            "[v0][v1]xfade=transition=slideleft:duration=1:offset=2[x0]"
        );
        assert_eq!(
            parts[4],
            "[x0][v2]xfade=transition=circlecrop:duration=1:offset=4[x1]"
        );
        assert_eq!(parts[5], "[x1]format=yuv420p[v]");
    }

    #[test]
    fn test_short_plan_cycles() {
        let plan = TransitionPlan::new("custom", vec![Transition::Fade, Transition::Distance]);
        let graph = build_filter_graph(
            10,
            &plan,
            &SegmentTiming::default(),
            &FrameGeometry::default(),
            "yuv420p",
        )
        .unwrap();

        let used: Vec<Transition> = graph.steps.iter().map(|s| s.transition).collect();
        let expected: Vec<Transition> = [0, 1, 0, 1, 0, 1, 0, 1, 0]
            .iter()
            .map(|&i| plan.transitions[i])
            .collect();
        assert_eq!(used, expected);
    }

    #[test]
    fn test_offsets_follow_timing() {
        let timing = SegmentTiming::new(2.5, 0.75).unwrap();
        let graph = build_filter_graph(
            4,
            &classic(3),
            &timing,
            &FrameGeometry::default(),
            "yuv420p",
        )
        .unwrap();
        assert_eq!(graph.offsets(), vec![1.75, 3.5, 5.25]);
        assert!(graph
            .to_filter_complex()
            .contains("xfade=transition=fade:duration=0.75:offset=5.25[x2]"));
    }

    #[test]
    fn test_empty_plan_is_rejected() {
        let result = build_filter_graph(
            10,
            &TransitionPlan::new("custom", Vec::new()),
            &SegmentTiming::default(),
            &FrameGeometry::default(),
            "yuv420p",
        );
        assert!(matches!(result, Err(SlidecutError::EmptyTransitionPlan)));
    }

    #[test]
    fn test_custom_geometry() {
        let graph = build_filter_graph(
            2,
            &classic(1),
            &SegmentTiming::default(),
            &FrameGeometry::new(720, 1280, "white"),
            "yuv420p",
        )
        .unwrap();
        assert!(graph.input_chains[1].contains("pad=720:1280:(ow-iw)/2:(oh-ih)/2:color=white"));
    }

    #[test]
    fn test_sub_millisecond_offsets_are_not_rounded() {
        let timing = SegmentTiming::new(1.0004, 1.0).unwrap();
        let graph = build_filter_graph(
            10,
            &classic(9),
            &timing,
            &FrameGeometry::default(),
            "yuv420p",
        )
        .unwrap();

        let text = graph.to_filter_complex();
        let rendered: Vec<f64> = text
            .split("offset=")
            .skip(1)
            .map(|rest| rest.split('[').next().unwrap().parse().unwrap())
            .collect();

        assert_eq!(rendered, graph.offsets());
        for pair in rendered.windows(2) {
            assert!(pair[1] > pair[0], "offsets not increasing: {rendered:?}");
        }
        assert!(text.contains(":duration=1:"));
    }
}
