//! Encoder backends.
//!
//! The compositor never encodes frames itself. It hands a fully specified
//! argument list to an [`Encoder`] and interprets the exit status and the
//! diagnostic text that comes back.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use slidecut_common::error::{SlidecutError, SlidecutResult};

use crate::progress::{progress_report, ProgressCallback, ProgressState};

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const STALL_WARNING_SECS: u64 = 10;

/// A single encoder invocation.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    /// Arguments after the program name. Paths are kept as raw OS strings.
    pub args: Vec<OsString>,

    /// File the encoder is expected to write.
    pub output_path: PathBuf,

    /// Output duration bound, for progress estimation.
    pub expected_duration_secs: f64,

    /// Expected output frame count, for progress estimation.
    pub total_frames: u64,
}

/// What an encoder run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOutcome {
    /// Process exit code; `None` when terminated by a signal.
    pub exit_code: Option<i32>,

    /// Captured diagnostic stream (stderr).
    pub diagnostics: String,
}

impl EncodeOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Human-readable exit status.
    pub fn status_text(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit status: {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Trait for encoder backends (ffmpeg, or a mock in tests).
pub trait Encoder: Send {
    /// Run the encoder once, blocking until it exits.
    ///
    /// A non-zero exit is reported through [`EncodeOutcome`], not as `Err`;
    /// `Err` means the process could not be run or was killed on timeout.
    fn encode(
        &mut self,
        request: &EncodeRequest,
        progress: Option<ProgressCallback>,
    ) -> SlidecutResult<EncodeOutcome>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name, as reported in logs and errors.
    fn name(&self) -> &str;
}

/// Runs the `ffmpeg` command-line tool.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    binary: String,
    timeout: Option<Duration>,
}

impl FfmpegEncoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Kill the encoder if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn wait(&self, child: &mut Child) -> SlidecutResult<Option<ExitStatus>> {
        let Some(timeout) = self.timeout else {
            return child.wait().map(Some).map_err(|e| {
                SlidecutError::Other(anyhow::anyhow!("Failed to wait on ffmpeg: {e}"))
            });
        };

        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(Some(status)),
                Ok(None) if Instant::now() >= deadline => {
                    tracing::warn!(
                        pid = child.id(),
                        timeout_secs = timeout.as_secs(),
                        "ffmpeg exceeded deadline, killing"
                    );
                    kill_and_reap(child);
                    return Ok(None);
                }
                Ok(None) => std::thread::sleep(WAIT_POLL_INTERVAL),
                Err(e) => {
                    return Err(SlidecutError::Other(anyhow::anyhow!(
                        "Failed to poll ffmpeg: {e}"
                    )))
                }
            }
        }
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Encoder for FfmpegEncoder {
    fn encode(
        &mut self,
        request: &EncodeRequest,
        progress: Option<ProgressCallback>,
    ) -> SlidecutResult<EncodeOutcome> {
        tracing::debug!(binary = %self.binary, args = ?request.args, "Running ffmpeg");
        let mut cmd = Command::new(&self.binary);
        cmd.args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SlidecutError::EncoderUnavailable {
                    binary: self.binary.clone(),
                }
            } else {
                SlidecutError::Other(anyhow::anyhow!("Failed to start ffmpeg: {e}"))
            }
        })?;

        tracing::info!(
            pid = child.id(),
            args_len = request.args.len(),
            total_frames = request.total_frames,
            "ffmpeg process started"
        );

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            kill_and_reap(&mut child);
            return Err(SlidecutError::Other(anyhow::anyhow!(
                "Failed to capture ffmpeg output pipes"
            )));
        };

        // Both pipes are drained on their own threads so a full pipe never
        // blocks ffmpeg while this thread waits on it.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });
        let progress_task = spawn_progress_reader(
            stdout,
            progress,
            request.total_frames,
            request.expected_duration_secs,
            start,
        );

        let status = match self.wait(&mut child) {
            Ok(status) => status,
            Err(err) => {
                // Closing the pipes lets both reader threads finish.
                kill_and_reap(&mut child);
                let _ = stderr_task.join();
                let _ = progress_task.join();
                return Err(err);
            }
        };

        let diagnostics = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());
        if progress_task.join().is_err() {
            tracing::warn!("ffmpeg progress reader panicked");
        }

        let Some(status) = status else {
            return Err(SlidecutError::Timeout {
                secs: self.timeout.map(|t| t.as_secs()).unwrap_or_default(),
                diagnostics: diagnostics.trim().to_string(),
            });
        };

        tracing::info!(
            status = %status,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "ffmpeg process exited"
        );

        Ok(EncodeOutcome {
            exit_code: status.code(),
            diagnostics: diagnostics.trim().to_string(),
        })
    }

    fn is_available(&self) -> bool {
        command_exists(&self.binary)
    }

    fn name(&self) -> &str {
        &self.binary
    }
}

/// Kill `child` if still running and wait for it so no zombie is left.
fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "ffmpeg kill failed (already exited?)");
    }
    if let Err(e) = child.wait() {
        tracing::warn!(error = %e, "Failed to reap ffmpeg");
    }
}

fn spawn_progress_reader(
    stdout: impl Read + Send + 'static,
    progress: Option<ProgressCallback>,
    total_frames: u64,
    expected_duration_secs: f64,
    start: Instant,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();

        let mut latest_progress = ProgressState::default();
        let mut last_progress_secs = 0.0f64;
        let mut last_progress_wall = Instant::now();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Failed reading ffmpeg progress");
                    break;
                }
            }

            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            latest_progress.update(key, value);
            if key != "progress" {
                continue;
            }

            if latest_progress.out_time_secs > last_progress_secs + 0.001 {
                last_progress_secs = latest_progress.out_time_secs;
                last_progress_wall = Instant::now();
            }
            if let Some(cb) = &progress {
                cb(progress_report(
                    &latest_progress,
                    total_frames,
                    expected_duration_secs,
                    start.elapsed().as_secs_f64(),
                ));
            }
            if last_progress_wall.elapsed().as_secs() >= STALL_WARNING_SECS {
                tracing::warn!(
                    out_time_secs = latest_progress.out_time_secs,
                    elapsed_secs = start.elapsed().as_secs_f64(),
                    "No ffmpeg progress advancement for {STALL_WARNING_SECS}s"
                );
                last_progress_wall = Instant::now();
            }
        }
    })
}

/// Whether `binary` can be executed, either as a path or via `PATH`.
pub fn command_exists(binary: &str) -> bool {
    if binary.contains(std::path::MAIN_SEPARATOR) {
        return std::path::Path::new(binary).is_file();
    }
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
