//! Per-job working directories.
//!
//! Image and output file names are not unique across jobs, so each job gets
//! its own temporary directory. The directory is removed when the
//! [`JobWorkspace`] is dropped or closed, on success and on failure alike,
//! unless [`JobWorkspace::keep`] is called.

use std::path::{Path, PathBuf};

use slidecut_common::error::SlidecutResult;

/// File name used for rendered output inside a workspace.
pub const OUTPUT_FILE_NAME: &str = "output.mp4";

/// An isolated directory owned by a single render job.
#[derive(Debug)]
pub struct JobWorkspace {
    dir: tempfile::TempDir,
}

impl JobWorkspace {
    /// Create a workspace under `root`, creating `root` if needed.
    pub fn create_in(root: impl AsRef<Path>) -> SlidecutResult<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new().prefix("job-").tempdir_in(root)?;
        tracing::debug!(path = %dir.path().display(), "Created job workspace");
        Ok(Self { dir })
    }

    /// Create a workspace under the system temp directory.
    pub fn create() -> SlidecutResult<Self> {
        Self::create_in(std::env::temp_dir().join("slidecut"))
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for the `index`-th (zero-based) input image, as `image{n}.{ext}`.
    pub fn image_path(&self, index: usize, extension: &str) -> PathBuf {
        self.dir.path().join(format!("image{}.{extension}", index + 1))
    }

    /// Path for the rendered video.
    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join(OUTPUT_FILE_NAME)
    }

    /// Stop managing the directory and return its path; the caller now owns
    /// cleanup.
    pub fn keep(self) -> PathBuf {
        let path = self.dir.keep();
        tracing::debug!(path = %path.display(), "Keeping job workspace");
        path
    }

    /// Remove the directory now, reporting any error.
    pub fn close(self) -> SlidecutResult<()> {
        self.dir.close()?;
        Ok(())
    }
}
