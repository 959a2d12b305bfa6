use std::{
    fmt,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context as _;
use tracing::warn;

use crate::error::CardResult;

/// Globally-unique per-render identifier: unix seconds plus a random
/// suffix, so concurrent renders never collide on intermediate or final
/// file names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobId(String);

impl JobId {
    pub fn new() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{secs}-{}", &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Temporary directory holding one render's ordered frame files.
/// Created before frame 0, deleted (best effort) after encoding succeeds.
#[derive(Debug)]
pub struct Workspace {
    job_id: JobId,
    frames_dir: PathBuf,
}

impl Workspace {
    pub fn create(out_dir: &Path) -> CardResult<Self> {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create output directory '{}'", out_dir.display()))?;

        let job_id = JobId::new();
        let frames_dir = out_dir.join(format!("frames_{job_id}"));
        std::fs::create_dir_all(&frames_dir).with_context(|| {
            format!("failed to create frames directory '{}'", frames_dir.display())
        })?;

        Ok(Self { job_id, frames_dir })
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn frames_dir(&self) -> &Path {
        &self.frames_dir
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.frames_dir.join(format!("{index:05}.png"))
    }

    /// ffmpeg image2 input pattern matching [`Self::frame_path`] names.
    pub fn frame_pattern(&self) -> PathBuf {
        self.frames_dir.join("%05d.png")
    }

    /// Removes the frames directory. Failure to delete is not fatal; the
    /// video already exists at this point.
    pub fn cleanup(self) {
        if let Err(e) = std::fs::remove_dir_all(&self.frames_dir) {
            warn!(
                dir = %self.frames_dir.display(),
                error = %e,
                "failed to remove frame workspace"
            );
        }
    }
}
