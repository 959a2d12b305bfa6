//! MP4 encoding via the system `ffmpeg` binary.
//!
//! We intentionally shell out rather than link FFmpeg, to avoid native dev
//! header/lib requirements. One invocation consumes the ordered frame-file
//! sequence a render produced and emits a progressively-downloadable MP4.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context as _;
use tracing::debug;

use crate::error::{CardError, CardResult};

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub fps: u32,
    /// `image2` input pattern, e.g. `out/frames_<job>/%05d.png`.
    pub frame_pattern: PathBuf,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> CardResult<()> {
        if self.fps == 0 {
            return Err(CardError::validation("encode fps must be non-zero"));
        }
        if self.frame_pattern.as_os_str().is_empty() {
            return Err(CardError::validation("encode frame pattern must be set"));
        }
        if self.out_path.as_os_str().is_empty() {
            return Err(CardError::validation("encode output path must be set"));
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> CardResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Encodes the numbered frame files into `cfg.out_path`. Fixed codec
/// settings: yuv420p / libx264 / medium / crf 18 / +faststart.
pub fn encode_frames(cfg: &EncodeConfig) -> CardResult<()> {
    cfg.validate()?;
    ensure_parent_dir(&cfg.out_path)?;

    if !cfg.overwrite && cfg.out_path.exists() {
        return Err(CardError::validation(format!(
            "output file '{}' already exists",
            cfg.out_path.display()
        )));
    }

    if !is_ffmpeg_on_path() {
        return Err(CardError::encoding(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ));
    }

    let mut cmd = Command::new("ffmpeg");
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    cmd.arg(if cfg.overwrite { "-y" } else { "-n" });
    cmd.args(["-loglevel", "error", "-framerate", &cfg.fps.to_string(), "-i"])
        .arg(&cfg.frame_pattern)
        .args([
            "-pix_fmt",
            "yuv420p",
            "-c:v",
            "libx264",
            "-preset",
            "medium",
            "-crf",
            "18",
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

    debug!(out = %cfg.out_path.display(), fps = cfg.fps, "invoking ffmpeg");

    let output = cmd.output().map_err(|e| {
        CardError::encoding(format!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CardError::encoding(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}
