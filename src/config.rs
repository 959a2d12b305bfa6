use std::path::{Path, PathBuf};

/// Font shipped alongside the binary; covers both Latin and Arabic.
pub const BUNDLED_FONT: &str = "fonts/IBMPlexSansArabic-Bold.ttf";

/// Environment variable overriding the default font file.
pub const FONT_FILE_ENV: &str = "FONT_FILE";

/// Explicit render configuration, resolved once at startup and passed into
/// the render routines (no ambient globals).
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Directory completed cards (and transient frame workspaces) live in.
    pub out_dir: PathBuf,
    /// Font used when a request does not name one.
    pub font_file: PathBuf,
}

impl RenderConfig {
    pub fn new(out_dir: impl Into<PathBuf>, font_file: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            font_file: font_file.into(),
        }
    }

    /// Resolution order for the default font: explicit override, then the
    /// `FONT_FILE` environment variable, then the bundled font.
    pub fn resolve(out_dir: impl Into<PathBuf>, font_override: Option<PathBuf>) -> Self {
        let font_file = font_override
            .or_else(|| std::env::var_os(FONT_FILE_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(BUNDLED_FONT));
        Self::new(out_dir, font_file)
    }

    /// The font a given request should use.
    pub fn font_for<'a>(&'a self, requested: Option<&'a Path>) -> &'a Path {
        requested.unwrap_or(&self.font_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let cfg = RenderConfig::resolve("out", Some(PathBuf::from("x.ttf")));
        assert_eq!(cfg.font_file, PathBuf::from("x.ttf"));
    }

    #[test]
    fn request_font_beats_configured_font() {
        let cfg = RenderConfig::new("out", "default.ttf");
        assert_eq!(cfg.font_for(None), Path::new("default.ttf"));
        assert_eq!(
            cfg.font_for(Some(Path::new("req.ttf"))),
            Path::new("req.ttf")
        );
    }
}
