use std::path::PathBuf;

use crate::{
    ease::Ease,
    error::{CardError, CardResult},
};

pub type Rgba8 = [u8; 4];

pub const MAX_TEXT_CHARS: usize = 120;

/// Requested text direction. `Auto` resolves from script detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Auto,
    Ltr,
    Rtl,
}

impl Direction {
    pub fn resolve(self, text_is_arabic: bool) -> ResolvedDir {
        match self {
            Self::Ltr => ResolvedDir::Ltr,
            Self::Rtl => ResolvedDir::Rtl,
            Self::Auto => {
                if text_is_arabic {
                    ResolvedDir::Rtl
                } else {
                    ResolvedDir::Ltr
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedDir {
    Ltr,
    Rtl,
}

impl ResolvedDir {
    pub fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }

    /// Slide-in direction: characters enter from the reading side.
    pub fn x_sign(self) -> f64 {
        match self {
            Self::Ltr => 1.0,
            Self::Rtl => -1.0,
        }
    }
}

/// One title-card render request. Immutable once constructed; fully
/// determines the output apart from the random job-id in the file name.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CardRequest {
    pub text: String,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default = "d_width")]
    pub width: u32,
    #[serde(default = "d_height")]
    pub height: u32,
    #[serde(default = "d_fps")]
    pub fps: u32,
    #[serde(default = "d_total_dur")]
    pub total_dur: f64,
    #[serde(default = "d_letter_delay")]
    pub letter_delay: f64,
    #[serde(default = "d_fade_dur")]
    pub fade_dur: f64,
    #[serde(default = "d_rise_px")]
    pub rise_px: i32,
    #[serde(default = "d_x_slide_px")]
    pub x_slide_px: i32,
    #[serde(default = "d_font_size")]
    pub font_size: u32,
    /// Overrides the configured font when set.
    #[serde(default)]
    pub font_file: Option<PathBuf>,
    #[serde(default)]
    pub ease: Ease,
    #[serde(default = "d_bg")]
    pub bg: Rgba8,
    #[serde(default = "d_fill")]
    pub fill: Rgba8,
    #[serde(default = "d_shadow")]
    pub shadow: Rgba8,
    #[serde(default)]
    pub stroke_w: u32,
    #[serde(default = "d_stroke_fill")]
    pub stroke_fill: Rgba8,
}

fn d_width() -> u32 {
    1920
}
fn d_height() -> u32 {
    1080
}
fn d_fps() -> u32 {
    24
}
fn d_total_dur() -> f64 {
    5.0
}
fn d_letter_delay() -> f64 {
    0.06
}
fn d_fade_dur() -> f64 {
    0.35
}
fn d_rise_px() -> i32 {
    40
}
fn d_x_slide_px() -> i32 {
    30
}
fn d_font_size() -> u32 {
    96
}
fn d_bg() -> Rgba8 {
    [0, 0, 0, 255]
}
fn d_fill() -> Rgba8 {
    [255, 255, 255, 255]
}
fn d_shadow() -> Rgba8 {
    [0, 0, 0, 110]
}
fn d_stroke_fill() -> Rgba8 {
    [0, 0, 0, 160]
}

impl CardRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            direction: Direction::Auto,
            width: d_width(),
            height: d_height(),
            fps: d_fps(),
            total_dur: d_total_dur(),
            letter_delay: d_letter_delay(),
            fade_dur: d_fade_dur(),
            rise_px: d_rise_px(),
            x_slide_px: d_x_slide_px(),
            font_size: d_font_size(),
            font_file: None,
            ease: Ease::default(),
            bg: d_bg(),
            fill: d_fill(),
            shadow: d_shadow(),
            stroke_w: 0,
            stroke_fill: d_stroke_fill(),
        }
    }

    pub fn validate(&self) -> CardResult<()> {
        let n = self.text.chars().count();
        if n == 0 {
            return Err(CardError::validation("text must be non-empty"));
        }
        if n > MAX_TEXT_CHARS {
            return Err(CardError::validation(format!(
                "text is {n} characters, maximum is {MAX_TEXT_CHARS}"
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(CardError::validation("width/height must be > 0"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p output subsamples chroma 2x2.
            return Err(CardError::validation(
                "width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.fps == 0 {
            return Err(CardError::validation("fps must be > 0"));
        }
        if !(self.total_dur.is_finite() && self.total_dur > 0.0) {
            return Err(CardError::validation("total_dur must be > 0"));
        }
        if !(self.letter_delay.is_finite() && self.letter_delay >= 0.0) {
            return Err(CardError::validation("letter_delay must be >= 0"));
        }
        if !(self.fade_dur.is_finite() && self.fade_dur > 0.0) {
            return Err(CardError::validation("fade_dur must be > 0"));
        }
        if self.font_size == 0 {
            return Err(CardError::validation("font_size must be > 0"));
        }
        Ok(())
    }
}

/// A completed render: where the output landed and what was produced.
#[derive(Clone, Debug)]
pub struct RenderedCard {
    pub file_name: String,
    pub path: PathBuf,
    pub duration_sec: f64,
    pub total_frames: u64,
}
