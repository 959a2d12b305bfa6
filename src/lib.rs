//! Titlecard renders a short animated "title card" video (or a still
//! image) from a line of text: each character fades, rises and slides into
//! view with a per-character delay, and the frame sequence is encoded to
//! MP4 by the system `ffmpeg` binary.
//!
//! Bidirectional text is supported: Arabic is detected, joined into
//! presentation forms, and reordered to visual order before layout.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: [`CardRequest::validate`] rejects malformed requests
//!    before any work happens.
//! 2. **Shape**: script detection + best-effort Arabic shaping produce the
//!    visual character sequence.
//! 3. **Plan**: [`TimingPlan`] computes direction-aware per-character fade
//!    starts and the total frame count.
//! 4. **Compose**: [`CardScene`] rasterizes each frame deterministically.
//! 5. **Encode**: the ordered frame files are handed to `ffmpeg` once; the
//!    per-job workspace is removed after success.
#![forbid(unsafe_code)]

pub mod compose;
pub mod config;
pub mod ease;
pub mod encode_ffmpeg;
pub mod error;
pub mod metrics;
pub mod model;
pub mod raster;
pub mod render;
pub mod script;
pub mod shape;
pub mod still;
pub mod timing;
pub mod workspace;

pub use compose::CardScene;
pub use config::{BUNDLED_FONT, FONT_FILE_ENV, RenderConfig};
pub use ease::Ease;
pub use encode_ffmpeg::{EncodeConfig, encode_frames, is_ffmpeg_on_path};
pub use error::{CardError, CardResult};
pub use metrics::{LoadedFont, Measure, MeasureStrategy};
pub use model::{CardRequest, Direction, MAX_TEXT_CHARS, RenderedCard, ResolvedDir, Rgba8};
pub use raster::FrameRgba;
pub use render::render_title_card;
pub use script::looks_arabic;
pub use shape::shape_visual;
pub use still::render_still_card;
pub use timing::{GlyphState, SETTLE_TAIL_SEC, TimingPlan, glyph_state};
pub use workspace::{JobId, Workspace};
