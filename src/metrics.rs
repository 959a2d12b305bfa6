//! Font loading and text measurement.
//!
//! Width measurement goes through one of several strategies, checked in a
//! fixed order once at load time (not probed per call): kerned advances
//! when the face exposes an em square, plain advances when it at least has
//! scalable vertical metrics, and outline bounding boxes as the last
//! resort.

use std::path::Path;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};

use crate::error::{CardError, CardResult};

/// Width measurement seam, so layout logic can be tested with a
/// fixed-width fake.
pub trait Measure {
    fn width(&self, text: &str) -> f32;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasureStrategy {
    /// Horizontal advances plus pair kerning.
    KernedAdvance,
    /// Horizontal advances only.
    AdvanceOnly,
    /// Union of outline bounding boxes (advance for blank glyphs).
    OutlineBounds,
}

const STRATEGY_ORDER: [MeasureStrategy; 3] = [
    MeasureStrategy::KernedAdvance,
    MeasureStrategy::AdvanceOnly,
    MeasureStrategy::OutlineBounds,
];

impl MeasureStrategy {
    fn supported(self, font: &FontArc) -> bool {
        match self {
            Self::KernedAdvance => font.units_per_em().is_some(),
            Self::AdvanceOnly => font.height_unscaled() > 0.0,
            Self::OutlineBounds => true,
        }
    }

    fn choose(font: &FontArc) -> Self {
        STRATEGY_ORDER
            .into_iter()
            .find(|s| s.supported(font))
            .unwrap_or(MeasureStrategy::OutlineBounds)
    }
}

/// A font resource loaded once per render: parsed face, pixel scale for the
/// requested size, and the measurement strategy chosen for it.
///
/// The raw bytes are retained so the still-card path can hand the same face
/// to its shaping engine.
#[derive(Debug)]
pub struct LoadedFont {
    bytes: Vec<u8>,
    font: FontArc,
    scale: PxScale,
    strategy: MeasureStrategy,
    size: f32,
}

impl LoadedFont {
    pub fn load(path: &Path, size: f32) -> CardResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            CardError::font_load(format!("cannot read font file '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes, size).map_err(|e| match e {
            CardError::FontLoad(msg) => {
                CardError::font_load(format!("'{}': {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_bytes(bytes: Vec<u8>, size: f32) -> CardResult<Self> {
        if !(size > 0.0) {
            return Err(CardError::validation("font size must be > 0"));
        }
        let font = FontArc::try_from_vec(bytes.clone())
            .map_err(|e| CardError::font_load(format!("unreadable font data: {e}")))?;
        let scale = em_px_scale(&font, size);
        let strategy = MeasureStrategy::choose(&font);
        Ok(Self {
            bytes,
            font,
            scale,
            strategy,
            size,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }

    pub fn scale(&self) -> PxScale {
        self.scale
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn strategy(&self) -> MeasureStrategy {
        self.strategy
    }

    pub fn glyph_id(&self, c: char) -> GlyphId {
        self.font.glyph_id(c)
    }

    pub fn ascent(&self) -> f32 {
        self.font.as_scaled(self.scale).ascent()
    }

    pub fn descent(&self) -> f32 {
        self.font.as_scaled(self.scale).descent()
    }

    /// Baseline-to-baseline distance for stacked lines.
    pub fn line_height(&self) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        scaled.height() + scaled.line_gap()
    }

    pub fn h_advance(&self, id: GlyphId) -> f32 {
        self.font.as_scaled(self.scale).h_advance(id)
    }

    pub fn kern(&self, first: GlyphId, second: GlyphId) -> f32 {
        self.font.as_scaled(self.scale).kern(first, second)
    }

    fn width_advances(&self, text: &str, kerned: bool) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut w = 0.0;
        let mut prev: Option<GlyphId> = None;
        for c in text.chars() {
            let id = self.font.glyph_id(c);
            if kerned && let Some(p) = prev {
                w += scaled.kern(p, id);
            }
            w += scaled.h_advance(id);
            prev = Some(id);
        }
        w
    }

    fn width_outline_bounds(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut w = 0.0;
        for c in text.chars() {
            let id = self.font.glyph_id(c);
            let glyph = id.with_scale_and_position(self.scale, point(0.0, 0.0));
            match self.font.outline_glyph(glyph) {
                Some(outlined) => w += outlined.px_bounds().width(),
                // Blank glyphs (spaces) have no outline but still advance.
                None => w += scaled.h_advance(id),
            }
        }
        w
    }
}

impl Measure for LoadedFont {
    fn width(&self, text: &str) -> f32 {
        match self.strategy {
            MeasureStrategy::KernedAdvance => self.width_advances(text, true),
            MeasureStrategy::AdvanceOnly => self.width_advances(text, false),
            MeasureStrategy::OutlineBounds => self.width_outline_bounds(text),
        }
    }
}

/// Pixel scale such that the font's em square maps to `size` pixels,
/// matching how FreeType-style renderers interpret a point size.
fn em_px_scale(font: &FontArc, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(size * font.height_unscaled() / upem),
        _ => PxScale::from(size),
    }
}
