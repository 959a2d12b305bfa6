//! Still-card variant: one PNG instead of a frame sequence.
//!
//! Layout goes through exactly one of two strategies per render, chosen
//! once from font capability: a shaping engine (rustybuzz) that handles
//! Arabic joining and direction natively over the raw text, or the manual
//! presentation-form reshaper with per-character placement. The two are
//! never mixed within one call.

use ab_glyph::GlyphId;
use anyhow::Context as _;
use rustybuzz::{Direction as ShapeDirection, Face, UnicodeBuffer};
use tracing::{debug, info};

use crate::{
    config::RenderConfig,
    error::CardResult,
    metrics::{LoadedFont, Measure},
    model::{CardRequest, RenderedCard},
    raster::{self, FrameRgba},
    render::save_frame_png,
    script, shape,
    workspace::JobId,
};

/// Horizontal margin kept clear on each side of the wrapped text block.
pub const STILL_PADDING_PX: f32 = 64.0;

enum LineLayout<'f> {
    Shaped(ShapedLayout<'f>),
    Manual(ManualLayout<'f>),
}

struct ShapedLayout<'f> {
    face: Face<'f>,
    font: &'f LoadedFont,
    px_per_unit: f32,
    rtl: bool,
}

struct ManualLayout<'f> {
    font: &'f LoadedFont,
}

impl<'f> LineLayout<'f> {
    /// Chosen once per render: the shaping engine when the face parses for
    /// it, the manual reshaper otherwise.
    fn select(font: &'f LoadedFont, rtl: bool) -> Self {
        match Face::from_slice(font.bytes(), 0) {
            Some(face) => {
                let upem = face.units_per_em() as f32;
                Self::Shaped(ShapedLayout {
                    face,
                    font,
                    px_per_unit: font.size() / upem,
                    rtl,
                })
            }
            None => Self::Manual(ManualLayout { font }),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Shaped(_) => "shaped",
            Self::Manual(_) => "manual",
        }
    }

    /// The text as this layout engine consumes it: raw for the shaping
    /// engine (it joins and reorders itself), reshaped visual text for the
    /// manual path.
    fn layout_text(&self, text: &str) -> String {
        match self {
            Self::Shaped(_) => text.to_string(),
            Self::Manual(_) => shape::shape_visual(text),
        }
    }

    fn draw_line(&self, frame: &mut FrameRgba, line: &str, x: f32, baseline: f32, color: [u8; 4]) {
        match self {
            Self::Shaped(s) => s.draw_line(frame, line, x, baseline, color),
            Self::Manual(m) => m.draw_line(frame, line, x, baseline, color),
        }
    }
}

impl Measure for LineLayout<'_> {
    fn width(&self, text: &str) -> f32 {
        match self {
            Self::Shaped(s) => s.width(text),
            Self::Manual(m) => m.font.width(text),
        }
    }
}

impl ShapedLayout<'_> {
    fn shape_line(&self, text: &str) -> rustybuzz::GlyphBuffer {
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.set_direction(if self.rtl {
            ShapeDirection::RightToLeft
        } else {
            ShapeDirection::LeftToRight
        });
        rustybuzz::shape(&self.face, &[], buffer)
    }

    fn width(&self, text: &str) -> f32 {
        let glyphs = self.shape_line(text);
        glyphs
            .glyph_positions()
            .iter()
            .map(|p| p.x_advance as f32 * self.px_per_unit)
            .sum()
    }

    fn draw_line(&self, frame: &mut FrameRgba, line: &str, x: f32, baseline: f32, color: [u8; 4]) {
        let glyphs = self.shape_line(line);
        let mut pen = x;
        for (info, pos) in glyphs
            .glyph_infos()
            .iter()
            .zip(glyphs.glyph_positions().iter())
        {
            let gx = pen + pos.x_offset as f32 * self.px_per_unit;
            let gy = baseline - pos.y_offset as f32 * self.px_per_unit;
            raster::draw_glyph(
                frame,
                self.font,
                GlyphId(info.glyph_id as u16),
                gx,
                gy,
                color,
            );
            pen += pos.x_advance as f32 * self.px_per_unit;
        }
    }
}

impl ManualLayout<'_> {
    fn draw_line(&self, frame: &mut FrameRgba, line: &str, x: f32, baseline: f32, color: [u8; 4]) {
        let mut pen = x;
        let mut prev: Option<GlyphId> = None;
        for c in line.chars() {
            let id = self.font.glyph_id(c);
            if let Some(p) = prev {
                pen += self.font.kern(p, id);
            }
            raster::draw_glyph(frame, self.font, id, pen, baseline, color);
            pen += self.font.h_advance(id);
            prev = Some(id);
        }
    }
}

/// Greedy character-by-character wrap: append while the measured width
/// stays within `avail`. A single over-wide character still gets its own
/// line. Explicit newlines are honored.
pub(crate) fn wrap_chars(measure: &dyn Measure, text: &str, avail: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for c in text.chars() {
        if c == '\n' {
            lines.push(std::mem::take(&mut line));
            continue;
        }
        let mut candidate = line.clone();
        candidate.push(c);
        if !line.is_empty() && measure.width(&candidate) > avail {
            lines.push(std::mem::take(&mut line));
            line.push(c);
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Renders a single still card PNG: `card_<job>.png` under the configured
/// output directory.
pub fn render_still_card(req: &CardRequest, cfg: &RenderConfig) -> CardResult<RenderedCard> {
    req.validate()?;

    let font_path = cfg.font_for(req.font_file.as_deref());
    let font = LoadedFont::load(font_path, req.font_size as f32)?;

    let is_arabic = script::looks_arabic(&req.text);
    let rtl = req.direction.resolve(is_arabic).is_rtl();

    let layout = LineLayout::select(&font, rtl);
    debug!(engine = layout.name(), rtl, "still-card layout");

    let avail = (req.width as f32 - 2.0 * STILL_PADDING_PX).max(1.0);
    let text = layout.layout_text(&req.text);
    let lines = wrap_chars(&layout, &text, avail);

    let mut frame = FrameRgba::new(req.width, req.height, req.bg);
    let line_height = font.line_height();
    let total_h = lines.len() as f32 * line_height;
    let first_baseline = (req.height as f32 - total_h) / 2.0 + font.ascent();

    for (i, line) in lines.iter().enumerate() {
        let line_w = layout.width(line);
        let x = (req.width as f32 - line_w) / 2.0;
        let baseline = first_baseline + i as f32 * line_height;

        if req.shadow[3] > 0 {
            layout.draw_line(&mut frame, line, x + 2.0, baseline + 2.0, req.shadow);
        }
        layout.draw_line(&mut frame, line, x, baseline, req.fill);
    }

    std::fs::create_dir_all(&cfg.out_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            cfg.out_dir.display()
        )
    })?;

    let file_name = format!("card_{}.png", JobId::new());
    let out_path = cfg.out_dir.join(&file_name);
    save_frame_png(&frame, &out_path)?;

    info!(out = %out_path.display(), lines = lines.len(), "still card written");
    Ok(RenderedCard {
        file_name,
        path: out_path,
        duration_sec: 0.0,
        total_frames: 1,
    })
}
