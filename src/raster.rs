//! CPU glyph rasterization onto a straight-alpha RGBA8 canvas.

use ab_glyph::{Font, GlyphId, point};

use crate::metrics::LoadedFont;

/// One raster frame. Pixels are straight-alpha RGBA8; the canvas starts
/// from an opaque background, so composited output stays opaque.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRgba {
    pub fn new(width: u32, height: u32, bg: [u8; 4]) -> Self {
        let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&bg);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Source-over blend of a straight-alpha color at (x, y); off-canvas
    /// coordinates are ignored.
    pub fn blend_px(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let a = u16::from(color[3]);
        if a == 0 {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let dst = &mut self.data[idx..idx + 4];
        if a == 255 {
            dst[0] = color[0];
            dst[1] = color[1];
            dst[2] = color[2];
            return;
        }
        let inv = 255 - a;
        dst[0] = (mul_div255(u16::from(color[0]), a) + mul_div255(u16::from(dst[0]), inv)) as u8;
        dst[1] = (mul_div255(u16::from(color[1]), a) + mul_div255(u16::from(dst[1]), inv)) as u8;
        dst[2] = (mul_div255(u16::from(color[2]), a) + mul_div255(u16::from(dst[2]), inv)) as u8;
    }
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Scales a color's alpha channel by `alpha` (0..=255).
pub fn scale_alpha(color: [u8; 4], alpha: u8) -> [u8; 4] {
    [
        color[0],
        color[1],
        color[2],
        mul_div255(u16::from(color[3]), u16::from(alpha)) as u8,
    ]
}

/// Rasterizes one glyph by id with its origin on the given baseline.
pub fn draw_glyph(frame: &mut FrameRgba, font: &LoadedFont, id: GlyphId, x: f32, baseline: f32, color: [u8; 4]) {
    let glyph = id.with_scale_and_position(font.scale(), point(x, baseline));
    let Some(outlined) = font.font().outline_glyph(glyph) else {
        return; // blank glyph (space)
    };
    let bounds = outlined.px_bounds();
    let min_x = bounds.min.x as i64;
    let min_y = bounds.min.y as i64;
    outlined.draw(|gx, gy, coverage| {
        let a = (coverage.clamp(0.0, 1.0) * f32::from(color[3])) as u8;
        if a > 0 {
            frame.blend_px(
                min_x + i64::from(gx),
                min_y + i64::from(gy),
                [color[0], color[1], color[2], a],
            );
        }
    });
}

/// Rasterizes one character, with an optional outline drawn first as a
/// ring of offset passes (so the fill sits on top of the stroke).
pub fn draw_char(
    frame: &mut FrameRgba,
    font: &LoadedFont,
    c: char,
    x: f32,
    baseline: f32,
    color: [u8; 4],
    stroke_w: u32,
    stroke_color: [u8; 4],
) {
    let id = font.glyph_id(c);
    if stroke_w > 0 && stroke_color[3] > 0 {
        let w = stroke_w as i64;
        for dy in -w..=w {
            for dx in -w..=w {
                if dx * dx + dy * dy > w * w {
                    continue;
                }
                draw_glyph(
                    frame,
                    font,
                    id,
                    x + dx as f32,
                    baseline + dy as f32,
                    stroke_color,
                );
            }
        }
    }
    draw_glyph(frame, font, id, x, baseline, color);
}
