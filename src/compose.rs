//! Frame compositing for the animated card: a prepared [`CardScene`] plus a
//! time instant deterministically produce one RGBA frame.

use crate::{
    ease::Ease,
    error::CardResult,
    metrics::{LoadedFont, Measure},
    model::{CardRequest, ResolvedDir, Rgba8},
    raster::{self, FrameRgba},
    timing::{TimingPlan, glyph_state},
};

/// Everything the per-frame loop needs, computed once per render:
/// visual characters, fade starts, cumulative advances, and centering.
#[derive(Debug)]
pub struct CardScene {
    pub width: u32,
    pub height: u32,
    pub bg: Rgba8,
    pub fill: Rgba8,
    pub shadow: Rgba8,
    pub stroke_w: u32,
    pub stroke_fill: Rgba8,
    pub chars: Vec<char>,
    /// Prefix width up to (excluding) each character, px.
    pub advances: Vec<f32>,
    pub base_x: f32,
    pub baseline_y: f32,
    pub x_sign: f64,
    pub rise_px: f64,
    pub x_slide_px: f64,
    pub fade_dur: f64,
    pub ease: Ease,
    pub timing: TimingPlan,
}

/// Cumulative prefix widths for each character of the visual text, plus the
/// total block width. Measured on whole substrings so kerning-aware
/// strategies stay consistent with the full-width measurement.
pub(crate) fn prefix_advances(measure: &dyn Measure, chars: &[char]) -> (Vec<f32>, f32) {
    let mut advances = Vec::with_capacity(chars.len());
    let mut prefix = String::new();
    for &c in chars {
        advances.push(measure.width(&prefix));
        prefix.push(c);
    }
    let total = measure.width(&prefix);
    (advances, total)
}

impl CardScene {
    pub fn build(
        req: &CardRequest,
        vis_text: &str,
        dir: ResolvedDir,
        font: &LoadedFont,
    ) -> CardResult<Self> {
        let chars: Vec<char> = vis_text.chars().collect();
        let timing = TimingPlan::plan(
            chars.len(),
            dir,
            req.letter_delay,
            req.fade_dur,
            req.total_dur,
            req.fps,
        )?;

        let (advances, total_w) = prefix_advances(font, &chars);
        let base_x = (req.width as f32 - total_w) / 2.0;
        // The glyph box top sits slightly above center; baseline is that
        // top plus the font ascent.
        let top_y = req.height as f32 / 2.0 - req.font_size as f32 / 2.8;
        let baseline_y = top_y + font.ascent();

        Ok(Self {
            width: req.width,
            height: req.height,
            bg: req.bg,
            fill: req.fill,
            shadow: req.shadow,
            stroke_w: req.stroke_w,
            stroke_fill: req.stroke_fill,
            chars,
            advances,
            base_x,
            baseline_y,
            x_sign: dir.x_sign(),
            rise_px: f64::from(req.rise_px),
            x_slide_px: f64::from(req.x_slide_px),
            fade_dur: req.fade_dur,
            ease: req.ease,
            timing,
        })
    }

    /// Composites the frame at time `t` (seconds). Characters whose fade
    /// has not started contribute nothing; the rest get a shadow pass at
    /// +2/+2 and then the glyph itself (with optional stroke outline).
    pub fn compose_frame(&self, font: &LoadedFont, t: f64) -> FrameRgba {
        let mut frame = FrameRgba::new(self.width, self.height, self.bg);

        for (i, &c) in self.chars.iter().enumerate() {
            let Some(state) = glyph_state(
                t,
                self.timing.starts[i],
                self.fade_dur,
                self.ease,
                self.rise_px,
                self.x_slide_px,
                self.x_sign,
            ) else {
                continue;
            };

            let x = (f64::from(self.base_x + self.advances[i]) + state.x_off).floor() as f32;
            let y = (f64::from(self.baseline_y) + state.y_off).floor() as f32;

            if self.shadow[3] > 0 {
                let shadow = raster::scale_alpha(self.shadow, state.alpha);
                raster::draw_glyph(&mut frame, font, font.glyph_id(c), x + 2.0, y + 2.0, shadow);
            }

            let fill = [self.fill[0], self.fill[1], self.fill[2], state.alpha];
            let stroke = raster::scale_alpha(self.stroke_fill, state.alpha);
            raster::draw_char(&mut frame, font, c, x, y, fill, self.stroke_w, stroke);
        }

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedWidth(f32);

    impl Measure for FixedWidth {
        fn width(&self, text: &str) -> f32 {
            text.chars().count() as f32 * self.0
        }
    }

    #[test]
    fn prefix_advances_accumulate_per_character() {
        let chars: Vec<char> = "abcd".chars().collect();
        let (advances, total) = prefix_advances(&FixedWidth(10.0), &chars);
        assert_eq!(advances, vec![0.0, 10.0, 20.0, 30.0]);
        assert_eq!(total, 40.0);
    }

    #[test]
    fn single_character_starts_at_zero() {
        let chars: Vec<char> = "x".chars().collect();
        let (advances, total) = prefix_advances(&FixedWidth(7.0), &chars);
        assert_eq!(advances, vec![0.0]);
        assert_eq!(total, 7.0);
    }
}
