//! Per-character animation timing.
//!
//! The reading-first character always starts animating first: storage order
//! for LTR, reversed storage order for RTL (the compositor works on visual
//! text, whose storage order is left-to-right on screen).

use crate::{
    ease::Ease,
    error::{CardError, CardResult},
    model::ResolvedDir,
};

/// Settle time appended after the last fade-in completes, so the final
/// character is fully visible before the clip ends.
pub const SETTLE_TAIL_SEC: f64 = 0.6;

#[derive(Clone, Debug)]
pub struct TimingPlan {
    /// Per-character fade start, seconds, indexed in storage order.
    pub starts: Vec<f64>,
    /// Actual clip duration: the requested duration, extended if needed so
    /// every fade-in completes with [`SETTLE_TAIL_SEC`] to spare.
    pub duration_sec: f64,
    pub total_frames: u64,
    pub fps: u32,
}

impl TimingPlan {
    pub fn plan(
        char_count: usize,
        dir: ResolvedDir,
        letter_delay: f64,
        fade_dur: f64,
        total_dur: f64,
        fps: u32,
    ) -> CardResult<Self> {
        if char_count == 0 {
            return Err(CardError::validation("cannot plan timing for empty text"));
        }
        if fps == 0 {
            return Err(CardError::validation("fps must be > 0"));
        }

        let n = char_count;
        let starts: Vec<f64> = (0..n)
            .map(|i| {
                let slot = if dir.is_rtl() { n - 1 - i } else { i };
                slot as f64 * letter_delay
            })
            .collect();

        let last_start = starts.iter().copied().fold(0.0, f64::max);
        let min_total = last_start + fade_dur + SETTLE_TAIL_SEC;
        let duration_sec = total_dur.max(min_total);
        let total_frames = (duration_sec * f64::from(fps)).round() as u64;

        Ok(Self {
            starts,
            duration_sec,
            total_frames,
            fps,
        })
    }

    pub fn frame_time(&self, frame: u64) -> f64 {
        frame as f64 / f64::from(self.fps)
    }
}

/// Render state of one character at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphState {
    /// 0..=255, eased fade-in.
    pub alpha: u8,
    /// Horizontal slide remaining, signed (enters from the reading side).
    pub x_off: f64,
    /// Vertical rise remaining (characters rise upward as they appear).
    pub y_off: f64,
}

/// `None` until the character's fade has started; afterwards the eased
/// alpha/offset state. At `t0 + fade_dur` and beyond the character is fully
/// opaque with zero residual offsets.
pub fn glyph_state(
    t: f64,
    t0: f64,
    fade_dur: f64,
    ease: Ease,
    rise_px: f64,
    x_slide_px: f64,
    x_sign: f64,
) -> Option<GlyphState> {
    let local = (t - t0) / fade_dur;
    if local <= 0.0 {
        return None;
    }
    let eased = ease.apply(local.clamp(0.0, 1.0));
    Some(GlyphState {
        alpha: (255.0 * eased) as u8,
        x_off: x_sign * x_slide_px * (1.0 - eased),
        y_off: rise_px * (1.0 - eased),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ltr_two_char_scenario() {
        // "AB", ltr, delay 1.0, fade 0.5, fps 10, requested 1.0s.
        let plan = TimingPlan::plan(2, ResolvedDir::Ltr, 1.0, 0.5, 1.0, 10).unwrap();
        assert_eq!(plan.starts, vec![0.0, 1.0]);
        assert!((plan.duration_sec - 2.1).abs() < 1e-9);
        assert_eq!(plan.total_frames, 21);
    }

    #[test]
    fn rtl_reverses_start_order() {
        let plan = TimingPlan::plan(3, ResolvedDir::Rtl, 0.5, 0.2, 1.0, 10).unwrap();
        assert_eq!(plan.starts, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn starts_are_monotone_in_reading_order() {
        let ltr = TimingPlan::plan(5, ResolvedDir::Ltr, 0.06, 0.35, 5.0, 24).unwrap();
        assert!(ltr.starts.windows(2).all(|w| w[0] <= w[1]));

        let rtl = TimingPlan::plan(5, ResolvedDir::Rtl, 0.06, 0.35, 5.0, 24).unwrap();
        assert!(rtl.starts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn duration_always_covers_last_fade_plus_tail() {
        for n in [1usize, 2, 7, 40] {
            for requested in [0.1, 1.0, 30.0] {
                let plan =
                    TimingPlan::plan(n, ResolvedDir::Ltr, 0.06, 0.35, requested, 24).unwrap();
                let last = plan.starts.iter().copied().fold(0.0, f64::max);
                assert!(plan.duration_sec >= last + 0.35 + SETTLE_TAIL_SEC - 1e-9);
                assert!(plan.duration_sec >= requested);
            }
        }
    }

    #[test]
    fn generous_requested_duration_is_kept() {
        let plan = TimingPlan::plan(2, ResolvedDir::Ltr, 0.06, 0.35, 30.0, 24).unwrap();
        assert_eq!(plan.duration_sec, 30.0);
        assert_eq!(plan.total_frames, 720);
    }

    #[test]
    fn frame_count_is_rounded_duration_times_fps() {
        let plan = TimingPlan::plan(1, ResolvedDir::Ltr, 0.0, 0.35, 5.0, 24).unwrap();
        assert_eq!(plan.total_frames, (plan.duration_sec * 24.0).round() as u64);
        assert_eq!(plan.frame_time(24), 1.0);
    }

    #[test]
    fn empty_text_is_a_planning_error() {
        assert!(TimingPlan::plan(0, ResolvedDir::Ltr, 0.06, 0.35, 5.0, 24).is_err());
    }

    #[test]
    fn not_started_yet_renders_nothing() {
        assert!(glyph_state(0.0, 0.5, 0.35, Ease::OutCubic, 40.0, 30.0, 1.0).is_none());
        // Exactly at the start the contribution is still empty.
        assert!(glyph_state(0.5, 0.5, 0.35, Ease::OutCubic, 40.0, 30.0, 1.0).is_none());
    }

    #[test]
    fn fully_faded_in_has_no_residual_offsets() {
        let s = glyph_state(0.85, 0.5, 0.35, Ease::OutCubic, 40.0, 30.0, 1.0).unwrap();
        assert_eq!(s.alpha, 255);
        assert_eq!(s.x_off, 0.0);
        assert_eq!(s.y_off, 0.0);

        let later = glyph_state(9.0, 0.5, 0.35, Ease::OutCubic, 40.0, 30.0, 1.0).unwrap();
        assert_eq!(later, s);
    }

    #[test]
    fn mid_fade_slides_from_the_reading_side() {
        let ltr = glyph_state(0.1, 0.0, 0.35, Ease::OutCubic, 40.0, 30.0, 1.0).unwrap();
        assert!(ltr.x_off > 0.0);
        assert!(ltr.y_off > 0.0);
        assert!(ltr.alpha > 0 && ltr.alpha < 255);

        let rtl = glyph_state(0.1, 0.0, 0.35, Ease::OutCubic, 40.0, 30.0, -1.0).unwrap();
        assert_eq!(rtl.x_off, -ltr.x_off);
    }
}
