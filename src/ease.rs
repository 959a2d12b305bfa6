#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    OutQuad,
    #[default]
    OutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_stable() {
        for ease in [Ease::Linear, Ease::OutQuad, Ease::OutCubic] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
    }

    #[test]
    fn monotonic_spot_check() {
        for ease in [Ease::Linear, Ease::OutQuad, Ease::OutCubic] {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b);
            assert!(b < c);
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(Ease::OutCubic.apply(-1.0), 0.0);
        assert_eq!(Ease::OutCubic.apply(2.0), 1.0);
    }

    #[test]
    fn out_cubic_front_loads_motion() {
        // Half the fade time should already be past 80% progress.
        assert!(Ease::OutCubic.apply(0.5) > 0.8);
    }
}
