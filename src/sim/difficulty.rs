//! Difficulty curve
//!
//! Progress (hits / max hits) drives two things: the reticle gets faster and the
//! window the next target is placed in gets narrower. Note the bounds are named
//! after their extremes, so `max_min_offset` is where the lower bound *starts*.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::lerp;

/// Balance parameters for a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Angular speed at progress 0 (rad/s)
    pub min_speed: f32,
    /// Angular speed at progress 1 (rad/s)
    pub max_speed: f32,
    /// Lower offset bound at progress 1
    pub min_min_offset: f32,
    /// Lower offset bound at progress 0
    pub max_min_offset: f32,
    /// Upper offset bound at progress 1
    pub min_max_offset: f32,
    /// Upper offset bound at progress 0
    pub max_max_offset: f32,
    /// Largest distance that still counts as a hit (radians)
    pub hit_threshold: f32,
    /// Hits needed to win
    pub max_hits: u32,
}

impl Default for DifficultyParams {
    fn default() -> Self {
        Self {
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            min_min_offset: MIN_MIN_OFFSET,
            max_min_offset: MAX_MIN_OFFSET,
            min_max_offset: MIN_MAX_OFFSET,
            max_max_offset: MAX_MAX_OFFSET,
            hit_threshold: HIT_THRESHOLD,
            max_hits: MAX_HIT_COUNT,
        }
    }
}

/// Fraction of the run completed, in [0, 1]
#[inline]
pub fn progress(hits: u32, max_hits: u32) -> f32 {
    hits as f32 / max_hits as f32
}

impl DifficultyParams {
    /// Range the next target offset is drawn from
    pub fn target_offset_range(&self, progress: f32) -> (f32, f32) {
        (
            lerp(self.max_min_offset, self.min_min_offset, progress),
            lerp(self.max_max_offset, self.min_max_offset, progress),
        )
    }

    /// Reticle angular speed (rad/s)
    pub fn angular_speed(&self, progress: f32) -> f32 {
        lerp(self.min_speed, self.max_speed, progress)
    }

    /// Draw a target offset uniformly from the current range
    pub fn pick_target_offset<R: Rng>(&self, progress: f32, rng: &mut R) -> f32 {
        let (min_offset, max_offset) = self.target_offset_range(progress);
        if max_offset <= min_offset {
            return min_offset;
        }
        rng.random_range(min_offset..=max_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::TAU;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_progress_endpoints() {
        assert_eq!(progress(0, 50), 0.0);
        assert_eq!(progress(50, 50), 1.0);
        assert!((progress(25, 50) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_offset_range_endpoints() {
        let params = DifficultyParams::default();
        let (lo, hi) = params.target_offset_range(0.0);
        assert!((lo - TAU / 4.0).abs() < EPS);
        assert!((hi - TAU / 2.0).abs() < EPS);

        let (lo, hi) = params.target_offset_range(1.0);
        assert!((lo - TAU / 8.0).abs() < EPS);
        assert!((hi - TAU / 3.0).abs() < EPS);
    }

    #[test]
    fn test_speed_endpoints() {
        let params = DifficultyParams::default();
        assert!((params.angular_speed(0.0) - 1.5).abs() < EPS);
        assert!((params.angular_speed(1.0) - 4.0).abs() < EPS);
    }

    #[test]
    fn test_pick_offset_within_range() {
        let params = DifficultyParams::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for hits in 0..=50 {
            let p = progress(hits, 50);
            let (lo, hi) = params.target_offset_range(p);
            for _ in 0..20 {
                let offset = params.pick_target_offset(p, &mut rng);
                assert!(offset >= lo && offset <= hi, "{offset} not in [{lo}, {hi}]");
            }
        }
    }

    #[test]
    fn test_pick_offset_degenerate_range() {
        let params = DifficultyParams {
            max_min_offset: 1.0,
            max_max_offset: 1.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(params.pick_target_offset(0.0, &mut rng), 1.0);
    }

    proptest! {
        #[test]
        fn prop_curve_gets_harder(a in 0u32..50, step in 1u32..=50) {
            let b = (a + step).min(50);
            prop_assume!(b > a);
            let params = DifficultyParams::default();
            let (pa, pb) = (progress(a, 50), progress(b, 50));

            prop_assert!(params.angular_speed(pb) > params.angular_speed(pa));

            let (lo_a, hi_a) = params.target_offset_range(pa);
            let (lo_b, hi_b) = params.target_offset_range(pb);
            prop_assert!(lo_b < lo_a);
            prop_assert!(hi_b < hi_a);
        }
    }
}
