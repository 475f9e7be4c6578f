//! Trunk curve nudge.
//!
//! After banding, each node's x is blended toward a sinusoidal centerline:
//!
//! ```text
//! trunk_x = cx + amplitude * sin(phase_offset + (level - 1) * phase_step)
//! final_x = trunk_x + (raw_x - cx) * level_weight
//! ```
//!
//! Lower levels use smaller weights, so the roots gather into a narrow trunk
//! while the canopy keeps its spread.

use serde::{Deserialize, Serialize};

use crate::graph::Level;

/// Parameters of the trunk curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrunkCurve {
    /// Horizontal swing of the centerline, in world pixels.
    pub amplitude: f32,
    /// Phase of level 1, in radians.
    pub phase_offset: f32,
    /// Phase advance per level, in radians.
    pub phase_step: f32,
    /// Spread multiplier per level (1, 2, 3).
    pub level_weights: [f32; 3],
}

impl Default for TrunkCurve {
    fn default() -> Self {
        Self {
            amplitude: 36.0,
            phase_offset: 0.0,
            phase_step: 1.1,
            level_weights: [0.7, 0.85, 1.0],
        }
    }
}

impl TrunkCurve {
    /// A curve that leaves every position untouched.
    pub fn straight() -> Self {
        Self {
            amplitude: 0.0,
            phase_offset: 0.0,
            phase_step: 0.0,
            level_weights: [1.0; 3],
        }
    }

    /// Centerline x for a level.
    #[inline]
    pub fn trunk_x(&self, level: Level, center_x: f32) -> f32 {
        let phase = self.phase_offset + level.index() as f32 * self.phase_step;
        center_x + self.amplitude * phase.sin()
    }

    /// Blend a raw band position toward the centerline.
    #[inline]
    pub fn nudge(&self, raw_x: f32, center_x: f32, level: Level) -> f32 {
        self.trunk_x(level, center_x) + (raw_x - center_x) * self.level_weights[level.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_is_identity() {
        let curve = TrunkCurve::straight();
        for level in Level::ALL {
            assert_eq!(curve.nudge(123.0, 700.0, level), 123.0);
            assert_eq!(curve.trunk_x(level, 700.0), 700.0);
        }
    }

    #[test]
    fn test_level_one_trunk_is_centered_by_default() {
        let curve = TrunkCurve::default();
        let x = curve.trunk_x(Level::Foundation, 700.0);
        assert!((x - 700.0).abs() < 1e-4, "expected centered trunk, got {x}");
    }

    #[test]
    fn test_lower_levels_pulled_harder() {
        let curve = TrunkCurve::default();
        let cx = 700.0;
        let raw = cx + 400.0;

        let offset = |level: Level| (curve.nudge(raw, cx, level) - curve.trunk_x(level, cx)).abs();

        assert!((offset(Level::Foundation) - 280.0).abs() < 1e-3);
        assert!(offset(Level::Foundation) < offset(Level::Intermediate));
        assert!(offset(Level::Intermediate) < offset(Level::Advanced));
        assert!((offset(Level::Advanced) - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_center_maps_to_trunk() {
        let curve = TrunkCurve {
            amplitude: 50.0,
            phase_offset: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        };
        let x = curve.nudge(700.0, 700.0, Level::Foundation);
        assert!((x - 750.0).abs() < 1e-3, "sin(pi/2) swing should land at 750, got {x}");
    }
}
