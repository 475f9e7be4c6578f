//! Layout configuration.
//!
//! Every field has a default, and the struct deserializes from a camelCase
//! object where any subset of fields may be given, so JavaScript callers can
//! override just the canvas size or a single zone.

use serde::{Deserialize, Serialize};

use super::trunk::TrunkCurve;
use crate::graph::Level;

/// Configuration for the bottom-up skill tree layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Canvas width in world pixels.
    pub world_width: f32,
    /// Canvas height in world pixels.
    pub world_height: f32,
    /// Band center as a fraction of `world_height`, per level (1, 2, 3).
    pub zone_fractions: [f32; 3],
    /// Half-width of the horizontal spread, per level (1, 2, 3).
    pub level_spreads: [f32; 3],
    /// Band sizes up to `row_thresholds[0]` use one row, up to
    /// `row_thresholds[1]` two rows, anything larger three.
    pub row_thresholds: [usize; 2],
    /// Vertical distance between rows of the same band.
    pub row_gap: f32,
    /// Node box width, used for hit testing.
    pub node_width: f32,
    /// Node box height, used for hit testing.
    pub node_height: f32,
    /// Distance of the initial camera focus above the bottom edge.
    pub focus_inset: f32,
    /// Organic centerline nudge.
    pub trunk: TrunkCurve,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            world_width: 1400.0,
            world_height: 900.0,
            zone_fractions: [0.85, 0.5, 0.15],
            level_spreads: [640.0, 600.0, 560.0],
            row_thresholds: [8, 16],
            row_gap: 56.0,
            node_width: 128.0,
            node_height: 32.0,
            focus_inset: 120.0,
            trunk: TrunkCurve::default(),
        }
    }
}

impl LayoutConfig {
    /// Override the canvas extent.
    pub fn with_world_size(mut self, width: f32, height: f32) -> Self {
        self.world_width = width;
        self.world_height = height;
        self
    }

    /// Replace the trunk curve.
    pub fn with_trunk(mut self, trunk: TrunkCurve) -> Self {
        self.trunk = trunk;
        self
    }

    /// Horizontal midpoint of the canvas.
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.world_width / 2.0
    }

    /// Nominal y of a level's band.
    #[inline]
    pub fn zone_y(&self, level: Level) -> f32 {
        self.zone_fractions[level.index()] * self.world_height
    }

    #[inline]
    pub fn spread(&self, level: Level) -> f32 {
        self.level_spreads[level.index()]
    }

    /// Number of rows for a band of `count` nodes.
    pub fn row_count(&self, count: usize) -> usize {
        if count <= self.row_thresholds[0] {
            1
        } else if count <= self.row_thresholds[1] {
            2
        } else {
            3
        }
    }

    /// Initial camera center: horizontally centered, near the roots.
    pub fn focus_point(&self) -> (f32, f32) {
        (self.center_x(), self.world_height - self.focus_inset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zones_bottom_up() {
        let config = LayoutConfig::default();
        assert!(config.zone_y(Level::Foundation) > config.zone_y(Level::Intermediate));
        assert!(config.zone_y(Level::Intermediate) > config.zone_y(Level::Advanced));
        assert!((config.zone_y(Level::Intermediate) - 450.0).abs() < 1e-3);
        assert_eq!(config.center_x(), 700.0);
    }

    #[test]
    fn test_row_count_thresholds() {
        let config = LayoutConfig::default();
        assert_eq!(config.row_count(0), 1);
        assert_eq!(config.row_count(8), 1);
        assert_eq!(config.row_count(9), 2);
        assert_eq!(config.row_count(16), 2);
        assert_eq!(config.row_count(17), 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"worldWidth": 2000, "trunk": {"amplitude": 0}}"#).unwrap();

        assert_eq!(config.world_width, 2000.0);
        assert_eq!(config.world_height, 900.0);
        assert_eq!(config.trunk.amplitude, 0.0);
        assert_eq!(config.trunk.phase_step, TrunkCurve::default().phase_step);
        assert_eq!(config.row_thresholds, [8, 16]);
    }

    #[test]
    fn test_focus_point() {
        let config = LayoutConfig::default().with_world_size(1000.0, 600.0);
        assert_eq!(config.focus_point(), (500.0, 480.0));
    }
}
