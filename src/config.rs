// Generation and carving constants, exposed as named fields instead of magic
// literals so the host can tune a match without a rebuild.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("world dimensions must be positive, got {width}x{height}")]
    BadWorldSize { width: f32, height: f32 },
    #[error("cell_size must be at least 1")]
    ZeroCellSize,
    #[error("{name} must lie within [{lo}, {hi}]")]
    OutOfRange { name: &'static str, lo: f32, hi: f32 },
    #[error("{name}: min exceeds max")]
    InvertedRange { name: &'static str },
}

/// All tuning for one battlefield. World units are pre-scale screen pixels;
/// `cell_size` world pixels map onto one terrain cell.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Full map width in world units, sky buffer included.
    pub world_width: f32,
    /// Full map height in world units.
    pub world_height: f32,
    /// World pixels per terrain cell edge. Coarser = cheaper carving.
    pub cell_size: u32,
    /// Fraction of the map width left as empty sky buffer on each side;
    /// terrain and spawns stay inside the remaining playable band.
    pub playable_margin: f32,

    /// Lowest surface the heightfield may produce, as a fraction of map
    /// height measured from the bottom.
    pub min_height_frac: f32,
    /// Highest surface the heightfield may produce.
    pub max_height_frac: f32,
    /// Width of the taper band at each playable edge, as a fraction of the
    /// playable width.
    pub edge_taper_frac: f32,
    /// Height factor the edge taper pulls toward, so matches never open on a
    /// cliff at the map border.
    pub edge_baseline: f32,

    /// How many mountain/valley features a match rolls.
    pub feature_count_min: u32,
    pub feature_count_max: u32,
    /// Base height-factor push of one feature before its random scale.
    pub feature_strength: f32,
    /// Base half-width of one feature as a fraction of the playable width.
    pub feature_width_frac: f32,

    /// Base cave seeding threshold; the depth ramp scales it up to this value.
    pub cave_threshold: f32,
    /// Depth in cells over which cave likelihood ramps to full strength.
    pub cave_depth_ramp: f32,
    /// Rows directly below the surface where cave seeds are heavily damped.
    pub cave_shallow_rows: u32,
    /// Cellular-automata smoothing iterations over the cave mask.
    pub cave_smooth_iterations: u32,
    /// A cell stays solid while its 5x5 window holds at least this many solid
    /// cells (out of 25).
    pub cave_neighbour_threshold: u32,
    /// Rows below the surface that the cave apply step never clears.
    pub cave_surface_margin: u32,

    /// Peak horizontal shear displacement in cells.
    pub shear_amplitude: f32,
    /// Row-to-row frequency of the shear sine wave.
    pub shear_frequency: f32,
    /// Extra noise-driven shear displacement in cells.
    pub shear_noise_amplitude: f32,

    pub arch_count_min: u32,
    pub arch_count_max: u32,
    /// Arch ellipse horizontal semi-axis range, in cells.
    pub arch_rx_min: u32,
    pub arch_rx_max: u32,
    /// Arch ellipse vertical semi-axis range, in cells.
    pub arch_ry_min: u32,
    pub arch_ry_max: u32,

    pub shaft_count_min: u32,
    pub shaft_count_max: u32,
    /// Surface shaft depth range, in cells.
    pub shaft_depth_min: u32,
    pub shaft_depth_max: u32,
    /// Shaft half-width at the surface, in cells; tapers toward one cell at
    /// the bottom.
    pub shaft_half_width: f32,

    /// Minimum contiguous solid run a generation-time carve must leave on one
    /// side of a cell, in at least one axis.
    pub min_thickness: u32,

    /// How far the hashed edge perturbation may widen a crater, as a fraction
    /// of its radius. Zero gives perfect discs.
    pub crater_jaggedness: f32,
    /// Radius shrink applied to digging blasts before the tunnel column.
    pub digger_radius_scale: f32,
    /// Depth multiplier above which a blast tunnels instead of just cratering.
    pub digger_threshold: f32,

    /// Contiguous solid cells required straight below a spawn surface.
    pub spawn_probe_depth: u32,
    /// World units a returned spawn floats above the surface.
    pub spawn_clearance: f32,
    /// Column search half-range around the preferred spawn position.
    pub spawn_search_limit: u32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            world_width: 2400.0,
            world_height: 1200.0,
            cell_size: 4,
            playable_margin: 0.125,

            min_height_frac: 0.18,
            max_height_frac: 0.62,
            edge_taper_frac: 0.08,
            edge_baseline: 0.25,

            feature_count_min: 3,
            feature_count_max: 6,
            feature_strength: 0.28,
            feature_width_frac: 0.18,

            cave_threshold: 0.34,
            cave_depth_ramp: 40.0,
            cave_shallow_rows: 6,
            cave_smooth_iterations: 4,
            cave_neighbour_threshold: 13,
            cave_surface_margin: 5,

            shear_amplitude: 3.0,
            shear_frequency: 0.045,
            shear_noise_amplitude: 2.0,

            arch_count_min: 2,
            arch_count_max: 4,
            arch_rx_min: 5,
            arch_rx_max: 11,
            arch_ry_min: 3,
            arch_ry_max: 7,

            shaft_count_min: 1,
            shaft_count_max: 3,
            shaft_depth_min: 10,
            shaft_depth_max: 22,
            shaft_half_width: 3.0,

            min_thickness: 2,

            crater_jaggedness: 0.3,
            digger_radius_scale: 0.6,
            digger_threshold: 2.0,

            spawn_probe_depth: 4,
            spawn_clearance: 6.0,
            spawn_search_limit: 60,
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return Err(ConfigError::BadWorldSize {
                width: self.world_width,
                height: self.world_height,
            });
        }
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        // The grid must leave room for a playable band and a height band.
        if self.world_width / (self.cell_size as f32) < 16.0
            || self.world_height / (self.cell_size as f32) < 16.0
        {
            return Err(ConfigError::BadWorldSize {
                width: self.world_width,
                height: self.world_height,
            });
        }
        check_range("playable_margin", self.playable_margin, 0.0, 0.4)?;
        check_range("edge_taper_frac", self.edge_taper_frac, 0.0, 0.5)?;
        check_range("edge_baseline", self.edge_baseline, 0.0, 1.0)?;
        check_range("min_height_frac", self.min_height_frac, 0.01, 0.99)?;
        check_range("max_height_frac", self.max_height_frac, 0.01, 0.99)?;
        if self.min_height_frac >= self.max_height_frac {
            return Err(ConfigError::InvertedRange { name: "height band" });
        }
        if self.feature_count_min > self.feature_count_max {
            return Err(ConfigError::InvertedRange { name: "feature_count" });
        }
        if self.arch_count_min > self.arch_count_max
            || self.arch_rx_min > self.arch_rx_max
            || self.arch_ry_min > self.arch_ry_max
        {
            return Err(ConfigError::InvertedRange { name: "arch" });
        }
        if self.shaft_count_min > self.shaft_count_max
            || self.shaft_depth_min > self.shaft_depth_max
        {
            return Err(ConfigError::InvertedRange { name: "shaft" });
        }
        check_range(
            "cave_neighbour_threshold",
            self.cave_neighbour_threshold as f32,
            0.0,
            25.0,
        )?;
        check_range("crater_jaggedness", self.crater_jaggedness, 0.0, 1.0)?;
        check_range("digger_radius_scale", self.digger_radius_scale, 0.05, 1.0)?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: f32, lo: f32, hi: f32) -> Result<(), ConfigError> {
    if value < lo || value > hi {
        return Err(ConfigError::OutOfRange { name, lo, hi });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert_eq!(TerrainConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_cell_size_rejected() {
        let cfg = TerrainConfig {
            cell_size: 0,
            ..TerrainConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCellSize));
    }

    #[test]
    fn inverted_height_band_rejected() {
        let cfg = TerrainConfig {
            min_height_frac: 0.7,
            max_height_frac: 0.3,
            ..TerrainConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvertedRange { name: "height band" })
        );
    }

    #[test]
    fn jaggedness_out_of_range_rejected() {
        let cfg = TerrainConfig {
            crater_jaggedness: 1.5,
            ..TerrainConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::OutOfRange { .. })));
    }
}
