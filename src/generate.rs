// Battlefield generation: an ordered sequence of passes over a fresh grid,
// deterministic for a given seed. Base heightfield first, then cave carving,
// overhang shear, arches and surface shafts, all writing through the same
// solid-space grid.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::TerrainConfig;
use crate::integrity::can_carve;
use crate::noise_field::NoiseField;
use crate::terrain::{Terrain, AIR, NO_SURFACE};
use crate::theme::Theme;

// Heightfield mix. The broad term rolls, the detail term roughens, the ridged
// term puts creases in the peaks.
const BROAD_FREQ: f32 = 2.5;
const DETAIL_FREQ: f32 = 18.0;
const RIDGE_FREQ: f32 = 7.0;
const BROAD_WEIGHT: f32 = 0.30;
const DETAIL_WEIGHT: f32 = 0.08;
const RIDGE_WEIGHT: f32 = 0.12;

const MAX_FEATURES: usize = 8;
const CAVE_FREQ: f32 = 0.09;
// Cave seeds within the shallow band survive at this fraction of the normal
// rate; the first rows under the surface should stay mostly intact.
const SHALLOW_CAVE_SCALE: f32 = 0.2;
const SHEAR_NOISE_FREQ: f32 = 0.06;
const SHAFT_WOBBLE: f32 = 1.5;

/// One mountain or valley rolled for the base heightfield. Lives only while
/// that pass runs.
#[derive(Clone, Copy, Default)]
struct Feature {
    /// Normalized x across the playable band.
    center: f32,
    strength: f32,
    /// Normalized half-width of the quadratic falloff.
    width: f32,
    raise: bool,
}

/// Owns the config plus the scratch buffers the passes reuse, so repeated
/// matches don't reallocate the cave ping-pong pair or the shear row.
pub struct Generator {
    cfg: TerrainConfig,
    grid_w: u32,
    grid_h: u32,
    land_start: u32,
    land_end: u32,
    cave_a: Vec<u8>,
    cave_b: Vec<u8>,
    row_scratch: Vec<u8>,
    base_surface: Vec<i32>,
}

impl Generator {
    /// Expects a validated config; see `TerrainConfig::validate`.
    pub fn new(cfg: TerrainConfig) -> Generator {
        let grid_w = (cfg.world_width / cfg.cell_size as f32) as u32;
        let grid_h = (cfg.world_height / cfg.cell_size as f32) as u32;
        let margin = (grid_w as f32 * cfg.playable_margin) as u32;
        let len = (grid_w * grid_h) as usize;
        Generator {
            cfg,
            grid_w,
            grid_h,
            land_start: margin,
            land_end: grid_w - margin,
            cave_a: vec![0; len],
            cave_b: vec![0; len],
            row_scratch: vec![0; grid_w as usize],
            base_surface: vec![NO_SURFACE; grid_w as usize],
        }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.cfg
    }

    /// Build one battlefield. Runs every pass, then rebuilds the surface
    /// cache in full, since caves, shear and arches can all change what
    /// "topmost solid" means anywhere in the playable band.
    pub fn generate(&mut self, seed: u32) -> Terrain {
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let noise = NoiseField::new(seed);
        let theme = Theme::pick(&mut rng);
        let mut t = Terrain::new(
            self.grid_w,
            self.grid_h,
            self.cfg.cell_size,
            self.land_start,
            self.land_end,
            theme,
        );
        self.base_surface.fill(NO_SURFACE);
        self.base_heightfield(&mut t, &noise, &mut rng);
        self.carve_caves(&mut t, &noise);
        self.shear_overhangs(&mut t, &noise);
        self.carve_arches(&mut t, &mut rng);
        self.carve_shafts(&mut t, &noise, &mut rng);
        t.rebuild_surface();
        info!(
            seed,
            solid = t.solid_cell_count(),
            theme = t.theme.name,
            "terrain generated"
        );
        t
    }

    fn base_heightfield(&mut self, t: &mut Terrain, noise: &NoiseField, rng: &mut StdRng) {
        let cfg = &self.cfg;
        let count = rng
            .gen_range(cfg.feature_count_min..=cfg.feature_count_max)
            .min(MAX_FEATURES as u32) as usize;
        let mut features = [Feature::default(); MAX_FEATURES];
        for f in features.iter_mut().take(count) {
            *f = Feature {
                center: rng.gen_range(0.1..0.9),
                strength: cfg.feature_strength * rng.gen_range(0.6..1.4),
                width: cfg.feature_width_frac * rng.gen_range(0.7..1.3),
                raise: rng.gen_bool(0.5),
            };
        }

        let span = (self.land_end - self.land_start).max(1);
        let min_rows = (self.grid_h as f32 * cfg.min_height_frac) as i32;
        let max_rows = (self.grid_h as f32 * cfg.max_height_frac) as i32;
        for col in self.land_start..self.land_end {
            let tpos = (col - self.land_start) as f32 / span as f32;
            let broad = noise.octave(tpos * BROAD_FREQ, 11.7, 3, 0.5);
            let detail = noise.octave(tpos * DETAIL_FREQ, 29.3, 2, 0.5);
            let ridge = noise.ridged(tpos * RIDGE_FREQ, 47.9);
            let mut factor = 0.5
                + broad * BROAD_WEIGHT
                + detail * DETAIL_WEIGHT
                + (ridge * 2.0 - 1.0) * RIDGE_WEIGHT;

            for f in &features[..count] {
                let d = (tpos - f.center).abs();
                if d < f.width {
                    let falloff = 1.0 - (d / f.width) * (d / f.width);
                    factor += if f.raise {
                        f.strength * falloff
                    } else {
                        -f.strength * falloff
                    };
                }
            }

            // Taper toward a low baseline at the playable edges so a match
            // never opens against an interior cliff.
            let edge_t = tpos.min(1.0 - tpos);
            if edge_t < cfg.edge_taper_frac {
                let blend = edge_t / cfg.edge_taper_frac;
                factor = cfg.edge_baseline + (factor - cfg.edge_baseline) * blend;
            }

            let factor = factor.clamp(0.0, 1.0);
            let rows = min_rows + ((max_rows - min_rows) as f32 * factor) as i32;
            let surface = self.grid_h as i32 - rows;
            for row in surface.max(0)..self.grid_h as i32 {
                t.set_cell(col as i32, row);
            }
            self.base_surface[col as usize] = surface;
        }
    }

    /// Cave mask lives on the ping-pong pair: 1 = open, 0 = solid. Seeds come
    /// from thresholded noise, then 5x5 cellular-automata smoothing rounds
    /// the blobs into rooms. Only cells safely below the surface and cleared
    /// by the thickness guard actually leave the grid.
    fn carve_caves(&mut self, t: &mut Terrain, noise: &NoiseField) {
        let cfg = &self.cfg;
        let w = self.grid_w as usize;
        let h = self.grid_h as usize;

        for row in 0..h {
            for col in 0..w {
                let i = row * w + col;
                self.cave_a[i] = if !t.is_solid_cell(col as i32, row as i32) {
                    1
                } else {
                    let depth = row as i32 - self.base_surface[col];
                    let n01 = (noise.cave_octave(
                        col as f32 * CAVE_FREQ,
                        row as f32 * CAVE_FREQ,
                        2,
                        0.5,
                    ) + 1.0)
                        * 0.5;
                    let mut thr =
                        cfg.cave_threshold * (depth as f32 / cfg.cave_depth_ramp).min(1.0);
                    if depth < cfg.cave_shallow_rows as i32 {
                        thr *= SHALLOW_CAVE_SCALE;
                    }
                    u8::from(n01 < thr)
                };
            }
        }

        for _ in 0..cfg.cave_smooth_iterations {
            for row in 0..h {
                for col in 0..w {
                    let mut solid = 0u32;
                    for dy in -2i32..=2 {
                        for dx in -2i32..=2 {
                            let nc = col as i32 + dx;
                            let nr = row as i32 + dy;
                            if nc < 0 || nr < 0 || nc >= w as i32 || nr >= h as i32 {
                                // Off-grid counts solid so rooms close at the
                                // map border instead of bleeding open.
                                solid += 1;
                            } else if self.cave_a[nr as usize * w + nc as usize] == 0 {
                                solid += 1;
                            }
                        }
                    }
                    let i = row * w + col;
                    self.cave_b[i] = if !t.is_solid_cell(col as i32, row as i32) {
                        1
                    } else {
                        u8::from(solid < cfg.cave_neighbour_threshold)
                    };
                }
            }
            std::mem::swap(&mut self.cave_a, &mut self.cave_b);
        }

        let mut carved = 0u32;
        for row in 0..h as i32 {
            for col in 0..w as i32 {
                if self.cave_a[row as usize * w + col as usize] == 0 {
                    continue;
                }
                if !t.is_solid_cell(col, row) {
                    continue;
                }
                let depth = row - self.base_surface[col as usize];
                if depth > cfg.cave_surface_margin as i32
                    && can_carve(t, col, row, cfg.min_thickness)
                {
                    t.clear_cell(col, row);
                    carved += 1;
                }
            }
        }
        debug!(carved, "cave pass");
    }

    /// Horizontal per-row displacement from a sine wave plus noise, producing
    /// sheared overhangs. One row of scratch, no full-grid copy. Writes stay
    /// inside the playable band so the sky buffer keeps its role.
    fn shear_overhangs(&mut self, t: &mut Terrain, noise: &NoiseField) {
        let cfg = &self.cfg;
        let w = self.grid_w as i32;
        for row in 0..self.grid_h as i32 {
            let wave = (row as f32 * cfg.shear_frequency).sin() * cfg.shear_amplitude;
            let wobble =
                noise.sample(row as f32 * SHEAR_NOISE_FREQ, 83.1) * cfg.shear_noise_amplitude;
            let shift = (wave + wobble).round() as i32;
            if shift == 0 {
                continue;
            }
            for col in 0..w {
                self.row_scratch[col as usize] = t.cell(col, row);
            }
            for col in self.land_start as i32..self.land_end as i32 {
                let src = col - shift;
                let v = if src >= 0 && src < w {
                    self.row_scratch[src as usize]
                } else {
                    AIR
                };
                if v == AIR {
                    t.clear_cell(col, row);
                } else {
                    t.set_cell(col, row);
                }
            }
        }
    }

    fn carve_arches(&mut self, t: &mut Terrain, rng: &mut StdRng) {
        let cfg = &self.cfg;
        let count = rng.gen_range(cfg.arch_count_min..=cfg.arch_count_max);
        for _ in 0..count {
            let rx = rng.gen_range(cfg.arch_rx_min..=cfg.arch_rx_max) as i32;
            let ry = rng.gen_range(cfg.arch_ry_min..=cfg.arch_ry_max) as i32;
            let lo = self.land_start as i32 + rx;
            let hi = self.land_end as i32 - rx;
            if lo >= hi {
                continue;
            }
            let col = rng.gen_range(lo..hi);
            let s = t.surface_row_scan(col);
            if s == NO_SURFACE {
                continue;
            }
            // The hole hangs just under the surface so it reads as an arch.
            let crow = s + ry + rng.gen_range(0..=ry);
            for dy in -ry..=ry {
                for dx in -rx..=rx {
                    let e = (dx * dx) as f32 / (rx * rx) as f32
                        + (dy * dy) as f32 / (ry * ry) as f32;
                    if e <= 1.0 && can_carve(t, col + dx, crow + dy, cfg.min_thickness) {
                        t.clear_cell(col + dx, crow + dy);
                    }
                }
            }
        }
    }

    /// Tapered vertical shafts opening at the surface, edges wobbled by
    /// noise, narrower with depth.
    fn carve_shafts(&mut self, t: &mut Terrain, noise: &NoiseField, rng: &mut StdRng) {
        let cfg = &self.cfg;
        let count = rng.gen_range(cfg.shaft_count_min..=cfg.shaft_count_max);
        // Keep the widest possible shaft inside the playable band.
        let pad = (cfg.shaft_half_width + SHAFT_WOBBLE).ceil() as i32 + 1;
        for _ in 0..count {
            let lo = self.land_start as i32 + pad;
            let hi = self.land_end as i32 - pad;
            if lo >= hi {
                continue;
            }
            let col = rng.gen_range(lo..hi);
            let s = t.surface_row_scan(col);
            if s == NO_SURFACE {
                continue;
            }
            let depth = rng.gen_range(cfg.shaft_depth_min..=cfg.shaft_depth_max) as i32;
            for d in 0..depth {
                let row = s + d;
                let taper = 1.0 - d as f32 / depth as f32;
                let wobble = noise.sample(d as f32 * 0.23, col as f32 * 0.17) * SHAFT_WOBBLE;
                let hw = ((cfg.shaft_half_width * taper + wobble).round() as i32).max(1);
                for dx in -hw..=hw {
                    if can_carve(t, col + dx, row, cfg.min_thickness) {
                        t.clear_cell(col + dx, row);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::NO_SURFACE;

    #[test]
    fn same_seed_same_battlefield() {
        let mut a = Generator::new(TerrainConfig::default());
        let mut b = Generator::new(TerrainConfig::default());
        let ta = a.generate(1234);
        let tb = b.generate(1234);
        assert_eq!(ta.buffer(), tb.buffer());
        assert_eq!(ta.theme, tb.theme);
    }

    #[test]
    fn different_seeds_differ() {
        let mut g = Generator::new(TerrainConfig::default());
        let ta = g.generate(3);
        let tb = g.generate(4);
        assert_ne!(ta.buffer(), tb.buffer());
    }

    #[test]
    fn sky_buffer_stays_empty() {
        let mut g = Generator::new(TerrainConfig::default());
        let t = g.generate(99);
        for col in 0..t.land_start as i32 {
            assert_eq!(t.surface_row(col), NO_SURFACE, "left buffer col {col}");
        }
        for col in t.land_end as i32..t.width as i32 {
            assert_eq!(t.surface_row(col), NO_SURFACE, "right buffer col {col}");
        }
    }

    #[test]
    fn surface_cache_matches_brute_force_after_generate() {
        let mut g = Generator::new(TerrainConfig::default());
        for seed in 0..4 {
            let t = g.generate(seed);
            for col in 0..t.width as i32 {
                let expected = (0..t.height as i32)
                    .find(|&row| t.is_solid_cell(col, row))
                    .unwrap_or(NO_SURFACE);
                assert_eq!(t.surface_row(col), expected, "seed {seed} col {col}");
            }
        }
    }

    #[test]
    fn median_height_sits_in_the_configured_band() {
        let cfg = TerrainConfig::default();
        let mut g = Generator::new(cfg.clone());
        for seed in 0..6 {
            let t = g.generate(seed);
            let mut heights: Vec<f32> = (t.land_start..t.land_end)
                .map(|col| t.height_at(t.cell_to_world(col as i32)))
                .collect();
            heights.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let median = heights[heights.len() / 2];
            // Shear moves surface cells sideways, so allow a few rows of
            // slack around the nominal band.
            let slack = 10.0 * cfg.cell_size as f32;
            let lo = cfg.world_height * cfg.min_height_frac - slack;
            let hi = cfg.world_height * cfg.max_height_frac + slack;
            assert!(
                median >= lo && median <= hi,
                "seed {seed}: median {median} outside [{lo}, {hi}]"
            );
        }
    }

    #[test]
    fn battlefield_has_substantial_ground() {
        let mut g = Generator::new(TerrainConfig::default());
        let t = g.generate(7);
        let playable = (t.land_end - t.land_start) * t.height;
        let solid = t.solid_cell_count();
        assert!(solid > playable / 10, "only {solid} solid cells");
        assert!(solid < playable, "grid is a solid brick");
    }
}
