// Spawn placement: query-only column scans for ground that can actually hold
// a combatant. Never mutates terrain.

use crate::config::TerrainConfig;
use crate::terrain::{Terrain, NO_SURFACE};

/// Rows of clear air required above the surface so a spawn doesn't wedge
/// inside an overhang.
const HEADROOM: i32 = 3;

/// Search outward from `preferred_x`, alternating sides, and return the
/// first column with real ground: a surface, solid cells straight below it,
/// and headroom above. The returned position floats `spawn_clearance` world
/// units above the surface.
pub fn find_spawn_position(
    t: &Terrain,
    cfg: &TerrainConfig,
    preferred_x: f32,
) -> Option<(f32, f32)> {
    let land_lo = t.land_start as i32;
    let land_hi = t.land_end as i32;
    if land_lo >= land_hi {
        return None;
    }
    let pcol = t.world_to_cell(preferred_x).clamp(land_lo, land_hi - 1);
    for offset in 0..cfg.spawn_search_limit as i32 {
        for dir in [1, -1] {
            if offset == 0 && dir < 0 {
                continue;
            }
            let col = pcol + offset * dir;
            if col < land_lo || col >= land_hi {
                continue;
            }
            if let Some(pos) = safe_position(t, cfg, col) {
                return Some(pos);
            }
        }
    }
    None
}

fn safe_position(t: &Terrain, cfg: &TerrainConfig, col: i32) -> Option<(f32, f32)> {
    let s = t.surface_row(col);
    if s == NO_SURFACE {
        return None;
    }
    // Solid ground straight down: a spawn above a cave mouth falls into it.
    for d in 1..=cfg.spawn_probe_depth as i32 {
        if !t.is_solid_cell(col, s + d) {
            return None;
        }
    }
    for d in 1..=HEADROOM {
        if t.is_solid_cell(col, s - d) {
            return None;
        }
    }
    let x = t.cell_to_world(col) + t.cell_size as f32 * 0.5;
    let y = s as f32 * t.cell_size as f32 - cfg.spawn_clearance;
    Some((x, y))
}

/// Evenly spaced preferred positions across the playable band, one per slot,
/// then the same safety search as `find_spawn_position`.
pub fn find_team_spawn_position(
    t: &Terrain,
    cfg: &TerrainConfig,
    slot: u32,
    total: u32,
) -> Option<(f32, f32)> {
    if total == 0 {
        return None;
    }
    let start = t.cell_to_world(t.land_start as i32);
    let land_w = (t.land_end - t.land_start) as f32 * t.cell_size as f32;
    let preferred = start + (slot + 1) as f32 * land_w / (total + 1) as f32;
    find_spawn_position(t, cfg, preferred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainConfig;
    use crate::generate::Generator;

    #[test]
    fn flat_ground_spawns_at_the_preferred_column() {
        let t = Terrain::flat(400.0, 400.0, 4, 200.0);
        let cfg = TerrainConfig::default();
        let (x, y) = find_spawn_position(&t, &cfg, 200.0).expect("flat ground must spawn");
        assert!((x - 202.0).abs() < 0.01);
        assert_eq!(y, 200.0 - cfg.spawn_clearance);
    }

    #[test]
    fn empty_terrain_yields_no_spawn() {
        let t = Terrain::flat(400.0, 400.0, 4, 0.0);
        let cfg = TerrainConfig::default();
        assert_eq!(find_spawn_position(&t, &cfg, 200.0), None);
    }

    #[test]
    fn spawns_always_stand_on_probed_ground() {
        let cfg = TerrainConfig::default();
        let mut g = Generator::new(cfg.clone());
        for seed in 0..8 {
            let t = g.generate(seed);
            for slot in 0..6 {
                let Some((x, y)) = find_team_spawn_position(&t, &cfg, slot, 6) else {
                    continue;
                };
                let col = t.world_to_cell(x);
                let s = t.surface_row(col);
                assert_ne!(s, crate::terrain::NO_SURFACE);
                for d in 1..=cfg.spawn_probe_depth as i32 {
                    assert!(
                        t.is_solid_cell(col, s + d),
                        "seed {seed} slot {slot}: hole below spawn"
                    );
                }
                assert!(y < s as f32 * t.cell_size as f32, "spawn below surface");
            }
        }
    }

    #[test]
    fn team_slots_spread_across_the_playable_band() {
        let cfg = TerrainConfig::default();
        let mut g = Generator::new(cfg.clone());
        let t = g.generate(21);
        let positions: Vec<f32> = (0..4)
            .filter_map(|slot| find_team_spawn_position(&t, &cfg, slot, 4).map(|p| p.0))
            .collect();
        assert!(!positions.is_empty(), "no slot found a spawn");
        for x in &positions {
            assert!(*x >= t.cell_to_world(t.land_start as i32));
            assert!(*x <= t.cell_to_world(t.land_end as i32));
        }
    }
}
