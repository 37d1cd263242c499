// Runtime crater carving: the only terrain writer once a match is underway.
// Runs after every impact, so the edge perturbation is a cheap integer hash
// of the cell coordinates instead of a real noise call; the boundary's
// jaggedness is cosmetic and never worth a gradient evaluation per cell.

use tracing::debug;

use crate::config::TerrainConfig;
use crate::terrain::Terrain;

fn lcg(s: u32) -> u32 {
    s.wrapping_mul(1103515245).wrapping_add(12345)
}

/// Per-cell hash in [0, 1).
#[inline]
fn cell_hash01(col: i32, row: i32) -> f32 {
    let h = lcg(lcg(col as u32 ^ 0x5bd1e995) ^ row as u32);
    ((h >> 16) & 0x7fff) as f32 / 32768.0
}

/// Carve an explosion at world position `(cx, cy)`. Ordinary blasts clear a
/// hash-perturbed disc; digging blasts (`depth_multiplier` above the config
/// threshold) shrink the disc and tunnel a tapered column beneath the center.
/// No thickness guard here: mid-match destruction is allowed to sever
/// terrain completely. Afterwards only the touched column span of the
/// surface cache is rebuilt.
pub fn crater(
    t: &mut Terrain,
    cfg: &TerrainConfig,
    cx: f32,
    cy: f32,
    radius: f32,
    depth_multiplier: f32,
) {
    if radius <= 0.0 {
        return;
    }
    let digging = depth_multiplier > cfg.digger_threshold;
    let ccol = t.world_to_cell(cx);
    let crow = t.world_to_cell(cy);
    let mut rc = radius / t.cell_size as f32;
    if digging {
        rc *= cfg.digger_radius_scale;
    }

    let mut touched_min = i32::MAX;
    let mut touched_max = i32::MIN;
    let reach = (rc * (1.0 + cfg.crater_jaggedness)).ceil() as i32;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let col = ccol + dx;
            let row = crow + dy;
            // The perturbation only ever widens the disc, so the nominal
            // radius is a guaranteed clear zone.
            let rr = rc * (1.0 + cfg.crater_jaggedness * cell_hash01(col, row));
            if (dx * dx + dy * dy) as f32 <= rr * rr {
                t.clear_cell(col, row);
                touched_min = touched_min.min(col);
                touched_max = touched_max.max(col);
            }
        }
    }

    if digging {
        let depth = (rc * depth_multiplier).ceil() as i32;
        for d in 0..depth {
            let row = crow + d;
            let taper = 1.0 - d as f32 / depth as f32;
            let hw = ((rc * 0.5 * taper) * (0.8 + 0.4 * cell_hash01(d, ccol))).round() as i32;
            for dx in -hw..=hw {
                t.clear_cell(ccol + dx, row);
                touched_min = touched_min.min(ccol + dx);
                touched_max = touched_max.max(ccol + dx);
            }
        }
    }

    if touched_min <= touched_max {
        t.rebuild_surface_span(touched_min, touched_max);
    }
    debug!(cx, cy, radius, depth_multiplier, "crater");
}
