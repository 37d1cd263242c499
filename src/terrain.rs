// Solid-space grid for the destructible battlefield, plus the per-column
// surface cache that backs height queries.
//
// Cells are one byte each: 0 = air, nonzero = solid. The grid is coarser than
// screen pixels (`cell_size` world pixels per cell) to bound memory and
// carving cost. The surface cache holds the topmost solid row per column and
// must be refreshed by every mutation path before the next query.

use crate::theme::{Theme, THEMES};

pub const AIR: u8 = 0;
pub const GROUND: u8 = 1;
/// Sentinel for a column with no solid cell at all.
pub const NO_SURFACE: i32 = -1;

pub struct Terrain {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// World pixels per cell edge.
    pub cell_size: u32,
    /// First playable column (inclusive); everything left of it is sky buffer.
    pub land_start: u32,
    /// One past the last playable column.
    pub land_end: u32,
    pub theme: Theme,
    cells: Vec<u8>,
    surface: Vec<i32>,
}

impl Terrain {
    pub(crate) fn new(
        width: u32,
        height: u32,
        cell_size: u32,
        land_start: u32,
        land_end: u32,
        theme: Theme,
    ) -> Terrain {
        let len = (width * height) as usize;
        Terrain {
            width,
            height,
            cell_size,
            land_start,
            land_end,
            theme,
            cells: vec![AIR; len],
            surface: vec![NO_SURFACE; width as usize],
        }
    }

    /// Uniform slab: solid from `ground_height` world units above the map
    /// bottom all the way down, across the full width. Used for sandbox mode
    /// and tests; `generate` is the real thing.
    pub fn flat(world_width: f32, world_height: f32, cell_size: u32, ground_height: f32) -> Terrain {
        let width = (world_width / cell_size as f32) as u32;
        let height = (world_height / cell_size as f32) as u32;
        let mut t = Terrain::new(width, height, cell_size, 0, width, THEMES[0]);
        let ground_rows = (ground_height / cell_size as f32) as u32;
        let from_row = height.saturating_sub(ground_rows.min(height));
        for row in from_row..height {
            for col in 0..width {
                t.cells[(row * width + col) as usize] = GROUND;
            }
        }
        t.rebuild_surface();
        t
    }

    #[inline]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        Some((row as u32 * self.width + col as u32) as usize)
    }

    /// Off-map reads are air: physics and rendering probe arbitrary
    /// coordinates every frame and must never see an error here.
    #[inline]
    pub fn cell(&self, col: i32, row: i32) -> u8 {
        match self.index(col, row) {
            Some(i) => self.cells[i],
            None => AIR,
        }
    }

    #[inline]
    pub fn is_solid_cell(&self, col: i32, row: i32) -> bool {
        self.cell(col, row) != AIR
    }

    /// Off-map writes are dropped. Callers are responsible for refreshing the
    /// surface cache afterwards.
    #[inline]
    pub(crate) fn set_cell(&mut self, col: i32, row: i32) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = GROUND;
        }
    }

    #[inline]
    pub(crate) fn clear_cell(&mut self, col: i32, row: i32) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = AIR;
        }
    }

    /// World-to-cell mapping: floor division by the scale factor, identical
    /// for every component so collision, carving and rendering agree.
    #[inline]
    pub fn world_to_cell(&self, w: f32) -> i32 {
        (w / self.cell_size as f32).floor() as i32
    }

    #[inline]
    pub fn cell_to_world(&self, c: i32) -> f32 {
        c as f32 * self.cell_size as f32
    }

    /// Collision hot path: one index computation, no cache involved.
    #[inline]
    pub fn is_solid_at(&self, wx: f32, wy: f32) -> bool {
        let col = (wx / self.cell_size as f32).floor() as i32;
        let row = (wy / self.cell_size as f32).floor() as i32;
        match self.index(col, row) {
            Some(i) => self.cells[i] != AIR,
            None => false,
        }
    }

    /// Cached topmost solid row for a column, `NO_SURFACE` when the column is
    /// all air or off-map.
    #[inline]
    pub fn surface_row(&self, col: i32) -> i32 {
        if col < 0 || col >= self.width as i32 {
            return NO_SURFACE;
        }
        self.surface[col as usize]
    }

    fn scan_column(&self, col: u32) -> i32 {
        for row in 0..self.height {
            if self.cells[(row * self.width + col) as usize] != AIR {
                return row as i32;
            }
        }
        NO_SURFACE
    }

    /// Direct column scan bypassing the cache. Generation passes use this
    /// while the cache is still stale mid-pipeline.
    pub(crate) fn surface_row_scan(&self, col: i32) -> i32 {
        if col < 0 || col >= self.width as i32 {
            return NO_SURFACE;
        }
        self.scan_column(col as u32)
    }

    /// Full rebuild: one top-down scan per column. Run once after generation.
    pub fn rebuild_surface(&mut self) {
        for col in 0..self.width {
            self.surface[col as usize] = self.scan_column(col);
        }
    }

    /// Incremental rebuild for the column range a crater touched.
    pub fn rebuild_surface_span(&mut self, col_min: i32, col_max: i32) {
        let lo = col_min.max(0);
        let hi = col_max.min(self.width as i32 - 1);
        for col in lo..=hi {
            self.surface[col as usize] = self.scan_column(col as u32);
        }
    }

    /// World-space height of the topmost solid cell in the column under `wx`,
    /// measured from the map bottom. `0.0` when the column holds no terrain.
    pub fn height_at(&self, wx: f32) -> f32 {
        let s = self.surface_row(self.world_to_cell(wx));
        if s == NO_SURFACE {
            return 0.0;
        }
        (self.height as i32 - s) as f32 * self.cell_size as f32
    }

    /// World y of the surface cell's top edge, if the column has terrain.
    /// Spawn placement wants the coordinate, not the height.
    pub fn surface_world_y(&self, wx: f32) -> Option<f32> {
        let s = self.surface_row(self.world_to_cell(wx));
        if s == NO_SURFACE {
            return None;
        }
        Some(s as f32 * self.cell_size as f32)
    }

    /// Raw cell buffer, row-major, for the rendering host.
    pub fn buffer(&self) -> &[u8] {
        &self.cells
    }

    /// Per-column world-space surface heights, same convention as
    /// `height_at`, for the rendering host.
    pub fn surface_heights(&self) -> Vec<f32> {
        self.surface
            .iter()
            .map(|&s| {
                if s == NO_SURFACE {
                    0.0
                } else {
                    (self.height as i32 - s) as f32 * self.cell_size as f32
                }
            })
            .collect()
    }

    pub fn solid_cell_count(&self) -> u32 {
        self.cells.iter().filter(|&&c| c != AIR).count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_to_cell_floors() {
        let t = Terrain::flat(400.0, 400.0, 4, 200.0);
        assert_eq!(t.world_to_cell(0.0), 0);
        assert_eq!(t.world_to_cell(7.9), 1);
        assert_eq!(t.world_to_cell(8.0), 2);
        assert_eq!(t.world_to_cell(-0.1), -1);
    }

    #[test]
    fn out_of_range_is_air_and_never_panics() {
        let t = Terrain::flat(400.0, 400.0, 4, 200.0);
        assert!(!t.is_solid_at(-1e6, 50.0));
        assert!(!t.is_solid_at(50.0, 1e9));
        assert_eq!(t.cell(-1, -1), AIR);
        assert_eq!(t.surface_row(-5), NO_SURFACE);
        assert_eq!(t.surface_row(10_000), NO_SURFACE);
        assert_eq!(t.height_at(-9999.0), 0.0);
    }

    #[test]
    fn flat_slab_heights() {
        // 100x100 cells; ground fills the bottom 50 rows.
        let t = Terrain::flat(400.0, 400.0, 4, 200.0);
        assert_eq!(t.width, 100);
        assert_eq!(t.height, 100);
        assert_eq!(t.height_at(10.0), 200.0);
        assert_eq!(t.surface_world_y(10.0), Some(200.0));
        assert!(t.is_solid_at(10.0, 300.0));
        assert!(!t.is_solid_at(10.0, 100.0));
    }

    #[test]
    fn empty_slab_has_no_surface() {
        let t = Terrain::flat(400.0, 400.0, 4, 0.0);
        assert_eq!(t.height_at(200.0), 0.0);
        assert_eq!(t.surface_world_y(200.0), None);
        assert_eq!(t.solid_cell_count(), 0);
    }

    #[test]
    fn span_rebuild_matches_full_rebuild() {
        let mut t = Terrain::flat(400.0, 400.0, 4, 200.0);
        for col in 20..30 {
            for row in 50..60 {
                t.clear_cell(col, row);
            }
        }
        t.rebuild_surface_span(20, 29);
        let spans: Vec<i32> = (0..t.width as i32).map(|c| t.surface_row(c)).collect();
        t.rebuild_surface();
        let full: Vec<i32> = (0..t.width as i32).map(|c| t.surface_row(c)).collect();
        assert_eq!(spans, full);
        assert_eq!(t.surface_row(25), 60);
    }

    #[test]
    fn queries_are_idempotent() {
        let t = Terrain::flat(400.0, 400.0, 4, 120.0);
        let h1 = t.height_at(33.0);
        let s1 = t.is_solid_at(33.0, 350.0);
        for _ in 0..10 {
            assert_eq!(t.height_at(33.0), h1);
            assert_eq!(t.is_solid_at(33.0, 350.0), s1);
        }
    }
}
