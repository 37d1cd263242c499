//! Deterministic destructible-terrain engine for a Worms-like artillery game.
//! Exposes generate, crater and the spatial queries to JS; Rust collaborators
//! (physics, AI, camera) use the inner modules directly.

pub mod config;
pub mod crater;
pub mod generate;
pub mod integrity;
pub mod noise_field;
pub mod spawn;
pub mod terrain;
pub mod theme;
pub mod weapons;

use wasm_bindgen::prelude::*;

use config::TerrainConfig;
use generate::Generator;
use terrain::Terrain;
use weapons::Weapon;

#[wasm_bindgen]
pub struct TerrainEngine {
    generator: Generator,
    terrain: Option<Terrain>,
}

#[wasm_bindgen]
impl TerrainEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> TerrainEngine {
        TerrainEngine {
            generator: Generator::new(TerrainConfig::default()),
            terrain: None,
        }
    }

    /// Build an engine from a host-supplied config object. Missing fields
    /// fall back to the defaults; invalid values are rejected here, once,
    /// instead of surfacing mid-match.
    pub fn with_config(config: JsValue) -> Result<TerrainEngine, JsValue> {
        let cfg: TerrainConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        cfg.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(TerrainEngine {
            generator: Generator::new(cfg),
            terrain: None,
        })
    }

    /// Generate a fresh battlefield for a new match, discarding the old one.
    pub fn generate(&mut self, seed: u32) {
        self.terrain = Some(self.generator.generate(seed));
    }

    /// Resolve an explosion at world position (x, y).
    pub fn crater(&mut self, x: f32, y: f32, radius: f32, depth_multiplier: f32) {
        debug_assert!(self.terrain.is_some(), "crater() before generate()");
        if let Some(t) = self.terrain.as_mut() {
            crater::crater(t, self.generator.config(), x, y, radius, depth_multiplier);
        }
    }

    /// Convenience for the weapon system: carve with a weapon's parameters.
    /// Unknown keys are ignored.
    pub fn crater_for_weapon(&mut self, key: u8, x: f32, y: f32) {
        if let Some(w) = Weapon::from_key(key) {
            self.crater(x, y, w.blast_radius(), w.depth_multiplier());
        }
    }

    /// World-space height of the topmost solid cell under `x`, measured from
    /// the map bottom. `0` when the column has no terrain.
    pub fn height_at(&self, x: f32) -> f32 {
        debug_assert!(self.terrain.is_some(), "height_at() before generate()");
        self.terrain.as_ref().map_or(0.0, |t| t.height_at(x))
    }

    /// Collision test at a world position. Off-map is never solid.
    pub fn is_solid_at(&self, x: f32, y: f32) -> bool {
        debug_assert!(self.terrain.is_some(), "is_solid_at() before generate()");
        self.terrain.as_ref().is_some_and(|t| t.is_solid_at(x, y))
    }

    /// Safe spawn near `preferred_x`: `[x, y]`, or empty when no column
    /// qualifies.
    pub fn find_spawn_position(&self, preferred_x: f32) -> Vec<f32> {
        debug_assert!(self.terrain.is_some(), "spawn query before generate()");
        let Some(t) = self.terrain.as_ref() else {
            return Vec::new();
        };
        match spawn::find_spawn_position(t, self.generator.config(), preferred_x) {
            Some((x, y)) => vec![x, y],
            None => Vec::new(),
        }
    }

    /// Safe spawn for slot `slot` of `total` evenly spaced team slots.
    pub fn find_team_spawn_position(&self, slot: u32, total: u32) -> Vec<f32> {
        debug_assert!(self.terrain.is_some(), "spawn query before generate()");
        let Some(t) = self.terrain.as_ref() else {
            return Vec::new();
        };
        match spawn::find_team_spawn_position(t, self.generator.config(), slot, total) {
            Some((x, y)) => vec![x, y],
            None => Vec::new(),
        }
    }

    /// Grid width in cells.
    pub fn terrain_width(&self) -> u32 {
        self.terrain.as_ref().map_or(0, |t| t.width)
    }

    /// Grid height in cells.
    pub fn terrain_height(&self) -> u32 {
        self.terrain.as_ref().map_or(0, |t| t.height)
    }

    /// World pixels per cell edge.
    pub fn cell_size(&self) -> u32 {
        self.generator.config().cell_size
    }

    /// Terrain as a flat Uint8Array: 0 = air, nonzero = solid.
    /// Length = width * height, row-major.
    pub fn get_terrain_buffer(&self) -> Vec<u8> {
        self.terrain.as_ref().map_or_else(Vec::new, |t| t.buffer().to_vec())
    }

    /// Per-column surface heights as a flat Float32Array, same convention as
    /// `height_at`.
    pub fn get_surface_buffer(&self) -> Vec<f32> {
        self.terrain.as_ref().map_or_else(Vec::new, |t| t.surface_heights())
    }

    pub fn solid_cell_count(&self) -> u32 {
        self.terrain.as_ref().map_or(0, |t| t.solid_cell_count())
    }

    /// The match palette for the rendering host.
    pub fn theme(&self) -> JsValue {
        match self.terrain.as_ref() {
            Some(t) => serde_wasm_bindgen::to_value(&t.theme).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }
}

impl Default for TerrainEngine {
    fn default() -> Self {
        TerrainEngine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_round_trip() {
        let mut engine = TerrainEngine::new();
        engine.generate(11);
        assert!(engine.terrain_width() > 0);
        assert_eq!(
            engine.get_terrain_buffer().len(),
            (engine.terrain_width() * engine.terrain_height()) as usize
        );

        let center = 1200.0;
        let before = engine.height_at(center);
        assert!(before > 0.0);

        let surface_y = engine.terrain_height() as f32 * engine.cell_size() as f32 - before;
        engine.crater(center, surface_y, 40.0, 1.0);
        assert!(engine.height_at(center) < before);
    }

    #[test]
    fn weapon_key_carves() {
        let mut engine = TerrainEngine::new();
        engine.generate(5);
        let solid_before = engine.solid_cell_count();
        let x = 1200.0;
        let surface_y =
            engine.terrain_height() as f32 * engine.cell_size() as f32 - engine.height_at(x);
        engine.crater_for_weapon(1, x, surface_y);
        assert!(engine.solid_cell_count() < solid_before);
        // Unknown key is a no-op.
        let solid = engine.solid_cell_count();
        engine.crater_for_weapon(200, x, surface_y);
        assert_eq!(engine.solid_cell_count(), solid);
    }

    #[test]
    fn regeneration_replaces_the_battlefield() {
        let mut engine = TerrainEngine::new();
        engine.generate(1);
        let a = engine.get_terrain_buffer();
        engine.generate(2);
        let b = engine.get_terrain_buffer();
        assert_ne!(a, b);
        engine.generate(1);
        assert_eq!(engine.get_terrain_buffer(), a);
    }
}
