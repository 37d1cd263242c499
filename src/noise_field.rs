// Seeded gradient noise shared by every generation pass. A fresh field is
// built per match so no two battlefields repeat.

use noise::{NoiseFn, Perlin};

pub struct NoiseField {
    primary: Perlin,
    ridge: Perlin,
    cave: Perlin,
}

impl NoiseField {
    pub fn new(seed: u32) -> NoiseField {
        NoiseField {
            primary: Perlin::new(seed),
            ridge: Perlin::new(seed.wrapping_add(0x9e37)),
            cave: Perlin::new(seed.wrapping_add(0x85eb)),
        }
    }

    /// Single-octave sample in roughly [-1, 1].
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        self.primary.get([x as f64, y as f64]) as f32
    }

    /// Octave sum at doubling frequency and decaying amplitude, normalized by
    /// total amplitude so the range stays roughly [-1, 1] for any octave count.
    pub fn octave(&self, x: f32, y: f32, octaves: u32, persistence: f32) -> f32 {
        fbm(&self.primary, x, y, octaves, persistence)
    }

    /// Same octave sum over the cave permutation, kept separate so cave shapes
    /// don't correlate with the surface profile.
    pub fn cave_octave(&self, x: f32, y: f32, octaves: u32, persistence: f32) -> f32 {
        fbm(&self.cave, x, y, octaves, persistence)
    }

    /// Crease noise in [0, 1]: sharp ridges where the underlying field crosses
    /// zero, used for jagged peaks.
    #[inline]
    pub fn ridged(&self, x: f32, y: f32) -> f32 {
        1.0 - (self.ridge.get([x as f64, y as f64]) as f32).abs()
    }
}

fn fbm(p: &Perlin, x: f32, y: f32, octaves: u32, persistence: f32) -> f32 {
    let mut total = 0.0f64;
    let mut max_amp = 0.0f64;
    let mut amp = 1.0f64;
    let mut freq = 1.0f64;
    for _ in 0..octaves.max(1) {
        total += p.get([x as f64 * freq, y as f64 * freq]) * amp;
        max_amp += amp;
        amp *= persistence as f64;
        freq *= 2.0;
    }
    (total / max_amp) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octave_stays_normalized() {
        let field = NoiseField::new(42);
        for i in 0..200 {
            let x = i as f32 * 0.173;
            let y = i as f32 * 0.091;
            let v = field.octave(x, y, 4, 0.5);
            assert!(v.abs() <= 1.001, "octave out of range: {v} at ({x}, {y})");
            let r = field.ridged(x, y);
            assert!((0.0..=1.001).contains(&r), "ridged out of range: {r}");
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = NoiseField::new(7);
        let b = NoiseField::new(7);
        for i in 0..50 {
            let x = i as f32 * 0.37;
            assert_eq!(a.octave(x, 1.5, 3, 0.5), b.octave(x, 1.5, 3, 0.5));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let diverged = (0..50).any(|i| {
            let x = i as f32 * 0.37;
            a.sample(x, 0.9) != b.sample(x, 0.9)
        });
        assert!(diverged);
    }
}
