// Per-match palette record handed to the rendering host. Gameplay and the
// solidity invariants never read it.

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub name: &'static str,
    pub sky: [u8; 3],
    pub ground: [u8; 3],
    pub accent: [u8; 3],
}

pub const THEMES: [Theme; 4] = [
    Theme {
        name: "Grassland",
        sky: [128, 190, 232],
        ground: [110, 80, 48],
        accent: [86, 152, 62],
    },
    Theme {
        name: "Desert",
        sky: [232, 200, 150],
        ground: [194, 156, 98],
        accent: [150, 110, 60],
    },
    Theme {
        name: "Tundra",
        sky: [188, 208, 224],
        ground: [140, 144, 156],
        accent: [228, 236, 244],
    },
    Theme {
        name: "Volcanic",
        sky: [70, 54, 60],
        ground: [64, 56, 56],
        accent: [208, 80, 36],
    },
];

impl Theme {
    pub fn pick(rng: &mut StdRng) -> Theme {
        THEMES[rng.gen_range(0..THEMES.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn pick_is_deterministic_per_seed() {
        let a = Theme::pick(&mut StdRng::seed_from_u64(9));
        let b = Theme::pick(&mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
