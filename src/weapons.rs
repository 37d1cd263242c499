// Carving parameters per weapon category. The projectile simulation decides
// where a shot lands; this table decides what the impact does to the ground.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Weapon {
    // Blast weapons: plain crater
    Bazooka,
    Grenade,
    Dynamite,
    Airstrike,
    // Digging weapons: shrunk crater plus a tunnel column
    Drill,
    BunkerBuster,
}

impl Weapon {
    pub fn name(&self) -> &str {
        match self {
            Weapon::Bazooka => "Bazooka",
            Weapon::Grenade => "Grenade",
            Weapon::Dynamite => "Dynamite",
            Weapon::Airstrike => "Airstrike",
            Weapon::Drill => "Drill",
            Weapon::BunkerBuster => "Bunker Buster",
        }
    }

    /// Crater radius in world units.
    pub fn blast_radius(&self) -> f32 {
        match self {
            Weapon::Bazooka => 30.0,
            Weapon::Grenade => 25.0,
            Weapon::Dynamite => 45.0,
            Weapon::Airstrike => 25.0,
            Weapon::Drill => 35.0,
            Weapon::BunkerBuster => 20.0,
        }
    }

    /// Above the configured digger threshold the crater engine tunnels a
    /// tapered column this many radii deep instead of just cratering.
    pub fn depth_multiplier(&self) -> f32 {
        match self {
            Weapon::Drill => 3.0,
            Weapon::BunkerBuster => 3.5,
            _ => 1.0,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Weapon::Bazooka => "Direct fire explosive. No bounce.",
            Weapon::Grenade => "Bounces before exploding",
            Weapon::Dynamite => "Place and run!",
            Weapon::Airstrike => "Explosions from the sky",
            Weapon::Drill => "Tunnels straight down",
            Weapon::BunkerBuster => "Small blast, very deep",
        }
    }

    pub fn from_key(k: u8) -> Option<Weapon> {
        match k {
            1 => Some(Weapon::Bazooka),
            2 => Some(Weapon::Grenade),
            3 => Some(Weapon::Dynamite),
            4 => Some(Weapon::Airstrike),
            5 => Some(Weapon::Drill),
            6 => Some(Weapon::BunkerBuster),
            _ => None,
        }
    }

    pub fn all() -> &'static [Weapon] {
        &[
            Weapon::Bazooka,
            Weapon::Grenade,
            Weapon::Dynamite,
            Weapon::Airstrike,
            Weapon::Drill,
            Weapon::BunkerBuster,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_roundtrip() {
        for (i, w) in Weapon::all().iter().enumerate() {
            assert_eq!(Weapon::from_key(i as u8 + 1), Some(*w));
        }
        assert_eq!(Weapon::from_key(0), None);
        assert_eq!(Weapon::from_key(99), None);
    }

    #[test]
    fn diggers_exceed_the_default_threshold() {
        assert!(Weapon::Drill.depth_multiplier() > 2.0);
        assert!(Weapon::BunkerBuster.depth_multiplier() > 2.0);
        assert_eq!(Weapon::Bazooka.depth_multiplier(), 1.0);
    }

    #[test]
    fn every_weapon_carves_something() {
        for w in Weapon::all() {
            assert!(w.blast_radius() > 0.0, "{} has no blast", w.name());
        }
    }
}
