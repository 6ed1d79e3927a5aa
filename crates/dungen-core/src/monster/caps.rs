//! Movement capabilities (the mondata.h predicates, flattened)
//!
//! The generator does not carry full monster templates; placement only
//! ever asks "can this thing stand here". These bits answer that.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// What kinds of terrain a creature can occupy
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct MoveCaps: u16 {
        /// Flies over water and lava
        const FLY = 0x0001;
        /// At home in pools and moats
        const SWIM = 0x0002;
        /// Floats like flight for placement purposes
        const LEVITATE = 0x0004;
        /// Clings to the ceiling over liquids
        const CLING = 0x0008;
        /// Phases through stone and walls
        const PASS_WALLS = 0x0010;
        /// Tunnels by eating the rock
        const EATS_ROCK = 0x0020;
        /// Oozes under closed doors
        const AMORPHOUS = 0x0040;
        /// Survives submersion (player rule)
        const AMPHIBIOUS = 0x0080;
        /// Needs no air; irrelevant to placement but part of the set
        const BREATHLESS = 0x0100;
        /// Shoves boulders aside (giants)
        const THROWS_ROCKS = 0x0200;
        /// Wades through lava unharmed
        const LIKES_LAVA = 0x0400;
        /// Walks on water (player rule)
        const WATER_WALK = 0x0800;
    }
}

// Manual serde impl for MoveCaps
impl Serialize for MoveCaps {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MoveCaps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u16::deserialize(deserializer)?;
        Ok(MoveCaps::from_bits_truncate(bits))
    }
}

impl MoveCaps {
    /// Capabilities that keep a creature out of the drink
    pub const fn over_water(self) -> bool {
        self.intersects(
            Self::SWIM
                .union(Self::FLY)
                .union(Self::LEVITATE)
                .union(Self::CLING),
        )
    }

    /// Capabilities that survive a lava tile
    pub const fn over_lava(self) -> bool {
        self.intersects(Self::FLY.union(Self::LEVITATE).union(Self::LIKES_LAVA))
    }

    /// Capabilities that allow standing inside solid rock
    pub const fn in_rock(self) -> bool {
        self.intersects(Self::PASS_WALLS.union(Self::EATS_ROCK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_predicates() {
        assert!(MoveCaps::SWIM.over_water());
        assert!(MoveCaps::CLING.over_water());
        assert!(!MoveCaps::SWIM.over_lava());
        assert!(MoveCaps::LIKES_LAVA.over_lava());
        assert!(MoveCaps::PASS_WALLS.in_rock());
        assert!(!MoveCaps::FLY.in_rock());
        assert!(!MoveCaps::empty().over_water());
    }

    #[test]
    fn test_bits_roundtrip() {
        let caps = MoveCaps::FLY | MoveCaps::THROWS_ROCKS;
        let json = serde_json::to_string(&caps).unwrap();
        let back: MoveCaps = serde_json::from_str(&json).unwrap();
        assert_eq!(caps, back);
    }
}
