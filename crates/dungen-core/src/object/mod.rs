//! Objects the level generator scatters around (mkobj.c)
//!
//! The generator only needs object *placement*: what sits where, in what
//! quantity. Identity beyond the class is collapsed to [`ObjectKind`],
//! except for gems, where the mineral seeding cares which stone it grew.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, FromRepr};

use crate::rng::GameRng;

/// Unique object identifier, assigned when an object joins a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Gem species (objects.c GEM class, glass and stones excluded)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, FromRepr,
)]
#[strum(serialize_all = "lowercase")]
pub enum GemStone {
    #[strum(to_string = "dilithium crystal")]
    DilithiumCrystal = 0,
    Diamond,
    Ruby,
    Jacinth,
    Sapphire,
    #[strum(to_string = "black opal")]
    BlackOpal,
    Emerald,
    Turquoise,
    Citrine,
    Aquamarine,
    Amber,
    Topaz,
    Jet,
    Opal,
    Chrysoberyl,
    Garnet,
    Amethyst,
    Jasper,
    Fluorite,
    Obsidian,
    Agate,
    Jade,
}

/// How many gem species there are
pub const GEM_KINDS: u32 = 22;

/// What an object is, as far as level generation cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    GoldPiece,
    Weapon,
    Armor,
    Food,
    Tool,
    Gem(GemStone),
    Potion,
    Scroll,
    /// Placed in open niches so the closet stays reachable
    ScrollOfTeleportation,
    Spellbook,
    Wand,
    Ring,
    Amulet,
    Boulder,
    Statue,
    Chest,
    LargeBox,
    Bell,
    Corpse,
    KelpFrond,
}

/// An object instance on (or under) the level floor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub x: i8,
    pub y: i8,
    pub quantity: u32,
}

impl Object {
    /// Make a free-floating object; id and position are assigned when
    /// the level takes ownership
    pub fn new(kind: ObjectKind, quantity: u32) -> Self {
        Self {
            id: ObjectId(0),
            kind,
            x: 0,
            y: 0,
            quantity,
        }
    }
}

/// Coarse object category used by the random-generation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClass {
    Weapon,
    Armor,
    Food,
    Tool,
    Gem,
    Potion,
    Scroll,
    Spellbook,
    Wand,
    Ring,
    Amulet,
}

struct ClassProb {
    prob: u8,
    class: ObjectClass,
}

/// Standard dungeon object class probabilities (C `mkobjprobs[]`)
const MKOBJ_PROBS: &[ClassProb] = &[
    ClassProb {
        prob: 10,
        class: ObjectClass::Weapon,
    },
    ClassProb {
        prob: 10,
        class: ObjectClass::Armor,
    },
    ClassProb {
        prob: 20,
        class: ObjectClass::Food,
    },
    ClassProb {
        prob: 8,
        class: ObjectClass::Tool,
    },
    ClassProb {
        prob: 8,
        class: ObjectClass::Gem,
    },
    ClassProb {
        prob: 16,
        class: ObjectClass::Potion,
    },
    ClassProb {
        prob: 16,
        class: ObjectClass::Scroll,
    },
    ClassProb {
        prob: 4,
        class: ObjectClass::Spellbook,
    },
    ClassProb {
        prob: 4,
        class: ObjectClass::Wand,
    },
    ClassProb {
        prob: 3,
        class: ObjectClass::Ring,
    },
    ClassProb {
        prob: 1,
        class: ObjectClass::Amulet,
    },
];

/// Pick a random gem species
pub fn random_gem(rng: &mut GameRng) -> GemStone {
    GemStone::from_repr(rng.rn2(GEM_KINDS) as usize).unwrap_or(GemStone::Agate)
}

fn random_kind(rng: &mut GameRng, class: ObjectClass) -> ObjectKind {
    match class {
        ObjectClass::Weapon => ObjectKind::Weapon,
        ObjectClass::Armor => ObjectKind::Armor,
        ObjectClass::Food => ObjectKind::Food,
        ObjectClass::Tool => ObjectKind::Tool,
        ObjectClass::Gem => ObjectKind::Gem(random_gem(rng)),
        ObjectClass::Potion => ObjectKind::Potion,
        ObjectClass::Scroll => ObjectKind::Scroll,
        ObjectClass::Spellbook => ObjectKind::Spellbook,
        ObjectClass::Wand => ObjectKind::Wand,
        ObjectClass::Ring => ObjectKind::Ring,
        ObjectClass::Amulet => ObjectKind::Amulet,
    }
}

/// Roll a random object from the class table (C `mkobj(RANDOM_CLASS)`)
///
/// Walks `mkobjprobs` with a 1..100 roll the way the C table walk
/// does. Gold, boulders, statues and containers never come out of
/// here; those are placed deliberately.
pub fn random_object(rng: &mut GameRng) -> Object {
    let mut tprob = rng.rnd(100) as i32;
    let mut class = ObjectClass::Food;
    for entry in MKOBJ_PROBS {
        tprob -= entry.prob as i32;
        if tprob <= 0 {
            class = entry.class;
            break;
        }
    }
    Object::new(random_kind(rng, class), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_class_table_covers_the_full_roll() {
        let total: u32 = MKOBJ_PROBS.iter().map(|e| e.prob as u32).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_gem_kind_count_matches_enum() {
        assert_eq!(GemStone::iter().count() as u32, GEM_KINDS);
        assert_eq!(GemStone::from_repr(0), Some(GemStone::DilithiumCrystal));
        assert_eq!(
            GemStone::from_repr(GEM_KINDS as usize - 1),
            Some(GemStone::Jade)
        );
        assert_eq!(GemStone::from_repr(GEM_KINDS as usize), None);
    }

    #[test]
    fn test_random_object_stays_in_the_table() {
        let mut rng = GameRng::new(7);
        for _ in 0..200 {
            let obj = random_object(&mut rng);
            assert_eq!(obj.quantity, 1);
            assert!(!matches!(
                obj.kind,
                ObjectKind::GoldPiece
                    | ObjectKind::Boulder
                    | ObjectKind::Statue
                    | ObjectKind::Chest
                    | ObjectKind::LargeBox
                    | ObjectKind::Bell
                    | ObjectKind::Corpse
                    | ObjectKind::KelpFrond
                    | ObjectKind::ScrollOfTeleportation
            ));
        }
    }

    #[test]
    fn test_random_gem_varies() {
        let mut rng = GameRng::new(3);
        let mut seen = [false; GEM_KINDS as usize];
        for _ in 0..300 {
            seen[random_gem(&mut rng) as usize] = true;
        }
        assert!(seen.iter().filter(|s| **s).count() > 10);
    }

    #[test]
    fn test_gem_display_names() {
        assert_eq!(GemStone::BlackOpal.to_string(), "black opal");
        assert_eq!(GemStone::Jade.to_string(), "jade");
    }
}
