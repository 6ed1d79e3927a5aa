//! Monster placement (makemon.c, teleport.c)
//!
//! `goodpos` is the one placement predicate everything else defers to:
//! monster creation, the ring search `enexto`, and the relocation code.
//! It is deliberately pure: same level, same answer.

#[cfg(not(feature = "std"))]
use crate::compat::*;

use bitflags::bitflags;

use super::{Monster, MonsterId, MoveCaps, Player};
use crate::consts::{isok, COLNO, ROWNO};
use crate::dungeon::{CellType, Level};
use crate::object::ObjectKind;
use crate::rng::GameRng;

bitflags! {
    /// Relaxations for `goodpos` (GP_* in C)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GoodposFlags: u8 {
        /// The player's tile is acceptable for a monster
        const ALLOW_PLAYER = 0x01;
        /// An already occupied tile is acceptable (displacement)
        const ALLOW_DISPLACE = 0x02;
        /// Skip the water capability check
        const IGNORE_WATER = 0x04;
        /// Skip the lava capability check
        const IGNORE_LAVA = 0x08;
        /// A shut door is acceptable
        const IGNORE_DOORS = 0x10;
        /// A boulder on the tile is acceptable
        const IGNORE_BOULDERS = 0x20;
    }
}

/// Who a placement check is for
#[derive(Debug, Clone, Copy)]
pub enum Occupant<'a> {
    /// An object looking for a floor tile; terrain rules only
    Object,
    Player(&'a Player),
    Monster(&'a Monster),
}

/// Can this occupant stand at (x, y)? (C `goodpos()`)
///
/// Pure: reads the level, draws nothing, changes nothing. A `None`
/// occupant is a bare terrain query. A monster occupant may stand on any
/// tile it already occupies, worm segments included.
pub fn goodpos(
    level: &Level,
    x: i8,
    y: i8,
    occupant: Option<Occupant<'_>>,
    flags: GoodposFlags,
) -> bool {
    if !isok(x, y) {
        return false;
    }

    // the player's tile
    if let (Some(Occupant::Monster(_)), Some(player)) = (&occupant, &level.player) {
        if player.x == x && player.y == y && !flags.contains(GoodposFlags::ALLOW_PLAYER) {
            return false;
        }
    }

    // other monsters
    if !flags.contains(GoodposFlags::ALLOW_DISPLACE) {
        match &occupant {
            Some(Occupant::Monster(mon)) => {
                if let Some(other) = level.monster_at(x, y) {
                    if other.id != mon.id {
                        return false;
                    }
                }
            }
            Some(Occupant::Player(_)) => {
                if level.monster_at(x, y).is_some() {
                    return false;
                }
            }
            _ => {}
        }
    }

    let caps = match &occupant {
        Some(Occupant::Monster(mon)) => mon.caps,
        Some(Occupant::Player(player)) => player.caps,
        _ => MoveCaps::empty(),
    };
    let is_player = matches!(&occupant, Some(Occupant::Player(_)));

    // terrain by capability
    let cell = &level.cells[x as usize][y as usize];
    if cell.typ.is_pool() {
        if !flags.contains(GoodposFlags::IGNORE_WATER) {
            let stays_dry = caps.over_water()
                || (is_player && caps.intersects(MoveCaps::AMPHIBIOUS | MoveCaps::WATER_WALK));
            if !stays_dry {
                return false;
            }
        }
    } else if cell.typ == CellType::Lava {
        if !flags.contains(GoodposFlags::IGNORE_LAVA) && !caps.over_lava() {
            return false;
        }
    } else if cell.typ.is_stone_or_wall() {
        if !caps.in_rock() {
            return false;
        }
    } else if !cell.typ.is_passable() {
        return false;
    }

    // a shut door stops everything that cannot ooze under it
    if cell.typ.is_door()
        && cell.door_is_shut()
        && !caps.contains(MoveCaps::AMORPHOUS)
        && !flags.contains(GoodposFlags::IGNORE_DOORS)
    {
        return false;
    }

    if level.object_at(ObjectKind::Boulder, x, y)
        && !caps.contains(MoveCaps::THROWS_ROCKS)
        && !flags.contains(GoodposFlags::IGNORE_BOULDERS)
    {
        return false;
    }

    true
}

/// Ring-search candidate cap (C MAX_GOOD)
pub const MAX_CANDIDATES: usize = 15;

/// Nearest-ring search for a `goodpos` tile (C `enexto_core()`)
///
/// Walks square rings of growing radius around (xx, yy), collecting up
/// to [`MAX_CANDIDATES`] acceptable tiles, and picks one at random as
/// soon as a ring produced any. The origin is never a candidate.
pub fn enexto_core(
    level: &Level,
    rng: &mut GameRng,
    xx: i8,
    yy: i8,
    caps: MoveCaps,
    flags: GoodposFlags,
) -> Option<(i8, i8)> {
    // capability carrier for goodpos
    let fakemon = Monster::new("", xx, yy, caps);
    let mut good: Vec<(i8, i8)> = Vec::with_capacity(MAX_CANDIDATES);
    let mut range: i32 = 1;

    loop {
        let xmin = (xx as i32 - range).max(1);
        let xmax = (xx as i32 + range).min(COLNO as i32 - 1);
        let ymin = (yy as i32 - range).max(0);
        let ymax = (yy as i32 + range).min(ROWNO as i32 - 1);

        let mut consider = |x: i32, y: i32, good: &mut Vec<(i8, i8)>| -> bool {
            let (x, y) = (x as i8, y as i8);
            if x == xx && y == yy {
                return false;
            }
            if goodpos(level, x, y, Some(Occupant::Monster(&fakemon)), flags) {
                good.push((x, y));
                return good.len() == MAX_CANDIDATES;
            }
            false
        };

        let mut full = false;
        for x in xmin..=xmax {
            if consider(x, ymin, &mut good) {
                full = true;
                break;
            }
        }
        if !full {
            for x in xmin..=xmax {
                if consider(x, ymax, &mut good) {
                    full = true;
                    break;
                }
            }
        }
        if !full {
            for y in (ymin + 1)..ymax {
                if consider(xmin, y, &mut good) {
                    full = true;
                    break;
                }
            }
        }
        if !full {
            for y in (ymin + 1)..ymax {
                if consider(xmax, y, &mut good) {
                    full = true;
                    break;
                }
            }
        }

        if full || !good.is_empty() {
            break;
        }
        range += 1;
        if range > ROWNO as i32 && range > COLNO as i32 {
            return None;
        }
    }

    let pick = rng.rn2(good.len() as u32) as usize;
    Some(good[pick])
}

/// Find a spot near (xx, yy) for something that moves like `caps`
/// (C `enexto()`)
///
/// Retries once allowing the player's tile before giving up with a
/// diagnostic.
pub fn enexto(
    level: &mut Level,
    rng: &mut GameRng,
    xx: i8,
    yy: i8,
    caps: MoveCaps,
) -> Option<(i8, i8)> {
    if let Some(cc) = enexto_core(level, rng, xx, yy, caps, GoodposFlags::empty()) {
        return Some(cc);
    }
    if let Some(cc) = enexto_core(level, rng, xx, yy, caps, GoodposFlags::ALLOW_PLAYER) {
        return Some(cc);
    }
    level.impossible(format!("enexto: no room anywhere near ({xx},{yy})"));
    None
}

/// Put a new monster on the level (C `makemon()`)
///
/// The requested spot must pass `goodpos`; failing that, the nearest
/// acceptable tile is used. None when even `enexto` comes up empty.
pub fn makemon(
    level: &mut Level,
    rng: &mut GameRng,
    name: &str,
    caps: MoveCaps,
    x: i8,
    y: i8,
) -> Option<MonsterId> {
    let mut mon = Monster::new(name, x, y, caps);
    if !goodpos(level, x, y, Some(Occupant::Monster(&mon)), GoodposFlags::empty()) {
        let (nx, ny) = enexto(level, rng, x, y, caps)?;
        mon.x = nx;
        mon.y = ny;
    }
    Some(level.add_monster(mon))
}

/// One row of the random-monster table
#[derive(Debug, Clone, Copy)]
pub struct Species {
    pub name: &'static str,
    pub caps: MoveCaps,
    /// Level difficulty where this species starts appearing
    pub difficulty: i32,
}

const fn sp(name: &'static str, caps: MoveCaps, difficulty: i32) -> Species {
    Species {
        name,
        caps,
        difficulty,
    }
}

/// Random dungeon inhabitants by the difficulty they first appear at.
/// A cut of the full bestiary: enough spread to exercise every terrain
/// capability the placement code branches on.
const SPECIES: &[Species] = &[
    sp("newt", MoveCaps::SWIM, 0),
    sp("sewer rat", MoveCaps::empty(), 0),
    sp("grid bug", MoveCaps::empty(), 0),
    sp("kobold", MoveCaps::empty(), 0),
    sp("jackal", MoveCaps::empty(), 0),
    sp("acid blob", MoveCaps::AMORPHOUS, 1),
    sp("gnome", MoveCaps::empty(), 1),
    sp("giant rat", MoveCaps::empty(), 1),
    sp("gas spore", MoveCaps::FLY, 1),
    sp("floating eye", MoveCaps::FLY, 2),
    sp("hill orc", MoveCaps::empty(), 2),
    sp("rock piercer", MoveCaps::CLING, 2),
    sp("dwarf", MoveCaps::empty(), 2),
    sp("yellow light", MoveCaps::FLY, 3),
    sp("giant ant", MoveCaps::empty(), 3),
    sp("soldier ant", MoveCaps::empty(), 4),
    sp("bugbear", MoveCaps::empty(), 4),
    sp("giant eel", MoveCaps::SWIM, 5),
    sp("gelatinous cube", MoveCaps::empty(), 5),
    sp("cockatrice", MoveCaps::empty(), 5),
    sp("gargoyle", MoveCaps::empty(), 6),
    sp("giant spider", MoveCaps::empty(), 7),
    sp("xorn", MoveCaps::PASS_WALLS.union(MoveCaps::EATS_ROCK), 8),
    sp("stalker", MoveCaps::FLY, 8),
    sp("air elemental", MoveCaps::FLY, 9),
    sp("long worm", MoveCaps::empty(), 9),
    sp("giant", MoveCaps::THROWS_ROCKS, 10),
    sp("troll", MoveCaps::empty(), 10),
    sp("vampire", MoveCaps::FLY, 11),
    sp("red dragon", MoveCaps::FLY, 12),
    sp("mind flayer", MoveCaps::LEVITATE, 13),
];

/// Pick a species fit for the current difficulty (C `rndmonst()`)
pub fn random_monster(rng: &mut GameRng, difficulty: i32) -> &'static Species {
    let eligible: Vec<&Species> = SPECIES
        .iter()
        .filter(|s| s.difficulty <= difficulty)
        .collect();
    rng.choose(&eligible).copied().unwrap_or(&SPECIES[0])
}
