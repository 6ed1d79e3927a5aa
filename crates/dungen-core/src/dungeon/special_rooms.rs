//! Special room selection and stocking (mkroom.c, shknam.c)
//!
//! After rooms, corridors, and the vault are in place, at most one
//! ordinary room per level is converted into something stranger. The
//! depth-gated chain in [`make_special_room`] decides which kind; the
//! `mk*` functions here claim a room and stock it with the monsters,
//! furniture, and loot that make the kind recognizable.

#[cfg(not(feature = "std"))]
use crate::compat::*;

use super::generation::{make_grave, topologize, GenContext};
use super::level::{EngravingType, Level};
use super::room::{has_dnstairs, has_upstairs, pick_room, somexy, Room, RoomType};
use super::{CellType, DoorState};
use crate::action::{rloc, rloc_to};
use crate::consts::isok;
use crate::monster::{enexto, makemon, random_monster, MoveCaps};
use crate::object::{Object, ObjectKind};
use crate::rng::GameRng;

/// Altar alignment bits, kept in the cell flags (C altarmask)
pub const AM_CHAOTIC: u8 = 0x01;
pub const AM_NEUTRAL: u8 = 0x02;
pub const AM_LAWFUL: u8 = 0x04;
/// Marks an altar as a temple shrine
pub const AM_SHRINE: u8 = 0x08;

/// Map an alignment roll (-1, 0, or 1) onto its altar mask (C `Align2amask`)
pub fn align_to_mask(align: i32) -> u8 {
    match align {
        a if a < 0 => AM_CHAOTIC,
        0 => AM_NEUTRAL,
        _ => AM_LAWFUL,
    }
}

struct ShopProb {
    prob: i32,
    kind: RoomType,
}

/// Shop frequencies out of 100 (C shtypes[]). Candle shops are never
/// rolled randomly.
const SHOP_PROBS: [ShopProb; 11] = [
    ShopProb {
        prob: 42,
        kind: RoomType::GeneralShop,
    },
    ShopProb {
        prob: 14,
        kind: RoomType::ArmorShop,
    },
    ShopProb {
        prob: 10,
        kind: RoomType::ScrollShop,
    },
    ShopProb {
        prob: 10,
        kind: RoomType::PotionShop,
    },
    ShopProb {
        prob: 5,
        kind: RoomType::WeaponShop,
    },
    ShopProb {
        prob: 5,
        kind: RoomType::FoodShop,
    },
    ShopProb {
        prob: 3,
        kind: RoomType::RingShop,
    },
    ShopProb {
        prob: 3,
        kind: RoomType::WandShop,
    },
    ShopProb {
        prob: 3,
        kind: RoomType::ToolShop,
    },
    ShopProb {
        prob: 3,
        kind: RoomType::BookShop,
    },
    ShopProb {
        prob: 2,
        kind: RoomType::HealthFoodShop,
    },
];

/// Soldier ranks and their weights (C squadprob[])
const SQUAD_PROBS: [(&str, u32); 4] = [
    ("soldier", 80),
    ("sergeant", 15),
    ("lieutenant", 4),
    ("captain", 1),
];

const FUNGI: &[&str] = &[
    "lichen",
    "brown mold",
    "yellow mold",
    "green mold",
    "red mold",
    "shrieker",
    "violet fungus",
];

/// Maybe convert one room into a special room.
///
/// Runs the depth-gated selection chain once per level; the first gate
/// that passes claims the level's special room and the rest are never
/// rolled. Levels with fewer than `room_threshold` rooms get nothing.
pub fn make_special_room(
    level: &mut Level,
    ctx: &GenContext,
    rng: &mut GameRng,
    room_threshold: usize,
) {
    if level.rooms.len() < room_threshold {
        return;
    }
    let depth = ctx.dlevel.depth();

    if depth > 1 && (rng.rn2(depth as u32) as i32) < 3 {
        mkroom(level, ctx, rng, RoomType::GeneralShop);
    } else if depth > 4 && rng.rn2(6) == 0 {
        mkroom(level, ctx, rng, RoomType::Court);
    } else if depth > 5 && rng.rn2(8) == 0 {
        mkroom(level, ctx, rng, RoomType::LeprechaunHall);
    } else if depth > 6 && rng.rn2(7) == 0 {
        mkroom(level, ctx, rng, RoomType::Zoo);
    } else if depth > 8 && rng.rn2(5) == 0 {
        mkroom(level, ctx, rng, RoomType::Temple);
    } else if depth > 9 && rng.rn2(5) == 0 {
        mkroom(level, ctx, rng, RoomType::Beehive);
    } else if depth > 11 && rng.rn2(6) == 0 {
        mkroom(level, ctx, rng, RoomType::Morgue);
    } else if depth > 12 && rng.rn2(8) == 0 {
        mkroom(level, ctx, rng, RoomType::Anthole);
    } else if depth > 14 && rng.rn2(4) == 0 {
        mkroom(level, ctx, rng, RoomType::Barracks);
    } else if depth > 15 && rng.rn2(6) == 0 {
        mkroom(level, ctx, rng, RoomType::Swamp);
    } else if depth > 16 && rng.rn2(8) == 0 {
        mkroom(level, ctx, rng, RoomType::CockatriceNest);
    }
}

/// Make and stock a room of the given type (C `mkroom()`)
pub fn mkroom(level: &mut Level, ctx: &GenContext, rng: &mut GameRng, room_type: RoomType) {
    if room_type.is_shop() {
        mkshop(level, rng);
        return;
    }
    match room_type {
        RoomType::Court
        | RoomType::Zoo
        | RoomType::Beehive
        | RoomType::Morgue
        | RoomType::Barracks
        | RoomType::LeprechaunHall
        | RoomType::CockatriceNest
        | RoomType::Anthole => mkzoo(level, ctx, rng, room_type),
        RoomType::Swamp => mkswamp(level, rng),
        RoomType::Temple => mktemple(level, rng),
        _ => level.impossible(format!("tried to make a room of type {room_type:?}")),
    }
}

/// Convert one eligible room into a shop and stock it (C `mkshop()`)
///
/// Shops want exactly one door and no stairs, and take the first room
/// in the list that qualifies.
pub fn mkshop(level: &mut Level, rng: &mut GameRng) {
    let mut chosen = None;
    for (idx, room) in level.rooms.iter().enumerate() {
        if room.room_type != RoomType::Ordinary {
            continue;
        }
        if has_dnstairs(room, level) || has_upstairs(room, level) {
            continue;
        }
        if room.door_count == 1 {
            chosen = Some(idx);
            break;
        }
    }
    let Some(idx) = chosen else {
        return;
    };

    // shops are always lit
    if !level.rooms[idx].lit {
        let (wlx, wly, whx, why) = level.rooms[idx].wall_bounds();
        for x in wlx..=whx {
            for y in wly..=why {
                level.cells[x][y].lit = true;
            }
        }
        level.rooms[idx].lit = true;
    }

    let mut j = rng.rnd(100) as i32;
    let mut kind = RoomType::GeneralShop;
    for entry in &SHOP_PROBS {
        j -= entry.prob;
        if j <= 0 {
            kind = entry.kind;
            break;
        }
    }
    // big rooms cannot be wand or book shops
    if isbig(&level.rooms[idx]) && (kind == RoomType::WandShop || kind == RoomType::BookShop) {
        kind = RoomType::GeneralShop;
    }
    level.rooms[idx].room_type = kind;

    // label the room cells before stocking
    topologize(level, idx);

    stock_room(level, rng, idx);
}

/// Fix up the shop door and install the shopkeeper (C `stock_room()`)
///
/// Shelf inventory is the shopkeeper subsystem's concern, not the
/// generator's; only the structural repairs happen here.
fn stock_room(level: &mut Level, rng: &mut GameRng, room_idx: usize) {
    if !shkinit(level, rng, room_idx) {
        return;
    }

    let room = level.rooms[room_idx].clone();
    let Some((dx, dy)) = level
        .doors
        .get(room.first_door_idx as usize)
        .map(|d| (d.x, d.y))
    else {
        return;
    };
    let (ux, uy) = (dx as usize, dy as usize);

    // no doorless doorways or trapped doors in shops
    if level.cells[ux][uy].typ == CellType::Door
        && level.cells[ux][uy].door_state() == DoorState::NO_DOOR
    {
        level.cells[ux][uy].set_door_state(DoorState::OPEN);
    }
    if level.cells[ux][uy].typ == CellType::SecretDoor {
        level.cells[ux][uy].typ = CellType::Door;
        if !level.cells[ux][uy].door_state().contains(DoorState::LOCKED) {
            let state = level.cells[ux][uy].door_state() | DoorState::CLOSED;
            level.cells[ux][uy].set_door_state(state);
        }
    }
    if level.cells[ux][uy].door_state().contains(DoorState::TRAPPED) {
        level.cells[ux][uy].set_door_state(DoorState::LOCKED);
    }
    if level.cells[ux][uy].door_state() == DoorState::LOCKED {
        // the sign hangs outside the door
        let (mut mx, mut my) = (dx, dy);
        if room.contains(mx as usize + 1, my as usize) {
            mx -= 1;
        } else if room.contains((mx as usize).wrapping_sub(1), my as usize) {
            mx += 1;
        }
        if room.contains(mx as usize, my as usize + 1) {
            my -= 1;
        } else if room.contains(mx as usize, (my as usize).wrapping_sub(1)) {
            my += 1;
        }
        level.engrave(mx, my, "Closed for inventory", EngravingType::Dust);
    }

    level.flags.has_shop = true;
}

/// Place the shopkeeper just inside the shop door (C `shkinit()`)
fn shkinit(level: &mut Level, rng: &mut GameRng, room_idx: usize) -> bool {
    let room = level.rooms[room_idx].clone();
    let Some((mut sx, mut sy)) = level
        .doors
        .get(room.first_door_idx as usize)
        .map(|d| (d.x, d.y))
    else {
        return false;
    };
    let (lx, ly, hx, hy) = room.bounds();

    if sx == lx as i8 - 1 {
        sx += 1;
    } else if sx == hx as i8 + 1 {
        sx -= 1;
    } else if sy == ly as i8 - 1 {
        sy += 1;
    } else if sy == hy as i8 + 1 {
        sy -= 1;
    } else {
        level.impossible("shkinit: where is the shop door?");
        return false;
    }

    // evict any squatter from the shopkeeper's square
    if let Some(squatter) = level.monster_at(sx, sy) {
        let (id, caps) = (squatter.id, squatter.caps);
        if let Some((nx, ny)) = enexto(level, rng, sx, sy, caps) {
            rloc_to(level, rng, id, nx, ny);
        }
    }

    let Some(id) = makemon(level, rng, "shopkeeper", MoveCaps::empty(), sx, sy) else {
        return false;
    };
    if let Some(shk) = level.monster_mut(id) {
        shk.peaceful = true;
        shk.confined_to = Some(room_idx);
    }
    true
}

/// Turn a picked room into a monster-filled special room (C `mkzoo()`)
pub fn mkzoo(level: &mut Level, ctx: &GenContext, rng: &mut GameRng, rtype: RoomType) {
    let Some(idx) = pick_room(&level.rooms, level, false, rng) else {
        return;
    };
    level.rooms[idx].room_type = rtype;
    fill_zoo(level, ctx, rng, idx);
}

/// Stock a zoo-style room with its monsters and loot (C `fill_zoo()`)
pub fn fill_zoo(level: &mut Level, ctx: &GenContext, rng: &mut GameRng, room_idx: usize) {
    let room = level.rooms[room_idx].clone();
    let rtype = room.room_type;
    let difficulty = ctx.difficulty;
    let (lx, ly, hx, hy) = room.bounds();

    let first_door = if room.door_count > 0 {
        level
            .doors
            .get(room.first_door_idx as usize)
            .map(|d| (d.x, d.y))
    } else {
        None
    };

    let mut tx = 0usize;
    let mut ty = 0usize;
    let mut goldlim: i32 = 0;

    match rtype {
        RoomType::Court => {
            // don't put the throne on the stairs
            let (cx, cy) = room.center();
            tx = cx;
            ty = cy;
            let mut i = 100;
            loop {
                if let Some((x, y)) = somexy(&room, room_idx, &level.rooms, level, rng) {
                    tx = x;
                    ty = y;
                }
                i -= 1;
                if !level.occupied(tx as i8, ty as i8) || i <= 0 {
                    break;
                }
            }
        }
        RoomType::Beehive => {
            let (cx, cy) = room.center();
            tx = cx;
            ty = cy;
        }
        RoomType::Zoo | RoomType::LeprechaunHall => {
            goldlim = 500 * difficulty;
        }
        _ => {}
    }

    for sx in lx..=hx {
        for sy in ly..=hy {
            let typ = level.cells[sx][sy].typ;
            // skip anything that isn't open floor, and the row or
            // column nearest the first door so the entrance stays clear
            if (typ as u8) <= (CellType::Door as u8) {
                continue;
            }
            if let Some((fx, fy)) = first_door {
                if (sx == lx && fx == sx as i8 - 1)
                    || (sx == hx && fx == sx as i8 + 1)
                    || (sy == ly && fy == sy as i8 - 1)
                    || (sy == hy && fy == sy as i8 + 1)
                {
                    continue;
                }
            }
            if rtype == RoomType::Court && typ == CellType::Throne {
                continue;
            }

            let (name, caps) = match rtype {
                RoomType::Court => courtmon(rng, difficulty),
                RoomType::Barracks => squadmon(rng, difficulty),
                RoomType::Morgue => morguemon(rng, difficulty),
                RoomType::Beehive => {
                    if sx == tx && sy == ty {
                        ("queen bee", MoveCaps::FLY)
                    } else {
                        ("killer bee", MoveCaps::FLY)
                    }
                }
                RoomType::LeprechaunHall => ("leprechaun", MoveCaps::empty()),
                RoomType::CockatriceNest => ("cockatrice", MoveCaps::empty()),
                RoomType::Anthole => antholemon(difficulty),
                _ => {
                    let species = random_monster(rng, difficulty);
                    (species.name, species.caps)
                }
            };
            if let Some(id) = makemon(level, rng, name, caps, sx as i8, sy as i8) {
                if let Some(mon) = level.monster_mut(id) {
                    mon.sleeping = rtype.monsters_sleep();
                }
            }

            match rtype {
                RoomType::Zoo | RoomType::LeprechaunHall => {
                    // gold piles shrink toward the door, within a budget
                    let mut i = if let Some((fx, fy)) = first_door {
                        let d = dist2(sx as i32, sy as i32, fx as i32, fy as i32);
                        d * d
                    } else {
                        goldlim
                    };
                    if i >= goldlim {
                        i = 5 * difficulty;
                    }
                    goldlim -= i;
                    let amount = rng.rn1(i.max(0) as u32, 10) as u32;
                    mkgold(level, ctx, rng, Some(amount), sx as i8, sy as i8);
                }
                RoomType::Morgue => {
                    if rng.rn2(5) == 0 {
                        level.add_object(Object::new(ObjectKind::Corpse, 1), sx as i8, sy as i8);
                    }
                    // lots of treasure buried with the dead
                    if rng.rn2(10) == 0 {
                        let kind = if rng.rn2(3) != 0 {
                            ObjectKind::LargeBox
                        } else {
                            ObjectKind::Chest
                        };
                        level.add_object(Object::new(kind, 1), sx as i8, sy as i8);
                    }
                    if rng.rn2(5) == 0 {
                        make_grave(level, rng, sx as i8, sy as i8, None);
                    }
                }
                RoomType::Beehive => {
                    if rng.rn2(3) == 0 {
                        // lumps of royal jelly
                        level.add_object(Object::new(ObjectKind::Food, 1), sx as i8, sy as i8);
                    }
                }
                RoomType::Barracks => {
                    // the payroll and some loot
                    if rng.rn2(20) == 0 {
                        let kind = if rng.rn2(3) != 0 {
                            ObjectKind::Chest
                        } else {
                            ObjectKind::LargeBox
                        };
                        level.add_object(Object::new(kind, 1), sx as i8, sy as i8);
                    }
                }
                _ => {}
            }
        }
    }

    match rtype {
        RoomType::Court => {
            level.cells[tx][ty].typ = CellType::Throne;
            if let Some((gx, gy)) = somexy(&room, room_idx, &level.rooms, level, rng) {
                let amount = rng.rn1((50 * difficulty).max(0) as u32, 10) as u32;
                mkgold(level, ctx, rng, Some(amount), gx as i8, gy as i8);
                // the royal coffers
                level.add_object(Object::new(ObjectKind::Chest, 1), gx as i8, gy as i8);
            }
            level.flags.has_court = true;
        }
        RoomType::Barracks => level.flags.has_barracks = true,
        RoomType::Zoo => level.flags.has_zoo = true,
        RoomType::Morgue => level.flags.has_morgue = true,
        RoomType::Beehive => level.flags.has_beehive = true,
        _ => {}
    }
}

/// Throne room guards, tougher with depth (C `courtmon()`)
pub fn courtmon(rng: &mut GameRng, difficulty: i32) -> (&'static str, MoveCaps) {
    let i = rng.rn2(60) as i32 + rng.rn2((3 * difficulty).max(0) as u32) as i32;
    if i > 100 {
        ("dragon", MoveCaps::FLY)
    } else if i > 95 {
        ("giant", MoveCaps::THROWS_ROCKS)
    } else if i > 85 {
        ("troll", MoveCaps::empty())
    } else if i > 75 {
        ("centaur", MoveCaps::empty())
    } else if i > 60 {
        ("orc", MoveCaps::empty())
    } else if i > 45 {
        ("bugbear", MoveCaps::empty())
    } else if i > 30 {
        ("hobgoblin", MoveCaps::empty())
    } else if i > 15 {
        ("gnome", MoveCaps::empty())
    } else {
        ("kobold", MoveCaps::empty())
    }
}

/// Soldier ranks for barracks, weighted toward the enlisted (C `squadmon()`)
pub fn squadmon(rng: &mut GameRng, difficulty: i32) -> (&'static str, MoveCaps) {
    let sel = rng.rnd((80 + difficulty).max(1) as u32);
    let mut cpro = 0;
    for &(name, prob) in &SQUAD_PROBS {
        cpro += prob;
        if cpro > sel {
            return (name, MoveCaps::empty());
        }
    }
    let (name, _) = SQUAD_PROBS[rng.rn2(SQUAD_PROBS.len() as u32) as usize];
    (name, MoveCaps::empty())
}

/// Morgue denizens (C `morguemon()`)
pub fn morguemon(rng: &mut GameRng, difficulty: i32) -> (&'static str, MoveCaps) {
    let i = rng.rn2(100);
    let hd = rng.rn2(difficulty.max(0) as u32);

    if hd > 10 && i < 10 {
        ("demon", MoveCaps::FLY)
    } else if hd > 8 && i > 85 {
        ("vampire", MoveCaps::FLY)
    } else if i < 20 {
        ("ghost", MoveCaps::PASS_WALLS)
    } else if i < 40 {
        ("wraith", MoveCaps::empty())
    } else {
        ("zombie", MoveCaps::empty())
    }
}

/// Ant species for an anthole (C `antholemon()`)
///
/// Deterministic in the difficulty: the same level always grows the
/// same kind of ant, different levels differ.
pub fn antholemon(difficulty: i32) -> (&'static str, MoveCaps) {
    match difficulty.rem_euclid(3) {
        0 => ("soldier ant", MoveCaps::empty()),
        1 => ("fire ant", MoveCaps::empty()),
        _ => ("giant ant", MoveCaps::empty()),
    }
}

/// Bog up to five rooms with pools, eels, and mold (C `mkswamp()`)
pub fn mkswamp(level: &mut Level, rng: &mut GameRng) {
    if level.rooms.is_empty() {
        return;
    }
    let mut eelct = 0;

    for _ in 0..5 {
        let idx = rng.rn2(level.rooms.len() as u32) as usize;
        {
            let room = &level.rooms[idx];
            if room.room_type != RoomType::Ordinary
                || has_upstairs(room, level)
                || has_dnstairs(room, level)
            {
                continue;
            }
        }
        level.rooms[idx].room_type = RoomType::Swamp;

        let (lx, ly, hx, hy) = level.rooms[idx].bounds();
        for sx in lx..=hx {
            for sy in ly..=hy {
                let (ix, iy) = (sx as i8, sy as i8);
                if !level.objects_at(ix, iy).is_empty()
                    || level.monster_at(ix, iy).is_some()
                    || level.trap_at(ix, iy).is_some()
                    || nexttodoor(level, ix, iy)
                {
                    continue;
                }
                if (sx + sy) % 2 == 1 {
                    level.cells[sx][sy].typ = CellType::Pool;
                    if eelct == 0 || rng.rn2(4) == 0 {
                        let name = if rng.rn2(5) != 0 {
                            "giant eel"
                        } else if rng.rn2(2) != 0 {
                            "piranha"
                        } else {
                            "electric eel"
                        };
                        makemon(level, rng, name, MoveCaps::SWIM, ix, iy);
                        eelct += 1;
                    }
                } else if rng.rn2(4) == 0 {
                    // the dry squares tend to be moldy
                    if let Some(&name) = rng.choose(FUNGI) {
                        makemon(level, rng, name, MoveCaps::empty(), ix, iy);
                    }
                }
            }
        }
        level.flags.has_swamp = true;
    }
}

/// Consecrate a temple: a shrine in the center and its attendant
/// priest (C `mktemple()`)
pub fn mktemple(level: &mut Level, rng: &mut GameRng) {
    let Some(idx) = pick_room(&level.rooms, level, true, rng) else {
        return;
    };
    level.rooms[idx].room_type = RoomType::Temple;

    // shrines are altars in the middle of the room
    let (sx, sy) = shrine_pos(&level.rooms[idx]);
    let align = rng.rn2(3) as i32 - 1;
    level.cells[sx][sy].typ = CellType::Altar;
    level.cells[sx][sy].flags = align_to_mask(align);
    priestini(level, rng, idx, sx as i8, sy as i8);
    level.cells[sx][sy].flags |= AM_SHRINE;
    level.flags.has_temple = true;
}

/// Center of a room, rounding toward the upper left (C `shrine_pos()`)
fn shrine_pos(room: &Room) -> (usize, usize) {
    (
        room.x + (room.width - 1) / 2,
        room.y + (room.height - 1) / 2,
    )
}

/// Put the resident priest next to the shrine (C `priestini()`)
fn priestini(level: &mut Level, rng: &mut GameRng, room_idx: usize, sx: i8, sy: i8) {
    // the priest's square must be empty
    if let Some(squatter) = level.monster_at(sx + 1, sy) {
        let id = squatter.id;
        rloc(level, rng, id, false);
    }
    if let Some(id) = makemon(level, rng, "aligned priest", MoveCaps::empty(), sx + 1, sy) {
        if let Some(priest) = level.monster_mut(id) {
            priest.peaceful = true;
            priest.confined_to = Some(room_idx);
        }
    }
}

/// Drop a pile of gold, merging with any pile already there (C `mkgold()`)
///
/// Without an explicit amount the pile size scales with depth.
pub fn mkgold(
    level: &mut Level,
    ctx: &GenContext,
    rng: &mut GameRng,
    amount: Option<u32>,
    x: i8,
    y: i8,
) {
    let amount = match amount {
        Some(n) if n > 0 => n,
        _ => {
            let max = 30 / (12 - ctx.dlevel.depth()).max(2);
            1 + rng.rnd((ctx.difficulty + 2).max(1) as u32) * rng.rnd(max.max(1) as u32)
        }
    };
    if let Some(gold) = level
        .objects
        .iter_mut()
        .find(|o| o.kind == ObjectKind::GoldPiece && o.x == x && o.y == y)
    {
        gold.quantity += amount;
        return;
    }
    level.add_object(Object::new(ObjectKind::GoldPiece, amount), x, y);
}

/// True on or next to a door or secret door, diagonals included
/// (C `nexttodoor()`)
fn nexttodoor(level: &Level, sx: i8, sy: i8) -> bool {
    for dx in -1i8..=1 {
        for dy in -1i8..=1 {
            let (x, y) = (sx + dx, sy + dy);
            if !isok(x, y) {
                continue;
            }
            if level.cells[x as usize][y as usize].typ.is_door() {
                return true;
            }
        }
    }
    false
}

/// Squared euclidean distance
fn dist2(x0: i32, y0: i32, x1: i32, y1: i32) -> i32 {
    let dx = x0 - x1;
    let dy = y0 - y1;
    dx * dx + dy * dy
}

/// Too big for a specialty shop (C `isbig()`)
fn isbig(room: &Room) -> bool {
    (room.width - 1) * (room.height - 1) > 20
}
