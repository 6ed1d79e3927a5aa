//! Core level generation (mklev.c)
//!
//! Builds a complete dungeon level from a seeded RNG: random rooms
//! carved out of the free-rectangle pool, stairs, corridors, niches,
//! the vault, one optional special room, then furniture, traps, and
//! loot for every ordinary room. The same seed and context always
//! produce the same level.

#[cfg(not(feature = "std"))]
use crate::compat::*;

use super::corridor::{makecorridors, RoomJoiner};
use super::dlevel::level_difficulty;
use super::door::bydoor;
use super::level::{EngravingType, Level, Stairway, TrapType};
use super::mineral::mineralize;
use super::niche::make_niches;
use super::rect::{NhRect, RectManager};
use super::room::{somex, somexy, somey, Room, RoomType};
use super::special_rooms::{align_to_mask, make_special_room, mkgold};
use super::trap::{maketrap, mktrap};
use super::vault::place_vault;
use super::{CellType, DLevel};
use crate::consts::{COLNO, MAXNROFROOMS, NO_ROOM, ROOMOFFSET, ROWNO, SHARED, XLIM, YLIM};
use crate::monster::{makemon, random_monster};
use crate::object::{random_object, Object, ObjectKind};
use crate::rng::GameRng;

/// Cell flag bit for a blessed fountain
pub const BLESSED_FOUNTAIN: u8 = 0x01;

/// Headstone texts for graves without a named occupant
const EPITAPHS: &[&str] = &[
    "Rest in peace",
    "R.I.P.",
    "Rest In Pieces",
    "Go away!",
    "Gone, but not forgotten",
    "Here lies an Atheist, all dressed up and no place to go",
    "Here lies Johnny Yeast. Pardon me for not rising",
    "He always lied while on the earth and now he's lying in it",
    "Soon ripe. Soon rotten. Soon gone. But not forgotten.",
    "Here lies the body of Jonathan Blake. Stepped on the gas instead of the brake.",
];

/// Wall scribbles for the occasional graffito
const GRAFFITI: &[&str] = &[
    "Elbereth",
    "Vlad was here",
    "ad aerarium",
    "Owlbreath",
    "Galadriel",
    "Kilroy was here",
    "A.S. ->",
    "<- A.S.",
    "You won't get it up the steps",
    "Lasciate ogni speranza o voi ch'entrate.",
    "Well Come",
    "We apologize for the inconvenience",
    "See you next Wednesday",
    "notary sojak",
    "For a good time call 8?7-5309",
];

/// Per-level generation parameters
///
/// Everything the builder needs to know about where in the dungeon it
/// is working, plus the cross-level state it is allowed to update.
#[derive(Debug, Clone)]
pub struct GenContext {
    /// Level being generated
    pub dlevel: DLevel,
    /// Difficulty, from depth and the player's experience
    pub difficulty: i32,
    /// Gehennom levels get no graves or minerals
    pub in_hell: bool,
    /// Last level of its branch; no down stairs, nothing can fall through
    pub is_bottom: bool,
    /// The amulet guarantees a wandering monster per room
    pub has_amulet: bool,
    /// The one-per-game Ludios portal has been placed
    pub knox_done: bool,
    /// Spot reserved for the vault while rooms were laid out
    pub vault_pos: Option<(i8, i8)>,
}

impl GenContext {
    pub fn new(dlevel: DLevel, player_level: i32, is_bottom: bool) -> Self {
        Self {
            dlevel,
            difficulty: level_difficulty(&dlevel, player_level),
            in_hell: false,
            is_bottom,
            has_amulet: false,
            knox_done: false,
            vault_pos: None,
        }
    }

    /// Whether a hole or trap door has anywhere to lead (C `Can_fall_thru`)
    pub fn can_fall_thru(&self) -> bool {
        !self.is_bottom
    }
}

/// Check a proposed room area against the map, shrinking it to fit
/// (C `check_room()`)
///
/// `lowx..lowx+ddx` by `lowy..lowy+ddy` is the proposed floor area.
/// Any already-carved cell within the separation margin either shrinks
/// the room away from the collision or, 1 time in 3, rejects it.
pub fn check_room(
    level: &Level,
    rng: &mut GameRng,
    lowx: &mut i8,
    ddx: &mut i8,
    lowy: &mut i8,
    ddy: &mut i8,
    vault: bool,
) -> bool {
    let xlim = XLIM + if vault { 1 } else { 0 };
    let ylim = YLIM + if vault { 1 } else { 0 };

    let mut hix = *lowx + *ddx;
    let mut hiy = *lowy + *ddy;

    if *lowx < 3 {
        *lowx = 3;
    }
    if *lowy < 2 {
        *lowy = 2;
    }
    if hix > COLNO as i8 - 3 {
        hix = COLNO as i8 - 3;
    }
    if hiy > ROWNO as i8 - 3 {
        hiy = ROWNO as i8 - 3;
    }

    'check: loop {
        if hix <= *lowx || hiy <= *lowy {
            return false;
        }

        for x in (*lowx - xlim)..=(hix + xlim) {
            if x <= 0 || x >= COLNO as i8 {
                continue;
            }
            let ymax = (hiy + ylim).min(ROWNO as i8 - 1);
            let mut y = (*lowy - ylim).max(0);
            while y <= ymax {
                if level.cells[x as usize][y as usize].typ != CellType::Stone {
                    if rng.rn2(3) == 0 {
                        return false;
                    }
                    if x < *lowx {
                        *lowx = x + xlim + 1;
                    } else {
                        hix = x - xlim - 1;
                    }
                    if y < *lowy {
                        *lowy = y + ylim + 1;
                    } else {
                        hiy = y - ylim - 1;
                    }
                    continue 'check;
                }
                y += 1;
            }
        }

        *ddx = hix - *lowx;
        *ddy = hiy - *lowy;
        return true;
    }
}

/// Try to place one room of the given type (C `create_room()`)
///
/// Dimensions and position are rolled inside a random free rectangle,
/// retried up to 100 times. A successful ordinary room is carved and
/// registered; a vault only reserves its position in the context, to
/// be carved after the corridors know to avoid it. `rlit` of None rolls
/// the usual depth-based lighting.
pub fn create_room(
    level: &mut Level,
    ctx: &mut GenContext,
    rects: &mut RectManager,
    rng: &mut GameRng,
    rtype: RoomType,
    rlit: Option<bool>,
) -> bool {
    let vault = rtype == RoomType::Vault;
    let xlim = XLIM + if vault { 1 } else { 0 };
    let ylim = YLIM + if vault { 1 } else { 0 };

    // on shallow levels the room is usually lit
    let depth = ctx.dlevel.depth();
    let rlit = rlit.unwrap_or_else(|| rng.rnd(1 + depth.unsigned_abs()) < 11 && rng.rn2(77) != 0);

    let mut trycnt = 0;
    let (r1, r2, xabs, yabs, wtmp, htmp) = loop {
        let Some(rect) = rects.rnd_rect(rng) else {
            return false; // no more free rectangles
        };
        let (lx, ly, hx, hy) = (rect.lx, rect.ly, rect.hx, rect.hy);

        let mut dx: i8;
        let mut dy: i8;
        if vault {
            dx = 1;
            dy = 1;
        } else {
            dx = 2 + rng.rn2(if hx - lx > 28 { 12 } else { 8 }) as i8;
            dy = 2 + rng.rn2(4) as i8;
            if (dx as i32) * (dy as i32) > 50 {
                dy = (50 / dx as i32) as i8;
            }
        }
        let xborder = if lx > 0 && hx < COLNO as i8 - 1 {
            2 * xlim
        } else {
            xlim + 1
        };
        let yborder = if ly > 0 && hy < ROWNO as i8 - 1 {
            2 * ylim
        } else {
            ylim + 1
        };
        if hx - lx < dx + 3 + xborder || hy - ly < dy + 3 + yborder {
            trycnt += 1;
            if trycnt > 100 {
                return false;
            }
            continue;
        }

        let mut xabs = lx
            + if lx > 0 { xlim } else { 3 }
            + rng.rn2((hx - if lx > 0 { lx } else { 3 } - dx - xborder + 1) as u32) as i8;
        let mut yabs = ly
            + if ly > 0 { ylim } else { 2 }
            + rng.rn2((hy - if ly > 0 { ly } else { 2 } - dy - yborder + 1) as u32) as i8;

        // a full-height rectangle sometimes pulls its room toward the
        // top so the bottom of the map doesn't crowd up
        let nroom = level.rooms.len();
        if ly == 0
            && hy >= ROWNO as i8 - 1
            && (nroom == 0 || rng.rn2(nroom as u32) == 0)
            && yabs + dy > ROWNO as i8 / 2
        {
            yabs = rng.rn1(3, 2) as i8;
            if nroom < 4 && dy > 1 {
                dy -= 1;
            }
        }

        if !check_room(level, rng, &mut xabs, &mut dx, &mut yabs, &mut dy, vault) {
            trycnt += 1;
            if trycnt > 100 {
                return false;
            }
            continue;
        }

        let wtmp = dx + 1;
        let htmp = dy + 1;
        let r2 = NhRect::new(xabs - 1, yabs - 1, xabs + wtmp, yabs + htmp);
        break (rect, r2, xabs, yabs, wtmp, htmp);
    };

    rects.split_rects(r1, r2);

    if vault {
        ctx.vault_pos = Some((xabs, yabs));
    } else {
        add_room(
            level,
            xabs,
            yabs,
            xabs + wtmp - 1,
            yabs + htmp - 1,
            rlit,
            rtype,
        );
    }
    true
}

/// Carve a room's floor, walls, and corners, and register it
/// (C `add_room()` / `do_room_or_subroom()`)
pub fn add_room(level: &mut Level, lowx: i8, lowy: i8, hix: i8, hiy: i8, lit: bool, rtype: RoomType) {
    // never against the map border
    let lowx = lowx.max(1);
    let lowy = lowy.max(1);
    let hix = hix.min(COLNO as i8 - 2);
    let hiy = hiy.min(ROWNO as i8 - 2);

    if lit {
        for x in (lowx - 1)..=(hix + 1) {
            for y in (lowy - 1).max(0)..=(hiy + 1) {
                level.cells[x as usize][y as usize].lit = true;
            }
        }
    }

    let mut room = Room::with_type(
        lowx as usize,
        lowy as usize,
        (hix - lowx + 1) as usize,
        (hiy - lowy + 1) as usize,
        rtype,
        lit,
    );
    room.first_door_idx = level.doors.len() as u8;

    // top and bottom walls, then the sides, then the floor
    for x in (lowx - 1)..=(hix + 1) {
        let mut y = lowy - 1;
        while y <= hiy + 1 {
            let cell = &mut level.cells[x as usize][y as usize];
            cell.typ = CellType::HWall;
            cell.horizontal = true;
            y += hiy - lowy + 2;
        }
    }
    for y in lowy..=hiy {
        // step in i32: the loop-exit increment for a wide room overflows i8
        let mut x = lowx as i32 - 1;
        while x <= hix as i32 + 1 {
            let cell = &mut level.cells[x as usize][y as usize];
            cell.typ = CellType::VWall;
            cell.horizontal = false;
            x += hix as i32 - lowx as i32 + 2;
        }
    }
    for x in lowx..=hix {
        for y in lowy..=hiy {
            level.cells[x as usize][y as usize].typ = CellType::Room;
        }
    }
    level.cells[(lowx - 1) as usize][(lowy - 1) as usize].typ = CellType::TLCorner;
    level.cells[(hix + 1) as usize][(lowy - 1) as usize].typ = CellType::TRCorner;
    level.cells[(lowx - 1) as usize][(hiy + 1) as usize].typ = CellType::BLCorner;
    level.cells[(hix + 1) as usize][(hiy + 1) as usize].typ = CellType::BRCorner;

    level.rooms.push(room);
}

/// Fill the level with random rooms (C `makerooms()`)
///
/// Keeps carving until the room cap or the free-rectangle pool runs
/// out. Once a sixth of the cap exists, one attempt may reserve the
/// vault instead.
pub fn makerooms(level: &mut Level, ctx: &mut GenContext, rects: &mut RectManager, rng: &mut GameRng) {
    let mut tried_vault = false;

    while level.rooms.len() < MAXNROFROOMS && rects.rnd_rect(rng).is_some() {
        if level.rooms.len() >= MAXNROFROOMS / 6 && rng.rn2(2) != 0 && !tried_vault {
            tried_vault = true;
            create_room(level, ctx, rects, rng, RoomType::Vault, Some(true));
        } else if !create_room(level, ctx, rects, rng, RoomType::Ordinary, None) {
            return;
        }
    }
}

/// Place a staircase (C `mkstairs()`)
///
/// The destination is the adjacent level in this dungeon.
pub fn mkstairs(level: &mut Level, x: i8, y: i8, up: bool) {
    if x == 0 {
        level.impossible(format!("mkstairs: bogus stair attempt at ({x},{y})"));
        return;
    }
    let destination = DLevel::new(
        level.dlevel.dungeon_num,
        level.dlevel.level_num + if up { -1 } else { 1 },
    );
    level.cells[x as usize][y as usize].typ = CellType::Stairs;
    level.stairs.push(Stairway {
        x,
        y,
        destination,
        up,
    });
}

/// Build a complete level (C `makelevel()` / `mklev()`)
pub fn generate_level(ctx: &mut GenContext, rng: &mut GameRng) -> Level {
    let mut level = Level::new(ctx.dlevel);
    let mut rects = RectManager::new();

    makerooms(&mut level, ctx, &mut rects, rng);
    // left-to-right order drives corridor layout
    level.rooms.sort_by_key(|r| r.x);

    let nroom = level.rooms.len();
    if nroom == 0 {
        level.impossible("generate_level: no rooms");
        return level;
    }

    // stairs up and down, in different rooms when there are two
    let mut croom = rng.rn2(nroom as u32) as usize;
    if !ctx.is_bottom {
        let room = level.rooms[croom].clone();
        let (sx, sy) = (somex(&room, rng), somey(&room, rng));
        mkstairs(&mut level, sx as i8, sy as i8, false);
    }
    if nroom > 1 {
        let troom = croom;
        croom = rng.rn2(nroom as u32 - 1) as usize;
        if croom == troom {
            croom += 1;
        }
    }
    {
        let room = level.rooms[croom].clone();
        let mut sx = somex(&room, rng);
        let mut sy = somey(&room, rng);
        let mut tryct = 0;
        while level.occupied(sx as i8, sy as i8) && tryct < 500 {
            sx = somex(&room, rng);
            sy = somey(&room, rng);
            tryct += 1;
        }
        mkstairs(&mut level, sx as i8, sy as i8, true);
    }

    let mut joiner = RoomJoiner::new(nroom);
    makecorridors(&mut level, ctx, rng, &mut joiner);
    make_niches(&mut level, ctx, rng);

    // the vault raises the bar for a special room
    let mut room_threshold = 3;
    if place_vault(&mut level, ctx, &mut rects, rng) {
        room_threshold += 1;
    }

    make_special_room(&mut level, ctx, rng, room_threshold);

    for idx in 0..level.rooms.len() {
        if level.rooms[idx].room_type != RoomType::Ordinary {
            continue;
        }
        fill_ordinary_room(&mut level, ctx, rng, idx);
    }

    bound_digging(&mut level);
    mineralize(&mut level, ctx, rng);

    if level.flags.has_morgue {
        level.flags.graveyard = true;
    }
    for idx in 0..level.rooms.len() {
        topologize(&mut level, idx);
    }

    level
}

/// Stock an ordinary room with monsters, traps, furniture, and loot
/// (the room loop of C `makelevel()`)
pub fn fill_ordinary_room(level: &mut Level, ctx: &GenContext, rng: &mut GameRng, room_idx: usize) {
    let room = level.rooms[room_idx].clone();
    let depth = ctx.dlevel.depth();

    // a sleeping monster; it may legitimately end up on the stairs
    if ctx.has_amulet || rng.rn2(3) == 0 {
        let x = somex(&room, rng) as i8;
        let y = somey(&room, rng) as i8;
        let species = random_monster(rng, ctx.difficulty);
        if let Some(id) = makemon(level, rng, species.name, species.caps, x, y) {
            if let Some(mon) = level.monster_mut(id) {
                mon.sleeping = true;
            }
            if species.name == "giant spider" && !level.occupied(x, y) {
                maketrap(level, x, y, TrapType::Web);
            }
        }
    }

    // traps, thicker with depth
    let odds = (8 - ctx.difficulty / 6).max(2);
    while rng.rn2(odds as u32) == 0 {
        mktrap(level, ctx, rng, None, room_idx, None);
    }
    if rng.rn2(3) == 0 {
        let x = somex(&room, rng) as i8;
        let y = somey(&room, rng) as i8;
        mkgold(level, ctx, rng, None, x, y);
    }
    if rng.rn2(10) == 0 {
        mkfount(level, rng, room_idx);
    }
    if rng.rn2(60) == 0 {
        mksink(level, rng, room_idx);
    }
    if rng.rn2(60) == 0 {
        mkaltar(level, rng, room_idx);
    }
    let grave_odds = (80 - depth * 2).max(2);
    if rng.rn2(grave_odds as u32) == 0 {
        mkgrave(level, ctx, rng, room_idx);
    }

    if rng.rn2(20) == 0 {
        let x = somex(&room, rng) as i8;
        let y = somey(&room, rng) as i8;
        level.add_object(Object::new(ObjectKind::Statue, 1), x, y);
    }
    // about a 40% chance of a box somewhere on the level
    if rng.rn2((level.rooms.len() * 5 / 2) as u32) == 0 {
        let kind = if rng.rn2(3) != 0 {
            ObjectKind::LargeBox
        } else {
            ObjectKind::Chest
        };
        let x = somex(&room, rng) as i8;
        let y = somey(&room, rng) as i8;
        level.add_object(Object::new(kind, 1), x, y);
    }

    // maybe make some graffiti
    if rng.rn2(27 + 3 * depth.unsigned_abs()) == 0 {
        let mesg = GRAFFITI[rng.rn2(GRAFFITI.len() as u32) as usize];
        let mut x = somex(&room, rng);
        let mut y = somey(&room, rng);
        // rarely bother rerolling a bad spot; the filter below skips it
        while level.cells[x][y].typ != CellType::Room && rng.rn2(40) == 0 {
            x = somex(&room, rng);
            y = somey(&room, rng);
        }
        let typ = level.cells[x][y].typ;
        if !typ.is_pool() && !typ.is_furniture() {
            level.engrave(x as i8, y as i8, mesg, EngravingType::Mark);
        }
    }

    if rng.rn2(3) == 0 {
        let x = somex(&room, rng) as i8;
        let y = somey(&room, rng) as i8;
        let obj = random_object(rng);
        level.add_object(obj, x, y);
        let mut tryct = 0;
        while rng.rn2(5) == 0 {
            tryct += 1;
            if tryct > 100 {
                level.impossible("fill_ordinary_room: runaway object pile");
                break;
            }
            let x = somex(&room, rng) as i8;
            let y = somey(&room, rng) as i8;
            let obj = random_object(rng);
            level.add_object(obj, x, y);
        }
    }
}

/// Put a fountain somewhere clear of the doors (C `mkfount()`)
pub fn mkfount(level: &mut Level, rng: &mut GameRng, room_idx: usize) {
    let room = level.rooms[room_idx].clone();
    let mut tryct = 0;
    let (x, y) = loop {
        tryct += 1;
        if tryct > 200 {
            return;
        }
        let Some((x, y)) = somexy(&room, room_idx, &level.rooms, level, rng) else {
            return;
        };
        if !level.occupied(x as i8, y as i8) && !bydoor(level, x as i8, y as i8) {
            break (x, y);
        }
    };

    level.cells[x][y].typ = CellType::Fountain;
    if rng.rn2(7) == 0 {
        level.cells[x][y].flags |= BLESSED_FOUNTAIN;
    }
    level.flags.fountain_count += 1;
}

/// Put a kitchen sink somewhere clear of the doors (C `mksink()`)
pub fn mksink(level: &mut Level, rng: &mut GameRng, room_idx: usize) {
    let room = level.rooms[room_idx].clone();
    let mut tryct = 0;
    let (x, y) = loop {
        tryct += 1;
        if tryct > 200 {
            return;
        }
        let Some((x, y)) = somexy(&room, room_idx, &level.rooms, level, rng) else {
            return;
        };
        if !level.occupied(x as i8, y as i8) && !bydoor(level, x as i8, y as i8) {
            break (x, y);
        }
    };

    level.cells[x][y].typ = CellType::Sink;
    level.flags.sink_count += 1;
}

/// Put an altar of random alignment in an ordinary room (C `mkaltar()`)
pub fn mkaltar(level: &mut Level, rng: &mut GameRng, room_idx: usize) {
    if level.rooms[room_idx].room_type != RoomType::Ordinary {
        return;
    }
    let room = level.rooms[room_idx].clone();
    let mut tryct = 0;
    let (x, y) = loop {
        tryct += 1;
        if tryct > 200 {
            return;
        }
        let x = somex(&room, rng);
        let y = somey(&room, rng);
        if !level.occupied(x as i8, y as i8) && !bydoor(level, x as i8, y as i8) {
            break (x, y);
        }
    };

    let align = rng.rn2(3) as i32 - 1;
    level.cells[x][y].typ = CellType::Altar;
    level.cells[x][y].flags = align_to_mask(align);
}

/// Dig a grave with buried goods in an ordinary room (C `mkgrave()`)
pub fn mkgrave(level: &mut Level, ctx: &GenContext, rng: &mut GameRng, room_idx: usize) {
    if level.rooms[room_idx].room_type != RoomType::Ordinary {
        return;
    }
    let room = level.rooms[room_idx].clone();
    let dobell = rng.rn2(10) == 0;

    let mut tryct = 0;
    let (x, y) = loop {
        tryct += 1;
        if tryct > 200 {
            return;
        }
        let Some((x, y)) = somexy(&room, room_idx, &level.rooms, level, rng) else {
            return;
        };
        if !level.occupied(x as i8, y as i8) && !bydoor(level, x as i8, y as i8) {
            break (x as i8, y as i8);
        }
    };

    make_grave(level, rng, x, y, dobell.then_some("Saved by the bell!"));

    // grave goods
    if rng.rn2(3) == 0 {
        let amount = rng.rnd(20) + (ctx.difficulty.max(0) as u32) * 5;
        level.bury_object(Object::new(ObjectKind::GoldPiece, amount), x, y);
    }
    for _ in 0..rng.rn2(5) {
        let obj = random_object(rng);
        level.bury_object(obj, x, y);
    }

    // leave a bell, in case someone was buried alive
    if dobell {
        level.add_object(Object::new(ObjectKind::Bell, 1), x, y);
    }
}

/// Turn a floor cell into a grave with a headstone (C `make_grave()`)
pub fn make_grave(level: &mut Level, rng: &mut GameRng, x: i8, y: i8, epitaph: Option<&str>) {
    let typ = level.cells[x as usize][y as usize].typ;
    if !(typ == CellType::Room || typ == CellType::Grave) || level.trap_at(x, y).is_some() {
        return;
    }
    level.cells[x as usize][y as usize].typ = CellType::Grave;
    let text = match epitaph {
        Some(text) => text,
        None => EPITAPHS[rng.rn2(EPITAPHS.len() as u32) as usize],
    };
    level.engrave(x, y, text, EngravingType::Headstone);
}

/// Forbid digging outside the used part of the map (C `bound_digging()`)
pub fn bound_digging(level: &mut Level) {
    let col_used = |level: &Level, x: usize| {
        (0..ROWNO).any(|y| level.cells[x][y].typ != CellType::Stone)
    };

    let Some(first_col) = (0..COLNO).find(|&x| col_used(level, x)) else {
        return; // nothing carved at all
    };
    let last_col = (0..COLNO)
        .rev()
        .find(|&x| col_used(level, x))
        .unwrap_or(first_col);
    let xmin = (first_col as i32 - 1).max(0);
    let xmax = (last_col as i32 + 1).min(COLNO as i32 - 1);

    let row_used = |level: &Level, y: usize| {
        (xmin as usize..=xmax as usize).any(|x| level.cells[x][y].typ != CellType::Stone)
    };
    let Some(first_row) = (0..ROWNO).find(|&y| row_used(level, y)) else {
        return;
    };
    let last_row = (0..ROWNO)
        .rev()
        .find(|&y| row_used(level, y))
        .unwrap_or(first_row);
    // the top and bottom margins may fall off the map; that just means
    // no rows get clamped on that side
    let ymin = first_row as i32 - 1;
    let ymax = last_row as i32 + 1;

    for x in 0..COLNO {
        for y in 0..ROWNO {
            if (x as i32) <= xmin || (x as i32) >= xmax || (y as i32) <= ymin || (y as i32) >= ymax
            {
                level.cells[x][y].can_dig = false;
            }
        }
    }
}

/// Stamp a room's index onto its cells (C `topologize()`)
///
/// Floor cells get the room number, wall cells get the edge bit and
/// either the room number or the shared marker when two rooms meet.
/// Safe to call twice; a room already labeled is skipped.
pub fn topologize(level: &mut Level, room_idx: usize) {
    let room = level.rooms[room_idx].clone();
    let roomno = room_idx as u8 + ROOMOFFSET;
    let (lowx, lowy, hix, hiy) = room.bounds();

    // skip a room already labeled, i.e. a shop handled out of order
    if level.cells[lowx][lowy].room_number == roomno {
        return;
    }

    // innards first
    for &sub in &room.subrooms {
        topologize(level, sub);
    }

    if room.irregular {
        return;
    }

    for x in lowx..=hix {
        for y in lowy..=hiy {
            let cell = &mut level.cells[x][y];
            if cell.typ != CellType::Stone && cell.room_number == NO_ROOM {
                cell.room_number = roomno;
            }
        }
    }
    for x in (lowx - 1)..=(hix + 1) {
        let mut y = lowy - 1;
        while y <= hiy + 1 {
            tag_edge(level, x, y, roomno);
            y += (hiy - lowy) + 2;
        }
    }
    for y in lowy..=hiy {
        let mut x = lowx - 1;
        while x <= hix + 1 {
            tag_edge(level, x, y, roomno);
            x += (hix - lowx) + 2;
        }
    }
}

fn tag_edge(level: &mut Level, x: usize, y: usize, roomno: u8) {
    let cell = &mut level.cells[x][y];
    cell.edge = true;
    cell.room_number = if cell.room_number != NO_ROOM {
        SHARED
    } else {
        roomno
    };
}
