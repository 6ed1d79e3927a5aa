//! Secret treasure vaults (mklev.c, mkroom.c)

use super::generation::{add_room, check_room, create_room, GenContext};
use super::level::{Level, TrapType};
use super::niche::makeniche;
use super::rect::RectManager;
use super::room::RoomType;
use super::trap::maketrap;
use super::DLevel;
use crate::object::{Object, ObjectKind};
use crate::rng::GameRng;

/// Dungeon number of Fort Ludios, reached only through its portal
const FORT_LUDIOS_DNUM: i8 = 7;

/// Shallowest depth (exclusive) where the Ludios portal may appear
pub const KNOX_MIN_DEPTH: i32 = 10;

/// Deepest depth (exclusive) where the Ludios portal may appear
pub const KNOX_MAX_DEPTH: i32 = 24;

/// Make a secret treasure vault, not connected to the rest (mklev.c)
///
/// Uses the spot reserved while rooms were laid out; if that area got
/// dug through since, tries to claim a fresh one. Returns true when a
/// vault was added.
pub fn place_vault(
    level: &mut Level,
    ctx: &mut GenContext,
    rects: &mut RectManager,
    rng: &mut GameRng,
) -> bool {
    let Some((vx, vy)) = ctx.vault_pos else {
        return false;
    };

    let mut vx = vx;
    let mut vy = vy;
    let mut w: i8 = 1;
    let mut h: i8 = 1;

    if check_room(level, rng, &mut vx, &mut w, &mut vy, &mut h, true) {
        fill_vault(level, ctx, rng, vx, vy, w, h);
        return true;
    }

    if rects.rnd_rect(rng).is_some() && create_room(level, ctx, rects, rng, RoomType::Vault, Some(true))
    {
        let Some((nvx, nvy)) = ctx.vault_pos else {
            return false;
        };
        vx = nvx;
        vy = nvy;
        if check_room(level, rng, &mut vx, &mut w, &mut vy, &mut h, true) {
            fill_vault(level, ctx, rng, vx, vy, w, h);
            return true;
        }
    }
    false
}

/// Carve the vault room and stock it
fn fill_vault(
    level: &mut Level,
    ctx: &mut GenContext,
    rng: &mut GameRng,
    vx: i8,
    vy: i8,
    w: i8,
    h: i8,
) {
    add_room(level, vx, vy, vx + w, vy + h, true, RoomType::Vault);
    level.flags.has_vault = true;

    // a pile of gold on every floor cell
    let depth = ctx.dlevel.depth().unsigned_abs() as u32;
    for x in vx..=vx + w {
        for y in vy..=vy + h {
            let amount = rng.rn1(depth * 100, 51) as u32;
            level.add_object(Object::new(ObjectKind::GoldPiece, amount), x, y);
        }
    }

    mk_knox_portal(level, ctx, rng, vx + w, vy + h);
    if !level.flags.no_teleport && rng.rn2(3) == 0 {
        makevtele(level, ctx, rng);
    }
}

/// Make a vault teleporter, connected to the nearest vault room
/// (C `makevtele()`)
pub fn makevtele(level: &mut Level, ctx: &GenContext, rng: &mut GameRng) {
    makeniche(level, ctx, rng, Some(TrapType::Teleport));
}

/// Maybe place the one-way portal to Fort Ludios in the vault
/// (C `mk_knox_portal()`)
///
/// Only one portal per game; each eligible vault defers it 2 times in 3,
/// and it only fits in the window between depth 10 and the deep levels.
pub fn mk_knox_portal(
    level: &mut Level,
    ctx: &mut GenContext,
    rng: &mut GameRng,
    x: i8,
    y: i8,
) {
    if ctx.knox_done {
        return;
    }
    // 2/3 chance of deferring until a later level
    if rng.rn2(3) != 0 {
        return;
    }

    let depth = ctx.dlevel.depth() as i32;
    if ctx.dlevel.dungeon_num != 0 || depth <= KNOX_MIN_DEPTH || depth >= KNOX_MAX_DEPTH {
        return;
    }

    if let Some(trap) = maketrap(level, x, y, TrapType::MagicPortal) {
        trap.dst = Some(DLevel::new(FORT_LUDIOS_DNUM, 1));
        ctx.knox_done = true;
    }
}
