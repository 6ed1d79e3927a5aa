//! Hidden niches behind room walls (mklev.c)

use super::corridor::finddpos;
use super::door::dosdoor;
use super::generation::GenContext;
use super::level::{EngravingType, Level, TrapType};
use super::room::{Room, RoomType};
use super::trap::maketrap;
use super::CellType;
use crate::consts::{isok, DOORMAX};
use crate::object::{random_object, Object, ObjectKind};
use crate::rng::GameRng;

/// Find a wall spot with free stone behind it (C `place_niche()`)
///
/// Returns `(dy, xx, yy)`: the wall cell and which side of the room the
/// niche digs toward. The cell beyond the wall must still be stone and
/// the cell just inside must be plain floor.
pub fn place_niche(
    level: &Level,
    rng: &mut GameRng,
    room: &Room,
) -> Option<(i8, i8, i8)> {
    let (lx, ly, hx, hy) = room.bounds();
    let (lx, ly, hx, hy) = (lx as i8, ly as i8, hx as i8, hy as i8);

    let (dy, (xx, yy)) = if rng.rn2(2) != 0 {
        (1, finddpos(level, rng, lx, hy + 1, hx, hy + 1))
    } else {
        (-1, finddpos(level, rng, lx, ly - 1, hx, ly - 1))
    };

    let beyond_ok = isok(xx, yy + dy)
        && level.cells[xx as usize][(yy + dy) as usize].typ == CellType::Stone;
    let inside_ok = isok(xx, yy - dy) && {
        let typ = level.cells[xx as usize][(yy - dy) as usize].typ;
        !typ.is_pool() && !typ.is_furniture()
    };

    (beyond_ok && inside_ok).then_some((dy, xx, yy))
}

/// Carve one niche, optionally trapped (C `makeniche()`)
///
/// Trapped niches hide behind a secret door with a warning scrawled on
/// the floor inside the room; untrapped ones sometimes end up sealed or
/// behind iron bars.
pub fn makeniche(
    level: &mut Level,
    ctx: &GenContext,
    rng: &mut GameRng,
    trap_type: Option<TrapType>,
) {
    if level.doors.len() >= DOORMAX {
        return;
    }

    let mut vct = 8;
    while vct > 0 {
        vct -= 1;

        let room_idx = rng.rn2(level.rooms.len() as u32) as usize;
        if level.rooms[room_idx].room_type != RoomType::Ordinary {
            continue;
        }
        if level.rooms[room_idx].door_count == 1 && rng.rn2(5) != 0 {
            continue;
        }
        let Some((dy, xx, yy)) = place_niche(level, rng, &level.rooms[room_idx]) else {
            continue;
        };

        if trap_type.is_some() || rng.rn2(4) == 0 {
            level.cells[xx as usize][(yy + dy) as usize].typ = CellType::SecretCorridor;
            if let Some(mut tt) = trap_type {
                if tt.is_hole() && !ctx.can_fall_thru() {
                    tt = TrapType::RockFall;
                }
                let once = tt != TrapType::RockFall;
                // a refused trap still leaves the pocket and its door
                if let Some(trap) = maketrap(level, xx, yy + dy, tt) {
                    if once {
                        trap.once = true;
                    }
                    if let Some(text) = tt.engraving_text() {
                        level.engrave(xx, yy - dy, text, EngravingType::Dust);
                    }
                }
            }
            dosdoor(level, ctx, rng, xx, yy, room_idx, CellType::SecretDoor);
        } else {
            level.cells[xx as usize][(yy + dy) as usize].typ = CellType::Corridor;
            if rng.rn2(7) != 0 {
                let typ = if rng.rn2(5) != 0 {
                    CellType::SecretDoor
                } else {
                    CellType::Door
                };
                dosdoor(level, ctx, rng, xx, yy, room_idx, typ);
            } else {
                // inaccessible niches occasionally have iron bars
                if rng.rn2(5) == 0 && level.cells[xx as usize][yy as usize].typ.is_wall() {
                    level.cells[xx as usize][yy as usize].typ = CellType::IronBars;
                    if rng.rn2(3) != 0 {
                        level.add_object(Object::new(ObjectKind::Corpse, 1), xx, yy + dy);
                    }
                }
                if !level.flags.no_teleport {
                    level.add_object(
                        Object::new(ObjectKind::ScrollOfTeleportation, 1),
                        xx,
                        yy + dy,
                    );
                }
                if rng.rn2(3) == 0 {
                    let extra = random_object(rng);
                    level.add_object(extra, xx, yy + dy);
                }
            }
        }
        return;
    }
}

/// Scatter niches around the level (C `make_niches()`)
///
/// One level teleporter past depth 15 and one trapdoor in the mid
/// depths, each 1 time in 6 per niche; the rest are plain.
pub fn make_niches(level: &mut Level, ctx: &GenContext, rng: &mut GameRng) {
    let nroom = level.rooms.len() as u32;
    let mut ct = rng.rnd((nroom >> 1) + 1);
    let dep = ctx.dlevel.depth() as i32;

    let mut ltptr = !level.flags.no_teleport && dep > 15;
    let mut vamp = dep > 5 && dep < 25;

    while ct > 0 {
        ct -= 1;
        if ltptr && rng.rn2(6) == 0 {
            ltptr = false;
            makeniche(level, ctx, rng, Some(TrapType::LevelTeleport));
        } else if vamp && rng.rn2(6) == 0 {
            vamp = false;
            makeniche(level, ctx, rng, Some(TrapType::TrapDoor));
        } else {
            makeniche(level, ctx, rng, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::level::Trap;
    use crate::dungeon::DLevel;

    fn carved_level() -> Level {
        let mut level = Level::new(DLevel::new(0, 8));
        let room = Room::new(10, 8, 10, 4);
        let (lx, ly, hx, hy) = room.bounds();
        for x in (lx - 1)..=(hx + 1) {
            for y in (ly - 1)..=(hy + 1) {
                level.cells[x][y].typ = if x >= lx && x <= hx && y >= ly && y <= hy {
                    CellType::Room
                } else if y == ly - 1 || y == hy + 1 {
                    CellType::HWall
                } else {
                    CellType::VWall
                };
            }
        }
        level.rooms.push(room);
        level
    }

    #[test]
    fn test_place_niche_digs_into_stone() {
        let level = carved_level();
        let mut rng = GameRng::new(11);
        let (dy, xx, yy) = place_niche(&level, &mut rng, &level.rooms[0]).unwrap();

        assert!(level.cells[xx as usize][yy as usize].typ.is_wall());
        assert_eq!(
            level.cells[xx as usize][(yy + dy) as usize].typ,
            CellType::Stone
        );
        assert_eq!(
            level.cells[xx as usize][(yy - dy) as usize].typ,
            CellType::Room
        );
    }

    #[test]
    fn test_trap_niche_is_once_and_warned() {
        let mut level = carved_level();
        let ctx = GenContext::new(DLevel::new(0, 8), 1, false);
        let mut rng = GameRng::new(5);

        makeniche(&mut level, &ctx, &mut rng, Some(TrapType::TrapDoor));

        let trap = level.traps.first().expect("niche trap");
        assert_eq!(trap.trap_type, TrapType::TrapDoor);
        assert!(trap.once);
        assert_eq!(
            level.cells[trap.x as usize][trap.y as usize].typ,
            CellType::SecretCorridor
        );
        assert!(level
            .engravings
            .iter()
            .any(|e| e.text == "ad aerarium" && e.engr_type == EngravingType::Dust));
    }

    #[test]
    fn test_trapdoor_niche_on_bottom_becomes_rockfall() {
        let mut level = carved_level();
        let ctx = GenContext::new(DLevel::new(0, 8), 1, true);
        let mut rng = GameRng::new(5);

        makeniche(&mut level, &ctx, &mut rng, Some(TrapType::TrapDoor));

        let trap = level.traps.first().expect("niche trap");
        assert_eq!(trap.trap_type, TrapType::RockFall);
        assert!(!trap.once);
    }

    #[test]
    fn test_blocked_niche_trap_still_gets_its_door() {
        let mut level = carved_level();
        let (lx, ly, hx, hy) = level.rooms[0].bounds();
        // portals already claim every cell the niche could dig into
        for x in lx..=hx {
            for y in [ly - 2, hy + 2] {
                level.traps.push(Trap {
                    x: x as i8,
                    y: y as i8,
                    trap_type: TrapType::MagicPortal,
                    seen: false,
                    once: false,
                    madeby_u: false,
                    dst: None,
                });
            }
        }
        let portals = level.traps.len();
        let ctx = GenContext::new(DLevel::new(0, 8), 1, false);
        let mut rng = GameRng::new(5);

        makeniche(&mut level, &ctx, &mut rng, Some(TrapType::TrapDoor));

        // the trap was refused but the pocket got its secret door
        assert_eq!(level.traps.len(), portals);
        assert!(level.engravings.is_empty());
        assert_eq!(level.doors.len(), 1);
        assert_eq!(level.rooms[0].door_count, 1);
        let door = &level.doors[0];
        assert_eq!(
            level.cells[door.x as usize][door.y as usize].typ,
            CellType::SecretDoor
        );
        let pocket = level
            .traps
            .iter()
            .find(|t| t.x == door.x && (t.y - door.y).abs() == 1)
            .expect("portal in the dug pocket");
        assert_eq!(
            level.cells[pocket.x as usize][pocket.y as usize].typ,
            CellType::SecretCorridor
        );
    }
}
