//! Structural level checks
//!
//! `verify_level` walks a finished level and reports the first broken
//! invariant it finds. Meant for tests and for callers that generate
//! levels in bulk; a level that passes is safe to hand to the game
//! layer without further bounds checking.

#[cfg(not(feature = "std"))]
use crate::compat::*;

use thiserror::Error;

use super::level::Level;
use super::room::RoomType;
use super::CellType;
use crate::consts::{isok, COLNO, DOORMAX, ROWNO};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelCheckError {
    #[error("room {0} extends outside the map")]
    RoomOutOfBounds(usize),
    #[error("rooms {0} and {1} overlap")]
    RoomOverlap(usize, usize),
    #[error("door {idx} at ({x},{y}) is not on a door cell")]
    BadDoorCell { idx: usize, x: i8, y: i8 },
    #[error("{0} doors exceeds the limit of {DOORMAX}")]
    TooManyDoors(usize),
    #[error("room {room} claims doors {first}..{last} beyond the door list")]
    BadDoorRange { room: usize, first: usize, last: usize },
    #[error("level has {ups} up and {downs} down staircases")]
    BadStairCount { ups: usize, downs: usize },
    #[error("staircase at ({x},{y}) has no stairs cell under it")]
    BadStairCell { x: i8, y: i8 },
    #[error("trap at ({x},{y}) is buried in rock")]
    TrapInRock { x: i8, y: i8 },
    #[error("monster at ({x},{y}) is off the map")]
    MonsterOutOfBounds { x: i8, y: i8 },
    #[error("engraving at ({x},{y}) is off the map")]
    EngravingOutOfBounds { x: i8, y: i8 },
    #[error("room {room} has floor no path from the stairs can reach")]
    Disconnected { room: usize },
    #[error("staircase at ({x},{y}) is unreachable")]
    StairsUnreachable { x: i8, y: i8 },
}

/// Check every structural invariant of a finished level
pub fn verify_level(level: &Level) -> Result<(), LevelCheckError> {
    verify_rooms(level)?;
    verify_doors(level)?;
    verify_stairs(level)?;
    verify_placements(level)?;
    verify_connectivity(level)?;
    Ok(())
}

fn verify_rooms(level: &Level) -> Result<(), LevelCheckError> {
    for (idx, room) in level.rooms.iter().enumerate() {
        // row 0 is a legal wall row; column 0 is not
        let (wlx, _, whx, why) = room.wall_bounds();
        if wlx < 1 || whx > COLNO - 1 || why > ROWNO - 1 {
            return Err(LevelCheckError::RoomOutOfBounds(idx));
        }
    }
    for (i, a) in level.rooms.iter().enumerate() {
        for (j, b) in level.rooms.iter().enumerate().skip(i + 1) {
            // subrooms sit inside their parent on purpose
            if b.parent == Some(i) || a.parent == Some(j) {
                continue;
            }
            if a.overlaps(b, 0) {
                return Err(LevelCheckError::RoomOverlap(i, j));
            }
        }
    }
    Ok(())
}

fn verify_doors(level: &Level) -> Result<(), LevelCheckError> {
    if level.doors.len() > DOORMAX {
        return Err(LevelCheckError::TooManyDoors(level.doors.len()));
    }
    for (idx, door) in level.doors.iter().enumerate() {
        if !isok(door.x, door.y)
            || !level.cells[door.x as usize][door.y as usize].typ.is_door()
        {
            return Err(LevelCheckError::BadDoorCell {
                idx,
                x: door.x,
                y: door.y,
            });
        }
    }
    for (idx, room) in level.rooms.iter().enumerate() {
        let first = room.first_door_idx as usize;
        let last = first + room.door_count as usize;
        if last > level.doors.len() {
            return Err(LevelCheckError::BadDoorRange {
                room: idx,
                first,
                last,
            });
        }
    }
    Ok(())
}

fn verify_stairs(level: &Level) -> Result<(), LevelCheckError> {
    let ups = level.stairs.iter().filter(|s| s.up).count();
    let downs = level.stairs.len() - ups;
    if ups != 1 || downs > 1 {
        return Err(LevelCheckError::BadStairCount { ups, downs });
    }
    for stair in &level.stairs {
        if !isok(stair.x, stair.y)
            || level.cells[stair.x as usize][stair.y as usize].typ != CellType::Stairs
        {
            return Err(LevelCheckError::BadStairCell {
                x: stair.x,
                y: stair.y,
            });
        }
    }
    Ok(())
}

fn verify_placements(level: &Level) -> Result<(), LevelCheckError> {
    for trap in &level.traps {
        if !isok(trap.x, trap.y)
            || level.cells[trap.x as usize][trap.y as usize]
                .typ
                .is_stone_or_wall()
        {
            return Err(LevelCheckError::TrapInRock {
                x: trap.x,
                y: trap.y,
            });
        }
    }
    for mon in &level.monsters {
        if !isok(mon.x, mon.y) {
            return Err(LevelCheckError::MonsterOutOfBounds { x: mon.x, y: mon.y });
        }
    }
    for engr in &level.engravings {
        if !isok(engr.x, engr.y) {
            return Err(LevelCheckError::EngravingOutOfBounds {
                x: engr.x,
                y: engr.y,
            });
        }
    }
    Ok(())
}

/// Cells a determined explorer can pass: normal movement plus secret
/// doors and corridors, which searching reveals.
fn traversable(typ: CellType) -> bool {
    typ.is_passable() || typ == CellType::SecretDoor || typ == CellType::SecretCorridor
}

/// Flood from the up staircase and demand every non-vault room floor
/// is reachable. The walk takes diagonal steps, as movement does, so
/// the dry lattice of a swamp checkerboard counts as connected. Niche
/// pockets without doors are legal and ignored.
fn verify_connectivity(level: &Level) -> Result<(), LevelCheckError> {
    let Some((ux, uy)) = level.find_upstairs() else {
        return Ok(()); // already reported by the stair check
    };

    let mut visited = [[false; ROWNO]; COLNO];
    let mut stack = vec![(ux as usize, uy as usize)];
    while let Some((x, y)) = stack.pop() {
        if visited[x][y] {
            continue;
        }
        visited[x][y] = true;
        for (dx, dy) in [
            (1i32, 0i32),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ] {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 1 || nx >= COLNO as i32 || ny < 0 || ny >= ROWNO as i32 {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if !visited[nx][ny] && traversable(level.cells[nx][ny].typ) {
                stack.push((nx, ny));
            }
        }
    }

    for (idx, room) in level.rooms.iter().enumerate() {
        if room.room_type == RoomType::Vault {
            continue;
        }
        let (lx, ly, hx, hy) = room.bounds();
        for x in lx..=hx {
            for y in ly..=hy {
                if traversable(level.cells[x][y].typ) && !visited[x][y] {
                    return Err(LevelCheckError::Disconnected { room: idx });
                }
            }
        }
    }
    for stair in &level.stairs {
        if !visited[stair.x as usize][stair.y as usize] {
            return Err(LevelCheckError::StairsUnreachable {
                x: stair.x,
                y: stair.y,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::generation::{add_room, generate_level, mkstairs, GenContext};
    use crate::dungeon::level::{Door, Trap, TrapType};
    use crate::dungeon::DLevel;
    use crate::rng::GameRng;

    fn connected_pair() -> Level {
        let mut level = Level::new(DLevel::new(0, 5));
        add_room(&mut level, 5, 5, 10, 9, true, RoomType::Ordinary);
        add_room(&mut level, 20, 5, 25, 9, true, RoomType::Ordinary);
        // hand-dug corridor with a door at each end
        level.cells[11][7].typ = CellType::Door;
        for x in 12..19 {
            level.cells[x][7].typ = CellType::Corridor;
        }
        level.cells[19][7].typ = CellType::Door;
        level.doors.push(Door { x: 11, y: 7 });
        level.doors.push(Door { x: 19, y: 7 });
        mkstairs(&mut level, 7, 6, true);
        level
    }

    #[test]
    fn test_verify_accepts_connected_level() {
        let level = connected_pair();
        assert_eq!(verify_level(&level), Ok(()));
    }

    #[test]
    fn test_verify_accepts_generated_levels() {
        let mut ctx = GenContext::new(DLevel::new(0, 7), 1, false);
        let mut rng = GameRng::new(2024);
        let level = generate_level(&mut ctx, &mut rng);
        assert_eq!(verify_level(&level), Ok(()));
    }

    #[test]
    fn test_verify_accepts_swamp_checkerboard() {
        // flood half the floor in the swamp pattern; the dry tiles touch
        // each other and the stairs only corner to corner
        let mut level = Level::new(DLevel::new(0, 16));
        add_room(&mut level, 5, 5, 14, 12, true, RoomType::Swamp);
        for x in 5..=14 {
            for y in 5..=12 {
                if (x + y) % 2 == 0 {
                    level.cells[x][y].typ = CellType::Pool;
                }
            }
        }
        mkstairs(&mut level, 6, 5, true);
        assert_eq!(verify_level(&level), Ok(()));
    }

    #[test]
    fn test_verify_flags_room_overlap() {
        let mut level = Level::new(DLevel::new(0, 5));
        add_room(&mut level, 5, 5, 10, 9, true, RoomType::Ordinary);
        add_room(&mut level, 8, 6, 14, 10, true, RoomType::Ordinary);
        mkstairs(&mut level, 6, 6, true);
        assert_eq!(verify_level(&level), Err(LevelCheckError::RoomOverlap(0, 1)));
    }

    #[test]
    fn test_verify_flags_floating_door() {
        let mut level = connected_pair();
        level.doors.push(Door { x: 7, y: 7 }); // plain floor
        assert_eq!(
            verify_level(&level),
            Err(LevelCheckError::BadDoorCell { idx: 2, x: 7, y: 7 })
        );
    }

    #[test]
    fn test_verify_flags_missing_stairs() {
        let mut level = Level::new(DLevel::new(0, 5));
        add_room(&mut level, 5, 5, 10, 9, true, RoomType::Ordinary);
        assert_eq!(
            verify_level(&level),
            Err(LevelCheckError::BadStairCount { ups: 0, downs: 0 })
        );
    }

    #[test]
    fn test_verify_flags_disconnected_room() {
        let mut level = Level::new(DLevel::new(0, 5));
        add_room(&mut level, 5, 5, 10, 9, true, RoomType::Ordinary);
        add_room(&mut level, 30, 5, 35, 9, true, RoomType::Ordinary);
        mkstairs(&mut level, 7, 6, true);
        assert_eq!(
            verify_level(&level),
            Err(LevelCheckError::Disconnected { room: 1 })
        );
    }

    #[test]
    fn test_verify_allows_isolated_vault() {
        let mut level = Level::new(DLevel::new(0, 5));
        add_room(&mut level, 5, 5, 10, 9, true, RoomType::Ordinary);
        add_room(&mut level, 40, 10, 41, 11, true, RoomType::Vault);
        mkstairs(&mut level, 7, 6, true);
        assert_eq!(verify_level(&level), Ok(()));
    }

    #[test]
    fn test_verify_flags_trap_in_rock() {
        let mut level = connected_pair();
        level.traps.push(Trap {
            x: 50,
            y: 15,
            trap_type: TrapType::Pit,
            seen: false,
            once: false,
            madeby_u: false,
            dst: None,
        });
        assert_eq!(
            verify_level(&level),
            Err(LevelCheckError::TrapInRock { x: 50, y: 15 })
        );
    }
}
