//! Door creation and registry upkeep (mklev.c)

use super::generation::GenContext;
use super::level::{Door, Level};
use super::{CellType, DoorState};
use crate::consts::{isok, DOORMAX};
use crate::monster::{Monster, MoveCaps};
use crate::rng::GameRng;

/// Check for a door or secret door on an orthogonal neighbor (C `bydoor()`)
pub fn bydoor(level: &Level, x: i8, y: i8) -> bool {
    let neighbors = [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)];
    neighbors.iter().any(|&(nx, ny)| {
        isok(nx, ny) && level.cells[nx as usize][ny as usize].typ.is_door()
    })
}

/// See whether it is allowable to create a door at [x,y] (C `okdoor()`)
///
/// Only plain wall segments qualify; corners and tees never take doors,
/// and doors never go adjacent to another door.
pub fn okdoor(level: &Level, x: i8, y: i8) -> bool {
    if !isok(x, y) {
        return false;
    }
    let typ = level.cells[x as usize][y as usize].typ;
    matches!(typ, CellType::HWall | CellType::VWall)
        && level.doors.len() < DOORMAX
        && !bydoor(level, x, y)
}

/// Create a door, secret 1 time in 8 (C `dodoor()`)
pub fn dodoor(
    level: &mut Level,
    ctx: &GenContext,
    rng: &mut GameRng,
    x: i8,
    y: i8,
    room_idx: usize,
) {
    if level.doors.len() >= DOORMAX {
        level.impossible("door registry full");
        return;
    }
    let typ = if rng.rn2(8) != 0 {
        CellType::Door
    } else {
        CellType::SecretDoor
    };
    dosdoor(level, ctx, rng, x, y, room_idx, typ);
}

/// Place a door or secret door and roll its state (C `dosdoor()`)
pub fn dosdoor(
    level: &mut Level,
    ctx: &GenContext,
    rng: &mut GameRng,
    x: i8,
    y: i8,
    room_idx: usize,
    typ: CellType,
) {
    let shdoor = level.rooms[room_idx].room_type.is_shop();

    // avoid secret doors on already made doors
    let typ = if !level.cells[x as usize][y as usize].typ.is_wall() {
        CellType::Door
    } else {
        typ
    };
    level.cells[x as usize][y as usize].typ = typ;

    if typ == CellType::Door {
        let mut mask = if rng.rn2(3) == 0 {
            // locked, closed, or a doorway?
            let m = if rng.rn2(5) == 0 {
                DoorState::OPEN
            } else if rng.rn2(6) == 0 {
                DoorState::LOCKED
            } else {
                DoorState::CLOSED
            };
            if m != DoorState::OPEN && !shdoor && ctx.difficulty >= 5 && rng.rn2(25) == 0 {
                m | DoorState::TRAPPED
            } else {
                m
            }
        } else if shdoor {
            DoorState::OPEN
        } else {
            DoorState::NO_DOOR
        };

        if mask.contains(DoorState::TRAPPED) && ctx.difficulty >= 9 && rng.rn2(5) == 0 {
            // a mimic poses as the door instead
            mask = DoorState::NO_DOOR;
            level.add_monster(Monster::new("small mimic", x, y, MoveCaps::empty()));
        }
        level.cells[x as usize][y as usize].set_door_state(mask);
    } else {
        let mut mask = if shdoor || rng.rn2(5) == 0 {
            DoorState::LOCKED
        } else {
            DoorState::CLOSED
        };
        if !shdoor && ctx.difficulty >= 4 && rng.rn2(20) == 0 {
            mask |= DoorState::TRAPPED;
        }
        level.cells[x as usize][y as usize].set_door_state(mask);
    }

    add_door(level, x, y, room_idx);
}

/// Record a door in the registry, crediting the room (C `add_door()`)
///
/// Each room's doors form one contiguous run in the registry; the new
/// door is inserted at the front of the owning room's run and later runs
/// slide right.
pub fn add_door(level: &mut Level, x: i8, y: i8, room_idx: usize) {
    if level.doors.len() >= DOORMAX {
        level.impossible("door registry full");
        return;
    }

    let fdoor = if level.rooms[room_idx].door_count == 0 {
        level.doors.len() as u8
    } else {
        level.rooms[room_idx].first_door_idx
    };

    for (i, room) in level.rooms.iter_mut().enumerate() {
        if i != room_idx && room.door_count > 0 && room.first_door_idx >= fdoor {
            room.first_door_idx += 1;
        }
    }

    let room = &mut level.rooms[room_idx];
    room.first_door_idx = fdoor;
    room.door_count += 1;
    level.doors.insert(fdoor as usize, Door { x, y });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{DLevel, Room};

    fn level_with_wall() -> Level {
        let mut level = Level::new(DLevel::default());
        for x in 10..20 {
            level.cells[x][5].typ = CellType::HWall;
            level.cells[x][5].horizontal = true;
        }
        level.rooms.push(Room::new(11, 6, 8, 4));
        level
    }

    #[test]
    fn test_okdoor_plain_wall_only() {
        let mut level = level_with_wall();
        assert!(okdoor(&level, 12, 5));

        level.cells[12][5].typ = CellType::TLCorner;
        assert!(!okdoor(&level, 12, 5));

        level.cells[12][5].typ = CellType::Room;
        assert!(!okdoor(&level, 12, 5));
    }

    #[test]
    fn test_okdoor_rejects_neighbor_door() {
        let mut level = level_with_wall();
        level.cells[13][5].typ = CellType::Door;
        assert!(!okdoor(&level, 12, 5));
        assert!(!okdoor(&level, 14, 5));
        assert!(okdoor(&level, 16, 5));
    }

    #[test]
    fn test_secret_door_downgraded_off_wall() {
        let mut level = level_with_wall();
        let ctx = GenContext::new(DLevel::new(0, 1), 1, false);
        let mut rng = GameRng::new(7);
        level.cells[12][5].typ = CellType::Corridor;

        dosdoor(&mut level, &ctx, &mut rng, 12, 5, 0, CellType::SecretDoor);
        assert_eq!(level.cells[12][5].typ, CellType::Door);
    }

    #[test]
    fn test_add_door_runs_stay_contiguous() {
        let mut level = level_with_wall();
        level.rooms.push(Room::new(30, 6, 8, 4));

        add_door(&mut level, 12, 5, 0);
        add_door(&mut level, 31, 5, 1);
        add_door(&mut level, 14, 5, 0);

        let r0 = &level.rooms[0];
        let r1 = &level.rooms[1];
        assert_eq!(r0.door_count, 2);
        assert_eq!(r1.door_count, 1);

        // each run is contiguous and holds its own doors
        let run0: Vec<_> = (0..r0.door_count)
            .map(|i| level.doors[(r0.first_door_idx + i) as usize])
            .collect();
        assert!(run0.iter().all(|d| (12..=14).contains(&d.x)));
        let d1 = level.doors[r1.first_door_idx as usize];
        assert_eq!((d1.x, d1.y), (31, 5));
    }

    #[test]
    fn test_shop_secret_door_locked_no_draw() {
        let mut level = level_with_wall();
        level.rooms[0].room_type = crate::dungeon::RoomType::GeneralShop;
        let ctx = GenContext::new(DLevel::new(0, 1), 1, false);
        let mut rng = GameRng::new(7);

        dosdoor(&mut level, &ctx, &mut rng, 12, 5, 0, CellType::SecretDoor);
        let state = level.cells[12][5].door_state();
        assert!(state.contains(DoorState::LOCKED));
        assert!(!state.contains(DoorState::TRAPPED));
    }
}
