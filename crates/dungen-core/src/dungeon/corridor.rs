//! Corridor digging and room joining (mklev.c, sp_lev.c)

#[cfg(not(feature = "std"))]
use crate::compat::*;

use super::door::{dodoor, okdoor};
use super::generation::GenContext;
use super::level::Level;
use super::room::Room;
use super::CellType;
use crate::consts::{COLNO, DOORMAX, ROWNO};
use crate::object::{Object, ObjectKind};
use crate::rng::GameRng;

/// Tracks which rooms already reach each other (replaces the C smeq
/// array); path compression, and the smaller root index survives a
/// merge so the representative never depends on merge order.
#[derive(Debug, Clone)]
pub struct RoomJoiner {
    parent: Vec<usize>,
}

impl RoomJoiner {
    pub fn new(count: usize) -> Self {
        Self {
            parent: (0..count).collect(),
        }
    }

    /// Find a room's component root, compressing the path walked
    pub fn find(&mut self, a: usize) -> usize {
        let mut root = a;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = a;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the components holding `a` and `b`
    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

/// Find a door position on a wall stretch (C `finddpos()`)
///
/// Tries a random spot first, then scans for any legal position, then
/// settles for an existing door, and as a last resort the corner.
pub fn finddpos(level: &Level, rng: &mut GameRng, xl: i8, yl: i8, xh: i8, yh: i8) -> (i8, i8) {
    let x = rng.rn1((xh - xl + 1) as u32, xl as i32) as i8;
    let y = rng.rn1((yh - yl + 1) as u32, yl as i32) as i8;
    if okdoor(level, x, y) {
        return (x, y);
    }

    for x in xl..=xh {
        for y in yl..=yh {
            if okdoor(level, x, y) {
                return (x, y);
            }
        }
    }

    for x in xl..=xh {
        for y in yl..=yh {
            if level.cells[x as usize][y as usize].typ.is_door() {
                return (x, y);
            }
        }
    }

    // cannot find something reasonable -- strange
    (xl, yh)
}

/// Dig a corridor from org to dest (C `dig_corridor()`)
///
/// Greedy walk toward the destination, turning where blocked. Extra
/// corridors (`nxcor`) give up early at random and occasionally drop a
/// boulder; plain corridor segments go secret 1 time in 100.
pub fn dig_corridor(
    level: &mut Level,
    rng: &mut GameRng,
    org: (i8, i8),
    dest: (i8, i8),
    nxcor: bool,
    ftyp: CellType,
    btyp: CellType,
) -> bool {
    let (mut xx, mut yy) = org;
    let (tx, ty) = dest;

    if xx <= 0
        || yy <= 0
        || tx <= 0
        || ty <= 0
        || xx > COLNO as i8 - 1
        || tx > COLNO as i8 - 1
        || yy > ROWNO as i8 - 1
        || ty > ROWNO as i8 - 1
    {
        return false;
    }

    let (mut dx, mut dy): (i8, i8) = if tx > xx {
        (1, 0)
    } else if ty > yy {
        (0, 1)
    } else if tx < xx {
        (-1, 0)
    } else {
        (0, -1)
    };

    xx -= dx;
    yy -= dy;
    let mut cct = 0;
    while xx != tx || yy != ty {
        // dig corridor at [xx,yy] and find new [xx,yy]
        if cct > 500 || (nxcor && rng.rn2(35) == 0) {
            return false;
        }
        cct += 1;

        xx += dx;
        yy += dy;

        if xx >= COLNO as i8 - 1 || xx <= 0 || yy <= 0 || yy >= ROWNO as i8 - 1 {
            return false;
        }

        let typ = level.cells[xx as usize][yy as usize].typ;
        if typ == btyp {
            if ftyp != CellType::Corridor || rng.rn2(100) != 0 {
                level.cells[xx as usize][yy as usize].typ = ftyp;
                if nxcor && rng.rn2(50) == 0 {
                    level.add_object(Object::new(ObjectKind::Boulder, 1), xx, yy);
                }
            } else {
                level.cells[xx as usize][yy as usize].typ = CellType::SecretCorridor;
            }
        } else if typ != ftyp && typ != CellType::SecretCorridor {
            // strange: must be a door
            return false;
        }

        // find next corridor position
        let dix = (xx - tx).abs();
        let diy = (yy - ty).abs();

        let diggable = |level: &Level, x: i8, y: i8| {
            let t = level.cells[x as usize][y as usize].typ;
            t == btyp || t == ftyp || t == CellType::SecretCorridor
        };

        // do we have to change direction?
        if dy != 0 && dix > diy {
            let ddx = if xx > tx { -1 } else { 1 };
            if diggable(level, xx + ddx, yy) {
                dx = ddx;
                dy = 0;
                continue;
            }
        } else if dx != 0 && diy > dix {
            let ddy = if yy > ty { -1 } else { 1 };
            if diggable(level, xx, yy + ddy) {
                dy = ddy;
                dx = 0;
                continue;
            }
        }

        // continue straight on?
        if diggable(level, xx + dx, yy + dy) {
            continue;
        }

        // no, what must we do now?
        if dx != 0 {
            dx = 0;
            dy = if ty < yy { -1 } else { 1 };
        } else {
            dy = 0;
            dx = if tx < xx { -1 } else { 1 };
        }
        if diggable(level, xx + dx, yy + dy) {
            continue;
        }
        dy = -dy;
        dx = -dx;
    }
    true
}

fn bounds_i8(room: &Room) -> (i8, i8, i8, i8) {
    let (lx, ly, hx, hy) = room.bounds();
    (lx as i8, ly as i8, hx as i8, hy as i8)
}

/// Join two rooms with doors and a corridor (C `join()`)
///
/// Picks facing walls from the rooms' relative position, places a door
/// on each, and digs between them. The joiner learns of the new
/// connection only if the dig went through.
pub fn join(
    level: &mut Level,
    ctx: &GenContext,
    rng: &mut GameRng,
    joiner: &mut RoomJoiner,
    a: usize,
    b: usize,
    nxcor: bool,
) {
    if level.doors.len() >= DOORMAX {
        return;
    }

    let (clx, cly, chx, chy) = bounds_i8(&level.rooms[a]);
    let (tlx, tly, thx, thy) = bounds_i8(&level.rooms[b]);

    // door spots cc and tt and a direction for the corridor between them
    let (dx, dy, cc, tt): (i8, i8, (i8, i8), (i8, i8)) = if tlx > chx {
        let xx = chx + 1;
        let tx = tlx - 1;
        let cc = finddpos(level, rng, xx, cly, xx, chy);
        let tt = finddpos(level, rng, tx, tly, tx, thy);
        (1, 0, cc, tt)
    } else if thy < cly {
        let yy = cly - 1;
        let ty = thy + 1;
        let cc = finddpos(level, rng, clx, yy, chx, yy);
        let tt = finddpos(level, rng, tlx, ty, thx, ty);
        (0, -1, cc, tt)
    } else if thx < clx {
        let xx = clx - 1;
        let tx = thx + 1;
        let cc = finddpos(level, rng, xx, cly, xx, chy);
        let tt = finddpos(level, rng, tx, tly, tx, thy);
        (-1, 0, cc, tt)
    } else {
        let yy = chy + 1;
        let ty = tly - 1;
        let cc = finddpos(level, rng, clx, yy, chx, yy);
        let tt = finddpos(level, rng, tlx, ty, thx, ty);
        (0, 1, cc, tt)
    };

    let (xx, yy) = cc;
    let (tx, ty) = (tt.0 - dx, tt.1 - dy);

    if nxcor && level.cells[(xx + dx) as usize][(yy + dy) as usize].typ != CellType::Stone {
        return;
    }
    if okdoor(level, xx, yy) || !nxcor {
        dodoor(level, ctx, rng, xx, yy, a);
    }

    let org = (xx + dx, yy + dy);
    let dest = (tx, ty);
    let ftyp = if level.flags.arboreal {
        CellType::Room
    } else {
        CellType::Corridor
    };
    if !dig_corridor(level, rng, org, dest, nxcor, ftyp, CellType::Stone) {
        return;
    }

    // we succeeded in digging the corridor
    if okdoor(level, tt.0, tt.1) || !nxcor {
        dodoor(level, ctx, rng, tt.0, tt.1, b);
    }

    joiner.union(a, b);
}

/// Connect the rooms (C `makecorridors()`)
///
/// Four passes: neighbors in left-to-right order, then skip-one pairs,
/// then a sweep joining any components still apart, then a few random
/// extra corridors that may silently fail.
pub fn makecorridors(
    level: &mut Level,
    ctx: &GenContext,
    rng: &mut GameRng,
    joiner: &mut RoomJoiner,
) {
    let nroom = level.rooms.len();

    for a in 0..nroom.saturating_sub(1) {
        join(level, ctx, rng, joiner, a, a + 1, false);
        if rng.rn2(50) == 0 {
            break; // allow some randomness
        }
    }
    for a in 0..nroom.saturating_sub(2) {
        if !joiner.connected(a, a + 2) {
            join(level, ctx, rng, joiner, a, a + 2, false);
        }
    }
    let mut any = true;
    for a in 0..nroom {
        if !any {
            break;
        }
        any = false;
        for b in 0..nroom {
            if !joiner.connected(a, b) {
                join(level, ctx, rng, joiner, a, b, false);
                any = true;
            }
        }
    }
    if nroom > 2 {
        let mut i = rng.rn2(nroom as u32) + 4;
        while i > 0 {
            let a = rng.rn2(nroom as u32) as usize;
            let mut b = rng.rn2(nroom as u32 - 2) as usize;
            if b >= a {
                b += 2;
            }
            join(level, ctx, rng, joiner, a, b, true);
            i -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::DLevel;

    fn carve_room(level: &mut Level, room: &Room) {
        let (lx, ly, hx, hy) = room.bounds();
        for x in (lx - 1)..=(hx + 1) {
            for y in (ly - 1)..=(hy + 1) {
                let on_edge = x < lx || x > hx || y < ly || y > hy;
                level.cells[x][y].typ = if !on_edge {
                    CellType::Room
                } else if y < ly || y > hy {
                    CellType::HWall
                } else {
                    CellType::VWall
                };
            }
        }
    }

    fn two_room_level() -> Level {
        let mut level = Level::new(DLevel::default());
        let left = Room::new(5, 8, 6, 4);
        let right = Room::new(40, 8, 6, 4);
        carve_room(&mut level, &left);
        carve_room(&mut level, &right);
        level.rooms.push(left);
        level.rooms.push(right);
        level
    }

    #[test]
    fn test_joiner_components() {
        let mut joiner = RoomJoiner::new(5);
        assert!(!joiner.connected(0, 4));
        joiner.union(0, 1);
        joiner.union(1, 4);
        assert!(joiner.connected(0, 4));
        assert!(!joiner.connected(2, 4));
    }

    #[test]
    fn test_dig_corridor_straight() {
        let mut level = Level::new(DLevel::default());
        let mut rng = GameRng::new(42);
        let ok = dig_corridor(
            &mut level,
            &mut rng,
            (10, 10),
            (30, 10),
            false,
            CellType::Corridor,
            CellType::Stone,
        );
        assert!(ok);
        // every column along the way was dug (secret segments count)
        for x in 10..=30 {
            assert!(matches!(
                level.cells[x][10].typ,
                CellType::Corridor | CellType::SecretCorridor
            ));
        }
    }

    #[test]
    fn test_dig_corridor_rejects_border() {
        let mut level = Level::new(DLevel::default());
        let mut rng = GameRng::new(42);
        assert!(!dig_corridor(
            &mut level,
            &mut rng,
            (0, 5),
            (10, 5),
            false,
            CellType::Corridor,
            CellType::Stone,
        ));
    }

    #[test]
    fn test_join_connects_two_rooms() {
        let mut level = two_room_level();
        let ctx = GenContext::new(DLevel::new(0, 5), 1, false);
        let mut rng = GameRng::new(99);
        let mut joiner = RoomJoiner::new(2);

        join(&mut level, &ctx, &mut rng, &mut joiner, 0, 1, false);

        assert!(joiner.connected(0, 1));
        assert!(level.rooms[0].door_count >= 1);
        assert!(level.rooms[1].door_count >= 1);
        let dug = level
            .cells
            .iter()
            .flatten()
            .filter(|c| matches!(c.typ, CellType::Corridor | CellType::SecretCorridor))
            .count();
        assert!(dug > 0);
    }

    #[test]
    fn test_makecorridors_single_component() {
        let mut level = two_room_level();
        let ctx = GenContext::new(DLevel::new(0, 5), 1, false);
        let mut rng = GameRng::new(3);
        let mut joiner = RoomJoiner::new(2);

        makecorridors(&mut level, &ctx, &mut rng, &mut joiner);
        assert!(joiner.connected(0, 1));
    }
}
