//! Trap creation (trap.c, mklev.c)

use super::generation::GenContext;
use super::level::{Level, Trap, TrapType, TRAPNUM};
use super::room::somexy;
use super::CellType;
use crate::monster::{makemon, MoveCaps};
use crate::object::{Object, ObjectKind};
use crate::rng::GameRng;

impl TrapType {
    /// Pit or spiked pit (is_pit)
    pub const fn is_pit(&self) -> bool {
        matches!(self, TrapType::Pit | TrapType::SpikedPit)
    }

    /// Hole or trap door (is_hole)
    pub const fn is_hole(&self) -> bool {
        matches!(self, TrapType::Hole | TrapType::TrapDoor)
    }

    /// Warning text scrawled near hidden instances of this trap
    /// (trap_engravings)
    pub const fn engraving_text(&self) -> Option<&'static str> {
        match self {
            // "to the vault"
            TrapType::Hole | TrapType::TrapDoor => Some("ad aerarium"),
            _ => None,
        }
    }
}

/// Place a trap of the given type at an exact spot (C `maketrap()`)
///
/// Replaces an existing trap unless it is a magic portal or vibrating
/// square. Statue traps drop their statue; pits and holes scour the
/// tile back to plain floor.
pub fn maketrap(level: &mut Level, x: i8, y: i8, trap_type: TrapType) -> Option<&mut Trap> {
    if let Some(existing) = level.trap_at(x, y) {
        if matches!(
            existing.trap_type,
            TrapType::MagicPortal | TrapType::VibratingSquare
        ) {
            return None;
        }
    } else {
        level.traps.push(Trap {
            x,
            y,
            trap_type,
            seen: false,
            once: false,
            madeby_u: false,
            dst: None,
        });
    }

    match trap_type {
        TrapType::Statue => {
            level.add_object(Object::new(ObjectKind::Statue, 1), x, y);
        }
        TrapType::Pit | TrapType::SpikedPit | TrapType::Hole | TrapType::TrapDoor => {
            let cell = &mut level.cells[x as usize][y as usize];
            cell.flags = 0;
            if cell.typ.is_furniture() || cell.typ == CellType::Door {
                cell.typ = CellType::Room;
            }
        }
        _ => {}
    }

    let trap = level.trap_at_mut(x, y)?;
    trap.trap_type = trap_type;
    trap.once = false;
    // holes can't be concealed
    trap.seen = trap_type == TrapType::Hole;
    Some(trap)
}

/// Make a trap somewhere in a room, or at an exact spot (C `mktrap()`)
///
/// With no requested kind, rolls one and rerolls anything too nasty for
/// the current depth. Webs come with their spider.
pub fn mktrap(
    level: &mut Level,
    ctx: &GenContext,
    rng: &mut GameRng,
    num: Option<TrapType>,
    room_idx: usize,
    tm: Option<(i8, i8)>,
) {
    // no traps in pools
    if let Some((x, y)) = tm {
        if level.cells[x as usize][y as usize].typ.is_pool() {
            return;
        }
    }

    let mut kind = if let Some(k) = num {
        k
    } else if ctx.in_hell && rng.rn2(5) == 0 {
        // fire traps are commoner in Gehennom
        TrapType::FireTrap
    } else {
        let difficulty = ctx.difficulty;
        loop {
            let roll = rng.rnd(TRAPNUM - 1) as u8;
            let Some(k) = TrapType::from_repr(roll) else {
                continue;
            };
            // reject "too hard" traps
            let rejected = match k {
                TrapType::MagicPortal | TrapType::VibratingSquare => true,
                TrapType::RollingBoulder | TrapType::SleepingGas => difficulty < 2,
                TrapType::LevelTeleport => difficulty < 5 || level.flags.no_teleport,
                TrapType::SpikedPit => difficulty < 5,
                TrapType::LandMine => difficulty < 6,
                TrapType::Web => difficulty < 7,
                TrapType::Statue | TrapType::Polymorph => difficulty < 8,
                TrapType::FireTrap => !ctx.in_hell,
                TrapType::Teleport => level.flags.no_teleport,
                // never on the shallowest levels, much rarer elsewhere
                TrapType::Hole => difficulty < 2 || rng.rn2(7) != 0,
                _ => false,
            };
            if !rejected {
                break k;
            }
        }
    };

    if kind.is_hole() && !ctx.can_fall_thru() {
        kind = TrapType::RockFall;
    }

    let (x, y) = if let Some(pos) = tm {
        pos
    } else {
        let avoid_boulder = kind.is_pit() || kind.is_hole();
        let mut tryct = 0;
        loop {
            tryct += 1;
            if tryct > 200 {
                return;
            }
            let Some((sx, sy)) =
                somexy(&level.rooms[room_idx], room_idx, &level.rooms, level, rng)
            else {
                return;
            };
            let (sx, sy) = (sx as i8, sy as i8);
            if !level.occupied(sx, sy)
                && !(avoid_boulder && level.object_at(ObjectKind::Boulder, sx, sy))
            {
                break (sx, sy);
            }
        }
    };

    maketrap(level, x, y, kind);
    if kind == TrapType::Web {
        makemon(level, rng, "giant spider", MoveCaps::empty(), x, y);
    }
}
