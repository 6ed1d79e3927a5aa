//! Mineral and kelp seeding (mklev.c `mineralize()`)
//!
//! Runs after the level is otherwise finished: kelp fronds grow in
//! standing water, and gold and gems are hidden in solid rock far
//! enough from anything carved that only digging finds them.

use super::generation::GenContext;
use super::level::Level;
use super::CellType;
use crate::consts::{COLNO, ROWNO};
use crate::object::{random_gem, Object, ObjectKind};
use crate::rng::GameRng;

/// Seed the finished level with kelp and buried minerals
pub fn mineralize(level: &mut Level, ctx: &GenContext, rng: &mut GameRng) {
    // kelp in pools and moats
    for x in 2..COLNO - 2 {
        for y in 1..ROWNO - 1 {
            let typ = level.cells[x][y].typ;
            if (typ == CellType::Pool && rng.rn2(10) == 0)
                || (typ == CellType::Moat && rng.rn2(30) == 0)
            {
                level.add_object(Object::new(ObjectKind::KelpFrond, 1), x as i8, y as i8);
            }
        }
    }

    // no gold or gems in Gehennom; why make it easy
    if ctx.in_hell {
        return;
    }

    let depth = ctx.dlevel.depth();
    let goldprob = 20 + depth / 3;
    let gemprob = goldprob / 4;

    // Seed rock areas with gold and/or gems. Fairly large skips keep
    // the number of tries small; anything above floor level is
    // pointless anyway.
    for x in 2..COLNO - 2 {
        let mut y = 1;
        while y < ROWNO - 2 {
            if level.cells[x][y + 1].typ != CellType::Stone {
                // this spot and the next two are no good
                y += 3;
                continue;
            }
            if level.cells[x][y].typ != CellType::Stone {
                y += 2;
                continue;
            }
            let blocked = !level.cells[x][y].can_dig
                || level.cells[x][y - 1].typ != CellType::Stone
                || level.cells[x - 1][y - 1].typ != CellType::Stone
                || level.cells[x + 1][y - 1].typ != CellType::Stone
                || level.cells[x - 1][y].typ != CellType::Stone
                || level.cells[x + 1][y].typ != CellType::Stone
                || level.cells[x - 1][y + 1].typ != CellType::Stone
                || level.cells[x + 1][y + 1].typ != CellType::Stone;
            if blocked {
                y += 1;
                continue;
            }

            if rng.rn2(1000) < goldprob as u32 {
                let quantity = 1 + rng.rnd((goldprob * 3) as u32);
                deposit(level, rng, Object::new(ObjectKind::GoldPiece, quantity), x, y);
            }
            if rng.rn2(1000) < gemprob as u32 {
                for _ in 0..rng.rnd((2 + depth / 3).max(0) as u32) {
                    let gem = Object::new(ObjectKind::Gem(random_gem(rng)), 1);
                    deposit(level, rng, gem, x, y);
                }
            }
            y += 1;
        }
    }
}

/// A mineral is buried 1 time in 3, otherwise it sits loose in the rock
fn deposit(level: &mut Level, rng: &mut GameRng, obj: Object, x: usize, y: usize) {
    if rng.rn2(3) == 0 {
        level.bury_object(obj, x as i8, y as i8);
    } else {
        level.add_object(obj, x as i8, y as i8);
    }
}
