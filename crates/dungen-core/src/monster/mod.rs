//! Monster system
//!
//! Instances and the placement primitives that put them somewhere
//! sensible. Species are plain names plus movement capabilities; the
//! generator has no use for full combat templates.

mod caps;
mod makemon;
mod monst;

pub use caps::MoveCaps;
pub use makemon::{
    enexto, enexto_core, goodpos, makemon, random_monster, GoodposFlags, Occupant, Species,
    MAX_CANDIDATES,
};
pub use monst::{Monster, MonsterId, Player};
