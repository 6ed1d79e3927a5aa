//! Actions that move things around after generation
//!
//! For now that is the teleport family: random monster relocation,
//! player teleport destinations, and trap-triggered jumps.

mod teleport;

pub use teleport::{
    mlevel_tele_trap, mtele_trap, random_teleport_level, rloc, rloc_pos_ok, rloc_to,
    rloc_with_policy, safe_teleds, tele_jump_ok, tele_trap, teleok, vault_tele, RlocPolicy,
};
