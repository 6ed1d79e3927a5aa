//! dungen-core: procedural dungeon generation and spatial placement
//!
//! One call to [`dungeon::generate_level`] produces a complete level on a
//! fixed 80x21 grid: rooms, corridors, doors, niches, an optional vault,
//! a themed special room, stocked ordinary rooms, and mineral deposits.
//! All randomness flows through an injected [`GameRng`], so the same seed
//! reproduces the identical level.
//!
//! The placement primitives used during play (`goodpos`, `enexto`, `rloc`)
//! live in [`monster`] and [`action`].
//!
//! Supports `no_std` environments by disabling the default `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

/// Re-exports of alloc types needed when building without std.
/// In std mode, these are provided by the std prelude.
#[cfg(not(feature = "std"))]
pub(crate) mod compat {
    pub use alloc::borrow::ToOwned;
    pub use alloc::boxed::Box;
    pub use alloc::format;
    pub use alloc::string::{String, ToString};
    pub use alloc::vec;
    pub use alloc::vec::Vec;
}

pub mod action;
pub mod dungeon;
pub mod monster;
pub mod object;

mod consts;
mod rng;

pub use consts::*;
pub use rng::GameRng;
