//! Monster instances (monst.h)

#[cfg(not(feature = "std"))]
use crate::compat::*;

use serde::{Deserialize, Serialize};

use super::MoveCaps;

/// Unique identifier for monster instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

impl MonsterId {
    pub const NONE: MonsterId = MonsterId(0);
}

/// A monster on the level
///
/// Carries only what generation and relocation act on: where it stands,
/// how it moves, and the handful of bits room population sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub x: i8,
    pub y: i8,
    /// Species name, e.g. "giant spider"
    pub name: String,
    /// Movement capabilities
    pub caps: MoveCaps,
    /// Extra occupied segments, head-adjacent first (long worms)
    pub tail: Vec<(i8, i8)>,
    /// Room index this monster never leaves (shopkeeper, priest)
    pub confined_to: Option<usize>,
    /// Heads for the stairs instead of a random spot when teleported
    pub seeks_stairs: bool,
    pub sleeping: bool,
    pub peaceful: bool,
}

impl Monster {
    /// A fresh hostile, awake monster; the id is assigned when a level
    /// takes it in
    pub fn new(name: &str, x: i8, y: i8, caps: MoveCaps) -> Self {
        Self {
            id: MonsterId::NONE,
            x,
            y,
            name: name.to_string(),
            caps,
            tail: Vec::new(),
            confined_to: None,
            seeks_stairs: false,
            sleeping: false,
            peaceful: false,
        }
    }

    /// Whether the head or any tail segment sits on (x, y)
    pub fn occupies(&self, x: i8, y: i8) -> bool {
        (self.x == x && self.y == y) || self.tail.contains(&(x, y))
    }
}

/// The player, reduced to what placement checks care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub x: i8,
    pub y: i8,
    pub caps: MoveCaps,
}

impl Player {
    pub fn new(x: i8, y: i8) -> Self {
        Self {
            x,
            y,
            caps: MoveCaps::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupies_covers_tail() {
        let mut worm = Monster::new("long worm", 4, 4, MoveCaps::empty());
        worm.tail = vec![(5, 4), (6, 4)];
        assert!(worm.occupies(4, 4));
        assert!(worm.occupies(6, 4));
        assert!(!worm.occupies(7, 4));
    }
}
