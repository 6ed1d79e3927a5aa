//! Dungeon level identifier (dungeon.c)

use serde::{Deserialize, Serialize};

/// Dungeon level identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DLevel {
    /// Dungeon number (which branch)
    pub dungeon_num: i8,
    /// Level number within the dungeon
    pub level_num: i8,
}

impl DLevel {
    /// Create a new dungeon level identifier
    pub const fn new(dungeon_num: i8, level_num: i8) -> Self {
        Self {
            dungeon_num,
            level_num,
        }
    }

    /// Main dungeon entrance
    pub const fn main_dungeon_start() -> Self {
        Self::new(0, 1)
    }

    /// Get depth (for difficulty calculations)
    ///
    /// The generator serves a single linear branch, so depth is simply the
    /// level number.
    pub const fn depth(&self) -> i32 {
        self.level_num as i32
    }

    /// Check if deeper than another level
    pub fn is_deeper(&self, other: &DLevel) -> bool {
        self.depth() > other.depth()
    }

    /// Check if this is the same level as another (on_level equivalent)
    pub fn on_level(&self, other: &DLevel) -> bool {
        self.dungeon_num == other.dungeon_num && self.level_num == other.level_num
    }
}

impl core::fmt::Display for DLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Dlvl:{}", self.level_num)
    }
}

/// Calculate level difficulty (level_difficulty equivalent)
///
/// Used for trap and monster generation. C formula: depth + ulevel / 2,
/// with the player's experience level injected by the caller.
pub fn level_difficulty(dlevel: &DLevel, player_level: i32) -> i32 {
    dlevel.depth() + player_level / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth() {
        assert_eq!(DLevel::new(0, 1).depth(), 1);
        assert_eq!(DLevel::new(0, 15).depth(), 15);
        assert_eq!(DLevel::main_dungeon_start().depth(), 1);
    }

    #[test]
    fn test_is_deeper() {
        let shallow = DLevel::new(0, 5);
        let deep = DLevel::new(0, 15);
        assert!(deep.is_deeper(&shallow));
        assert!(!shallow.is_deeper(&deep));
    }

    #[test]
    fn test_level_difficulty() {
        // Depth 1, player level 5: 1 + 5/2 = 3
        assert_eq!(level_difficulty(&DLevel::new(0, 1), 5), 3);
        // Depth 10, player level 10: 10 + 10/2 = 15
        assert_eq!(level_difficulty(&DLevel::new(0, 10), 10), 15);
    }
}
