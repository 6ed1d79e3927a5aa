//! Core generation constants from NetHack
//!
//! These are derived from include/config.h, include/global.h, and the
//! level generator sources (mklev.c, rect.c).

/// Map dimensions
pub const COLNO: usize = 80;
pub const ROWNO: usize = 21;

/// Room limits
pub const MAXNROFROOMS: usize = 40;
pub const MAX_SUBROOMS: usize = 24;

/// Level-wide door registry capacity
pub const DOORMAX: usize = 120;

/// Free-rectangle pool capacity (rect.c MAXRECT)
pub const MAXRECT: usize = 50;

/// Minimum margins kept between a carved room and its rectangle's edges
/// (rect.c XLIM/YLIM)
pub const XLIM: i8 = 4;
pub const YLIM: i8 = 3;

/// Values for `Cell::room_number`
pub const NO_ROOM: u8 = 0;
/// Wall shared by two rooms
pub const SHARED: u8 = 1;
/// First real room index is stored as `index + ROOMOFFSET`
pub const ROOMOFFSET: u8 = 3;

/// Valid map position: column 0 exists in storage but is never addressable.
pub const fn isok(x: i8, y: i8) -> bool {
    x >= 1 && (x as usize) < COLNO && y >= 0 && (y as usize) < ROWNO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isok_bounds() {
        assert!(isok(1, 0));
        assert!(isok(79, 20));
        assert!(!isok(0, 0));
        assert!(!isok(80, 0));
        assert!(!isok(1, -1));
        assert!(!isok(1, 21));
    }
}
