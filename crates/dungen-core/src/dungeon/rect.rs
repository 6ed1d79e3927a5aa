//! Free-rectangle tracking for room placement (rect.c)
//!
//! Tracks available space using a list of free rectangles. When a room is
//! carved, the containing rectangle is removed and up to four remainder
//! strips big enough for future rooms are re-added.

#[cfg(not(feature = "std"))]
use crate::compat::*;

use serde::{Deserialize, Serialize};

use crate::consts::{COLNO, MAXRECT, ROWNO, XLIM, YLIM};
use crate::rng::GameRng;

/// A rectangle of free space, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NhRect {
    /// Left x coordinate
    pub lx: i8,
    /// Top y coordinate
    pub ly: i8,
    /// Right x coordinate
    pub hx: i8,
    /// Bottom y coordinate
    pub hy: i8,
}

impl NhRect {
    /// Create a new rectangle
    pub const fn new(lx: i8, ly: i8, hx: i8, hy: i8) -> Self {
        Self { lx, ly, hx, hy }
    }

    /// Check if this rectangle fully contains another
    pub fn contains(&self, other: &NhRect) -> bool {
        self.lx <= other.lx && self.hx >= other.hx && self.ly <= other.ly && self.hy >= other.hy
    }

    /// Check if a point falls inside the rectangle
    pub fn contains_point(&self, x: i8, y: i8) -> bool {
        x >= self.lx && x <= self.hx && y >= self.ly && y <= self.hy
    }

    /// Calculate the intersection of two rectangles (C intersect)
    pub fn intersection(&self, other: &NhRect) -> Option<NhRect> {
        if other.lx > self.hx || other.ly > self.hy || other.hx < self.lx || other.hy < self.ly {
            return None;
        }
        let r = NhRect {
            lx: self.lx.max(other.lx),
            ly: self.ly.max(other.ly),
            hx: self.hx.min(other.hx),
            hy: self.hy.min(other.hy),
        };
        if r.lx > r.hx || r.ly > r.hy {
            return None;
        }
        Some(r)
    }
}

/// Manages the free-rectangle pool for one level build
#[derive(Debug, Clone)]
pub struct RectManager {
    rects: Vec<NhRect>,
}

impl Default for RectManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RectManager {
    /// Initialize with a single rectangle covering the entire level
    /// (init_rect equivalent)
    pub fn new() -> Self {
        let mut rects = Vec::with_capacity(MAXRECT);
        rects.push(NhRect::new(0, 0, COLNO as i8 - 1, ROWNO as i8 - 1));
        Self { rects }
    }

    /// Get a random free rectangle (rnd_rect equivalent)
    ///
    /// Draws from the RNG whenever the pool is non-empty, even if the
    /// caller only checks for emptiness; generation relies on that draw
    /// happening.
    pub fn rnd_rect(&self, rng: &mut GameRng) -> Option<NhRect> {
        if self.rects.is_empty() {
            None
        } else {
            Some(self.rects[rng.rn2(self.rects.len() as u32) as usize])
        }
    }

    /// Find a free rectangle containing the given one (get_rect equivalent)
    pub fn get_rect(&self, target: &NhRect) -> Option<NhRect> {
        self.rects.iter().find(|r| r.contains(target)).copied()
    }

    fn get_rect_ind(&self, target: &NhRect) -> Option<usize> {
        self.rects.iter().position(|r| r == target)
    }

    /// Add a rectangle to the pool unless it is already covered or the
    /// pool is full (add_rect equivalent)
    fn add_rect(&mut self, r: NhRect) {
        if self.rects.len() >= MAXRECT {
            return;
        }
        if self.get_rect(&r).is_some() {
            return;
        }
        self.rects.push(r);
    }

    /// Remove one exact rectangle (remove_rect equivalent)
    fn remove_rect(&mut self, r: &NhRect) {
        if let Some(ind) = self.get_rect_ind(r) {
            self.rects.swap_remove(ind);
        }
    }

    /// Subtract the carved area `r2` from free rectangle `r1`
    /// (split_rects equivalent)
    ///
    /// Removes `r1`, recursively splits any other pool entry intersecting
    /// `r2`, then re-adds the four remainder strips of `r1` that are still
    /// thick enough to host a room plus its separation margin.
    pub fn split_rects(&mut self, r1: NhRect, r2: NhRect) {
        let old_r = r1;
        self.remove_rect(&r1);

        // Walk down since the list changes underneath us
        let mut i = self.rects.len();
        while i > 0 {
            i -= 1;
            if i >= self.rects.len() {
                continue;
            }
            if let Some(r) = self.rects[i].intersection(&r2) {
                let sub = self.rects[i];
                self.split_rects(sub, r);
            }
        }

        if (r2.ly - old_r.ly - 1) as i32
            > (if (old_r.hy as usize) < ROWNO - 1 { 2 * YLIM } else { YLIM + 1 }) as i32 + 4
        {
            let mut r = old_r;
            r.hy = r2.ly - 2;
            self.add_rect(r);
        }
        if (r2.lx - old_r.lx - 1) as i32
            > (if (old_r.hx as usize) < COLNO - 1 { 2 * XLIM } else { XLIM + 1 }) as i32 + 4
        {
            let mut r = old_r;
            r.hx = r2.lx - 2;
            self.add_rect(r);
        }
        if (old_r.hy - r2.hy - 1) as i32
            > (if old_r.ly > 0 { 2 * YLIM } else { YLIM + 1 }) as i32 + 4
        {
            let mut r = old_r;
            r.ly = r2.hy + 2;
            self.add_rect(r);
        }
        if (old_r.hx - r2.hx - 1) as i32
            > (if old_r.lx > 0 { 2 * XLIM } else { XLIM + 1 }) as i32 + 4
        {
            let mut r = old_r;
            r.lx = r2.hx + 2;
            self.add_rect(r);
        }
    }

    /// Get the number of free rectangles
    pub fn count(&self) -> usize {
        self.rects.len()
    }

    /// Get all free rectangles
    pub fn rects(&self) -> &[NhRect] {
        &self.rects
    }
}
