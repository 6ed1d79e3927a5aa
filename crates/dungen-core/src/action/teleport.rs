//! Random relocation (teleport.c)
//!
//! `rloc` finds a random legal tile for a monster, `rloc_to` performs
//! the move itself, and the `tele*` family covers player destinations
//! and trap-triggered teleports. Relocation never fails silently: the
//! search degrades through well-defined stages and reports through the
//! level diagnostics channel if the map is truly full.

#[cfg(not(feature = "std"))]
use crate::compat::*;

use crate::consts::{COLNO, ROWNO};
use crate::dungeon::{search_special, somexy, DLevel, Level, RoomType, TrapType};
use crate::monster::{goodpos, GoodposFlags, Monster, MonsterId, Occupant};
use crate::rng::GameRng;

/// Probe budgets for [`rloc`]'s random stages
///
/// The strict stage honors room confinement and teleport regions; the
/// relaxed stage only needs `goodpos`. After both budgets run dry the
/// search falls back to deterministic grid scans.
#[derive(Debug, Clone, Copy)]
pub struct RlocPolicy {
    pub strict_probes: u32,
    pub relaxed_probes: u32,
}

impl Default for RlocPolicy {
    fn default() -> Self {
        Self {
            strict_probes: 500,
            relaxed_probes: 500,
        }
    }
}

/// May a teleport go from (x1,y1) to (x2,y2)? (C `tele_jump_ok()`)
///
/// Source and destination must be on the same side of every teleport
/// region: no jumping into or out of a restricted area.
pub fn tele_jump_ok(level: &Level, x1: i8, y1: i8, x2: i8, y2: i8) -> bool {
    level
        .tele_regions
        .iter()
        .all(|r| r.contains_point(x1, y1) == r.contains_point(x2, y2))
}

/// Full destination check for a relocating monster (C `rloc_pos_ok()`)
///
/// `goodpos` plus the rules plain goodpos doesn't know: a confined
/// monster (shopkeeper, priest) stays inside its room, and the move may
/// not cross a teleport-region boundary.
pub fn rloc_pos_ok(level: &Level, mon: &Monster, x: i8, y: i8) -> bool {
    if !goodpos(level, x, y, Some(Occupant::Monster(mon)), GoodposFlags::empty()) {
        return false;
    }
    if let Some(room_idx) = mon.confined_to {
        if let Some(room) = level.rooms.get(room_idx) {
            if !room.contains(x as usize, y as usize) {
                return false;
            }
        }
    }
    // x == 0 means the monster is still arriving and has no source tile
    if mon.x != 0 && !tele_jump_ok(level, mon.x, mon.y, x, y) {
        return false;
    }
    true
}

/// Teleport a monster to a random legal position (C `rloc()`)
///
/// Returns false with the monster unmoved when no tile on the level
/// will take it.
pub fn rloc(level: &mut Level, rng: &mut GameRng, id: MonsterId, suppress_diag: bool) -> bool {
    rloc_with_policy(level, rng, id, suppress_diag, RlocPolicy::default())
}

/// [`rloc`] with caller-chosen probe budgets
pub fn rloc_with_policy(
    level: &mut Level,
    rng: &mut GameRng,
    id: MonsterId,
    suppress_diag: bool,
    policy: RlocPolicy,
) -> bool {
    let Some(mon) = level.monster(id) else {
        return false;
    };
    let mon = mon.clone();

    // a stair-seeker heads for the up staircase to cut off escape
    if mon.seeks_stairs {
        if let Some((sx, sy)) = level.find_upstairs() {
            if goodpos(level, sx, sy, Some(Occupant::Monster(&mon)), GoodposFlags::empty()) {
                rloc_to(level, rng, id, sx, sy);
                return true;
            }
        }
    }

    for strict in [true, false] {
        let probes = if strict {
            policy.strict_probes
        } else {
            policy.relaxed_probes
        };
        for _ in 0..probes {
            let x = rng.rn1(COLNO as u32 - 3, 2) as i8;
            let y = rng.rn2(ROWNO as u32) as i8;
            let ok = if strict {
                rloc_pos_ok(level, &mon, x, y)
            } else {
                goodpos(level, x, y, Some(Occupant::Monster(&mon)), GoodposFlags::empty())
            };
            if ok {
                rloc_to(level, rng, id, x, y);
                return true;
            }
        }
    }

    // random probing failed; sweep the grid
    for x in 2..COLNO as i8 - 1 {
        for y in 0..ROWNO as i8 {
            if rloc_pos_ok(level, &mon, x, y) {
                rloc_to(level, rng, id, x, y);
                return true;
            }
        }
    }
    for x in 2..COLNO as i8 - 1 {
        for y in 0..ROWNO as i8 {
            if goodpos(
                level,
                x,
                y,
                Some(Occupant::Monster(&mon)),
                GoodposFlags::IGNORE_WATER | GoodposFlags::IGNORE_LAVA,
            ) {
                rloc_to(level, rng, id, x, y);
                return true;
            }
        }
    }

    if !suppress_diag {
        level.impossible("rloc: couldn't relocate monster");
    }
    false
}

/// Move a monster to an exact position (C `rloc_to()`)
///
/// No-op when already there. The occupancy index is kept consistent,
/// and a worm's tail is re-grown behind the new head position,
/// shrinking if the surroundings are too tight.
pub fn rloc_to(level: &mut Level, rng: &mut GameRng, id: MonsterId, x: i8, y: i8) {
    let (ox, oy, tail_len) = match level.monster(id) {
        Some(m) => (m.x, m.y, m.tail.len()),
        None => return,
    };
    if ox == x && oy == y {
        return;
    }

    level.clear_monster_tiles(id);
    if let Some(m) = level.monster_mut(id) {
        m.x = x;
        m.y = y;
        m.tail.clear();
    }
    if tail_len > 0 {
        regrow_tail(level, rng, id, tail_len, x, y);
    }
    level.index_monster_tiles(id);
}

/// Re-place a worm's tail segment by segment behind its new head
/// (C `place_worm_tail_randomly()`)
fn regrow_tail(level: &mut Level, rng: &mut GameRng, id: MonsterId, want: usize, hx: i8, hy: i8) {
    let mon = match level.monster(id) {
        Some(m) => m.clone(),
        None => return,
    };

    let (mut ox, mut oy) = (hx, hy);
    let mut placed: Vec<(i8, i8)> = Vec::with_capacity(want);
    'segments: for _ in 0..want {
        for _ in 0..50 {
            let nx = (ox + rng.rn2(3) as i8 - 1).clamp(1, COLNO as i8 - 1);
            let ny = (oy + rng.rn2(3) as i8 - 1).clamp(0, ROWNO as i8 - 1);
            if (nx, ny) == (hx, hy) || placed.contains(&(nx, ny)) {
                continue;
            }
            if goodpos(level, nx, ny, Some(Occupant::Monster(&mon)), GoodposFlags::empty()) {
                placed.push((nx, ny));
                (ox, oy) = (nx, ny);
                continue 'segments;
            }
        }
        break; // cramped spot, the rest of the tail is lost
    }

    if let Some(m) = level.monster_mut(id) {
        m.tail = placed;
    }
}

/// Is (x,y) an acceptable player teleport destination? (C `teleok()`)
pub fn teleok(level: &Level, x: i8, y: i8, trapok: bool) -> bool {
    if !trapok && level.trap_at(x, y).is_some() {
        return false;
    }
    let Some(player) = level.player.as_ref() else {
        return false;
    };
    if !goodpos(level, x, y, Some(Occupant::Player(player)), GoodposFlags::empty()) {
        return false;
    }
    tele_jump_ok(level, player.x, player.y, x, y)
}

/// Teleport the player to a random safe position (C `safe_teleds()`)
///
/// After 200 failed probes, landing on a trap becomes acceptable.
pub fn safe_teleds(level: &mut Level, rng: &mut GameRng) -> Option<(i8, i8)> {
    let mut tcnt = 0;
    loop {
        let nux = rng.rnd(COLNO as u32 - 1) as i8;
        let nuy = rng.rn2(ROWNO as u32) as i8;
        if teleok(level, nux, nuy, tcnt > 200) {
            if let Some(player) = level.player.as_mut() {
                player.x = nux;
                player.y = nuy;
            }
            return Some((nux, nuy));
        }
        tcnt += 1;
        if tcnt > 400 {
            return None;
        }
    }
}

/// Teleport the player into the vault, or anywhere safe if there is
/// none (C `vault_tele()`)
pub fn vault_tele(level: &mut Level, rng: &mut GameRng) -> Option<(i8, i8)> {
    if let Some(idx) = search_special(&level.rooms, RoomType::Vault) {
        let room = level.rooms[idx].clone();
        if let Some((x, y)) = somexy(&room, idx, &level.rooms, level, rng) {
            let (x, y) = (x as i8, y as i8);
            if teleok(level, x, y, false) {
                if let Some(player) = level.player.as_mut() {
                    player.x = x;
                    player.y = y;
                }
                return Some((x, y));
            }
        }
    }
    safe_teleds(level, rng)
}

/// The player stepped on a teleport trap (C `tele_trap()`)
///
/// A one-shot trap is the hidden vault teleporter: it sends the player
/// into the vault and is spent. Returns the landing spot.
pub fn tele_trap(level: &mut Level, rng: &mut GameRng) -> Option<(i8, i8)> {
    if level.flags.no_teleport {
        return None;
    }
    let (px, py) = {
        let p = level.player.as_ref()?;
        (p.x, p.y)
    };
    let trap = level.trap_at(px, py)?;
    if trap.once {
        level.remove_trap(px, py);
        vault_tele(level, rng)
    } else {
        safe_teleds(level, rng)
    }
}

/// A monster stepped on a teleport trap (C `mtele_trap()`)
pub fn mtele_trap(level: &mut Level, rng: &mut GameRng, id: MonsterId) -> bool {
    if level.flags.no_teleport {
        return false;
    }
    let Some(mon) = level.monster(id) else {
        return false;
    };
    let (mx, my) = (mon.x, mon.y);
    let Some(trap) = level.trap_at(mx, my) else {
        return false;
    };
    if trap.once {
        level.remove_trap(mx, my);
        mvault_tele(level, rng, id);
    } else {
        rloc(level, rng, id, false);
    }
    true
}

/// Monster flavor of vault_tele (C `mvault_tele()`)
fn mvault_tele(level: &mut Level, rng: &mut GameRng, id: MonsterId) {
    if let Some(idx) = search_special(&level.rooms, RoomType::Vault) {
        let room = level.rooms[idx].clone();
        let mon = level.monster(id).cloned();
        if let (Some(mon), Some((x, y))) =
            (mon, somexy(&room, idx, &level.rooms, level, rng))
        {
            let (x, y) = (x as i8, y as i8);
            if goodpos(level, x, y, Some(Occupant::Monster(&mon)), GoodposFlags::empty()) {
                rloc_to(level, rng, id, x, y);
                return;
            }
        }
    }
    rloc(level, rng, id, false);
}

/// Pick the depth a level teleporter sends its victim to
/// (C `random_teleport_level()`)
///
/// 1 time in 5 the victim stays put. An equal-to-current roll is
/// nudged down a level, wrapping to one level up at the bottom.
pub fn random_teleport_level(level: &Level, rng: &mut GameRng, max_depth: i32) -> i32 {
    let cur = level.dlevel.depth();
    if rng.rn2(5) == 0 {
        return cur;
    }
    let mut nlev = rng.rnd(max_depth.max(1) as u32) as i32;
    if nlev == cur {
        nlev += 1;
        if nlev > max_depth {
            nlev = cur - 1;
            if nlev < 1 {
                nlev = cur;
            }
        }
    }
    nlev
}

/// A monster stepped on a level teleporter or magic portal
/// (C `mlevel_tele_trap()`)
///
/// On success the monster is removed from this level and its
/// destination returned; the caller owns the migration. A same-level
/// roll degrades to a plain `rloc`.
pub fn mlevel_tele_trap(
    level: &mut Level,
    rng: &mut GameRng,
    id: MonsterId,
    max_depth: i32,
) -> Option<DLevel> {
    if level.flags.no_teleport {
        return None;
    }
    let mon = level.monster(id)?;
    let (mx, my) = (mon.x, mon.y);
    let trap = level.trap_at(mx, my)?;
    let (trap_type, once, dst) = (trap.trap_type, trap.once, trap.dst);

    match trap_type {
        TrapType::MagicPortal => {
            let dest = dst?;
            level.remove_monster(id);
            Some(dest)
        }
        TrapType::LevelTeleport => {
            if once {
                level.remove_trap(mx, my);
            }
            let nlev = random_teleport_level(level, rng, max_depth);
            if nlev == level.dlevel.depth() {
                rloc(level, rng, id, false);
                None
            } else {
                level.remove_monster(id);
                Some(DLevel::new(level.dlevel.dungeon_num, nlev as i8))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::generation::{add_room, mkstairs};
    use crate::dungeon::{maketrap, NhRect, Trap};
    use crate::monster::{MoveCaps, Player};

    fn room_level() -> Level {
        let mut level = Level::new(DLevel::new(0, 5));
        add_room(&mut level, 10, 5, 30, 12, true, RoomType::Ordinary);
        level
    }

    fn spawn(level: &mut Level, x: i8, y: i8) -> MonsterId {
        level.add_monster(Monster::new("jackal", x, y, MoveCaps::empty()))
    }

    #[test]
    fn test_tele_jump_ok_same_side_of_regions() {
        let mut level = room_level();
        level.tele_regions.push(NhRect::new(10, 5, 20, 12));

        assert!(tele_jump_ok(&level, 12, 6, 18, 10)); // inside -> inside
        assert!(tele_jump_ok(&level, 25, 6, 28, 10)); // outside -> outside
        assert!(!tele_jump_ok(&level, 12, 6, 28, 10)); // inside -> outside
        assert!(!tele_jump_ok(&level, 28, 10, 12, 6)); // outside -> inside
    }

    #[test]
    fn test_rloc_lands_on_goodpos_tile() {
        let mut level = room_level();
        let id = spawn(&mut level, 12, 6);
        let mut rng = GameRng::new(7);

        assert!(rloc(&mut level, &mut rng, id, false));
        let mon = level.monster(id).unwrap();
        assert!(level.cells[mon.x as usize][mon.y as usize].typ.is_passable());
        assert_eq!(level.monster_at(mon.x, mon.y).map(|m| m.id), Some(id));
    }

    #[test]
    fn test_rloc_confined_monster_stays_home() {
        let mut level = room_level();
        add_room(&mut level, 40, 5, 60, 12, true, RoomType::Ordinary);
        let id = spawn(&mut level, 12, 6);
        level.monster_mut(id).unwrap().confined_to = Some(0);
        let mut rng = GameRng::new(99);

        for _ in 0..20 {
            assert!(rloc(&mut level, &mut rng, id, false));
            let mon = level.monster(id).unwrap();
            assert!(
                level.rooms[0].contains(mon.x as usize, mon.y as usize),
                "confined monster escaped to ({},{})",
                mon.x,
                mon.y
            );
        }
    }

    #[test]
    fn test_rloc_respects_tele_regions() {
        let mut level = room_level();
        // the room is entirely inside the region, so the monster must stay inside
        level.tele_regions.push(NhRect::new(5, 2, 35, 15));
        let id = spawn(&mut level, 12, 6);
        let mut rng = GameRng::new(4);

        assert!(rloc(&mut level, &mut rng, id, false));
        let mon = level.monster(id).unwrap();
        assert!(level.tele_regions[0].contains_point(mon.x, mon.y));
    }

    #[test]
    fn test_rloc_seeks_stairs() {
        let mut level = room_level();
        mkstairs(&mut level, 15, 8, true);
        let id = spawn(&mut level, 28, 11);
        level.monster_mut(id).unwrap().seeks_stairs = true;
        let mut rng = GameRng::new(11);

        assert!(rloc(&mut level, &mut rng, id, false));
        let mon = level.monster(id).unwrap();
        assert_eq!((mon.x, mon.y), (15, 8));
    }

    #[test]
    fn test_rloc_to_moves_and_reindexes() {
        let mut level = room_level();
        let id = spawn(&mut level, 12, 6);
        let mut rng = GameRng::new(1);

        rloc_to(&mut level, &mut rng, id, 20, 9);
        assert!(level.monster_at(12, 6).is_none());
        assert_eq!(level.monster_at(20, 9).map(|m| m.id), Some(id));
    }

    #[test]
    fn test_rloc_to_regrows_worm_tail() {
        let mut level = room_level();
        let mut worm = Monster::new("long worm", 12, 6, MoveCaps::empty());
        worm.tail = vec![(11, 6), (11, 7), (12, 7)];
        let id = level.add_monster(worm);
        let mut rng = GameRng::new(3);

        rloc_to(&mut level, &mut rng, id, 20, 9);
        let mon = level.monster(id).unwrap();
        // open floor everywhere, so no segment is lost
        assert_eq!(mon.tail.len(), 3);

        let mut prev = (mon.x, mon.y);
        for &(sx, sy) in &mon.tail {
            assert!((sx - prev.0).abs() <= 1 && (sy - prev.1).abs() <= 1);
            assert_ne!((sx, sy), (mon.x, mon.y));
            assert_eq!(level.monster_at(sx, sy).map(|m| m.id), Some(id));
            prev = (sx, sy);
        }
    }

    #[test]
    fn test_rloc_reports_when_level_is_full() {
        let mut level = Level::new(DLevel::new(0, 5));
        // 3x3 room, every tile occupied by someone else
        add_room(&mut level, 10, 5, 12, 7, true, RoomType::Ordinary);
        for x in 10..=12 {
            for y in 5..=7 {
                spawn(&mut level, x, y);
            }
        }
        let outsider = level.add_monster(Monster::new("newcomer", 0, 0, MoveCaps::empty()));
        let mut rng = GameRng::new(5);

        assert!(!rloc(&mut level, &mut rng, outsider, false));
        assert!(!level.take_diagnostics().is_empty());

        // suppressed flavor stays quiet
        assert!(!rloc(&mut level, &mut rng, outsider, true));
        assert!(level.take_diagnostics().is_empty());
    }

    #[test]
    fn test_teleok_trap_rules() {
        let mut level = room_level();
        level.player = Some(Player::new(12, 6));
        maketrap(&mut level, 20, 9, TrapType::Pit);

        assert!(!teleok(&level, 20, 9, false));
        assert!(teleok(&level, 20, 9, true));
        assert!(teleok(&level, 25, 10, false));
    }

    #[test]
    fn test_safe_teleds_moves_player() {
        let mut level = room_level();
        level.player = Some(Player::new(12, 6));
        let mut rng = GameRng::new(21);

        let (x, y) = safe_teleds(&mut level, &mut rng).expect("open room");
        let player = level.player.as_ref().unwrap();
        assert_eq!((player.x, player.y), (x, y));
        assert!(level.cells[x as usize][y as usize].typ.is_passable());
    }

    #[test]
    fn test_vault_tele_prefers_the_vault() {
        let mut level = room_level();
        add_room(&mut level, 50, 8, 51, 9, true, RoomType::Vault);
        level.player = Some(Player::new(12, 6));
        let mut rng = GameRng::new(13);

        let (x, y) = vault_tele(&mut level, &mut rng).expect("vault tile");
        assert!(level.rooms[1].contains(x as usize, y as usize));
    }

    #[test]
    fn test_tele_trap_once_spends_the_vault_teleporter() {
        let mut level = room_level();
        add_room(&mut level, 50, 8, 51, 9, true, RoomType::Vault);
        level.player = Some(Player::new(12, 6));
        if let Some(trap) = maketrap(&mut level, 12, 6, TrapType::Teleport) {
            trap.once = true;
        }
        let mut rng = GameRng::new(17);

        let (x, y) = tele_trap(&mut level, &mut rng).expect("teleported");
        assert!(level.rooms[1].contains(x as usize, y as usize));
        assert!(level.trap_at(12, 6).is_none());
    }

    #[test]
    fn test_mtele_trap_honors_noteleport() {
        let mut level = room_level();
        level.flags.no_teleport = true;
        let id = spawn(&mut level, 12, 6);
        maketrap(&mut level, 12, 6, TrapType::Teleport);
        let mut rng = GameRng::new(2);

        assert!(!mtele_trap(&mut level, &mut rng, id));
        let mon = level.monster(id).unwrap();
        assert_eq!((mon.x, mon.y), (12, 6));
    }

    #[test]
    fn test_mtele_trap_once_sends_to_vault() {
        let mut level = room_level();
        add_room(&mut level, 50, 8, 51, 9, true, RoomType::Vault);
        let id = spawn(&mut level, 12, 6);
        if let Some(trap) = maketrap(&mut level, 12, 6, TrapType::Teleport) {
            trap.once = true;
        }
        let mut rng = GameRng::new(23);

        assert!(mtele_trap(&mut level, &mut rng, id));
        let mon = level.monster(id).unwrap();
        assert!(level.rooms[1].contains(mon.x as usize, mon.y as usize));
        assert!(level.trap_at(12, 6).is_none());
    }

    #[test]
    fn test_random_teleport_level_range() {
        let level = Level::new(DLevel::new(0, 10));
        let mut rng = GameRng::new(42);
        let mut stays = 0;
        let mut moves = 0;
        for _ in 0..1000 {
            let nlev = random_teleport_level(&level, &mut rng, 25);
            assert!((1..=25).contains(&nlev));
            if nlev == 10 {
                stays += 1;
            } else {
                moves += 1;
            }
        }
        // 1-in-5 stay-put chance, plus equal rolls are nudged away
        assert!(stays > 100 && stays < 350);
        assert!(moves > 600);
    }

    #[test]
    fn test_mlevel_tele_trap_migrates_or_relocs() {
        let mut level = room_level();
        let id = spawn(&mut level, 12, 6);
        level.traps.push(Trap {
            x: 12,
            y: 6,
            trap_type: TrapType::LevelTeleport,
            seen: false,
            once: false,
            madeby_u: false,
            dst: None,
        });
        let mut rng = GameRng::new(29);

        match mlevel_tele_trap(&mut level, &mut rng, id, 25) {
            Some(dest) => {
                assert_ne!(dest.level_num as i32, 5);
                assert!((1..=25).contains(&(dest.level_num as i32)));
                assert!(level.monster(id).is_none());
            }
            None => {
                // same-level roll: the monster was rloc'd instead
                assert!(level.monster(id).is_some());
            }
        }
    }

    #[test]
    fn test_mlevel_tele_trap_portal_uses_destination() {
        let mut level = room_level();
        let id = spawn(&mut level, 12, 6);
        level.traps.push(Trap {
            x: 12,
            y: 6,
            trap_type: TrapType::MagicPortal,
            seen: false,
            once: false,
            madeby_u: false,
            dst: Some(DLevel::new(7, 1)),
        });
        let mut rng = GameRng::new(31);

        let dest = mlevel_tele_trap(&mut level, &mut rng, id, 25).expect("portal");
        assert_eq!(dest, DLevel::new(7, 1));
        assert!(level.monster(id).is_none());
    }
}
