use proptest::prelude::*;

use dungen_core::action::rloc;
use dungen_core::dungeon::{
    add_room, generate_level, verify_level, CellType, DLevel, GenContext, Level, RoomType,
};
use dungen_core::monster::{Monster, MoveCaps};
use dungen_core::object::ObjectKind;
use dungen_core::GameRng;

fn generate(seed: u64, depth: i8, is_bottom: bool) -> Level {
    let mut ctx = GenContext::new(DLevel::new(0, depth), 1, is_bottom);
    let mut rng = GameRng::new(seed);
    generate_level(&mut ctx, &mut rng)
}

#[test]
fn test_same_seed_same_level() {
    for depth in [1, 5, 10, 20] {
        let a = generate(0x5eed, depth, false);
        let b = generate(0x5eed, depth, false);
        assert_eq!(a, b, "depth {depth} diverged between runs");
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = generate(1, 5, false);
    let b = generate(2, 5, false);
    assert_ne!(a, b);
}

#[test]
fn test_seed_sweep_produces_sound_levels() {
    for depth in [2, 9, 16, 20] {
        for seed in 0..200u64 {
            let level = generate(seed, depth, false);
            if let Err(err) = verify_level(&level) {
                panic!("seed {seed} depth {depth}: {err}");
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn generated_levels_hold_their_invariants(seed in any::<u64>(), depth in 1i8..=30) {
        let is_bottom = depth == 30;
        let level = generate(seed, depth, is_bottom);

        prop_assert!(!level.rooms.is_empty());

        let ups = level.stairs.iter().filter(|s| s.up).count();
        let downs = level.stairs.len() - ups;
        prop_assert_eq!(ups, 1);
        prop_assert_eq!(downs, usize::from(!is_bottom));

        if !is_bottom && level.rooms.len() > 1 {
            // with more than one room the staircases never share one
            let (ux, uy) = level.find_upstairs().unwrap();
            let (dx, dy) = level.find_downstairs().unwrap();
            let room_of = |x: i8, y: i8| {
                level
                    .rooms
                    .iter()
                    .position(|r| r.contains(x as usize, y as usize))
            };
            prop_assert_ne!(room_of(ux, uy), room_of(dx, dy));
        }

        let verdict = verify_level(&level);
        prop_assert!(verdict.is_ok(), "seed={} depth={}: {:?}", seed, depth, verdict);
    }
}

#[test]
fn test_walker_keeps_out_of_ponds() {
    let mut level = Level::new(DLevel::new(0, 5));
    add_room(&mut level, 5, 5, 40, 15, true, RoomType::Ordinary);
    for x in 20..=25 {
        for y in 8..=11 {
            level.cells[x][y].typ = CellType::Pool;
        }
    }
    let id = level.add_monster(Monster::new("jackal", 6, 6, MoveCaps::empty()));
    let mut rng = GameRng::new(101);

    for _ in 0..30 {
        assert!(rloc(&mut level, &mut rng, id, false));
        let mon = level.monster(id).unwrap();
        assert!(
            !level.cells[mon.x as usize][mon.y as usize].typ.is_pool(),
            "walker relocated into the pond at ({},{})",
            mon.x,
            mon.y
        );
    }
}

#[test]
fn test_swimmer_relocates_into_flooded_room() {
    let mut level = Level::new(DLevel::new(0, 5));
    add_room(&mut level, 5, 5, 20, 15, true, RoomType::Ordinary);
    for x in 5..=20 {
        for y in 5..=15 {
            level.cells[x][y].typ = CellType::Pool;
        }
    }
    let id = level.add_monster(Monster::new("giant eel", 0, 0, MoveCaps::SWIM));
    let mut rng = GameRng::new(7);

    assert!(rloc(&mut level, &mut rng, id, false));
    let mon = level.monster(id).unwrap();
    assert!(level.cells[mon.x as usize][mon.y as usize].typ.is_pool());
}

#[test]
fn test_walker_takes_the_water_when_nothing_else_is_left() {
    // every open tile is flooded; the relaxed fallback scan still finds
    // the walker a spot rather than failing the relocation
    let mut level = Level::new(DLevel::new(0, 5));
    add_room(&mut level, 5, 5, 20, 15, true, RoomType::Ordinary);
    for x in 5..=20 {
        for y in 5..=15 {
            level.cells[x][y].typ = CellType::Pool;
        }
    }
    let id = level.add_monster(Monster::new("jackal", 0, 0, MoveCaps::empty()));
    let mut rng = GameRng::new(7);

    assert!(rloc(&mut level, &mut rng, id, false));
    let mon = level.monster(id).unwrap();
    assert!(level.cells[mon.x as usize][mon.y as usize].typ.is_pool());
    assert!(level.take_diagnostics().is_empty());
}

#[test]
fn test_rloc_stress_on_packed_level() {
    let mut level = Level::new(DLevel::new(0, 5));
    add_room(&mut level, 10, 5, 12, 7, true, RoomType::Ordinary);
    for x in 10..=12 {
        for y in 5..=7 {
            level.add_monster(Monster::new("kobold", x, y, MoveCaps::empty()));
        }
    }
    let outsider = level.add_monster(Monster::new("jackal", 0, 0, MoveCaps::empty()));
    let mut rng = GameRng::new(13);

    for _ in 0..1000 {
        assert!(!rloc(&mut level, &mut rng, outsider, true));
    }
    let mon = level.monster(outsider).unwrap();
    assert_eq!((mon.x, mon.y), (0, 0));
    assert!(level.take_diagnostics().is_empty());
}

#[test]
fn test_level_json_roundtrip() {
    let level = generate(99, 7, false);

    let json = serde_json::to_string(&level).expect("serialize");
    let mut restored: Level = serde_json::from_str(&json).expect("deserialize");
    restored.rebuild_indexes();

    assert_eq!(level, restored);
    for mon in &restored.monsters {
        assert!(restored.monster_at(mon.x, mon.y).is_some());
    }
}

#[test]
fn test_vault_levels_are_isolated_and_golden() {
    let mut vaults_seen = 0;
    for seed in 0..400u64 {
        let level = generate(seed, 12, false);
        if !level.flags.has_vault {
            continue;
        }
        vaults_seen += 1;

        let vault = level
            .rooms
            .iter()
            .find(|r| r.room_type == RoomType::Vault)
            .expect("has_vault set but no vault room");
        assert_eq!(vault.door_count, 0);

        // solid wall ring, gold on every floor tile
        let (wlx, wly, whx, why) = vault.wall_bounds();
        for x in wlx..=whx {
            for y in wly..=why {
                let inside = vault.contains(x, y);
                let typ = level.cells[x][y].typ;
                if inside {
                    assert_eq!(typ, CellType::Room, "vault floor at ({x},{y})");
                    let gold = level
                        .objects_at(x as i8, y as i8)
                        .iter()
                        .any(|o| o.kind == ObjectKind::GoldPiece && o.quantity >= 51);
                    assert!(gold, "no gold pile at ({x},{y})");
                } else {
                    assert!(typ.is_stone_or_wall(), "breach in vault wall at ({x},{y})");
                }
            }
        }

        if vaults_seen == 3 {
            break;
        }
    }
    assert!(vaults_seen > 0, "no vault in 400 levels at depth 12");
}
