//! Generator properties across seeds: connectivity, bounds, determinism.

use proptest::prelude::*;

use warren_core::dungeon::{self, MapKind};
use warren_core::{GameRng, Pos};

/// Every walkable tile must be reachable from the start tile through
/// 4-directional movement.
fn assert_fully_connected(grid: &warren_core::dungeon::Grid, start: Pos, label: &str) {
    assert!(grid.is_walkable(start), "{label}: start tile not carved");
    let reachable = grid.flood_fill_reachable(start);
    for x in 0..grid.width as usize {
        for y in 0..grid.height as usize {
            if grid.tiles[x][y].walkable {
                assert!(reachable[x][y], "{label}: tile ({x},{y}) unreachable");
            }
        }
    }
}

#[test]
fn caves_seed_1337_fully_reachable_from_center() {
    let mut rng = GameRng::new(1337);
    let grid = dungeon::generate(&mut rng, 40, 20, MapKind::Caves);
    assert_fully_connected(&grid, Pos::new(20, 10), "caves/1337");
}

#[test]
fn rooms_seed_1337_fully_reachable_from_first_room() {
    let mut rng = GameRng::new(1337);
    let grid = dungeon::generate(&mut rng, 40, 20, MapKind::Rooms);
    let start = grid.rooms[0].center();
    assert_fully_connected(&grid, start, "rooms/1337");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn caves_connectivity_holds_for_any_seed(
        seed in any::<u64>(),
        width in 20i32..=80,
        height in 10i32..=40,
    ) {
        let mut rng = GameRng::new(seed);
        let grid = dungeon::generate(&mut rng, width, height, MapKind::Caves);
        assert_fully_connected(&grid, Pos::new(width / 2, height / 2), "caves");
    }

    #[test]
    fn rooms_connectivity_holds_for_any_seed(
        seed in any::<u64>(),
        width in 20i32..=80,
        height in 10i32..=40,
    ) {
        let mut rng = GameRng::new(seed);
        let grid = dungeon::generate(&mut rng, width, height, MapKind::Rooms);
        let start = grid.rooms[0].center();
        assert_fully_connected(&grid, start, "rooms");
    }

    #[test]
    fn generation_is_deterministic(seed in any::<u64>()) {
        let mut a = GameRng::new(seed);
        let mut b = GameRng::new(seed);
        let ga = dungeon::generate(&mut a, 50, 24, MapKind::Rooms);
        let gb = dungeon::generate(&mut b, 50, 24, MapKind::Rooms);
        prop_assert_eq!(ga.rooms.clone(), gb.rooms.clone());
        prop_assert_eq!(ga.doors.len(), gb.doors.len());
        for (pos, door) in &ga.doors {
            let other = gb.door_at(*pos).expect("door missing in twin");
            prop_assert_eq!(door.state, other.state);
        }
        for x in 0..ga.width as usize {
            for y in 0..ga.height as usize {
                prop_assert_eq!(ga.tiles[x][y].walkable, gb.tiles[x][y].walkable);
            }
        }
    }

    #[test]
    fn border_is_never_carved(seed in any::<u64>(), kind_rooms in any::<bool>()) {
        let kind = if kind_rooms { MapKind::Rooms } else { MapKind::Caves };
        let mut rng = GameRng::new(seed);
        let grid = dungeon::generate(&mut rng, 40, 20, kind);
        for x in 0..grid.width {
            prop_assert!(!grid.is_walkable(Pos::new(x, 0)));
            prop_assert!(!grid.is_walkable(Pos::new(x, grid.height - 1)));
        }
        for y in 0..grid.height {
            prop_assert!(!grid.is_walkable(Pos::new(0, y)));
            prop_assert!(!grid.is_walkable(Pos::new(grid.width - 1, y)));
        }
    }
}
