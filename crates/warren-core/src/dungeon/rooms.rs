//! Rooms-and-corridors generation.
//!
//! Rectangular rooms placed by rejection sampling, joined center-to-center
//! with L-shaped corridors. Doors appear where a corridor crosses into a
//! room; up to two of them end up locked.

use super::{Grid, MapKind, Rect};
use crate::pos::Pos;
use crate::rng::GameRng;

const MIN_ROOMS: i32 = 8;
const MAX_ROOMS: i32 = 14;

pub fn generate(rng: &mut GameRng, width: i32, height: i32) -> Grid {
    let mut grid = Grid::new(width, height, MapKind::Rooms);

    place_rooms(rng, &mut grid);
    connect_rooms(rng, &mut grid);

    let start = grid.rooms[0].center();
    grid.retain_reachable(start);
    lock_some_doors(rng, &mut grid);
    grid
}

fn place_rooms(rng: &mut GameRng, grid: &mut Grid) {
    let n_rooms = rng.range(MIN_ROOMS, MAX_ROOMS);
    let mut attempts = n_rooms * 8;

    while (grid.rooms.len() as i32) < n_rooms && attempts > 0 {
        attempts -= 1;
        let rw = rng.range(4, (grid.width / 5).clamp(4, 10));
        let rh = rng.range(3, (grid.height / 5).clamp(3, 8));
        let rx = rng.range(1, (grid.width - rw - 2).max(1));
        let ry = rng.range(1, (grid.height - rh - 2).max(1));
        let rect = Rect::with_size(rx, ry, rw, rh);

        // 1-tile buffer between rooms.
        let inflated = rect.inflated(1);
        if grid.rooms.iter().any(|r| inflated.intersects(r)) {
            continue;
        }
        grid.rooms.push(rect);
        grid.carve_rect(rect);
    }

    // Degenerate placement: carve one big hall so a game can always start.
    if grid.rooms.is_empty() {
        let hall = Rect::new(2, 2, grid.width - 3, grid.height - 3);
        grid.carve_rect(hall);
        grid.rooms.push(hall);
    }
}

fn connect_rooms(rng: &mut GameRng, grid: &mut Grid) {
    let mut order: Vec<usize> = (0..grid.rooms.len()).collect();
    order.sort_by_key(|&i| {
        let c = grid.rooms[i].center();
        (c.x, c.y)
    });

    for pair in order.windows(2) {
        let a = grid.rooms[pair[0]].center();
        let b = grid.rooms[pair[1]].center();
        let path = l_corridor(rng, a, b);
        carve_corridor(rng, grid, &path);
    }
}

/// Cells of an L-shaped corridor between two points, bend order randomized.
fn l_corridor(rng: &mut GameRng, a: Pos, b: Pos) -> Vec<Pos> {
    let mut path = Vec::new();
    if rng.one_in(2) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            path.push(Pos::new(x, a.y));
        }
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            path.push(Pos::new(b.x, y));
        }
    } else {
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            path.push(Pos::new(a.x, y));
        }
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            path.push(Pos::new(x, b.y));
        }
    }
    path
}

fn carve_corridor(rng: &mut GameRng, grid: &mut Grid, path: &[Pos]) {
    let mut prev_room: Option<Option<usize>> = None;
    for &pos in path {
        if !grid.in_interior(pos) {
            prev_room = None;
            continue;
        }
        grid.carve(pos);

        // Occasionally widen sideways so corridors are not all one tile.
        if rng.one_in(4) {
            for dx in [1, -1] {
                let side = pos.step(dx, 0);
                if grid.in_interior(side) {
                    grid.carve(side);
                }
            }
        }

        let here_room = grid.rooms.iter().position(|r| r.contains(pos));
        if let (Some(idx), Some(prev)) = (here_room, prev_room) {
            // Crossed from outside (or from another room) into this room.
            if prev != Some(idx) {
                grid.place_door(pos);
            }
        }
        prev_room = Some(here_room);
    }
}

fn lock_some_doors(rng: &mut GameRng, grid: &mut Grid) {
    let mut positions: Vec<Pos> = grid.doors.keys().copied().collect();
    if positions.is_empty() {
        return;
    }
    positions.sort_by_key(|p| (p.y, p.x));
    rng.shuffle(&mut positions);

    let locked = rng.range(0, positions.len().min(2) as i32);
    for pos in positions.into_iter().take(locked as usize) {
        if let Some(door) = grid.door_at_mut(pos) {
            door.lock();
        }
    }
}
