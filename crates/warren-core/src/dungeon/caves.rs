//! Organic cave generation: a drunkard's walk with blob widening.

use super::{Grid, MapKind};
use crate::consts::CAVE_FLOOR_FRACTION;
use crate::pos::Pos;
use crate::rng::GameRng;

const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub fn generate(rng: &mut GameRng, width: i32, height: i32) -> Grid {
    let mut grid = Grid::new(width, height, MapKind::Caves);

    let start = Pos::new(grid.width / 2, grid.height / 2);
    let mut walker = start;
    grid.carve(walker);

    let target_floor = ((grid.width * grid.height) as f64 * CAVE_FLOOR_FRACTION) as usize;
    let max_attempts = (grid.width * grid.height * 50) as usize;
    let mut carved = 1usize;
    let mut attempts = 0usize;

    while carved < target_floor && attempts < max_attempts {
        let (dx, dy) = *rng.choose(&DIRECTIONS).unwrap_or(&(1, 0));
        let next = walker.step(dx, dy);
        if grid.in_interior(next) {
            if !grid.is_walkable(next) {
                grid.carve(next);
                carved += 1;
            }
            walker = next;
        }
        attempts += 1;
    }

    scatter_blobs(rng, &mut grid);
    grid.retain_reachable(start);
    grid
}

/// Stamp a handful of 3x3 blobs onto existing floor so the walk's
/// one-tile corridors open up into small chambers.
fn scatter_blobs(rng: &mut GameRng, grid: &mut Grid) {
    let blobs = ((grid.width * grid.height) / 200).max(2);
    for _ in 0..blobs {
        let pos = Pos::new(
            rng.range(2, grid.width - 3),
            rng.range(2, grid.height - 3),
        );
        if !grid.is_walkable(pos) {
            continue;
        }
        for dx in -1..=1 {
            for dy in -1..=1 {
                let cell = pos.step(dx, dy);
                if grid.in_interior(cell) {
                    grid.carve(cell);
                }
            }
        }
    }
}
