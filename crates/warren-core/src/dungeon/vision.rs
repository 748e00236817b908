//! Field-of-view computation: raycast visibility with monotonic explore.

use super::Grid;
use crate::pos::Pos;

impl Grid {
    /// Recompute visibility from `origin` out to `radius` (circular,
    /// Euclidean-squared test). Every tile that becomes visible is also
    /// marked explored; explored never reverts.
    pub fn update_visibility(&mut self, origin: Pos, radius: i32) {
        for col in &mut self.visible {
            for cell in col {
                *cell = false;
            }
        }

        if !self.in_bounds(origin) {
            return;
        }
        self.visible[origin.x as usize][origin.y as usize] = true;
        self.explored[origin.x as usize][origin.y as usize] = true;

        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let target = origin.step(dx, dy);
                if self.in_bounds(target) && self.has_line_of_sight(origin, target) {
                    self.visible[target.x as usize][target.y as usize] = true;
                    self.explored[target.x as usize][target.y as usize] = true;
                }
            }
        }
    }

    /// Line of sight from `from` to `to` along an integer Bresenham line.
    /// Walls and closed doors block; a blocking cell is itself visible,
    /// but nothing beyond it is.
    pub fn has_line_of_sight(&self, from: Pos, to: Pos) -> bool {
        let mut x = from.x;
        let mut y = from.y;

        let dx = (to.x - x).abs();
        let dy = -(to.y - y).abs();
        let sx = if x < to.x { 1 } else { -1 };
        let sy = if y < to.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x != from.x || y != from.y {
                let here = Pos::new(x, y);
                if self.blocks_sight(here) {
                    return x == to.x && y == to.y;
                }
            }

            if x == to.x && y == to.y {
                return true;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Radius-bounded line of sight, as used for enemy perception.
    pub fn has_los_within(&self, from: Pos, to: Pos, radius: i32) -> bool {
        from.distance_sq(to) <= radius * radius && self.has_line_of_sight(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::super::MapKind;
    use super::*;

    fn open_room(w: i32, h: i32) -> Grid {
        let mut grid = Grid::new(w, h, MapKind::Caves);
        for x in 1..w - 1 {
            for y in 1..h - 1 {
                grid.carve(Pos::new(x, y));
            }
        }
        grid
    }

    #[test]
    fn test_radius_bounds_visibility() {
        let mut grid = open_room(30, 30);
        grid.update_visibility(Pos::new(15, 15), 5);
        assert!(grid.is_visible(Pos::new(15, 15)));
        assert!(grid.is_visible(Pos::new(20, 15)));
        // Strictly beyond the circle.
        assert!(!grid.is_visible(Pos::new(21, 15)));
        assert!(!grid.is_visible(Pos::new(19, 19)));
    }

    #[test]
    fn test_wall_occludes_but_is_itself_visible() {
        let mut grid = open_room(20, 10);
        // Vertical wall segment at x=10.
        for y in 1..9 {
            grid.tiles[10][y] = super::super::Tile::wall();
        }
        grid.update_visibility(Pos::new(5, 5), 8);
        assert!(grid.is_visible(Pos::new(10, 5)));
        assert!(!grid.is_visible(Pos::new(11, 5)));
        assert!(!grid.is_visible(Pos::new(12, 5)));
    }

    #[test]
    fn test_closed_door_occludes_open_door_does_not() {
        let mut grid = open_room(20, 10);
        let door_pos = Pos::new(10, 5);
        grid.place_door(door_pos);

        grid.update_visibility(Pos::new(5, 5), 8);
        assert!(grid.is_visible(door_pos));
        assert!(!grid.is_visible(Pos::new(12, 5)));

        grid.door_at_mut(door_pos).unwrap().open();
        grid.update_visibility(Pos::new(5, 5), 8);
        assert!(grid.is_visible(Pos::new(12, 5)));
    }

    #[test]
    fn test_explored_is_monotonic() {
        let mut grid = open_room(30, 10);
        grid.update_visibility(Pos::new(5, 5), 5);
        assert!(grid.is_explored(Pos::new(8, 5)));

        grid.update_visibility(Pos::new(25, 5), 5);
        assert!(!grid.is_visible(Pos::new(8, 5)));
        assert!(grid.is_explored(Pos::new(8, 5)));
        assert!(grid.is_explored(Pos::new(25, 5)));
    }
}
