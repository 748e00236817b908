//! The map grid: tiles, doors, rooms, explored/visible state.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{Door, MapKind, Rect, Tile};
use crate::pos::Pos;

/// Serde helper for the doors map. JSON wants string keys, so the map is
/// stored as a plain list (each door carries its own position).
mod doors_serde {
    use super::*;

    pub fn serialize<S>(map: &HashMap<Pos, Door>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut doors: Vec<&Door> = map.values().collect();
        doors.sort_by_key(|d| (d.pos.y, d.pos.x));
        serde::Serialize::serialize(&doors, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HashMap<Pos, Door>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let doors: Vec<Door> = serde::Deserialize::deserialize(deserializer)?;
        Ok(doors.into_iter().map(|d| (d.pos, d)).collect())
    }
}

/// A generated map. Rebuilt whole at new-game time, then mutated in place
/// (doors opening, explored flags accruing) for the life of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    /// Terrain, indexed `[x][y]`.
    pub tiles: Vec<Vec<Tile>>,
    /// Tiles the player has ever seen. Monotonic: never reset mid-run.
    pub explored: Vec<Vec<bool>>,
    /// Tiles in the current field of view. Recomputed every turn, so it
    /// is not persisted.
    #[serde(skip)]
    pub visible: Vec<Vec<bool>>,
    pub kind: MapKind,
    /// Room rectangles (rooms generator only).
    pub rooms: Vec<Rect>,
    #[serde(with = "doors_serde")]
    pub doors: HashMap<Pos, Door>,
}

impl Grid {
    /// A solid-wall grid ready for carving.
    pub fn new(width: i32, height: i32, kind: MapKind) -> Self {
        let w = width.max(1) as usize;
        let h = height.max(1) as usize;
        Self {
            width: w as i32,
            height: h as i32,
            tiles: vec![vec![Tile::wall(); h]; w],
            explored: vec![vec![false; h]; w],
            visible: vec![vec![false; h]; w],
            kind,
            rooms: Vec::new(),
            doors: HashMap::new(),
        }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Strictly inside the outer wall ring.
    pub fn in_interior(&self, pos: Pos) -> bool {
        pos.x >= 1 && pos.x < self.width - 1 && pos.y >= 1 && pos.y < self.height - 1
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.tiles[pos.x as usize][pos.y as usize].walkable
    }

    pub fn carve(&mut self, pos: Pos) {
        if self.in_bounds(pos) {
            self.tiles[pos.x as usize][pos.y as usize] = Tile::floor();
        }
    }

    /// Carve a rectangle, clipped to the interior.
    pub fn carve_rect(&mut self, rect: Rect) {
        for y in rect.y1.max(1)..=rect.y2.min(self.height - 2) {
            for x in rect.x1.max(1)..=rect.x2.min(self.width - 2) {
                self.carve(Pos::new(x, y));
            }
        }
    }

    pub fn door_at(&self, pos: Pos) -> Option<&Door> {
        self.doors.get(&pos)
    }

    pub fn door_at_mut(&mut self, pos: Pos) -> Option<&mut Door> {
        self.doors.get_mut(&pos)
    }

    /// Place a closed door. No-op on walls or existing doors: the corridor
    /// must have been carved first.
    pub fn place_door(&mut self, pos: Pos) {
        if !self.is_walkable(pos) || self.doors.contains_key(&pos) {
            return;
        }
        self.doors.insert(pos, Door::closed(pos));
    }

    /// Whether a cell blocks line of sight: walls do, closed doors do,
    /// open doors and floor do not. Out of bounds blocks.
    pub fn blocks_sight(&self, pos: Pos) -> bool {
        if !self.in_bounds(pos) {
            return true;
        }
        if !self.tiles[pos.x as usize][pos.y as usize].walkable {
            return true;
        }
        match self.doors.get(&pos) {
            Some(door) => !door.is_open(),
            None => false,
        }
    }

    pub fn is_explored(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.explored[pos.x as usize][pos.y as usize]
    }

    pub fn is_visible(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.visible[pos.x as usize][pos.y as usize]
    }

    pub fn walkable_count(&self) -> usize {
        self.tiles
            .iter()
            .flat_map(|col| col.iter())
            .filter(|t| t.walkable)
            .count()
    }

    /// Flood-fill over walkable tiles (4-directional) from `start`.
    /// Doors count as traversable regardless of state: connectivity is a
    /// property of the carved layout, not of what is currently locked.
    pub fn flood_fill_reachable(&self, start: Pos) -> Vec<Vec<bool>> {
        let mut reachable = vec![vec![false; self.height as usize]; self.width as usize];
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            if !self.is_walkable(pos) || reachable[pos.x as usize][pos.y as usize] {
                continue;
            }
            reachable[pos.x as usize][pos.y as usize] = true;
            for next in pos.neighbors4() {
                if self.is_walkable(next) && !reachable[next.x as usize][next.y as usize] {
                    stack.push(next);
                }
            }
        }
        reachable
    }

    /// Revert to wall every floor tile not reachable from `start`. This is
    /// the connectivity guarantee both generators rely on.
    pub fn retain_reachable(&mut self, start: Pos) {
        let reachable = self.flood_fill_reachable(start);
        for x in 0..self.width as usize {
            for y in 0..self.height as usize {
                if self.tiles[x][y].walkable && !reachable[x][y] {
                    self.tiles[x][y] = Tile::wall();
                }
            }
        }
        let tiles = &self.tiles;
        self.doors
            .retain(|pos, _| tiles[pos.x as usize][pos.y as usize].walkable);
    }

    /// Restore transient state after deserialization (visibility is
    /// skipped by serde and must be re-sized before the next FOV pass).
    pub fn reset_visible(&mut self) {
        self.visible = vec![vec![false; self.height as usize]; self.width as usize];
    }
}
