//! Grid BFS to a goal set.

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use warren_core::Pos;

/// Shortest 4-directional path from `start` to any tile in `goals`,
/// inclusive of both endpoints. `passable` gates every tile; `occupied`
/// tiles are skipped unless they are a goal (so a path may end on an
/// enemy to set up an attack). Ties break by discovery order, which is
/// deterministic: neighbors expand in fixed E/W/S/N order.
pub fn bfs_path(
    start: Pos,
    goals: &HashSet<Pos>,
    mut passable: impl FnMut(Pos) -> bool,
    mut occupied: impl FnMut(Pos) -> bool,
) -> Option<Vec<Pos>> {
    if goals.is_empty() {
        return None;
    }

    let mut came_from: HashMap<Pos, Pos> = HashMap::new();
    let mut seen: HashSet<Pos> = HashSet::new();
    let mut queue: VecDeque<Pos> = VecDeque::new();
    seen.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if goals.contains(&current) {
            let mut path = vec![current];
            let mut at = current;
            while let Some(&prev) = came_from.get(&at) {
                path.push(prev);
                at = prev;
            }
            path.reverse();
            return Some(path);
        }
        for next in current.neighbors4() {
            if seen.contains(&next) || !passable(next) {
                continue;
            }
            if occupied(next) && !goals.contains(&next) {
                continue;
            }
            seen.insert(next);
            came_from.insert(next, current);
            queue.push_back(next);
        }
    }
    None
}
