//! The decision policy.
//!
//! One call per tick; first applicable rule wins:
//! flee, dodge a telegraphed shot, stay out of ranged lines, take a near
//! exit, attack, loot, chase, take a far exit, explore, wait.
//!
//! The planner is read-only and honest: it consults only tiles the player
//! has seen (visible or explored) plus the inventory, never raw map data.

use hashbrown::HashSet;

use warren_core::action::Direction;
use warren_core::effects::EffectKind;
use warren_core::items::ItemKind;
use warren_core::monster::Role;
use warren_core::{ENEMY_SIGHT_RANGE, GamePhase, GameState, Pos};

use crate::pathfind::bfs_path;

/// How much of a planned path is kept for display.
pub const PATH_PREVIEW_LEN: usize = 6;

/// What the bot wants to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Wait,
}

/// One planned action, with the reasoning surfaced for the log/HUD.
#[derive(Debug, Clone)]
pub struct Decision {
    pub action: Action,
    /// Next few tiles of the planned path, for rendering.
    pub preview: Vec<Pos>,
    /// Short human-readable rationale; changes are logged sparsely.
    pub reason: String,
    /// This move ducks a telegraphed ranged shot (tracked as a metric).
    pub dodged_shot: bool,
}

impl Decision {
    fn wait(reason: impl Into<String>) -> Self {
        Self {
            action: Action::Wait,
            preview: Vec::new(),
            reason: reason.into(),
            dodged_shot: false,
        }
    }

    fn step(from: Pos, to: Pos, preview: Vec<Pos>, reason: impl Into<String>) -> Self {
        let action = Direction::from_delta(to.x - from.x, to.y - from.y)
            .map(Action::Move)
            .unwrap_or(Action::Wait);
        Self {
            action,
            preview,
            reason: reason.into(),
            dodged_shot: false,
        }
    }

    fn along(path: &[Pos], reason: impl Into<String>) -> Self {
        let preview = path[1..path.len().min(1 + PATH_PREVIEW_LEN)].to_vec();
        Self::step(path[0], path[1], preview, reason)
    }
}

/// Plan one action from the currently visible state.
pub fn choose_action(state: &GameState) -> Decision {
    if state.phase != GamePhase::Playing || !state.player.is_alive() {
        return Decision::wait("idle");
    }
    let me = state.player.pos;

    // 1) Flee when the fight is going badly.
    if should_flee(state) {
        let threats = visible_enemies(state);
        if !threats.is_empty() {
            let mut best: Option<(Pos, i32)> = None;
            for candidate in step_candidates(state, me) {
                let score = threats
                    .iter()
                    .map(|&i| state.enemies[i].pos.manhattan(candidate))
                    .min()
                    .unwrap_or(0);
                if best.is_none_or(|(_, s)| score > s) {
                    best = Some((candidate, score));
                }
            }
            match best {
                Some((to, _)) if to != me => {
                    return Decision::step(me, to, Vec::new(), "flee (low HP)");
                }
                _ => return Decision::wait("hold (corner)"),
            }
        }
    }

    // 2) An archer has a bead on us: break the line or rush to melee.
    let aiming = aiming_archers(state);
    if !aiming.is_empty() {
        let escape = step_candidates(state, me).into_iter().find(|&p| {
            breaks_every_line(state, p, &aiming)
                || aiming.iter().any(|&i| state.enemies[i].pos.manhattan(p) == 1)
        });
        if let Some(to) = escape {
            if to != me {
                let mut decision = Decision::step(me, to, Vec::new(), "avoid aimed shot");
                decision.dodged_shot = true;
                return decision;
            }
        }
    }

    // 3) Do not loiter in a ranged lane when a safe sidestep exists.
    let archers = visible_archers(state);
    if !archers.is_empty() && in_ranged_lane(state, me, &archers) {
        for candidate in step_candidates(state, me) {
            if !in_ranged_lane(state, candidate, &archers) {
                if candidate == me {
                    break;
                }
                return Decision::step(me, candidate, Vec::new(), "avoid ranged line");
            }
        }
    }

    // 4) A close, visible exit beats fighting, if we are fit to run.
    if let Some(exit) = visible_exit(state) {
        let healthy = state.player.hp >= (state.player.max_hp * 3 / 10).max(1);
        if healthy && exit.manhattan(me) <= 6 && !dangerous_adjacent(state) {
            if let Some(path) = path_to(state, &[exit]) {
                return Decision::along(&path, format!("exit ({} steps)", path.len() - 1));
            }
        }
    }

    // 5) Attack an adjacent enemy: casters first, then the frailest.
    let mut adjacent: Vec<usize> = visible_enemies(state)
        .into_iter()
        .filter(|&i| state.enemies[i].pos.manhattan(me) == 1)
        .collect();
    if !adjacent.is_empty() {
        adjacent.sort_by_key(|&i| {
            (
                state.enemies[i].role.threat_priority(),
                state.enemies[i].hp,
                i,
            )
        });
        let target = &state.enemies[adjacent[0]];
        return Decision::step(
            me,
            target.pos,
            Vec::new(),
            format!("attack {}", target.name()),
        );
    }

    // 6) Loot a visible potion.
    let potions: Vec<Pos> = state
        .items
        .iter()
        .filter(|item| item.kind == ItemKind::Potion && state.grid.is_visible(item.pos))
        .map(|item| item.pos)
        .collect();
    if let Some(path) = path_to(state, &potions) {
        return Decision::along(&path, format!("loot ({} steps)", path.len() - 1));
    }

    // 7) Chase the highest-priority visible enemy; fall back to any.
    let mut visible: Vec<usize> = visible_enemies(state);
    if !visible.is_empty() {
        visible.sort_by_key(|&i| {
            (
                state.enemies[i].role.threat_priority(),
                state.enemies[i].pos.manhattan(me),
                i,
            )
        });
        let primary = &state.enemies[visible[0]];
        if let Some(path) = path_to(state, &[primary.pos]) {
            return Decision::along(
                &path,
                format!("hunt {} ({} steps)", primary.name(), path.len() - 1),
            );
        }
        let all: Vec<Pos> = visible.iter().map(|&i| state.enemies[i].pos).collect();
        if let Some(path) = path_to(state, &all) {
            let name = path
                .last()
                .and_then(|&p| state.entity_at(p))
                .map(|e| e.name())
                .unwrap_or("enemy");
            return Decision::along(&path, format!("hunt {} ({} steps)", name, path.len() - 1));
        }
    }

    // 8) A far exit is still an exit.
    if let Some(exit) = visible_exit(state) {
        if let Some(path) = path_to(state, &[exit]) {
            return Decision::along(&path, format!("exit ({} steps)", path.len() - 1));
        }
    }

    // 9) Explore toward the nearest frontier.
    let frontier = frontier_targets(state);
    if let Some(path) = path_to(state, &frontier) {
        return Decision::along(&path, format!("explore ({} steps)", path.len() - 1));
    }

    // 10) Nothing better to do.
    Decision::wait("wait")
}

// ---- state queries ---------------------------------------------------

/// Indices of living enemies on currently visible tiles.
fn visible_enemies(state: &GameState) -> Vec<usize> {
    state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_alive() && state.grid.is_visible(e.pos))
        .map(|(i, _)| i)
        .collect()
}

fn visible_archers(state: &GameState) -> Vec<usize> {
    visible_enemies(state)
        .into_iter()
        .filter(|&i| state.enemies[i].role == Role::Archer)
        .collect()
}

/// Visible archers with an active aim and a live line on the player.
fn aiming_archers(state: &GameState) -> Vec<usize> {
    let me = state.player.pos;
    visible_archers(state)
        .into_iter()
        .filter(|&i| {
            let archer = &state.enemies[i];
            archer.effects.has(EffectKind::Aim) && lane_covers(state, archer.pos, me)
        })
        .collect()
}

/// A straight, unobstructed archer lane onto `pos` at shooting range.
fn lane_covers(state: &GameState, archer: Pos, pos: Pos) -> bool {
    archer.aligned_with(pos)
        && archer.chebyshev(pos) >= 2
        && state.grid.has_los_within(archer, pos, ENEMY_SIGHT_RANGE)
}

fn breaks_every_line(state: &GameState, pos: Pos, archers: &[usize]) -> bool {
    archers
        .iter()
        .all(|&i| !lane_covers(state, state.enemies[i].pos, pos))
}

fn in_ranged_lane(state: &GameState, pos: Pos, archers: &[usize]) -> bool {
    archers
        .iter()
        .any(|&i| lane_covers(state, state.enemies[i].pos, pos))
}

/// Steps the bot may legally take this tick: free passable neighbors,
/// plus standing still (always last, so movement wins ties).
fn step_candidates(state: &GameState, from: Pos) -> Vec<Pos> {
    let mut out: Vec<Pos> = from
        .neighbors4()
        .into_iter()
        .filter(|&p| passable(state, p) && !state.is_occupied(p))
        .collect();
    out.push(from);
    out
}

/// Tiles the bot may traverse: seen floor, with closed doors only when
/// they can actually be opened (locked ones need a key in hand).
fn passable(state: &GameState, pos: Pos) -> bool {
    if !state.grid.is_walkable(pos) {
        return false;
    }
    if !(state.grid.is_visible(pos) || state.grid.is_explored(pos)) {
        return false;
    }
    match state.grid.door_at(pos) {
        Some(door) if !door.is_open() => !door.is_locked() || state.inventory.has_key(),
        _ => true,
    }
}

fn path_to(state: &GameState, goals: &[Pos]) -> Option<Vec<Pos>> {
    let goal_set: HashSet<Pos> = goals.iter().copied().collect();
    let path = bfs_path(
        state.player.pos,
        &goal_set,
        |p| passable(state, p),
        |p| state.is_occupied(p),
    )?;
    (path.len() >= 2).then_some(path)
}

fn visible_exit(state: &GameState) -> Option<Pos> {
    state.exit.filter(|&e| state.grid.is_visible(e))
}

/// Flee when hurt (harder threshold while hexed) or when surrounded by
/// enough combined muscle.
fn should_flee(state: &GameState) -> bool {
    let player = &state.player;
    if player.hp <= (player.max_hp * 2 / 5).max(1) {
        return true;
    }
    if player.effects.has(EffectKind::Hex) && player.hp <= (player.max_hp / 2).max(1) {
        return true;
    }
    let mut near = 0;
    let mut combined_power = 0;
    for i in visible_enemies(state) {
        let enemy = &state.enemies[i];
        if enemy.pos.chebyshev(player.pos) <= 1 {
            near += 1;
            combined_power += enemy.power.max(1);
        }
    }
    near >= 2 && combined_power >= player.hp / 2
}

/// An adjacent visible enemy worth not standing next to.
fn dangerous_adjacent(state: &GameState) -> bool {
    visible_enemies(state).into_iter().any(|i| {
        let enemy = &state.enemies[i];
        enemy.pos.manhattan(state.player.pos) == 1 && (enemy.power >= 4 || enemy.role.is_elite())
    })
}

/// Frontier: seen walkable tiles touching at least one unexplored tile.
fn frontier_targets(state: &GameState) -> Vec<Pos> {
    let mut out = Vec::new();
    for y in 0..state.grid.height {
        for x in 0..state.grid.width {
            let pos = Pos::new(x, y);
            if !state.grid.is_walkable(pos) {
                continue;
            }
            if !(state.grid.is_explored(pos) || state.grid.is_visible(pos)) {
                continue;
            }
            let touches_unknown = pos
                .neighbors4()
                .into_iter()
                .any(|n| state.grid.in_bounds(n) && !state.grid.is_explored(n));
            if touches_unknown {
                out.push(pos);
            }
        }
    }
    out
}
