//! Message log and the per-turn combat digest.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::consts::LOG_CAPACITY;
use crate::monster::Role;

/// Bounded message history. Old lines fall off the front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageLog {
    lines: Vec<String>,
    capacity: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        if self.lines.len() > self.capacity {
            let excess = self.lines.len() - self.capacity;
            self.lines.drain(..excess);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn tail(&self, n: usize) -> &[String] {
        let start = self.lines.len().saturating_sub(n);
        &self.lines[start..]
    }
}

/// Folds one turn's combat events into at most a few summary lines, so a
/// frenzy of goblin pokes reads as "Goblin x3" instead of three lines.
/// Flushed to the log and discarded at end of turn.
#[derive(Debug, Clone, Default)]
pub struct TurnDigest {
    /// role -> (hits, total damage) against the player
    enemy_hits: Vec<(Role, u32, i32)>,
    /// role -> (hits, total damage, killed one) by the player
    player_hits: Vec<(Role, u32, i32, bool)>,
    kills_by_player: HashMap<Role, u32>,
    effect_notes: Vec<(&'static str, u32)>,
}

const DIGEST_MAX_LINES: usize = 3;

impl TurnDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attack(
        &mut self,
        attacker: Role,
        defender: Role,
        damage: i32,
        killed: bool,
    ) {
        if attacker == Role::Player {
            match self.player_hits.iter_mut().find(|(r, ..)| *r == defender) {
                Some((_, hits, total, k)) => {
                    *hits += 1;
                    *total += damage;
                    *k |= killed;
                }
                None => self.player_hits.push((defender, 1, damage, killed)),
            }
        } else if defender == Role::Player {
            match self.enemy_hits.iter_mut().find(|(r, ..)| *r == attacker) {
                Some((_, hits, total)) => {
                    *hits += 1;
                    *total += damage;
                }
                None => self.enemy_hits.push((attacker, 1, damage)),
            }
        }
    }

    pub fn record_kill(&mut self, attacker: Role, defender: Role) {
        if attacker == Role::Player {
            *self.kills_by_player.entry(defender).or_insert(0) += 1;
        }
    }

    pub fn record_effect(&mut self, name: &'static str) {
        match self.effect_notes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => self.effect_notes.push((name, 1)),
        }
    }

    /// Summary lines, capped.
    pub fn summarize(&self) -> Vec<String> {
        let mut out = Vec::new();
        for &(role, hits, dmg) in &self.enemy_hits {
            out.push(format!("{} x{} -> -{} HP", role.display_name(), hits, dmg));
        }
        for &(role, hits, dmg, killed) in &self.player_hits {
            let suffix = if killed { " (kill)" } else { "" };
            out.push(format!(
                "You -> {} x{}: -{}{}",
                role.display_name(),
                hits,
                dmg,
                suffix
            ));
        }
        if self.kills_by_player.len() > 1 {
            let mut parts: Vec<(Role, u32)> =
                self.kills_by_player.iter().map(|(r, c)| (*r, *c)).collect();
            parts.sort_by_key(|(r, _)| r.threat_priority());
            let joined: Vec<String> = parts
                .iter()
                .map(|(r, c)| format!("{} x{}", r.display_name(), c))
                .collect();
            out.push(format!("You killed: {}", joined.join(", ")));
        }
        if !self.effect_notes.is_empty() {
            let joined: Vec<String> = self
                .effect_notes
                .iter()
                .map(|(name, count)| format!("{name} x{count}"))
                .collect();
            out.push(joined.join(", "));
        }
        out.truncate(DIGEST_MAX_LINES);
        out
    }
}
