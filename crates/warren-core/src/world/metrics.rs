//! Aggregate run statistics, for end-of-run reporting only.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::monster::Role;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub kills: u32,
    pub damage_dealt: i64,
    pub damage_taken: i64,
    pub items_used: u32,
    #[serde(default)]
    pub kills_by_role: HashMap<Role, u32>,
    pub times_hexed: u32,
    pub shots_dodged: u32,
}

impl RunMetrics {
    pub fn record_kill(&mut self, role: Role) {
        self.kills += 1;
        *self.kills_by_role.entry(role).or_insert(0) += 1;
    }
}
