//! Per-party rosters
//!
//! Active combatants can act and be targeted. New arrivals wait in
//! `pending` until the battle merges them at a safe point, so a resolution
//! sweep never sees the roster grow under it.

use serde::Serialize;

use crate::data::MemberTemplate;

use super::combatant::{Combatant, CombatantId, Party};

/// Health readout for one combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberStatus {
    pub id: CombatantId,
    pub name: String,
    pub health: i32,
}

/// Ordered active and pending combatants for one party
#[derive(Debug, Clone)]
pub struct Roster {
    party: Party,
    capacity: usize,
    active: Vec<Combatant>,
    pending: Vec<Combatant>,
}

impl Roster {
    pub fn new(party: Party, capacity: usize) -> Self {
        Self {
            party,
            capacity,
            active: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn party(&self) -> Party {
        self.party
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn active(&self) -> &[Combatant] {
        &self.active
    }

    pub fn pending(&self) -> &[Combatant] {
        &self.pending
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Active plus pending
    pub fn total_len(&self) -> usize {
        self.active.len() + self.pending.len()
    }

    pub fn has_room(&self) -> bool {
        self.total_len() < self.capacity
    }

    /// True when nobody is active or waiting to join
    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Look up an active combatant
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.active.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.active.iter_mut().find(|c| c.id() == id)
    }

    /// Add a combatant straight to the active list (battle setup only).
    /// Returns false when the roster is full or the template is already dead.
    pub fn add_active(&mut self, id: CombatantId, template: &MemberTemplate) -> bool {
        if !self.admits(template) {
            return false;
        }
        self.active.push(Combatant::from_template(id, self.party, template));
        true
    }

    /// Queue a new arrival. Returns false when the roster is full or the
    /// template is already dead.
    pub fn request_join(&mut self, id: CombatantId, template: &MemberTemplate) -> bool {
        if !self.admits(template) {
            return false;
        }
        self.pending.push(Combatant::from_template(id, self.party, template));
        true
    }

    fn admits(&self, template: &MemberTemplate) -> bool {
        if template.base_health <= 0 {
            log::debug!(
                "{} has {} base health, not admitted",
                template.name,
                template.base_health
            );
            return false;
        }
        self.has_room()
    }

    /// Move all pending arrivals to the end of the active list.
    /// Returns the ids that became active.
    pub fn merge_pending(&mut self) -> Vec<CombatantId> {
        let merged: Vec<CombatantId> = self.pending.iter().map(|c| c.id()).collect();
        self.active.append(&mut self.pending);
        merged
    }

    /// Remove every dead active combatant in one pass.
    /// Returns the removed ids in roster order.
    pub fn sweep_dead(&mut self) -> Vec<CombatantId> {
        let dead: Vec<CombatantId> = self
            .active
            .iter()
            .filter(|c| c.is_dead())
            .map(|c| c.id())
            .collect();
        if !dead.is_empty() {
            self.active.retain(|c| c.is_alive());
        }
        dead
    }

    /// Health of every active combatant, in roster order
    pub fn status(&self) -> Vec<MemberStatus> {
        self.active
            .iter()
            .map(|c| MemberStatus {
                id: c.id(),
                name: c.name().to_string(),
                health: c.health(),
            })
            .collect()
    }
}
