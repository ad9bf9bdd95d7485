//! Battle participants
//!
//! One shape for both sides. A combatant is created from a template when it
//! joins a battle and only ever loses health afterwards.

use serde::{Deserialize, Serialize};

use crate::data::MemberTemplate;

/// Battle-unique combatant handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub u32);

/// The two opposing sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// Player-controlled
    Friendly,
    /// AI-controlled
    Hostile,
}

impl Party {
    pub fn opponent(self) -> Party {
        match self {
            Party::Friendly => Party::Hostile,
            Party::Hostile => Party::Friendly,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Party::Friendly => "Friendly",
            Party::Hostile => "Hostile",
        }
    }
}

/// A participant in a battle
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    id: CombatantId,
    name: String,
    party: Party,
    health: i32,
}

impl Combatant {
    pub fn new(id: CombatantId, party: Party, name: impl Into<String>, health: i32) -> Self {
        Self {
            id,
            name: name.into(),
            party,
            health,
        }
    }

    /// Create a fresh combatant from a template
    pub fn from_template(id: CombatantId, party: Party, template: &MemberTemplate) -> Self {
        Self::new(id, party, template.name.clone(), template.base_health)
    }

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn party(&self) -> Party {
        self.party
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    /// Subtract damage. Health may go negative; negative amounts do nothing.
    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount.max(0);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }
}
