//! Action registry
//!
//! Holds what each active player-party combatant chose for the current
//! selection phase.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::{ActionId, BattleConfig};

use super::combatant::CombatantId;
use super::roster::Roster;

/// A combatant's decision for the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Choice {
    /// Nothing picked yet
    #[default]
    Undecided,
    /// Skip the turn
    Pass,
    /// Use an action from the player action table
    Use(ActionId),
}

/// Chosen action plus its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub choice: Choice,
    pub target: Option<CombatantId>,
}

impl Selection {
    /// Whether the choice still needs a target picked
    pub fn needs_target(&self, config: &BattleConfig) -> bool {
        match self.choice {
            Choice::Use(id) => config
                .friendly_action(id)
                .map_or(false, |def| def.requires_target),
            Choice::Pass | Choice::Undecided => false,
        }
    }

    /// Decided, and targeting a live opponent if the action needs one
    pub fn is_complete(&self, config: &BattleConfig, opponents: &Roster) -> bool {
        if self.choice == Choice::Undecided {
            return false;
        }
        if !self.needs_target(config) {
            return true;
        }
        self.target
            .and_then(|id| opponents.get(id))
            .map_or(false, |c| c.is_alive())
    }
}

/// Selections for every active player-party combatant
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    selections: HashMap<CombatantId, Selection>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything and open an undecided slot for each active actor
    pub fn reset(&mut self, actors: &Roster) {
        self.selections.clear();
        self.extend(actors);
    }

    /// Open undecided slots for actors that don't have one yet
    pub fn extend(&mut self, actors: &Roster) {
        for actor in actors.active() {
            self.selections.entry(actor.id()).or_default();
        }
    }

    pub fn get(&self, id: CombatantId) -> Option<&Selection> {
        self.selections.get(&id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Selection> {
        self.selections.get_mut(&id)
    }

    /// True if every active actor has a slot
    pub fn covers(&self, actors: &Roster) -> bool {
        actors.active().iter().all(|c| self.selections.contains_key(&c.id()))
    }

    /// True if every active actor has a complete selection
    pub fn all_complete(&self, actors: &Roster, opponents: &Roster, config: &BattleConfig) -> bool {
        actors.active().iter().all(|c| {
            self.get(c.id())
                .map_or(false, |s| s.is_complete(config, opponents))
        })
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}
