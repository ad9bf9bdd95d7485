//! Battle configuration
//!
//! Capacities, the selection deadline and the stat tables a battle runs on.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::templates::{
    default_friendly_actions, default_friendly_templates, default_hostile_actions,
    default_hostile_templates, ActionDef, ActionId, MemberTemplate,
};

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything a battle needs to know about its rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// How long players get to pick their actions, in seconds
    pub selection_time_secs: f32,
    /// Max player-party combatants (active + pending)
    pub friendly_capacity: usize,
    /// Max AI-party combatants (active + pending)
    pub hostile_capacity: usize,
    /// Player hit rolls at or above this always miss
    pub fumble_ceiling: f64,
    /// Player actions; list order is resolution order
    pub friendly_actions: Vec<ActionDef>,
    /// AI attacks
    pub hostile_actions: Vec<ActionDef>,
    pub friendly_templates: Vec<MemberTemplate>,
    pub hostile_templates: Vec<MemberTemplate>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            selection_time_secs: 10.0,
            friendly_capacity: 4,
            hostile_capacity: 4,
            fumble_ceiling: 0.95,
            friendly_actions: default_friendly_actions(),
            hostile_actions: default_hostile_actions(),
            friendly_templates: default_friendly_templates(),
            hostile_templates: default_hostile_templates(),
        }
    }
}

impl BattleConfig {
    /// One combatant per side
    pub fn minimal() -> Self {
        Self {
            friendly_capacity: 1,
            hostile_capacity: 1,
            ..Self::default()
        }
    }

    /// Selection deadline as a duration. Values too large to represent
    /// saturate to `Duration::MAX`.
    pub fn selection_time(&self) -> Duration {
        Duration::try_from_secs_f32(self.selection_time_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn friendly_action(&self, id: ActionId) -> Option<&ActionDef> {
        self.friendly_actions.get(id.0)
    }

    pub fn hostile_action(&self, id: ActionId) -> Option<&ActionDef> {
        self.hostile_actions.get(id.0)
    }

    /// Look up a player action by its string ID
    pub fn friendly_action_id(&self, id: &str) -> Option<ActionId> {
        self.friendly_actions.iter().position(|a| a.id == id).map(ActionId)
    }

    /// Player actions in the order they resolve
    pub fn resolution_order(&self) -> impl Iterator<Item = (ActionId, &ActionDef)> {
        self.friendly_actions
            .iter()
            .enumerate()
            .map(|(i, def)| (ActionId(i), def))
    }

    pub fn friendly_template(&self, id: &str) -> Option<&MemberTemplate> {
        self.friendly_templates.iter().find(|t| t.id == id)
    }

    pub fn hostile_template(&self, id: &str) -> Option<&MemberTemplate> {
        self.hostile_templates.iter().find(|t| t.id == id)
    }

    /// Check the tables for values a battle can't run on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secs = self.selection_time_secs;
        if !secs.is_finite() || secs <= 0.0 || Duration::try_from_secs_f32(secs).is_err() {
            return Err(ConfigError::Invalid(format!(
                "selection_time_secs must be a positive, finite number, got {}",
                self.selection_time_secs
            )));
        }
        if self.friendly_capacity == 0 || self.hostile_capacity == 0 {
            return Err(ConfigError::Invalid("party capacity must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.fumble_ceiling) {
            return Err(ConfigError::Invalid(format!(
                "fumble_ceiling must be within [0, 1], got {}",
                self.fumble_ceiling
            )));
        }
        if self.hostile_actions.is_empty() {
            return Err(ConfigError::Invalid("hostile_actions is empty".into()));
        }
        check_actions("friendly_actions", &self.friendly_actions)?;
        check_actions("hostile_actions", &self.hostile_actions)?;
        check_templates("friendly_templates", &self.friendly_templates)?;
        check_templates("hostile_templates", &self.hostile_templates)?;
        Ok(())
    }
}

fn check_actions(table: &str, actions: &[ActionDef]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for action in actions {
        if !seen.insert(action.id.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "{}: duplicate action id '{}'",
                table, action.id
            )));
        }
        if !(0.0..=1.0).contains(&action.hit_chance) {
            return Err(ConfigError::Invalid(format!(
                "{}: '{}' hit_chance {} outside [0, 1]",
                table, action.id, action.hit_chance
            )));
        }
        if action.damage < 0 {
            return Err(ConfigError::Invalid(format!(
                "{}: '{}' damage {} is negative",
                table, action.id, action.damage
            )));
        }
    }
    Ok(())
}

fn check_templates(table: &str, templates: &[MemberTemplate]) -> Result<(), ConfigError> {
    match templates.iter().find(|t| t.base_health <= 0) {
        Some(t) => Err(ConfigError::Invalid(format!(
            "{}: '{}' base_health {} must be positive",
            table, t.id, t.base_health
        ))),
        None => Ok(()),
    }
}
