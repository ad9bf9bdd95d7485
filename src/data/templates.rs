//! Action and party-member tables
//!
//! Static stat data for battles. Defaults are hardcoded and can be
//! overridden by a RON file (see [`super::loader`]).

use serde::{Deserialize, Serialize};

/// Index of an action within its party's action table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(pub usize);

/// A single attack an actor can use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDef {
    /// Unique ID within the table
    pub id: String,
    /// Display name
    pub name: String,
    /// Health removed from the target on a hit
    pub damage: i32,
    /// Chance of hitting, from 0 to 1
    pub hit_chance: f64,
    /// Whether the actor must pick a target before the action is complete
    #[serde(default = "default_requires_target")]
    pub requires_target: bool,
}

fn default_requires_target() -> bool {
    true
}

impl ActionDef {
    pub fn new(id: &str, name: &str, damage: i32, hit_chance: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            damage,
            hit_chance,
            requires_target: true,
        }
    }

    /// Mark the action as untargeted
    pub fn untargeted(mut self) -> Self {
        self.requires_target = false;
        self
    }
}

/// Template a combatant is created from when it joins a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberTemplate {
    /// Unique template ID for reference
    pub id: String,
    /// Display name
    pub name: String,
    /// Starting health
    pub base_health: i32,
}

impl MemberTemplate {
    pub fn new(id: &str, name: &str, base_health: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            base_health,
        }
    }
}

/// Player-party actions, in resolution order
pub fn default_friendly_actions() -> Vec<ActionDef> {
    vec![
        ActionDef::new("spray", "Spray", 4, 0.9),
        ActionDef::new("hurl", "Hurl", 6, 0.75),
    ]
}

/// AI-party attacks
pub fn default_hostile_actions() -> Vec<ActionDef> {
    vec![
        ActionDef::new("jab", "Jab", 2, 0.85),
        ActionDef::new("slam", "Slam", 3, 0.6),
    ]
}

pub fn default_friendly_templates() -> Vec<MemberTemplate> {
    vec![MemberTemplate::new("recruit", "Recruit", 15)]
}

pub fn default_hostile_templates() -> Vec<MemberTemplate> {
    vec![MemberTemplate::new("drone", "Drone", 12)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let friendly = default_friendly_actions();
        assert_eq!(friendly.len(), 2);
        assert!(friendly.iter().all(|a| a.requires_target));
        assert_eq!(friendly.iter().map(|a| a.damage).max(), Some(6));

        assert_eq!(default_friendly_templates()[0].base_health, 15);
        assert_eq!(default_hostile_templates()[0].base_health, 12);
    }

    #[test]
    fn test_requires_target_defaults_on() {
        let def: ActionDef =
            ron::from_str(r#"(id: "poke", name: "Poke", damage: 1, hit_chance: 0.5)"#).unwrap();
        assert!(def.requires_target);
        assert!(!def.untargeted().requires_target);
    }
}
