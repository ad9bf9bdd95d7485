//! How each side picks and lands its attacks
//!
//! Player-party combatants act on the choices recorded in the action
//! registry. AI-party combatants roll for their attack and target.

use crate::data::{ActionId, BattleConfig};

use super::actions::{Choice, Selection};
use super::combatant::{CombatantId, Party};
use super::dice::Dice;
use super::roster::Roster;

/// Per-side combat behavior
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Uses recorded selections; hit rolls are capped by the fumble ceiling
    Friendly { fumble_ceiling: f64 },
    /// Picks attacks and targets at random
    Hostile,
}

impl Behavior {
    pub fn for_party(party: Party, config: &BattleConfig) -> Self {
        match party {
            Party::Friendly => Behavior::Friendly {
                fumble_ceiling: config.fumble_ceiling,
            },
            Party::Hostile => Behavior::Hostile,
        }
    }

    /// Roll whether an attack with the given accuracy lands
    pub fn compute_hit(&self, hit_chance: f64, dice: &mut Dice) -> bool {
        match *self {
            Behavior::Friendly { fumble_ceiling } => dice.check_hit(hit_chance, Some(fumble_ceiling)),
            Behavior::Hostile => dice.check_hit(hit_chance, None),
        }
    }

    /// The action this combatant uses this turn, if any
    pub fn choose_action(
        &self,
        selection: Option<&Selection>,
        config: &BattleConfig,
        dice: &mut Dice,
    ) -> Option<ActionId> {
        match self {
            Behavior::Friendly { .. } => match selection?.choice {
                Choice::Use(id) => Some(id),
                Choice::Pass | Choice::Undecided => None,
            },
            Behavior::Hostile => dice.pick(config.hostile_actions.len()).map(ActionId),
        }
    }

    /// The opponent this combatant strikes, if any is still standing
    pub fn choose_target(
        &self,
        selection: Option<&Selection>,
        opponents: &Roster,
        dice: &mut Dice,
    ) -> Option<CombatantId> {
        match self {
            Behavior::Friendly { .. } => {
                let target = selection?.target?;
                opponents.get(target).filter(|c| c.is_alive()).map(|c| c.id())
            }
            Behavior::Hostile => {
                let index = dice.pick(opponents.active_len())?;
                opponents.active().get(index).map(|c| c.id())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemberTemplate;

    fn hostiles(count: usize) -> Roster {
        let mut roster = Roster::new(Party::Hostile, 4);
        let template = MemberTemplate::new("drone", "Drone", 12);
        for i in 0..count {
            roster.add_active(CombatantId(i as u32), &template);
        }
        roster
    }

    #[test]
    fn test_friendly_uses_selection() {
        let config = BattleConfig::default();
        let behavior = Behavior::for_party(Party::Friendly, &config);
        let mut dice = Dice::deterministic();
        let selection = Selection {
            choice: Choice::Use(ActionId(1)),
            target: Some(CombatantId(1)),
        };

        assert_eq!(
            behavior.choose_action(Some(&selection), &config, &mut dice),
            Some(ActionId(1))
        );
        assert_eq!(
            behavior.choose_target(Some(&selection), &hostiles(2), &mut dice),
            Some(CombatantId(1))
        );
    }

    #[test]
    fn test_friendly_pass_has_no_action() {
        let config = BattleConfig::default();
        let behavior = Behavior::for_party(Party::Friendly, &config);
        let mut dice = Dice::deterministic();
        let selection = Selection {
            choice: Choice::Pass,
            target: None,
        };
        assert_eq!(behavior.choose_action(Some(&selection), &config, &mut dice), None);
        assert_eq!(behavior.choose_action(None, &config, &mut dice), None);
    }

    #[test]
    fn test_friendly_target_must_be_active() {
        let config = BattleConfig::default();
        let behavior = Behavior::for_party(Party::Friendly, &config);
        let mut dice = Dice::deterministic();
        let selection = Selection {
            choice: Choice::Use(ActionId(0)),
            target: Some(CombatantId(9)),
        };
        assert_eq!(behavior.choose_target(Some(&selection), &hostiles(2), &mut dice), None);
    }

    #[test]
    fn test_hostile_deterministic_picks_first() {
        let config = BattleConfig::default();
        let behavior = Behavior::for_party(Party::Hostile, &config);
        let mut dice = Dice::deterministic();
        assert_eq!(behavior.choose_action(None, &config, &mut dice), Some(ActionId(0)));
        assert_eq!(
            behavior.choose_target(None, &hostiles(3), &mut dice),
            Some(CombatantId(0))
        );
        assert_eq!(behavior.choose_target(None, &hostiles(0), &mut dice), None);
    }

    #[test]
    fn test_hostile_ignores_fumble_ceiling() {
        let mut dice = Dice::seeded(5);
        let hits = (0..500)
            .filter(|_| Behavior::Hostile.compute_hit(1.0, &mut dice))
            .count();
        assert_eq!(hits, 500);
    }
}
