//! Turn resolution
//!
//! Applies one side's attacks to the other and clears out the dead. Player
//! attacks resolve grouped by action type, in table order, with one shared
//! hit roll per group. AI attacks each roll on their own.

use crate::data::{ActionId, BattleConfig};

use super::actions::ActionRegistry;
use super::behavior::Behavior;
use super::combatant::{Combatant, CombatantId, Party};
use super::dice::Dice;
use super::roster::Roster;

/// One landed attack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strike {
    pub attacker: CombatantId,
    pub target: CombatantId,
    pub action: ActionId,
    pub damage: i32,
}

/// What happened during one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Hit checks rolled
    pub checks: u32,
    /// Actions whose hit check failed
    pub misses: Vec<ActionId>,
    pub strikes: Vec<Strike>,
    /// Opponents removed as dead, in removal order
    pub removed: Vec<CombatantId>,
}

impl SweepReport {
    pub fn total_damage(&self) -> i32 {
        self.strikes.iter().map(|s| s.damage).sum()
    }

    /// Total damage dealt to one target
    pub fn damage_to(&self, target: CombatantId) -> i32 {
        self.strikes
            .iter()
            .filter(|s| s.target == target)
            .map(|s| s.damage)
            .sum()
    }
}

/// Resolve every player-party selection against the AI party.
///
/// # Panics
///
/// Panics if the registry is missing a slot for an active actor.
pub fn resolve_friendly(
    actors: &Roster,
    registry: &ActionRegistry,
    opponents: &mut Roster,
    config: &BattleConfig,
    dice: &mut Dice,
) -> SweepReport {
    assert!(
        registry.covers(actors),
        "action registry is missing selections for active combatants ({} slots, {} actors)",
        registry.len(),
        actors.active_len()
    );

    let behavior = Behavior::for_party(Party::Friendly, config);
    let mut report = SweepReport::default();

    for (action_id, def) in config.resolution_order() {
        let group: Vec<&Combatant> = actors
            .active()
            .iter()
            .filter(|c| c.is_alive())
            .filter(|c| behavior.choose_action(registry.get(c.id()), config, dice) == Some(action_id))
            .collect();

        // The first actor rolls for the whole group
        let Some(representative) = group.first() else {
            continue;
        };
        report.checks += 1;
        if !behavior.compute_hit(def.hit_chance, dice) {
            log::debug!("{} by #{} missed", def.name, representative.id().0);
            report.misses.push(action_id);
            continue;
        }

        for actor in &group {
            let Some(target_id) = behavior.choose_target(registry.get(actor.id()), opponents, dice) else {
                continue;
            };
            if let Some(target) = opponents.get_mut(target_id) {
                target.take_damage(def.damage);
                log::debug!(
                    "#{} hit #{} with {} for {} ({} left)",
                    actor.id().0,
                    target_id.0,
                    def.name,
                    def.damage,
                    target.health()
                );
                report.strikes.push(Strike {
                    attacker: actor.id(),
                    target: target_id,
                    action: action_id,
                    damage: def.damage,
                });
            }
        }

        report.removed.extend(opponents.sweep_dead());
    }

    // Catch anyone already dead when no group acted
    report.removed.extend(opponents.sweep_dead());
    report
}

/// Let every AI-party combatant attack the player party
pub fn resolve_hostile(
    actors: &Roster,
    opponents: &mut Roster,
    config: &BattleConfig,
    dice: &mut Dice,
) -> SweepReport {
    let behavior = Behavior::for_party(Party::Hostile, config);
    let mut report = SweepReport::default();

    for actor in actors.active().iter().filter(|c| c.is_alive()) {
        let Some(action_id) = behavior.choose_action(None, config, dice) else {
            continue;
        };
        let Some(def) = config.hostile_action(action_id) else {
            continue;
        };

        report.checks += 1;
        if !behavior.compute_hit(def.hit_chance, dice) {
            log::debug!("#{} missed with {}", actor.id().0, def.name);
            report.misses.push(action_id);
            continue;
        }

        let Some(target_id) = behavior.choose_target(None, opponents, dice) else {
            continue;
        };
        if let Some(target) = opponents.get_mut(target_id) {
            target.take_damage(def.damage);
            log::debug!(
                "#{} hit #{} with {} for {} ({} left)",
                actor.id().0,
                target_id.0,
                def.name,
                def.damage,
                target.health()
            );
            report.strikes.push(Strike {
                attacker: actor.id(),
                target: target_id,
                action: action_id,
                damage: def.damage,
            });
        }
    }

    report.removed = opponents.sweep_dead();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::actions::{Choice, Selection};
    use crate::data::MemberTemplate;

    fn roster(party: Party, health: &[(u32, i32)]) -> Roster {
        let mut roster = Roster::new(party, 4);
        for &(id, hp) in health {
            roster.add_active(CombatantId(id), &MemberTemplate::new("x", "X", hp));
        }
        roster
    }

    fn choose(registry: &mut ActionRegistry, actor: u32, choice: Choice, target: Option<u32>) {
        *registry.get_mut(CombatantId(actor)).unwrap() = Selection {
            choice,
            target: target.map(CombatantId),
        };
    }

    #[test]
    fn test_group_shares_one_hit_check() {
        let config = BattleConfig::default();
        let spray = config.friendly_action_id("spray").unwrap();
        let actors = roster(Party::Friendly, &[(0, 15), (1, 15)]);
        let mut foes = roster(Party::Hostile, &[(10, 12), (11, 12)]);
        let mut registry = ActionRegistry::new();
        registry.reset(&actors);
        choose(&mut registry, 0, Choice::Use(spray), Some(10));
        choose(&mut registry, 1, Choice::Use(spray), Some(11));

        let mut dice = Dice::deterministic();
        let report = resolve_friendly(&actors, &registry, &mut foes, &config, &mut dice);

        assert_eq!(report.checks, 1);
        assert_eq!(dice.checks(), 1);
        assert_eq!(foes.get(CombatantId(10)).unwrap().health(), 8);
        assert_eq!(foes.get(CombatantId(11)).unwrap().health(), 8);
    }

    #[test]
    fn test_group_miss_fails_everyone() {
        let mut config = BattleConfig::default();
        config.friendly_actions[0].hit_chance = 0.0;
        let spray = ActionId(0);
        let actors = roster(Party::Friendly, &[(0, 15), (1, 15)]);
        let mut foes = roster(Party::Hostile, &[(10, 12)]);
        let mut registry = ActionRegistry::new();
        registry.reset(&actors);
        choose(&mut registry, 0, Choice::Use(spray), Some(10));
        choose(&mut registry, 1, Choice::Use(spray), Some(10));

        let mut dice = Dice::seeded(1);
        let report = resolve_friendly(&actors, &registry, &mut foes, &config, &mut dice);
        assert_eq!(report.checks, 1);
        assert_eq!(report.misses, vec![spray]);
        assert_eq!(foes.get(CombatantId(10)).unwrap().health(), 12);
    }

    #[test]
    fn test_actions_resolve_in_table_order() {
        let config = BattleConfig::default();
        let spray = config.friendly_action_id("spray").unwrap();
        let hurl = config.friendly_action_id("hurl").unwrap();
        // The hurler is listed first but spray resolves first
        let actors = roster(Party::Friendly, &[(0, 15), (1, 15)]);
        let mut foes = roster(Party::Hostile, &[(10, 4)]);
        let mut registry = ActionRegistry::new();
        registry.reset(&actors);
        choose(&mut registry, 0, Choice::Use(hurl), Some(10));
        choose(&mut registry, 1, Choice::Use(spray), Some(10));

        let mut dice = Dice::deterministic();
        let report = resolve_friendly(&actors, &registry, &mut foes, &config, &mut dice);

        assert_eq!(report.strikes.len(), 1);
        assert_eq!(report.strikes[0].action, spray);
        assert_eq!(report.removed, vec![CombatantId(10)]);
        assert_eq!(foes.active_len(), 0);
    }

    #[test]
    fn test_dead_target_is_skipped() {
        let config = BattleConfig::default();
        let spray = config.friendly_action_id("spray").unwrap();
        let hurl = config.friendly_action_id("hurl").unwrap();
        let actors = roster(Party::Friendly, &[(0, 15), (1, 15)]);
        let mut foes = roster(Party::Hostile, &[(10, 3), (11, 12)]);
        let mut registry = ActionRegistry::new();
        registry.reset(&actors);
        choose(&mut registry, 0, Choice::Use(spray), Some(10));
        choose(&mut registry, 1, Choice::Use(hurl), Some(10));

        let mut dice = Dice::deterministic();
        let report = resolve_friendly(&actors, &registry, &mut foes, &config, &mut dice);

        assert_eq!(report.checks, 2);
        assert_eq!(report.strikes.len(), 1);
        assert_eq!(report.removed, vec![CombatantId(10)]);
        assert_eq!(foes.get(CombatantId(11)).unwrap().health(), 12);
    }

    #[test]
    fn test_pass_and_undecided_do_nothing() {
        let config = BattleConfig::default();
        let actors = roster(Party::Friendly, &[(0, 15), (1, 15)]);
        let mut foes = roster(Party::Hostile, &[(10, 12)]);
        let mut registry = ActionRegistry::new();
        registry.reset(&actors);
        choose(&mut registry, 0, Choice::Pass, None);

        let mut dice = Dice::deterministic();
        let report = resolve_friendly(&actors, &registry, &mut foes, &config, &mut dice);
        assert_eq!(report, SweepReport::default());
        assert_eq!(foes.get(CombatantId(10)).unwrap().health(), 12);
    }

    #[test]
    fn test_dead_opponents_swept_without_any_group() {
        let config = BattleConfig::default();
        let actors = roster(Party::Friendly, &[(0, 15)]);
        let mut foes = roster(Party::Hostile, &[(10, 12), (11, 12)]);
        foes.get_mut(CombatantId(11)).unwrap().take_damage(12);
        let mut registry = ActionRegistry::new();
        registry.reset(&actors);
        choose(&mut registry, 0, Choice::Pass, None);

        let mut dice = Dice::deterministic();
        let report = resolve_friendly(&actors, &registry, &mut foes, &config, &mut dice);
        assert_eq!(report.checks, 0);
        assert_eq!(report.removed, vec![CombatantId(11)]);
        assert!(foes.active().iter().all(|c| c.is_alive()));
    }

    #[test]
    #[should_panic(expected = "action registry is missing selections")]
    fn test_missing_registry_slots_panic() {
        let config = BattleConfig::default();
        let actors = roster(Party::Friendly, &[(0, 15)]);
        let mut foes = roster(Party::Hostile, &[(10, 12)]);
        let registry = ActionRegistry::new();
        let mut dice = Dice::deterministic();
        resolve_friendly(&actors, &registry, &mut foes, &config, &mut dice);
    }

    #[test]
    fn test_hostile_sweep_deterministic() {
        let config = BattleConfig::default();
        let attackers = roster(Party::Hostile, &[(10, 12), (11, 12)]);
        let mut allies = roster(Party::Friendly, &[(0, 3), (1, 15)]);

        let mut dice = Dice::deterministic();
        let report = resolve_hostile(&attackers, &mut allies, &config, &mut dice);

        // Both attackers pick the first attack and the first target
        assert_eq!(report.checks, 2);
        assert_eq!(report.damage_to(CombatantId(0)), 4);
        assert_eq!(report.removed, vec![CombatantId(0)]);
        assert_eq!(allies.get(CombatantId(1)).unwrap().health(), 15);
    }

    #[test]
    fn test_hostile_sweep_without_targets() {
        let config = BattleConfig::default();
        let attackers = roster(Party::Hostile, &[(10, 12)]);
        let mut allies = roster(Party::Friendly, &[]);
        let mut dice = Dice::deterministic();
        let report = resolve_hostile(&attackers, &mut allies, &config, &mut dice);
        assert!(report.strikes.is_empty());
        assert!(report.removed.is_empty());
    }

    #[test]
    fn test_hostile_rolls_independently() {
        let mut config = BattleConfig::default();
        for action in &mut config.hostile_actions {
            action.hit_chance = 1.0;
        }
        let attackers = roster(Party::Hostile, &[(10, 12), (11, 12), (12, 12)]);
        let mut allies = roster(Party::Friendly, &[(0, 100), (1, 100)]);
        let mut dice = Dice::seeded(99);
        let report = resolve_hostile(&attackers, &mut allies, &config, &mut dice);
        assert_eq!(report.checks, 3);
        assert_eq!(report.strikes.len(), 3);
        let total: i32 = allies.active().iter().map(|c| 100 - c.health()).sum();
        assert_eq!(total, report.total_damage());
    }
}
