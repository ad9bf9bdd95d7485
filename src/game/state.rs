//! Battle state machine
//!
//! Owns both rosters, the action registry and the selection timer, and
//! drives the battle through its phases. Every public operation is a no-op
//! when it doesn't apply to the current phase.

use std::time::Duration;

use serde::Serialize;

use crate::combat::{
    resolve_friendly, resolve_hostile, ActionRegistry, Choice, CombatantId, Dice, MemberStatus,
    Party, Roster, Selection, SweepReport,
};
use crate::data::{BattleConfig, MemberTemplate};

use super::observer::{BattleObserver, NullObserver};
use super::phase::{
    on_enter, on_exit, transition, BattleEvent, BattleOutcome, BattlePhase, EntryEffect,
    ExitEffect,
};
use super::timer::{Clock, Countdown, PhaseTimer, SystemClock, TimerPoll};

/// Read-only view of a battle for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleSnapshot {
    pub phase: BattlePhase,
    pub round: u32,
    pub outcome: Option<BattleOutcome>,
    pub friendly: Vec<MemberStatus>,
    pub hostile: Vec<MemberStatus>,
    pub friendly_pending: usize,
    pub hostile_pending: usize,
}

impl BattleSnapshot {
    /// One line per active combatant
    pub fn status_lines(&self) -> Vec<String> {
        let friendly = self
            .friendly
            .iter()
            .enumerate()
            .map(|(i, m)| format!("Friendly {} ({}): {} health", i + 1, m.name, m.health));
        let hostile = self
            .hostile
            .iter()
            .enumerate()
            .map(|(i, m)| format!("Hostile {} ({}): {} health", i + 1, m.name, m.health));
        friendly.chain(hostile).collect()
    }
}

/// A battle between a player party and an AI party
pub struct Battle<C: Clock = SystemClock> {
    /// Current phase
    phase: BattlePhase,
    config: BattleConfig,
    friendly: Roster,
    hostile: Roster,
    /// Player choices for the current selection phase
    registry: ActionRegistry,
    timer: PhaseTimer,
    countdown: Countdown,
    clock: C,
    dice: Dice,
    observer: Box<dyn BattleObserver>,
    /// Index of the player combatant expected to choose next
    next_to_choose: usize,
    /// Selection phases entered so far
    round: u32,
    /// Next combatant id to hand out
    next_id: u32,
    friendly_sweep: SweepReport,
    hostile_sweep: SweepReport,
}

impl<C: Clock> Battle<C> {
    /// Create a battle with its starting rosters. Templates beyond a
    /// party's capacity are dropped.
    pub fn new(
        config: BattleConfig,
        friendly: &[MemberTemplate],
        hostile: &[MemberTemplate],
        dice: Dice,
        clock: C,
    ) -> Self {
        let timer = PhaseTimer::new(config.selection_time());
        let mut battle = Self {
            phase: BattlePhase::Idle,
            friendly: Roster::new(Party::Friendly, config.friendly_capacity),
            hostile: Roster::new(Party::Hostile, config.hostile_capacity),
            config,
            registry: ActionRegistry::new(),
            timer,
            countdown: Countdown::new(),
            clock,
            dice,
            observer: Box::new(NullObserver),
            next_to_choose: 0,
            round: 0,
            next_id: 0,
            friendly_sweep: SweepReport::default(),
            hostile_sweep: SweepReport::default(),
        };

        for (party, templates) in [(Party::Friendly, friendly), (Party::Hostile, hostile)] {
            for template in templates {
                let id = battle.allocate_id();
                if !battle.roster_mut(party).add_active(id, template) {
                    log::warn!(
                        "Leaving {} out of the {} party (full, or no health)",
                        template.name,
                        party.name()
                    );
                }
            }
        }

        battle
    }

    /// Attach an observer for notifications
    pub fn with_observer(mut self, observer: Box<dyn BattleObserver>) -> Self {
        self.observer = observer;
        self
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Begin the battle. Only valid while idle.
    pub fn start(&mut self) {
        if self.phase != BattlePhase::Idle {
            log::debug!("start ignored in {}", self.phase.name());
            return;
        }
        log::info!(
            "Starting battle: {} vs {}",
            self.friendly.total_len(),
            self.hostile.total_len()
        );
        self.fire(BattleEvent::Start);
    }

    /// Choose an action for the player combatant at `index`.
    ///
    /// If the action needs no target, or only one opponent is active, the
    /// selection is recorded straight away. Otherwise it waits for
    /// [`Battle::select_target`].
    pub fn select_action(&mut self, index: usize, choice: Choice) {
        if self.phase != BattlePhase::Selecting {
            log::debug!("select_action ignored in {}", self.phase.name());
            return;
        }
        if let Choice::Use(id) = choice {
            if self.config.friendly_action(id).is_none() {
                log::debug!("Unknown action {:?}", id);
                return;
            }
        }
        if choice == Choice::Undecided {
            return;
        }
        let Some(actor_id) = self.living_friendly_at(index) else {
            log::debug!("No friendly combatant at {}", index);
            return;
        };

        let needs_target = Selection { choice, target: None }.needs_target(&self.config);
        let sole_target = match self.hostile.active() {
            [only] => Some(only.id()),
            _ => None,
        };
        let Some(selection) = self.registry.get_mut(actor_id) else {
            return;
        };
        selection.choice = choice;
        selection.target = None;

        if !needs_target {
            self.record(index);
        } else if let Some(target) = sole_target {
            selection.target = Some(target);
            self.record(index);
        } else {
            log::debug!("Selected {:?} for friendly {}, select a target next", choice, index + 1);
        }
    }

    /// Choose the target for the player combatant at `index`. An index
    /// past the end of the active AI roster is rejected and the selection
    /// keeps waiting.
    pub fn select_target(&mut self, index: usize, target_index: usize) {
        if self.phase != BattlePhase::Selecting {
            log::debug!("select_target ignored in {}", self.phase.name());
            return;
        }
        let Some(actor_id) = self.living_friendly_at(index) else {
            log::debug!("No friendly combatant at {}", index);
            return;
        };
        let Some(target_id) = self.hostile.active().get(target_index).map(|c| c.id()) else {
            log::debug!("Selected nonexistent target {}, try again", target_index + 1);
            return;
        };
        let Some(selection) = self.registry.get_mut(actor_id) else {
            return;
        };
        selection.target = Some(target_id);
        self.record(index);
    }

    /// [`Battle::select_action`] for whoever is next to choose
    pub fn select_action_for_next(&mut self, choice: Choice) {
        self.select_action(self.next_to_choose, choice);
    }

    /// [`Battle::select_target`] for whoever is next to choose
    pub fn select_target_for_next(&mut self, target_index: usize) {
        self.select_target(self.next_to_choose, target_index);
    }

    /// Ask for a new combatant to join `party`. It waits as pending until
    /// the next safe merge point. Ignored once the battle is over, when
    /// the party is full, or when the template has no health.
    pub fn request_join(&mut self, party: Party, template: &MemberTemplate) {
        if self.phase.is_terminal() {
            log::debug!("request_join ignored, battle is over");
            return;
        }
        if !self.roster(party).has_room() {
            log::debug!("{} party is full, join rejected", party.name());
            return;
        }
        let id = self.allocate_id();
        if self.roster_mut(party).request_join(id, template) {
            log::info!("{} joining the {} party", template.name, party.name());
        }
    }

    /// Drive the selection timer. Call regularly; does nothing outside
    /// the selection phase.
    pub fn tick(&mut self) {
        if self.phase != BattlePhase::Selecting {
            return;
        }

        if self.friendly.pending_len() > 0 || self.hostile.pending_len() > 0 {
            self.merge_arrivals();
            self.timer.arm(self.clock.now());
            self.countdown.clear();
            return;
        }

        match self.timer.poll(self.clock.now()) {
            TimerPoll::Expired => {
                log::info!("Selection time is up");
                self.fire(BattleEvent::SelectionTimeout);
            }
            TimerPoll::Running { remaining_secs } => {
                if self.countdown.announce(remaining_secs) {
                    self.observer.on_countdown(remaining_secs);
                }
            }
            TimerPoll::Disarmed => {}
        }
    }

    // =========================================================================
    // Observables
    // =========================================================================

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.phase.outcome()
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn roster(&self, party: Party) -> &Roster {
        match party {
            Party::Friendly => &self.friendly,
            Party::Hostile => &self.hostile,
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Selection of the active player combatant at `index`
    pub fn selection(&self, index: usize) -> Option<&Selection> {
        let actor = self.friendly.active().get(index)?;
        self.registry.get(actor.id())
    }

    /// Index of the player combatant expected to choose next
    pub fn next_to_choose(&self) -> usize {
        self.next_to_choose
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn is_deterministic(&self) -> bool {
        self.dice.is_deterministic()
    }

    /// Report from the most recent attack sweep by `party`
    pub fn last_sweep(&self, party: Party) -> &SweepReport {
        match party {
            Party::Friendly => &self.friendly_sweep,
            Party::Hostile => &self.hostile_sweep,
        }
    }

    /// Time left to choose, while the timer runs
    pub fn time_left(&self) -> Option<Duration> {
        let elapsed = self.timer.elapsed(self.clock.now())?;
        Some(self.timer.budget().saturating_sub(elapsed))
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            phase: self.phase,
            round: self.round,
            outcome: self.outcome(),
            friendly: self.friendly.status(),
            hostile: self.hostile.status(),
            friendly_pending: self.friendly.pending_len(),
            hostile_pending: self.hostile.pending_len(),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Feed an event through the transition table, following any chained
    /// transitions the entered phases produce.
    fn fire(&mut self, event: BattleEvent) {
        let mut pending = Some(event);
        while let Some(event) = pending.take() {
            let Some(to) = transition(self.phase, event) else {
                log::debug!("{:?} not accepted in {}", event, self.phase.name());
                return;
            };
            let from = self.phase;
            self.exit(from);
            log::debug!("State transition: {:?} -> {:?}", from, to);
            self.phase = to;
            self.observer.on_phase_change(from, to);
            pending = self.enter(to);
            self.emit_status();
        }
    }

    fn exit(&mut self, phase: BattlePhase) {
        match on_exit(phase) {
            ExitEffect::CancelTimer => self.timer.cancel(),
            ExitEffect::Nothing => {}
        }
    }

    /// Run a phase's entry work. Returns the follow-up event, if any.
    fn enter(&mut self, phase: BattlePhase) -> Option<BattleEvent> {
        match on_enter(phase) {
            EntryEffect::OpenSelection => {
                self.round += 1;
                self.next_to_choose = 0;
                self.friendly.merge_pending();
                self.hostile.merge_pending();
                self.registry.reset(&self.friendly);
                self.timer.arm(self.clock.now());
                self.countdown.clear();
                log::debug!("Round {}: choose actions", self.round);
                None
            }
            EntryEffect::ResolveFriendly => {
                self.friendly_sweep = resolve_friendly(
                    &self.friendly,
                    &self.registry,
                    &mut self.hostile,
                    &self.config,
                    &mut self.dice,
                );
                Some(BattleEvent::ResolutionComplete {
                    opponents_remain: !self.hostile.is_empty(),
                })
            }
            EntryEffect::ResolveHostile => {
                self.hostile_sweep =
                    resolve_hostile(&self.hostile, &mut self.friendly, &self.config, &mut self.dice);
                Some(BattleEvent::ResolutionComplete {
                    opponents_remain: !self.friendly.is_empty(),
                })
            }
            EntryEffect::Conclude(outcome) => {
                match outcome {
                    BattleOutcome::FriendlyWin => log::info!("Friendly party won the battle!"),
                    BattleOutcome::HostileWin => log::info!("Hostile party won the battle!"),
                }
                None
            }
            EntryEffect::Nothing => None,
        }
    }

    /// Mark the selection at `index` as made and move the cursor on.
    /// Resolves the turn once everyone has chosen.
    fn record(&mut self, index: usize) {
        let count = self.friendly.active_len().max(1);
        self.next_to_choose = (index + 1) % count;
        if self
            .registry
            .all_complete(&self.friendly, &self.hostile, &self.config)
        {
            self.fire(BattleEvent::SelectionsComplete);
        }
    }

    /// Splice pending arrivals into both active rosters mid-selection
    fn merge_arrivals(&mut self) {
        let friendly = self.friendly.merge_pending();
        let hostile = self.hostile.merge_pending();
        self.registry.extend(&self.friendly);
        log::info!(
            "{} friendly and {} hostile combatants joined the battle",
            friendly.len(),
            hostile.len()
        );
        self.emit_status();
    }

    fn emit_status(&mut self) {
        let snapshot = self.snapshot();
        self.observer.on_status(&snapshot);
    }

    fn living_friendly_at(&self, index: usize) -> Option<CombatantId> {
        self.friendly
            .active()
            .get(index)
            .filter(|c| c.is_alive())
            .map(|c| c.id())
    }

    fn roster_mut(&mut self, party: Party) -> &mut Roster {
        match party {
            Party::Friendly => &mut self.friendly,
            Party::Hostile => &mut self.hostile,
        }
    }

    fn allocate_id(&mut self) -> CombatantId {
        let id = CombatantId(self.next_id);
        self.next_id += 1;
        id
    }
}
