//! Battle phases and the transition table
//!
//! Which event moves the battle from which phase to which, and what each
//! phase does on entry and exit. The `Battle` applies these; this module
//! holds no state.

use serde::{Deserialize, Serialize};

/// Battle lifecycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Created, not started
    Idle,
    /// Collecting player choices under the deadline
    Selecting,
    /// Player party attacks
    ExecutingFriendlyActions,
    /// AI party attacks
    ExecutingHostileActions,
    /// AI party wiped out
    FriendlyVictory,
    /// Player party wiped out
    HostileVictory,
}

impl BattlePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BattlePhase::FriendlyVictory | BattlePhase::HostileVictory)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BattlePhase::Idle => "Idle",
            BattlePhase::Selecting => "Selecting",
            BattlePhase::ExecutingFriendlyActions => "Executing friendly actions",
            BattlePhase::ExecutingHostileActions => "Executing hostile actions",
            BattlePhase::FriendlyVictory => "Friendly victory",
            BattlePhase::HostileVictory => "Hostile victory",
        }
    }

    /// Final result, for terminal phases
    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self {
            BattlePhase::FriendlyVictory => Some(BattleOutcome::FriendlyWin),
            BattlePhase::HostileVictory => Some(BattleOutcome::HostileWin),
            _ => None,
        }
    }
}

/// How a finished battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    FriendlyWin,
    HostileWin,
}

/// Things that move the battle along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleEvent {
    Start,
    /// Every active player combatant has a complete selection
    SelectionsComplete,
    /// The selection deadline passed
    SelectionTimeout,
    /// The current side finished attacking
    ResolutionComplete { opponents_remain: bool },
}

/// Work a phase does when it is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryEffect {
    /// Merge arrivals, reset selections, arm the timer
    OpenSelection,
    ResolveFriendly,
    ResolveHostile,
    Conclude(BattleOutcome),
    Nothing,
}

/// Work a phase does when it is left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitEffect {
    CancelTimer,
    Nothing,
}

/// The transition table. `None` means the event is not accepted in `phase`.
pub fn transition(phase: BattlePhase, event: BattleEvent) -> Option<BattlePhase> {
    use BattleEvent::*;
    use BattlePhase::*;

    match (phase, event) {
        (Idle, Start) => Some(Selecting),
        (Selecting, SelectionsComplete) | (Selecting, SelectionTimeout) => {
            Some(ExecutingFriendlyActions)
        }
        (ExecutingFriendlyActions, ResolutionComplete { opponents_remain: true }) => {
            Some(ExecutingHostileActions)
        }
        (ExecutingFriendlyActions, ResolutionComplete { opponents_remain: false }) => {
            Some(FriendlyVictory)
        }
        (ExecutingHostileActions, ResolutionComplete { opponents_remain: true }) => Some(Selecting),
        (ExecutingHostileActions, ResolutionComplete { opponents_remain: false }) => {
            Some(HostileVictory)
        }
        _ => None,
    }
}

pub fn on_enter(phase: BattlePhase) -> EntryEffect {
    match phase {
        BattlePhase::Idle => EntryEffect::Nothing,
        BattlePhase::Selecting => EntryEffect::OpenSelection,
        BattlePhase::ExecutingFriendlyActions => EntryEffect::ResolveFriendly,
        BattlePhase::ExecutingHostileActions => EntryEffect::ResolveHostile,
        BattlePhase::FriendlyVictory => EntryEffect::Conclude(BattleOutcome::FriendlyWin),
        BattlePhase::HostileVictory => EntryEffect::Conclude(BattleOutcome::HostileWin),
    }
}

pub fn on_exit(phase: BattlePhase) -> ExitEffect {
    match phase {
        BattlePhase::Selecting => ExitEffect::CancelTimer,
        _ => ExitEffect::Nothing,
    }
}
