//! Battle notifications
//!
//! Informational callbacks for a presentation layer. Nothing is returned
//! and nothing a callback does can affect the battle.

use super::phase::BattlePhase;
use super::state::BattleSnapshot;

/// Receives battle notifications. All methods default to doing nothing.
pub trait BattleObserver {
    fn on_phase_change(&mut self, _from: BattlePhase, _to: BattlePhase) {}

    /// Roster health readout after a phase change or merge
    fn on_status(&mut self, _snapshot: &BattleSnapshot) {}

    /// Whole seconds left to choose, once per second
    fn on_countdown(&mut self, _seconds_left: u64) {}
}

/// Ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl BattleObserver for NullObserver {}

/// Forwards notifications to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl BattleObserver for LogObserver {
    fn on_phase_change(&mut self, from: BattlePhase, to: BattlePhase) {
        log::info!("{} -> {}", from.name(), to.name());
    }

    fn on_status(&mut self, snapshot: &BattleSnapshot) {
        for line in snapshot.status_lines() {
            log::info!("{}", line);
        }
    }

    fn on_countdown(&mut self, seconds_left: u64) {
        log::info!("Time left: {}", seconds_left);
    }
}
