//! Skirmish - A phased, turn-based two-party battle engine
//!
//! Players pick their actions under a deadline, then each side attacks in
//! turn until one party is wiped out. Combatants can join mid-battle and
//! are admitted at the start of the next selection phase.

pub mod combat;
pub mod data;
pub mod game;

// Re-export commonly used types
pub use combat::{Choice, CombatantId, Dice, Party};
pub use data::{ActionId, BattleConfig, MemberTemplate};
pub use game::{Battle, BattleObserver, BattleOutcome, BattlePhase, BattleSnapshot};
