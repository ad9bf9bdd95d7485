//! Combat system

pub mod actions;
pub mod behavior;
pub mod combatant;
pub mod dice;
pub mod resolve;
pub mod roster;

pub use actions::{ActionRegistry, Choice, Selection};
pub use behavior::Behavior;
pub use combatant::{Combatant, CombatantId, Party};
pub use dice::Dice;
pub use resolve::{resolve_friendly, resolve_hostile, Strike, SweepReport};
pub use roster::{MemberStatus, Roster};
