//! Game module - Battle lifecycle and phase timing

mod observer;
mod phase;
mod state;
mod timer;

pub use observer::{BattleObserver, LogObserver, NullObserver};
pub use phase::{transition, BattleEvent, BattleOutcome, BattlePhase};
pub use state::{Battle, BattleSnapshot};
pub use timer::{Clock, Countdown, ManualClock, PhaseTimer, SystemClock, TimerPoll};
