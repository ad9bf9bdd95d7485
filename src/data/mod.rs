//! Battle configuration and stat tables
//!
//! This module handles loading battle rules from external RON files,
//! allowing for data-driven tuning.

pub mod config;
pub mod loader;
pub mod templates;

pub use config::{BattleConfig, ConfigError};
pub use loader::{search_paths, CONFIG_FILE_NAME};
pub use templates::{ActionDef, ActionId, MemberTemplate};
