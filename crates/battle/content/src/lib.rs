//! Data-driven content definitions and loaders for `battle-core`.
//!
//! This crate houses the bundled content set and loaders for RON/TOML data files:
//! - Battle configuration (data-driven via TOML)
//! - Element advantages and reactions (data-driven via RON)
//! - Skill catalog (data-driven via RON)
//! - Unit templates and role synergies (data-driven via RON)
//! - Encounters: placements plus environment archetype (data-driven via RON)
//!
//! Every entry is validated while loading, so a [`battle_core::BattleSetup`]
//! built from loaded content never carries malformed data into a battle.

pub mod encounter;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use encounter::EncounterSpec;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, ContentSet, ElementLoader, EncounterLoader, SkillLoader,
    SynergyLoader, UnitLoader,
};
