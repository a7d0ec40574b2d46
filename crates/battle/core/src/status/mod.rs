//! Timed status effects.
//!
//! - **effect**: [`EffectKind`] sum type, live [`StatusEffect`]s and data
//!   [`EffectTemplate`]s
//! - **ledger**: a combatant's ordered [`StatusLedger`]
//! - **engine**: per-tick evaluation against the roster

mod effect;
mod engine;
mod ledger;

pub use effect::{EffectKind, EffectTemplate, StatusEffect};
pub use engine::{tick_all, tick_combatant};
pub use ledger::{LedgerTick, PeriodicKind, PeriodicTick, StatusLedger};
