//! Stat system.
//!
//! - [`StatBlock`]: one value per [`StatKey`]; base, equipment, synergy and
//!   effective stats all share this shape
//! - [`effective_stats`]: the Base+Equipment → Status → Synergy fold

pub mod block;
pub mod layers;

pub use block::{StatBlock, StatKey};
pub use layers::{EffectLayer, EquipmentLayer, StatDelta, StatLayer, SynergyLayer, effective_stats};
