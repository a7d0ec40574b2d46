//! Deterministic real-time combat resolution for an auto-battling roguelike.
//!
//! `battle-core` owns the moment-to-moment simulation: damage, targeting,
//! status effects, combos, skills and environmental rules, sequenced by
//! [`battle::Battle`]. A battle seed fully determines the outcome for a fixed
//! `dt` schedule; every random draw goes through [`rng::BattleRng`].
//! Content loading and presentation live in other crates and talk to the
//! simulation through the types re-exported here and the event feed.
pub mod battle;
pub mod combat;
pub mod combatant;
pub mod combo;
pub mod config;
pub mod element;
pub mod environment;
pub mod error;
pub mod events;
pub mod rng;
pub mod roster;
pub mod skills;
pub mod stats;
pub mod status;
pub mod targeting;
pub mod threat;
pub use battle::{Battle, BattleOutcome, BattleSetup, BattleState};
pub use combat::{CombatContext, CombatantSnapshot, DamageResult, DamageType, Hit};
pub use combatant::{Combatant, CombatantId, HpLoss, Position, Reward, Role, Side};
pub use combo::{BreakReason, ComboTracker};
pub use config::BattleConfig;
pub use element::{Element, ElementTable, ElementTableSpec, ReactionKey, ReactionSpec};
pub use environment::{EnvironmentArchetype, EnvironmentEngine, EnvironmentRule, SideMask};
pub use error::{BattleError, CommandError, ErrorSeverity, RegistryError, RosterError};
pub use events::{BattleEvent, EventBus, EventRecorder, SubscriptionId, Topic};
pub use rng::{BattleRng, RandomSource};
pub use roster::{Placement, RosterBuilder, SynergyRule, UnitTemplate, apply_synergies};
pub use skills::{QueueMode, SkillDef, SkillId, SkillQueue, SkillRegistry, SkillSpec, SkillTarget};
pub use stats::{StatBlock, StatKey};
pub use status::{EffectKind, EffectTemplate, StatusEffect};
pub use targeting::{TargetStrategy, TargetingContext, resolve_target};
pub use threat::ThreatTable;
