//! Skills: validated definitions, readiness, the player queue and execution.

mod execute;
mod queue;
mod registry;

pub use execute::{execute_skill, is_ready, resolve_skill_targets, skill_range};
pub use queue::{QueueMode, QueuedSkill, SkillQueue};
pub use registry::{SkillDef, SkillId, SkillRegistry, SkillSpec, SkillTarget};
