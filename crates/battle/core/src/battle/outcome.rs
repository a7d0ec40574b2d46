use crate::combatant::{CombatantId, Reward};

/// Terminal state of an encounter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BattleState {
    #[default]
    Ongoing,
    Victory,
    Defeat,
}

impl BattleState {
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Ongoing => 0,
            Self::Victory => 1,
            Self::Defeat => 2,
        }
    }
}

/// What the surrounding game receives when (or before) an encounter ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    pub state: BattleState,
    /// Sum of the static rewards of every defeated opponent.
    pub rewards: Reward,
    /// Living ally ids, in roster order.
    pub survivors: Vec<CombatantId>,
}
