use std::fmt;

/// Stable identifier of a combatant within one encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which roster a combatant belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Ally,
    Enemy,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Ally => Self::Enemy,
            Self::Enemy => Self::Ally,
        }
    }
}

/// Combat role; drives default targeting and the healer special case.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    Tank,
    Melee,
    Ranged,
    Healer,
    Support,
}

/// Continuous battlefield coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Moves up to `step` units towards `goal`, never overshooting it.
    pub fn step_towards(&self, goal: &Position, step: f64) -> Position {
        let distance = self.distance(goal);
        if distance <= step || distance == 0.0 {
            return *goal;
        }
        let ratio = step / distance;
        Position {
            x: self.x + (goal.x - self.x) * ratio,
            y: self.y + (goal.y - self.y) * ratio,
        }
    }
}

/// Static reward granted for defeating an opposing combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Reward {
    pub gold: u32,
    pub experience: u32,
}

impl std::ops::Add for Reward {
    type Output = Reward;

    fn add(self, rhs: Reward) -> Reward {
        Reward {
            gold: self.gold.saturating_add(rhs.gold),
            experience: self.experience.saturating_add(rhs.experience),
        }
    }
}

impl std::iter::Sum for Reward {
    fn sum<I: Iterator<Item = Reward>>(iter: I) -> Reward {
        iter.fold(Reward::default(), |acc, reward| acc + reward)
    }
}
