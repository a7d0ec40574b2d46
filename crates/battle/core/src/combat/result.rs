//! Hit descriptions and resolved results.

use crate::element::Element;

/// Which defending stat mitigates a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DamageType {
    /// Mitigated by defense.
    Physical,
    /// Mitigated by magic resist.
    Magical,
    /// Skips mitigation entirely.
    Pure,
}

/// An incoming hit before resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub base: f64,
    pub damage_type: DamageType,
    pub force_crit: bool,
    /// Overrides the attacker's own element.
    pub element: Option<Element>,
}

impl Hit {
    pub fn new(base: f64, damage_type: DamageType) -> Self {
        Self {
            base,
            damage_type,
            force_crit: false,
            element: None,
        }
    }

    pub fn physical(base: f64) -> Self {
        Self::new(base, DamageType::Physical)
    }

    pub fn magical(base: f64) -> Self {
        Self::new(base, DamageType::Magical)
    }

    pub fn crit(mut self) -> Self {
        self.force_crit = true;
        self
    }

    pub fn with_element(mut self, element: Option<Element>) -> Self {
        self.element = element;
        self
    }
}

/// Immutable record of one resolved hit or heal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    /// Input amount after clamping to a non-negative finite value.
    pub raw: f64,
    /// Post-pipeline amount; for damage always ≥ 1.
    pub amount: f64,
    pub crit: bool,
    pub heal: bool,
    pub damage_type: DamageType,
    pub element: Option<Element>,
    /// Bonus damage from an elemental reaction, applied separately.
    pub reaction_bonus: f64,
    /// True when this hit took the target from alive to dead.
    pub killed: bool,
}

impl DamageResult {
    pub(crate) fn heal(raw: f64, amount: f64) -> Self {
        Self {
            raw,
            amount,
            crit: false,
            heal: true,
            damage_type: DamageType::Pure,
            element: None,
            reaction_bonus: 0.0,
            killed: false,
        }
    }

    /// Primary plus reaction damage.
    pub fn total(&self) -> f64 {
        self.amount + self.reaction_bonus
    }
}
