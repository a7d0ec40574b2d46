//! Status effect records and their data templates.

use crate::combatant::CombatantId;
use crate::element::Element;
use crate::error::RegistryError;
use crate::stats::StatKey;

/// What a status effect does, with exactly the fields that kind needs.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Adds `value` to `stat` while active.
    Buff { stat: StatKey, value: f64 },

    /// Subtracts `|value|` from `stat` while active.
    Debuff { stat: StatKey, value: f64 },

    /// Periodic damage every `interval` seconds of remaining duration.
    Dot { damage: f64, interval: f64 },

    /// Periodic healing every `interval` seconds of remaining duration.
    Hot { heal: f64, interval: f64 },

    /// Holder cannot act.
    Stun,

    /// Holder must target the effect's source.
    Taunt,
}

impl EffectKind {
    /// Short lowercase label used in logs and events.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Buff { .. } => "buff",
            Self::Debuff { .. } => "debuff",
            Self::Dot { .. } => "dot",
            Self::Hot { .. } => "hot",
            Self::Stun => "stun",
            Self::Taunt => "taunt",
        }
    }

    /// Tick interval for periodic kinds.
    pub const fn interval(&self) -> Option<f64> {
        match self {
            Self::Dot { interval, .. } | Self::Hot { interval, .. } => Some(*interval),
            _ => None,
        }
    }
}

/// An active, timed effect on a combatant.
///
/// Only the status tick engine mutates `remaining`; the effect is removed
/// the moment it reaches zero or below.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub name: String,
    pub kind: EffectKind,
    /// Seconds left, monotonically decreasing.
    pub remaining: f64,
    pub element: Option<Element>,
    pub source: Option<CombatantId>,
}

impl StatusEffect {
    pub fn new(name: impl Into<String>, kind: EffectKind, duration: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            remaining: duration,
            element: None,
            source: None,
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_source(mut self, source: CombatantId) -> Self {
        self.source = Some(source);
        self
    }
}

/// Content-side description of an effect, instantiated by skills,
/// reactions and environment rules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTemplate {
    pub name: String,
    pub kind: EffectKind,
    pub duration: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Option<Element>,
}

impl EffectTemplate {
    pub fn new(name: impl Into<String>, kind: EffectKind, duration: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            duration,
            element: None,
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    /// Rejects templates the tick engine could not evaluate.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let entry = self.name.as_str();
        RegistryError::check(entry, "duration", self.duration, |v| v > 0.0, "> 0")?;
        match self.kind {
            EffectKind::Buff { value, .. } | EffectKind::Debuff { value, .. } => {
                RegistryError::check(entry, "value", value, |_| true, "finite")?;
            }
            EffectKind::Dot { damage: amount, interval }
            | EffectKind::Hot { heal: amount, interval } => {
                RegistryError::check(entry, "amount", amount, |v| v >= 0.0, ">= 0")?;
                RegistryError::check(entry, "interval", interval, |v| v > 0.0, "> 0")?;
            }
            EffectKind::Stun | EffectKind::Taunt => {}
        }
        Ok(())
    }

    /// Creates a live effect.
    ///
    /// The template's own element wins over `fallback_element` (usually the
    /// element of the skill or hit that applied it).
    pub fn instantiate(
        &self,
        source: Option<CombatantId>,
        fallback_element: Option<Element>,
    ) -> StatusEffect {
        StatusEffect {
            name: self.name.clone(),
            kind: self.kind,
            remaining: self.duration,
            element: self.element.or(fallback_element),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodic_template_requires_positive_interval() {
        let template = EffectTemplate::new(
            "burn",
            EffectKind::Dot {
                damage: 5.0,
                interval: 0.0,
            },
            3.0,
        );
        assert!(matches!(
            template.validate(),
            Err(RegistryError::OutOfRange {
                field: "interval",
                ..
            })
        ));
    }

    #[test]
    fn instantiate_prefers_template_element() {
        let template = EffectTemplate::new("chill", EffectKind::Stun, 1.0).with_element(Element::Ice);
        let effect = template.instantiate(Some(CombatantId(3)), Some(Element::Fire));

        assert_eq!(effect.element, Some(Element::Ice));
        assert_eq!(effect.source, Some(CombatantId(3)));
        assert_eq!(effect.remaining, 1.0);
    }

    #[test]
    fn instantiate_falls_back_to_hit_element() {
        let template = EffectTemplate::new("scorch", EffectKind::Stun, 1.0);
        let effect = template.instantiate(None, Some(Element::Fire));
        assert_eq!(effect.element, Some(Element::Fire));
    }
}
