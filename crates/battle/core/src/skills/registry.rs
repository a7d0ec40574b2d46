//! Validated skill definitions.

use std::collections::BTreeMap;

use crate::combat::DamageType;
use crate::element::Element;
use crate::error::RegistryError;
use crate::stats::StatKey;
use crate::status::EffectTemplate;

/// Compact handle of a registered skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(pub u16);

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skill#{}", self.0)
    }
}

/// Which units a skill resolves against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkillTarget {
    SelfOnly,
    SingleEnemy,
    AllEnemies,
    SingleAlly,
    AllAllies,
}

impl SkillTarget {
    pub const fn hits_enemies(self) -> bool {
        matches!(self, Self::SingleEnemy | Self::AllEnemies)
    }
}

/// Content form of a skill.
///
/// The resolved amount is `base_damage + scaling_stat × scaling_ratio`;
/// negative amounts heal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSpec {
    pub name: String,
    pub target: SkillTarget,
    pub cooldown: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_damage: f64,
    #[cfg_attr(feature = "serde", serde(default = "SkillSpec::default_scaling_stat"))]
    pub scaling_stat: StatKey,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling_ratio: f64,
    #[cfg_attr(feature = "serde", serde(default = "SkillSpec::default_damage_type"))]
    pub damage_type: DamageType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Option<Element>,
    /// Falls back to the caster's effective attack range.
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<EffectTemplate>,
}

impl SkillSpec {
    pub fn new(name: impl Into<String>, target: SkillTarget, cooldown: f64) -> Self {
        Self {
            name: name.into(),
            target,
            cooldown,
            base_damage: 0.0,
            scaling_stat: Self::default_scaling_stat(),
            scaling_ratio: 0.0,
            damage_type: Self::default_damage_type(),
            element: None,
            range: None,
            effect: None,
        }
    }

    pub fn with_damage(mut self, base: f64, stat: StatKey, ratio: f64) -> Self {
        self.base_damage = base;
        self.scaling_stat = stat;
        self.scaling_ratio = ratio;
        self
    }

    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_range(mut self, range: f64) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_effect(mut self, effect: EffectTemplate) -> Self {
        self.effect = Some(effect);
        self
    }

    fn default_scaling_stat() -> StatKey {
        StatKey::Attack
    }

    fn default_damage_type() -> DamageType {
        DamageType::Physical
    }
}

/// A registered, validated skill.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillDef {
    pub id: SkillId,
    pub name: String,
    pub target: SkillTarget,
    pub cooldown: f64,
    pub base_damage: f64,
    pub scaling_stat: StatKey,
    pub scaling_ratio: f64,
    pub damage_type: DamageType,
    pub element: Option<Element>,
    pub range: Option<f64>,
    pub effect: Option<EffectTemplate>,
}

impl SkillDef {
    /// `base_damage + scaling_stat × scaling_ratio` against the caster's stats.
    pub fn amount(&self, caster: &crate::stats::StatBlock) -> f64 {
        self.base_damage + caster.get(self.scaling_stat) * self.scaling_ratio
    }
}

/// Read-only skill table, built once before a battle starts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillRegistry {
    defs: Vec<SkillDef>,
    by_name: BTreeMap<String, SkillId>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers every spec, failing on the first malformed one.
    pub fn from_specs(specs: impl IntoIterator<Item = SkillSpec>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(spec)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, spec: SkillSpec) -> Result<SkillId, RegistryError> {
        let entry = spec.name.as_str();
        if self.by_name.contains_key(entry) {
            return Err(RegistryError::Duplicate(spec.name));
        }
        RegistryError::check(entry, "cooldown", spec.cooldown, |v| v >= 0.0, ">= 0")?;
        RegistryError::check(entry, "base_damage", spec.base_damage, |_| true, "finite")?;
        RegistryError::check(entry, "scaling_ratio", spec.scaling_ratio, |_| true, "finite")?;
        if let Some(range) = spec.range {
            RegistryError::check(entry, "range", range, |v| v >= 0.0, ">= 0")?;
        }
        if let Some(effect) = &spec.effect {
            effect.validate()?;
        }

        let index = u16::try_from(self.defs.len()).map_err(|_| RegistryError::Capacity(self.defs.len()))?;
        let id = SkillId(index);
        self.by_name.insert(spec.name.clone(), id);
        self.defs.push(SkillDef {
            id,
            name: spec.name,
            target: spec.target,
            cooldown: spec.cooldown,
            base_damage: spec.base_damage,
            scaling_stat: spec.scaling_stat,
            scaling_ratio: spec.scaling_ratio,
            damage_type: spec.damage_type,
            element: spec.element,
            range: spec.range,
            effect: spec.effect,
        });
        Ok(id)
    }

    pub fn get(&self, id: SkillId) -> Option<&SkillDef> {
        self.defs.get(usize::from(id.0))
    }

    pub fn lookup(&self, name: &str) -> Option<SkillId> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
