//! Elemental advantage and reaction tables.
//!
//! Advantage is directional: the table lists, per attacking element, the
//! elements it dominates. Reactions are order-independent: they are keyed by
//! the two elements sorted by name.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::RegistryError;
use crate::status::{EffectKind, EffectTemplate};
use crate::stats::StatKey;

/// Elemental affinity of a combatant, skill or status effect.
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
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Element {
    Fire,
    Ice,
    Lightning,
    Water,
    Nature,
    Light,
    Dark,
}

impl Element {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Canonical, order-independent key of an elemental pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactionKey(Element, Element);

impl ReactionKey {
    /// Sorts the pair lexicographically by element name.
    ///
    /// Returns `None` for a same-element pair: an element never reacts with
    /// itself.
    pub fn new(a: Element, b: Element) -> Option<Self> {
        if a == b {
            return None;
        }
        if a.name() <= b.name() {
            Some(Self(a, b))
        } else {
            Some(Self(b, a))
        }
    }

    pub fn elements(&self) -> (Element, Element) {
        (self.0, self.1)
    }
}

impl fmt::Display for ReactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.0, self.1)
    }
}

/// A validated reaction entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Reaction {
    pub name: String,
    /// Bonus damage is `round(hit × (multiplier − 1))`.
    pub multiplier: f64,
    pub effect: Option<EffectTemplate>,
}

/// Content form of a reaction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactionSpec {
    pub name: String,
    pub pair: (Element, Element),
    pub multiplier: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<EffectTemplate>,
}

/// Content form of the whole element table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementTableSpec {
    pub advantage_multiplier: f64,
    pub disadvantage_multiplier: f64,
    pub advantages: Vec<(Element, Vec<Element>)>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reactions: Vec<ReactionSpec>,
}

/// Read-only element data consulted by targeting and damage resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementTable {
    advantage_multiplier: f64,
    disadvantage_multiplier: f64,
    advantages: BTreeMap<Element, Vec<Element>>,
    reactions: BTreeMap<ReactionKey, Reaction>,
}

impl ElementTable {
    pub const DEFAULT_ADVANTAGE: f64 = 1.5;
    pub const DEFAULT_DISADVANTAGE: f64 = 0.75;

    /// Validates a spec into a table.
    pub fn from_spec(spec: ElementTableSpec) -> Result<Self, RegistryError> {
        let advantage_multiplier = RegistryError::check(
            "element table",
            "advantage_multiplier",
            spec.advantage_multiplier,
            |v| v > 1.0,
            "> 1",
        )?;
        let disadvantage_multiplier = RegistryError::check(
            "element table",
            "disadvantage_multiplier",
            spec.disadvantage_multiplier,
            |v| v > 0.0 && v < 1.0,
            "in (0, 1)",
        )?;

        let mut advantages: BTreeMap<Element, Vec<Element>> = BTreeMap::new();
        for (attacker, dominated) in spec.advantages {
            let entry = advantages.entry(attacker).or_default();
            for element in dominated {
                if element != attacker && !entry.contains(&element) {
                    entry.push(element);
                }
            }
        }

        let mut reactions = BTreeMap::new();
        for reaction in spec.reactions {
            let (a, b) = reaction.pair;
            let key = ReactionKey::new(a, b).ok_or(RegistryError::SelfReaction(a))?;
            RegistryError::check(
                &reaction.name,
                "multiplier",
                reaction.multiplier,
                |v| v >= 1.0,
                ">= 1",
            )?;
            if let Some(effect) = &reaction.effect {
                effect.validate()?;
            }
            if reactions.contains_key(&key) {
                return Err(RegistryError::Duplicate(key.to_string()));
            }
            reactions.insert(
                key,
                Reaction {
                    name: reaction.name,
                    multiplier: reaction.multiplier,
                    effect: reaction.effect,
                },
            );
        }

        Ok(Self {
            advantage_multiplier,
            disadvantage_multiplier,
            advantages,
            reactions,
        })
    }

    /// True when `attacker` dominates `target`.
    pub fn has_advantage(&self, attacker: Option<Element>, target: Option<Element>) -> bool {
        match (attacker, target) {
            (Some(attacker), Some(target)) => self
                .advantages
                .get(&attacker)
                .is_some_and(|dominated| dominated.contains(&target)),
            _ => false,
        }
    }

    /// Damage multiplier for an `attacker` element hitting a `target` element.
    ///
    /// Advantage is checked first, so a mutual pair yields the advantage
    /// multiplier for both sides.
    pub fn multiplier(&self, attacker: Option<Element>, target: Option<Element>) -> f64 {
        if self.has_advantage(attacker, target) {
            self.advantage_multiplier
        } else if self.has_advantage(target, attacker) {
            self.disadvantage_multiplier
        } else {
            1.0
        }
    }

    pub fn reaction(&self, a: Element, b: Element) -> Option<(ReactionKey, &Reaction)> {
        let key = ReactionKey::new(a, b)?;
        self.reactions.get(&key).map(|reaction| (key, reaction))
    }

    pub fn advantage_multiplier(&self) -> f64 {
        self.advantage_multiplier
    }

    pub fn disadvantage_multiplier(&self) -> f64 {
        self.disadvantage_multiplier
    }

    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    /// The built-in table used when no content overrides it.
    pub fn default_spec() -> ElementTableSpec {
        use Element::*;

        ElementTableSpec {
            advantage_multiplier: Self::DEFAULT_ADVANTAGE,
            disadvantage_multiplier: Self::DEFAULT_DISADVANTAGE,
            advantages: vec![
                (Fire, vec![Ice, Nature]),
                (Water, vec![Fire]),
                (Ice, vec![Water]),
                (Lightning, vec![Water]),
                (Nature, vec![Lightning]),
                (Light, vec![Dark]),
                (Dark, vec![Light]),
            ],
            reactions: vec![
                ReactionSpec {
                    name: "melt".into(),
                    pair: (Fire, Ice),
                    multiplier: 1.5,
                    effect: None,
                },
                ReactionSpec {
                    name: "overload".into(),
                    pair: (Fire, Lightning),
                    multiplier: 1.4,
                    effect: None,
                },
                ReactionSpec {
                    name: "superconduct".into(),
                    pair: (Ice, Lightning),
                    multiplier: 1.2,
                    effect: Some(EffectTemplate::new(
                        "superconduct",
                        EffectKind::Debuff {
                            stat: StatKey::Defense,
                            value: 20.0,
                        },
                        4.0,
                    )),
                },
                ReactionSpec {
                    name: "electrocharged".into(),
                    pair: (Lightning, Water),
                    multiplier: 1.3,
                    effect: None,
                },
                ReactionSpec {
                    name: "wildfire".into(),
                    pair: (Fire, Nature),
                    multiplier: 1.2,
                    effect: Some(EffectTemplate::new(
                        "wildfire",
                        EffectKind::Dot {
                            damage: 8.0,
                            interval: 1.0,
                        },
                        3.0,
                    )),
                },
                ReactionSpec {
                    name: "freeze".into(),
                    pair: (Ice, Water),
                    multiplier: 1.0,
                    effect: Some(EffectTemplate::new("freeze", EffectKind::Stun, 1.0)),
                },
            ],
        }
    }
}

impl Default for ElementTable {
    fn default() -> Self {
        match Self::from_spec(Self::default_spec()) {
            Ok(table) => table,
            Err(err) => unreachable!("built-in element table is valid: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Element::*;

    #[test]
    fn advantage_and_disadvantage_are_inverse() {
        let table = ElementTable::default();

        assert_eq!(table.multiplier(Some(Fire), Some(Ice)), 1.5);
        assert_eq!(table.multiplier(Some(Ice), Some(Fire)), 0.75);
    }

    #[test]
    fn neutral_pairs_yield_one() {
        let table = ElementTable::default();

        assert_eq!(table.multiplier(Some(Fire), Some(Fire)), 1.0);
        assert_eq!(table.multiplier(Some(Ice), Some(Lightning)), 1.0);
        assert_eq!(table.multiplier(None, Some(Fire)), 1.0);
        assert_eq!(table.multiplier(Some(Fire), None), 1.0);
    }

    #[test]
    fn reaction_key_is_order_independent() {
        assert_eq!(ReactionKey::new(Fire, Ice), ReactionKey::new(Ice, Fire));
        assert_eq!(
            ReactionKey::new(Water, Lightning).map(|k| k.to_string()),
            Some("lightning+water".to_owned())
        );
        assert!(ReactionKey::new(Fire, Fire).is_none());
    }

    #[test]
    fn reaction_lookup_matches_either_order() {
        let table = ElementTable::default();
        let (_, melt) = table.reaction(Ice, Fire).unwrap();
        assert_eq!(melt.name, "melt");
        assert!(table.reaction(Fire, Fire).is_none());
        assert!(table.reaction(Light, Dark).is_none());
    }

    #[test]
    fn spec_rejects_self_reaction() {
        let mut spec = ElementTable::default_spec();
        spec.reactions.push(ReactionSpec {
            name: "fizzle".into(),
            pair: (Fire, Fire),
            multiplier: 1.1,
            effect: None,
        });
        assert_eq!(
            ElementTable::from_spec(spec),
            Err(RegistryError::SelfReaction(Fire))
        );
    }

    #[test]
    fn spec_rejects_duplicate_pairing() {
        let mut spec = ElementTable::default_spec();
        spec.reactions.push(ReactionSpec {
            name: "steam".into(),
            pair: (Ice, Fire),
            multiplier: 1.1,
            effect: None,
        });
        assert!(matches!(
            ElementTable::from_spec(spec),
            Err(RegistryError::Duplicate(_))
        ));
    }

    #[test]
    fn spec_rejects_disadvantage_above_one() {
        let mut spec = ElementTable::default_spec();
        spec.disadvantage_multiplier = 1.2;
        assert!(ElementTable::from_spec(spec).is_err());
    }
}
