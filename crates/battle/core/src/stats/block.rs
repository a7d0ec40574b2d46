//! Stat keys and the flat per-key value block.

/// Named combatant statistic.
///
/// Buffs, debuffs, skill scaling and synergies all address stats by key.
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
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatKey {
    MaxHp,
    Attack,
    Defense,
    MagicPower,
    MagicResist,
    /// Movement speed in distance units per second.
    Speed,
    /// Basic attacks per second.
    AttackSpeed,
    AttackRange,
    /// Probability in `[0, 1]`.
    CritChance,
    /// Damage multiplier applied on crit.
    CritDamage,
}

/// One `f64` per [`StatKey`].
///
/// Used for base stats, equipment bonuses, synergy percentages and the
/// effective result of the stat fold alike.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBlock {
    pub max_hp: f64,
    pub attack: f64,
    pub defense: f64,
    pub magic_power: f64,
    pub magic_resist: f64,
    pub speed: f64,
    pub attack_speed: f64,
    pub attack_range: f64,
    pub crit_chance: f64,
    pub crit_damage: f64,
}

impl StatBlock {
    /// A block with every stat at zero.
    pub const ZERO: Self = Self {
        max_hp: 0.0,
        attack: 0.0,
        defense: 0.0,
        magic_power: 0.0,
        magic_resist: 0.0,
        speed: 0.0,
        attack_speed: 0.0,
        attack_range: 0.0,
        crit_chance: 0.0,
        crit_damage: 0.0,
    };

    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::MaxHp => self.max_hp,
            StatKey::Attack => self.attack,
            StatKey::Defense => self.defense,
            StatKey::MagicPower => self.magic_power,
            StatKey::MagicResist => self.magic_resist,
            StatKey::Speed => self.speed,
            StatKey::AttackSpeed => self.attack_speed,
            StatKey::AttackRange => self.attack_range,
            StatKey::CritChance => self.crit_chance,
            StatKey::CritDamage => self.crit_damage,
        }
    }

    pub fn get_mut(&mut self, key: StatKey) -> &mut f64 {
        match key {
            StatKey::MaxHp => &mut self.max_hp,
            StatKey::Attack => &mut self.attack,
            StatKey::Defense => &mut self.defense,
            StatKey::MagicPower => &mut self.magic_power,
            StatKey::MagicResist => &mut self.magic_resist,
            StatKey::Speed => &mut self.speed,
            StatKey::AttackSpeed => &mut self.attack_speed,
            StatKey::AttackRange => &mut self.attack_range,
            StatKey::CritChance => &mut self.crit_chance,
            StatKey::CritDamage => &mut self.crit_damage,
        }
    }

    /// Adds `value` to a single stat.
    pub fn add(&mut self, key: StatKey, value: f64) {
        *self.get_mut(key) += value;
    }

    /// Builder-style setter.
    pub fn with(mut self, key: StatKey, value: f64) -> Self {
        *self.get_mut(key) = value;
        self
    }

    /// Per-key sum of two blocks.
    pub fn plus(&self, other: &StatBlock) -> StatBlock {
        let mut out = *self;
        for key in <StatKey as strum::IntoEnumIterator>::iter() {
            out.add(key, other.get(key));
        }
        out
    }

    /// First key holding a NaN or infinite value, if any.
    pub fn first_non_finite(&self) -> Option<(StatKey, f64)> {
        <StatKey as strum::IntoEnumIterator>::iter()
            .map(|key| (key, self.get(key)))
            .find(|(_, value)| !value.is_finite())
    }
}
