//! Accumulated threat, owned by the orchestrator and lent to targeting.

use std::collections::BTreeMap;

use crate::combatant::CombatantId;

/// victim → attacker → accumulated threat.
///
/// Purely additive; there is no decay. [`ThreatTable::reset`] is called at
/// encounter boundaries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThreatTable {
    entries: BTreeMap<CombatantId, BTreeMap<CombatantId, f64>>,
}

impl ThreatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `attacker` with `amount` threat on `victim`'s table.
    pub fn register(&mut self, attacker: CombatantId, victim: CombatantId, amount: f64) {
        if !(amount > 0.0) || !amount.is_finite() {
            return;
        }
        *self
            .entries
            .entry(victim)
            .or_default()
            .entry(attacker)
            .or_insert(0.0) += amount;
    }

    /// Threat `attacker` has generated against `victim`.
    pub fn threat(&self, victim: CombatantId, attacker: CombatantId) -> f64 {
        self.entries
            .get(&victim)
            .and_then(|table| table.get(&attacker))
            .copied()
            .unwrap_or(0.0)
    }

    /// Total threat accumulated on `victim`'s table.
    pub fn total_against(&self, victim: CombatantId) -> f64 {
        self.entries
            .get(&victim)
            .map_or(0.0, |table| table.values().sum())
    }

    /// Total threat `attacker` has generated across every victim.
    pub fn generated_by(&self, attacker: CombatantId) -> f64 {
        self.entries
            .values()
            .filter_map(|table| table.get(&attacker))
            .sum()
    }

    /// Share of `victim`'s accumulated threat contributed by `attacker`, in `[0, 1]`.
    pub fn share(&self, victim: CombatantId, attacker: CombatantId) -> f64 {
        let total = self.total_against(victim);
        if total > 0.0 {
            self.threat(victim, attacker) / total
        } else {
            0.0
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: CombatantId = CombatantId(1);
    const B: CombatantId = CombatantId(2);
    const V: CombatantId = CombatantId(9);

    #[test]
    fn threat_accumulates_per_pair() {
        let mut threat = ThreatTable::new();
        threat.register(A, V, 30.0);
        threat.register(A, V, 10.0);
        threat.register(B, V, 60.0);

        assert_eq!(threat.threat(V, A), 40.0);
        assert_eq!(threat.total_against(V), 100.0);
        assert!((threat.share(V, B) - 0.6).abs() < 1e-12);
        assert_eq!(threat.generated_by(A), 40.0);
    }

    #[test]
    fn non_positive_amounts_are_ignored() {
        let mut threat = ThreatTable::new();
        threat.register(A, V, 0.0);
        threat.register(A, V, -5.0);
        threat.register(A, V, f64::NAN);
        assert_eq!(threat.total_against(V), 0.0);
        assert_eq!(threat.share(V, A), 0.0);
    }

    #[test]
    fn reset_forgets_everything() {
        let mut threat = ThreatTable::new();
        threat.register(A, V, 5.0);
        threat.reset();
        assert_eq!(threat.generated_by(A), 0.0);
    }
}
