//! Kill counts and attempt aggregation
//!
//! Turns a drop's roll specifications and a kill-count snapshot into the
//! binomial terms that generate the success count.

use crate::config::{total_for_role, AdjustmentRole, ConfigAdjustment, PlayerConfig};
use crate::roll::RollSpec;
use crate::stats::{binomial_window, DiscretePmf};
use std::collections::HashMap;

/// Kill counts by source name
///
/// Inserting the same name twice adds the counts together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillCountTable {
    counts: HashMap<String, u64>,
}

impl KillCountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` kills to `name`
    pub fn insert(&mut self, name: impl Into<String>, count: u64) {
        let entry = self.counts.entry(name.into()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Kill count for `name`, 0 when unknown
    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// (name, count) pairs sorted by name
    pub fn entries(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort();
        entries
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for KillCountTable {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, count) in iter {
            table.insert(name, count);
        }
        table
    }
}

/// `trials` independent rolls at `chance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinomialTerm {
    pub trials: u64,
    pub chance: f64,
}

/// Resolved attempts for one drop
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attempts {
    terms: Vec<BinomialTerm>,
}

impl Attempts {
    /// Group raw terms by drop chance, preserving first-appearance order
    pub fn from_terms(raw: impl IntoIterator<Item = BinomialTerm>) -> Self {
        let mut terms: Vec<BinomialTerm> = Vec::new();
        for term in raw {
            match terms
                .iter_mut()
                .find(|t| t.chance.to_bits() == term.chance.to_bits())
            {
                Some(existing) => existing.trials = existing.trials.saturating_add(term.trials),
                None => terms.push(term),
            }
        }
        Self { terms }
    }

    /// A single homogeneous term
    pub fn single(trials: u64, chance: f64) -> Self {
        Self {
            terms: vec![BinomialTerm { trials, chance }],
        }
    }

    pub fn terms(&self) -> &[BinomialTerm] {
        &self.terms
    }

    /// Total attempts across all terms
    pub fn total(&self) -> u64 {
        self.terms
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.trials))
    }

    /// `(n, p)` when every roll shares one chance
    pub fn homogeneous(&self) -> Option<(u64, f64)> {
        match self.terms.as_slice() {
            [] => Some((0, 1.0)),
            [only] => Some((only.trials, only.chance)),
            _ => None,
        }
    }

    /// E[K] for the success count K
    pub fn expected_successes(&self) -> f64 {
        self.terms
            .iter()
            .map(|t| t.trials as f64 * t.chance)
            .sum()
    }

    /// Var(K) for the success count K
    pub fn success_variance(&self) -> f64 {
        self.terms
            .iter()
            .map(|t| t.trials as f64 * t.chance * (1.0 - t.chance))
            .sum()
    }

    /// Smallest and largest success counts with representable probability
    pub fn success_bounds(&self) -> (u64, u64) {
        self.terms.iter().fold((0u64, 0u64), |(lo, hi), t| {
            let (term_lo, term_hi) = binomial_window(t.trials, t.chance);
            (lo.saturating_add(term_lo), hi.saturating_add(term_hi))
        })
    }

    /// Remove `amount` attempts, draining terms in order and flooring at 0
    pub fn subtract(mut self, amount: u64) -> Self {
        let mut remaining = amount;
        for term in &mut self.terms {
            if remaining == 0 {
                break;
            }
            let taken = remaining.min(term.trials);
            term.trials -= taken;
            remaining -= taken;
        }
        self
    }

    /// Distribution of the success count
    ///
    /// A single term is a plain binomial; several terms are convolved into
    /// a Poisson-binomial.
    pub fn success_distribution(&self) -> DiscretePmf {
        self.terms
            .iter()
            .map(|t| DiscretePmf::binomial(t.trials, t.chance))
            .reduce(|acc, next| acc.convolve(&next))
            .unwrap_or_else(|| DiscretePmf::point(0))
    }
}

/// Resolve the attempts for a drop against a kill-count snapshot
pub fn aggregate(
    rolls: &[RollSpec],
    kill_counts: &KillCountTable,
    adjustments: &[ConfigAdjustment],
    config: Option<&dyn PlayerConfig>,
) -> Attempts {
    let attempts = Attempts::from_terms(rolls.iter().map(|roll| BinomialTerm {
        trials: kill_counts
            .get(&roll.source)
            .saturating_mul(roll.attempts_per_unit),
        chance: roll.drop_chance,
    }));

    let subtract = total_for_role(adjustments, AdjustmentRole::AttemptSubtract, config);
    attempts.subtract(subtract)
}

/// Resolve the observed quantity after observed-subtract options
pub fn resolve_observed(
    quantity: u64,
    adjustments: &[ConfigAdjustment],
    config: Option<&dyn PlayerConfig>,
) -> u64 {
    quantity.saturating_sub(total_for_role(
        adjustments,
        AdjustmentRole::ObservedSubtract,
        config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptionValue;

    #[test]
    fn test_kill_count_duplicates_are_summed() {
        let table: KillCountTable = [("Vorkath", 10), ("Zulrah", 3), ("Vorkath", 5)]
            .into_iter()
            .collect();
        assert_eq!(table.get("Vorkath"), 15);
        assert_eq!(table.get("Zulrah"), 3);
        assert_eq!(table.get("Kraken"), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_equal_chances_are_merged() {
        let rolls = vec![
            RollSpec::new("Chambers of Xeric", 0.1),
            RollSpec::new("Chambers of Xeric (CM)", 0.1),
        ];
        let kc: KillCountTable = [("Chambers of Xeric", 100_000), ("Chambers of Xeric (CM)", 200_000)]
            .into_iter()
            .collect();

        let attempts = aggregate(&rolls, &kc, &[], None);
        assert_eq!(attempts.homogeneous(), Some((300_000, 0.1)));
        assert_eq!(attempts.total(), 300_000);
    }

    #[test]
    fn test_attempts_per_unit_multiplies() {
        let rolls = vec![RollSpec::new("Barrows Chests", 1.0 / 400.0).with_attempts_per_unit(7)];
        let kc: KillCountTable = [("Barrows Chests", 10)].into_iter().collect();
        assert_eq!(aggregate(&rolls, &kc, &[], None).total(), 70);
    }

    #[test]
    fn test_differing_chances_stay_separate() {
        let rolls = vec![
            RollSpec::new("Wintertodt", 0.01),
            RollSpec::new("Tempoross", 0.02),
            RollSpec::new("Wintertodt", 0.01),
        ];
        let kc: KillCountTable = [("Wintertodt", 10), ("Tempoross", 20)].into_iter().collect();

        let attempts = aggregate(&rolls, &kc, &[], None);
        assert_eq!(attempts.homogeneous(), None);
        assert_eq!(
            attempts.terms(),
            &[
                BinomialTerm { trials: 20, chance: 0.01 },
                BinomialTerm { trials: 20, chance: 0.02 },
            ]
        );
        assert!((attempts.expected_successes() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_attempt_subtract_floors_at_zero() {
        let rolls = vec![RollSpec::new("Vorkath", 0.001)];
        let kc: KillCountTable = [("Vorkath", 10)].into_iter().collect();
        let adjustments = vec![ConfigAdjustment::attempt_subtract("skipped")];

        let mut config = HashMap::new();
        config.insert("skipped".to_string(), OptionValue::Int(4));
        let attempts = aggregate(&rolls, &kc, &adjustments, Some(&config));
        assert_eq!(attempts.total(), 6);

        config.insert("skipped".to_string(), OptionValue::Int(25));
        let attempts = aggregate(&rolls, &kc, &adjustments, Some(&config));
        assert_eq!(attempts.total(), 0);
    }

    #[test]
    fn test_subtract_carries_across_terms() {
        let attempts = Attempts::from_terms([
            BinomialTerm { trials: 3, chance: 0.5 },
            BinomialTerm { trials: 10, chance: 0.25 },
        ])
        .subtract(5);
        assert_eq!(
            attempts.terms(),
            &[
                BinomialTerm { trials: 0, chance: 0.5 },
                BinomialTerm { trials: 8, chance: 0.25 },
            ]
        );
    }

    #[test]
    fn test_observed_subtract_floors_at_zero() {
        let adjustments = vec![ConfigAdjustment::observed_subtract("bought")];
        let mut config = HashMap::new();
        config.insert("bought".to_string(), OptionValue::Int(2));
        assert_eq!(resolve_observed(5, &adjustments, Some(&config)), 3);
        assert_eq!(resolve_observed(1, &adjustments, Some(&config)), 0);
        assert_eq!(resolve_observed(5, &adjustments, None), 5);
    }

    #[test]
    fn test_poisson_binomial_distribution() {
        // Two rolls at 1/2 and one at 1/4:
        // P(K=0) = 1/4 * 3/4, P(K=3) = 1/4 * 1/4
        let attempts = Attempts::from_terms([
            BinomialTerm { trials: 2, chance: 0.5 },
            BinomialTerm { trials: 1, chance: 0.25 },
        ]);
        let pmf = attempts.success_distribution();
        assert!((pmf.probability(0) - 0.1875).abs() < 1e-12);
        assert!((pmf.probability(1) - 0.4375).abs() < 1e-12);
        assert!((pmf.probability(2) - 0.3125).abs() < 1e-12);
        assert!((pmf.probability(3) - 0.0625).abs() < 1e-12);
        assert!((pmf.variance() - attempts.success_variance()).abs() < 1e-12);
    }
}
