//! Luck and dryness evaluation for observed items

use crate::attempts::KillCountTable;
use crate::catalog::{CatalogError, DropCatalog};
use crate::config::PlayerConfig;
use crate::types::{Evaluation, LuckResult, ObservedItem};
use rayon::prelude::*;

/// Evaluates observed items against a drop catalog
///
/// Holds no state besides the catalog, so one calculator can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct LuckDrynessCalculator {
    catalog: DropCatalog,
}

impl LuckDrynessCalculator {
    pub fn new(catalog: DropCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &DropCatalog {
        &self.catalog
    }

    /// Luck and dryness for one item, or the reason there are none
    ///
    /// Fails only when the catalog has no drop for the item.
    pub fn evaluate(
        &self,
        item: &ObservedItem,
        kill_counts: &KillCountTable,
        config: Option<&dyn PlayerConfig>,
    ) -> Result<Evaluation, CatalogError> {
        let drop = self.catalog.resolve(item)?;

        if let Some(reason) = drop.incalculable_reason(config) {
            return Ok(Evaluation::Incalculable(reason));
        }

        let attempts = drop.resolve_attempts(kill_counts, config);
        let observed = drop.resolve_observed(item.quantity, config);
        tracing::debug!(
            item = %item.name,
            attempts = attempts.total(),
            observed,
            kind = %drop.kind(),
            "evaluating drop"
        );

        let tails = drop.tails(&attempts, observed);
        let result = LuckResult::new(tails.below, tails.above);

        if !result.is_finite() {
            tracing::error!(
                item = %item.name,
                luck = result.luck,
                dryness = result.dryness,
                "non-finite luck result"
            );
            return Ok(Evaluation::Incalculable(format!(
                "Luck for {} could not be calculated",
                item.name
            )));
        }

        Ok(Evaluation::Computed(result))
    }

    /// Evaluate many items in parallel, preserving input order
    pub fn evaluate_all(
        &self,
        items: &[ObservedItem],
        kill_counts: &KillCountTable,
        config: Option<&dyn PlayerConfig>,
    ) -> Vec<Result<Evaluation, CatalogError>> {
        items
            .par_iter()
            .map(|item| self.evaluate(item, kill_counts, config))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::config::{ConfigAdjustment, OptionValue};
    use crate::drops::Drop;
    use proptest::prelude::*;
    use std::collections::HashMap;

    const TANZANITE_FANG: i32 = 12922;
    const ZULRAH_SCALES: i32 = 12934;
    const PET_CHAOS_ELEMENTAL: i32 = 11995;
    const TWISTED_BOW: i32 = 20997;

    fn calculator() -> LuckDrynessCalculator {
        let entries = vec![
            CatalogEntry {
                item_id: TANZANITE_FANG,
                item_name: "Tanzanite fang".to_string(),
                drop: Drop::binomial().roll("Zulrah", 0.01).build().unwrap(),
            },
            CatalogEntry {
                item_id: ZULRAH_SCALES,
                item_name: "Zulrah's scales".to_string(),
                drop: Drop::uniform_sum(100, 299)
                    .roll("Zulrah", 1.0)
                    .with_adjustment(
                        ConfigAdjustment::observed_subtract("scales_bought")
                            .with_label("Bought Zulrah's scales"),
                    )
                    .build()
                    .unwrap(),
            },
            CatalogEntry {
                item_id: PET_CHAOS_ELEMENTAL,
                item_name: "Pet chaos elemental".to_string(),
                drop: Drop::binomial()
                    .roll("Chaos Elemental", 1.0 / 300.0)
                    .with_adjustment(
                        ConfigAdjustment::feature_gate("model_pet_reroll")
                            .with_label("Pet chaos elemental rerolls"),
                    )
                    .build()
                    .unwrap(),
            },
            CatalogEntry {
                item_id: TWISTED_BOW,
                item_name: "Twisted bow".to_string(),
                drop: Drop::guaranteed_once(101)
                    .roll("Chambers of Xeric", 0.01)
                    .with_adjustment(ConfigAdjustment::attempt_subtract("cox_solo_raids"))
                    .build()
                    .unwrap(),
            },
        ];
        LuckDrynessCalculator::new(DropCatalog::from_entries(entries).unwrap())
    }

    fn kill_counts() -> KillCountTable {
        [("Zulrah", 100), ("Chaos Elemental", 300), ("Chambers of Xeric", 111)]
            .into_iter()
            .collect()
    }

    fn computed(evaluation: Evaluation) -> LuckResult {
        match evaluation {
            Evaluation::Computed(result) => result,
            Evaluation::Incalculable(reason) => panic!("unexpected reason: {reason}"),
        }
    }

    #[test]
    fn test_plain_binomial() {
        let calc = calculator();
        let item = ObservedItem::new(TANZANITE_FANG, "Tanzanite fang", 1);
        let result = computed(calc.evaluate(&item, &kill_counts(), None).unwrap());
        assert!((result.luck - 0.36603).abs() < 1e-5);
        assert!((result.dryness - 0.26424).abs() < 1e-5);
    }

    #[test]
    fn test_feature_gate_toggles_reason() {
        let calc = calculator();
        let item = ObservedItem::new(PET_CHAOS_ELEMENTAL, "Pet chaos elemental", 0);
        let mut config: HashMap<String, OptionValue> = HashMap::new();

        config.insert("model_pet_reroll".to_string(), OptionValue::Bool(false));
        let evaluation = calc.evaluate(&item, &kill_counts(), Some(&config)).unwrap();
        let reason = evaluation.reason().unwrap();
        assert!(reason.contains("Pet chaos elemental rerolls"));

        config.insert("model_pet_reroll".to_string(), OptionValue::Bool(true));
        let result = computed(calc.evaluate(&item, &kill_counts(), Some(&config)).unwrap());
        // Nothing observed, so nobody has fewer
        assert_eq!(result.luck, 0.0);
        assert!(result.dryness > 0.6);
    }

    #[test]
    fn test_foreign_log_is_incalculable() {
        let calc = calculator();
        let item = ObservedItem::new(ZULRAH_SCALES, "Zulrah's scales", 20_000);
        let evaluation = calc.evaluate(&item, &kill_counts(), None).unwrap();
        assert_eq!(
            evaluation.reason(),
            Some("Bought Zulrah's scales is only available for your own character")
        );
    }

    #[test]
    fn test_observed_subtract_applies() {
        let calc = calculator();
        let table = kill_counts();
        let mut config: HashMap<String, OptionValue> = HashMap::new();
        config.insert("scales_bought".to_string(), OptionValue::Int(5_000));

        // 100 kills averaging 199.5 scales; 24_950 observed minus 5_000 bought
        let item = ObservedItem::new(ZULRAH_SCALES, "Zulrah's scales", 24_950);
        let result = computed(calc.evaluate(&item, &table, Some(&config)).unwrap());
        assert!((result.luck - 0.5).abs() < 0.01);
        assert!((result.dryness - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_attempt_subtract_and_guarantee() {
        let calc = calculator();
        let mut config: HashMap<String, OptionValue> = HashMap::new();
        // 111 raids minus 10 solo raids = 101 attempts, which reaches the guarantee
        config.insert("cox_solo_raids".to_string(), OptionValue::Int(10));

        let item = ObservedItem::new(TWISTED_BOW, "Twisted bow", 2);
        let result = computed(calc.evaluate(&item, &kill_counts(), Some(&config)).unwrap());
        assert!((result.luck - 0.36603).abs() < 1e-5);
        assert!((result.dryness - 0.26424).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_item_is_an_error() {
        let calc = calculator();
        let item = ObservedItem::new(1, "Bucket", 1);
        assert!(matches!(
            calc.evaluate(&item, &kill_counts(), None),
            Err(CatalogError::UnknownItem { id: 1, .. })
        ));
    }

    #[test]
    fn test_evaluate_all_preserves_order() {
        let calc = calculator();
        let items = vec![
            ObservedItem::new(TANZANITE_FANG, "Tanzanite fang", 1),
            ObservedItem::new(1, "Bucket", 1),
            ObservedItem::new(ZULRAH_SCALES, "Zulrah's scales", 1),
        ];
        let results = calc.evaluate_all(&items, &kill_counts(), None);
        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], Ok(Evaluation::Computed(_))));
        assert!(results[1].is_err());
        assert!(matches!(results[2], Ok(Evaluation::Incalculable(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_evaluate_is_idempotent(kc in 0u64..20_000, quantity in 0u64..5_000_000) {
            let calc = calculator();
            let table: KillCountTable = [("Zulrah", kc)].into_iter().collect();
            let mut config: HashMap<String, OptionValue> = HashMap::new();
            config.insert("scales_bought".to_string(), OptionValue::Int(0));

            let item = ObservedItem::new(ZULRAH_SCALES, "Zulrah's scales", quantity);
            let first = calc.evaluate(&item, &table, Some(&config)).unwrap();
            let second = calc.evaluate(&item, &table, Some(&config)).unwrap();
            let (a, b) = (first.result().unwrap(), second.result().unwrap());
            prop_assert_eq!(a.luck.to_bits(), b.luck.to_bits());
            prop_assert_eq!(a.dryness.to_bits(), b.dryness.to_bits());
        }
    }
}
