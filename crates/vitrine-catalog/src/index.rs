//! Variant price index keyed by `(model, condition, storage_gb, market)`.

use std::collections::{BTreeMap, BTreeSet};

use vitrine_core::{Condition, Storages, Variant, VariantPrice};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantKey {
    pub model: String,
    pub condition: Condition,
    pub storage_gb: u32,
    pub market: String,
}

impl VariantKey {
    #[must_use]
    pub fn of(variant: &Variant) -> Self {
        Self {
            model: variant.model.clone(),
            condition: variant.condition,
            storage_gb: variant.storage_gb,
            market: variant.market.clone(),
        }
    }
}

impl std::fmt::Display for VariantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.model, self.condition, self.storage_gb, self.market
        )
    }
}

/// Last write wins on key collision.
#[derive(Debug, Clone, Default)]
pub struct VariantIndex {
    entries: BTreeMap<VariantKey, VariantPrice>,
}

impl VariantIndex {
    pub fn insert(&mut self, variant: &Variant) {
        let previous = self.entries.insert(
            VariantKey::of(variant),
            VariantPrice {
                price: variant.price,
                currency: variant.currency.clone(),
            },
        );
        if previous.is_some() {
            tracing::debug!(
                model = %variant.model,
                condition = %variant.condition,
                storage_gb = variant.storage_gb,
                market = %variant.market,
                "duplicate variant row overwrites earlier price"
            );
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VariantKey, &VariantPrice)> {
        self.entries.iter()
    }

    /// Entries for `model` in `market`.
    fn for_model_in_market<'a, 'q>(
        &'a self,
        model: &'q str,
        market: &'q str,
    ) -> impl Iterator<Item = (&'a VariantKey, &'a VariantPrice)> + use<'a, 'q> {
        self.entries
            .iter()
            .filter(move |(key, _)| key.model == model && key.market == market)
    }

    /// Distinct storage sizes per condition for `model` in `market`,
    /// ascending.
    #[must_use]
    pub fn storages_for(&self, model: &str, market: &str) -> Storages {
        let mut usado = BTreeSet::new();
        let mut novo = BTreeSet::new();
        for (key, _) in self.for_model_in_market(model, market) {
            match key.condition {
                Condition::Used => usado.insert(key.storage_gb),
                Condition::New => novo.insert(key.storage_gb),
            };
        }
        Storages {
            usado: usado.into_iter().collect(),
            novo: novo.into_iter().collect(),
        }
    }

    /// Cheapest entry for `model` in `market`, across both conditions.
    ///
    /// Ties keep the first entry in key order.
    #[must_use]
    pub fn min_price(&self, model: &str, market: &str) -> Option<&VariantPrice> {
        self.for_model_in_market(model, market)
            .map(|(_, price)| price)
            .reduce(|best, candidate| {
                if candidate.price < best.price {
                    candidate
                } else {
                    best
                }
            })
    }

    /// The wire form: composite key string to price.
    #[must_use]
    pub fn to_key_map(&self) -> BTreeMap<String, VariantPrice> {
        self.entries
            .iter()
            .map(|(key, price)| (key.to_string(), price.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn variant(model: &str, condition: Condition, gb: u32, market: &str, price: i64) -> Variant {
        Variant {
            id: crate::normalize::derive_id(model),
            model: model.to_string(),
            storage_gb: gb,
            market: market.to_string(),
            condition,
            price: Decimal::from(price),
            currency: if market == "AO" { "AOA" } else { "USD" }.to_string(),
            availability: String::new(),
        }
    }

    #[test]
    fn key_renders_pipe_separated() {
        let key = VariantKey::of(&variant("iPhone 13", Condition::Used, 128, "AO", 1));
        assert_eq!(key.to_string(), "iPhone 13|usado|128|AO");
    }

    #[test]
    fn insert_last_write_wins() {
        let mut index = VariantIndex::default();
        index.insert(&variant("iPhone 13", Condition::Used, 128, "AO", 100));
        index.insert(&variant("iPhone 13", Condition::Used, 128, "AO", 90));
        assert_eq!(index.len(), 1);
        let (_, price) = index.iter().next().expect("entry");
        assert_eq!(price.price, Decimal::from(90));
    }

    #[test]
    fn storages_are_sorted_deduplicated_and_market_scoped() {
        let mut index = VariantIndex::default();
        index.insert(&variant("iPhone 13", Condition::Used, 256, "AO", 1));
        index.insert(&variant("iPhone 13", Condition::Used, 128, "AO", 1));
        index.insert(&variant("iPhone 13", Condition::New, 512, "AO", 1));
        index.insert(&variant("iPhone 13", Condition::New, 64, "US", 1));
        index.insert(&variant("iPhone 12", Condition::New, 64, "AO", 1));

        let storages = index.storages_for("iPhone 13", "AO");
        assert_eq!(storages.usado, vec![128, 256]);
        assert_eq!(storages.novo, vec![512]);
        assert!(index.storages_for("iPhone 13", "PT").is_empty());
    }

    #[test]
    fn min_price_spans_conditions_within_market() {
        let mut index = VariantIndex::default();
        index.insert(&variant("iPhone 13", Condition::New, 256, "AO", 600_000));
        index.insert(&variant("iPhone 13", Condition::Used, 128, "AO", 450_000));
        index.insert(&variant("iPhone 13", Condition::Used, 64, "US", 10));

        let min = index.min_price("iPhone 13", "AO").expect("min price");
        assert_eq!(min.price, Decimal::from(450_000));
        assert_eq!(min.currency, "AOA");
        assert!(index.min_price("iPhone 14", "AO").is_none());
    }

    #[test]
    fn min_price_borrow_outlives_query_strings() {
        let mut index = VariantIndex::default();
        index.insert(&variant("iPhone 13", Condition::Used, 128, "AO", 450_000));

        let min = {
            let model = String::from("iPhone 13");
            let market = "ao".to_uppercase();
            index.min_price(&model, &market)
        };
        assert_eq!(min.map(|p| p.price), Some(Decimal::from(450_000)));
    }

    #[test]
    fn key_map_uses_composite_strings() {
        let mut index = VariantIndex::default();
        index.insert(&variant("iPhone 13", Condition::New, 256, "AO", 600_000));
        let map = index.to_key_map();
        assert!(map.contains_key("iPhone 13|novo|256|AO"));
    }
}
