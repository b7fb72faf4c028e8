//! Featured selection: a short, ordered list of products available in a city.

use std::collections::HashSet;

use vitrine_core::{FeaturedItem, FeaturedPayload};

use crate::build::Catalog;
use crate::normalize::normalize_model;

pub const DEFAULT_FEATURED_COUNT: usize = 8;
pub const MAX_FEATURED_COUNT: usize = 20;

/// Clamps a requested count to `1..=20`, defaulting to 8.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn clamp_count(count: Option<i64>) -> usize {
    count.map_or(DEFAULT_FEATURED_COUNT, |c| {
        usize::try_from(c.clamp(1, MAX_FEATURED_COUNT as i64)).unwrap_or(DEFAULT_FEATURED_COUNT)
    })
}

/// Prefixes root-relative paths with `base_url` (scheme + host). Anything
/// else passes through unchanged.
#[must_use]
pub fn absolutize_image(image: &str, base_url: &str) -> String {
    if image.starts_with('/') {
        format!("{}{image}", base_url.trim_end_matches('/'))
    } else {
        image.to_string()
    }
}

/// Selects the featured items from an already-built catalog.
///
/// Keeps products available in `city`, prices each at its cheapest variant
/// in the catalog's market, puts `preferred` models first (in list order),
/// then the rest in catalog order, and truncates to `count`.
#[must_use]
pub fn select_featured(
    catalog: &Catalog,
    city: &str,
    count: usize,
    preferred: &[String],
    base_url: Option<&str>,
) -> FeaturedPayload {
    let count = count.clamp(1, MAX_FEATURED_COUNT);

    let candidates: Vec<FeaturedItem> = catalog
        .products
        .iter()
        .filter(|product| product.is_available_in(city))
        .filter_map(|product| {
            let min = catalog.variants.min_price(&product.model, &catalog.market)?;
            let image = product.image.as_deref().map(|img| match base_url {
                Some(base) => absolutize_image(img, base),
                None => img.to_string(),
            });
            Some(FeaturedItem {
                id: product.id.clone(),
                model: product.model.clone(),
                image,
                min_price: min.price,
                currency: min.currency.clone(),
            })
        })
        .collect();

    let mut ordered: Vec<&FeaturedItem> = Vec::with_capacity(candidates.len());
    let mut taken: HashSet<&str> = HashSet::new();

    for wanted in preferred {
        let wanted = normalize_model(wanted);
        if let Some(item) = candidates
            .iter()
            .find(|item| item.model.eq_ignore_ascii_case(&wanted))
        {
            if taken.insert(item.model.as_str()) {
                ordered.push(item);
            }
        }
    }
    for item in &candidates {
        if taken.insert(item.model.as_str()) {
            ordered.push(item);
        }
    }

    let items: Vec<FeaturedItem> = ordered.into_iter().take(count).cloned().collect();

    tracing::debug!(
        market = %catalog.market,
        city,
        available = candidates.len(),
        returned = items.len(),
        "featured selection"
    );

    FeaturedPayload {
        market: catalog.market.clone(),
        count,
        items,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rust_decimal::Decimal;

    use super::*;
    use crate::attributes::FixedAttributes;
    use crate::build::build_catalog;
    use crate::source::{Record, SHEET_PRICES_NEW, SHEET_PRICES_USED};

    fn row(model: &str, price: &str, availability: &str) -> Record {
        Record::new()
            .with("model", model)
            .with("storage_gb", 128.0)
            .with("price", price)
            .with("disponibilidade", availability)
    }

    fn catalog(used: Vec<Record>, new: Vec<Record>) -> Catalog {
        let sheets = HashMap::from([
            (SHEET_PRICES_USED.to_string(), used),
            (SHEET_PRICES_NEW.to_string(), new),
        ]);
        build_catalog(
            &sheets,
            "AO",
            &mut FixedAttributes {
                rating: 4.5,
                reviews: 100,
            },
        )
    }

    fn models(payload: &FeaturedPayload) -> Vec<&str> {
        payload.items.iter().map(|i| i.model.as_str()).collect()
    }

    #[test]
    fn clamp_count_defaults_and_bounds() {
        assert_eq!(clamp_count(None), 8);
        assert_eq!(clamp_count(Some(0)), 1);
        assert_eq!(clamp_count(Some(-5)), 1);
        assert_eq!(clamp_count(Some(100)), 20);
        assert_eq!(clamp_count(Some(12)), 12);
    }

    #[test]
    fn absolutize_image_only_touches_root_relative_paths() {
        assert_eq!(
            absolutize_image("/public/products/a.png", "https://shop.example.com/"),
            "https://shop.example.com/public/products/a.png"
        );
        assert_eq!(
            absolutize_image("https://cdn.example.com/a.png", "https://shop.example.com"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(absolutize_image("img/a.png", "http://h"), "img/a.png");
    }

    #[test]
    fn availability_filter_matches_city_substring() {
        let cat = catalog(
            vec![
                row("iPhone 13", "450.000", "Luanda, Benguela"),
                row("iPhone 12", "300.000", "Huambo"),
            ],
            vec![],
        );
        let payload = select_featured(&cat, "luanda", 8, &[], None);
        assert_eq!(models(&payload), vec!["iPhone 13"]);
    }

    #[test]
    fn min_price_spans_conditions() {
        let cat = catalog(
            vec![row("iPhone 13", "450.000", "Luanda")],
            vec![
                row("iPhone 13", "600.000", "Luanda"),
                Record::new()
                    .with("model", "iPhone 13")
                    .with("storage_gb", 64.0)
                    .with("price", "400.000")
                    .with("disponibilidade", "Luanda"),
            ],
        );
        let payload = select_featured(&cat, "luanda", 8, &[], None);
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].min_price, Decimal::from(400_000));
        assert_eq!(payload.items[0].currency, "AOA");
    }

    #[test]
    fn preferred_models_come_first_in_list_order() {
        let cat = catalog(
            vec![
                row("iPhone 11", "1", "Luanda"),
                row("iPhone 12", "1", "Luanda"),
                row("iPhone 13", "1", "Luanda"),
                row("iPhone 14", "1", "Luanda"),
            ],
            vec![],
        );
        let preferred = vec![
            "iphone 14".to_string(),
            "iPhone 99".to_string(),
            "iPhone 12".to_string(),
            "iPhone 14".to_string(),
        ];
        let payload = select_featured(&cat, "luanda", 8, &preferred, None);
        assert_eq!(
            models(&payload),
            vec!["iPhone 14", "iPhone 12", "iPhone 11", "iPhone 13"]
        );
    }

    #[test]
    fn preferred_models_match_regardless_of_case() {
        let cat = catalog(
            vec![
                row("iPhone 14", "1", "Luanda"),
                row("iPhone 15 Pro", "1", "Luanda"),
            ],
            vec![],
        );
        let preferred = vec!["iphone  15 PRO".to_string()];
        let payload = select_featured(&cat, "luanda", 8, &preferred, None);
        assert_eq!(models(&payload), vec!["iPhone 15 Pro", "iPhone 14"]);
    }

    #[test]
    fn items_never_exceed_count() {
        let rows = (1..=30)
            .map(|n| row(&format!("iPhone {n}"), "1", "Luanda"))
            .collect();
        let cat = catalog(rows, vec![]);
        assert_eq!(select_featured(&cat, "luanda", 3, &[], None).items.len(), 3);
        let clamped = select_featured(&cat, "luanda", 500, &[], None);
        assert_eq!(clamped.count, 20);
        assert_eq!(clamped.items.len(), 20);
    }

    #[test]
    fn relative_images_are_absolutized_with_base_url() {
        let cat = catalog(vec![row("iPhone 13", "1", "Luanda")], vec![]);
        let payload = select_featured(&cat, "luanda", 8, &[], Some("https://loja.example.com"));
        assert_eq!(
            payload.items[0].image.as_deref(),
            Some("https://loja.example.com/public/products/iphone-13.png")
        );
    }

    #[test]
    fn empty_catalog_yields_no_items() {
        let cat = catalog(vec![], vec![]);
        let payload = select_featured(&cat, "luanda", 8, &[], None);
        assert!(payload.items.is_empty());
        assert_eq!(payload.market, "AO");
    }
}
