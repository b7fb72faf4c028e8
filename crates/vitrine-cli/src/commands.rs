use anyhow::Context;
use serde::Serialize;
use vitrine_catalog::{clamp_count, CatalogService, RandomAttributes};
use vitrine_core::{CatalogPayload, FeaturedPayload};

fn attributes(seed: Option<u64>) -> RandomAttributes {
    seed.map_or_else(RandomAttributes::new, RandomAttributes::seeded)
}

pub(crate) fn run_catalog(
    service: &CatalogService,
    market: Option<&str>,
    city: &str,
    seed: Option<u64>,
) -> anyhow::Result<CatalogPayload> {
    service
        .catalog_with(market, city, &mut attributes(seed))
        .with_context(|| format!("building catalog from {}", service.workbook_path.display()))
}

pub(crate) fn run_featured(
    service: &CatalogService,
    market: Option<&str>,
    city: &str,
    count: Option<i64>,
    base_url: Option<&str>,
    seed: Option<u64>,
) -> anyhow::Result<FeaturedPayload> {
    let base_url = base_url
        .map(|url| url.trim().trim_end_matches('/'))
        .filter(|url| !url.is_empty());
    service
        .featured_with(
            market,
            city,
            clamp_count(count),
            base_url,
            &mut attributes(seed),
        )
        .with_context(|| {
            format!(
                "building featured list from {}",
                service.workbook_path.display()
            )
        })
}

pub(crate) fn render<T: Serialize>(payload: &T, compact: bool) -> anyhow::Result<String> {
    let json = if compact {
        serde_json::to_string(payload)?
    } else {
        serde_json::to_string_pretty(payload)?
    };
    Ok(json)
}
