//! Catalog builder: raw sheets to the `{products, variants}` model for a market.

use vitrine_core::{Condition, Product, Variant};

use crate::attributes::AttributeGenerator;
use crate::classify::classify_row;
use crate::index::VariantIndex;
use crate::reconcile::{reconcile_products, AuxiliaryTables};
use crate::source::{
    SheetSource, SHEET_COLORS, SHEET_PRICES_NEW, SHEET_PRICES_USED, SHEET_PRODUCTS,
};

/// Result of one catalog build.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub market: String,
    /// Products with at least one variant in `market`, first-seen order.
    pub products: Vec<Product>,
    /// Every retained variant, all markets.
    pub variants: VariantIndex,
}

/// Sheet holding the rows for `condition`.
#[must_use]
pub fn price_sheet(condition: Condition) -> &'static str {
    match condition {
        Condition::Used => SHEET_PRICES_USED,
        Condition::New => SHEET_PRICES_NEW,
    }
}

/// Classifies both price sheets and keeps rows with a model and a price.
///
/// Used rows come first, then new rows, each in sheet order.
#[must_use]
pub fn collect_variants(source: &dyn SheetSource, market: &str) -> Vec<Variant> {
    let mut variants = Vec::new();
    for condition in Condition::ALL {
        let sheet = price_sheet(condition);
        let Some(rows) = source.sheet(sheet) else {
            tracing::warn!(sheet, "price sheet missing; treating as empty");
            continue;
        };

        let mut dropped = 0usize;
        for (idx, row) in rows.iter().enumerate() {
            match classify_row(row, condition, market).into_variant() {
                Some(variant) => variants.push(variant),
                None => {
                    dropped += 1;
                    tracing::debug!(sheet, row = idx + 2, "dropping row without model or price");
                }
            }
        }
        tracing::debug!(sheet, kept = rows.len() - dropped, dropped, "classified price sheet");
    }
    variants
}

/// Builds the catalog for `market` from a sheet source.
///
/// Steps: classify and filter both price sheets, reconcile products, index
/// variants (last write wins), attach per-market storages, and drop products
/// with nothing in `market`. Products without an image override get
/// `/public/products/<id>.png`.
#[must_use]
pub fn build_catalog(
    source: &dyn SheetSource,
    market: &str,
    generator: &mut dyn AttributeGenerator,
) -> Catalog {
    let market = market.trim().to_uppercase();
    let variants = collect_variants(source, &market);

    let tables = AuxiliaryTables::from_rows(
        source.rows(SHEET_COLORS),
        source.rows(SHEET_PRODUCTS),
    );
    let reconciled = reconcile_products(&variants, &tables, generator);

    let mut index = VariantIndex::default();
    for variant in &variants {
        index.insert(variant);
    }

    let products: Vec<Product> = reconciled
        .into_iter()
        .filter_map(|mut product| {
            product.storages = index.storages_for(&product.model, &market);
            if product.storages.is_empty() {
                return None;
            }
            if product.image.is_none() {
                product.image = Some(default_image_path(&product.id));
            }
            Some(product)
        })
        .collect();

    tracing::debug!(
        market = %market,
        products = products.len(),
        variants = index.len(),
        "catalog built"
    );

    Catalog {
        market,
        products,
        variants: index,
    }
}

#[must_use]
pub fn default_image_path(id: &str) -> String {
    format!("/public/products/{id}.png")
}
