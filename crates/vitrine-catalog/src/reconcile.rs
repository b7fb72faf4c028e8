//! Product reconciliation: one [`Product`] per canonical model.
//!
//! Products are created the first time a model appears in the variant
//! stream and are never overwritten afterwards; later rows for the same
//! model only add availability tags.

use std::collections::HashMap;

use vitrine_core::{Product, ProductType, Storages, Variant};

use crate::attributes::AttributeGenerator;
use crate::normalize::normalize_model;
use crate::source::Record;

/// Black, gold, silver, blue.
pub const DEFAULT_COLORS: [&str; 4] = ["#1c1c1e", "#d4af37", "#e3e4e5", "#1e3a8a"];

const MAX_COLORS: usize = 4;

const AUX_MODEL_FIELDS: &[&str] = &["model", "modelo", "product", "product_name"];
const IMAGE_FIELDS: &[&str] = &["image", "img", "image_url", "imagem"];

/// Lookups built from the optional `colors` and `products` sheets.
#[derive(Debug, Default)]
pub struct AuxiliaryTables {
    colors: HashMap<String, Vec<String>>,
    images: HashMap<String, String>,
}

impl AuxiliaryTables {
    /// Indexes both sheets by normalized model. Colors keep table order
    /// across every matching row; the first non-blank image per model wins.
    #[must_use]
    pub fn from_rows(color_rows: &[Record], product_rows: &[Record]) -> Self {
        let mut colors: HashMap<String, Vec<String>> = HashMap::new();
        for row in color_rows {
            let Some(model) = aux_model(row) else {
                continue;
            };
            let listed = colors.entry(model).or_default();
            for (header, cell) in row.fields() {
                if !is_color_header(header) {
                    continue;
                }
                listed.extend(
                    cell.to_text()
                        .split(',')
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(ToOwned::to_owned),
                );
            }
        }

        let mut images = HashMap::new();
        for row in product_rows {
            let Some(model) = aux_model(row) else {
                continue;
            };
            if let Some(image) = row.first_text(IMAGE_FIELDS) {
                images.entry(model).or_insert(image);
            }
        }

        Self { colors, images }
    }

    /// Up to four listed colors, or the default palette when none are listed.
    #[must_use]
    pub fn colors_for(&self, model: &str) -> Vec<String> {
        self.colors
            .get(model)
            .filter(|listed| !listed.is_empty())
            .map_or_else(
                || DEFAULT_COLORS.iter().map(ToString::to_string).collect(),
                |listed| listed.iter().take(MAX_COLORS).cloned().collect(),
            )
    }

    #[must_use]
    pub fn image_for(&self, model: &str) -> Option<&str> {
        self.images.get(model).map(String::as_str)
    }
}

fn aux_model(row: &Record) -> Option<String> {
    row.first_text(AUX_MODEL_FIELDS)
        .map(|raw| normalize_model(&raw))
        .filter(|model| !model.is_empty())
}

/// `color`, `colors`, `color1`.., `cor`, `cores`, `cor1`.., `cor_2`, `hex`.
fn is_color_header(header: &str) -> bool {
    let lower = header.to_ascii_lowercase();
    if lower == "hex" || lower == "cores" || lower.starts_with("color") {
        return true;
    }
    lower
        .strip_prefix("cor")
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit() || c == '_'))
}

/// Builds the product registry from the filtered variant stream, in
/// first-seen model order. `storages` are left empty for the builder.
#[must_use]
pub fn reconcile_products(
    variants: &[Variant],
    tables: &AuxiliaryTables,
    generator: &mut dyn AttributeGenerator,
) -> Vec<Product> {
    let mut products: Vec<Product> = Vec::new();
    let mut by_model: HashMap<&str, usize> = HashMap::new();

    for variant in variants {
        let slot = match by_model.get(variant.model.as_str()) {
            Some(&slot) => slot,
            None => {
                products.push(Product {
                    id: variant.id.clone(),
                    model: variant.model.clone(),
                    product_type: ProductType::infer(&variant.model),
                    rating: generator.rating(),
                    reviews: generator.reviews(),
                    colors: tables.colors_for(&variant.model),
                    image: tables.image_for(&variant.model).map(ToOwned::to_owned),
                    storages: Storages::default(),
                    availability: Vec::new(),
                });
                by_model.insert(variant.model.as_str(), products.len() - 1);
                products.len() - 1
            }
        };

        let tag = variant.availability.trim();
        let product = &mut products[slot];
        if !tag.is_empty() && !product.availability.iter().any(|t| t == tag) {
            product.availability.push(tag.to_string());
        }
    }

    products
}
