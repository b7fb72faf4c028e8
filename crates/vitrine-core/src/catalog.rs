use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market used when a request does not name one.
pub const DEFAULT_MARKET: &str = "AO";

/// Purchase condition of a unit. Serialized with the labels the price
/// sheets use (`usado` / `novo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "usado")]
    Used,
    #[serde(rename = "novo")]
    New,
}

impl Condition {
    pub const ALL: [Condition; 2] = [Condition::Used, Condition::New];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Used => "usado",
            Condition::New => "novo",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product family, inferred from the model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Iphone,
    Ipad,
    Macbook,
    Watch,
    Accessory,
}

impl ProductType {
    /// Infers the family by case-insensitive substring match.
    ///
    /// Checks run in a fixed order: `ipad`, `mac`, `watch`, `iphone`. A
    /// model matching none of them is an accessory.
    #[must_use]
    pub fn infer(model: &str) -> Self {
        let lower = model.to_lowercase();
        if lower.contains("ipad") {
            ProductType::Ipad
        } else if lower.contains("mac") {
            ProductType::Macbook
        } else if lower.contains("watch") {
            ProductType::Watch
        } else if lower.contains("iphone") {
            ProductType::Iphone
        } else {
            ProductType::Accessory
        }
    }
}

/// One purchasable configuration read from a price sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Slug derived from the model unless the sheet carries a `product_id`.
    pub id: String,
    /// Canonical display name, e.g. `"iPhone 13"`.
    pub model: String,
    /// `0` when the row names no storage.
    pub storage_gb: u32,
    pub market: String,
    pub condition: Condition,
    pub price: Decimal,
    pub currency: String,
    /// Free-text locality tag, e.g. `"Luanda, Benguela"`. Informational only.
    pub availability: String,
}

/// Price entry stored in the variant index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantPrice {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub currency: String,
}

/// Ascending, de-duplicated storage sizes per condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storages {
    pub usado: Vec<u32>,
    pub novo: Vec<u32>,
}

impl Storages {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.usado.is_empty() && self.novo.is_empty()
    }
}

/// One model aggregated across conditions and storage sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub model: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    /// Synthesized per build, one decimal, in `[4.0, 5.0)`.
    pub rating: f64,
    pub reviews: u32,
    pub colors: Vec<String>,
    pub image: Option<String>,
    pub storages: Storages,
    /// Distinct locality tags seen on this model's rows, first-seen order.
    #[serde(default)]
    pub availability: Vec<String>,
}

impl Product {
    /// Case-insensitive substring match of `city` against every retained
    /// availability tag.
    #[must_use]
    pub fn is_available_in(&self, city: &str) -> bool {
        let needle = city.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.availability
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// Projection of a [`Product`] for the featured surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedItem {
    pub id: String,
    pub model: String,
    pub image: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_price: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPayload {
    pub market: String,
    #[serde(rename = "colorMods")]
    pub color_mods: BTreeMap<String, f64>,
    pub products: Vec<Product>,
    /// Keyed by `model|condition|storage_gb|market`.
    pub variants: BTreeMap<String, VariantPrice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedPayload {
    pub market: String,
    /// Requested count after clamping.
    pub count: usize,
    pub items: Vec<FeaturedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_checks_ipad_before_mac() {
        assert_eq!(
            ProductType::infer("iPad Pro for Mac users"),
            ProductType::Ipad
        );
        assert_eq!(ProductType::infer("MacBook Air M2"), ProductType::Macbook);
    }

    #[test]
    fn infer_recognizes_iphone_and_watch() {
        assert_eq!(ProductType::infer("iPhone 15 Pro"), ProductType::Iphone);
        assert_eq!(
            ProductType::infer("Apple Watch Series 9"),
            ProductType::Watch
        );
    }

    #[test]
    fn infer_falls_back_to_accessory() {
        assert_eq!(ProductType::infer("AirPods Pro"), ProductType::Accessory);
        assert_eq!(ProductType::infer(""), ProductType::Accessory);
    }

    #[test]
    fn condition_serializes_with_sheet_labels() {
        assert_eq!(
            serde_json::to_string(&Condition::Used).unwrap(),
            "\"usado\""
        );
        assert_eq!(serde_json::to_string(&Condition::New).unwrap(), "\"novo\"");
    }

    #[test]
    fn product_type_serializes_under_type_key() {
        let product = Product {
            id: "macbook-air".to_string(),
            model: "MacBook Air".to_string(),
            product_type: ProductType::Macbook,
            rating: 4.5,
            reviews: 120,
            colors: vec![],
            image: None,
            storages: Storages::default(),
            availability: vec![],
        };
        let json = serde_json::to_value(&product).expect("serialize");
        assert_eq!(json["type"], "macbook");
    }

    #[test]
    fn is_available_in_matches_substring_case_insensitively() {
        let product = Product {
            id: "iphone-13".to_string(),
            model: "iPhone 13".to_string(),
            product_type: ProductType::Iphone,
            rating: 4.2,
            reviews: 80,
            colors: vec![],
            image: None,
            storages: Storages::default(),
            availability: vec!["Luanda, Benguela".to_string()],
        };
        assert!(product.is_available_in("luanda"));
        assert!(product.is_available_in("BENGUELA"));
        assert!(!product.is_available_in("huambo"));
    }

    #[test]
    fn variant_price_serializes_as_number() {
        let price = VariantPrice {
            price: Decimal::new(45_000_000, 2),
            currency: "AOA".to_string(),
        };
        let json = serde_json::to_value(&price).expect("serialize");
        assert_eq!(json["price"].as_f64(), Some(450_000.0));
    }
}
