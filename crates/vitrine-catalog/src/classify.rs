//! Row classification: one raw price-sheet row to a [`ClassifiedRow`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use vitrine_core::{Condition, Variant};

use crate::normalize::{derive_id, normalize_model, parse_localized_number};
use crate::source::Record;

const MODEL_FIELDS: &[&str] = &["model", "product", "product_name", "product_id", "modelo"];
const ID_FIELDS: &[&str] = &["product_id"];
const STORAGE_FIELDS: &[&str] = &["storage_gb", "gb", "storage", "armazenamento"];
const MARKET_FIELDS: &[&str] = &["market", "mercado"];
const PRICE_FIELDS: &[&str] = &["price", "price_kz", "kzs", "preco", "valor"];
const CURRENCY_FIELDS: &[&str] = &["currency", "moeda"];
const AVAILABILITY_FIELDS: &[&str] = &["disponibilidade"];

/// A price row with every field resolved, before the model/price check.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub id: String,
    /// Empty when no model alias carried a value.
    pub model: String,
    pub storage_gb: u32,
    pub market: String,
    pub condition: Condition,
    /// `None` when no price alias parsed.
    pub price: Option<Decimal>,
    pub currency: String,
    pub availability: String,
}

impl ClassifiedRow {
    /// Converts into a [`Variant`] if the row has a model and a positive
    /// price. Rows failing this are dropped by the caller.
    #[must_use]
    pub fn into_variant(self) -> Option<Variant> {
        if self.model.is_empty() {
            return None;
        }
        let price = self
            .price
            .filter(|p| p.is_sign_positive() && !p.is_zero())?;
        Some(Variant {
            id: self.id,
            model: self.model,
            storage_gb: self.storage_gb,
            market: self.market,
            condition: self.condition,
            price,
            currency: self.currency,
            availability: self.availability,
        })
    }
}

/// Resolves one raw row using the first non-blank alias of each field.
///
/// Never fails: missing optional fields fall back to defaults. The market
/// falls back to `requested_market`; the currency to `AOA` for `AO` and
/// `USD` elsewhere.
#[must_use]
pub fn classify_row(row: &Record, condition: Condition, requested_market: &str) -> ClassifiedRow {
    let model = row
        .first_text(MODEL_FIELDS)
        .map(|raw| normalize_model(&raw))
        .unwrap_or_default();

    let id = row
        .first_text(ID_FIELDS)
        .unwrap_or_else(|| derive_id(&model));

    let storage_gb = row
        .first_cell(STORAGE_FIELDS)
        .and_then(parse_localized_number)
        .and_then(|gb| gb.trunc().to_u32())
        .unwrap_or(0);

    let market = row.first_text(MARKET_FIELDS).map_or_else(
        || requested_market.trim().to_uppercase(),
        |m| m.to_uppercase(),
    );

    let price = row
        .first_cell(PRICE_FIELDS)
        .and_then(parse_localized_number);

    let currency = row.first_text(CURRENCY_FIELDS).map_or_else(
        || default_currency(&market).to_string(),
        |c| c.to_uppercase(),
    );

    let availability = row.first_text(AVAILABILITY_FIELDS).unwrap_or_default();

    ClassifiedRow {
        id,
        model,
        storage_gb,
        market,
        condition,
        price,
        currency,
        availability,
    }
}

fn default_currency(market: &str) -> &'static str {
    if market == "AO" {
        "AOA"
    } else {
        "USD"
    }
}
