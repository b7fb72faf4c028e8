//! File-backed entry points used by the HTTP server and the CLI.
//!
//! Each call opens the workbook and rebuilds from scratch. Calls are
//! independent and hold no shared state.

use std::path::PathBuf;

use vitrine_core::{AppConfig, CatalogPayload, FeaturedPayload, DEFAULT_MARKET};

use crate::attributes::{AttributeGenerator, RandomAttributes};
use crate::auxiliary::{load_color_mods, load_preferred_models};
use crate::build::build_catalog;
use crate::error::CatalogError;
use crate::featured::select_featured;
use crate::source::Workbook;

#[derive(Debug, Clone)]
pub struct CatalogService {
    pub workbook_path: PathBuf,
    pub color_mods_path: PathBuf,
    pub featured_path: PathBuf,
    pub default_market: String,
}

impl CatalogService {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            workbook_path: config.workbook_path.clone(),
            color_mods_path: config.color_mods_path.clone(),
            featured_path: config.featured_path.clone(),
            default_market: config.default_market.clone(),
        }
    }

    /// Requested market, upper-cased, or the configured default when blank.
    #[must_use]
    pub fn resolve_market(&self, market: Option<&str>) -> String {
        let fallback = if self.default_market.is_empty() {
            DEFAULT_MARKET
        } else {
            self.default_market.as_str()
        };
        market
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_uppercase()
    }

    /// `true` when the workbook file exists.
    #[must_use]
    pub fn source_available(&self) -> bool {
        self.workbook_path.is_file()
    }

    /// Full catalog for `market`, with color modifiers attached.
    ///
    /// `city` does not filter the catalog; it is only recorded in logs.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SourceUnavailable`] when the workbook is
    /// missing or unreadable.
    pub fn catalog(
        &self,
        market: Option<&str>,
        city: &str,
    ) -> Result<CatalogPayload, CatalogError> {
        self.catalog_with(market, city, &mut RandomAttributes::new())
    }

    /// Like [`CatalogService::catalog`] with an explicit attribute generator.
    ///
    /// # Errors
    ///
    /// See [`CatalogService::catalog`].
    pub fn catalog_with(
        &self,
        market: Option<&str>,
        city: &str,
        generator: &mut dyn AttributeGenerator,
    ) -> Result<CatalogPayload, CatalogError> {
        let market = self.resolve_market(market);
        let workbook = Workbook::open(&self.workbook_path)?;
        let catalog = build_catalog(&workbook, &market, generator);

        tracing::info!(
            market = %catalog.market,
            city,
            products = catalog.products.len(),
            variants = catalog.variants.len(),
            "catalog served"
        );

        Ok(CatalogPayload {
            market: catalog.market,
            color_mods: load_color_mods(&self.color_mods_path),
            products: catalog.products,
            variants: catalog.variants.to_key_map(),
        })
    }

    /// Featured list for `market` / `city`.
    ///
    /// `count` must already be clamped (see [`crate::clamp_count`]).
    /// `base_url` (scheme + host) absolutizes root-relative images.
    ///
    /// # Errors
    ///
    /// See [`CatalogService::catalog`].
    pub fn featured(
        &self,
        market: Option<&str>,
        city: &str,
        count: usize,
        base_url: Option<&str>,
    ) -> Result<FeaturedPayload, CatalogError> {
        self.featured_with(market, city, count, base_url, &mut RandomAttributes::new())
    }

    /// Like [`CatalogService::featured`] with an explicit attribute generator.
    ///
    /// # Errors
    ///
    /// See [`CatalogService::catalog`].
    pub fn featured_with(
        &self,
        market: Option<&str>,
        city: &str,
        count: usize,
        base_url: Option<&str>,
        generator: &mut dyn AttributeGenerator,
    ) -> Result<FeaturedPayload, CatalogError> {
        let market = self.resolve_market(market);
        let workbook = Workbook::open(&self.workbook_path)?;
        let catalog = build_catalog(&workbook, &market, generator);
        let preferred = load_preferred_models(&self.featured_path);

        let payload = select_featured(&catalog, city, count, &preferred, base_url);
        tracing::info!(
            market = %payload.market,
            city,
            count = payload.count,
            items = payload.items.len(),
            "featured served"
        );
        Ok(payload)
    }
}
