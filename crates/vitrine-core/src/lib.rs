pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{
    CatalogPayload, Condition, FeaturedItem, FeaturedPayload, Product, ProductType, Storages,
    Variant, VariantPrice, DEFAULT_MARKET,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
