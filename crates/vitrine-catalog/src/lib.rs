//! Catalog reconciliation engine.
//!
//! Turns loosely-typed price-sheet rows into the normalized product and
//! variant model served by `vitrine-server`, and derives the featured list
//! on top of it. Every call rebuilds from the source; nothing is cached.

pub mod attributes;
pub mod auxiliary;
pub mod build;
pub mod classify;
pub mod error;
pub mod featured;
pub mod index;
pub mod normalize;
pub mod reconcile;
pub mod service;
pub mod source;

pub use attributes::{AttributeGenerator, FixedAttributes, RandomAttributes};
pub use build::{build_catalog, Catalog};
pub use classify::{classify_row, ClassifiedRow};
pub use error::CatalogError;
pub use featured::{absolutize_image, clamp_count, select_featured};
pub use index::{VariantIndex, VariantKey};
pub use normalize::{derive_id, normalize_model, parse_localized_number};
pub use service::CatalogService;
pub use source::{Cell, Record, SheetSource, Workbook};
