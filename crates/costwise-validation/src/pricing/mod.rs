//! Pricing resolution waterfall.
//!
//! Strict order: live API exact-SKU match → verified static table
//! (reference region only) → unknown. Never interpolates, never
//! averages similar SKUs, never applies family heuristics.

pub mod resolver;
pub mod source;
pub mod table;

pub use resolver::PricingResolver;
pub use source::{location_name, normalize_db_engine, PriceSource, RawPrice, ResourceSpec};
pub use table::VerifiedPriceTable;
