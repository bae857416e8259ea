//! Search and cross-vendor comparison engine for the Soko directory.
//!
//! The engine is a stateless query-planning layer over the document store:
//!
//! - **Filters**: explicit, validated filter specifications per search kind
//! - **Matcher**: storage-neutral predicates compiled once per request
//! - **Product search**: geo-aware, paginated product-at-a-vendor listings
//! - **Shop search**: the same shape over vendors, with product previews
//! - **Comparison**: groups competing listings of the "same" product across
//!   vendors into price-comparison bundles
//! - **Facets**: count-per-value available filters consistent with the query
//!
//! Every search operation absorbs internal pipeline failures into an empty,
//! well-typed result (logging at error level) so the unified endpoint can
//! still serve its other branches; validation and not-found errors propagate
//! untouched.

pub mod browse;
pub mod comparison;
pub mod engine;
pub mod facets;
pub mod filter;
pub mod matcher;
pub mod products;
pub mod results;
pub mod shops;

pub use browse::ShopProductsFilter;
pub use engine::SearchEngine;
pub use filter::{SearchFilter, SearchKind, ShopFilter, SortBy};
pub use results::{
    AvailableFilters, ComparisonGroup, ComparisonResult, Page, ProductHit, SearchResponse,
    ShopHit,
};
