//! Async in-memory document store for the Soko directory.
//!
//! Stands in for the persistence collaborator at its interface boundary:
//! typed collections keyed by string ID, predicate scans with stable
//! insertion order, and a spherical proximity query equivalent to a
//! document store's `$geoNear` facility. Single update atomicity comes from
//! the collection's write lock; there are no cross-collection transactions,
//! matching the system's consistency model.

pub mod collection;
pub mod documents;
pub mod error;
pub mod geo;

pub use collection::{Collection, Document};
pub use error::StoreError;
pub use geo::GeoHit;
