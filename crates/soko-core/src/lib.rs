//! Domain types for the Soko marketplace directory.
//!
//! Soko models a multi-vendor local-marketplace directory:
//!
//! - **Locations**: the state → area → market hierarchy every shop hangs off
//! - **Vendors**: shop profiles with geolocation and denormalized stats
//! - **Products**: a vendor's sellable listings, location snapshot included
//! - **Catalog**: canonical product definitions used to link listings
//! - **Reviews / Favorites**: shopper feedback on vendors and products
//!
//! # Example
//!
//! ```rust,ignore
//! use soko_core::prelude::*;
//!
//! let vendor = Vendor::new(
//!     UserId::generate(),
//!     "Mama Nkechi Electronics",
//!     VendorType::MarketShop,
//!     state_id,
//!     area_id,
//!     ContactDetails::with_phone("+2348012345678"),
//! );
//!
//! let mut product = Product::new(vendor.id.clone(), "iPhone 15", 950_000.0, "Electronics");
//! product.status = ProductStatus::Pending;
//! assert!(product.status.can_transition_to(ProductStatus::Approved));
//! ```

pub mod catalog;
pub mod error;
pub mod favorite;
pub mod geo;
pub mod ids;
pub mod location;
pub mod product;
pub mod review;
pub mod user;
pub mod vendor;

pub use error::SokoError;
pub use geo::GeoPoint;
pub use ids::*;

/// Current Unix timestamp in seconds.
pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Round a price to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a rating to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::SokoError;
    pub use crate::geo::GeoPoint;
    pub use crate::ids::*;

    pub use crate::catalog::CatalogItem;
    pub use crate::favorite::{Favorite, FavoriteTarget};
    pub use crate::location::{Area, Market, MarketType, State};
    pub use crate::product::{Product, ProductKind, ProductStatus};
    pub use crate::review::{Review, ReviewTarget};
    pub use crate::user::{Role, User};
    pub use crate::vendor::{
        BankDetails, ContactDetails, OperatingHours, ShopImages, Vendor, VendorType,
    };
}
