//! Directory services for the Soko marketplace.
//!
//! Persistence plumbing around the domain: location hierarchy reference
//! data, vendor registration and profiles, product listings with their
//! moderation lifecycle, the canonical catalog, reviews, and favorites.
//!
//! Denormalized aggregates (vendor price range and product count, catalog
//! price stats, vendor rating) are maintained through explicit
//! [`recompute::Recompute`] tasks emitted by every mutating operation, so
//! the dependency between a mutation and the caches it dirties is visible
//! in one place rather than scattered across call sites.

pub mod admin;
pub mod catalog;
pub mod favorites;
pub mod locations;
pub mod products;
pub mod recompute;
pub mod reviews;
pub mod users;
pub mod vendors;

use soko_core::prelude::*;
use soko_store::Collection;

pub use admin::AdminService;
pub use catalog::CatalogService;
pub use favorites::FavoriteService;
pub use locations::LocationService;
pub use products::ProductService;
pub use recompute::{Recompute, Recomputer};
pub use reviews::ReviewService;
pub use users::UserService;
pub use vendors::VendorService;

/// All collections and services wired together.
#[derive(Clone)]
pub struct Directory {
    pub states: Collection<State>,
    pub areas: Collection<Area>,
    pub markets: Collection<Market>,
    pub vendors: Collection<Vendor>,
    pub products: Collection<Product>,
    pub catalog: Collection<CatalogItem>,
    pub users: Collection<User>,
    pub reviews: Collection<Review>,
    pub favorites: Collection<Favorite>,

    pub locations: LocationService,
    pub vendor_service: VendorService,
    pub product_service: ProductService,
    pub catalog_service: CatalogService,
    pub review_service: ReviewService,
    pub favorite_service: FavoriteService,
    pub user_service: UserService,
    pub admin: AdminService,
}

impl Directory {
    pub fn new() -> Self {
        let states = Collection::new();
        let areas = Collection::new();
        let markets = Collection::new();
        let vendors = Collection::new();
        let products = Collection::new();
        let catalog = Collection::new();
        let users = Collection::new();
        let reviews = Collection::new();
        let favorites = Collection::new();

        let recomputer = Recomputer::new(products.clone(), vendors.clone(), catalog.clone());

        let locations = LocationService::new(states.clone(), areas.clone(), markets.clone());
        let user_service = UserService::new(users.clone());
        let vendor_service = VendorService::new(
            vendors.clone(),
            products.clone(),
            users.clone(),
            locations.clone(),
        );
        let product_service = ProductService::new(
            products.clone(),
            vendors.clone(),
            catalog.clone(),
            recomputer.clone(),
        );
        let catalog_service = CatalogService::new(catalog.clone());
        let review_service = ReviewService::new(reviews.clone(), vendors.clone());
        let favorite_service = FavoriteService::new(favorites.clone());
        let admin = AdminService::new(
            products.clone(),
            vendors.clone(),
            users.clone(),
            recomputer.clone(),
        );

        Self {
            states,
            areas,
            markets,
            vendors,
            products,
            catalog,
            users,
            reviews,
            favorites,
            locations,
            vendor_service,
            product_service,
            catalog_service,
            review_service,
            favorite_service,
            user_service,
            admin,
        }
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}
