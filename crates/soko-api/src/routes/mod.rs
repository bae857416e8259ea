//! Route registration.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod catalog;
pub mod favorites;
pub mod locations;
pub mod products;
pub mod reviews;
pub mod search;
pub mod vendors;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Search & comparison
        .route("/search", get(search::unified))
        .route("/search/products", get(search::products))
        .route("/search/shops", get(search::shops))
        .route("/search/compare", get(search::compare))
        .route("/search/filters", get(search::filters))
        .route("/search/product/{name}/vendors", get(search::product_vendors))
        .route("/search/product/{id}/similar", get(search::similar))
        .route("/search/shop/{vendor_id}/products", get(search::shop_products))
        // Location hierarchy
        .route("/states", get(locations::list_states).post(locations::create_state))
        .route("/states/{id}", get(locations::get_state))
        .route("/areas", get(locations::list_areas).post(locations::create_area))
        .route("/areas/{id}", get(locations::get_area))
        .route("/markets", get(locations::list_markets).post(locations::create_market))
        .route("/markets/nearby", get(locations::markets_nearby))
        .route("/markets/{id}", get(locations::get_market))
        // Vendors
        .route("/vendors", post(vendors::register))
        .route("/vendors/me", get(vendors::me))
        .route("/vendors/nearby", get(vendors::nearby))
        .route(
            "/vendors/{id}",
            get(vendors::get).patch(vendors::update).delete(vendors::remove),
        )
        // Products
        .route("/products", get(products::list).post(products::create))
        .route("/products/mine", get(products::mine))
        .route(
            "/products/{id}",
            get(products::get).patch(products::update).delete(products::remove),
        )
        // Catalog
        .route("/catalog", get(catalog::list).post(catalog::create))
        .route("/catalog/categories", get(catalog::categories))
        .route("/catalog/brands", get(catalog::brands))
        .route("/catalog/{id}", get(catalog::get))
        // Reviews
        .route("/reviews", post(reviews::create))
        .route("/reviews/{target}/{id}", get(reviews::list_for_target))
        .route("/reviews/{id}/helpful", post(reviews::mark_helpful))
        .route("/reviews/{id}", delete(reviews::remove))
        // Favorites
        .route("/favorites", get(favorites::list).post(favorites::add))
        .route("/favorites/{id}", delete(favorites::remove))
        // Admin
        .route("/admin/products/pending", get(admin::pending_products))
        .route("/admin/products/{id}/approve", post(admin::approve_product))
        .route("/admin/products/{id}/reject", post(admin::reject_product))
        .route("/admin/products/{id}", patch(admin::update_product))
        .route("/admin/vendors/{id}/verify", post(admin::verify_vendor))
        .route("/admin/vendors/{id}/feature", post(admin::feature_vendor))
        .route("/admin/vendors/{id}/deactivate", post(admin::deactivate_vendor))
        .route("/admin/users/{id}/deactivate", post(admin::deactivate_user))
        .with_state(state)
}
