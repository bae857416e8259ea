//! Moderation and admin actions.

use crate::recompute::{Recompute, Recomputer};
use soko_core::prelude::*;
use soko_core::SokoError;
use soko_store::Collection;

/// Service for the moderation queue and vendor/user administration.
#[derive(Clone)]
pub struct AdminService {
    products: Collection<Product>,
    vendors: Collection<Vendor>,
    users: Collection<User>,
    recomputer: Recomputer,
}

impl AdminService {
    pub fn new(
        products: Collection<Product>,
        vendors: Collection<Vendor>,
        users: Collection<User>,
        recomputer: Recomputer,
    ) -> Self {
        Self {
            products,
            vendors,
            users,
            recomputer,
        }
    }

    /// Listings waiting for moderation, oldest first.
    pub async fn pending_products(&self) -> Vec<Product> {
        let mut pending = self
            .products
            .find(|p| p.is_active && p.status == ProductStatus::Pending)
            .await;
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        pending
    }

    /// Approve a pending listing, making it searchable.
    pub async fn approve_product(&self, id: &ProductId) -> Result<Product, SokoError> {
        self.moderate_product(id, ProductStatus::Approved).await
    }

    /// Reject a pending listing.
    pub async fn reject_product(&self, id: &ProductId) -> Result<Product, SokoError> {
        self.moderate_product(id, ProductStatus::Rejected).await
    }

    async fn moderate_product(
        &self,
        id: &ProductId,
        next: ProductStatus,
    ) -> Result<Product, SokoError> {
        let product = self
            .products
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::ProductNotFound(id.to_string()))?;

        if !product.status.can_transition_to(next) {
            return Err(SokoError::InvalidStatusTransition {
                from: product.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }

        let updated = self
            .products
            .update(id.as_str(), |p| p.status = next)
            .await
            .map_err(|_| SokoError::ProductNotFound(id.to_string()))?;

        // Approval changes the searchable set, so the caches move too.
        self.recomputer
            .run(Recompute::VendorAggregates(updated.vendor_id.clone()))
            .await;
        if let Some(item_id) = &updated.catalog_item_id {
            self.recomputer
                .run(Recompute::CatalogStats(item_id.clone()))
                .await;
        }

        Ok(updated)
    }

    pub async fn verify_vendor(&self, id: &VendorId) -> Result<Vendor, SokoError> {
        self.vendors
            .update(id.as_str(), |v| v.is_verified = true)
            .await
            .map_err(|_| SokoError::VendorNotFound(id.to_string()))
    }

    pub async fn feature_vendor(&self, id: &VendorId, featured: bool) -> Result<Vendor, SokoError> {
        self.vendors
            .update(id.as_str(), |v| v.is_featured = featured)
            .await
            .map_err(|_| SokoError::VendorNotFound(id.to_string()))
    }

    /// Deactivate a vendor: it and its products drop out of every search
    /// surface immediately. The documents stay for audit.
    pub async fn deactivate_vendor(&self, id: &VendorId) -> Result<Vendor, SokoError> {
        let vendor = self
            .vendors
            .update(id.as_str(), |v| v.is_active = false)
            .await
            .map_err(|_| SokoError::VendorNotFound(id.to_string()))?;
        tracing::info!(vendor = %id, "vendor deactivated");
        Ok(vendor)
    }

    pub async fn deactivate_user(&self, id: &UserId) -> Result<User, SokoError> {
        self.users
            .update(id.as_str(), |u| u.is_active = false)
            .await
            .map_err(|_| SokoError::UserNotFound(id.to_string()))
    }
}
