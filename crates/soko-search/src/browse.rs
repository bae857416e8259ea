//! Shop browsing: a single shop's products and "you may also like".

use crate::engine::SearchEngine;
use crate::products::ProductCandidate;
use crate::results::{Page, ProductHit, ShopProductsResult};
use rand::seq::SliceRandom;
use soko_core::prelude::*;
use soko_core::SokoError;

/// Default sample size for similar products.
const DEFAULT_SIMILAR_LIMIT: usize = 10;

/// Filters for one shop's product listing.
#[derive(Debug, Clone, Default)]
pub struct ShopProductsFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: i64,
    pub limit: i64,
}

impl ShopProductsFilter {
    pub fn new() -> Self {
        Self {
            category: None,
            min_price: None,
            max_price: None,
            page: 1,
            limit: 20,
        }
    }
}

impl SearchEngine {
    /// A shop header plus its active+approved products, newest first.
    ///
    /// Unlike the search surfaces, a missing vendor here is a not-found
    /// error that propagates to the caller.
    pub async fn shop_products(
        &self,
        vendor_id: &VendorId,
        filter: &ShopProductsFilter,
    ) -> Result<ShopProductsResult, SokoError> {
        let vendor = self
            .vendors
            .get(vendor_id.as_str())
            .await
            .ok_or_else(|| SokoError::VendorNotFound(vendor_id.to_string()))?;

        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 100);

        let mut products = self
            .products
            .find(|p| {
                &p.vendor_id == vendor_id
                    && p.is_searchable()
                    && filter
                        .category
                        .as_ref()
                        .map_or(true, |c| &p.category == c)
                    && filter.min_price.map_or(true, |min| p.price >= min)
                    && filter.max_price.map_or(true, |max| p.price <= max)
            })
            .await;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = products.len() as i64;
        let offset = ((page - 1) * limit).max(0) as usize;

        let mut hits = Vec::new();
        for product in products.into_iter().skip(offset).take(limit as usize) {
            let candidate = ProductCandidate {
                product,
                vendor: vendor.clone(),
                distance_m: None,
            };
            hits.push(self.shape_product_hit(&candidate).await);
        }

        Ok(ShopProductsResult {
            // The header reuses the shop-hit shape; previews are not needed
            // when the full product list is right below.
            shop: self.shape_shop_hit(&vendor, None).await,
            products: Page::new(hits, total, page, limit),
        })
    }

    /// A uniform random sample of other approved products in the same
    /// category, for "you may also like".
    pub async fn similar_products(
        &self,
        product_id: &ProductId,
        limit: Option<usize>,
    ) -> Result<Vec<ProductHit>, SokoError> {
        let product = self
            .products
            .get(product_id.as_str())
            .await
            .ok_or_else(|| SokoError::ProductNotFound(product_id.to_string()))?;

        match self.similar_products_inner(&product, limit).await {
            Ok(hits) => Ok(hits),
            Err(err) => {
                tracing::error!(error = %err, "similar products pipeline failed; returning empty list");
                Ok(Vec::new())
            }
        }
    }

    async fn similar_products_inner(
        &self,
        product: &Product,
        limit: Option<usize>,
    ) -> Result<Vec<ProductHit>, SokoError> {
        let limit = limit.unwrap_or(DEFAULT_SIMILAR_LIMIT);
        let category = product.category.clone();
        let exclude = product.id.clone();

        let candidates = self
            .products
            .find(|p| p.id != exclude && p.category == category && p.is_searchable())
            .await;

        // Uniform sample, not first-N: a stale head of the collection must
        // not dominate recommendations. The RNG stays out of the await scope.
        let sampled: Vec<Product> = {
            let mut rng = rand::thread_rng();
            candidates.choose_multiple(&mut rng, limit).cloned().collect()
        };

        let mut hits = Vec::with_capacity(sampled.len());
        for product in sampled {
            let Some(vendor) = self.vendors.get(product.vendor_id.as_str()).await else {
                continue;
            };
            if !vendor.is_active {
                continue;
            }
            let candidate = ProductCandidate {
                product,
                vendor,
                distance_m: None,
            };
            hits.push(self.shape_product_hit(&candidate).await);
        }
        Ok(hits)
    }
}
