//! Product search pipeline.

use crate::engine::SearchEngine;
use crate::filter::{SearchFilter, SortBy};
use crate::matcher::ProductMatch;
use crate::results::{Page, ProductHit, VendorSummary};
use soko_core::prelude::*;
use soko_core::SokoError;

/// A product that survived the match and vendor-join stages, waiting to be
/// sorted and shaped.
pub(crate) struct ProductCandidate {
    pub product: Product,
    pub vendor: Vendor,
    pub distance_m: Option<f64>,
}

/// Order candidates by the requested key. Sorting is stable, so ties keep
/// the incoming order (insertion order, or distance order on geo searches).
pub(crate) fn sort_candidates(candidates: &mut [ProductCandidate], sort_by: SortBy, is_geo: bool) {
    match sort_by {
        SortBy::PriceLow => {
            candidates.sort_by(|a, b| a.product.price.total_cmp(&b.product.price));
        }
        SortBy::PriceHigh => {
            candidates.sort_by(|a, b| b.product.price.total_cmp(&a.product.price));
        }
        SortBy::Distance => {
            if is_geo {
                candidates.sort_by(|a, b| {
                    a.distance_m
                        .unwrap_or(f64::MAX)
                        .total_cmp(&b.distance_m.unwrap_or(f64::MAX))
                });
            } else {
                candidates.sort_by(|a, b| b.product.created_at.cmp(&a.product.created_at));
            }
        }
        SortBy::Rating => {
            candidates.sort_by(|a, b| b.vendor.rating.total_cmp(&a.vendor.rating));
        }
        SortBy::Newest => {
            candidates.sort_by(|a, b| b.product.created_at.cmp(&a.product.created_at));
        }
        SortBy::Popularity => {
            candidates.sort_by(|a, b| b.product.views.cmp(&a.product.views));
        }
        SortBy::Relevance => {
            candidates.sort_by(|a, b| {
                let by_distance = if is_geo {
                    a.distance_m
                        .unwrap_or(f64::MAX)
                        .total_cmp(&b.distance_m.unwrap_or(f64::MAX))
                } else {
                    std::cmp::Ordering::Equal
                };
                by_distance
                    .then_with(|| b.product.views.cmp(&a.product.views))
                    .then_with(|| b.product.created_at.cmp(&a.product.created_at))
            });
        }
    }
}

impl SearchEngine {
    /// Paginated, filterable, optionally geo-ranked product search.
    ///
    /// Pipeline failures are absorbed into an empty page so the unified
    /// endpoint can still serve its other branches; the failure is logged.
    pub async fn search_products(&self, filter: &SearchFilter) -> Page<ProductHit> {
        match self.search_products_inner(filter).await {
            Ok(page) => page,
            Err(err) => {
                tracing::error!(error = %err, "product search pipeline failed; returning empty page");
                Page::empty(filter.page)
            }
        }
    }

    async fn search_products_inner(
        &self,
        filter: &SearchFilter,
    ) -> Result<Page<ProductHit>, SokoError> {
        let is_geo = filter.geo_point().is_some();
        let matcher = ProductMatch::from_filter(filter);

        // Geo stage first: base eligibility applies inside it, the same way
        // a $geoNear query clause would.
        let candidates: Vec<(Product, Option<f64>)> = match filter.geo_point() {
            Some(center) => self
                .products
                .geo_near(center, filter.max_distance_m(), |p| p.point, |p| {
                    p.is_searchable()
                })
                .await
                .into_iter()
                .map(|hit| (hit.doc, Some(hit.distance_m)))
                .collect(),
            None => self
                .products
                .find(|p| matcher.matches(p))
                .await
                .into_iter()
                .map(|p| (p, None))
                .collect(),
        };

        // Match stage plus vendor inner-join; listings of inactive vendors
        // never surface, regardless of their own flags.
        let mut joined = Vec::with_capacity(candidates.len());
        for (product, distance_m) in candidates {
            if is_geo && !matcher.matches(&product) {
                continue;
            }
            let Some(vendor) = self.vendors.get(product.vendor_id.as_str()).await else {
                continue;
            };
            if !vendor.is_active {
                continue;
            }
            if filter.verified_only && !vendor.is_verified {
                continue;
            }
            joined.push(ProductCandidate {
                product,
                vendor,
                distance_m,
            });
        }

        sort_candidates(&mut joined, filter.sort_by, is_geo);

        // Total before pagination: the whole filtered set, not the slice.
        let total = joined.len() as i64;

        let offset = filter.offset().max(0) as usize;
        let page_items: Vec<ProductCandidate> = joined
            .into_iter()
            .skip(offset)
            .take(filter.limit as usize)
            .collect();

        let mut hits = Vec::with_capacity(page_items.len());
        let mut page_ids = Vec::with_capacity(page_items.len());
        for candidate in &page_items {
            page_ids.push(candidate.product.id.as_str().to_string());
            hits.push(self.shape_product_hit(candidate).await);
        }

        // Count an appearance for each product on the returned page only.
        self.bump_product_appearances(page_ids);

        Ok(Page::new(hits, total, filter.page, filter.limit))
    }

    pub(crate) async fn shape_product_hit(&self, candidate: &ProductCandidate) -> ProductHit {
        let product = &candidate.product;
        ProductHit {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            subcategory: product.subcategory.clone(),
            images: product.images.clone(),
            price: product.price,
            original_price: product.original_price,
            currency: product.currency.clone(),
            in_stock: product.in_stock,
            distance_km: candidate.distance_m.map(|m| m / 1000.0),
            vendor: VendorSummary::from_vendor(&candidate.vendor),
            location: self.product_location(product, &candidate.vendor).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testutil::*;
    use soko_core::GeoPoint;

    #[tokio::test]
    async fn test_price_low_sort_order() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let vendor = seed_vendor(&fx, "Kola Phones", &state_id).await;
        seed_product(&fx, &vendor, "Charger A", 100.0, "Electronics").await;
        seed_product(&fx, &vendor, "Charger B", 50.0, "Electronics").await;
        seed_product(&fx, &vendor, "Charger C", 75.0, "Electronics").await;

        let filter = SearchFilter::new().with_sort(SortBy::PriceLow);
        let page = fx.engine.search_products(&filter).await;

        let prices: Vec<f64> = page.items.iter().map(|h| h.price).collect();
        assert_eq!(prices, vec![50.0, 75.0, 100.0]);
    }

    #[tokio::test]
    async fn test_total_independent_of_pagination() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let vendor = seed_vendor(&fx, "Kola Phones", &state_id).await;
        for i in 0..7 {
            seed_product(&fx, &vendor, &format!("Item {i}"), 100.0 + i as f64, "Misc").await;
        }

        let filter = SearchFilter::new().with_pagination(2, 3);
        let page = fx.engine.search_products(&filter).await;
        assert_eq!(page.total, 7);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn test_pagination_reassembles_full_set() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let vendor = seed_vendor(&fx, "Kola Phones", &state_id).await;
        for i in 0..10 {
            seed_product(&fx, &vendor, &format!("Item {i}"), (i * 10) as f64, "Misc").await;
        }

        let mut seen = Vec::new();
        for page_no in 1..=4 {
            let filter = SearchFilter::new()
                .with_sort(SortBy::PriceLow)
                .with_pagination(page_no, 3);
            let page = fx.engine.search_products(&filter).await;
            seen.extend(page.items.into_iter().map(|h| h.id));
        }

        assert_eq!(seen.len(), 10);
        let mut deduped = seen.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), 10, "no duplicates across pages");
    }

    #[tokio::test]
    async fn test_inactive_vendor_products_never_surface() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let vendor = seed_vendor(&fx, "Ghost Shop", &state_id).await;
        seed_product(&fx, &vendor, "Orphan TV", 120_000.0, "Electronics").await;
        fx.vendors
            .update(vendor.id.as_str(), |v| v.is_active = false)
            .await
            .unwrap();

        let page = fx.engine.search_products(&SearchFilter::new()).await;
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_unapproved_products_excluded_by_default() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let vendor = seed_vendor(&fx, "Kola Phones", &state_id).await;
        seed_product(&fx, &vendor, "Visible", 100.0, "Misc").await;
        let mut pending = Product::new(vendor.id.clone(), "Hidden", 100.0, "Misc");
        pending.status = ProductStatus::Pending;
        fx.products.insert(pending).await.unwrap();

        let page = fx.engine.search_products(&SearchFilter::new()).await;
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Visible");
    }

    #[tokio::test]
    async fn test_geo_search_bounds_and_distance_field() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let vendor = seed_vendor(&fx, "Kola Phones", &state_id).await;

        let near = seed_product(&fx, &vendor, "Near Fan", 10_000.0, "Appliances").await;
        fx.products
            .update(near.id.as_str(), |doc| {
                doc.point = Some(GeoPoint::new(3.3420, 6.5960))
            })
            .await
            .unwrap();
        let far = seed_product(&fx, &vendor, "Far Fan", 10_000.0, "Appliances").await;
        fx.products
            .update(far.id.as_str(), |doc| {
                doc.point = Some(GeoPoint::new(3.4700, 6.4360))
            })
            .await
            .unwrap();

        let filter = SearchFilter::new().with_geo(3.3375, 6.5966, 10.0);
        let page = fx.engine.search_products(&filter).await;

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, near.id);
        let distance = page.items[0].distance_km.expect("geo hits carry distance");
        assert!(distance <= 10.0);
    }

    #[tokio::test]
    async fn test_verified_only_filters_vendors() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let verified = seed_vendor(&fx, "Verified Shop", &state_id).await;
        let unverified = seed_vendor(&fx, "New Shop", &state_id).await;
        fx.vendors
            .update(unverified.id.as_str(), |v| v.is_verified = false)
            .await
            .unwrap();
        seed_product(&fx, &verified, "Fan A", 5_000.0, "Appliances").await;
        seed_product(&fx, &unverified, "Fan B", 5_000.0, "Appliances").await;

        let mut filter = SearchFilter::new();
        filter.verified_only = true;
        let page = fx.engine.search_products(&filter).await;
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].vendor.business_name, "Verified Shop");
    }

    #[tokio::test]
    async fn test_repeat_search_is_idempotent_on_ordering() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let vendor = seed_vendor(&fx, "Kola Phones", &state_id).await;
        for i in 0..5 {
            seed_product(&fx, &vendor, &format!("Item {i}"), 100.0, "Misc").await;
        }

        let filter = SearchFilter::new();
        let first = fx.engine.search_products(&filter).await;
        let second = fx.engine.search_products(&filter).await;

        let ids_first: Vec<_> = first.items.iter().map(|h| h.id.clone()).collect();
        let ids_second: Vec<_> = second.items.iter().map(|h| h.id.clone()).collect();
        assert_eq!(ids_first, ids_second);
        assert_eq!(first.total, second.total);
    }

    #[tokio::test]
    async fn test_location_names_joined() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let vendor = seed_vendor(&fx, "Kola Phones", &state_id).await;
        seed_product(&fx, &vendor, "Fan", 5_000.0, "Appliances").await;

        let page = fx.engine.search_products(&SearchFilter::new()).await;
        let location = &page.items[0].location;
        assert_eq!(location.state.as_ref().unwrap().name, "Lagos");
        // Area was never seeded; the join tolerates the absence.
        assert!(location.area.is_none());
    }
}
