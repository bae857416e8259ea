//! Shop search pipeline.

use crate::engine::SearchEngine;
use crate::filter::{ShopFilter, SortBy};
use crate::matcher::VendorMatch;
use crate::results::{FeaturedProduct, Page, ShopHit, ShopHours, ShopPriceRange};
use soko_core::prelude::*;
use soko_core::SokoError;

/// How many preview products each shop hit carries.
const FEATURED_PRODUCTS_PER_SHOP: usize = 4;

struct ShopCandidate {
    vendor: Vendor,
    distance_m: Option<f64>,
}

/// Stable sort by the requested key. The default is featured-first, then
/// verified-first, then rating — deliberately no recency tiebreak.
fn sort_shops(candidates: &mut [ShopCandidate], sort_by: SortBy, is_geo: bool) {
    match sort_by {
        SortBy::Rating => {
            candidates.sort_by(|a, b| b.vendor.rating.total_cmp(&a.vendor.rating));
        }
        SortBy::Popularity => {
            candidates.sort_by(|a, b| b.vendor.total_views.cmp(&a.vendor.total_views));
        }
        SortBy::Newest => {
            candidates.sort_by(|a, b| b.vendor.created_at.cmp(&a.vendor.created_at));
        }
        SortBy::Distance => {
            if is_geo {
                candidates.sort_by(|a, b| {
                    a.distance_m
                        .unwrap_or(f64::MAX)
                        .total_cmp(&b.distance_m.unwrap_or(f64::MAX))
                });
            } else {
                candidates.sort_by(|a, b| b.vendor.created_at.cmp(&a.vendor.created_at));
            }
        }
        _ => {
            candidates.sort_by(|a, b| {
                let by_distance = if is_geo {
                    a.distance_m
                        .unwrap_or(f64::MAX)
                        .total_cmp(&b.distance_m.unwrap_or(f64::MAX))
                } else {
                    std::cmp::Ordering::Equal
                };
                by_distance
                    .then_with(|| b.vendor.is_featured.cmp(&a.vendor.is_featured))
                    .then_with(|| b.vendor.is_verified.cmp(&a.vendor.is_verified))
                    .then_with(|| b.vendor.rating.total_cmp(&a.vendor.rating))
            });
        }
    }
}

impl SearchEngine {
    /// Paginated, filterable, optionally geo-ranked shop search, with a
    /// preview of each shop's most-viewed products.
    pub async fn search_shops(&self, filter: &ShopFilter) -> Page<ShopHit> {
        match self.search_shops_inner(filter).await {
            Ok(page) => page,
            Err(err) => {
                tracing::error!(error = %err, "shop search pipeline failed; returning empty page");
                Page::empty(filter.search.page)
            }
        }
    }

    async fn search_shops_inner(&self, filter: &ShopFilter) -> Result<Page<ShopHit>, SokoError> {
        let search = &filter.search;
        let is_geo = search.geo_point().is_some();
        let matcher = VendorMatch::from_filter(filter);

        let mut candidates: Vec<ShopCandidate> = match search.geo_point() {
            Some(center) => self
                .vendors
                .geo_near(center, search.max_distance_m(), |v| v.point, |v| v.is_active)
                .await
                .into_iter()
                .filter(|hit| matcher.matches(&hit.doc))
                .map(|hit| ShopCandidate {
                    vendor: hit.doc,
                    distance_m: Some(hit.distance_m),
                })
                .collect(),
            None => self
                .vendors
                .find(|v| matcher.matches(v))
                .await
                .into_iter()
                .map(|vendor| ShopCandidate {
                    vendor,
                    distance_m: None,
                })
                .collect(),
        };

        sort_shops(&mut candidates, search.sort_by, is_geo);

        let total = candidates.len() as i64;
        let offset = search.offset().max(0) as usize;
        let page_items: Vec<ShopCandidate> = candidates
            .into_iter()
            .skip(offset)
            .take(search.limit as usize)
            .collect();

        let mut hits = Vec::with_capacity(page_items.len());
        let mut page_ids = Vec::with_capacity(page_items.len());
        for candidate in &page_items {
            page_ids.push(candidate.vendor.id.as_str().to_string());
            hits.push(
                self.shape_shop_hit(&candidate.vendor, candidate.distance_m)
                    .await,
            );
        }

        self.bump_vendor_appearances(page_ids);

        Ok(Page::new(hits, total, search.page, search.limit))
    }

    /// The top-N most-viewed active+approved products of a shop.
    pub(crate) async fn featured_products(&self, vendor_id: &VendorId) -> Vec<FeaturedProduct> {
        let mut products = self
            .products
            .find(|p| &p.vendor_id == vendor_id && p.is_searchable())
            .await;
        products.sort_by(|a, b| b.views.cmp(&a.views));
        products
            .into_iter()
            .take(FEATURED_PRODUCTS_PER_SHOP)
            .map(|p| FeaturedProduct {
                id: p.id.clone(),
                name: p.name.clone(),
                price: p.price,
                image: p.images.first().cloned(),
            })
            .collect()
    }

    pub(crate) async fn shape_shop_hit(
        &self,
        vendor: &Vendor,
        distance_m: Option<f64>,
    ) -> ShopHit {
        let shop_images = vendor.shop_images.clone().unwrap_or_default();
        ShopHit {
            id: vendor.id.clone(),
            business_name: vendor.business_name.clone(),
            business_description: vendor.business_description.clone(),
            vendor_type: vendor.vendor_type,
            logo: shop_images.logo,
            entrance_photo: shop_images.entrance_photo,
            layout_map: shop_images.layout_map,
            rating: vendor.rating,
            review_count: vendor.review_count,
            total_products: vendor.total_products,
            is_verified: vendor.is_verified,
            is_featured: vendor.is_featured,
            categories: vendor.categories.clone(),
            distance_km: distance_m.map(|m| m / 1000.0),
            price_range: ShopPriceRange {
                min: vendor.min_product_price,
                max: vendor.max_product_price,
            },
            contact_details: vendor.contact_details.clone(),
            bank_details: vendor.bank_details.clone(),
            location: self.vendor_location(vendor).await,
            operating_hours: ShopHours::from_vendor(vendor),
            featured_products: self.featured_products(&vendor.id).await,
        }
    }
}
