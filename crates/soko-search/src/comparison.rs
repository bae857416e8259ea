//! Cross-vendor price comparison.
//!
//! Groups matching listings into bundles of "the same product sold by many
//! vendors". The grouping key is the SKU when present, else the lowercase
//! name — a heuristic join, not an authoritative identity.

use crate::engine::SearchEngine;
use crate::filter::SearchFilter;
use crate::matcher::ProductMatch;
use crate::results::{ComparisonGroup, ComparisonResult, PriceRange, ShopHours, VendorOffer};
use soko_core::prelude::*;
use soko_core::{round2, SokoError};
use std::collections::HashMap;

/// Presentation cap: only the most-compared groups are returned.
const MAX_COMPARISON_GROUPS: usize = 20;

struct GroupAccum {
    key: String,
    first: Product,
    offers: Vec<VendorOffer>,
}

impl SearchEngine {
    /// Bundle all listings matching the filter into comparison groups,
    /// ordered by vendor count descending, capped to the top 20.
    pub async fn compare_products(&self, filter: &SearchFilter) -> ComparisonResult {
        let matcher = ProductMatch::from_filter(filter);
        match self.group_listings(matcher).await {
            Ok(mut groups) => {
                groups.sort_by(|a, b| b.total_vendors.cmp(&a.total_vendors));
                groups.truncate(MAX_COMPARISON_GROUPS);
                let total = groups.len() as i64;
                ComparisonResult {
                    items: groups,
                    total,
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "product comparison pipeline failed; returning empty result");
                ComparisonResult::default()
            }
        }
    }

    /// One comparison bundle for a single named product across all eligible
    /// vendors: listings whose name contains the query case-insensitively,
    /// or whose SKU or barcode equals it literally.
    pub async fn product_vendors(
        &self,
        product_name: &str,
        filter: &SearchFilter,
    ) -> Result<Option<ComparisonGroup>, SokoError> {
        let matcher = ProductMatch::from_filter(filter);
        let name_lower = product_name.to_lowercase();

        let listings = self
            .products
            .find(|p| {
                p.is_searchable()
                    && (p.name.to_lowercase().contains(&name_lower)
                        || p.sku.as_deref() == Some(product_name)
                        || p.barcode.as_deref() == Some(product_name))
                    && matcher.matches(p)
            })
            .await;

        // A single bundle keyed by lowercase name: take the first group in
        // listing order.
        let groups = self.accumulate_groups(listings, |p| p.name.to_lowercase()).await?;
        Ok(self.shape_first_group(groups))
    }

    async fn group_listings(
        &self,
        matcher: ProductMatch,
    ) -> Result<Vec<ComparisonGroup>, SokoError> {
        let listings = self.products.find(|p| matcher.matches(p)).await;
        let groups = self
            .accumulate_groups(listings, |p| match p.sku_key() {
                Some(sku) => sku.to_string(),
                None => p.name.to_lowercase(),
            })
            .await?;
        Ok(groups.into_iter().map(shape_group).collect())
    }

    /// Fold listings into groups in listing order, joining each listing's
    /// vendor and dropping listings of missing or inactive vendors.
    async fn accumulate_groups<K>(
        &self,
        listings: Vec<Product>,
        key_of: K,
    ) -> Result<Vec<GroupAccum>, SokoError>
    where
        K: Fn(&Product) -> String,
    {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, GroupAccum> = HashMap::new();

        for product in listings {
            let Some(vendor) = self.vendors.get(product.vendor_id.as_str()).await else {
                continue;
            };
            if !vendor.is_active {
                continue;
            }

            let offer = self.shape_offer(&product, &vendor).await;
            let key = key_of(&product);
            match groups.get_mut(&key) {
                Some(group) => group.offers.push(offer),
                None => {
                    order.push(key.clone());
                    groups.insert(
                        key.clone(),
                        GroupAccum {
                            key,
                            first: product,
                            offers: vec![offer],
                        },
                    );
                }
            }
        }

        Ok(order
            .into_iter()
            .filter_map(|key| groups.remove(&key))
            .collect())
    }

    fn shape_first_group(&self, groups: Vec<GroupAccum>) -> Option<ComparisonGroup> {
        groups.into_iter().next().map(shape_group)
    }

    async fn shape_offer(&self, product: &Product, vendor: &Vendor) -> VendorOffer {
        VendorOffer {
            vendor_id: vendor.id.clone(),
            product_id: product.id.clone(),
            business_name: vendor.business_name.clone(),
            logo: vendor.logo().map(str::to_string),
            entrance_photo: vendor.entrance_photo().map(str::to_string),
            rating: vendor.rating,
            is_verified: vendor.is_verified,
            price: product.price,
            original_price: product.original_price,
            in_stock: product.in_stock,
            quantity: product.quantity,
            contact_details: vendor.contact_details.clone(),
            bank_details: vendor.bank_details.clone(),
            location: self.vendor_location(vendor).await,
            operating_hours: ShopHours::from_vendor(vendor),
        }
    }
}

fn shape_group(accum: GroupAccum) -> ComparisonGroup {
    let mut offers = accum.offers;
    // Price ascending; stable, so equal prices keep listing order.
    offers.sort_by(|a, b| a.price.total_cmp(&b.price));

    let lowest = offers
        .iter()
        .map(|o| o.price)
        .fold(f64::INFINITY, f64::min);
    let highest = offers
        .iter()
        .map(|o| o.price)
        .fold(f64::NEG_INFINITY, f64::max);
    let average = offers.iter().map(|o| o.price).sum::<f64>() / offers.len() as f64;

    let first = accum.first;
    ComparisonGroup {
        id: accum.key,
        catalog_item_id: first.catalog_item_id,
        name: first.name,
        description: first.description,
        brand: first.brand,
        category: first.category,
        subcategory: first.subcategory,
        images: first.images,
        price_range: PriceRange {
            lowest,
            highest,
            average: round2(average),
            currency: "NGN".to_string(),
        },
        total_vendors: offers.len() as i64,
        vendors: offers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testutil::*;

    #[tokio::test]
    async fn test_same_name_two_vendors_one_group() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let kola = seed_vendor(&fx, "Kola Phones", &state_id).await;
        let ada = seed_vendor(&fx, "Ada Gadgets", &state_id).await;
        seed_product(&fx, &kola, "iPhone 15", 950_000.0, "Electronics").await;
        seed_product(&fx, &ada, "iPhone 15", 980_000.0, "Electronics").await;

        let filter = SearchFilter::new().with_query("iPhone 15");
        let result = fx.engine.compare_products(&filter).await;

        assert_eq!(result.items.len(), 1);
        let group = &result.items[0];
        assert_eq!(group.total_vendors, 2);
        assert_eq!(group.price_range.lowest, 950_000.0);
        assert_eq!(group.price_range.highest, 980_000.0);
        assert_eq!(group.vendors[0].price, 950_000.0);
        assert_eq!(group.vendors[0].business_name, "Kola Phones");
    }

    #[tokio::test]
    async fn test_sku_grouping_beats_name() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let kola = seed_vendor(&fx, "Kola Phones", &state_id).await;
        let ada = seed_vendor(&fx, "Ada Gadgets", &state_id).await;

        let a = seed_product(&fx, &kola, "iPhone 15 128GB Black", 950_000.0, "Electronics").await;
        fx.products
            .update(a.id.as_str(), |p| p.sku = Some("APL-IP15-128".into()))
            .await
            .unwrap();
        let b = seed_product(&fx, &ada, "Apple iPhone 15 (128 GB)", 980_000.0, "Electronics").await;
        fx.products
            .update(b.id.as_str(), |p| p.sku = Some("APL-IP15-128".into()))
            .await
            .unwrap();

        let result = fx.engine.compare_products(&SearchFilter::new()).await;
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].id, "APL-IP15-128");
        assert_eq!(result.items[0].total_vendors, 2);
    }

    #[tokio::test]
    async fn test_case_insensitive_name_key() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let kola = seed_vendor(&fx, "Kola Phones", &state_id).await;
        let ada = seed_vendor(&fx, "Ada Gadgets", &state_id).await;
        seed_product(&fx, &kola, "Infinix Note 40", 350_000.0, "Electronics").await;
        seed_product(&fx, &ada, "INFINIX NOTE 40", 340_000.0, "Electronics").await;

        let result = fx.engine.compare_products(&SearchFilter::new()).await;
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].total_vendors, 2);
    }

    #[tokio::test]
    async fn test_inactive_vendor_offers_excluded() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let kola = seed_vendor(&fx, "Kola Phones", &state_id).await;
        let ghost = seed_vendor(&fx, "Ghost Shop", &state_id).await;
        seed_product(&fx, &kola, "iPhone 15", 950_000.0, "Electronics").await;
        seed_product(&fx, &ghost, "iPhone 15", 900_000.0, "Electronics").await;
        fx.vendors
            .update(ghost.id.as_str(), |v| v.is_active = false)
            .await
            .unwrap();

        let result = fx.engine.compare_products(&SearchFilter::new()).await;
        assert_eq!(result.items.len(), 1);
        let group = &result.items[0];
        assert_eq!(group.total_vendors, 1);
        assert_eq!(group.price_range.lowest, 950_000.0);
    }

    #[tokio::test]
    async fn test_groups_ordered_by_vendor_count() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let v1 = seed_vendor(&fx, "Shop 1", &state_id).await;
        let v2 = seed_vendor(&fx, "Shop 2", &state_id).await;
        let v3 = seed_vendor(&fx, "Shop 3", &state_id).await;

        seed_product(&fx, &v1, "Lone Gadget", 10_000.0, "Electronics").await;
        for v in [&v1, &v2, &v3] {
            seed_product(&fx, v, "Popular Gadget", 12_000.0, "Electronics").await;
        }

        let result = fx.engine.compare_products(&SearchFilter::new()).await;
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].name, "Popular Gadget");
        assert_eq!(result.items[0].total_vendors, 3);
    }

    #[tokio::test]
    async fn test_average_rounded_two_decimals() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let v1 = seed_vendor(&fx, "Shop 1", &state_id).await;
        let v2 = seed_vendor(&fx, "Shop 2", &state_id).await;
        let v3 = seed_vendor(&fx, "Shop 3", &state_id).await;
        seed_product(&fx, &v1, "Widget", 100.0, "Misc").await;
        seed_product(&fx, &v2, "Widget", 100.0, "Misc").await;
        seed_product(&fx, &v3, "Widget", 101.0, "Misc").await;

        let result = fx.engine.compare_products(&SearchFilter::new()).await;
        assert_eq!(result.items[0].price_range.average, 100.33);
    }

    #[tokio::test]
    async fn test_product_vendors_single_bundle() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let kola = seed_vendor(&fx, "Kola Phones", &state_id).await;
        let ada = seed_vendor(&fx, "Ada Gadgets", &state_id).await;
        seed_product(&fx, &kola, "Tecno Spark 20", 180_000.0, "Electronics").await;
        seed_product(&fx, &ada, "Tecno Spark 20", 175_000.0, "Electronics").await;
        seed_product(&fx, &ada, "Tecno Pop 8", 90_000.0, "Electronics").await;

        let group = fx
            .engine
            .product_vendors("Tecno Spark 20", &SearchFilter::new())
            .await
            .unwrap()
            .expect("one bundle");
        assert_eq!(group.total_vendors, 2);
        assert_eq!(group.vendors[0].price, 175_000.0);
    }

    #[tokio::test]
    async fn test_product_vendors_by_sku() {
        let fx = fixture();
        let state_id = seed_state(&fx, "st-lagos", "Lagos").await;
        let kola = seed_vendor(&fx, "Kola Phones", &state_id).await;
        let p = seed_product(&fx, &kola, "Mystery Box", 5_000.0, "Misc").await;
        fx.products
            .update(p.id.as_str(), |doc| doc.sku = Some("MYST-01".into()))
            .await
            .unwrap();

        let group = fx
            .engine
            .product_vendors("MYST-01", &SearchFilter::new())
            .await
            .unwrap();
        assert!(group.is_some());

        let none = fx
            .engine
            .product_vendors("NO-SUCH", &SearchFilter::new())
            .await
            .unwrap();
        assert!(none.is_none());
    }
}
