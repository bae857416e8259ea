//! Explicit recompute of denormalized aggregates.
//!
//! Every product mutation dirties up to two caches: the owning vendor's
//! price range / product count, and — when the product links to a catalog
//! item — that item's price stats. Mutating operations emit a [`Recompute`]
//! task per dirty cache and run it synchronously; there is no transactional
//! guarantee, only eventual agreement with the source of truth.

use soko_core::prelude::*;
use soko_store::Collection;

/// A denormalized aggregate that needs refreshing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recompute {
    /// Vendor price range and product count.
    VendorAggregates(VendorId),
    /// Catalog item price stats over its linked listings.
    CatalogStats(CatalogItemId),
}

/// Executes [`Recompute`] tasks against the collections.
#[derive(Clone)]
pub struct Recomputer {
    products: Collection<Product>,
    vendors: Collection<Vendor>,
    catalog: Collection<CatalogItem>,
}

impl Recomputer {
    pub fn new(
        products: Collection<Product>,
        vendors: Collection<Vendor>,
        catalog: Collection<CatalogItem>,
    ) -> Self {
        Self {
            products,
            vendors,
            catalog,
        }
    }

    pub async fn run(&self, task: Recompute) {
        match task {
            Recompute::VendorAggregates(vendor_id) => self.vendor_aggregates(&vendor_id).await,
            Recompute::CatalogStats(item_id) => self.catalog_stats(&item_id).await,
        }
    }

    /// Refresh `min_product_price`/`max_product_price` over the vendor's
    /// active+approved products (0/0 when there are none) and
    /// `total_products` over its active listings.
    async fn vendor_aggregates(&self, vendor_id: &VendorId) {
        let listings = self
            .products
            .find(|p| &p.vendor_id == vendor_id && p.is_active)
            .await;

        let total_products = listings.len() as i64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut any_approved = false;
        for p in &listings {
            if p.status == ProductStatus::Approved {
                any_approved = true;
                min = min.min(p.price);
                max = max.max(p.price);
            }
        }
        let (min, max) = if any_approved { (min, max) } else { (0.0, 0.0) };

        if let Err(err) = self
            .vendors
            .update(vendor_id.as_str(), |v| {
                v.total_products = total_products;
                v.min_product_price = min;
                v.max_product_price = max;
            })
            .await
        {
            tracing::warn!(vendor = %vendor_id, error = %err, "vendor aggregate recompute skipped");
        }
    }

    /// Refresh a catalog item's price stats over its linked active+approved
    /// listings.
    async fn catalog_stats(&self, item_id: &CatalogItemId) {
        let prices: Vec<f64> = self
            .products
            .find(|p| p.catalog_item_id.as_ref() == Some(item_id) && p.is_searchable())
            .await
            .into_iter()
            .map(|p| p.price)
            .collect();

        if let Err(err) = self
            .catalog
            .update(item_id.as_str(), |item| item.apply_price_stats(&prices))
            .await
        {
            tracing::warn!(item = %item_id, error = %err, "catalog stats recompute skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soko_core::ids::UserId;

    fn collections() -> (Collection<Product>, Collection<Vendor>, Collection<CatalogItem>) {
        (Collection::new(), Collection::new(), Collection::new())
    }

    fn vendor() -> Vendor {
        Vendor::new(
            UserId::generate(),
            "Kola Phones",
            VendorType::MarketShop,
            StateId::new("st-1"),
            AreaId::new("ar-1"),
            ContactDetails::with_phone("+2348011111111"),
        )
    }

    fn approved(vendor_id: &VendorId, price: f64) -> Product {
        let mut p = Product::new(vendor_id.clone(), "Item", price, "Misc");
        p.status = ProductStatus::Approved;
        p
    }

    #[tokio::test]
    async fn test_vendor_aggregates_min_max() {
        let (products, vendors, catalog) = collections();
        let v = vendor();
        vendors.insert(v.clone()).await.unwrap();
        products.insert(approved(&v.id, 300.0)).await.unwrap();
        products.insert(approved(&v.id, 100.0)).await.unwrap();
        let mut pending = Product::new(v.id.clone(), "Pending", 5.0, "Misc");
        pending.status = ProductStatus::Pending;
        products.insert(pending).await.unwrap();

        let recomputer = Recomputer::new(products, vendors.clone(), catalog);
        recomputer
            .run(Recompute::VendorAggregates(v.id.clone()))
            .await;

        let updated = vendors.get(v.id.as_str()).await.unwrap();
        // Pending listing counts as a listing but not toward the price range.
        assert_eq!(updated.total_products, 3);
        assert_eq!(updated.min_product_price, 100.0);
        assert_eq!(updated.max_product_price, 300.0);
    }

    #[tokio::test]
    async fn test_vendor_aggregates_empty_resets_to_zero() {
        let (products, vendors, catalog) = collections();
        let v = {
            let mut v = vendor();
            v.min_product_price = 50.0;
            v.max_product_price = 900.0;
            v
        };
        vendors.insert(v.clone()).await.unwrap();

        let recomputer = Recomputer::new(products, vendors.clone(), catalog);
        recomputer
            .run(Recompute::VendorAggregates(v.id.clone()))
            .await;

        let updated = vendors.get(v.id.as_str()).await.unwrap();
        assert_eq!(updated.min_product_price, 0.0);
        assert_eq!(updated.max_product_price, 0.0);
        assert_eq!(updated.total_products, 0);
    }

    #[tokio::test]
    async fn test_catalog_stats_over_linked_listings() {
        let (products, vendors, catalog) = collections();
        let v = vendor();
        vendors.insert(v.clone()).await.unwrap();
        let item = CatalogItem::new("iPhone 15", "Electronics");
        catalog.insert(item.clone()).await.unwrap();

        for price in [950_000.0, 980_000.0] {
            let mut p = approved(&v.id, price);
            p.catalog_item_id = Some(item.id.clone());
            products.insert(p).await.unwrap();
        }
        // An inactive linked listing is ignored.
        let mut inactive = approved(&v.id, 1.0);
        inactive.catalog_item_id = Some(item.id.clone());
        inactive.is_active = false;
        products.insert(inactive).await.unwrap();

        let recomputer = Recomputer::new(products, vendors, catalog.clone());
        recomputer.run(Recompute::CatalogStats(item.id.clone())).await;

        let updated = catalog.get(item.id.as_str()).await.unwrap();
        assert_eq!(updated.total_listings, 2);
        assert_eq!(updated.lowest_price, 950_000.0);
        assert_eq!(updated.highest_price, 980_000.0);
        assert_eq!(updated.average_price, 965_000.0);
    }

    #[tokio::test]
    async fn test_recompute_missing_vendor_is_silent() {
        let (products, vendors, catalog) = collections();
        let recomputer = Recomputer::new(products, vendors, catalog);
        // Must not panic or error out.
        recomputer
            .run(Recompute::VendorAggregates(VendorId::new("gone")))
            .await;
    }
}
