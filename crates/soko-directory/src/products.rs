//! Product listings: creation, updates, listing, moderation hooks.

use crate::recompute::{Recompute, Recomputer};
use serde::Deserialize;
use soko_core::prelude::*;
use soko_core::SokoError;
use soko_store::Collection;

/// Input for creating a product listing.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub brand: Option<String>,
    #[serde(default)]
    pub kind: ProductKind,
    pub price: f64,
    pub original_price: Option<f64>,
    pub category: String,
    pub subcategory: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub quantity: i64,
    pub unit: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

/// Mutable product fields; everything absent stays unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub quantity: Option<i64>,
    pub in_stock: Option<bool>,
    /// Status changes go through the lifecycle check.
    pub status: Option<ProductStatus>,
}

/// Basic listing filters for the directory surface (not the search engine).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListFilter {
    pub vendor_id: Option<VendorId>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub kind: Option<ProductKind>,
    /// Explicit status; defaults to approved.
    pub status: Option<ProductStatus>,
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// A page of products from the directory listing surface.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

/// Service over product listings.
#[derive(Clone)]
pub struct ProductService {
    products: Collection<Product>,
    vendors: Collection<Vendor>,
    catalog: Collection<CatalogItem>,
    recomputer: Recomputer,
}

impl ProductService {
    pub fn new(
        products: Collection<Product>,
        vendors: Collection<Vendor>,
        catalog: Collection<CatalogItem>,
        recomputer: Recomputer,
    ) -> Self {
        Self {
            products,
            vendors,
            catalog,
            recomputer,
        }
    }

    /// Create a listing for the vendor owned by `user_id`.
    ///
    /// Links the listing to the catalog by SKU, then barcode; snapshots the
    /// vendor's location onto the product; starts the lifecycle at pending.
    pub async fn create(&self, user_id: &UserId, input: NewProduct) -> Result<Product, SokoError> {
        if input.price < 0.0 || !input.price.is_finite() {
            return Err(SokoError::Validation(format!(
                "invalid price: {}",
                input.price
            )));
        }

        let vendor = self
            .vendors
            .find_one(|v| &v.user_id == user_id)
            .await
            .ok_or_else(|| SokoError::VendorNotFound(format!("for user {user_id}")))?;

        let catalog_item_id = self
            .link_catalog_item(input.sku.as_deref(), input.barcode.as_deref())
            .await;

        let mut product = Product::new(vendor.id.clone(), input.name, input.price, input.category);
        product.description = input.description;
        product.sku = input.sku;
        product.barcode = input.barcode;
        product.brand = input.brand;
        product.kind = input.kind;
        product.original_price = input.original_price;
        product.subcategory = input.subcategory;
        product.tags = input.tags;
        product.images = input.images;
        product.quantity = input.quantity;
        product.unit = input.unit;
        product.in_stock = input.in_stock;
        product.catalog_item_id = catalog_item_id.clone();

        // Snapshot, not a live reference: re-copied only by an explicit
        // resync when the vendor moves.
        product.state_id = Some(vendor.state_id.clone());
        product.area_id = Some(vendor.area_id.clone());
        product.market_id = vendor.market_id.clone();
        product.point = vendor.point;

        self.products
            .insert(product.clone())
            .await
            .map_err(|e| SokoError::Store(e.to_string()))?;

        self.recomputer
            .run(Recompute::VendorAggregates(vendor.id.clone()))
            .await;
        if let Some(item_id) = catalog_item_id {
            self.recomputer.run(Recompute::CatalogStats(item_id)).await;
        }

        Ok(product)
    }

    /// Match the listing against the catalog: SKU first, then barcode.
    async fn link_catalog_item(
        &self,
        sku: Option<&str>,
        barcode: Option<&str>,
    ) -> Option<CatalogItemId> {
        if let Some(sku) = sku.filter(|s| !s.is_empty()) {
            if let Some(item) = self
                .catalog
                .find_one(|c| c.sku.as_deref() == Some(sku))
                .await
            {
                return Some(item.id);
            }
        }
        if let Some(barcode) = barcode.filter(|b| !b.is_empty()) {
            if let Some(item) = self
                .catalog
                .find_one(|c| c.barcode.as_deref() == Some(barcode))
                .await
            {
                return Some(item.id);
            }
        }
        None
    }

    /// Fetch one product and count the view, fire-and-forget.
    pub async fn get(&self, id: &ProductId) -> Result<Product, SokoError> {
        let product = self
            .products
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::ProductNotFound(id.to_string()))?;

        let products = self.products.clone();
        let product_id = id.as_str().to_string();
        tokio::spawn(async move {
            let _ = products.update_many(&[product_id], |p| p.views += 1).await;
        });

        Ok(product)
    }

    /// Directory listing with basic filters and pagination, newest first.
    pub async fn list(&self, filter: &ProductListFilter) -> ProductPage {
        let page = filter.page.unwrap_or(1).max(1);
        let limit = filter.limit.unwrap_or(20).clamp(1, 100);
        let status = filter.status.unwrap_or(ProductStatus::Approved);
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut products = self
            .products
            .find(|p| {
                p.is_active
                    && p.status == status
                    && filter
                        .vendor_id
                        .as_ref()
                        .map_or(true, |id| &p.vendor_id == id)
                    && filter.category.as_ref().map_or(true, |c| &p.category == c)
                    && filter
                        .subcategory
                        .as_ref()
                        .map_or(true, |s| p.subcategory.as_ref() == Some(s))
                    && filter.kind.map_or(true, |k| p.kind == k)
                    && filter.min_price.map_or(true, |min| p.price >= min)
                    && filter.max_price.map_or(true, |max| p.price <= max)
                    && search.as_ref().map_or(true, |q| {
                        p.name.to_lowercase().contains(q)
                            || p.description
                                .as_deref()
                                .is_some_and(|d| d.to_lowercase().contains(q))
                            || p.tags.iter().any(|t| t.to_lowercase().contains(q))
                    })
            })
            .await;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = products.len() as i64;
        let offset = ((page - 1) * limit).max(0) as usize;
        let items: Vec<Product> = products
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();

        ProductPage {
            products: items,
            total,
            page,
            total_pages: (total + limit - 1) / limit,
        }
    }

    /// All of one vendor's listings, any status, newest first.
    pub async fn list_for_vendor(&self, vendor_id: &VendorId) -> Vec<Product> {
        let mut products = self.products.find(|p| &p.vendor_id == vendor_id).await;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products
    }

    /// Update a listing. Only the owning vendor's user may do this; price
    /// and status changes dirty the denormalized aggregates.
    pub async fn update(
        &self,
        id: &ProductId,
        user_id: &UserId,
        update: ProductUpdate,
    ) -> Result<Product, SokoError> {
        let product = self
            .products
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::ProductNotFound(id.to_string()))?;

        let vendor = self
            .vendors
            .find_one(|v| &v.user_id == user_id)
            .await
            .ok_or_else(|| SokoError::VendorNotFound(format!("for user {user_id}")))?;
        if product.vendor_id != vendor.id {
            return Err(SokoError::Forbidden(
                "you can only update your own products".into(),
            ));
        }

        self.apply_update(&product, update).await
    }

    /// Update any listing, without the ownership check (admin path).
    pub async fn admin_update(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, SokoError> {
        let product = self
            .products
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::ProductNotFound(id.to_string()))?;
        self.apply_update(&product, update).await
    }

    async fn apply_update(
        &self,
        product: &Product,
        update: ProductUpdate,
    ) -> Result<Product, SokoError> {
        if let Some(price) = update.price {
            if price < 0.0 || !price.is_finite() {
                return Err(SokoError::Validation(format!("invalid price: {price}")));
            }
        }
        if let Some(next) = update.status {
            if !product.status.can_transition_to(next) {
                return Err(SokoError::InvalidStatusTransition {
                    from: product.status.as_str().to_string(),
                    to: next.as_str().to_string(),
                });
            }
        }

        let updated = self
            .products
            .update(product.id.as_str(), |p| {
                if let Some(name) = update.name.clone() {
                    p.name = name;
                }
                if let Some(description) = update.description.clone() {
                    p.description = Some(description);
                }
                if let Some(brand) = update.brand.clone() {
                    p.brand = Some(brand);
                }
                if let Some(price) = update.price {
                    p.price = price;
                }
                if let Some(original) = update.original_price {
                    p.original_price = Some(original);
                }
                if let Some(category) = update.category.clone() {
                    p.category = category;
                }
                if let Some(subcategory) = update.subcategory.clone() {
                    p.subcategory = Some(subcategory);
                }
                if let Some(tags) = update.tags.clone() {
                    p.tags = tags;
                }
                if let Some(images) = update.images.clone() {
                    p.images = images;
                }
                if let Some(quantity) = update.quantity {
                    p.quantity = quantity;
                    if quantity > 0 {
                        p.last_restocked = Some(soko_core::unix_timestamp());
                    }
                }
                if let Some(in_stock) = update.in_stock {
                    p.in_stock = in_stock;
                }
                if let Some(status) = update.status {
                    p.status = status;
                }
            })
            .await
            .map_err(|_| SokoError::ProductNotFound(product.id.to_string()))?;

        self.recompute_for(&updated).await;
        Ok(updated)
    }

    /// Delete a listing (ownership enforced) and refresh the aggregates it
    /// participated in.
    pub async fn delete(&self, id: &ProductId, user_id: &UserId) -> Result<(), SokoError> {
        let product = self
            .products
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::ProductNotFound(id.to_string()))?;

        let vendor = self
            .vendors
            .find_one(|v| &v.user_id == user_id)
            .await
            .ok_or_else(|| SokoError::VendorNotFound(format!("for user {user_id}")))?;
        if product.vendor_id != vendor.id {
            return Err(SokoError::Forbidden(
                "you can only delete your own products".into(),
            ));
        }

        self.products.remove(id.as_str()).await;
        self.recompute_for(&product).await;
        Ok(())
    }

    /// Re-copy the owning vendor's location snapshot onto all its listings.
    /// Explicitly invoked after a vendor moves; never automatic.
    pub async fn resync_locations(&self, vendor_id: &VendorId) -> Result<usize, SokoError> {
        let vendor = self
            .vendors
            .get(vendor_id.as_str())
            .await
            .ok_or_else(|| SokoError::VendorNotFound(vendor_id.to_string()))?;

        let ids: Vec<String> = self
            .products
            .find(|p| &p.vendor_id == vendor_id)
            .await
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect();

        let state_id = vendor.state_id.clone();
        let area_id = vendor.area_id.clone();
        let market_id = vendor.market_id.clone();
        let point = vendor.point;
        let touched = self
            .products
            .update_many(&ids, |p| {
                p.state_id = Some(state_id.clone());
                p.area_id = Some(area_id.clone());
                p.market_id = market_id.clone();
                p.point = point;
            })
            .await;
        Ok(touched)
    }

    async fn recompute_for(&self, product: &Product) {
        self.recomputer
            .run(Recompute::VendorAggregates(product.vendor_id.clone()))
            .await;
        if let Some(item_id) = &product.catalog_item_id {
            self.recomputer
                .run(Recompute::CatalogStats(item_id.clone()))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        svc: ProductService,
        products: Collection<Product>,
        vendors: Collection<Vendor>,
        catalog: Collection<CatalogItem>,
        owner: User,
        vendor: Vendor,
    }

    async fn fixture() -> Fixture {
        let products = Collection::new();
        let vendors = Collection::new();
        let catalog = Collection::new();
        let recomputer = Recomputer::new(products.clone(), vendors.clone(), catalog.clone());
        let svc = ProductService::new(
            products.clone(),
            vendors.clone(),
            catalog.clone(),
            recomputer,
        );

        let owner = User::new("Ada", "Obi", "ada@example.com", "+2348000000001");
        let vendor = Vendor::new(
            owner.id.clone(),
            "Kola Phones",
            VendorType::MarketShop,
            StateId::new("st-lagos"),
            AreaId::new("ar-ikeja"),
            ContactDetails::with_phone("+2348011111111"),
        );
        vendors.insert(vendor.clone()).await.unwrap();

        Fixture {
            svc,
            products,
            vendors,
            catalog,
            owner,
            vendor,
        }
    }

    fn new_product(name: &str, price: f64) -> NewProduct {
        NewProduct {
            name: name.into(),
            description: None,
            sku: None,
            barcode: None,
            brand: None,
            kind: ProductKind::Sale,
            price,
            original_price: None,
            category: "Electronics".into(),
            subcategory: None,
            tags: vec![],
            images: vec![],
            quantity: 1,
            unit: None,
            in_stock: true,
        }
    }

    #[tokio::test]
    async fn test_create_snapshots_vendor_location() {
        let fx = fixture().await;
        let product = fx
            .svc
            .create(&fx.owner.id, new_product("Fan", 5_000.0))
            .await
            .unwrap();
        assert_eq!(product.state_id, Some(fx.vendor.state_id.clone()));
        assert_eq!(product.area_id, Some(fx.vendor.area_id.clone()));
        assert_eq!(product.status, ProductStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_links_catalog_by_sku() {
        let fx = fixture().await;
        let mut item = CatalogItem::new("iPhone 15", "Electronics");
        item.sku = Some("APL-IP15".into());
        fx.catalog.insert(item.clone()).await.unwrap();

        let mut input = new_product("iPhone 15", 950_000.0);
        input.sku = Some("APL-IP15".into());
        let product = fx.svc.create(&fx.owner.id, input).await.unwrap();
        assert_eq!(product.catalog_item_id, Some(item.id));
    }

    #[tokio::test]
    async fn test_create_links_catalog_by_barcode_when_no_sku_match() {
        let fx = fixture().await;
        let mut item = CatalogItem::new("Coke 50cl", "Drinks");
        item.barcode = Some("5449000000996".into());
        fx.catalog.insert(item.clone()).await.unwrap();

        let mut input = new_product("Coca-Cola 50cl", 500.0);
        input.barcode = Some("5449000000996".into());
        let product = fx.svc.create(&fx.owner.id, input).await.unwrap();
        assert_eq!(product.catalog_item_id, Some(item.id));
    }

    #[tokio::test]
    async fn test_create_recomputes_vendor_aggregates() {
        let fx = fixture().await;
        fx.svc
            .create(&fx.owner.id, new_product("Fan", 5_000.0))
            .await
            .unwrap();
        let vendor = fx.vendors.get(fx.vendor.id.as_str()).await.unwrap();
        // Pending listings count toward total but not the price range yet.
        assert_eq!(vendor.total_products, 1);
        assert_eq!(vendor.min_product_price, 0.0);
    }

    #[tokio::test]
    async fn test_approval_then_price_range() {
        let fx = fixture().await;
        let product = fx
            .svc
            .create(&fx.owner.id, new_product("Fan", 5_000.0))
            .await
            .unwrap();

        let mut update = ProductUpdate::default();
        update.status = Some(ProductStatus::Approved);
        fx.svc.admin_update(&product.id, update).await.unwrap();

        let vendor = fx.vendors.get(fx.vendor.id.as_str()).await.unwrap();
        assert_eq!(vendor.min_product_price, 5_000.0);
        assert_eq!(vendor.max_product_price, 5_000.0);
    }

    #[tokio::test]
    async fn test_invalid_status_transition_rejected() {
        let fx = fixture().await;
        let product = fx
            .svc
            .create(&fx.owner.id, new_product("Fan", 5_000.0))
            .await
            .unwrap();

        let mut update = ProductUpdate::default();
        update.status = Some(ProductStatus::Discontinued);
        let err = fx.svc.admin_update(&product.id, update).await.unwrap_err();
        assert!(matches!(err, SokoError::InvalidStatusTransition { .. }));
    }

    #[tokio::test]
    async fn test_update_requires_ownership() {
        let fx = fixture().await;
        let product = fx
            .svc
            .create(&fx.owner.id, new_product("Fan", 5_000.0))
            .await
            .unwrap();

        // A second vendor's user cannot touch it.
        let other_user = User::new("Bola", "Ade", "bola@example.com", "+2348000000002");
        let other_vendor = Vendor::new(
            other_user.id.clone(),
            "Bola Stores",
            VendorType::MarketShop,
            StateId::new("st-lagos"),
            AreaId::new("ar-ikeja"),
            ContactDetails::with_phone("+2348022222222"),
        );
        fx.vendors.insert(other_vendor).await.unwrap();

        let mut update = ProductUpdate::default();
        update.price = Some(1.0);
        let err = fx
            .svc
            .update(&product.id, &other_user.id, update)
            .await
            .unwrap_err();
        assert!(matches!(err, SokoError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_delete_recomputes_catalog_stats() {
        let fx = fixture().await;
        let mut item = CatalogItem::new("iPhone 15", "Electronics");
        item.sku = Some("APL-IP15".into());
        fx.catalog.insert(item.clone()).await.unwrap();

        let mut input = new_product("iPhone 15", 950_000.0);
        input.sku = Some("APL-IP15".into());
        let product = fx.svc.create(&fx.owner.id, input).await.unwrap();
        let mut update = ProductUpdate::default();
        update.status = Some(ProductStatus::Approved);
        fx.svc.admin_update(&product.id, update).await.unwrap();
        assert_eq!(
            fx.catalog.get(item.id.as_str()).await.unwrap().total_listings,
            1
        );

        fx.svc.delete(&product.id, &fx.owner.id).await.unwrap();
        let after = fx.catalog.get(item.id.as_str()).await.unwrap();
        assert_eq!(after.total_listings, 0);
        assert_eq!(after.lowest_price, 0.0);
    }

    #[tokio::test]
    async fn test_list_defaults_to_approved() {
        let fx = fixture().await;
        let approved = fx
            .svc
            .create(&fx.owner.id, new_product("Fan", 5_000.0))
            .await
            .unwrap();
        let mut update = ProductUpdate::default();
        update.status = Some(ProductStatus::Approved);
        fx.svc.admin_update(&approved.id, update).await.unwrap();
        fx.svc
            .create(&fx.owner.id, new_product("Pending Fan", 6_000.0))
            .await
            .unwrap();

        let page = fx.svc.list(&ProductListFilter::default()).await;
        assert_eq!(page.total, 1);
        assert_eq!(page.products[0].name, "Fan");

        let mut filter = ProductListFilter::default();
        filter.status = Some(ProductStatus::Pending);
        assert_eq!(fx.svc.list(&filter).await.total, 1);
    }

    #[tokio::test]
    async fn test_resync_locations() {
        let fx = fixture().await;
        let product = fx
            .svc
            .create(&fx.owner.id, new_product("Fan", 5_000.0))
            .await
            .unwrap();

        fx.vendors
            .update(fx.vendor.id.as_str(), |v| {
                v.state_id = StateId::new("st-abuja");
            })
            .await
            .unwrap();

        // Snapshot unchanged until the explicit resync runs.
        let before = fx.products.get(product.id.as_str()).await.unwrap();
        assert_eq!(before.state_id, Some(StateId::new("st-lagos")));

        let touched = fx.svc.resync_locations(&fx.vendor.id).await.unwrap();
        assert_eq!(touched, 1);
        let after = fx.products.get(product.id.as_str()).await.unwrap();
        assert_eq!(after.state_id, Some(StateId::new("st-abuja")));
    }
}
