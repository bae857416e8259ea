//! The search engine: stateless query planning over shared collections.

use crate::filter::{SearchFilter, SearchKind, ShopFilter};
use crate::results::{ListingLocation, MarketRef, NamedRef, SearchMeta, SearchResponse};
use soko_core::prelude::*;
use soko_store::Collection;
use std::time::Instant;

/// Stateless search layer over the directory's collections.
///
/// Cloning shares the underlying collections; the engine holds no other
/// state, so concurrent searches need no coordination.
#[derive(Clone)]
pub struct SearchEngine {
    pub(crate) products: Collection<Product>,
    pub(crate) vendors: Collection<Vendor>,
    pub(crate) states: Collection<State>,
    pub(crate) areas: Collection<Area>,
    pub(crate) markets: Collection<Market>,
}

impl SearchEngine {
    pub fn new(
        products: Collection<Product>,
        vendors: Collection<Vendor>,
        states: Collection<State>,
        areas: Collection<Area>,
        markets: Collection<Market>,
    ) -> Self {
        Self {
            products,
            vendors,
            states,
            areas,
            markets,
        }
    }

    /// Unified search across the requested surfaces.
    ///
    /// Independent branches are issued concurrently and joined; each branch
    /// has already absorbed its own pipeline failures, so the join itself
    /// only fails if the runtime does. Facets are always attached.
    pub async fn search(&self, filter: &SearchFilter, kind: SearchKind) -> SearchResponse {
        let started = Instant::now();

        let mut response = SearchResponse {
            query: filter.query.clone(),
            search_type: kind,
            products: None,
            shops: None,
            product_comparison: None,
            available_filters: Default::default(),
            meta: SearchMeta::default(),
        };

        match kind {
            SearchKind::Products => {
                let (products, comparison) = tokio::join!(
                    self.search_products(filter),
                    self.compare_products(filter),
                );
                response.products = Some(products);
                response.product_comparison = Some(comparison);
            }
            SearchKind::Shops => {
                let shop_filter = ShopFilter::from(filter.clone());
                response.shops = Some(self.search_shops(&shop_filter).await);
            }
            SearchKind::All => {
                let shop_filter = ShopFilter::from(filter.clone());
                let (products, shops, comparison) = tokio::join!(
                    self.search_products(filter),
                    self.search_shops(&shop_filter),
                    self.compare_products(filter),
                );
                response.products = Some(products);
                response.shops = Some(shops);
                response.product_comparison = Some(comparison);
            }
        }

        response.available_filters = self.available_filters(filter).await;
        response.meta = SearchMeta {
            timestamp: chrono::Utc::now().to_rfc3339(),
            took_ms: started.elapsed().as_millis() as u64,
        };
        response
    }

    pub(crate) async fn named_state(&self, id: Option<&StateId>) -> Option<NamedRef> {
        let state = self.states.get(id?.as_str()).await?;
        Some(NamedRef {
            id: state.id.into_inner(),
            name: state.name,
        })
    }

    pub(crate) async fn named_area(&self, id: Option<&AreaId>) -> Option<NamedRef> {
        let area = self.areas.get(id?.as_str()).await?;
        Some(NamedRef {
            id: area.id.into_inner(),
            name: area.name,
        })
    }

    pub(crate) async fn named_market(&self, id: Option<&MarketId>) -> Option<MarketRef> {
        let market = self.markets.get(id?.as_str()).await?;
        Some(MarketRef {
            id: market.id.into_inner(),
            name: market.name,
            market_type: market.market_type,
        })
    }

    /// Location block for a product hit: hierarchy names from the product's
    /// snapshot, shop number/address from the vendor, product coordinates.
    pub(crate) async fn product_location(
        &self,
        product: &Product,
        vendor: &Vendor,
    ) -> ListingLocation {
        ListingLocation {
            state: self.named_state(product.state_id.as_ref()).await,
            area: self.named_area(product.area_id.as_ref()).await,
            market: self.named_market(product.market_id.as_ref()).await,
            shop_number: vendor.shop_number.clone(),
            shop_floor: None,
            shop_block: None,
            shop_address: vendor.shop_address.clone(),
            landmark: None,
            point: product.point,
        }
    }

    /// Location block for a vendor offer or shop hit: hierarchy names plus
    /// the full shop placement and the vendor's own coordinates.
    pub(crate) async fn vendor_location(&self, vendor: &Vendor) -> ListingLocation {
        ListingLocation {
            state: self.named_state(Some(&vendor.state_id)).await,
            area: self.named_area(Some(&vendor.area_id)).await,
            market: self.named_market(vendor.market_id.as_ref()).await,
            shop_number: vendor.shop_number.clone(),
            shop_floor: vendor.shop_floor.clone(),
            shop_block: vendor.shop_block.clone(),
            shop_address: vendor.shop_address.clone(),
            landmark: vendor.landmark.clone(),
            point: vendor.point,
        }
    }

    /// Fire-and-forget `search_appearances` bump for the returned page of
    /// products. Never blocks or fails the response path.
    pub(crate) fn bump_product_appearances(&self, ids: Vec<String>) {
        if ids.is_empty() {
            return;
        }
        let products = self.products.clone();
        tokio::spawn(async move {
            let touched = products
                .update_many(&ids, |p| p.search_appearances += 1)
                .await;
            tracing::trace!(touched, "bumped product search appearances");
        });
    }

    /// Fire-and-forget `search_appearances` bump for returned shops.
    pub(crate) fn bump_vendor_appearances(&self, ids: Vec<String>) {
        if ids.is_empty() {
            return;
        }
        let vendors = self.vendors.clone();
        tokio::spawn(async move {
            let touched = vendors
                .update_many(&ids, |v| v.search_appearances += 1)
                .await;
            tracing::trace!(touched, "bumped vendor search appearances");
        });
    }
}
