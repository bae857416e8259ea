//! Available-filter facet aggregation.
//!
//! Facets answer "if I add this filter, how many results remain". The base
//! match keeps the text query and category but deliberately drops the
//! location filters already chosen, so the UI can show what other locations
//! also have matches; a chosen state still narrows the areas facet, and a
//! chosen state+area narrow the markets facet.

use crate::engine::SearchEngine;
use crate::filter::SearchFilter;
use crate::matcher::ProductMatch;
use crate::results::{AvailableFilters, LocationFacet, PriceBounds, TermFacet};
use soko_core::prelude::*;
use soko_core::SokoError;
use std::collections::HashMap;

/// Cap per facet list.
const FACET_LIMIT: usize = 20;

/// Count occurrences of keys in first-seen order, then sort by count
/// descending (stable: equal counts keep first-seen order) and cap.
fn top_counts(keys: impl Iterator<Item = String>) -> Vec<(String, i64)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, i64> = HashMap::new();
    for key in keys {
        if !counts.contains_key(&key) {
            order.push(key.clone());
        }
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut buckets: Vec<(String, i64)> = order
        .into_iter()
        .map(|key| {
            let count = counts[&key];
            (key, count)
        })
        .collect();
    buckets.sort_by(|a, b| b.1.cmp(&a.1));
    buckets.truncate(FACET_LIMIT);
    buckets
}

impl SearchEngine {
    /// Compute count-per-value facets consistent with the current query.
    ///
    /// The six aggregations run concurrently; a failure anywhere degrades to
    /// empty facets, logged at error level.
    pub async fn available_filters(&self, filter: &SearchFilter) -> AvailableFilters {
        match self.available_filters_inner(filter).await {
            Ok(facets) => facets,
            Err(err) => {
                tracing::error!(error = %err, "facet aggregation failed; returning empty facets");
                AvailableFilters::default()
            }
        }
    }

    async fn available_filters_inner(
        &self,
        filter: &SearchFilter,
    ) -> Result<AvailableFilters, SokoError> {
        let base = ProductMatch::without_location(filter);
        let area_base = base.clone().narrow_state(filter.state_id.clone());
        let market_base = base
            .clone()
            .narrow_state(filter.state_id.clone())
            .narrow_area(filter.area_id.clone());

        let (states, areas, markets, categories, brands, price_range) = tokio::join!(
            self.states_facet(&base),
            self.areas_facet(&area_base),
            self.markets_facet(&market_base),
            self.categories_facet(&base),
            self.brands_facet(&base),
            self.price_bounds(&base),
        );

        Ok(AvailableFilters {
            states,
            areas,
            markets,
            categories,
            brands,
            price_range,
        })
    }

    async fn states_facet(&self, base: &ProductMatch) -> Vec<LocationFacet> {
        let products = self
            .products
            .find(|p| base.matches(p) && p.state_id.is_some())
            .await;
        let buckets = top_counts(
            products
                .iter()
                .filter_map(|p| p.state_id.as_ref().map(|id| id.as_str().to_string())),
        );
        let mut facets = Vec::with_capacity(buckets.len());
        for (id, count) in buckets {
            // IDs that no longer resolve to a node are dropped.
            if let Some(state) = self.states.get(&id).await {
                facets.push(LocationFacet {
                    id,
                    name: state.name,
                    count,
                });
            }
        }
        facets
    }

    async fn areas_facet(&self, base: &ProductMatch) -> Vec<LocationFacet> {
        let products = self
            .products
            .find(|p| base.matches(p) && p.area_id.is_some())
            .await;
        let buckets = top_counts(
            products
                .iter()
                .filter_map(|p| p.area_id.as_ref().map(|id| id.as_str().to_string())),
        );
        let mut facets = Vec::with_capacity(buckets.len());
        for (id, count) in buckets {
            if let Some(area) = self.areas.get(&id).await {
                facets.push(LocationFacet {
                    id,
                    name: area.name,
                    count,
                });
            }
        }
        facets
    }

    async fn markets_facet(&self, base: &ProductMatch) -> Vec<LocationFacet> {
        let products = self
            .products
            .find(|p| base.matches(p) && p.market_id.is_some())
            .await;
        let buckets = top_counts(
            products
                .iter()
                .filter_map(|p| p.market_id.as_ref().map(|id| id.as_str().to_string())),
        );
        let mut facets = Vec::with_capacity(buckets.len());
        for (id, count) in buckets {
            if let Some(market) = self.markets.get(&id).await {
                facets.push(LocationFacet {
                    id,
                    name: market.name,
                    count,
                });
            }
        }
        facets
    }

    async fn categories_facet(&self, base: &ProductMatch) -> Vec<TermFacet> {
        let products = self.products.find(|p| base.matches(p)).await;
        top_counts(products.iter().map(|p| p.category.clone()))
            .into_iter()
            .map(|(name, count)| TermFacet { name, count })
            .collect()
    }

    async fn brands_facet(&self, base: &ProductMatch) -> Vec<TermFacet> {
        let products = self
            .products
            .find(|p| base.matches(p) && p.brand.as_deref().is_some_and(|b| !b.is_empty()))
            .await;
        top_counts(products.iter().filter_map(|p| p.brand.clone()))
            .into_iter()
            .map(|(name, count)| TermFacet { name, count })
            .collect()
    }

    async fn price_bounds(&self, base: &ProductMatch) -> PriceBounds {
        let products = self.products.find(|p| base.matches(p)).await;
        if products.is_empty() {
            return PriceBounds::default();
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for p in &products {
            min = min.min(p.price);
            max = max.max(p.price);
        }
        PriceBounds { min, max }
    }
}
