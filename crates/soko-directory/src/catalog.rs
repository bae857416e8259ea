//! The canonical product catalog.

use serde::Deserialize;
use soko_core::prelude::*;
use soko_core::SokoError;
use soko_store::Collection;
use std::collections::HashMap;

/// Input for creating a catalog item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCatalogItem {
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub brand: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub alternate_names: Vec<String>,
}

/// Listing filters for the catalog surface.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// A page of catalog items.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

/// Service over the canonical catalog.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Collection<CatalogItem>,
}

impl CatalogService {
    pub fn new(catalog: Collection<CatalogItem>) -> Self {
        Self { catalog }
    }

    /// Create a canonical definition; duplicate SKU, barcode, or name
    /// (case-insensitive) is a conflict.
    pub async fn create(&self, input: NewCatalogItem) -> Result<CatalogItem, SokoError> {
        let name_lower = input.name.to_lowercase();
        let exists = self
            .catalog
            .find_one(|c| {
                (input.sku.is_some() && c.sku == input.sku)
                    || (input.barcode.is_some() && c.barcode == input.barcode)
                    || c.name.to_lowercase() == name_lower
            })
            .await;
        if exists.is_some() {
            return Err(SokoError::Conflict(format!(
                "catalog item {} already exists",
                input.name
            )));
        }

        let mut item = CatalogItem::new(input.name, input.category);
        item.description = input.description;
        item.sku = input.sku;
        item.barcode = input.barcode;
        item.brand = input.brand;
        item.subcategory = input.subcategory;
        item.tags = input.tags;
        item.images = input.images;
        item.alternate_names = input.alternate_names;

        self.catalog
            .insert(item.clone())
            .await
            .map_err(|e| SokoError::Store(e.to_string()))?;
        Ok(item)
    }

    pub async fn get(&self, id: &CatalogItemId) -> Result<CatalogItem, SokoError> {
        self.catalog
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::CatalogItemNotFound(id.to_string()))
    }

    /// Paginated catalog listing, most-listed items first, then by name.
    pub async fn list(&self, filter: &CatalogFilter) -> CatalogPage {
        let page = filter.page.unwrap_or(1).max(1);
        let limit = filter.limit.unwrap_or(20).clamp(1, 100);
        let search = filter.search.as_ref().map(|s| s.to_lowercase());
        let brand = filter.brand.as_ref().map(|b| b.to_lowercase());

        let mut items = self
            .catalog
            .find(|c| {
                c.is_active
                    && filter.category.as_ref().map_or(true, |cat| &c.category == cat)
                    && filter
                        .subcategory
                        .as_ref()
                        .map_or(true, |s| c.subcategory.as_ref() == Some(s))
                    && brand.as_ref().map_or(true, |b| {
                        c.brand
                            .as_deref()
                            .is_some_and(|cb| cb.to_lowercase().contains(b))
                    })
                    && search.as_ref().map_or(true, |q| {
                        c.name.to_lowercase().contains(q)
                            || c.description
                                .as_deref()
                                .is_some_and(|d| d.to_lowercase().contains(q))
                            || c.brand
                                .as_deref()
                                .is_some_and(|cb| cb.to_lowercase().contains(q))
                            || c.tags.iter().any(|t| t.to_lowercase().contains(q))
                            || c.alternate_names
                                .iter()
                                .any(|n| n.to_lowercase().contains(q))
                    })
            })
            .await;

        items.sort_by(|a, b| {
            b.total_listings
                .cmp(&a.total_listings)
                .then_with(|| a.name.cmp(&b.name))
        });

        let total = items.len() as i64;
        let offset = ((page - 1) * limit).max(0) as usize;
        let items: Vec<CatalogItem> = items
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();

        CatalogPage {
            items,
            total,
            page,
            total_pages: (total + limit - 1) / limit,
        }
    }

    pub async fn find_by_sku(&self, sku: &str) -> Option<CatalogItem> {
        self.catalog
            .find_one(|c| c.sku.as_deref() == Some(sku))
            .await
    }

    pub async fn find_by_barcode(&self, barcode: &str) -> Option<CatalogItem> {
        self.catalog
            .find_one(|c| c.barcode.as_deref() == Some(barcode))
            .await
    }

    /// Name lookup over names and alternate names, capped to 10.
    pub async fn search_by_name(&self, name: &str) -> Vec<CatalogItem> {
        let name_lower = name.to_lowercase();
        self.catalog
            .find(|c| {
                c.is_active
                    && (c.name.to_lowercase().contains(&name_lower)
                        || c.alternate_names
                            .iter()
                            .any(|n| n.to_lowercase().contains(&name_lower)))
            })
            .await
            .into_iter()
            .take(10)
            .collect()
    }

    /// Category counts over the active catalog, most-used first.
    pub async fn categories(&self) -> Vec<(String, i64)> {
        let items = self.catalog.find(|c| c.is_active).await;
        count_terms(items.iter().map(|c| c.category.clone()), usize::MAX)
    }

    /// Brand counts, optionally within one category, capped to 50.
    pub async fn brands(&self, category: Option<&str>) -> Vec<(String, i64)> {
        let items = self
            .catalog
            .find(|c| {
                c.is_active
                    && c.brand.is_some()
                    && category.map_or(true, |cat| c.category == cat)
            })
            .await;
        count_terms(items.iter().filter_map(|c| c.brand.clone()), 50)
    }
}

/// Count term occurrences, sort by count descending (stable), cap.
fn count_terms(terms: impl Iterator<Item = String>, cap: usize) -> Vec<(String, i64)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, i64> = HashMap::new();
    for term in terms {
        if !counts.contains_key(&term) {
            order.push(term.clone());
        }
        *counts.entry(term).or_insert(0) += 1;
    }
    let mut buckets: Vec<(String, i64)> = order
        .into_iter()
        .map(|term| {
            let count = counts[&term];
            (term, count)
        })
        .collect();
    buckets.sort_by(|a, b| b.1.cmp(&a.1));
    buckets.truncate(cap);
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CatalogService {
        CatalogService::new(Collection::new())
    }

    fn item(name: &str, category: &str) -> NewCatalogItem {
        NewCatalogItem {
            name: name.into(),
            description: None,
            sku: None,
            barcode: None,
            brand: None,
            category: category.into(),
            subcategory: None,
            tags: vec![],
            images: vec![],
            alternate_names: vec![],
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_case_insensitively() {
        let svc = service();
        svc.create(item("iPhone 15", "Electronics")).await.unwrap();
        let err = svc
            .create(item("IPHONE 15", "Electronics"))
            .await
            .unwrap_err();
        assert!(matches!(err, SokoError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let svc = service();
        let mut first = item("iPhone 15", "Electronics");
        first.sku = Some("APL-IP15".into());
        svc.create(first).await.unwrap();

        let mut second = item("iPhone 15 Renewed", "Electronics");
        second.sku = Some("APL-IP15".into());
        assert!(matches!(
            svc.create(second).await,
            Err(SokoError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_search_matches_alternate_names() {
        let svc = service();
        let mut input = item("Gala Sausage Roll", "Snacks");
        input.alternate_names = vec!["Gala".into()];
        svc.create(input).await.unwrap();

        let hits = svc.search_by_name("gala").await;
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_by_listing_count() {
        let svc = service();
        let a = svc.create(item("Common Item", "Misc")).await.unwrap();
        svc.create(item("Rare Item", "Misc")).await.unwrap();
        svc.catalog
            .update(a.id.as_str(), |c| c.total_listings = 9)
            .await
            .unwrap();

        let page = svc.list(&CatalogFilter::default()).await;
        assert_eq!(page.items[0].name, "Common Item");
    }

    #[tokio::test]
    async fn test_brands_per_category() {
        let svc = service();
        for (name, brand, category) in [
            ("TV A", "Samsung", "Electronics"),
            ("TV B", "LG", "Electronics"),
            ("Soap", "Dove", "Beauty"),
        ] {
            let mut input = item(name, category);
            input.brand = Some(brand.into());
            svc.create(input).await.unwrap();
        }

        let brands = svc.brands(Some("Electronics")).await;
        let names: Vec<&str> = brands.iter().map(|(b, _)| b.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Samsung"));
        assert!(!names.contains(&"Dove"));
    }
}
