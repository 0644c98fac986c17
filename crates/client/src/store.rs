//! Normalized client-side catalog store.
//!
//! Products live once in an id-keyed entity map. Each [`CatalogView`] keeps
//! an ordered list of ids into that map, so updating a product is visible in
//! every view that references it.

use std::collections::{HashMap, HashSet};

use storefront_core::pagination::PageResponse;
use storefront_core::types::DbId;

use crate::models::{Identified, Product};

/// Fold a page of items into an id-keyed cache.
///
/// Returns a new map holding every entry of `cache`, with an entry added or
/// overwritten for each item of `page`. Entries absent from `page` are kept.
pub fn merge_page<T: Identified + Clone>(cache: &HashMap<DbId, T>, page: &[T]) -> HashMap<DbId, T> {
    let mut merged = cache.clone();
    for item in page {
        merged.insert(item.id(), item.clone());
    }
    merged
}

/// A named listing the storefront renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogView {
    AllProducts,
    NewArrivals,
    BestSellers,
    Category(DbId),
    Subcategory(DbId),
    SearchResults,
    Related(DbId),
}

/// Paging state of the last page loaded into a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewMeta {
    pub total: i64,
    pub page: i64,
}

#[derive(Debug, Default)]
pub struct CatalogStore {
    entities: HashMap<DbId, Product>,
    views: HashMap<CatalogView, Vec<DbId>>,
    meta: HashMap<CatalogView, ViewMeta>,
    loading: bool,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Merge a fetched page into `view`.
    ///
    /// Entities are added or overwritten; ids the view has not seen are
    /// appended in page order. Used for "load more" style listings.
    pub fn merge_page(&mut self, view: CatalogView, page: PageResponse<Product>) {
        let ids = self.views.entry(view).or_default();
        let mut seen: HashSet<DbId> = ids.iter().copied().collect();
        for product in page.data {
            if seen.insert(product.id) {
                ids.push(product.id);
            }
            self.entities.insert(product.id, product);
        }

        self.meta.insert(
            view,
            ViewMeta {
                total: page.total,
                page: page.page,
            },
        );
        self.loading = false;
    }

    /// Show exactly this page in `view`, as a paginated table does.
    ///
    /// Entities are still merged, never dropped.
    pub fn replace_view(&mut self, view: CatalogView, page: PageResponse<Product>) {
        self.views.insert(view, Vec::new());
        self.merge_page(view, page);
    }

    /// Insert or overwrite a single product, e.g. after create, update or rate.
    pub fn upsert(&mut self, product: Product) {
        self.entities.insert(product.id, product);
    }

    /// Drop a product from the entity map and from every view.
    ///
    /// Views that listed it have their `total` reduced by one.
    pub fn remove(&mut self, id: DbId) -> Option<Product> {
        for (view, ids) in self.views.iter_mut() {
            let before = ids.len();
            ids.retain(|&other| other != id);
            if ids.len() < before {
                if let Some(meta) = self.meta.get_mut(view) {
                    meta.total = (meta.total - 1).max(0);
                }
            }
        }
        self.entities.remove(&id)
    }

    pub fn product(&self, id: DbId) -> Option<&Product> {
        self.entities.get(&id)
    }

    /// The view's products in listing order.
    pub fn products(&self, view: CatalogView) -> Vec<&Product> {
        self.views
            .get(&view)
            .map(|ids| ids.iter().filter_map(|id| self.entities.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn view_meta(&self, view: CatalogView) -> Option<ViewMeta> {
        self.meta.get(&view).copied()
    }

    /// Number of distinct products held.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: DbId, title: &str) -> Product {
        let now = chrono::Utc::now();
        Product {
            id,
            title: title.to_string(),
            slug: title.to_lowercase(),
            description: String::new(),
            price: 10.0,
            quantity: 1,
            shipping: true,
            color: None,
            brand: None,
            category_id: None,
            subcategory_ids: Vec::new(),
            images: Vec::new(),
            sold: 0,
            ratings: Vec::new(),
            category: None,
            subcategories: Vec::new(),
            floor_average: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn page(items: Vec<Product>, total: i64, page: i64) -> PageResponse<Product> {
        PageResponse {
            data: items,
            total,
            page,
        }
    }

    #[test]
    fn merge_page_accumulates_and_overwrites() {
        let empty = HashMap::new();
        let with_a = merge_page(&empty, &[product(1, "a")]);
        let with_b = merge_page(&with_a, &[product(2, "b")]);
        assert_eq!(with_b.len(), 2);

        let renamed = merge_page(&with_b, &[product(1, "a2")]);
        assert_eq!(renamed[&1].title, "a2");
        assert_eq!(renamed[&2].title, "b");

        // Input untouched.
        assert_eq!(with_b[&1].title, "a");
        assert!(empty.is_empty());
    }

    #[test]
    fn merging_an_empty_page_changes_nothing() {
        let cache = merge_page(&HashMap::new(), &[product(1, "a")]);
        assert_eq!(merge_page(&cache, &[]), cache);
    }

    #[test]
    fn views_append_unseen_ids_in_page_order() {
        let mut store = CatalogStore::new();
        store.merge_page(
            CatalogView::NewArrivals,
            page(vec![product(3, "c"), product(1, "a")], 3, 1),
        );
        store.merge_page(
            CatalogView::NewArrivals,
            page(vec![product(1, "a"), product(2, "b")], 3, 2),
        );

        let titles: Vec<_> = store
            .products(CatalogView::NewArrivals)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
        assert_eq!(
            store.view_meta(CatalogView::NewArrivals),
            Some(ViewMeta { total: 3, page: 2 })
        );
    }

    #[test]
    fn merge_overwrites_entities_and_lists_duplicates_once() {
        let mut store = CatalogStore::new();
        store.merge_page(CatalogView::AllProducts, page(vec![product(1, "a")], 1, 1));
        store.merge_page(
            CatalogView::AllProducts,
            page(vec![product(1, "a2"), product(1, "a3")], 1, 2),
        );

        let products = store.products(CatalogView::AllProducts);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "a3");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn upsert_is_seen_by_every_view() {
        let mut store = CatalogStore::new();
        store.merge_page(CatalogView::BestSellers, page(vec![product(1, "a")], 1, 1));
        store.merge_page(CatalogView::Category(9), page(vec![product(1, "a")], 1, 1));

        store.upsert(product(1, "renamed"));

        assert_eq!(store.products(CatalogView::BestSellers)[0].title, "renamed");
        assert_eq!(store.products(CatalogView::Category(9))[0].title, "renamed");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_drops_entity_and_view_entries() {
        let mut store = CatalogStore::new();
        store.merge_page(
            CatalogView::AllProducts,
            page(vec![product(1, "a"), product(2, "b")], 2, 1),
        );
        store.merge_page(CatalogView::Related(5), page(vec![product(2, "b")], 1, 1));

        assert!(store.remove(2).is_some());

        assert!(store.product(2).is_none());
        assert_eq!(store.products(CatalogView::AllProducts).len(), 1);
        assert!(store.products(CatalogView::Related(5)).is_empty());
        assert_eq!(store.view_meta(CatalogView::AllProducts).unwrap().total, 1);
        assert_eq!(store.view_meta(CatalogView::Related(5)).unwrap().total, 0);
    }

    #[test]
    fn replace_view_swaps_ids_but_keeps_entities() {
        let mut store = CatalogStore::new();
        store.replace_view(CatalogView::AllProducts, page(vec![product(1, "a")], 2, 1));
        store.replace_view(CatalogView::AllProducts, page(vec![product(2, "b")], 2, 2));

        let ids: Vec<_> = store
            .products(CatalogView::AllProducts)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![2]);
        assert!(store.product(1).is_some());
    }

    #[test]
    fn merging_clears_the_loading_flag() {
        let mut store = CatalogStore::new();
        store.set_loading(true);
        store.merge_page(CatalogView::SearchResults, page(Vec::new(), 0, 1));
        assert!(!store.is_loading());
        assert!(store.products(CatalogView::SearchResults).is_empty());
    }

    #[test]
    fn unknown_view_is_empty() {
        let store = CatalogStore::new();
        assert!(store.products(CatalogView::Subcategory(1)).is_empty());
        assert_eq!(store.view_meta(CatalogView::Subcategory(1)), None);
    }
}
