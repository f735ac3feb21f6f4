//! Catalog authoring and lookup.

use common::{CategoryId, ItemId};
use store::{CatalogItem, Category, NewCatalogItem, Store};

use crate::error::{DomainError, Result};

/// Service for catalog items and categories.
pub struct CatalogService<S: Store> {
    store: S,
}

impl<S: Store> CatalogService<S> {
    /// Creates a new catalog service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persists a new item and returns it with its assigned id.
    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_item(&self, draft: NewCatalogItem) -> Result<CatalogItem> {
        let id = self.store.insert_item(draft).await?;
        metrics::counter!("catalog_items_created_total").increment(1);
        self.item(id).await
    }

    /// Overwrites every editable field of an existing item.
    #[tracing::instrument(skip(self, item), fields(item_id = %item.id))]
    pub async fn update_item(&self, item: &CatalogItem) -> Result<()> {
        if self.store.update_item(item).await? {
            Ok(())
        } else {
            Err(DomainError::ItemNotFound(item.id))
        }
    }

    /// Removes an item. Cart lines referencing it go with it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_item(&self, id: ItemId) -> Result<()> {
        if self.store.delete_item(id).await? {
            Ok(())
        } else {
            Err(DomainError::ItemNotFound(id))
        }
    }

    /// Loads one item, failing when it does not exist.
    pub async fn item(&self, id: ItemId) -> Result<CatalogItem> {
        self.store
            .item(id)
            .await?
            .ok_or(DomainError::ItemNotFound(id))
    }

    /// Returns every item ordered by title.
    pub async fn list(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.store.list_items().await?)
    }

    /// Returns the items assigned to one category, ordered by title.
    pub async fn in_category(&self, category: CategoryId) -> Result<Vec<CatalogItem>> {
        Ok(self.store.items_in_category(category).await?)
    }

    /// Case-insensitive substring search over title, author and description.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogItem>> {
        Ok(self.store.search_items(query).await?)
    }

    /// Persists a new category under the given name.
    #[tracing::instrument(skip(self))]
    pub async fn add_category(&self, name: &str) -> Result<Category> {
        let id = self.store.insert_category(name).await?;
        self.store
            .category(id)
            .await?
            .ok_or(DomainError::CategoryNotFound(id))
    }

    /// Removes a category; its items survive as uncategorized.
    #[tracing::instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<()> {
        if self.store.delete_category(id).await? {
            Ok(())
        } else {
            Err(DomainError::CategoryNotFound(id))
        }
    }

    /// Returns every category ordered by name.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;
    use store::MemoryStore;

    fn draft(title: &str) -> NewCatalogItem {
        NewCatalogItem {
            title: title.to_string(),
            author: "Author".to_string(),
            description: String::new(),
            price: Money::from_units(1_000),
            category_id: None,
            cover: None,
            photo: None,
            stock: 1,
        }
    }

    #[tokio::test]
    async fn test_create_returns_persisted_item() {
        let catalog = CatalogService::new(MemoryStore::default());

        let item = catalog.create_item(draft("Dune")).await.unwrap();
        assert_eq!(item.title, "Dune");
        assert_eq!(catalog.item(item.id).await.unwrap().id, item.id);
    }

    #[tokio::test]
    async fn test_update_and_delete_check_existence() {
        let catalog = CatalogService::new(MemoryStore::default());
        let mut item = catalog.create_item(draft("Emma")).await.unwrap();

        item.price = Money::from_units(2_500);
        catalog.update_item(&item).await.unwrap();
        assert_eq!(
            catalog.item(item.id).await.unwrap().price,
            Money::from_units(2_500)
        );

        catalog.delete_item(item.id).await.unwrap();
        assert!(matches!(
            catalog.delete_item(item.id).await.unwrap_err(),
            DomainError::ItemNotFound(_)
        ));
        assert!(matches!(
            catalog.item(item.id).await.unwrap_err(),
            DomainError::ItemNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_category_lifecycle() {
        let catalog = CatalogService::new(MemoryStore::default());

        let fiction = catalog.add_category("Fiction").await.unwrap();
        assert_eq!(fiction.name, "Fiction");

        let mut d = draft("Kindred");
        d.category_id = Some(fiction.id);
        let item = catalog.create_item(d).await.unwrap();
        assert_eq!(catalog.in_category(fiction.id).await.unwrap().len(), 1);

        catalog.delete_category(fiction.id).await.unwrap();
        assert!(catalog.categories().await.unwrap().is_empty());
        assert_eq!(catalog.item(item.id).await.unwrap().category_id, None);

        assert!(matches!(
            catalog.delete_category(fiction.id).await.unwrap_err(),
            DomainError::CategoryNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_search_delegates_to_store() {
        let catalog = CatalogService::new(MemoryStore::default());
        catalog.create_item(draft("The Left Hand")).await.unwrap();

        assert_eq!(catalog.search("left").await.unwrap().len(), 1);
        assert!(catalog.search("missing").await.unwrap().is_empty());
    }
}
