use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use common::{CategoryId, ChatId, ItemId, Money, OrderId};

use crate::error::{Result, StoreError};
use crate::gateway::Store;
use crate::records::{
    CartEntry, CatalogItem, Category, ContactInfo, NewCatalogItem, NewOrder, NewOrderLine,
    OperatorRecord, OrderLine, OrderRecord, OrderStatus, UserRecord,
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<ChatId, UserRecord>,
    items: HashMap<ItemId, CatalogItem>,
    categories: HashMap<CategoryId, Category>,
    cart: HashMap<(ChatId, ItemId), u32>,
    orders: HashMap<OrderId, OrderRecord>,
    order_lines: Vec<OrderLine>,
    operators: HashMap<ChatId, OperatorRecord>,
    next_item_id: i64,
    next_category_id: i64,
    next_order_id: i64,
    next_line_id: i64,
    fail: bool,
}

/// In-memory store implementation for tests and local runs.
///
/// Every operation takes the single state lock once, so each call is
/// atomic — the same guarantee the SQL implementation gets from upserts
/// and transactions. Supports failure injection via [`MemoryStore::set_fail`]
/// so callers' degraded paths are testable.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail until reset.
    pub async fn set_fail(&self, fail: bool) {
        self.state.write().await.fail = fail;
    }

    /// Returns the number of cart lines across all users.
    pub async fn cart_line_count(&self) -> usize {
        self.state.read().await.cart.len()
    }

    /// Returns the number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    fn check(state: &MemoryState) -> Result<()> {
        if state.fail {
            return Err(StoreError::Backend("injected failure".to_string()));
        }
        Ok(())
    }

    fn sorted_by_title(mut items: Vec<CatalogItem>) -> Vec<CatalogItem> {
        items.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        items
    }

    fn sorted_newest_first(mut orders: Vec<OrderRecord>) -> Vec<OrderRecord> {
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.cmp(&a.id))
        });
        orders
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ensure_user(&self, chat_id: ChatId) -> Result<()> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        state.users.entry(chat_id).or_insert_with(|| UserRecord {
            chat_id,
            phone: None,
            address: None,
            postal_code: None,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn user(&self, chat_id: ChatId) -> Result<Option<UserRecord>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(state.users.get(&chat_id).cloned())
    }

    async fn update_user_contact(&self, chat_id: ChatId, contact: &ContactInfo) -> Result<()> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        let user = state.users.entry(chat_id).or_insert_with(|| UserRecord {
            chat_id,
            phone: None,
            address: None,
            postal_code: None,
            created_at: Utc::now(),
        });
        user.phone = Some(contact.phone.clone());
        user.address = Some(contact.address.clone());
        user.postal_code = Some(contact.postal_code.clone());
        Ok(())
    }

    async fn insert_item(&self, item: NewCatalogItem) -> Result<ItemId> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        state.next_item_id += 1;
        let id = ItemId::new(state.next_item_id);
        state.items.insert(
            id,
            CatalogItem {
                id,
                title: item.title,
                author: item.author,
                description: item.description,
                price: item.price,
                category_id: item.category_id,
                cover: item.cover,
                photo: item.photo,
                stock: item.stock,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn update_item(&self, item: &CatalogItem) -> Result<bool> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        match state.items.get_mut(&item.id) {
            Some(existing) => {
                let created_at = existing.created_at;
                *existing = item.clone();
                existing.created_at = created_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_item(&self, id: ItemId) -> Result<bool> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        let removed = state.items.remove(&id).is_some();
        // cart lines referencing the item go with it, as the FK cascade does
        state.cart.retain(|(_, item_id), _| *item_id != id);
        Ok(removed)
    }

    async fn item(&self, id: ItemId) -> Result<Option<CatalogItem>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(state.items.get(&id).cloned())
    }

    async fn list_items(&self) -> Result<Vec<CatalogItem>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(Self::sorted_by_title(
            state.items.values().cloned().collect(),
        ))
    }

    async fn items_in_category(&self, category_id: CategoryId) -> Result<Vec<CatalogItem>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(Self::sorted_by_title(
            state
                .items
                .values()
                .filter(|i| i.category_id == Some(category_id))
                .cloned()
                .collect(),
        ))
    }

    async fn search_items(&self, query: &str) -> Result<Vec<CatalogItem>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        let needle = query.to_lowercase();
        Ok(Self::sorted_by_title(
            state
                .items
                .values()
                .filter(|i| {
                    i.title.to_lowercase().contains(&needle)
                        || i.author.to_lowercase().contains(&needle)
                        || i.description.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect(),
        ))
    }

    async fn insert_category(&self, name: &str) -> Result<CategoryId> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        if state.categories.values().any(|c| c.name == name) {
            return Err(StoreError::Backend(format!(
                "category name already taken: {name:?}"
            )));
        }
        state.next_category_id += 1;
        let id = CategoryId::new(state.next_category_id);
        state.categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    async fn category(&self, id: CategoryId) -> Result<Option<Category>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(state.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        // detach items first; no item may reference a deleted category
        for item in state.items.values_mut() {
            if item.category_id == Some(id) {
                item.category_id = None;
            }
        }
        Ok(state.categories.remove(&id).is_some())
    }

    async fn add_cart_line(&self, user_id: ChatId, item_id: ItemId) -> Result<()> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        *state.cart.entry((user_id, item_id)).or_insert(0) += 1;
        Ok(())
    }

    async fn bump_cart_quantity(&self, user_id: ChatId, item_id: ItemId, delta: i32) -> Result<()> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        let key = (user_id, item_id);
        if let Some(quantity) = state.cart.get(&key).copied() {
            let next = quantity as i64 + delta as i64;
            if next <= 0 {
                state.cart.remove(&key);
            } else {
                state.cart.insert(key, next as u32);
            }
        }
        Ok(())
    }

    async fn remove_cart_line(&self, user_id: ChatId, item_id: ItemId) -> Result<()> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        state.cart.remove(&(user_id, item_id));
        Ok(())
    }

    async fn cart_entries(&self, user_id: ChatId) -> Result<Vec<CartEntry>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        let mut entries: Vec<CartEntry> = state
            .cart
            .iter()
            .filter(|((user, _), _)| *user == user_id)
            .filter_map(|((_, item_id), quantity)| {
                state.items.get(item_id).map(|item| CartEntry {
                    item: item.clone(),
                    quantity: *quantity,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.item.title.cmp(&b.item.title).then(a.item.id.cmp(&b.item.id)));
        Ok(entries)
    }

    async fn cart_total(&self, user_id: ChatId) -> Result<Money> {
        let entries = self.cart_entries(user_id).await?;
        Ok(entries.iter().map(CartEntry::line_total).sum())
    }

    async fn clear_cart(&self, user_id: ChatId) -> Result<()> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        state.cart.retain(|(user, _), _| *user != user_id);
        Ok(())
    }

    async fn insert_order(&self, order: NewOrder, lines: Vec<NewOrderLine>) -> Result<OrderId> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        state.next_order_id += 1;
        let id = OrderId::new(state.next_order_id);
        state.orders.insert(
            id,
            OrderRecord {
                id,
                user_id: order.user_id,
                total: order.total,
                receipt: order.receipt,
                phone: order.contact.phone,
                address: order.contact.address,
                postal_code: order.contact.postal_code,
                status: OrderStatus::Pending,
                created_at: Utc::now(),
            },
        );
        for line in lines {
            state.next_line_id += 1;
            let line_id = state.next_line_id;
            state.order_lines.push(OrderLine {
                id: line_id,
                order_id: id,
                title: line.title,
                author: line.author,
                price: line.price,
                quantity: line.quantity,
            });
        }
        Ok(id)
    }

    async fn order(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(state.orders.get(&id).cloned())
    }

    async fn order_lines(&self, id: OrderId) -> Result<Vec<OrderLine>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(state
            .order_lines
            .iter()
            .filter(|l| l.order_id == id)
            .cloned()
            .collect())
    }

    async fn set_order_status_if_pending(&self, id: OrderId, status: OrderStatus) -> Result<bool> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        match state.orders.get_mut(&id) {
            Some(order) if order.status == OrderStatus::Pending => {
                order.status = status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn orders_for_user(&self, user_id: ChatId) -> Result<Vec<OrderRecord>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(Self::sorted_newest_first(
            state
                .orders
                .values()
                .filter(|o| o.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn pending_orders(&self) -> Result<Vec<OrderRecord>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(Self::sorted_newest_first(
            state
                .orders
                .values()
                .filter(|o| o.status == OrderStatus::Pending)
                .cloned()
                .collect(),
        ))
    }

    async fn ensure_operator(&self, operator: OperatorRecord) -> Result<()> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        state.operators.insert(operator.chat_id, operator);
        Ok(())
    }

    async fn operator(&self, chat_id: ChatId) -> Result<Option<OperatorRecord>> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(state.operators.get(&chat_id).cloned())
    }

    async fn is_operator(&self, chat_id: ChatId) -> Result<bool> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(state.operators.contains_key(&chat_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(title: &str, price: i64) -> NewCatalogItem {
        NewCatalogItem {
            title: title.to_string(),
            author: "Author".to_string(),
            description: "Description".to_string(),
            price: Money::from_units(price),
            category_id: None,
            cover: None,
            photo: None,
            stock: 5,
        }
    }

    fn contact() -> ContactInfo {
        ContactInfo {
            phone: "09120000000".to_string(),
            address: "1 Main St".to_string(),
            postal_code: "12345".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ensure_user_does_not_blank_contact() {
        let store = MemoryStore::new();
        let chat = ChatId::new(1);
        store.ensure_user(chat).await.unwrap();
        store.update_user_contact(chat, &contact()).await.unwrap();

        // a later first-contact event must keep the captured fields
        store.ensure_user(chat).await.unwrap();
        let user = store.user(chat).await.unwrap().unwrap();
        assert_eq!(user.phone.as_deref(), Some("09120000000"));
        assert_eq!(user.postal_code.as_deref(), Some("12345"));
    }

    #[tokio::test]
    async fn test_item_crud_and_listing_order() {
        let store = MemoryStore::new();
        let b = store.insert_item(new_item("Beloved", 900)).await.unwrap();
        let a = store.insert_item(new_item("Aurora", 700)).await.unwrap();

        let listed = store.list_items().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, a, "listing is title-ordered");
        assert_eq!(listed[1].id, b);

        let mut edited = store.item(a).await.unwrap().unwrap();
        edited.price = Money::from_units(750);
        assert!(store.update_item(&edited).await.unwrap());
        assert_eq!(
            store.item(a).await.unwrap().unwrap().price,
            Money::from_units(750)
        );

        assert!(store.delete_item(b).await.unwrap());
        assert!(!store.delete_item(b).await.unwrap());
        assert!(store.item(b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_matches_title_author_description() {
        let store = MemoryStore::new();
        let mut item = new_item("Dune", 100);
        item.author = "Frank Herbert".to_string();
        item.description = "Spice and sand".to_string();
        store.insert_item(item).await.unwrap();
        store.insert_item(new_item("Emma", 100)).await.unwrap();

        assert_eq!(store.search_items("dune").await.unwrap().len(), 1);
        assert_eq!(store.search_items("herbert").await.unwrap().len(), 1);
        assert_eq!(store.search_items("SPICE").await.unwrap().len(), 1);
        assert_eq!(store.search_items("austen").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_category_deletion_detaches_items_first() {
        let store = MemoryStore::new();
        let cat = store.insert_category("Fiction").await.unwrap();
        let mut item_a = new_item("A", 100);
        item_a.category_id = Some(cat);
        let mut item_b = new_item("B", 100);
        item_b.category_id = Some(cat);
        let a = store.insert_item(item_a).await.unwrap();
        let b = store.insert_item(item_b).await.unwrap();

        assert!(store.delete_category(cat).await.unwrap());

        assert!(store.category(cat).await.unwrap().is_none());
        assert_eq!(store.item(a).await.unwrap().unwrap().category_id, None);
        assert_eq!(store.item(b).await.unwrap().unwrap().category_id, None);
    }

    #[tokio::test]
    async fn test_duplicate_category_name_rejected() {
        let store = MemoryStore::new();
        store.insert_category("Poetry").await.unwrap();
        assert!(store.insert_category("Poetry").await.is_err());
    }

    #[tokio::test]
    async fn test_cart_add_increments_and_floor_deletes() {
        let store = MemoryStore::new();
        let user = ChatId::new(10);
        let item = store.insert_item(new_item("Ficciones", 2_000)).await.unwrap();

        store.add_cart_line(user, item).await.unwrap();
        store.add_cart_line(user, item).await.unwrap();
        let entries = store.cart_entries(user).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 2);

        store.bump_cart_quantity(user, item, -1).await.unwrap();
        assert_eq!(store.cart_entries(user).await.unwrap()[0].quantity, 1);

        // dropping to zero deletes the line instead of storing 0
        store.bump_cart_quantity(user, item, -1).await.unwrap();
        assert!(store.cart_entries(user).await.unwrap().is_empty());

        // bumping a missing line is a no-op
        store.bump_cart_quantity(user, item, -1).await.unwrap();
        assert_eq!(store.cart_line_count().await, 0);
    }

    #[tokio::test]
    async fn test_cart_total_exact_and_zero_when_empty() {
        let store = MemoryStore::new();
        let user = ChatId::new(11);
        assert_eq!(store.cart_total(user).await.unwrap(), Money::zero());

        let a = store.insert_item(new_item("A", 12_000)).await.unwrap();
        let b = store.insert_item(new_item("B", 500)).await.unwrap();
        store.add_cart_line(user, a).await.unwrap();
        store.add_cart_line(user, a).await.unwrap();
        store.add_cart_line(user, b).await.unwrap();

        assert_eq!(
            store.cart_total(user).await.unwrap(),
            Money::from_units(2 * 12_000 + 500)
        );

        store.clear_cart(user).await.unwrap();
        assert_eq!(store.cart_total(user).await.unwrap(), Money::zero());
    }

    #[tokio::test]
    async fn test_carts_are_scoped_per_user() {
        let store = MemoryStore::new();
        let item = store.insert_item(new_item("Solo", 1_000)).await.unwrap();
        store.add_cart_line(ChatId::new(1), item).await.unwrap();

        assert!(store.cart_entries(ChatId::new(2)).await.unwrap().is_empty());
        store.clear_cart(ChatId::new(2)).await.unwrap();
        assert_eq!(store.cart_entries(ChatId::new(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_add_converges_to_two() {
        let store = MemoryStore::new();
        let user = ChatId::new(42);
        let item = store.insert_item(new_item("Hot", 100)).await.unwrap();

        let s1 = store.clone();
        let s2 = store.clone();
        let (r1, r2) = tokio::join!(
            tokio::spawn(async move { s1.add_cart_line(user, item).await }),
            tokio::spawn(async move { s2.add_cart_line(user, item).await }),
        );
        r1.unwrap().unwrap();
        r2.unwrap().unwrap();

        let entries = store.cart_entries(user).await.unwrap();
        assert_eq!(entries[0].quantity, 2, "no lost update");
    }

    #[tokio::test]
    async fn test_order_insert_is_atomic_and_lines_frozen() {
        let store = MemoryStore::new();
        let user = ChatId::new(5);
        let item = store.insert_item(new_item("Kindred", 9_000)).await.unwrap();
        store.add_cart_line(user, item).await.unwrap();
        let entries = store.cart_entries(user).await.unwrap();
        let lines: Vec<NewOrderLine> = entries.iter().map(NewOrderLine::snapshot).collect();

        let order_id = store
            .insert_order(
                NewOrder {
                    user_id: user,
                    total: Money::from_units(9_000),
                    receipt: common::ImageRef::new("receipt-1"),
                    contact: contact(),
                },
                lines,
            )
            .await
            .unwrap();

        // editing the catalog afterwards must not touch the snapshot
        let mut edited = store.item(item).await.unwrap().unwrap();
        edited.title = "Renamed".to_string();
        edited.price = Money::from_units(1);
        store.update_item(&edited).await.unwrap();
        store.delete_item(item).await.unwrap();

        let stored_lines = store.order_lines(order_id).await.unwrap();
        assert_eq!(stored_lines.len(), 1);
        assert_eq!(stored_lines[0].title, "Kindred");
        assert_eq!(stored_lines[0].price, Money::from_units(9_000));
    }

    #[tokio::test]
    async fn test_order_status_set_exactly_once() {
        let store = MemoryStore::new();
        let user = ChatId::new(6);
        let order_id = store
            .insert_order(
                NewOrder {
                    user_id: user,
                    total: Money::from_units(100),
                    receipt: common::ImageRef::new("r"),
                    contact: contact(),
                },
                vec![],
            )
            .await
            .unwrap();

        assert!(
            store
                .set_order_status_if_pending(order_id, OrderStatus::Approved)
                .await
                .unwrap()
        );
        // the decision never reverts
        assert!(
            !store
                .set_order_status_if_pending(order_id, OrderStatus::Rejected)
                .await
                .unwrap()
        );
        let order = store.order(order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Approved);

        // missing order also reports "no row changed"
        assert!(
            !store
                .set_order_status_if_pending(OrderId::new(999), OrderStatus::Approved)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_pending_orders_newest_first() {
        let store = MemoryStore::new();
        let user = ChatId::new(7);
        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(
                store
                    .insert_order(
                        NewOrder {
                            user_id: user,
                            total: Money::from_units(10),
                            receipt: common::ImageRef::new("r"),
                            contact: contact(),
                        },
                        vec![],
                    )
                    .await
                    .unwrap(),
            );
        }
        store
            .set_order_status_if_pending(ids[1], OrderStatus::Rejected)
            .await
            .unwrap();

        let pending = store.pending_orders().await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, ids[2], "newest first");
        assert_eq!(pending[1].id, ids[0]);
    }

    #[tokio::test]
    async fn test_operator_roster() {
        let store = MemoryStore::new();
        let chat = ChatId::new(900);
        assert!(!store.is_operator(chat).await.unwrap());

        store
            .ensure_operator(OperatorRecord::new(chat, Some("ada".to_string())))
            .await
            .unwrap();
        assert!(store.is_operator(chat).await.unwrap());
        let op = store.operator(chat).await.unwrap().unwrap();
        assert_eq!(op.name.as_deref(), Some("ada"));
        assert!(!op.is_super);
    }

    #[tokio::test]
    async fn test_fail_injection_surfaces_backend_error() {
        let store = MemoryStore::new();
        store.set_fail(true).await;
        assert!(store.list_items().await.is_err());
        assert!(store.ensure_user(ChatId::new(1)).await.is_err());

        store.set_fail(false).await;
        assert!(store.list_items().await.is_ok());
    }
}
