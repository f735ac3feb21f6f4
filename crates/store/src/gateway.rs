use async_trait::async_trait;

use common::{CategoryId, ChatId, ItemId, Money, OrderId};

use crate::Result;
use crate::records::{
    CartEntry, CatalogItem, Category, ContactInfo, NewCatalogItem, NewOrder, NewOrderLine,
    OperatorRecord, OrderLine, OrderRecord, OrderStatus, UserRecord,
};

/// Narrow CRUD interface over the durable store.
///
/// All implementations must be thread-safe (Send + Sync). Lookups return
/// `Ok(None)` / empty vectors for absent rows — absence is not an error at
/// this layer. Mutations that race (cart quantity changes, order decisions)
/// are atomic inside a single call; no transaction spans calls.
#[async_trait]
pub trait Store: Send + Sync {
    // --- users ---

    /// Creates the user row if it does not exist yet; never overwrites
    /// contact fields captured by an earlier checkout.
    async fn ensure_user(&self, chat_id: ChatId) -> Result<()>;

    /// Looks up a user.
    async fn user(&self, chat_id: ChatId) -> Result<Option<UserRecord>>;

    /// Upserts the user's delivery contact (all three fields together).
    async fn update_user_contact(&self, chat_id: ChatId, contact: &ContactInfo) -> Result<()>;

    // --- catalog items ---

    /// Inserts a catalog item, returning its assigned id.
    async fn insert_item(&self, item: NewCatalogItem) -> Result<ItemId>;

    /// Overwrites every mutable field of an item. Returns false if the item
    /// no longer exists.
    async fn update_item(&self, item: &CatalogItem) -> Result<bool>;

    /// Deletes an item. Returns false if it was already gone.
    async fn delete_item(&self, id: ItemId) -> Result<bool>;

    /// Looks up an item.
    async fn item(&self, id: ItemId) -> Result<Option<CatalogItem>>;

    /// Lists the whole catalog, ordered by title.
    async fn list_items(&self) -> Result<Vec<CatalogItem>>;

    /// Lists the items of one category, ordered by title.
    async fn items_in_category(&self, category_id: CategoryId) -> Result<Vec<CatalogItem>>;

    /// Case-insensitive substring search over title, author and description.
    async fn search_items(&self, query: &str) -> Result<Vec<CatalogItem>>;

    // --- categories ---

    /// Inserts a category (name must be unique), returning its id.
    async fn insert_category(&self, name: &str) -> Result<CategoryId>;

    /// Looks up a category.
    async fn category(&self, id: CategoryId) -> Result<Option<Category>>;

    /// Lists all categories, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Deletes a category after detaching its items (their category becomes
    /// none) — the detach must happen first; no item may ever reference a
    /// deleted category. Returns false if the category did not exist.
    async fn delete_category(&self, id: CategoryId) -> Result<bool>;

    // --- cart ---

    /// Insert-or-increment: a missing line is created with quantity 1, an
    /// existing one is bumped by 1. Atomic per call.
    async fn add_cart_line(&self, user_id: ChatId, item_id: ItemId) -> Result<()>;

    /// Adjusts a line's quantity by `delta` atomically; the line is deleted
    /// when the result would drop to 0 or below. Missing lines are left
    /// untouched. Quantity is never persisted as 0 or negative.
    async fn bump_cart_quantity(&self, user_id: ChatId, item_id: ItemId, delta: i32) -> Result<()>;

    /// Removes a line unconditionally.
    async fn remove_cart_line(&self, user_id: ChatId, item_id: ItemId) -> Result<()>;

    /// The user's cart lines joined with their items, ordered by title.
    async fn cart_entries(&self, user_id: ChatId) -> Result<Vec<CartEntry>>;

    /// Sum of price times quantity over the user's cart; 0 when empty.
    async fn cart_total(&self, user_id: ChatId) -> Result<Money>;

    /// Deletes every line of the user's cart.
    async fn clear_cart(&self, user_id: ChatId) -> Result<()>;

    // --- orders ---

    /// Persists an order header and all of its lines in one transaction;
    /// either everything is stored or nothing is. Returns the order id.
    async fn insert_order(&self, order: NewOrder, lines: Vec<NewOrderLine>) -> Result<OrderId>;

    /// Looks up an order.
    async fn order(&self, id: OrderId) -> Result<Option<OrderRecord>>;

    /// The frozen lines of an order.
    async fn order_lines(&self, id: OrderId) -> Result<Vec<OrderLine>>;

    /// Applies a decision atomically: the status is written only if the
    /// order is still pending. Returns whether a row changed, letting the
    /// caller distinguish a decided order from a missing one.
    async fn set_order_status_if_pending(&self, id: OrderId, status: OrderStatus) -> Result<bool>;

    /// A user's orders, newest first.
    async fn orders_for_user(&self, user_id: ChatId) -> Result<Vec<OrderRecord>>;

    /// All orders awaiting review, newest first.
    async fn pending_orders(&self) -> Result<Vec<OrderRecord>>;

    // --- operators ---

    /// Upserts an operator record.
    async fn ensure_operator(&self, operator: OperatorRecord) -> Result<()>;

    /// Looks up an operator record.
    async fn operator(&self, chat_id: ChatId) -> Result<Option<OperatorRecord>>;

    /// Whether the chat id is in the persisted operator set.
    async fn is_operator(&self, chat_id: ChatId) -> Result<bool>;
}
