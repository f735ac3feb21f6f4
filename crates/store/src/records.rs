//! Persisted entity records and their construction shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{CategoryId, ChatId, ImageRef, ItemId, Money, OrderId};

use crate::error::StoreError;

/// A user of the shop, created on first contact.
///
/// Contact fields stay empty until the user completes a checkout; a later
/// first-contact event must not blank them (insert-if-absent semantics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub chat_id: ChatId,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Delivery contact captured by the checkout workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: String,
    pub address: String,
    pub postal_code: String,
}

/// A catalog entry as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Unit price in the smallest currency unit.
    pub price: Money,
    pub category_id: Option<CategoryId>,
    /// Cover image URL, if the entry came with one.
    pub cover: Option<ImageRef>,
    /// Uploaded photo reference, if an operator attached one.
    pub photo: Option<ImageRef>,
    /// Informational stock count; never decremented by orders.
    pub stock: u32,
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    /// The image to show on an item card, preferring the uploaded photo.
    pub fn display_image(&self) -> Option<&ImageRef> {
        self.photo.as_ref().or(self.cover.as_ref())
    }
}

/// Fields required to create a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCatalogItem {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: Money,
    pub category_id: Option<CategoryId>,
    pub cover: Option<ImageRef>,
    pub photo: Option<ImageRef>,
    pub stock: u32,
}

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// One cart line joined with its catalog item, the read shape of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub item: CatalogItem,
    pub quantity: u32,
}

impl CartEntry {
    /// Price of this line (unit price times quantity).
    pub fn line_total(&self) -> Money {
        self.item.price.multiply(self.quantity)
    }
}

/// Review status of an order.
///
/// ```text
/// pending ──► approved
///    │
///    └─────► rejected
/// ```
///
/// Both decided states are terminal; a decision is applied exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    /// Returns the status as a lowercase string (the persisted form).
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
        }
    }

    /// Parses the persisted form back into a status.
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "approved" => Ok(OrderStatus::Approved),
            "rejected" => Ok(OrderStatus::Rejected),
            other => Err(StoreError::UnknownStatus(other.to_string())),
        }
    }

    /// True once an operator has ruled on the order.
    pub fn is_decided(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted order. Contact fields are copies of the checkout draft, not
/// live references to the user row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: ChatId,
    pub total: Money,
    pub receipt: ImageRef,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create an order (status starts at pending).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: ChatId,
    pub total: Money,
    pub receipt: ImageRef,
    pub contact: ContactInfo,
}

/// A frozen order line: catalog data snapshotted at checkout time, immune
/// to later catalog edits or deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: OrderId,
    pub title: String,
    pub author: String,
    pub price: Money,
    pub quantity: u32,
}

/// Fields required to create an order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub title: String,
    pub author: String,
    pub price: Money,
    pub quantity: u32,
}

impl NewOrderLine {
    /// Snapshots a cart entry into an order line.
    pub fn snapshot(entry: &CartEntry) -> Self {
        Self {
            title: entry.item.title.clone(),
            author: entry.item.author.clone(),
            price: entry.item.price,
            quantity: entry.quantity,
        }
    }
}

/// An authorized operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorRecord {
    pub chat_id: ChatId,
    pub name: Option<String>,
    pub is_super: bool,
}

impl OperatorRecord {
    /// A regular (non-super) operator.
    pub fn new(chat_id: ChatId, name: Option<String>) -> Self {
        Self {
            chat_id,
            name,
            is_super: false,
        }
    }
}
