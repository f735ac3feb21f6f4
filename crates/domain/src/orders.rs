//! Order lifecycle: placement and operator decisions.

use common::{ChatId, ImageRef, Money, OrderId};
use store::{ContactInfo, NewOrder, NewOrderLine, OrderLine, OrderRecord, OrderStatus, Store};

use crate::error::{DomainError, Result};

/// Operator verdict on a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    /// The final status this verdict writes.
    pub fn status(self) -> OrderStatus {
        match self {
            Verdict::Approve => OrderStatus::Approved,
            Verdict::Reject => OrderStatus::Rejected,
        }
    }
}

/// Service that moves orders through their lifecycle.
///
/// Stays free of presentation: callers render and deliver any
/// notifications that follow a placement or a decision.
pub struct OrderDesk<S: Store> {
    store: S,
}

impl<S: Store> OrderDesk<S> {
    /// Creates a new order desk over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Places an order from the user's current cart.
    ///
    /// Snapshots the cart lines (title, author, price, quantity frozen at
    /// this moment), persists header and lines in one transaction, then
    /// clears the cart. Fails with [`DomainError::EmptyCart`] when there is
    /// nothing to order.
    #[tracing::instrument(skip(self, contact, receipt))]
    pub async fn place(
        &self,
        user: ChatId,
        contact: ContactInfo,
        receipt: ImageRef,
    ) -> Result<OrderRecord> {
        let entries = self.store.cart_entries(user).await?;
        if entries.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        let total: Money = entries.iter().map(|e| e.line_total()).sum();
        let lines: Vec<NewOrderLine> = entries.iter().map(NewOrderLine::snapshot).collect();

        let order_id = self
            .store
            .insert_order(
                NewOrder {
                    user_id: user,
                    total,
                    receipt,
                    contact,
                },
                lines,
            )
            .await
            .map_err(DomainError::OrderCreation)?;

        self.store.clear_cart(user).await?;
        metrics::counter!("orders_placed_total").increment(1);
        tracing::info!(order_id = %order_id, user_id = %user, total = %total, "order placed");

        self.order(order_id).await
    }

    /// Applies an operator verdict to a pending order.
    ///
    /// The status moves away from pending exactly once: a repeat verdict
    /// fails with [`DomainError::AlreadyDecided`] and changes nothing.
    /// Approval also clears the purchaser's cart.
    #[tracing::instrument(skip(self))]
    pub async fn decide(&self, order_id: OrderId, verdict: Verdict) -> Result<OrderRecord> {
        let applied = self
            .store
            .set_order_status_if_pending(order_id, verdict.status())
            .await?;

        if !applied {
            return match self.store.order(order_id).await? {
                Some(existing) => Err(DomainError::AlreadyDecided {
                    order: order_id,
                    status: existing.status,
                }),
                None => Err(DomainError::OrderNotFound(order_id)),
            };
        }

        let order = self.order(order_id).await?;
        if verdict == Verdict::Approve {
            self.store.clear_cart(order.user_id).await?;
        }
        metrics::counter!("orders_decided_total").increment(1);
        tracing::info!(order_id = %order_id, status = %order.status, "order decided");
        Ok(order)
    }

    /// Loads one order, failing when it does not exist.
    pub async fn order(&self, id: OrderId) -> Result<OrderRecord> {
        self.store
            .order(id)
            .await?
            .ok_or(DomainError::OrderNotFound(id))
    }

    /// The frozen lines of one order.
    pub async fn lines(&self, id: OrderId) -> Result<Vec<OrderLine>> {
        Ok(self.store.order_lines(id).await?)
    }

    /// All orders a user has placed, newest first.
    pub async fn orders_for(&self, user: ChatId) -> Result<Vec<OrderRecord>> {
        Ok(self.store.orders_for_user(user).await?)
    }

    /// Every order still awaiting a verdict, newest first.
    pub async fn pending(&self) -> Result<Vec<OrderRecord>> {
        Ok(self.store.pending_orders().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;
    use store::{MemoryStore, NewCatalogItem};

    fn contact() -> ContactInfo {
        ContactInfo {
            phone: "0912".to_string(),
            address: "1 Main St".to_string(),
            postal_code: "12345".to_string(),
        }
    }

    async fn filled_cart(store: &MemoryStore, user: ChatId) {
        let item = store
            .insert_item(NewCatalogItem {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                description: String::new(),
                price: Money::from_units(6_000),
                category_id: None,
                cover: None,
                photo: None,
                stock: 1,
            })
            .await
            .unwrap();
        store.add_cart_line(user, item).await.unwrap();
        store.add_cart_line(user, item).await.unwrap();
    }

    #[tokio::test]
    async fn test_place_requires_cart_lines() {
        let desk = OrderDesk::new(MemoryStore::default());
        let err = desk
            .place(ChatId::new(1), contact(), ImageRef::new("r"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmptyCart));
    }

    #[tokio::test]
    async fn test_place_snapshots_and_clears_cart() {
        let store = MemoryStore::default();
        let user = ChatId::new(1);
        filled_cart(&store, user).await;
        let desk = OrderDesk::new(store.clone());

        let order = desk
            .place(user, contact(), ImageRef::new("receipt-1"))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, Money::from_units(12_000));
        assert_eq!(order.phone, "0912");
        assert!(store.cart_entries(user).await.unwrap().is_empty());

        let lines = desk.lines(order.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].title, "Dune");
        assert_eq!(lines[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_decide_is_exactly_once() {
        let store = MemoryStore::default();
        let user = ChatId::new(1);
        filled_cart(&store, user).await;
        let desk = OrderDesk::new(store);

        let order = desk.place(user, contact(), ImageRef::new("r")).await.unwrap();

        let approved = desk.decide(order.id, Verdict::Approve).await.unwrap();
        assert_eq!(approved.status, OrderStatus::Approved);

        let err = desk.decide(order.id, Verdict::Reject).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::AlreadyDecided {
                status: OrderStatus::Approved,
                ..
            }
        ));
        assert_eq!(
            desk.order(order.id).await.unwrap().status,
            OrderStatus::Approved
        );
    }

    #[tokio::test]
    async fn test_decide_unknown_order() {
        let desk = OrderDesk::new(MemoryStore::default());
        let err = desk
            .decide(OrderId::new(99), Verdict::Approve)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::OrderNotFound(_)));
    }

    #[tokio::test]
    async fn test_approval_clears_a_refilled_cart() {
        let store = MemoryStore::default();
        let user = ChatId::new(1);
        filled_cart(&store, user).await;
        let desk = OrderDesk::new(store.clone());

        let order = desk.place(user, contact(), ImageRef::new("r")).await.unwrap();
        filled_cart(&store, user).await;
        assert!(!store.cart_entries(user).await.unwrap().is_empty());

        desk.decide(order.id, Verdict::Approve).await.unwrap();
        assert!(store.cart_entries(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listings() {
        let store = MemoryStore::default();
        let user = ChatId::new(1);
        let desk = OrderDesk::new(store.clone());

        filled_cart(&store, user).await;
        let first = desk.place(user, contact(), ImageRef::new("a")).await.unwrap();
        filled_cart(&store, user).await;
        let second = desk.place(user, contact(), ImageRef::new("b")).await.unwrap();

        desk.decide(first.id, Verdict::Reject).await.unwrap();

        let mine = desk.orders_for(user).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, second.id, "newest first");

        let pending = desk.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second.id);
    }
}
