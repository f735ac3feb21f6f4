//! Cart operations on top of the store.

use common::{ChatId, ItemId, Money};
use store::{CartEntry, Store};

use crate::error::{DomainError, Result};

/// Quantity adjustment applied to an existing cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartDelta {
    /// Raise the quantity by one.
    Increment,
    /// Lower the quantity by one; the line is deleted at zero.
    Decrement,
    /// Delete the line regardless of quantity.
    Remove,
}

/// Service for cart reads and mutations.
///
/// Quantity arithmetic happens inside the store, so concurrent
/// adjustments to the same line never lose updates.
pub struct CartEngine<S: Store> {
    store: S,
}

impl<S: Store> CartEngine<S> {
    /// Creates a new cart engine over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds one unit of an item to the user's cart.
    ///
    /// Inserts a fresh line at quantity 1 or increments an existing one.
    /// Fails with [`DomainError::ItemNotFound`] for an unknown item.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(&self, user: ChatId, item: ItemId) -> Result<()> {
        if self.store.item(item).await?.is_none() {
            return Err(DomainError::ItemNotFound(item));
        }
        self.store.add_cart_line(user, item).await?;
        metrics::counter!("cart_additions_total").increment(1);
        Ok(())
    }

    /// Applies a quantity adjustment to a cart line.
    ///
    /// Adjusting a line that does not exist is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn change_quantity(
        &self,
        user: ChatId,
        item: ItemId,
        delta: CartDelta,
    ) -> Result<()> {
        match delta {
            CartDelta::Increment => self.store.bump_cart_quantity(user, item, 1).await?,
            CartDelta::Decrement => self.store.bump_cart_quantity(user, item, -1).await?,
            CartDelta::Remove => self.store.remove_cart_line(user, item).await?,
        }
        Ok(())
    }

    /// Returns the user's cart lines joined with their catalog items.
    pub async fn entries(&self, user: ChatId) -> Result<Vec<CartEntry>> {
        Ok(self.store.cart_entries(user).await?)
    }

    /// Returns the cart total. Zero for an empty cart, never an error.
    pub async fn total(&self, user: ChatId) -> Result<Money> {
        Ok(self.store.cart_total(user).await?)
    }

    /// Drops every line in the user's cart.
    pub async fn clear(&self, user: ChatId) -> Result<()> {
        Ok(self.store.clear_cart(user).await?)
    }
}
