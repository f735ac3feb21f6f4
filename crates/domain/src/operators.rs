//! Operator authorization.

use common::ChatId;
use store::{OperatorRecord, Store};

use crate::error::Result;

/// Authorization over the persisted operator roster plus an optional
/// configured fallback id.
///
/// The fallback keeps the shop administrable when the store is down or
/// the roster is empty, so it authorizes without consulting the store.
pub struct OperatorRoster<S: Store> {
    store: S,
    fallback: Option<ChatId>,
}

impl<S: Store> OperatorRoster<S> {
    /// Creates a roster over the given store.
    pub fn new(store: S, fallback: Option<ChatId>) -> Self {
        Self { store, fallback }
    }

    /// Checks whether a chat id may use operator-only features.
    ///
    /// Never fails: a store error denies everyone except the fallback id.
    pub async fn is_authorized(&self, chat: ChatId) -> bool {
        if self.fallback == Some(chat) {
            return true;
        }
        match self.store.is_operator(chat).await {
            Ok(known) => known,
            Err(e) => {
                tracing::warn!(chat_id = %chat, error = %e, "operator lookup failed, denying");
                false
            }
        }
    }

    /// Adds (or refreshes) a non-super operator.
    #[tracing::instrument(skip(self))]
    pub async fn add_operator(&self, chat: ChatId, name: Option<String>) -> Result<()> {
        self.store
            .ensure_operator(OperatorRecord::new(chat, name))
            .await?;
        Ok(())
    }

    /// Loads one operator record.
    pub async fn operator(&self, chat: ChatId) -> Result<Option<OperatorRecord>> {
        Ok(self.store.operator(chat).await?)
    }
}
