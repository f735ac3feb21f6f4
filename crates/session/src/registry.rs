//! Keyed session slots with per-user locking.

use std::collections::HashMap;
use std::sync::Arc;

use common::ChatId;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::time::{Duration, Instant};

use crate::state::Workflow;

/// One user's session slot: the in-progress workflow (if any) and when the
/// slot was last used.
#[derive(Debug)]
pub struct SessionSlot {
    pub workflow: Option<Workflow>,
    touched_at: Instant,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            workflow: None,
            touched_at: Instant::now(),
        }
    }

    /// Marks the slot as just used.
    pub fn touch(&mut self) {
        self.touched_at = Instant::now();
    }

    /// How long since the slot was last used.
    pub fn idle_for(&self) -> Duration {
        self.touched_at.elapsed()
    }
}

/// Session slots keyed by chat id.
///
/// [`SessionRegistry::lease`] hands out the per-user mutex. The engine
/// holds it for the whole of event handling, so events for one chat are
/// processed strictly one after another while different chats proceed in
/// parallel.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    slots: Arc<RwLock<HashMap<ChatId, Arc<Mutex<SessionSlot>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the user's slot, creating it on first contact.
    pub async fn lease(&self, chat: ChatId) -> OwnedMutexGuard<SessionSlot> {
        let existing = self.slots.read().await.get(&chat).cloned();
        let slot = match existing {
            Some(slot) => slot,
            None => self
                .slots
                .write()
                .await
                .entry(chat)
                .or_insert_with(|| Arc::new(Mutex::new(SessionSlot::new())))
                .clone(),
        };
        let mut guard = slot.lock_owned().await;
        guard.touch();
        guard
    }

    /// Number of tracked slots.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    /// Drops slots idle for longer than `max_idle`; returns how many went.
    ///
    /// A slot currently locked by a live event is skipped, so eviction
    /// never blocks on (or races with) in-flight handling.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|_, slot| match slot.try_lock() {
            Ok(guard) => guard.idle_for() <= max_idle,
            Err(_) => true,
        });
        let evicted = before - slots.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = slots.len(), "evicted idle sessions");
        }
        evicted
    }
}
