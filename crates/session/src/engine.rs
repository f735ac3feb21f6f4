//! Conversational engine: per-user dispatch of inbound events.
//!
//! Every event is handled under the user's session lease, so a user's
//! events apply strictly one after another while different users proceed
//! in parallel. Failures never escape [`Engine::handle`]: they are logged,
//! counted, and answered with a generic notice.

use common::{
    CategoryId, ChatId, EventKind, ImageRef, InboundEvent, ItemId, Money, OrderId, OutboundMessage,
};
use domain::{
    CartDelta, CartEngine, CatalogService, DomainError, OperatorRoster, OrderDesk, Verdict,
};
use store::Store;

use crate::actions::Action;
use crate::draft::{ContactDraft, ItemDraft};
use crate::error::Result;
use crate::registry::{SessionRegistry, SessionSlot};
use crate::state::{CheckoutStep, ItemStep, Workflow};
use crate::transport::Transport;

/// Free texts that read as a greeting and get the main menu instead of a
/// catalog search.
const GREETINGS: [&str; 5] = ["hi", "hello", "hey", "salam", "start"];

fn is_greeting(text: &str) -> bool {
    GREETINGS.contains(&text.trim().to_lowercase().as_str())
}

/// Deployment knobs for the engine.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    /// Chat id that is always authorized, even when the store is down.
    pub fallback_operator: Option<ChatId>,
    /// Where order alerts go; falls back to `fallback_operator`.
    pub operator_chat: Option<ChatId>,
    /// Card number shown in the payment instruction.
    pub payment_card: String,
}

/// Routes inbound events through session state to the domain services,
/// rendering every reply through the views crate.
pub struct Engine<S, T>
where
    S: Store,
    T: Transport,
{
    store: S,
    transport: T,
    cart: CartEngine<S>,
    catalog: CatalogService<S>,
    roster: OperatorRoster<S>,
    desk: OrderDesk<S>,
    registry: SessionRegistry,
    payment_card: String,
    /// Resolved alert target for new orders.
    operator_chat: Option<ChatId>,
}

impl<S, T> Engine<S, T>
where
    S: Store + Clone,
    T: Transport,
{
    /// Creates a new engine over the given store and transport.
    pub fn new(store: S, transport: T, settings: EngineSettings) -> Self {
        let operator_chat = settings.operator_chat.or(settings.fallback_operator);
        Self {
            cart: CartEngine::new(store.clone()),
            catalog: CatalogService::new(store.clone()),
            roster: OperatorRoster::new(store.clone(), settings.fallback_operator),
            desk: OrderDesk::new(store.clone()),
            store,
            transport,
            registry: SessionRegistry::new(),
            payment_card: settings.payment_card,
            operator_chat,
        }
    }

    /// The session registry, for idle-session eviction sweeps.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Handles one inbound event to completion.
    ///
    /// Never fails: any error is logged and answered with a generic
    /// failure notice on a best-effort basis.
    #[tracing::instrument(skip(self, event), fields(chat_id = %event.chat_id))]
    pub async fn handle(&self, event: InboundEvent) {
        metrics::counter!("events_processed_total").increment(1);
        let started = std::time::Instant::now();

        let chat = event.chat_id;
        let mut slot = self.registry.lease(chat).await;

        let outcome = match event.kind {
            EventKind::Command { name } => self.on_command(chat, &mut slot, &name).await,
            EventKind::Text { text } => self.on_text(chat, &mut slot, &text).await,
            EventKind::Button { action } => self.on_button(chat, &mut slot, &action).await,
            EventKind::Photo { image } => self.on_photo(chat, &mut slot, image).await,
        };

        if let Err(e) = outcome {
            metrics::counter!("event_failures_total").increment(1);
            tracing::error!(error = %e, "event handling failed");
            if let Err(e) = self.transport.send(views::menus::failure(chat)).await {
                tracing::error!(error = %e, "failure notice undeliverable");
            }
        }

        metrics::histogram!("event_handle_duration_seconds")
            .record(started.elapsed().as_secs_f64());
    }

    async fn on_command(&self, chat: ChatId, slot: &mut SessionSlot, name: &str) -> Result<()> {
        match name {
            "start" => {
                slot.workflow = None;
                self.store.ensure_user(chat).await?;
                let operator = self.roster.is_authorized(chat).await;
                self.send(views::menus::main_menu(chat, operator)).await
            }
            "admin" => {
                if self.roster.is_authorized(chat).await {
                    self.send(views::menus::operator_menu(chat)).await
                } else {
                    self.send(views::menus::unauthorized(chat)).await
                }
            }
            other => {
                tracing::debug!(command = other, "unknown command ignored");
                Ok(())
            }
        }
    }

    async fn on_text(&self, chat: ChatId, slot: &mut SessionSlot, text: &str) -> Result<()> {
        match slot.workflow.take() {
            Some(workflow) => self.workflow_text(chat, slot, workflow, text).await,
            None if is_greeting(text) => {
                self.store.ensure_user(chat).await?;
                let operator = self.roster.is_authorized(chat).await;
                self.send(views::menus::main_menu(chat, operator)).await
            }
            None => self.run_search(chat, text).await,
        }
    }

    /// Feeds one text into the taken workflow. Every path either finishes
    /// the workflow or puts it back into the slot before replying.
    async fn workflow_text(
        &self,
        chat: ChatId,
        slot: &mut SessionSlot,
        workflow: Workflow,
        text: &str,
    ) -> Result<()> {
        let text = text.trim();
        match workflow {
            Workflow::Checkout { step, mut draft } => {
                let next = match step {
                    CheckoutStep::Phone => {
                        if text.is_empty() {
                            slot.workflow = Some(Workflow::Checkout { step, draft });
                            return self.send(views::prompts::ask_phone(chat)).await;
                        }
                        draft.phone = Some(text.to_string());
                        CheckoutStep::Address
                    }
                    CheckoutStep::Address => {
                        if text.is_empty() {
                            slot.workflow = Some(Workflow::Checkout { step, draft });
                            return self.send(views::prompts::ask_address(chat)).await;
                        }
                        draft.address = Some(text.to_string());
                        CheckoutStep::Postal
                    }
                    CheckoutStep::Postal => {
                        if text.is_empty() {
                            slot.workflow = Some(Workflow::Checkout { step, draft });
                            return self.send(views::prompts::ask_postal_code(chat)).await;
                        }
                        draft.postal_code = Some(text.to_string());
                        CheckoutStep::Receipt
                    }
                    CheckoutStep::Receipt => {
                        slot.workflow = Some(Workflow::Checkout { step, draft });
                        return self.send(views::prompts::need_photo(chat)).await;
                    }
                };
                self.goto_checkout_step(chat, slot, next, draft).await
            }
            Workflow::Authoring { step, draft } => {
                self.author_text(chat, slot, None, step, draft, text).await
            }
            Workflow::Editing { item, step, draft } => {
                self.author_text(chat, slot, Some(item), step, draft, text)
                    .await
            }
            Workflow::SearchQuery => {
                if text.is_empty() {
                    slot.workflow = Some(Workflow::SearchQuery);
                    return self.send(views::prompts::ask_search_query(chat)).await;
                }
                self.run_search(chat, text).await
            }
            Workflow::CategoryName => {
                if text.is_empty() {
                    slot.workflow = Some(Workflow::CategoryName);
                    return self.send(views::prompts::ask_category_name(chat)).await;
                }
                let category = self.catalog.add_category(text).await?;
                self.send(views::catalog::category_saved(chat, &category)).await
            }
            Workflow::OperatorId => {
                if text.is_empty() {
                    slot.workflow = Some(Workflow::OperatorId);
                    return self.send(views::prompts::ask_operator_id(chat)).await;
                }
                match text.parse::<i64>() {
                    Ok(id) => {
                        let id = ChatId::new(id);
                        self.roster.add_operator(id, None).await?;
                        self.send(views::prompts::operator_added(chat, id)).await
                    }
                    Err(_) => {
                        slot.workflow = Some(Workflow::OperatorId);
                        self.send(views::prompts::bad_operator_id(chat)).await
                    }
                }
            }
        }
    }

    /// Text input for the authoring and editing dialogues.
    ///
    /// While editing, an empty text keeps the draft's current value and
    /// advances; while authoring it re-prompts the same step.
    async fn author_text(
        &self,
        chat: ChatId,
        slot: &mut SessionSlot,
        editing: Option<ItemId>,
        step: ItemStep,
        mut draft: ItemDraft,
        text: &str,
    ) -> Result<()> {
        match step {
            ItemStep::Title | ItemStep::Author | ItemStep::Description => {
                if !text.is_empty() {
                    let value = Some(text.to_string());
                    match step {
                        ItemStep::Title => draft.title = value,
                        ItemStep::Author => draft.author = value,
                        _ => draft.description = value,
                    }
                } else if editing.is_none() {
                    let prompt = self.item_step_prompt(chat, step, &draft, false).await?;
                    slot.workflow = Some(item_workflow(editing, step, draft));
                    return self.send(prompt).await;
                }
                let next = match step {
                    ItemStep::Title => ItemStep::Author,
                    ItemStep::Author => ItemStep::Description,
                    _ => ItemStep::Price,
                };
                self.goto_item_step(chat, slot, editing, next, draft).await
            }
            ItemStep::Price => {
                if text.is_empty() && editing.is_some() && draft.price.is_some() {
                    return self
                        .goto_item_step(chat, slot, editing, ItemStep::Category, draft)
                        .await;
                }
                match Money::parse(text) {
                    Ok(price) => {
                        draft.price = Some(price);
                        self.goto_item_step(chat, slot, editing, ItemStep::Category, draft)
                            .await
                    }
                    Err(_) => {
                        slot.workflow = Some(item_workflow(editing, step, draft));
                        self.send(views::prompts::bad_price(chat)).await
                    }
                }
            }
            ItemStep::Category => {
                slot.workflow = Some(item_workflow(editing, step, draft));
                self.send(views::prompts::need_category_button(chat)).await
            }
            ItemStep::Photo => {
                slot.workflow = Some(item_workflow(editing, step, draft));
                self.send(views::prompts::need_photo(chat)).await
            }
        }
    }

    async fn on_button(&self, chat: ChatId, slot: &mut SessionSlot, raw: &str) -> Result<()> {
        let Some(action) = Action::parse(raw) else {
            tracing::debug!(action = raw, "unrecognized action ignored");
            return Ok(());
        };

        if action.operator_only() && !self.roster.is_authorized(chat).await {
            return self.send(views::menus::unauthorized(chat)).await;
        }

        match action {
            Action::Home => {
                slot.workflow = None;
                self.store.ensure_user(chat).await?;
                let operator = self.roster.is_authorized(chat).await;
                self.send(views::menus::main_menu(chat, operator)).await
            }
            Action::Categories => {
                let categories = self.catalog.categories().await?;
                let operator = self.roster.is_authorized(chat).await;
                self.send(views::catalog::category_list(chat, &categories, operator))
                    .await
            }
            Action::Search => {
                slot.workflow = Some(Workflow::SearchQuery);
                self.send(views::prompts::ask_search_query(chat)).await
            }
            Action::Cart => self.render_cart(chat).await,
            Action::Checkout => self.start_checkout(chat, slot).await,
            Action::MyOrders => {
                let orders = self.desk.orders_for(chat).await?;
                self.send(views::orders::my_orders(chat, &orders)).await
            }
            Action::ClearCart => {
                self.cart.clear(chat).await?;
                self.render_cart(chat).await
            }
            Action::Admin => self.send(views::menus::operator_menu(chat)).await,
            Action::AddItem => {
                self.goto_item_step(chat, slot, None, ItemStep::Title, ItemDraft::default())
                    .await
            }
            Action::AddCategory => {
                slot.workflow = Some(Workflow::CategoryName);
                self.send(views::prompts::ask_category_name(chat)).await
            }
            Action::AddOperator => {
                slot.workflow = Some(Workflow::OperatorId);
                self.send(views::prompts::ask_operator_id(chat)).await
            }
            Action::ListItems => {
                let items = self.catalog.list().await?;
                self.send(views::catalog::operator_item_list(chat, &items)).await
            }
            Action::PendingOrders => {
                let pending = self.desk.pending().await?;
                self.send(views::orders::pending_summary(chat, pending.len()))
                    .await?;
                for order in &pending {
                    let lines = self.desk.lines(order.id).await?;
                    self.send(views::orders::order_alert(chat, order, &lines))
                        .await?;
                }
                Ok(())
            }
            Action::OpenCategory(id) => match self.store.category(id).await? {
                Some(category) => {
                    let items = self.catalog.in_category(id).await?;
                    self.send(views::catalog::item_list(chat, &category.name, &items))
                        .await
                }
                None => self.send(views::menus::gone(chat)).await,
            },
            Action::OpenItem(id) => match self.catalog.item(id).await {
                Ok(item) => self.send(views::catalog::item_card(chat, &item)).await,
                Err(DomainError::ItemNotFound(_)) => self.send(views::menus::gone(chat)).await,
                Err(e) => Err(e.into()),
            },
            Action::AddToCart(id) => match self.cart.add_item(chat, id).await {
                Ok(()) => self.render_cart(chat).await,
                Err(DomainError::ItemNotFound(_)) => self.send(views::menus::gone(chat)).await,
                Err(e) => Err(e.into()),
            },
            Action::Increment(id) => {
                self.cart.change_quantity(chat, id, CartDelta::Increment).await?;
                self.render_cart(chat).await
            }
            Action::Decrement(id) => {
                self.cart.change_quantity(chat, id, CartDelta::Decrement).await?;
                self.render_cart(chat).await
            }
            Action::RemoveLine(id) => {
                self.cart.change_quantity(chat, id, CartDelta::Remove).await?;
                self.render_cart(chat).await
            }
            Action::EditItem(id) => match self.catalog.item(id).await {
                Ok(item) => {
                    let draft = ItemDraft::from_item(&item);
                    self.goto_item_step(chat, slot, Some(id), ItemStep::Title, draft)
                        .await
                }
                Err(DomainError::ItemNotFound(_)) => self.send(views::menus::gone(chat)).await,
                Err(e) => Err(e.into()),
            },
            Action::DeleteItem(id) => match self.catalog.delete_item(id).await {
                Ok(()) => self.send(views::catalog::item_deleted(chat)).await,
                Err(DomainError::ItemNotFound(_)) => self.send(views::menus::gone(chat)).await,
                Err(e) => Err(e.into()),
            },
            Action::DeleteCategory(id) => match self.catalog.delete_category(id).await {
                Ok(()) => self.send(views::catalog::category_deleted(chat)).await,
                Err(DomainError::CategoryNotFound(_)) => self.send(views::menus::gone(chat)).await,
                Err(e) => Err(e.into()),
            },
            Action::SetCategory(id) => self.category_chosen(chat, slot, Some(id), false).await,
            Action::SkipCategory => self.category_chosen(chat, slot, None, false).await,
            Action::KeepCategory => self.category_chosen(chat, slot, None, true).await,
            Action::KeepPhoto => self.photo_kept(chat, slot).await,
            Action::Approve(order) => self.decide(chat, order, Verdict::Approve).await,
            Action::Reject(order) => self.decide(chat, order, Verdict::Reject).await,
        }
    }

    async fn on_photo(&self, chat: ChatId, slot: &mut SessionSlot, image: ImageRef) -> Result<()> {
        match slot.workflow.take() {
            Some(Workflow::Checkout {
                step: CheckoutStep::Receipt,
                draft,
            }) => self.finish_checkout(chat, draft, image).await,
            Some(Workflow::Checkout { step, draft }) => {
                slot.workflow = Some(Workflow::Checkout { step, draft });
                self.send(views::prompts::need_text(chat)).await
            }
            Some(Workflow::Authoring {
                step: ItemStep::Photo,
                mut draft,
            }) => {
                draft.photo = Some(image);
                self.finish_authoring(chat, draft).await
            }
            Some(Workflow::Editing {
                item,
                step: ItemStep::Photo,
                mut draft,
            }) => {
                draft.photo = Some(image);
                self.finish_editing(chat, item, draft).await
            }
            Some(Workflow::Authoring { step, draft }) => {
                let nudge = photo_step_nudge(chat, step);
                slot.workflow = Some(Workflow::Authoring { step, draft });
                self.send(nudge).await
            }
            Some(Workflow::Editing { item, step, draft }) => {
                let nudge = photo_step_nudge(chat, step);
                slot.workflow = Some(Workflow::Editing { item, step, draft });
                self.send(nudge).await
            }
            Some(other) => {
                slot.workflow = Some(other);
                self.send(views::prompts::need_text(chat)).await
            }
            None => {
                tracing::debug!("stray photo ignored");
                Ok(())
            }
        }
    }

    // --- workflow entries and step transitions ---

    async fn start_checkout(&self, chat: ChatId, slot: &mut SessionSlot) -> Result<()> {
        let entries = self.cart.entries(chat).await?;
        if entries.is_empty() {
            slot.workflow = None;
            return self.send(views::prompts::checkout_empty_cart(chat)).await;
        }
        self.goto_checkout_step(chat, slot, CheckoutStep::Phone, ContactDraft::default())
            .await
    }

    async fn goto_checkout_step(
        &self,
        chat: ChatId,
        slot: &mut SessionSlot,
        step: CheckoutStep,
        draft: ContactDraft,
    ) -> Result<()> {
        let prompt = match step {
            CheckoutStep::Phone => views::prompts::ask_phone(chat),
            CheckoutStep::Address => views::prompts::ask_address(chat),
            CheckoutStep::Postal => views::prompts::ask_postal_code(chat),
            CheckoutStep::Receipt => {
                let total = self.cart.total(chat).await?;
                views::prompts::ask_receipt(chat, total, &self.payment_card)
            }
        };
        slot.workflow = Some(Workflow::Checkout { step, draft });
        self.send(prompt).await
    }

    async fn goto_item_step(
        &self,
        chat: ChatId,
        slot: &mut SessionSlot,
        editing: Option<ItemId>,
        step: ItemStep,
        draft: ItemDraft,
    ) -> Result<()> {
        let prompt = self
            .item_step_prompt(chat, step, &draft, editing.is_some())
            .await?;
        slot.workflow = Some(item_workflow(editing, step, draft));
        self.send(prompt).await
    }

    async fn item_step_prompt(
        &self,
        chat: ChatId,
        step: ItemStep,
        draft: &ItemDraft,
        editing: bool,
    ) -> Result<OutboundMessage> {
        let prompt = match step {
            ItemStep::Title => views::prompts::ask_title(chat, draft.title.as_deref()),
            ItemStep::Author => views::prompts::ask_author(chat, draft.author.as_deref()),
            ItemStep::Description => {
                views::prompts::ask_description(chat, draft.description.as_deref())
            }
            ItemStep::Price => views::prompts::ask_price(chat, draft.price),
            ItemStep::Category => {
                let categories = self.catalog.categories().await?;
                views::prompts::ask_item_category(chat, &categories, editing)
            }
            ItemStep::Photo => views::prompts::ask_item_photo(chat, editing),
        };
        Ok(prompt)
    }

    /// A category-step button was pressed: a concrete category, skip, or
    /// keep-current. Outside the category step the press is ignored.
    async fn category_chosen(
        &self,
        chat: ChatId,
        slot: &mut SessionSlot,
        choice: Option<CategoryId>,
        keep: bool,
    ) -> Result<()> {
        let Some(workflow) = slot.workflow.take() else {
            tracing::debug!("category button with no session ignored");
            return Ok(());
        };
        let (editing, step, mut draft) = match workflow {
            Workflow::Authoring { step, draft } => (None, step, draft),
            Workflow::Editing { item, step, draft } => (Some(item), step, draft),
            other => {
                tracing::debug!(
                    workflow = other.name(),
                    "category button outside an item dialogue ignored"
                );
                slot.workflow = Some(other);
                return Ok(());
            }
        };
        if step != ItemStep::Category {
            slot.workflow = Some(item_workflow(editing, step, draft));
            tracing::debug!("category button at the wrong step ignored");
            return Ok(());
        }

        if !keep {
            if let Some(id) = choice {
                // the picked category may have been deleted since the
                // picker was rendered
                if self.store.category(id).await?.is_none() {
                    let prompt = self
                        .item_step_prompt(chat, step, &draft, editing.is_some())
                        .await?;
                    slot.workflow = Some(item_workflow(editing, step, draft));
                    return self.send(prompt).await;
                }
            }
            draft.category_id = choice;
        }
        self.goto_item_step(chat, slot, editing, ItemStep::Photo, draft)
            .await
    }

    async fn photo_kept(&self, chat: ChatId, slot: &mut SessionSlot) -> Result<()> {
        match slot.workflow.take() {
            Some(Workflow::Editing {
                item,
                step: ItemStep::Photo,
                draft,
            }) => self.finish_editing(chat, item, draft).await,
            Some(other) => {
                tracing::debug!(
                    workflow = other.name(),
                    "keep-photo outside an edit photo step ignored"
                );
                slot.workflow = Some(other);
                Ok(())
            }
            None => {
                tracing::debug!("keep-photo with no session ignored");
                Ok(())
            }
        }
    }

    // --- terminal steps ---

    #[tracing::instrument(skip(self, draft, receipt))]
    async fn finish_checkout(
        &self,
        chat: ChatId,
        draft: ContactDraft,
        receipt: ImageRef,
    ) -> Result<()> {
        let Some(contact) = draft.complete() else {
            tracing::warn!("receipt arrived with contact fields missing");
            return self.send(views::menus::failure(chat)).await;
        };

        let order = match self.desk.place(chat, contact.clone(), receipt).await {
            Ok(order) => order,
            Err(DomainError::EmptyCart) => {
                return self.send(views::prompts::checkout_empty_cart(chat)).await;
            }
            Err(e) => return Err(e.into()),
        };

        self.store.update_user_contact(chat, &contact).await?;
        self.send(views::orders::order_placed(chat, &order)).await?;

        if let Some(operator) = self.operator_chat {
            let lines = self.desk.lines(order.id).await?;
            self.send(views::orders::order_alert(operator, &order, &lines))
                .await?;
        }
        Ok(())
    }

    async fn finish_authoring(&self, chat: ChatId, draft: ItemDraft) -> Result<()> {
        let Some(new_item) = draft.complete() else {
            tracing::warn!("item dialogue finished with fields missing");
            return self.send(views::menus::failure(chat)).await;
        };
        let item = self.catalog.create_item(new_item).await?;
        self.send(views::catalog::item_saved(chat, &item)).await
    }

    async fn finish_editing(&self, chat: ChatId, id: ItemId, draft: ItemDraft) -> Result<()> {
        let mut item = match self.catalog.item(id).await {
            Ok(item) => item,
            Err(DomainError::ItemNotFound(_)) => return self.send(views::menus::gone(chat)).await,
            Err(e) => return Err(e.into()),
        };
        draft.apply_to(&mut item);
        match self.catalog.update_item(&item).await {
            Ok(()) => self.send(views::catalog::item_saved(chat, &item)).await,
            Err(DomainError::ItemNotFound(_)) => self.send(views::menus::gone(chat)).await,
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn decide(&self, chat: ChatId, order_id: OrderId, verdict: Verdict) -> Result<()> {
        match self.desk.decide(order_id, verdict).await {
            Ok(order) => {
                self.send(views::orders::decision_notice(order.user_id, &order))
                    .await?;
                self.send(views::orders::decided_ack(chat, &order)).await
            }
            Err(DomainError::AlreadyDecided { order, status }) => {
                self.send(views::orders::already_decided(chat, order, status))
                    .await
            }
            Err(DomainError::OrderNotFound(_)) => self.send(views::menus::gone(chat)).await,
            Err(e) => Err(e.into()),
        }
    }

    // --- shared renders ---

    async fn run_search(&self, chat: ChatId, query: &str) -> Result<()> {
        let query = query.trim();
        let items = self.catalog.search(query).await?;
        self.send(views::catalog::item_list(
            chat,
            &format!("Results for \"{query}\""),
            &items,
        ))
        .await
    }

    async fn render_cart(&self, chat: ChatId) -> Result<()> {
        let entries = self.cart.entries(chat).await?;
        let total = self.cart.total(chat).await?;
        self.send(views::cart::cart_view(chat, &entries, total)).await
    }

    async fn send(&self, message: OutboundMessage) -> Result<()> {
        self.transport.send(message).await
    }
}

fn item_workflow(editing: Option<ItemId>, step: ItemStep, draft: ItemDraft) -> Workflow {
    match editing {
        Some(item) => Workflow::Editing { item, step, draft },
        None => Workflow::Authoring { step, draft },
    }
}

fn photo_step_nudge(chat: ChatId, step: ItemStep) -> OutboundMessage {
    match step {
        ItemStep::Category => views::prompts::need_category_button(chat),
        _ => views::prompts::need_text(chat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RecordingTransport;
    use store::MemoryStore;

    fn engine() -> (Engine<MemoryStore, RecordingTransport>, MemoryStore, RecordingTransport) {
        let store = MemoryStore::default();
        let transport = RecordingTransport::new();
        let engine = Engine::new(
            store.clone(),
            transport.clone(),
            EngineSettings {
                fallback_operator: Some(ChatId::new(900)),
                operator_chat: None,
                payment_card: "6037-0000".to_string(),
            },
        );
        (engine, store, transport)
    }

    #[test]
    fn test_greeting_detection() {
        assert!(is_greeting("hi"));
        assert!(is_greeting("  Hello "));
        assert!(is_greeting("SALAM"));
        assert!(!is_greeting("dune"));
        assert!(!is_greeting("hi there"));
    }

    #[tokio::test]
    async fn test_unknown_button_is_ignored() {
        let (engine, _, transport) = engine();
        engine
            .handle(InboundEvent::button(ChatId::new(1), "bogus|x"))
            .await;
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_stray_photo_is_ignored() {
        let (engine, _, transport) = engine();
        engine
            .handle(InboundEvent::photo(ChatId::new(1), ImageRef::new("p")))
            .await;
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_yields_a_notice() {
        let (engine, store, transport) = engine();
        store.set_fail(true).await;

        engine
            .handle(InboundEvent::button(ChatId::new(1), "categories"))
            .await;

        let last = transport.last_to(ChatId::new(1)).unwrap();
        assert!(last.text_content().contains("Something went wrong"));
    }

    #[tokio::test]
    async fn test_operator_gate_for_buttons() {
        let (engine, _, transport) = engine();

        engine
            .handle(InboundEvent::button(ChatId::new(5), "pending_orders"))
            .await;
        let last = transport.last_to(ChatId::new(5)).unwrap();
        assert!(last.text_content().contains("operators"));

        engine
            .handle(InboundEvent::button(ChatId::new(900), "pending_orders"))
            .await;
        let last = transport.last_to(ChatId::new(900)).unwrap();
        assert!(last.text_content().contains("No pending orders"));
    }
}
