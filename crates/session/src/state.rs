//! Workflow state machine types.

use serde::{Deserialize, Serialize};

use common::ItemId;

use crate::draft::{ContactDraft, ItemDraft};

/// Steps of the checkout dialogue.
///
/// ```text
/// Phone ──► Address ──► Postal ──► Receipt ──► (order placed)
/// ```
///
/// The first three accept text; `Receipt` accepts only a photo. There are
/// no backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutStep {
    Phone,
    Address,
    Postal,
    Receipt,
}

/// Steps of the item authoring and editing dialogues.
///
/// ```text
/// Title ──► Author ──► Description ──► Price ──► Category ──► Photo ──► (item saved)
/// ```
///
/// `Category` is satisfied by buttons only; `Photo` by a photo upload (or
/// a keep button while editing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStep {
    Title,
    Author,
    Description,
    Price,
    Category,
    Photo,
}

/// One user's in-progress dialogue.
///
/// At most one workflow exists per user. Reaching a terminal step destroys
/// it, as does the `home` action; starting a new workflow replaces any
/// previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "workflow", rename_all = "snake_case")]
pub enum Workflow {
    /// Checkout dialogue gathering contact info and the payment receipt.
    Checkout {
        step: CheckoutStep,
        draft: ContactDraft,
    },
    /// Operator dialogue authoring a new catalog item.
    Authoring { step: ItemStep, draft: ItemDraft },
    /// Operator dialogue editing an existing item; the draft starts from
    /// the item's current values.
    Editing {
        item: ItemId,
        step: ItemStep,
        draft: ItemDraft,
    },
    /// Awaiting one text: a search query.
    SearchQuery,
    /// Awaiting one text: a new category name (operator).
    CategoryName,
    /// Awaiting one text: a numeric operator chat id (operator).
    OperatorId,
}

impl Workflow {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Workflow::Checkout { .. } => "checkout",
            Workflow::Authoring { .. } => "authoring",
            Workflow::Editing { .. } => "editing",
            Workflow::SearchQuery => "search_query",
            Workflow::CategoryName => "category_name",
            Workflow::OperatorId => "operator_id",
        }
    }
}
