//! Step prompts and re-prompts for the interactive workflows.

use common::{Button, ChatId, Keyboard, Money, OutboundMessage};
use store::Category;

// --- checkout ---

pub fn ask_phone(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "Please send your phone number.")
}

pub fn ask_address(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "Please send your delivery address.")
}

pub fn ask_postal_code(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "Please send your postal code.")
}

/// Payment instruction; a receipt photo completes the checkout.
pub fn ask_receipt(chat: ChatId, total: Money, card: &str) -> OutboundMessage {
    OutboundMessage::text(
        chat,
        format!("Please transfer {total} to card {card} and send a photo of the receipt."),
    )
}

pub fn need_text(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "Please answer with a text message.")
}

pub fn need_photo(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "Please send a photo.")
}

pub fn checkout_empty_cart(chat: ChatId) -> OutboundMessage {
    OutboundMessage::with_keyboard(
        chat,
        "Your cart is empty. Add something before checking out.",
        Keyboard::single_row(vec![Button::new("Categories", "categories")]),
    )
}

// --- item authoring and editing ---

fn text_step(chat: ChatId, ask: &str, current: Option<&str>) -> OutboundMessage {
    match current {
        Some(value) => OutboundMessage::text(
            chat,
            format!("{ask} Send an empty message to keep \"{value}\"."),
        ),
        None => OutboundMessage::text(chat, ask),
    }
}

pub fn ask_title(chat: ChatId, current: Option<&str>) -> OutboundMessage {
    text_step(chat, "Send the item title.", current)
}

pub fn ask_author(chat: ChatId, current: Option<&str>) -> OutboundMessage {
    text_step(chat, "Send the author.", current)
}

pub fn ask_description(chat: ChatId, current: Option<&str>) -> OutboundMessage {
    text_step(chat, "Send a short description.", current)
}

pub fn ask_price(chat: ChatId, current: Option<Money>) -> OutboundMessage {
    match current {
        Some(value) => OutboundMessage::text(
            chat,
            format!("Send the price in whole units. Send an empty message to keep {value}."),
        ),
        None => OutboundMessage::text(chat, "Send the price in whole units."),
    }
}

pub fn bad_price(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "That is not a valid price. Digits only, please.")
}

/// Category picker for the authoring flow. An edit session also gets a
/// keep-current button.
pub fn ask_item_category(chat: ChatId, categories: &[Category], keep: bool) -> OutboundMessage {
    let mut rows: Vec<Vec<Button>> = categories
        .iter()
        .map(|c| vec![Button::new(c.name.as_str(), format!("setcat|{}", c.id))])
        .collect();
    let mut last = vec![Button::new("No category", "skip_category")];
    if keep {
        last.push(Button::new("Keep current", "keep_category"));
    }
    rows.push(last);
    OutboundMessage::with_keyboard(chat, "Pick a category for the item:", Keyboard::new(rows))
}

pub fn need_category_button(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "Please pick a category with the buttons above.")
}

pub fn ask_item_photo(chat: ChatId, keep: bool) -> OutboundMessage {
    let text = "Send a photo of the item.";
    if keep {
        OutboundMessage::with_keyboard(
            chat,
            text,
            Keyboard::single_row(vec![Button::new("Keep current", "keep_photo")]),
        )
    } else {
        OutboundMessage::text(chat, text)
    }
}

// --- one-step prompts ---

pub fn ask_search_query(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "What are you looking for?")
}

pub fn ask_category_name(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "Send the new category name.")
}

pub fn ask_operator_id(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "Send the numeric chat id of the new operator.")
}

pub fn bad_operator_id(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "That is not a numeric chat id. Try again.")
}

pub fn operator_added(chat: ChatId, id: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, format!("Operator {id} added."))
}
