//! Catalog browsing and authoring surfaces.

use common::{Button, ChatId, Keyboard, OutboundMessage};
use store::{CatalogItem, Category};

/// Category picker. Operators also get per-category delete controls.
pub fn category_list(chat: ChatId, categories: &[Category], operator: bool) -> OutboundMessage {
    if categories.is_empty() {
        return OutboundMessage::with_keyboard(
            chat,
            "No categories yet.",
            Keyboard::single_row(vec![Button::new("Home", "home")]),
        );
    }
    let mut rows: Vec<Vec<Button>> = categories
        .iter()
        .map(|c| {
            let mut row = vec![Button::new(c.name.as_str(), format!("cat|{}", c.id))];
            if operator {
                row.push(Button::new("Delete", format!("delcat|{}", c.id)));
            }
            row
        })
        .collect();
    rows.push(vec![Button::new("Home", "home")]);
    OutboundMessage::with_keyboard(chat, "Pick a category:", Keyboard::new(rows))
}

/// Item picker under a heading (category name, search query).
pub fn item_list(chat: ChatId, heading: &str, items: &[CatalogItem]) -> OutboundMessage {
    if items.is_empty() {
        return OutboundMessage::with_keyboard(
            chat,
            format!("{heading}: nothing found."),
            Keyboard::single_row(vec![Button::new("Home", "home")]),
        );
    }
    let mut rows: Vec<Vec<Button>> = items
        .iter()
        .map(|i| {
            vec![Button::new(
                format!("{} ({})", i.title, i.price),
                format!("item|{}", i.id),
            )]
        })
        .collect();
    rows.push(vec![Button::new("Home", "home")]);
    OutboundMessage::with_keyboard(chat, format!("{heading}:"), Keyboard::new(rows))
}

/// One item card, as a photo when the item has an image.
pub fn item_card(chat: ChatId, item: &CatalogItem) -> OutboundMessage {
    let mut caption = format!("{}\nby {}\n", item.title, item.author);
    if !item.description.is_empty() {
        caption.push_str(&item.description);
        caption.push('\n');
    }
    caption.push_str(&format!("Price: {}\nIn stock: {}", item.price, item.stock));

    let keyboard = Keyboard::new(vec![
        vec![Button::new("Add to cart", format!("add|{}", item.id))],
        vec![Button::new("Cart", "cart"), Button::new("Home", "home")],
    ]);

    match item.display_image() {
        Some(image) => OutboundMessage::photo(chat, image.clone(), caption).keyboard(keyboard),
        None => OutboundMessage::with_keyboard(chat, caption, keyboard),
    }
}

/// Operator listing with edit and delete controls per item.
pub fn operator_item_list(chat: ChatId, items: &[CatalogItem]) -> OutboundMessage {
    if items.is_empty() {
        return OutboundMessage::with_keyboard(
            chat,
            "The catalog is empty.",
            Keyboard::single_row(vec![Button::new("Home", "home")]),
        );
    }
    let mut rows: Vec<Vec<Button>> = items
        .iter()
        .map(|i| {
            vec![
                Button::new(i.title.as_str(), format!("item|{}", i.id)),
                Button::new("Edit", format!("edit|{}", i.id)),
                Button::new("Delete", format!("rmitem|{}", i.id)),
            ]
        })
        .collect();
    rows.push(vec![Button::new("Home", "home")]);
    OutboundMessage::with_keyboard(chat, "Catalog items:", Keyboard::new(rows))
}

/// Confirmation after authoring or editing persists an item.
pub fn item_saved(chat: ChatId, item: &CatalogItem) -> OutboundMessage {
    OutboundMessage::text(chat, format!("Saved \"{}\" at {}.", item.title, item.price))
}

pub fn item_deleted(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "Item deleted.")
}

pub fn category_saved(chat: ChatId, category: &Category) -> OutboundMessage {
    OutboundMessage::text(chat, format!("Category \"{}\" added.", category.name))
}

pub fn category_deleted(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "Category deleted. Its items are now uncategorized.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{CategoryId, ImageRef, ItemId, Money};

    fn item(id: i64) -> CatalogItem {
        CatalogItem {
            id: ItemId::new(id),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            description: "Spice and sand".to_string(),
            price: Money::from_units(15_000),
            category_id: None,
            cover: None,
            photo: None,
            stock: 3,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn category_delete_controls_are_operator_only() {
        let cats = vec![Category {
            id: CategoryId::new(4),
            name: "Fiction".to_string(),
        }];

        let plain = category_list(ChatId::new(1), &cats, false);
        assert_eq!(plain.actions(), vec!["cat|4", "home"]);

        let op = category_list(ChatId::new(1), &cats, true);
        assert!(op.actions().contains(&"delcat|4"));
    }

    #[test]
    fn item_card_prefers_photo_body() {
        let mut i = item(9);
        let card = item_card(ChatId::new(1), &i);
        assert!(card.text_content().contains("In stock: 3"));
        assert!(card.actions().contains(&"add|9"));

        i.photo = Some(ImageRef::new("file-1"));
        let card = item_card(ChatId::new(1), &i);
        match card.body {
            common::MessageBody::Photo { ref image, .. } => assert_eq!(image.as_str(), "file-1"),
            ref other => panic!("expected photo body, got {other:?}"),
        }
    }

    #[test]
    fn operator_list_carries_edit_and_delete() {
        let msg = operator_item_list(ChatId::new(1), &[item(2)]);
        assert_eq!(msg.actions(), vec!["item|2", "edit|2", "rmitem|2", "home"]);
    }

    #[test]
    fn empty_listings_keep_a_way_home() {
        let msg = item_list(ChatId::new(1), "Search", &[]);
        assert!(msg.text_content().contains("nothing found"));
        assert_eq!(msg.actions(), vec!["home"]);
    }
}
