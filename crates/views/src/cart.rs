//! Cart rendering.

use common::{Button, ChatId, Keyboard, Money, OutboundMessage};
use store::CartEntry;

/// The cart with per-line quantity controls and a checkout row.
pub fn cart_view(chat: ChatId, entries: &[CartEntry], total: Money) -> OutboundMessage {
    if entries.is_empty() {
        return OutboundMessage::with_keyboard(
            chat,
            "Your cart is empty.",
            Keyboard::new(vec![
                vec![Button::new("Categories", "categories")],
                vec![Button::new("Home", "home")],
            ]),
        );
    }

    let mut text = String::from("Your cart:\n");
    let mut rows = Vec::new();
    for entry in entries {
        text.push_str(&format!(
            "{} x{} = {}\n",
            entry.item.title,
            entry.quantity,
            entry.line_total()
        ));
        let id = entry.item.id;
        rows.push(vec![
            Button::new("-", format!("dec|{id}")),
            Button::new(
                format!("{} x{}", entry.item.title, entry.quantity),
                format!("item|{id}"),
            ),
            Button::new("+", format!("inc|{id}")),
            Button::new("Remove", format!("del|{id}")),
        ]);
    }
    text.push_str(&format!("\nTotal: {total}"));

    rows.push(vec![Button::new("Checkout", "checkout")]);
    rows.push(vec![
        Button::new("Clear cart", "clear_cart"),
        Button::new("Home", "home"),
    ]);
    OutboundMessage::with_keyboard(chat, text, Keyboard::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{ItemId, Money};
    use store::CatalogItem;

    fn entry(id: i64, price: i64, quantity: u32) -> CartEntry {
        CartEntry {
            item: CatalogItem {
                id: ItemId::new(id),
                title: format!("Item {id}"),
                author: "Author".to_string(),
                description: String::new(),
                price: Money::from_units(price),
                category_id: None,
                cover: None,
                photo: None,
                stock: 1,
                created_at: Utc::now(),
            },
            quantity,
        }
    }

    #[test]
    fn empty_cart_offers_categories() {
        let msg = cart_view(ChatId::new(1), &[], Money::zero());
        assert_eq!(msg.text_content(), "Your cart is empty.");
        assert_eq!(msg.actions(), vec!["categories", "home"]);
    }

    #[test]
    fn lines_carry_quantity_controls() {
        let entries = vec![entry(3, 1_000, 2), entry(8, 500, 1)];
        let msg = cart_view(ChatId::new(1), &entries, Money::from_units(2_500));

        assert!(msg.text_content().contains("Item 3 x2 = 2,000"));
        assert!(msg.text_content().contains("Total: 2,500"));

        let actions = msg.actions();
        for action in ["dec|3", "inc|3", "del|3", "dec|8", "inc|8", "del|8"] {
            assert!(actions.contains(&action), "missing {action}");
        }
        assert!(actions.contains(&"checkout"));
        assert!(actions.contains(&"clear_cart"));
    }
}
