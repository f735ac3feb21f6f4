//! Entry menus and shared notices.

use common::{Button, ChatId, Keyboard, OutboundMessage};

/// The menu every user lands on. Operators get an extra console row.
pub fn main_menu(chat: ChatId, operator: bool) -> OutboundMessage {
    let mut rows = vec![
        vec![
            Button::new("Categories", "categories"),
            Button::new("Search", "search"),
        ],
        vec![
            Button::new("Cart", "cart"),
            Button::new("My orders", "my_orders"),
        ],
        vec![Button::new("Checkout", "checkout")],
    ];
    if operator {
        rows.push(vec![Button::new("Admin", "admin")]);
    }
    OutboundMessage::with_keyboard(
        chat,
        "Welcome to the shop. What would you like to do?",
        Keyboard::new(rows),
    )
}

/// The operator console.
pub fn operator_menu(chat: ChatId) -> OutboundMessage {
    OutboundMessage::with_keyboard(
        chat,
        "Operator console.",
        Keyboard::new(vec![
            vec![
                Button::new("Add item", "add_item"),
                Button::new("List items", "list_items"),
            ],
            vec![
                Button::new("Add category", "add_category"),
                Button::new("Add operator", "add_operator"),
            ],
            vec![Button::new("Pending orders", "pending_orders")],
            vec![Button::new("Home", "home")],
        ]),
    )
}

/// Notice for non-operators touching operator features.
pub fn unauthorized(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "This area is for shop operators.")
}

/// Generic notice sent when handling an event fails internally.
pub fn failure(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "Something went wrong. Please try again.")
}

/// Notice for buttons whose target no longer exists.
pub fn gone(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, "That is no longer available.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_menu_gates_admin_row() {
        let plain = main_menu(ChatId::new(1), false);
        assert!(!plain.actions().contains(&"admin"));

        let op = main_menu(ChatId::new(1), true);
        assert!(op.actions().contains(&"admin"));
        assert!(op.actions().contains(&"checkout"));
    }

    #[test]
    fn operator_menu_lists_console_actions() {
        let menu = operator_menu(ChatId::new(1));
        for action in [
            "add_item",
            "list_items",
            "add_category",
            "add_operator",
            "pending_orders",
            "home",
        ] {
            assert!(menu.actions().contains(&action), "missing {action}");
        }
    }
}
