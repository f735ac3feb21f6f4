//! Order listings, operator alerts and decision notices.

use common::{Button, ChatId, Keyboard, OrderId, OutboundMessage};
use store::{OrderLine, OrderRecord, OrderStatus};

/// The requesting user's order history, newest first.
pub fn my_orders(chat: ChatId, orders: &[OrderRecord]) -> OutboundMessage {
    if orders.is_empty() {
        return OutboundMessage::with_keyboard(
            chat,
            "You have no orders yet.",
            Keyboard::single_row(vec![Button::new("Home", "home")]),
        );
    }
    let mut text = String::from("Your orders:\n");
    for order in orders {
        text.push_str(&format!(
            "#{} on {}: {} ({})\n",
            order.id,
            order.created_at.format("%Y-%m-%d"),
            order.total,
            order.status
        ));
    }
    OutboundMessage::with_keyboard(
        chat,
        text,
        Keyboard::single_row(vec![Button::new("Home", "home")]),
    )
}

/// Header sent before the individual pending-order cards.
pub fn pending_summary(chat: ChatId, count: usize) -> OutboundMessage {
    if count == 0 {
        OutboundMessage::text(chat, "No pending orders.")
    } else {
        OutboundMessage::text(chat, format!("{count} pending order(s):"))
    }
}

/// One pending order with its receipt photo and approve/reject controls.
///
/// Used both as the alert right after a checkout and in the pending-orders
/// review.
pub fn order_alert(chat: ChatId, order: &OrderRecord, lines: &[OrderLine]) -> OutboundMessage {
    let mut caption = format!("Order #{} from chat {}\n", order.id, order.user_id);
    for line in lines {
        caption.push_str(&format!(
            "{} x{} = {}\n",
            line.title,
            line.quantity,
            line.price.multiply(line.quantity)
        ));
    }
    caption.push_str(&format!(
        "Total: {}\nPhone: {}\nAddress: {}\nPostal code: {}",
        order.total, order.phone, order.address, order.postal_code
    ));

    let keyboard = Keyboard::single_row(vec![
        Button::new("Approve", format!("approve|{}", order.id)),
        Button::new("Reject", format!("reject|{}", order.id)),
    ]);
    OutboundMessage::photo(chat, order.receipt.clone(), caption).keyboard(keyboard)
}

/// Confirmation for the purchaser right after placing.
pub fn order_placed(chat: ChatId, order: &OrderRecord) -> OutboundMessage {
    OutboundMessage::text(
        chat,
        format!("Order #{} received. We will confirm it shortly.", order.id),
    )
}

/// Tells the purchaser how the review went.
pub fn decision_notice(chat: ChatId, order: &OrderRecord) -> OutboundMessage {
    let text = match order.status {
        OrderStatus::Approved => format!("Order #{} is approved. It is on its way.", order.id),
        OrderStatus::Rejected => format!(
            "Order #{} was rejected. Get in touch if you believe this is a mistake.",
            order.id
        ),
        OrderStatus::Pending => format!("Order #{} is still being reviewed.", order.id),
    };
    OutboundMessage::text(chat, text)
}

/// Operator-side confirmation of an applied verdict.
pub fn decided_ack(chat: ChatId, order: &OrderRecord) -> OutboundMessage {
    OutboundMessage::text(chat, format!("Order #{} marked {}.", order.id, order.status))
}

/// Tells the operator a repeat verdict changed nothing.
pub fn already_decided(chat: ChatId, order: OrderId, status: OrderStatus) -> OutboundMessage {
    OutboundMessage::text(chat, format!("Order #{order} was already {status}."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{ImageRef, Money};

    fn order(id: i64, status: OrderStatus) -> OrderRecord {
        OrderRecord {
            id: OrderId::new(id),
            user_id: ChatId::new(50),
            total: Money::from_units(12_000),
            receipt: ImageRef::new("receipt-1"),
            phone: "0912".to_string(),
            address: "1 Main St".to_string(),
            postal_code: "12345".to_string(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn alert_is_a_receipt_photo_with_controls() {
        let lines = vec![OrderLine {
            id: 1,
            order_id: OrderId::new(7),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            price: Money::from_units(6_000),
            quantity: 2,
        }];
        let msg = order_alert(ChatId::new(900), &order(7, OrderStatus::Pending), &lines);

        assert_eq!(msg.actions(), vec!["approve|7", "reject|7"]);
        assert!(msg.text_content().contains("Dune x2 = 12,000"));
        assert!(msg.text_content().contains("Postal code: 12345"));
        assert!(matches!(msg.body, common::MessageBody::Photo { .. }));
    }

    #[test]
    fn decision_notice_follows_status() {
        let approved = decision_notice(ChatId::new(1), &order(3, OrderStatus::Approved));
        assert!(approved.text_content().contains("approved"));

        let rejected = decision_notice(ChatId::new(1), &order(3, OrderStatus::Rejected));
        assert!(rejected.text_content().contains("rejected"));
    }

    #[test]
    fn my_orders_lists_status_and_total() {
        let msg = my_orders(ChatId::new(1), &[order(2, OrderStatus::Pending)]);
        assert!(msg.text_content().contains("#2"));
        assert!(msg.text_content().contains("12,000"));
        assert!(msg.text_content().contains("pending"));
    }
}
