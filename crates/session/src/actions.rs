//! Button-action parsing.
//!
//! Buttons carry raw strings: static names (`cart`, `pending_orders`) or a
//! verb with an id (`add|42`, `approve_7`). Both `|` and `_` delimit the
//! parametric form.

use common::{CategoryId, ItemId, OrderId};

/// A parsed button action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Home,
    Categories,
    Search,
    Cart,
    Checkout,
    MyOrders,
    ClearCart,
    Admin,
    AddItem,
    AddCategory,
    AddOperator,
    ListItems,
    PendingOrders,
    SkipCategory,
    KeepCategory,
    KeepPhoto,
    OpenCategory(CategoryId),
    OpenItem(ItemId),
    AddToCart(ItemId),
    Increment(ItemId),
    Decrement(ItemId),
    RemoveLine(ItemId),
    EditItem(ItemId),
    DeleteItem(ItemId),
    DeleteCategory(CategoryId),
    SetCategory(CategoryId),
    Approve(OrderId),
    Reject(OrderId),
}

impl Action {
    /// Parses a raw action string, `None` for anything unknown.
    ///
    /// Static names win over splitting, so `add_category` is never read as
    /// verb `add` with id `category`. The parametric form splits on the
    /// first `|`, falling back to `_` when the prefix is a known verb.
    pub fn parse(raw: &str) -> Option<Self> {
        let action = match raw {
            "home" => Action::Home,
            "categories" => Action::Categories,
            "search" => Action::Search,
            "cart" => Action::Cart,
            "checkout" => Action::Checkout,
            "my_orders" => Action::MyOrders,
            "clear_cart" => Action::ClearCart,
            "admin" => Action::Admin,
            "add_item" => Action::AddItem,
            "add_category" => Action::AddCategory,
            "add_operator" => Action::AddOperator,
            "list_items" => Action::ListItems,
            "pending_orders" => Action::PendingOrders,
            "skip_category" => Action::SkipCategory,
            "keep_category" => Action::KeepCategory,
            "keep_photo" => Action::KeepPhoto,
            _ => return Self::parse_parametric(raw),
        };
        Some(action)
    }

    fn parse_parametric(raw: &str) -> Option<Self> {
        let (verb, id) = raw.split_once('|').or_else(|| {
            raw.split_once('_')
                .filter(|(verb, _)| Self::is_parametric_verb(verb))
        })?;
        let id: i64 = id.parse().ok()?;

        let action = match verb {
            "cat" => Action::OpenCategory(CategoryId::new(id)),
            "item" => Action::OpenItem(ItemId::new(id)),
            "add" => Action::AddToCart(ItemId::new(id)),
            "inc" => Action::Increment(ItemId::new(id)),
            "dec" => Action::Decrement(ItemId::new(id)),
            "del" => Action::RemoveLine(ItemId::new(id)),
            "edit" => Action::EditItem(ItemId::new(id)),
            "rmitem" => Action::DeleteItem(ItemId::new(id)),
            "delcat" => Action::DeleteCategory(CategoryId::new(id)),
            "setcat" => Action::SetCategory(CategoryId::new(id)),
            "approve" => Action::Approve(OrderId::new(id)),
            "reject" => Action::Reject(OrderId::new(id)),
            _ => return None,
        };
        Some(action)
    }

    fn is_parametric_verb(verb: &str) -> bool {
        matches!(
            verb,
            "cat"
                | "item"
                | "add"
                | "inc"
                | "dec"
                | "del"
                | "edit"
                | "rmitem"
                | "delcat"
                | "setcat"
                | "approve"
                | "reject"
        )
    }

    /// True when only operators may trigger this action.
    pub fn operator_only(&self) -> bool {
        matches!(
            self,
            Action::Admin
                | Action::AddItem
                | Action::AddCategory
                | Action::AddOperator
                | Action::ListItems
                | Action::PendingOrders
                | Action::EditItem(_)
                | Action::DeleteItem(_)
                | Action::DeleteCategory(_)
                | Action::Approve(_)
                | Action::Reject(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_names() {
        assert_eq!(Action::parse("home"), Some(Action::Home));
        assert_eq!(Action::parse("my_orders"), Some(Action::MyOrders));
        assert_eq!(Action::parse("clear_cart"), Some(Action::ClearCart));
        assert_eq!(Action::parse("pending_orders"), Some(Action::PendingOrders));
        assert_eq!(Action::parse("skip_category"), Some(Action::SkipCategory));
    }

    #[test]
    fn test_static_beats_parametric_split() {
        // "add_category" must not parse as verb "add" with id "category"
        assert_eq!(Action::parse("add_category"), Some(Action::AddCategory));
        assert_eq!(Action::parse("add_item"), Some(Action::AddItem));
        assert_eq!(Action::parse("add_operator"), Some(Action::AddOperator));
    }

    #[test]
    fn test_pipe_form() {
        assert_eq!(
            Action::parse("cat|3"),
            Some(Action::OpenCategory(CategoryId::new(3)))
        );
        assert_eq!(Action::parse("add|42"), Some(Action::AddToCart(ItemId::new(42))));
        assert_eq!(Action::parse("inc|7"), Some(Action::Increment(ItemId::new(7))));
        assert_eq!(Action::parse("dec|7"), Some(Action::Decrement(ItemId::new(7))));
        assert_eq!(Action::parse("del|7"), Some(Action::RemoveLine(ItemId::new(7))));
        assert_eq!(
            Action::parse("approve|19"),
            Some(Action::Approve(OrderId::new(19)))
        );
    }

    #[test]
    fn test_underscore_form() {
        assert_eq!(
            Action::parse("approve_19"),
            Some(Action::Approve(OrderId::new(19)))
        );
        assert_eq!(
            Action::parse("setcat_2"),
            Some(Action::SetCategory(CategoryId::new(2)))
        );
        assert_eq!(
            Action::parse("rmitem_5"),
            Some(Action::DeleteItem(ItemId::new(5)))
        );
    }

    #[test]
    fn test_unknown_and_malformed() {
        assert_eq!(Action::parse("launch_missiles"), None);
        assert_eq!(Action::parse("inc|"), None);
        assert_eq!(Action::parse("inc|abc"), None);
        assert_eq!(Action::parse(""), None);
        assert_eq!(Action::parse("unknown|5"), None);
    }

    #[test]
    fn test_operator_only_set() {
        assert!(Action::Admin.operator_only());
        assert!(Action::Approve(OrderId::new(1)).operator_only());
        assert!(Action::EditItem(ItemId::new(1)).operator_only());
        assert!(!Action::Cart.operator_only());
        assert!(!Action::AddToCart(ItemId::new(1)).operator_only());
        assert!(!Action::SkipCategory.operator_only());
    }
}
