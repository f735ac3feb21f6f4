//! Shared types for the ordering assistant.
//!
//! Identifier newtypes, integer money, and the inbound/outbound message
//! shapes exchanged with the chat transport. Every other crate in the
//! workspace builds on these.

pub mod message;
pub mod money;
pub mod types;

pub use message::{Button, EventKind, InboundEvent, Keyboard, MessageBody, OutboundMessage};
pub use money::{Money, ParseMoneyError};
pub use types::{CategoryId, ChatId, ImageRef, ItemId, OrderId};
