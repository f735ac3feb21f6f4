//! Presentation layer: pure functions building outbound messages from
//! persisted records.
//!
//! Nothing in this crate decides anything. Every function takes records the
//! caller already loaded, formats a text (or photo caption), lays out
//! buttons, and returns an [`common::OutboundMessage`] for the transport.
//! Button actions follow the `verb|id` convention the session crate parses.

pub mod cart;
pub mod catalog;
pub mod menus;
pub mod orders;
pub mod prompts;
