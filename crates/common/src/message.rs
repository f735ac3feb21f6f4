//! Inbound and outbound message shapes exchanged with the chat transport.
//!
//! The messaging platform itself is out of scope: the engine consumes
//! [`InboundEvent`]s and produces [`OutboundMessage`]s, and an adapter on
//! either side maps them onto the platform's wire format.

use serde::{Deserialize, Serialize};

use crate::types::{ChatId, ImageRef};

/// A single event delivered by the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub chat_id: ChatId,
    pub kind: EventKind,
}

/// What the user actually did, reduced to the payload the engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A slash-style command, without its leading marker (`start`, `admin`).
    Command { name: String },
    /// Free text typed by the user.
    Text { text: String },
    /// A button press carrying its raw action string.
    Button { action: String },
    /// A photo upload, reduced to the platform's file reference.
    Photo { image: ImageRef },
}

// Convenience constructors
impl InboundEvent {
    /// A command event (`start`, `admin`, ...).
    pub fn command(chat_id: ChatId, name: impl Into<String>) -> Self {
        Self {
            chat_id,
            kind: EventKind::Command { name: name.into() },
        }
    }

    /// A free-text event.
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            kind: EventKind::Text { text: text.into() },
        }
    }

    /// A button-press event.
    pub fn button(chat_id: ChatId, action: impl Into<String>) -> Self {
        Self {
            chat_id,
            kind: EventKind::Button {
                action: action.into(),
            },
        }
    }

    /// A photo-upload event.
    pub fn photo(chat_id: ChatId, image: ImageRef) -> Self {
        Self {
            chat_id,
            kind: EventKind::Photo { image },
        }
    }
}

/// One tappable button: a label shown to the user and the action string
/// sent back when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub action: String,
}

impl Button {
    /// Creates a button.
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }
}

/// A grid of buttons attached to an outbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Creates a keyboard from rows of buttons.
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }

    /// Creates a keyboard with a single row.
    pub fn single_row(buttons: Vec<Button>) -> Self {
        Self {
            rows: vec![buttons],
        }
    }

    /// Iterates over every button in the grid.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

/// Message payload: plain text or a photo with caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageBody {
    Text { text: String },
    Photo { image: ImageRef, caption: String },
}

/// An outbound message addressed to one chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub body: MessageBody,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    /// A plain text message.
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            body: MessageBody::Text { text: text.into() },
            keyboard: None,
        }
    }

    /// A text message with an attached button grid.
    pub fn with_keyboard(chat_id: ChatId, text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            chat_id,
            body: MessageBody::Text { text: text.into() },
            keyboard: Some(keyboard),
        }
    }

    /// A photo message with a caption.
    pub fn photo(chat_id: ChatId, image: ImageRef, caption: impl Into<String>) -> Self {
        Self {
            chat_id,
            body: MessageBody::Photo {
                image,
                caption: caption.into(),
            },
            keyboard: None,
        }
    }

    /// Attaches a button grid, replacing any existing one.
    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    /// The human-readable text of the message (body text or photo caption).
    pub fn text_content(&self) -> &str {
        match &self.body {
            MessageBody::Text { text } => text,
            MessageBody::Photo { caption, .. } => caption,
        }
    }

    /// All action strings reachable from this message's buttons.
    pub fn actions(&self) -> Vec<&str> {
        self.keyboard
            .iter()
            .flat_map(|k| k.buttons())
            .map(|b| b.action.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_event_json_shape() {
        let event = InboundEvent::text(ChatId::new(7), "hello");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["chat_id"], 7);
        assert_eq!(json["kind"]["type"], "text");
        assert_eq!(json["kind"]["text"], "hello");

        let back: InboundEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn button_event_carries_raw_action() {
        let event = InboundEvent::button(ChatId::new(1), "add|42");
        match event.kind {
            EventKind::Button { action } => assert_eq!(action, "add|42"),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn outbound_text_content_reads_caption() {
        let msg = OutboundMessage::photo(ChatId::new(1), ImageRef::new("f1"), "A cover");
        assert_eq!(msg.text_content(), "A cover");
    }

    #[test]
    fn outbound_actions_flatten_keyboard() {
        let kb = Keyboard::new(vec![
            vec![Button::new("+", "inc|3"), Button::new("-", "dec|3")],
            vec![Button::new("Home", "home")],
        ]);
        let msg = OutboundMessage::with_keyboard(ChatId::new(1), "Cart", kb);
        assert_eq!(msg.actions(), vec!["inc|3", "dec|3", "home"]);
    }

    #[test]
    fn keyboard_defaults_to_empty() {
        let kb = Keyboard::default();
        assert_eq!(kb.buttons().count(), 0);
    }
}
