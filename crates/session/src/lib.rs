//! Conversational session layer for the ordering assistant.
//!
//! This crate turns raw inbound events (commands, texts, button presses,
//! photos) into domain calls and rendered replies. Each user has at most
//! one in-progress [`Workflow`]; the [`Engine`] leases the user's session
//! slot for the duration of an event, so one user's events are handled
//! strictly in order.
//!
//! Outbound delivery goes through the [`Transport`] trait; production
//! wires a real sender, tests record with [`RecordingTransport`].

pub mod actions;
pub mod draft;
pub mod engine;
pub mod error;
pub mod registry;
pub mod state;
pub mod transport;

pub use actions::Action;
pub use draft::{ContactDraft, ItemDraft};
pub use engine::{Engine, EngineSettings};
pub use error::{EngineError, Result};
pub use registry::{SessionRegistry, SessionSlot};
pub use state::{CheckoutStep, ItemStep, Workflow};
pub use transport::{RecordingTransport, Transport};
