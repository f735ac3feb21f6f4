//! Route handlers for the service surface.

pub mod events;
pub mod health;
pub mod metrics;
pub mod sessions;
