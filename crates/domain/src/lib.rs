//! Domain layer for the shop.
//!
//! This crate provides the services the session engine drives:
//! - `CartEngine` for cart reads and atomic quantity changes
//! - `CatalogService` for item and category authoring
//! - `OperatorRoster` for operator authorization
//! - `OrderDesk` for order placement and operator decisions
//!
//! Every service is generic over [`store::Store`], so the same code runs
//! against PostgreSQL in production and the in-memory store in tests.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod operators;
pub mod orders;

pub use cart::{CartDelta, CartEngine};
pub use catalog::CatalogService;
pub use error::{DomainError, Result};
pub use operators::OperatorRoster;
pub use orders::{OrderDesk, Verdict};
