//! Durable store gateway for the ordering assistant.
//!
//! Exposes a narrow CRUD interface ([`Store`]) over users, catalog items,
//! categories, cart lines, orders, and operators, with two implementations:
//! [`MemoryStore`] for tests and local runs, and [`PostgresStore`] backed by
//! sqlx with bounded-retry connection establishment.

pub mod error;
pub mod gateway;
pub mod memory;
pub mod postgres;
pub mod records;

pub use error::{Result, StoreError};
pub use gateway::Store;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use records::{
    CartEntry, CatalogItem, Category, ContactInfo, NewCatalogItem, NewOrder, NewOrderLine,
    OperatorRecord, OrderLine, OrderRecord, OrderStatus, UserRecord,
};
