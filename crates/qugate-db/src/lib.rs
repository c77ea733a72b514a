//! Record store for the gateway: storage-provider registrations and API
//! tokens, behind the [`RecordStore`] trait so handlers never touch a
//! concrete database. [`PgStore`] is the production implementation;
//! [`MemoryStore`] backs tests and single-node setups.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::RecordStore;
