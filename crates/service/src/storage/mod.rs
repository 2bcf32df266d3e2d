//! Storage abstractions for the service layer
//!
//! The in-memory record store, the snapshot document it is seeded from, and
//! the identifier policy used when callers omit a primary key.

pub mod id_policy;
pub mod record_store;
pub mod snapshot;

pub use id_policy::IdPolicy;
pub use record_store::{RecordStore, StoreData};
pub use snapshot::Snapshot;
