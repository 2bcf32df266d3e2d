//! Record store layer shared by every airline service.
//! - `storage` owns the in-memory collection, snapshot loading and identifier policy.
//! - `services` holds the resource-specific operations built on top of the store.
//! - `record` has the schema-less record helpers (identifier access, filter matching, merge).

pub mod errors;
pub mod record;
pub mod services;
pub mod storage;
