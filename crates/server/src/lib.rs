//! HTTP surface for one airline resource service.
//! - `routes` holds the generic CRUD handlers and router composition.
//! - `extensions` adds the per-resource endpoints (baggage, pricing, ...).
//! - `startup` wires configuration, logging and the background snapshot load.

pub mod errors;
pub mod extensions;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::run;
