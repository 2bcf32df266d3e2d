//! Shared pieces used by every airline service binary: response types and
//! logging setup.

pub mod types;
pub mod utils;
