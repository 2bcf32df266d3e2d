//! Resource-specific operations layered on the generic record store.

pub mod ancillary_service;
pub mod baggage_service;
pub mod loyalty_service;
pub mod notification_service;
pub mod pricing_service;
