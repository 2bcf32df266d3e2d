//! Per-resource endpoints mounted next to the generic CRUD routes.
//!
//! Each extension is keyed by the resource path it serves; the router asks
//! the registry for the one matching its configured resource.

use axum::{body::Bytes, Router};
use service::record::Record;

use crate::errors::ApiError;
use crate::routes::body::{decode, JsonBody};
use crate::state::ServiceState;

pub mod ancillaries;
pub mod baggage;
pub mod checkin;
pub mod loyalty;
pub mod notifications;
pub mod pricing;

pub trait ResourceExtension: Send + Sync {
    /// Resource path this extension is mounted for, e.g. `baggage`.
    fn resource(&self) -> &'static str;

    /// Extra routes under `base` (`/baggage`).
    fn routes(&self, base: &str) -> Router<ServiceState>;
}

#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn ResourceExtension>>,
}

impl ExtensionRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(loyalty::Loyalty));
        registry.register(Box::new(checkin::Checkin));
        registry.register(Box::new(baggage::Baggage));
        registry.register(Box::new(pricing::Pricing));
        registry.register(Box::new(ancillaries::Ancillaries));
        registry.register(Box::new(notifications::Notifications));
        registry
    }

    /// Later registrations for the same path take precedence.
    pub fn register(&mut self, ext: Box<dyn ResourceExtension>) {
        self.extensions.retain(|e| e.resource() != ext.resource());
        self.extensions.push(ext);
    }

    pub fn find(&self, path: &str) -> Option<&dyn ResourceExtension> {
        self.extensions.iter().find(|e| e.resource() == path).map(|e| e.as_ref())
    }
}

/// Object body, or an empty record when the body is missing or not an object.
/// Only malformed JSON is rejected.
pub(crate) fn object_or_empty(bytes: &Bytes) -> Result<Record, ApiError> {
    match decode(bytes) {
        JsonBody::Object(record) => Ok(record),
        JsonBody::Invalid => Err(ApiError::BadRequest("Invalid JSON body".into())),
        JsonBody::Empty | JsonBody::NotObject => Ok(Record::new()),
    }
}
