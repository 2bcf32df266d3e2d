use serde::Serialize;

/// Body of `GET /health`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Health {
    pub status: &'static str,
    pub records: usize,
}

impl Health {
    pub fn healthy(records: usize) -> Self {
        Self { status: "healthy", records }
    }
}
