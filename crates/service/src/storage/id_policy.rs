use configs::ResourceSettings;
use rand::Rng;
use uuid::Uuid;

/// How a store synthesizes a primary key when a new record carries none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdPolicy {
    /// Random v4 UUID string.
    Uuid,
    /// `prefix` followed by exactly `digits` decimal digits, first digit non-zero
    /// (e.g. `BK482913` for bookings).
    Prefixed { prefix: String, digits: u32 },
}

impl IdPolicy {
    pub fn from_settings(settings: &ResourceSettings) -> Self {
        match &settings.id_prefix {
            Some(prefix) => Self::Prefixed { prefix: prefix.clone(), digits: settings.id_digits },
            None => Self::Uuid,
        }
    }

    /// Generate an identifier for which `is_taken` returns false,
    /// retrying on collision.
    pub fn generate<F>(&self, is_taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        match self {
            Self::Uuid => loop {
                let id = Uuid::new_v4().to_string();
                if !is_taken(&id) {
                    return id;
                }
            },
            Self::Prefixed { prefix, digits } => {
                let low = 10u64.pow(digits.saturating_sub(1));
                let high = 10u64.pow(*digits);
                let mut rng = rand::thread_rng();
                loop {
                    let id = format!("{}{}", prefix, rng.gen_range(low..high));
                    if !is_taken(&id) {
                        return id;
                    }
                }
            }
        }
    }
}
