use std::{path::Path, str::FromStr};

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub resource: ResourceConfig,
    #[serde(default = "default_openapi_file")]
    pub openapi_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            resource: ResourceConfig::default(),
            openapi_file: default_openapi_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// What happens to a record on `DELETE /{resource}/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Drop the record from the collection.
    Remove,
    /// Keep the record and flip its `status` field to `"cancelled"`.
    Cancel,
}

impl FromStr for DeleteMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remove" => Ok(Self::Remove),
            "cancel" => Ok(Self::Cancel),
            other => Err(anyhow!("unknown delete_mode `{other}` (expected remove|cancel)")),
        }
    }
}

/// Resource section as written in `config.toml` or the environment.
/// Anything left out is taken from the built-in profile of `path`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default = "default_resource_path")]
    pub path: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id_field: Option<String>,
    #[serde(default)]
    pub data_file: Option<String>,
    #[serde(default)]
    pub collection_key: Option<String>,
    #[serde(default)]
    pub id_prefix: Option<String>,
    #[serde(default)]
    pub id_digits: Option<u32>,
    #[serde(default)]
    pub delete_mode: Option<DeleteMode>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            path: default_resource_path(),
            name: None,
            id_field: None,
            data_file: None,
            collection_key: None,
            id_prefix: None,
            id_digits: None,
            delete_mode: None,
        }
    }
}

/// Fully resolved per-service resource settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSettings {
    pub name: String,
    pub path: String,
    pub id_field: String,
    pub data_file: String,
    pub collection_key: String,
    pub id_prefix: Option<String>,
    pub id_digits: u32,
    pub delete_mode: DeleteMode,
}

struct Profile {
    path: &'static str,
    name: &'static str,
    id_field: &'static str,
    collection_key: &'static str,
    id_prefix: Option<&'static str>,
    delete_mode: DeleteMode,
}

const PROFILES: &[Profile] = &[
    Profile { path: "flights", name: "Flights", id_field: "flight_id", collection_key: "flights", id_prefix: None, delete_mode: DeleteMode::Remove },
    Profile { path: "passengers", name: "Passengers", id_field: "passenger_id", collection_key: "passengers", id_prefix: None, delete_mode: DeleteMode::Remove },
    Profile { path: "bookings", name: "Bookings", id_field: "booking_id", collection_key: "bookings", id_prefix: Some("BK"), delete_mode: DeleteMode::Cancel },
    Profile { path: "tickets", name: "Tickets", id_field: "ticket_id", collection_key: "tickets", id_prefix: None, delete_mode: DeleteMode::Remove },
    Profile { path: "checkin", name: "Checkin", id_field: "booking_id", collection_key: "checkins", id_prefix: None, delete_mode: DeleteMode::Remove },
    Profile { path: "baggage", name: "Baggage", id_field: "bag_tag", collection_key: "baggage", id_prefix: None, delete_mode: DeleteMode::Remove },
    Profile { path: "loyalty", name: "Loyalty", id_field: "member_id", collection_key: "members", id_prefix: None, delete_mode: DeleteMode::Remove },
    Profile { path: "pricing", name: "Pricing", id_field: "pricing_id", collection_key: "pricing", id_prefix: None, delete_mode: DeleteMode::Remove },
    Profile { path: "notifications", name: "Notifications", id_field: "notification_id", collection_key: "notifications", id_prefix: None, delete_mode: DeleteMode::Remove },
    Profile { path: "ancillaries", name: "Ancillaries", id_field: "ancillary_id", collection_key: "ancillaries", id_prefix: None, delete_mode: DeleteMode::Remove },
];

const DEFAULT_ID_DIGITS: u32 = 6;

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 3000 }
fn default_resource_path() -> String { "items".into() }
fn default_data_file() -> String { "/api/api.json".into() }
fn default_openapi_file() -> String { "/public/openapi.yaml".into() }

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ResourceSettings {
    /// Built-in defaults for a resource path. Unknown paths get a generic
    /// `id`-keyed profile with UUID identifiers.
    pub fn profile(path: &str) -> Self {
        match PROFILES.iter().find(|p| p.path == path) {
            Some(p) => Self {
                name: p.name.to_string(),
                path: p.path.to_string(),
                id_field: p.id_field.to_string(),
                data_file: default_data_file(),
                collection_key: p.collection_key.to_string(),
                id_prefix: p.id_prefix.map(str::to_string),
                id_digits: DEFAULT_ID_DIGITS,
                delete_mode: p.delete_mode,
            },
            None => Self {
                name: capitalize(path),
                path: path.to_string(),
                id_field: "id".to_string(),
                data_file: default_data_file(),
                collection_key: path.to_string(),
                id_prefix: None,
                id_digits: DEFAULT_ID_DIGITS,
                delete_mode: DeleteMode::Remove,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() || self.path.contains('/') {
            return Err(anyhow!("resource.path must be a single non-empty path segment"));
        }
        if self.id_field.trim().is_empty() {
            return Err(anyhow!("resource.id_field must not be empty"));
        }
        if !(1..=18).contains(&self.id_digits) {
            return Err(anyhow!("resource.id_digits must be within 1..=18"));
        }
        Ok(())
    }
}

impl ResourceConfig {
    /// Overlay explicit values on the profile for `path` and validate.
    pub fn resolve(&self) -> Result<ResourceSettings> {
        let path = self.path.trim().trim_matches('/').to_string();
        let mut settings = ResourceSettings::profile(&path);
        if let Some(name) = non_blank(&self.name) { settings.name = name; }
        if let Some(id_field) = non_blank(&self.id_field) { settings.id_field = id_field; }
        if let Some(data_file) = non_blank(&self.data_file) { settings.data_file = data_file; }
        if let Some(key) = non_blank(&self.collection_key) { settings.collection_key = key; }
        if let Some(prefix) = non_blank(&self.id_prefix) { settings.id_prefix = Some(prefix); }
        if let Some(digits) = self.id_digits { settings.id_digits = digits; }
        if let Some(mode) = self.delete_mode { settings.delete_mode = mode; }
        settings.validate()?;
        Ok(settings)
    }
}

fn non_blank(v: &Option<String>) -> Option<String> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

pub fn parse_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// Build the configuration purely from environment variables, the way the
/// container manifests launch each service.
pub fn from_env() -> Result<AppConfig> {
    let mut cfg = AppConfig::default();
    if let Some(host) = env_opt("SERVER_HOST") { cfg.server.host = host; }
    if let Some(port) = env_opt("PORT") {
        cfg.server.port = port.parse().map_err(|e| anyhow!("PORT is not a valid port: {e}"))?;
    }
    if let Some(w) = env_opt("TOKIO_WORKER_THREADS") {
        cfg.server.worker_threads = w.parse().ok();
    }
    if let Some(path) = env_opt("RESOURCE_PATH") { cfg.resource.path = path; }
    cfg.resource.name = env_opt("SERVICE_NAME");
    cfg.resource.id_field = env_opt("ID_FIELD");
    cfg.resource.data_file = env_opt("DATA_FILE");
    cfg.resource.collection_key = env_opt("COLLECTION_KEY");
    cfg.resource.id_prefix = env_opt("ID_PREFIX");
    if let Some(digits) = env_opt("ID_DIGITS") {
        cfg.resource.id_digits = Some(digits.parse().map_err(|e| anyhow!("ID_DIGITS: {e}"))?);
    }
    if let Some(mode) = env_opt("DELETE_MODE") {
        cfg.resource.delete_mode = Some(mode.parse()?);
    }
    if let Some(file) = env_opt("OPENAPI_FILE") { cfg.openapi_file = file; }
    Ok(cfg)
}

impl AppConfig {
    /// `CONFIG_PATH` (default `config.toml`) when it exists, the environment otherwise.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if Path::new(&path).exists() { load_from_file(&path)? } else { from_env()? };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.resource.resolve()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}
