use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub database: DatabaseConfig,
    pub registry: RegistryConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: default_database_url(),
                max_connections: 5,
                connection_timeout: 30,
            },
            registry: RegistryConfig {
                base_url: "http://localhost:3000".to_string(),
                auth_token: None,
                request_timeout: 30,
            },
            sync: SyncConfig { auto_sync: true },
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("MOGIRI_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v;
            }
        }
        if let Ok(v) = std::env::var("MOGIRI_DATABASE_MAX_CONNECTIONS") {
            if let Some(value) = parse_u32(&v) {
                cfg.database.max_connections = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("MOGIRI_REGISTRY_URL") {
            if !v.trim().is_empty() {
                cfg.registry.base_url = v;
            }
        }
        if let Ok(v) = std::env::var("MOGIRI_REGISTRY_TOKEN") {
            if !v.trim().is_empty() {
                cfg.registry.auth_token = Some(v);
            }
        }
        if let Ok(v) = std::env::var("MOGIRI_REGISTRY_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.registry.request_timeout = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("MOGIRI_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.registry.base_url.trim().is_empty() {
            return Err("Registry base_url must not be empty".to_string());
        }
        if !self.registry.base_url.starts_with("http://")
            && !self.registry.base_url.starts_with("https://")
        {
            return Err("Registry base_url must start with http:// or https://".to_string());
        }
        if self.registry.request_timeout == 0 {
            return Err("Registry request_timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_database_url() -> String {
    let dir = dirs::data_dir()
        .map(|d| d.join("mogiri"))
        .unwrap_or_else(|| PathBuf::from("data"));
    format!("sqlite:{}", dir.join("mogiri.db").display())
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
