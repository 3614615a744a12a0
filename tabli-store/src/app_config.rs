use serde::Deserialize;
use std::env;
use tabli_core::qr::{DEFAULT_QR_API, DEFAULT_QR_SIZE};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub floor: FloorConfig,
    pub notifications: NotificationConfig,
    pub public: PublicConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Without a url, key-value state lives in process memory.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RedisConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FloorConfig {
    /// Turnover used for restaurants that do not set their own
    #[serde(default = "default_turnover")]
    pub default_turnover_minutes: u32,
    #[serde(default = "default_hold")]
    pub default_hold_minutes: u32,
    #[serde(default = "default_reminder")]
    pub reminder_minutes: u32,
    #[serde(default = "default_sweep")]
    pub hold_sweep_seconds: u64,
}

fn default_turnover() -> u32 { 45 }
fn default_hold() -> u32 { 10 }
fn default_reminder() -> u32 { 2 }
fn default_sweep() -> u64 { 15 }

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    #[serde(default = "default_delay")]
    pub simulated_delay_ms: u64,
}

fn default_delay() -> u64 { 500 }

#[derive(Debug, Deserialize, Clone)]
pub struct PublicConfig {
    /// Customer-facing origin that QR codes point at
    pub base_url: String,
    #[serde(default = "default_qr_api")]
    pub qr_api_url: String,
    #[serde(default = "default_qr_size")]
    pub qr_size: u32,
    /// Offset of the restaurants' local clock, for opening hours
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
}

fn default_qr_api() -> String { DEFAULT_QR_API.to_string() }
fn default_qr_size() -> u32 { DEFAULT_QR_SIZE }
// Gulf Standard Time
fn default_utc_offset() -> i32 { 240 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `TABLI__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("TABLI").prefix_separator("__").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
