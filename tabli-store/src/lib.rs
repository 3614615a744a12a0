pub mod accounts;
pub mod app_config;
pub mod directory;
pub mod events;
pub mod kv;
pub mod preferences;
pub mod seed;
pub mod session;

pub use accounts::{StaffAccount, StaffAccounts};
pub use directory::RestaurantDirectory;
pub use events::EventBus;
pub use kv::{KeyValueStore, MemoryKeyValueStore, RedisKeyValueStore};
pub use preferences::PreferenceStore;
pub use seed::Seed;
pub use session::{SessionStore, StaffSession};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(u32),

    #[error("An account with this email already exists: {0}")]
    EmailTaken(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid seed data: {0}")]
    Seed(String),
}
