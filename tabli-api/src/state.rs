use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tabli_core::{BookingGateway, LoggingBookingGateway, NotificationDispatcher, SimulatedDispatcher};
use tabli_store::app_config::{Config, FloorConfig, PublicConfig};
use tabli_store::{
    EventBus, KeyValueStore, MemoryKeyValueStore, PreferenceStore, RedisKeyValueStore, RestaurantDirectory, Seed,
    SessionStore, StaffAccounts,
};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<RestaurantDirectory>,
    pub accounts: Arc<StaffAccounts>,
    pub sessions: SessionStore,
    pub preferences: PreferenceStore,
    pub notifier: Arc<dyn NotificationDispatcher>,
    pub bookings: Arc<dyn BookingGateway>,
    pub auth: AuthConfig,
    pub floor: FloorConfig,
    pub public: PublicConfig,
}

impl AppState {
    /// Wire the service from configuration: Redis when a url is set,
    /// in-memory key-value state otherwise, seeded restaurants either way.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let kv: Arc<dyn KeyValueStore> = match &config.redis.url {
            Some(url) => Arc::new(RedisKeyValueStore::new(url).await?),
            None => {
                tracing::warn!("No Redis url configured, sessions and preferences are kept in memory");
                Arc::new(MemoryKeyValueStore::new())
            }
        };

        let seed = Seed::load(Utc::now())?;
        let accounts = Arc::new(StaffAccounts::new());
        seed.register_staff(&accounts).await?;
        tracing::info!(restaurants = seed.restaurants.len(), "Seed data loaded");

        Ok(Self {
            directory: Arc::new(RestaurantDirectory::new(seed.restaurants, EventBus::default())),
            accounts,
            sessions: SessionStore::new(kv.clone()),
            preferences: PreferenceStore::new(kv),
            notifier: Arc::new(SimulatedDispatcher::new(Duration::from_millis(
                config.notifications.simulated_delay_ms,
            ))),
            bookings: Arc::new(LoggingBookingGateway),
            auth: AuthConfig {
                secret: config.auth.jwt_secret.clone(),
                expiration: config.auth.jwt_expiration_seconds,
            },
            floor: config.floor.clone(),
            public: config.public.clone(),
        })
    }
}
