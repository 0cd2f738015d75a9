use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::db;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config).await?;
        let clock = Arc::new(SystemClock) as Arc<dyn Clock>;

        Ok(Self::from_parts(db, config, clock))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>, clock: Arc<dyn Clock>) -> Self {
        Self { db, config, clock }
    }

    #[cfg(test)]
    pub async fn fake(now: time::OffsetDateTime) -> Self {
        use crate::clock::FixedClock;

        let db = db::test_pool().await;
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
        });
        let clock = Arc::new(FixedClock(now)) as Arc<dyn Clock>;
        Self::from_parts(db, config, clock)
    }
}
