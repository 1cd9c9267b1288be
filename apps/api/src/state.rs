use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::matching::scorer::MatchScorer;
use crate::matching::store::SwipeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Resume object storage (MinIO locally, S3 in production).
    pub s3: S3Client,
    pub config: Config,
    /// Pluggable match scorer. Default: WeightedScorer.
    pub scorer: Arc<dyn MatchScorer>,
    /// Backend for the swipe workflow. Default: PgSwipeStore over `db`.
    pub swipes: Arc<dyn SwipeStore>,
}

#[cfg(test)]
impl AppState {
    /// State with a lazily-connected pool and an offline S3 client, so router
    /// tests run without Postgres or MinIO.
    pub fn for_tests(swipes: Arc<dyn SwipeStore>) -> Self {
        use aws_sdk_s3::config::{BehaviorVersion, Region};
        use sqlx::postgres::PgPoolOptions;

        let config = Config::for_tests();
        let db = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_lazy(&config.database_url)
            .expect("test database url is valid");
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();

        AppState {
            db,
            s3: S3Client::from_conf(s3_config),
            config,
            scorer: Arc::new(crate::matching::scorer::WeightedScorer::default()),
            swipes,
        }
    }
}
