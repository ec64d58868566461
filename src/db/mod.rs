use crate::domain::OwnerId;
use crate::domain::freshness::{Clock, SystemClock};
use crate::models::analysis::{
    AnalysisKey, AnalysisStats, AnalysisSummary, CachedAnalysis, NewAnalysis,
};
use crate::models::owner::{NewOwner, Owner};
use crate::models::video::{VideoRecord, VideoSnapshot};
use anyhow::Result;
use chrono::TimeDelta;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub mod error;
pub mod migrator;
pub mod repositories;

pub use error::{CacheError, CacheResult};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self {
            conn,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the clock every freshness decision and timestamp comes from.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone(), self.clock())
    }

    fn video_cache_repo(&self) -> repositories::video_cache::VideoCacheRepository {
        repositories::video_cache::VideoCacheRepository::new(self.conn.clone(), self.clock())
    }

    fn analysis_cache_repo(&self) -> repositories::analysis_cache::AnalysisCacheRepository {
        repositories::analysis_cache::AnalysisCacheRepository::new(self.conn.clone(), self.clock())
    }

    // ========== Owners ==========

    pub async fn create_owner(&self, owner: &NewOwner) -> CacheResult<Owner> {
        self.user_repo().create(owner).await
    }

    pub async fn get_owner(&self, owner_id: OwnerId) -> CacheResult<Option<Owner>> {
        self.user_repo().get(owner_id).await
    }

    pub async fn get_owner_by_email(&self, email: &str) -> CacheResult<Option<Owner>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn list_owners(&self) -> CacheResult<Vec<Owner>> {
        self.user_repo().list().await
    }

    pub async fn connect_channel(
        &self,
        owner_id: OwnerId,
        channel_id: &str,
        channel_name: Option<&str>,
    ) -> CacheResult<()> {
        self.user_repo()
            .connect_channel(owner_id, channel_id, channel_name)
            .await
    }

    pub async fn remove_owner(&self, owner_id: OwnerId) -> CacheResult<bool> {
        self.user_repo().remove(owner_id).await
    }

    // ========== Video cache ==========

    pub async fn refresh_videos(
        &self,
        owner_id: OwnerId,
        videos: &[VideoRecord],
    ) -> CacheResult<()> {
        self.video_cache_repo().refresh(owner_id, videos).await
    }

    pub async fn get_fresh_videos(
        &self,
        owner_id: OwnerId,
        max_age: TimeDelta,
    ) -> CacheResult<Option<VideoSnapshot>> {
        self.video_cache_repo().get_fresh(owner_id, max_age).await
    }

    pub async fn get_any_videos(&self, owner_id: OwnerId) -> CacheResult<Option<VideoSnapshot>> {
        self.video_cache_repo().get_any(owner_id).await
    }

    pub async fn cached_video_count(&self, owner_id: OwnerId) -> CacheResult<u64> {
        self.video_cache_repo().count(owner_id).await
    }

    // ========== Analysis cache ==========

    pub async fn store_analysis(
        &self,
        owner_id: OwnerId,
        analysis: &NewAnalysis,
    ) -> CacheResult<i64> {
        self.analysis_cache_repo().store(owner_id, analysis).await
    }

    pub async fn get_fresh_analysis(
        &self,
        owner_id: OwnerId,
        key: &AnalysisKey,
        max_age: TimeDelta,
    ) -> CacheResult<Option<CachedAnalysis>> {
        self.analysis_cache_repo()
            .get_fresh(owner_id, key, max_age)
            .await
    }

    pub async fn get_latest_analysis(
        &self,
        owner_id: OwnerId,
        key: &AnalysisKey,
    ) -> CacheResult<Option<CachedAnalysis>> {
        self.analysis_cache_repo().get_latest(owner_id, key).await
    }

    pub async fn recent_analyses(
        &self,
        owner_id: OwnerId,
        limit: u64,
    ) -> CacheResult<Vec<AnalysisSummary>> {
        self.analysis_cache_repo().recent(owner_id, limit).await
    }

    pub async fn analysis_stats(&self, owner_id: OwnerId) -> CacheResult<AnalysisStats> {
        self.analysis_cache_repo().stats(owner_id).await
    }
}
