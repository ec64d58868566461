use crate::db::error::{CacheError, CacheResult};
use crate::domain::OwnerId;
use crate::domain::freshness::{Clock, format_timestamp};
use crate::entities::{analyses, cached_videos, prelude::*, users};
use crate::models::owner::{NewOwner, Owner};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::info;

impl From<users::Model> for Owner {
    fn from(model: users::Model) -> Self {
        Self {
            id: OwnerId::new(model.id),
            email: model.email,
            channel_id: model.channel_id,
            channel_name: model.channel_name,
            created_at: model.created_at,
        }
    }
}

/// Accounts that own cached data.
pub struct UserRepository {
    conn: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl UserRepository {
    #[must_use]
    pub fn new(conn: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { conn, clock }
    }

    pub async fn create(&self, owner: &NewOwner) -> CacheResult<Owner> {
        let model = users::ActiveModel {
            email: Set(owner.email.clone()),
            channel_id: Set(owner.channel_id.clone()),
            channel_name: Set(owner.channel_name.clone()),
            created_at: Set(format_timestamp(self.clock.now())),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        info!(owner_id = model.id, "Owner created");
        Ok(model.into())
    }

    pub async fn get(&self, owner_id: OwnerId) -> CacheResult<Option<Owner>> {
        let user = Users::find_by_id(owner_id.value()).one(&self.conn).await?;
        Ok(user.map(Owner::from))
    }

    pub async fn get_by_email(&self, email: &str) -> CacheResult<Option<Owner>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await?;
        Ok(user.map(Owner::from))
    }

    pub async fn list(&self) -> CacheResult<Vec<Owner>> {
        let rows = Users::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Owner::from).collect())
    }

    /// Points the owner at a different channel. The cached video snapshot
    /// belongs to the old channel, so it is dropped in the same transaction.
    pub async fn connect_channel(
        &self,
        owner_id: OwnerId,
        channel_id: &str,
        channel_name: Option<&str>,
    ) -> CacheResult<()> {
        let txn = self.conn.begin().await?;

        let user = Users::find_by_id(owner_id.value())
            .one(&txn)
            .await?
            .ok_or(CacheError::OwnerNotFound(owner_id))?;

        let changed = user.channel_id.as_deref() != Some(channel_id);

        let mut active: users::ActiveModel = user.into();
        active.channel_id = Set(Some(channel_id.to_string()));
        active.channel_name = Set(channel_name.map(str::to_string));
        active.update(&txn).await?;

        if changed {
            CachedVideos::delete_many()
                .filter(cached_videos::Column::OwnerId.eq(owner_id.value()))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        info!(owner_id = %owner_id, channel_id, "Channel connected");
        Ok(())
    }

    /// Deletes the owner together with every cached row it owns.
    pub async fn remove(&self, owner_id: OwnerId) -> CacheResult<bool> {
        let txn = self.conn.begin().await?;

        let videos = CachedVideos::delete_many()
            .filter(cached_videos::Column::OwnerId.eq(owner_id.value()))
            .exec(&txn)
            .await?
            .rows_affected;

        let analyses = Analyses::delete_many()
            .filter(analyses::Column::OwnerId.eq(owner_id.value()))
            .exec(&txn)
            .await?
            .rows_affected;

        let removed = Users::delete_by_id(owner_id.value())
            .exec(&txn)
            .await?
            .rows_affected
            > 0;

        txn.commit().await?;

        if removed {
            info!(
                owner_id = %owner_id,
                purged_videos = videos,
                purged_analyses = analyses,
                "Owner removed"
            );
        }
        Ok(removed)
    }
}
