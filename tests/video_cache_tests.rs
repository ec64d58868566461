//! Integration tests for the per-owner video snapshot cache.
//!
//! Each test runs against its own temporary SQLite file and a manual clock.

use chrono::{TimeDelta, TimeZone, Utc};
use insight::db::{CacheError, Store};
use insight::domain::OwnerId;
use insight::domain::freshness::ManualClock;
use insight::entities::users;
use insight::models::owner::NewOwner;
use insight::models::video::VideoRecord;
use sea_orm::{ActiveModelTrait, Set};
use std::sync::Arc;

async fn setup() -> (Store, ManualClock) {
    let db_path =
        std::env::temp_dir().join(format!("insight-video-test-{}.db", uuid::Uuid::new_v4()));
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());

    let store = Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("Failed to create store")
        .with_clock(Arc::new(clock.clone()));

    (store, clock)
}

async fn owner_with_id(store: &Store, id: i32) -> OwnerId {
    users::ActiveModel {
        id: Set(id),
        email: Set(format!("owner{id}@example.com")),
        channel_id: Set(Some(format!("UC{id}"))),
        channel_name: Set(None),
        created_at: Set("2025-06-01T00:00:00.000000Z".to_string()),
    }
    .insert(&store.conn)
    .await
    .expect("Failed to insert owner");
    OwnerId::new(id)
}

fn video(id: &str, published_at: &str) -> VideoRecord {
    VideoRecord {
        video_id: id.to_string(),
        title: format!("Video {id}"),
        thumbnail_url: format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"),
        published_at: published_at.to_string(),
        view_count: 1200,
        comment_count: 14,
        like_count: 88,
        duration: "PT4M13S".to_string(),
        has_captions: id.ends_with('1'),
    }
}

#[tokio::test]
async fn test_refresh_then_get_fresh_returns_newest_first() {
    let (store, _clock) = setup().await;
    let owner = owner_with_id(&store, 7).await;

    let v1 = video("v1", "2025-05-01T10:00:00Z");
    let v2 = video("v2", "2025-05-20T10:00:00Z");
    store
        .refresh_videos(owner, &[v1.clone(), v2.clone()])
        .await
        .unwrap();

    let snapshot = store
        .get_fresh_videos(owner, TimeDelta::hours(1))
        .await
        .unwrap()
        .expect("snapshot should be fresh");

    assert_eq!(snapshot.videos, vec![v2, v1]);
}

#[tokio::test]
async fn test_refresh_replaces_previous_snapshot() {
    let (store, _clock) = setup().await;
    let owner = owner_with_id(&store, 7).await;

    store
        .refresh_videos(
            owner,
            &[
                video("v1", "2025-05-01T10:00:00Z"),
                video("v2", "2025-05-20T10:00:00Z"),
            ],
        )
        .await
        .unwrap();

    let v3 = video("v3", "2025-05-25T10:00:00Z");
    store
        .refresh_videos(owner, std::slice::from_ref(&v3))
        .await
        .unwrap();

    let snapshot = store
        .get_fresh_videos(owner, TimeDelta::hours(1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(snapshot.videos, vec![v3]);
    assert_eq!(store.cached_video_count(owner).await.unwrap(), 1);
}

#[tokio::test]
async fn test_snapshot_goes_stale_after_max_age() {
    let (store, clock) = setup().await;
    let owner = owner_with_id(&store, 3).await;
    let videos = vec![video("a1", "2025-05-01T00:00:00Z")];

    store.refresh_videos(owner, &videos).await.unwrap();

    clock.advance(TimeDelta::minutes(59));
    assert!(
        store
            .get_fresh_videos(owner, TimeDelta::hours(1))
            .await
            .unwrap()
            .is_some()
    );

    clock.advance(TimeDelta::minutes(1));
    assert!(
        store
            .get_fresh_videos(owner, TimeDelta::hours(1))
            .await
            .unwrap()
            .is_none()
    );

    // The explicit accessor still hands out the expired snapshot.
    let stale = store.get_any_videos(owner).await.unwrap().unwrap();
    assert_eq!(stale.videos, videos);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_snapshot() {
    let (store, _clock) = setup().await;
    let owner = owner_with_id(&store, 7).await;

    let before = vec![
        video("v2", "2025-05-20T10:00:00Z"),
        video("v1", "2025-05-01T10:00:00Z"),
    ];
    store.refresh_videos(owner, &before).await.unwrap();

    // The duplicate id makes the bulk insert fail after the delete has run.
    let broken = vec![
        video("v3", "2025-05-25T10:00:00Z"),
        video("v3", "2025-05-26T10:00:00Z"),
    ];
    let err = store.refresh_videos(owner, &broken).await.unwrap_err();
    assert!(err.is_storage(), "unexpected error: {err}");

    let snapshot = store
        .get_fresh_videos(owner, TimeDelta::hours(1))
        .await
        .unwrap()
        .expect("previous snapshot must survive");
    assert_eq!(snapshot.videos, before);
    assert_eq!(store.cached_video_count(owner).await.unwrap(), 2);
}

#[tokio::test]
async fn test_refresh_for_unknown_owner_is_rejected() {
    let (store, _clock) = setup().await;

    let err = store
        .refresh_videos(OwnerId::new(99), &[video("v1", "2025-05-01T10:00:00Z")])
        .await
        .unwrap_err();

    assert!(matches!(err, CacheError::OwnerNotFound(id) if id == OwnerId::new(99)));
    assert_eq!(store.cached_video_count(OwnerId::new(99)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_refresh_clears_snapshot() {
    let (store, _clock) = setup().await;
    let owner = owner_with_id(&store, 5).await;

    store
        .refresh_videos(owner, &[video("v1", "2025-05-01T10:00:00Z")])
        .await
        .unwrap();
    store.refresh_videos(owner, &[]).await.unwrap();

    assert_eq!(store.cached_video_count(owner).await.unwrap(), 0);
    assert!(
        store
            .get_fresh_videos(owner, TimeDelta::hours(24))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_snapshots_are_scoped_per_owner() {
    let (store, _clock) = setup().await;
    let alice = owner_with_id(&store, 1).await;
    let bob = owner_with_id(&store, 2).await;

    store
        .refresh_videos(alice, &[video("a1", "2025-05-01T10:00:00Z")])
        .await
        .unwrap();

    assert!(
        store
            .get_fresh_videos(bob, TimeDelta::hours(24))
            .await
            .unwrap()
            .is_none()
    );

    store
        .refresh_videos(bob, &[video("b1", "2025-05-02T10:00:00Z")])
        .await
        .unwrap();

    let alice_videos = store
        .get_fresh_videos(alice, TimeDelta::hours(24))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alice_videos.videos[0].video_id, "a1");
    assert_eq!(alice_videos.len(), 1);
}

#[tokio::test]
async fn test_removing_owner_purges_cached_videos() {
    let (store, _clock) = setup().await;
    let owner = store
        .create_owner(&NewOwner {
            email: "creator@example.com".to_string(),
            channel_id: Some("UCcreator".to_string()),
            channel_name: Some("Creator".to_string()),
        })
        .await
        .unwrap();

    store
        .refresh_videos(owner.id, &[video("v1", "2025-05-01T10:00:00Z")])
        .await
        .unwrap();

    assert!(store.remove_owner(owner.id).await.unwrap());
    assert_eq!(store.cached_video_count(owner.id).await.unwrap(), 0);
    assert!(store.get_owner(owner.id).await.unwrap().is_none());
    assert!(!store.remove_owner(owner.id).await.unwrap());
}

#[tokio::test]
async fn test_switching_channel_drops_snapshot() {
    let (store, _clock) = setup().await;
    let owner = owner_with_id(&store, 4).await;

    store
        .refresh_videos(owner, &[video("v1", "2025-05-01T10:00:00Z")])
        .await
        .unwrap();

    // Same channel again keeps the snapshot.
    store.connect_channel(owner, "UC4", None).await.unwrap();
    assert_eq!(store.cached_video_count(owner).await.unwrap(), 1);

    store
        .connect_channel(owner, "UCother", Some("Other"))
        .await
        .unwrap();
    assert_eq!(store.cached_video_count(owner).await.unwrap(), 0);

    let updated = store.get_owner(owner).await.unwrap().unwrap();
    assert_eq!(updated.channel_id.as_deref(), Some("UCother"));
    assert_eq!(updated.channel_name.as_deref(), Some("Other"));
}

fn many_videos(n: usize) -> Vec<VideoRecord> {
    (0..n)
        .map(|i| {
            video(
                &format!("vid{i:05}"),
                &format!("2025-05-01T{:02}:{:02}:00Z", (i / 60) % 24, i % 60),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_refresh_with_thousands_of_videos() {
    let (store, _clock) = setup().await;
    let owner = owner_with_id(&store, 11).await;

    store
        .refresh_videos(owner, &many_videos(4000))
        .await
        .unwrap();
    assert_eq!(store.cached_video_count(owner).await.unwrap(), 4000);

    store.refresh_videos(owner, &many_videos(2500)).await.unwrap();
    assert_eq!(store.cached_video_count(owner).await.unwrap(), 2500);

    let snapshot = store
        .get_fresh_videos(owner, TimeDelta::hours(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.len(), 2500);
}

#[tokio::test]
async fn test_failure_in_later_batch_rolls_back_earlier_batches() {
    let (store, _clock) = setup().await;
    let owner = owner_with_id(&store, 12).await;

    let before = vec![video("keep1", "2025-05-01T10:00:00Z")];
    store.refresh_videos(owner, &before).await.unwrap();

    let mut broken = many_videos(1000);
    broken[900] = broken[3].clone();
    let err = store.refresh_videos(owner, &broken).await.unwrap_err();
    assert!(err.is_storage(), "unexpected error: {err}");

    let snapshot = store.get_any_videos(owner).await.unwrap().unwrap();
    assert_eq!(snapshot.videos, before);
}
