//! Checks every storage backend has to pass. Each function gets freshly created repositories.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::{
    entities::{streams::InsertStreamEntity, users::InsertUserEntity, videos::InsertVideoEntity},
    repositories::{streams::StreamRepository, users::UserRepository, videos::VideoRepository},
    value_objects::enums::stream_statuses::StreamStatus,
};

fn at(minutes: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        + Duration::minutes(minutes)
}

fn user(username: &str, email: &str) -> InsertUserEntity {
    InsertUserEntity {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        created_at: at(0),
    }
}

fn video(user_id: i32, name: &str, minutes: i64) -> InsertVideoEntity {
    InsertVideoEntity {
        user_id,
        filename: name.to_string(),
        original_name: name.to_string(),
        file_path: format!("uploads/{}", name),
        file_size: Some(1024),
        created_at: at(minutes),
    }
}

fn stream(user_id: i32, title: &str, video_id: Option<i32>, minutes: i64) -> InsertStreamEntity {
    InsertStreamEntity {
        user_id,
        title: title.to_string(),
        platform: "YouTube".to_string(),
        stream_key: "abc123".to_string(),
        video_id,
        status: StreamStatus::Pending.to_string(),
        scheduled_time: None,
        created_at: at(minutes),
    }
}

pub async fn duplicate_users_are_rejected<U: UserRepository>(users: &U) {
    let alice = users
        .create(user("alice", "alice@example.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(users.count().await.unwrap(), 1);

    let same_username = users.create(user("alice", "other@example.com")).await.unwrap();
    let same_email = users.create(user("bob", "alice@example.com")).await.unwrap();

    assert!(same_username.is_none());
    assert!(same_email.is_none());
    assert_eq!(users.count().await.unwrap(), 1);

    let found = users.find_by_username("alice".to_string()).await.unwrap().unwrap();
    assert_eq!(found.id, alice.id);
    assert_eq!(found.email, "alice@example.com");
}

pub async fn video_delete_removes_exactly_one<V: VideoRepository>(videos: &V) {
    let first = videos.create(video(1, "a.mp4", 0)).await.unwrap();
    let second = videos.create(video(1, "b.mp4", 1)).await.unwrap();
    let third = videos.create(video(1, "c.mp4", 2)).await.unwrap();

    // Someone else's video is out of reach.
    assert!(!videos.delete(2, second.id).await.unwrap());
    assert!(videos.delete(1, second.id).await.unwrap());
    assert!(!videos.delete(1, second.id).await.unwrap());

    let remaining: Vec<i32> = videos
        .list_by_user(1)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.id)
        .collect();
    assert_eq!(remaining, vec![third.id, first.id]);
    assert_eq!(videos.count_by_user(1).await.unwrap(), 2);
}

pub async fn deleting_a_video_keeps_its_streams<V, S>(videos: &V, streams: &S)
where
    V: VideoRepository,
    S: StreamRepository,
{
    let clip = videos.create(video(1, "clip.mp4", 0)).await.unwrap();
    let launch = streams
        .create(stream(1, "Launch", Some(clip.id), 1))
        .await
        .unwrap();

    assert!(videos.delete(1, clip.id).await.unwrap());

    let listed = streams.list_by_user(1, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, launch.id);
    assert_eq!(listed[0].video_id, Some(clip.id));
}

pub async fn status_moves_between_any_states<S: StreamRepository>(streams: &S) {
    let launch = streams.create(stream(1, "Launch", None, 0)).await.unwrap();
    assert_eq!(launch.status, "pending");

    for status in [
        StreamStatus::Active,
        StreamStatus::Stopped,
        StreamStatus::Active,
        StreamStatus::Active,
    ] {
        assert!(streams.update_status(1, launch.id, status).await.unwrap());
        let listed = streams.list_by_user(1, None).await.unwrap();
        assert_eq!(listed[0].status, status.to_string());
    }

    assert!(!streams.update_status(2, launch.id, StreamStatus::Stopped).await.unwrap());
    assert!(!streams.update_status(1, launch.id + 100, StreamStatus::Stopped).await.unwrap());
    assert_eq!(
        streams.count_by_user(1, Some(StreamStatus::Active)).await.unwrap(),
        1
    );
}

pub async fn streams_list_newest_first_with_limit<S: StreamRepository>(streams: &S) {
    for (minutes, title) in [(0, "first"), (2, "third"), (1, "second"), (3, "fourth")] {
        streams.create(stream(1, title, None, minutes)).await.unwrap();
    }
    streams.create(stream(2, "elsewhere", None, 9)).await.unwrap();

    let titles = |rows: Vec<crate::domain::entities::streams::StreamEntity>| {
        rows.into_iter().map(|s| s.title).collect::<Vec<_>>()
    };

    assert_eq!(
        titles(streams.list_by_user(1, None).await.unwrap()),
        vec!["fourth", "third", "second", "first"]
    );
    assert_eq!(
        titles(streams.list_by_user(1, Some(2)).await.unwrap()),
        vec!["fourth", "third"]
    );
    assert_eq!(streams.count_by_user(1, None).await.unwrap(), 4);
}

pub async fn ids_are_not_reused<V, S>(videos: &V, streams: &S)
where
    V: VideoRepository,
    S: StreamRepository,
{
    let first_video = videos.create(video(1, "a.mp4", 0)).await.unwrap();
    assert!(videos.delete(1, first_video.id).await.unwrap());
    let next_video = videos.create(video(1, "b.mp4", 1)).await.unwrap();
    assert!(next_video.id > first_video.id);

    let first_stream = streams.create(stream(1, "one", None, 0)).await.unwrap();
    assert!(streams.delete(1, first_stream.id).await.unwrap());
    let next_stream = streams.create(stream(1, "two", None, 1)).await.unwrap();
    assert!(next_stream.id > first_stream.id);
}

macro_rules! repository_behaviour_suite {
    ($backend:ident, $repositories:expr) => {
        mod $backend {
            use super::*;
            use crate::infrastructure::repository_behaviour as behaviour;

            #[tokio::test]
            async fn duplicate_users_are_rejected() {
                let (users, _, _) = $repositories;
                behaviour::duplicate_users_are_rejected(&users).await;
            }

            #[tokio::test]
            async fn video_delete_removes_exactly_one() {
                let (_, videos, _) = $repositories;
                behaviour::video_delete_removes_exactly_one(&videos).await;
            }

            #[tokio::test]
            async fn deleting_a_video_keeps_its_streams() {
                let (_, videos, streams) = $repositories;
                behaviour::deleting_a_video_keeps_its_streams(&videos, &streams).await;
            }

            #[tokio::test]
            async fn status_moves_between_any_states() {
                let (_, _, streams) = $repositories;
                behaviour::status_moves_between_any_states(&streams).await;
            }

            #[tokio::test]
            async fn streams_list_newest_first_with_limit() {
                let (_, _, streams) = $repositories;
                behaviour::streams_list_newest_first_with_limit(&streams).await;
            }

            #[tokio::test]
            async fn ids_are_not_reused() {
                let (_, videos, streams) = $repositories;
                behaviour::ids_are_not_reused(&videos, &streams).await;
            }
        }
    };
}

mod backends {
    use crate::infrastructure::{
        memory::{
            memory_store::MemoryStore,
            repositories::{streams::StreamMemory, users::UserMemory, videos::VideoMemory},
        },
        sqlite::{
            repositories::{streams::StreamSqlite, users::UserSqlite, videos::VideoSqlite},
            sqlite_connection::{IN_MEMORY_URL, establish_connection},
        },
    };
    use std::sync::Arc;

    fn memory_repositories() -> (UserMemory, VideoMemory, StreamMemory) {
        let store = Arc::new(MemoryStore::new());
        (
            UserMemory::new(Arc::clone(&store)),
            VideoMemory::new(Arc::clone(&store)),
            StreamMemory::new(Arc::clone(&store)),
        )
    }

    fn sqlite_repositories() -> (UserSqlite, VideoSqlite, StreamSqlite) {
        let db_pool = Arc::new(establish_connection(IN_MEMORY_URL, 1).unwrap());
        (
            UserSqlite::new(Arc::clone(&db_pool)),
            VideoSqlite::new(Arc::clone(&db_pool)),
            StreamSqlite::new(Arc::clone(&db_pool)),
        )
    }

    repository_behaviour_suite!(memory, memory_repositories());
    repository_behaviour_suite!(sqlite, sqlite_repositories());
}
