diesel::table! {
    users (id) {
        id -> Integer,
        username -> Text,
        email -> Text,
        password_hash -> Text,
        avatar_path -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    videos (id) {
        id -> Integer,
        user_id -> Integer,
        filename -> Text,
        original_name -> Text,
        file_path -> Text,
        thumbnail_path -> Nullable<Text>,
        duration -> Nullable<Integer>,
        file_size -> Nullable<BigInt>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    streams (id) {
        id -> Integer,
        user_id -> Integer,
        title -> Text,
        platform -> Text,
        stream_key -> Text,
        video_id -> Nullable<Integer>,
        status -> Text,
        scheduled_time -> Nullable<Timestamp>,
        created_at -> Timestamp,
    }
}

diesel::joinable!(streams -> users (user_id));
diesel::joinable!(streams -> videos (video_id));
diesel::joinable!(videos -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(streams, users, videos,);

/// DDL run on every fresh connection. Foreign keys are declared but not enforced, so deleting a
/// video keeps streams that point at it. Diesel switches enforcement on when it establishes a
/// connection, hence the pragma.
pub const BOOTSTRAP_SQL: &str = r#"
PRAGMA foreign_keys = OFF;

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    avatar_path TEXT,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS videos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    filename TEXT NOT NULL,
    original_name TEXT NOT NULL,
    file_path TEXT NOT NULL,
    thumbnail_path TEXT,
    duration INTEGER,
    file_size INTEGER,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users (id)
);

CREATE TABLE IF NOT EXISTS streams (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    platform TEXT NOT NULL,
    stream_key TEXT NOT NULL,
    video_id INTEGER,
    status TEXT NOT NULL DEFAULT 'pending',
    scheduled_time TIMESTAMP,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users (id),
    FOREIGN KEY (video_id) REFERENCES videos (id)
);

CREATE INDEX IF NOT EXISTS videos_user_id_idx ON videos (user_id);
CREATE INDEX IF NOT EXISTS streams_user_id_idx ON streams (user_id);
"#;
