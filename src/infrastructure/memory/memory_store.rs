use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use crate::domain::entities::{streams::StreamEntity, users::UserEntity, videos::VideoEntity};

/// Process-local tables shared by the in-memory repositories. Gone on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<MemoryTables>,
}

#[derive(Debug, Default)]
pub struct MemoryTables {
    pub users: BTreeMap<i32, UserEntity>,
    pub username_index: HashMap<String, i32>,
    pub email_index: HashMap<String, i32>,
    pub videos: BTreeMap<i32, VideoEntity>,
    pub streams: BTreeMap<i32, StreamEntity>,
    sequences: Sequences,
}

#[derive(Debug, Default)]
struct Sequences {
    users: i32,
    videos: i32,
    streams: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read<R>(&self, f: impl FnOnce(&MemoryTables) -> R) -> R {
        f(&self.tables.read())
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut MemoryTables) -> R) -> R {
        f(&mut self.tables.write())
    }
}

// Ids are never reused, even after deletes, matching AUTOINCREMENT.
impl MemoryTables {
    pub fn next_user_id(&mut self) -> i32 {
        self.sequences.users += 1;
        self.sequences.users
    }

    pub fn next_video_id(&mut self) -> i32 {
        self.sequences.videos += 1;
        self.sequences.videos
    }

    pub fn next_stream_id(&mut self) -> i32 {
        self.sequences.streams += 1;
        self.sequences.streams
    }
}
