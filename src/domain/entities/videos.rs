use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::infrastructure::sqlite::schema::videos;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = videos)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VideoEntity {
    pub id: i32,
    pub user_id: i32,
    pub filename: String,
    pub original_name: String,
    /// Placeholder only. Uploaded bytes are never written anywhere.
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    pub duration: Option<i32>,
    pub file_size: Option<i64>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = videos)]
pub struct InsertVideoEntity {
    pub user_id: i32,
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub created_at: NaiveDateTime,
}
