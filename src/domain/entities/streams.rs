use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::infrastructure::sqlite::schema::streams;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = streams)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StreamEntity {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub platform: String,
    pub stream_key: String,
    pub video_id: Option<i32>,
    pub status: String,
    pub scheduled_time: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = streams)]
pub struct InsertStreamEntity {
    pub user_id: i32,
    pub title: String,
    pub platform: String,
    pub stream_key: String,
    pub video_id: Option<i32>,
    pub status: String,
    pub scheduled_time: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}
