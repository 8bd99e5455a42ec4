use serde::Serialize;

use crate::domain::value_objects::streams::StreamModel;

pub const RECENT_STREAMS_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardModel {
    pub total_videos: i64,
    pub active_streams: i64,
    pub total_streams: i64,
    pub recent_streams: Vec<StreamModel>,
}
