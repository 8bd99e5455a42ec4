pub mod platforms;
pub mod stream_statuses;
