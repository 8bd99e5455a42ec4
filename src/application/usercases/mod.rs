pub mod account_settings;
pub mod authentication;
pub mod dashboard;
pub mod streams;
pub mod videos;
