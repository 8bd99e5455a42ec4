pub mod dashboard;
pub mod enums;
pub mod streams;
pub mod users;
pub mod videos;
