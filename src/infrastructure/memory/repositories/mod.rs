pub mod streams;
pub mod users;
pub mod videos;
