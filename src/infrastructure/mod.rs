pub mod axum_http;
pub mod memory;
pub mod sqlite;

#[cfg(test)]
mod repository_behaviour;
