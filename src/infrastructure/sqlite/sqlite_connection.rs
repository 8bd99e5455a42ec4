use anyhow::Result;
use diesel::{
    SqliteConnection,
    connection::SimpleConnection,
    r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};
use tracing::debug;

use crate::infrastructure::sqlite::schema::BOOTSTRAP_SQL;

pub const IN_MEMORY_URL: &str = ":memory:";

/// Creates the tables on every new connection. For `:memory:` each connection is its own
/// database, so this is what gives the single pooled connection its schema.
#[derive(Debug, Default)]
struct BootstrapSchema;

impl CustomizeConnection<SqliteConnection, R2d2Error> for BootstrapSchema {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), R2d2Error> {
        conn.batch_execute(BOOTSTRAP_SQL)
            .map_err(R2d2Error::QueryError)?;
        Ok(())
    }
}

pub type SqlitePoolSquad = Pool<ConnectionManager<SqliteConnection>>;

pub fn establish_connection(database_url: &str, max_connections: u32) -> Result<SqlitePoolSquad> {
    let in_memory = database_url == IN_MEMORY_URL;
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);

    // An in-memory database lives and dies with its connection: keep exactly one, forever.
    let builder = if in_memory {
        Pool::builder()
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        Pool::builder().max_size(max_connections)
    };

    let pool = builder
        .connection_customizer(Box::new(BootstrapSchema))
        .build(manager)?;

    debug!(in_memory, "sqlite: pool established");
    Ok(pool)
}
