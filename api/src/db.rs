use crate::config::Config;
use crate::errors::ApiError;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::PgConnection;

pub type ConnectionPool = Pool<ConnectionManager<PgConnection>>;
pub type Connection = PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    pub fn from_config(config: &Config) -> Database {
        let manager = ConnectionManager::<PgConnection>::new(config.database_url.clone());
        let pool = Pool::builder()
            .max_size(config.database_pool_size)
            .build(manager)
            .expect("Failed to create connection pool");
        Database { pool }
    }

    pub fn get_connection(&self) -> Result<Connection, ApiError> {
        Ok(self.pool.get()?)
    }
}
