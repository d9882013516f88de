pub mod models;
pub mod schema;
pub mod store;

use crate::config::DatabaseConfig;
use deadpool::managed::BuildError;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

pub type DbPool = deadpool::managed::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

pub fn create_pool(config: &DatabaseConfig) -> Result<DbPool, BuildError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);
    Pool::builder(manager)
        .max_size(config.max_connections)
        .build()
}
