use crate::error::DbError;
use crate::models::db_type::DatabaseType;
use crate::rdbc::connection::Connection;
use async_trait::async_trait;
use std::sync::Arc;

/// Represents a connection pool.
///
/// `release` and `destroy` are infallible by contract: disposition is the
/// last action on every transaction-ending path and must not introduce a new
/// failure mode. Both tolerate a connection that was already disposed.
#[async_trait]
pub trait Pool: Send + Sync {
    fn db_type(&self) -> DatabaseType;

    /// Borrow a connection. Fails when the pool is exhausted, the database
    /// is unreachable, or the pool has been drained.
    async fn acquire(&self) -> Result<Arc<dyn Connection>, DbError>;

    /// Return a healthy connection to the idle set.
    async fn release(&self, conn: Arc<dyn Connection>);

    /// Permanently evict a connection. It must never be re-offered by a
    /// future `acquire`.
    async fn destroy(&self, conn: Arc<dyn Connection>);

    /// Close all connections and reject further acquisition.
    async fn drain(&self) -> Result<(), DbError>;
}
