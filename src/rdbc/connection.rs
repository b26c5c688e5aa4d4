use crate::error::DbError;
use crate::rdbc::value::Value;
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;

/// A live database session, borrowed from a pool for the duration of one
/// transaction. Commands run sequentially; the caller must not issue a
/// second command while one is outstanding.
#[async_trait]
pub trait Connection: Send + Sync + std::fmt::Debug {
    async fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> Result<Vec<HashMap<String, Value>>, DbError>;

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64, DbError>;

    async fn last_insert_id(&self) -> Result<u64, DbError>;

    // ---------- transaction ----------
    async fn begin(&self) -> Result<(), DbError>;
    async fn commit(&self) -> Result<(), DbError>;
    async fn rollback(&self) -> Result<(), DbError>;

    /// Backend pools downcast through this to reclaim the underlying
    /// transport handle on release/destroy.
    fn as_any(&self) -> &dyn Any;
}
