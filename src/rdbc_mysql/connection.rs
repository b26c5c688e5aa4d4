use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Row as MyRow};
use std::any::Any;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::error::DbError;
use crate::rdbc::connection::Connection;
use crate::rdbc::value::Value;
use crate::rdbc_mysql::value_codec::{from_mysql_value, to_mysql_value};

/// A pooled MySQL session. The inner `Conn` is taken out exactly once at
/// disposition time; a handle whose `Conn` is gone rejects further commands
/// with `ConnectionClosed`.
pub struct MysqlConnection {
    conn: Mutex<Option<Conn>>,
}

impl std::fmt::Debug for MysqlConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlConnection").finish_non_exhaustive()
    }
}

impl MysqlConnection {
    pub fn new(conn: Conn) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    /// Detach the underlying transport handle. `None` means the connection
    /// was already released or destroyed.
    pub(crate) async fn take(&self) -> Option<Conn> {
        self.conn.lock().await.take()
    }

    fn map_row(row: MyRow) -> HashMap<String, Value> {
        let mut out = HashMap::new();
        let cols = row.columns_ref();
        for i in 0..row.len() {
            let name = cols
                .get(i)
                .map(|c| c.name_str().to_string())
                .unwrap_or_else(|| i.to_string());
            if let Some(v) = row.as_ref(i) {
                out.insert(name, from_mysql_value(v));
            }
        }
        out
    }

    fn params(args: &[Value]) -> mysql_async::Params {
        if args.is_empty() {
            mysql_async::Params::Empty
        } else {
            mysql_async::Params::Positional(args.iter().map(to_mysql_value).collect())
        }
    }
}

#[async_trait]
impl Connection for MysqlConnection {
    async fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> Result<Vec<HashMap<String, Value>>, DbError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::ConnectionClosed)?;
        let rows: Vec<MyRow> = conn.exec(sql, Self::params(args)).await?;
        Ok(rows.into_iter().map(Self::map_row).collect())
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64, DbError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::ConnectionClosed)?;
        conn.exec_drop(sql, Self::params(args)).await?;
        Ok(conn.affected_rows())
    }

    async fn last_insert_id(&self) -> Result<u64, DbError> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DbError::ConnectionClosed)?;
        Ok(conn.last_insert_id().unwrap_or(0))
    }

    async fn begin(&self) -> Result<(), DbError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::ConnectionClosed)?;
        conn.query_drop("BEGIN").await?;
        Ok(())
    }

    async fn commit(&self) -> Result<(), DbError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::ConnectionClosed)?;
        conn.query_drop("COMMIT").await?;
        Ok(())
    }

    async fn rollback(&self) -> Result<(), DbError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::ConnectionClosed)?;
        conn.query_drop("ROLLBACK").await?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
