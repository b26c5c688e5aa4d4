use crate::error::DbError;
use crate::models::db_config::ConnectionOptions;
use crate::models::db_type::DatabaseType;
use crate::rdbc::connection::Connection;
use crate::rdbc::pool::Pool;
#[cfg(feature = "mysql")]
use crate::rdbc_mysql::pool::MysqlPool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;

/// Terminal disposition of a borrowed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Return the connection to the pool's idle set.
    Release,
    /// Permanently evict the connection from the pool.
    Destroy,
}

impl Disposition {
    /// A connection that surfaced a fatal error never re-enters the idle
    /// set. No error, or a non-fatal one, leaves the connection reusable.
    pub fn of(error: Option<&DbError>) -> Disposition {
        match error {
            Some(e) if e.is_fatal() => Disposition::Destroy,
            _ => Disposition::Release,
        }
    }
}

/// 事务生命周期管理器。
///
/// 从池中借出连接并以显式事务包裹，工作单元结束后保证连接要么归还池中，
/// 要么被永久剔除。每个连接同一时刻只属于一个在途事务。
pub struct TransactionProvider {
    name: String,
    options: ConnectionOptions,
    pool: RwLock<Option<Arc<dyn Pool>>>,
}

impl TransactionProvider {
    pub fn new(name: impl Into<String>, options: ConnectionOptions) -> Self {
        Self {
            name: name.into(),
            options,
            pool: RwLock::new(None),
        }
    }

    /// Build a provider over an already-constructed pool, bypassing `start`.
    /// Used to plug in a custom `Pool` implementation.
    pub fn from_pool(name: impl Into<String>, pool: Arc<dyn Pool>) -> Self {
        Self {
            name: name.into(),
            options: ConnectionOptions::default(),
            pool: RwLock::new(Some(pool)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 根据配置建立连接池。重复调用不重建（避免泄漏在途连接）。
    pub async fn start(&self) -> Result<(), DbError> {
        let mut slot = self.pool.write().await;
        if slot.is_some() {
            return Ok(());
        }
        let scheme = self.options.scheme();
        let pool: Arc<dyn Pool> = match DatabaseType::from_scheme(scheme) {
            #[cfg(feature = "mysql")]
            Some(DatabaseType::MySql) => Arc::new(MysqlPool::connect(&self.options)?),
            _ => return Err(DbError::UnsupportedDatabaseType(scheme.into())),
        };
        *slot = Some(pool);
        Ok(())
    }

    pub(crate) async fn pool(&self) -> Result<Arc<dyn Pool>, DbError> {
        self.pool
            .read()
            .await
            .clone()
            .ok_or(DbError::PoolNotInitialized)
    }

    /// Borrow a connection and open a transaction on it.
    ///
    /// An acquisition failure propagates unchanged: the failed attempt never
    /// held a connection, so there is nothing to dispose of. A BEGIN failure
    /// condemns the connection: the error is promoted to fatal, the
    /// connection destroyed, and the BEGIN error propagated.
    pub async fn begin_transaction(&self) -> Result<Arc<dyn Connection>, DbError> {
        let pool = self.pool().await?;
        let conn = pool.acquire().await?;
        match conn.begin().await {
            Ok(()) => Ok(conn),
            Err(begin_err) => {
                let begin_err = begin_err.into_fatal();
                trace!(provider = %self.name, error = %begin_err, "failed to begin transaction");
                self.release_connection(&conn, Some(&begin_err)).await;
                Err(begin_err)
            }
        }
    }

    /// Resolve the transaction. Always makes a disposition decision about
    /// the connection before returning.
    ///
    /// `should_commit` is decided by the caller: true only if the unit of
    /// work saw no error. A non-fatal COMMIT failure falls back to an
    /// explicit rollback step; the rollback's outcome governs disposition
    /// only, while the original commit error is the one surfaced.
    pub async fn commit_or_rollback(
        &self,
        conn: &Arc<dyn Connection>,
        should_commit: bool,
    ) -> Result<(), DbError> {
        if !should_commit {
            return self.rollback(conn).await;
        }
        match conn.commit().await {
            Ok(()) => {
                self.release_connection(conn, None).await;
                Ok(())
            }
            Err(commit_err) if commit_err.is_fatal() => {
                // the connection is unusable for any further command,
                // including ROLLBACK
                self.release_connection(conn, Some(&commit_err)).await;
                Err(commit_err)
            }
            Err(commit_err) => {
                if let Err(rollback_err) = self.rollback(conn).await {
                    trace!(provider = %self.name, error = %rollback_err, "compensating rollback failed");
                }
                Err(commit_err)
            }
        }
    }

    async fn rollback(&self, conn: &Arc<dyn Connection>) -> Result<(), DbError> {
        match conn.rollback().await {
            Ok(()) => {
                self.release_connection(conn, None).await;
                Ok(())
            }
            Err(rollback_err) => {
                self.release_connection(conn, Some(&rollback_err)).await;
                Err(rollback_err)
            }
        }
    }

    /// The single disposition primitive used by every transaction-ending
    /// path. Never raises; tolerates a pool that was already torn down and a
    /// connection that was already disposed.
    pub async fn release_connection(&self, conn: &Arc<dyn Connection>, error: Option<&DbError>) {
        let Some(pool) = self.pool.read().await.clone() else {
            return;
        };
        match Disposition::of(error) {
            Disposition::Destroy => {
                trace!(provider = %self.name, "Destroying fatally-errored connection.");
                pool.destroy(conn.clone()).await;
            }
            Disposition::Release => pool.release(conn.clone()).await,
        }
    }

    /// 停机：drain 连接池并清除引用。未初始化时为无错误的空操作。
    pub async fn end(&self) -> Result<(), DbError> {
        let pool = self.pool.write().await.take();
        if let Some(pool) = pool {
            trace!(provider = %self.name, "Draining the connection pool.");
            pool.drain().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_of() {
        assert_eq!(Disposition::of(None), Disposition::Release);
        let non_fatal = DbError::database("duplicate key");
        assert_eq!(Disposition::of(Some(&non_fatal)), Disposition::Release);
        let fatal = DbError::fatal("broken pipe");
        assert_eq!(Disposition::of(Some(&fatal)), Disposition::Destroy);
    }
}
