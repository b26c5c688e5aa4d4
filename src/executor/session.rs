use crate::error::DbError;
use crate::provider::TransactionProvider;
use crate::rdbc::connection::Connection;
use crate::rdbc::value::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// 数据库客户端，封装了事务生命周期操作
pub struct Session {
    provider: Arc<TransactionProvider>,
}

impl Session {
    pub fn new(provider: Arc<TransactionProvider>) -> Self {
        Self { provider }
    }

    /// Run a unit of work inside a transaction.
    ///
    /// The work's own result decides the outcome: `Ok` commits, `Err` rolls
    /// back. When the transaction cannot be exited cleanly (COMMIT or
    /// ROLLBACK failed), that failure is surfaced as the unit of work's own
    /// failure; a suppressed work error is logged at debug level.
    pub async fn transaction<F, Fut, T>(&self, work: F) -> Result<T, DbError>
    where
        F: FnOnce(Arc<dyn Connection>) -> Fut,
        Fut: Future<Output = Result<T, DbError>>,
    {
        let conn = self.provider.begin_transaction().await?;
        let start = Instant::now();
        let result = work(conn.clone()).await;
        let should_commit = result.is_ok();
        let exit = self.provider.commit_or_rollback(&conn, should_commit).await;
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            committed = should_commit && exit.is_ok(),
            "transaction finished"
        );
        match exit {
            Ok(()) => result,
            Err(exit_err) => {
                if let Err(work_err) = &result {
                    debug!(error = %work_err, "unit of work had failed before transaction exit");
                }
                Err(exit_err)
            }
        }
    }

    /// 单条语句查询：借出连接，执行后按错误分类归还或销毁
    pub async fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> Result<Vec<HashMap<String, Value>>, DbError> {
        let pool = self.provider.pool().await?;
        let conn = pool.acquire().await?;
        let start = Instant::now();
        let result = conn.query(sql, args).await;
        self.provider
            .release_connection(&conn, result.as_ref().err())
            .await;
        let rows = result.as_ref().map(|r| r.len()).unwrap_or(0);
        debug!(sql, elapsed_ms = start.elapsed().as_millis() as u64, rows, "query");
        result
    }

    /// 单条语句执行，返回受影响行数
    pub async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64, DbError> {
        let pool = self.provider.pool().await?;
        let conn = pool.acquire().await?;
        let start = Instant::now();
        let result = conn.execute(sql, args).await;
        self.provider
            .release_connection(&conn, result.as_ref().err())
            .await;
        let affected = result.as_ref().ok().copied().unwrap_or(0);
        debug!(sql, elapsed_ms = start.elapsed().as_millis() as u64, affected, "execute");
        result
    }
}
