use crate::error::DbError;
use crate::models::db_config::ConnectionOptions;
use crate::models::db_type::DatabaseType;
use crate::rdbc::connection::Connection;
use crate::rdbc::pool::Pool;
use crate::rdbc_mysql::connection::MysqlConnection;
use async_trait::async_trait;
use mysql_async::Pool as MySqlPoolInternal;
use mysql_async::{Opts, OptsBuilder, PoolConstraints, PoolOpts};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// `Pool` over the mysql_async connection pool.
///
/// Releasing hands the detached `Conn` back to the driver pool; destroying
/// hard-closes it so it is never re-offered.
pub struct MysqlPool {
    pool: MySqlPoolInternal,
}

impl MysqlPool {
    pub fn connect(options: &ConnectionOptions) -> Result<Self, DbError> {
        let mut builder = match &options.url {
            Some(url) => {
                let opts =
                    Opts::from_url(url).map_err(|e| DbError::InvalidDatabaseUrl(e.to_string()))?;
                OptsBuilder::from_opts(opts)
            }
            None => OptsBuilder::default()
                .ip_or_hostname(options.host.clone())
                .tcp_port(options.port)
                .user(Some(options.user.clone()))
                .pass(Some(options.password.clone()))
                .db_name(Some(options.database.clone())),
        };

        let constraints = PoolConstraints::new(
            options.max_idle_conns as usize,
            options.max_open_conns as usize,
        )
        .ok_or_else(|| DbError::General("Invalid pool constraints: idle > open".to_string()))?;

        let mut pool_opts = PoolOpts::default().with_constraints(constraints);
        if options.max_lifetime > 0 {
            pool_opts =
                pool_opts.with_inactive_connection_ttl(Duration::from_secs(options.max_lifetime));
        }
        builder = builder.pool_opts(pool_opts);

        Ok(Self {
            pool: MySqlPoolInternal::new(builder),
        })
    }

    fn backend(conn: &Arc<dyn Connection>) -> Option<&MysqlConnection> {
        conn.as_any().downcast_ref::<MysqlConnection>()
    }
}

#[async_trait]
impl Pool for MysqlPool {
    fn db_type(&self) -> DatabaseType {
        DatabaseType::MySql
    }

    async fn acquire(&self) -> Result<Arc<dyn Connection>, DbError> {
        let conn = self
            .pool
            .get_conn()
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;
        Ok(Arc::new(MysqlConnection::new(conn)))
    }

    async fn release(&self, conn: Arc<dyn Connection>) {
        // dropping the detached Conn returns it to the driver's idle set;
        // an already-disposed handle detaches to None and is ignored
        if let Some(backend) = Self::backend(&conn) {
            if let Some(inner) = backend.take().await {
                drop(inner);
            }
        }
    }

    async fn destroy(&self, conn: Arc<dyn Connection>) {
        if let Some(backend) = Self::backend(&conn) {
            if let Some(inner) = backend.take().await {
                if let Err(e) = inner.disconnect().await {
                    warn!(error = %e, "error while destroying connection");
                }
            }
        }
    }

    async fn drain(&self) -> Result<(), DbError> {
        self.pool.clone().disconnect().await?;
        Ok(())
    }
}
