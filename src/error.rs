use thiserror::Error;

/// Represents errors that can occur in the RDBC module.
///
/// Driver command errors carry a fatal marker: fatal means the connection's
/// transport is broken and the connection must be evicted from the pool
/// instead of returned to it.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("General error: {0}")]
    General(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Database error: {message}")]
    Database { message: String, fatal: bool },
    #[error("Pool not initialized")]
    PoolNotInitialized,
    #[error("Connection is closed")]
    ConnectionClosed,
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),
}

impl DbError {
    pub fn database(message: impl Into<String>) -> Self {
        DbError::Database {
            message: message.into(),
            fatal: false,
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        DbError::Database {
            message: message.into(),
            fatal: true,
        }
    }

    /// Whether the connection that surfaced this error is still usable.
    /// Only fatal driver errors condemn the connection.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DbError::Database { fatal: true, .. })
    }

    /// Promote this error to a fatal one. A connection that cannot start a
    /// transaction is assumed not reusable, whatever the driver reported.
    pub fn into_fatal(self) -> Self {
        match self {
            DbError::Database { message, .. } => DbError::Database {
                message,
                fatal: true,
            },
            other => DbError::Database {
                message: other.to_string(),
                fatal: true,
            },
        }
    }
}

#[cfg(feature = "mysql")]
impl From<mysql_async::Error> for DbError {
    fn from(e: mysql_async::Error) -> Self {
        // Io and Driver errors mean the transport is gone; Server errors are
        // statement-level and leave the connection usable.
        let fatal = matches!(
            e,
            mysql_async::Error::Io(_) | mysql_async::Error::Driver(_)
        );
        DbError::Database {
            message: e.to_string(),
            fatal,
        }
    }
}
