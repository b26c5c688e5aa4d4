#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    MySql,
    Postgres,
    Sqlite,
}

impl DatabaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::MySql => "mysql",
            DatabaseType::Postgres => "postgres",
            DatabaseType::Sqlite => "sqlite",
        }
    }

    /// Resolve a database type from a connection URL scheme.
    pub fn from_scheme(scheme: &str) -> Option<DatabaseType> {
        match scheme {
            "mysql" => Some(DatabaseType::MySql),
            "postgres" | "postgresql" => Some(DatabaseType::Postgres),
            "sqlite" => Some(DatabaseType::Sqlite),
            _ => None,
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
