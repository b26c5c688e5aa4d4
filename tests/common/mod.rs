use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use utx::error::DbError;
use utx::models::db_type::DatabaseType;
use utx::provider::TransactionProvider;
use utx::rdbc::connection::Connection;
use utx::rdbc::pool::Pool;
use utx::rdbc::value::Value;

/// Scripted result for a single command on the mock connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeed,
    FailNonFatal,
    FailFatal,
}

impl Outcome {
    fn into_result(self, cmd: &str) -> Result<(), DbError> {
        match self {
            Outcome::Succeed => Ok(()),
            Outcome::FailNonFatal => Err(DbError::database(format!("{cmd} failed"))),
            Outcome::FailFatal => Err(DbError::fatal(format!("{cmd} failed"))),
        }
    }
}

/// Mock connection recording every command issued against it.
#[derive(Debug)]
pub struct MockConnection {
    commands: Mutex<Vec<String>>,
    begin: Outcome,
    commit: Outcome,
    rollback: Outcome,
    statement: Outcome,
}

impl MockConnection {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self::scripted(
            Outcome::Succeed,
            Outcome::Succeed,
            Outcome::Succeed,
        ))
    }

    pub fn scripted(begin: Outcome, commit: Outcome, rollback: Outcome) -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            begin,
            commit,
            rollback,
            statement: Outcome::Succeed,
        }
    }

    pub fn with_statement(mut self, statement: Outcome) -> Self {
        self.statement = statement;
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn issued(&self, cmd: &str) -> bool {
        self.commands().iter().any(|c| c == cmd)
    }

    fn record(&self, cmd: &str) {
        self.commands.lock().unwrap().push(cmd.to_string());
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn query(
        &self,
        sql: &str,
        _args: &[Value],
    ) -> Result<Vec<HashMap<String, Value>>, DbError> {
        self.record(sql);
        self.statement.into_result(sql)?;
        Ok(vec![HashMap::from([("id".to_string(), Value::I64(1))])])
    }

    async fn execute(&self, sql: &str, _args: &[Value]) -> Result<u64, DbError> {
        self.record(sql);
        self.statement.into_result(sql)?;
        Ok(1)
    }

    async fn last_insert_id(&self) -> Result<u64, DbError> {
        Ok(1)
    }

    async fn begin(&self) -> Result<(), DbError> {
        self.record("BEGIN");
        self.begin.into_result("BEGIN")
    }

    async fn commit(&self) -> Result<(), DbError> {
        self.record("COMMIT");
        self.commit.into_result("COMMIT")
    }

    async fn rollback(&self) -> Result<(), DbError> {
        self.record("ROLLBACK");
        self.rollback.into_result("ROLLBACK")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Mock pool counting release/destroy calls.
pub struct MockPool {
    conn: Option<Arc<MockConnection>>,
    drained: AtomicBool,
    released: AtomicUsize,
    destroyed: AtomicUsize,
}

impl MockPool {
    pub fn new(conn: Arc<MockConnection>) -> Arc<Self> {
        Arc::new(Self {
            conn: Some(conn),
            drained: AtomicBool::new(false),
            released: AtomicUsize::new(0),
            destroyed: AtomicUsize::new(0),
        })
    }

    /// A pool with no connections to hand out.
    pub fn exhausted() -> Arc<Self> {
        Arc::new(Self {
            conn: None,
            drained: AtomicBool::new(false),
            released: AtomicUsize::new(0),
            destroyed: AtomicUsize::new(0),
        })
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub fn is_drained(&self) -> bool {
        self.drained.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Pool for MockPool {
    fn db_type(&self) -> DatabaseType {
        DatabaseType::MySql
    }

    async fn acquire(&self) -> Result<Arc<dyn Connection>, DbError> {
        if self.is_drained() {
            return Err(DbError::Connection("pool drained".to_string()));
        }
        match &self.conn {
            Some(conn) => Ok(conn.clone()),
            None => Err(DbError::Connection("no connections available".to_string())),
        }
    }

    async fn release(&self, _conn: Arc<dyn Connection>) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    async fn destroy(&self, _conn: Arc<dyn Connection>) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }

    async fn drain(&self) -> Result<(), DbError> {
        self.drained.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Provider over a mock pool with the given scripted connection.
pub fn fixture(
    begin: Outcome,
    commit: Outcome,
    rollback: Outcome,
) -> (TransactionProvider, Arc<MockConnection>, Arc<MockPool>) {
    let conn = Arc::new(MockConnection::scripted(begin, commit, rollback));
    let pool = MockPool::new(conn.clone());
    let provider = TransactionProvider::from_pool("test", pool.clone());
    (provider, conn, pool)
}
