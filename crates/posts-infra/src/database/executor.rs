//! Parameterized statement execution against the pool.

use sea_orm::{DbBackend, DbErr, FromQueryResult, Statement, Value};

use posts_core::error::RepoError;

use super::DatabasePool;

/// Runs positional-parameter statements on a [`DatabasePool`].
///
/// Values are always bound as `$1..$n`, never spliced into the SQL text.
/// Failures are logged with the statement (not its values) and surface as
/// [`RepoError`]; nothing is retried.
#[derive(Clone)]
pub struct QueryExecutor {
    pool: DatabasePool,
}

impl QueryExecutor {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Build the Postgres statement for `sql` and its positional `values`.
    pub fn statement(sql: &str, values: Vec<Value>) -> Statement {
        Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
    }

    /// Execute `sql` and decode every returned row as `T`.
    pub async fn query<T>(&self, sql: &str, values: Vec<Value>) -> Result<Vec<T>, RepoError>
    where
        T: FromQueryResult + Send,
    {
        T::find_by_statement(Self::statement(sql, values))
            .all(self.pool.connection())
            .await
            .map_err(|err| {
                tracing::error!(statement = sql, error = %err, "Database query failed");
                store_error(err)
            })
    }

    /// Execute `sql` and decode at most the first row.
    pub async fn query_one<T>(&self, sql: &str, values: Vec<Value>) -> Result<Option<T>, RepoError>
    where
        T: FromQueryResult + Send,
    {
        Ok(self.query(sql, values).await?.into_iter().next())
    }
}

fn store_error(err: DbErr) -> RepoError {
    match err {
        err @ (DbErr::ConnectionAcquire(_) | DbErr::Conn(_)) => {
            RepoError::Connection(err.to_string())
        }
        err => RepoError::Query(err.to_string()),
    }
}
