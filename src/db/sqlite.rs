// Fleetd
// Copyright 2024 The Fleetd Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Common utilities to interact with an SQLite database.

use crate::db::{Db, DbError, DbResult, Executor, TxExecutor};
use async_trait::async_trait;
use log::warn;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{SqliteConnection, Transaction};
use std::str::FromStr;
use time::OffsetDateTime;

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::RowNotFound => DbError::NotFound,
        e if e.to_string().contains("FOREIGN KEY constraint failed") => DbError::NotFound,
        e if e.to_string().contains("UNIQUE constraint failed") => DbError::AlreadyExists,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Creates a new connection and sets the database schema.
///
/// The pool is constrained to a single connection: an in-memory database exists per connection,
/// so allowing more than one would hand out empty databases to some callers.
pub async fn connect(conn_str: &str) -> DbResult<SqliteDb> {
    let options = SqliteConnectOptions::from_str(conn_str)
        .map_err(map_sqlx_error)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)?;
    Ok(SqliteDb { pool })
}

/// A generic database executor implementation for SQLite.
#[derive(Debug)]
pub enum SqliteExecutor {
    /// An executor backed by a pool connection.
    PoolExec(PoolConnection<Sqlite>),

    /// An executor backed by a transaction.
    TxExec(Transaction<'static, Sqlite>),
}

impl SqliteExecutor {
    /// Returns the raw connection backing this executor for use in `sqlx` operations.
    pub(crate) fn conn(&mut self) -> &mut SqliteConnection {
        match self {
            SqliteExecutor::PoolExec(conn) => conn,
            SqliteExecutor::TxExec(tx) => tx,
        }
    }

    /// Commits the transaction if this executor is backed by one.
    ///
    /// Calling this on a non-transaction-based executor results in a panic.
    pub(super) async fn commit(self) -> DbResult<()> {
        match self {
            SqliteExecutor::PoolExec(_) => unreachable!("Do not call commit on direct executors"),
            SqliteExecutor::TxExec(tx) => tx.commit().await.map_err(map_sqlx_error),
        }
    }
}

/// A database instance backed by an SQLite database.
pub struct SqliteDb {
    /// Shared SQLite connection pool.  This is a cloneable type that all concurrent
    /// transactions can use concurrently.
    pool: SqlitePool,
}

impl Drop for SqliteDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

#[async_trait]
impl Db for SqliteDb {
    async fn ex(&self) -> DbResult<Executor> {
        let conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        Ok(Executor::Sqlite(SqliteExecutor::PoolExec(conn)))
    }

    async fn begin(&self) -> DbResult<TxExecutor> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(TxExecutor(Executor::Sqlite(SqliteExecutor::TxExec(tx))))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema.
pub async fn run_schema(e: &mut SqliteExecutor, schema: &str) -> DbResult<()> {
    sqlx::raw_sql(schema).execute(e.conn()).await.map_err(map_sqlx_error)?;
    Ok(())
}

/// Converts a timestamp as extracted from the database into an `OffsetDateTime`.
///
/// The input parameters must both be positive.  The reason why their types are `i64`s instead of
/// the `u64` you would expect is because the numeric types exposed by sqlx and SQLite are all
/// signed.  We could simply cast the types and accept negative representations in the database,
/// but that would pose difficulties when attempting to compare timestamps via relation operators
/// in SQL queries.
pub(crate) fn build_timestamp(timestamp_sec: i64, timestamp_nsec: i64) -> DbResult<OffsetDateTime> {
    if timestamp_sec < 0 || timestamp_nsec < 0 {
        return Err(DbError::DataIntegrityError(format!(
            "Timestamp cannot have negative quantities: sec={}, nsec={}",
            timestamp_sec, timestamp_nsec
        )));
    }

    match OffsetDateTime::from_unix_timestamp_nanos(
        (i128::from(timestamp_sec) * 1_000_000_000) + (i128::from(timestamp_nsec)),
    ) {
        Ok(timestamp) => Ok(timestamp),
        Err(e) => Err(DbError::DataIntegrityError(format!("Invalid timestamp: {}", e))),
    }
}

/// Converts a timestamp into the seconds and nanoseconds pair needed by the database.
///
/// The timestamp must be positive because `build_timestamp` also expects it to be positive when
/// recovering its values from the database.
pub(crate) fn unpack_timestamp(ts: OffsetDateTime) -> (i64, i64) {
    let nanos = ts.unix_timestamp_nanos();
    assert!(nanos >= 0, "Cannot store a negative timestamp into the database");
    let sec = i64::try_from(nanos / 1_000_000_000).expect("Must have fit");
    let nsec = i64::try_from(nanos % 1_000_000_000).expect("Must have fit");
    (sec, nsec)
}


#[cfg(test)]
mod tests {
    use super::testutils::*;
    use super::*;
    use sqlx::Row;

    /// Runs a `query` on `ex` that fetches a single row with an `i64` value on `column` and
    /// returns that value.
    async fn query_i64(ex: &mut Executor, column: &str, query: &str) -> i64 {
        match ex {
            Executor::Sqlite(ex) => {
                let row = sqlx::query(query).fetch_one(ex.conn()).await.unwrap();
                row.try_get(column).unwrap()
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    /// Runs a `query` on `ex` and does not care about its results.
    async fn exec(ex: &mut Executor, query: &str) {
        match ex {
            Executor::Sqlite(ex) => {
                sqlx::query(query).execute(ex.conn()).await.unwrap();
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_direct_execution() {
        let db = setup().await;
        exec(&mut db.ex().await.unwrap(), "CREATE TABLE test (i INTEGER)").await;
        exec(&mut db.ex().await.unwrap(), "INSERT INTO test (i) VALUES (3)").await;
        assert_eq!(
            1,
            query_i64(
                &mut db.ex().await.unwrap(),
                "count",
                "SELECT COUNT(*) AS count FROM test"
            )
            .await
        );
        db.close().await;
    }

    #[tokio::test]
    async fn test_tx_commit() {
        let db = setup().await;
        exec(&mut db.ex().await.unwrap(), "CREATE TABLE test (i INTEGER)").await;

        let mut tx = db.begin().await.unwrap();
        exec(tx.ex(), "INSERT INTO test (i) VALUES (3)").await;
        tx.commit().await.unwrap();

        assert_eq!(
            1,
            query_i64(
                &mut db.ex().await.unwrap(),
                "count",
                "SELECT COUNT(*) AS count FROM test"
            )
            .await
        );
        db.close().await;
    }

    #[tokio::test]
    async fn test_tx_rollback_on_drop() {
        let db = setup().await;
        exec(&mut db.ex().await.unwrap(), "CREATE TABLE test (i INTEGER)").await;

        {
            let mut tx = db.begin().await.unwrap();
            exec(tx.ex(), "INSERT INTO test (i) VALUES (3)").await;
        }

        assert_eq!(
            0,
            query_i64(
                &mut db.ex().await.unwrap(),
                "count",
                "SELECT COUNT(*) AS count FROM test"
            )
            .await
        );
        db.close().await;
    }

    #[test]
    fn test_build_unpack_timestamp_zero() {
        let d = OffsetDateTime::from_unix_timestamp(0).unwrap();
        let (secs, nsecs) = unpack_timestamp(d);
        assert_eq!(0, secs);
        assert_eq!(0, nsecs);
        assert_eq!(Ok(d), build_timestamp(secs, nsecs));
    }

    #[test]
    fn test_build_unpack_timestamp_secs_precision() {
        let d = OffsetDateTime::from_unix_timestamp(123456789i64).unwrap();
        let (secs, nsecs) = unpack_timestamp(d);
        assert_eq!(123456789i64, secs);
        assert_eq!(0, nsecs);
        assert_eq!(Ok(d), build_timestamp(secs, nsecs));
    }

    #[test]
    fn test_build_unpack_timestamp_nsecs_precision() {
        let d = OffsetDateTime::from_unix_timestamp_nanos(1234567899876543215i128).unwrap();
        let (secs, nsecs) = unpack_timestamp(d);
        assert_eq!(1234567899i64, secs);
        assert_eq!(876543215i64, nsecs);
        assert_eq!(Ok(d), build_timestamp(secs, nsecs));
    }

    #[test]
    fn test_build_timestamp_negative() {
        match build_timestamp(-1, 0) {
            Err(DbError::DataIntegrityError(_)) => (),
            e => panic!("Must have failed with a DataIntegrityError but got: {:?}", e),
        }

        match build_timestamp(0, -1) {
            Err(DbError::DataIntegrityError(_)) => (),
            e => panic!("Must have failed with a DataIntegrityError but got: {:?}", e),
        }
    }

    #[test]
    fn test_build_timestamp_too_big() {
        match build_timestamp(123456789123456789i64, 0) {
            Err(_) => (),
            Ok(_) => panic!("Must have failed"),
        }
    }
}
