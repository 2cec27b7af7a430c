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

//! Database queries to manipulate login sessions.

#[cfg(feature = "postgres")]
use crate::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use crate::db::sqlite::{self, build_timestamp, unpack_timestamp};
use crate::db::{DbError, DbResult, Executor};
use crate::model::{AccessToken, Session, Username};
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
#[cfg(feature = "postgres")]
use time::OffsetDateTime;

/// Converts the signed visit counter stored in the database into the `u32` the model carries.
fn visits_from_i64(visits: i64) -> DbResult<u32> {
    u32::try_from(visits)
        .map_err(|_| DbError::DataIntegrityError(format!("Invalid visits counter {}", visits)))
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Session {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let access_token: String = row.try_get("access_token").map_err(postgres::map_sqlx_error)?;
        let username: String = row.try_get("username").map_err(postgres::map_sqlx_error)?;
        let login_time: OffsetDateTime =
            row.try_get("login_time").map_err(postgres::map_sqlx_error)?;
        let visits: i32 = row.try_get("visits").map_err(postgres::map_sqlx_error)?;

        let access_token = AccessToken::new(access_token)?;
        let username = Username::new(username)?;
        let visits = visits_from_i64(i64::from(visits))?;

        Ok(Session::new(access_token, username, login_time, visits))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Session {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let access_token: String = row.try_get("access_token").map_err(sqlite::map_sqlx_error)?;
        let username: String = row.try_get("username").map_err(sqlite::map_sqlx_error)?;
        let login_time_secs: i64 =
            row.try_get("login_time_secs").map_err(sqlite::map_sqlx_error)?;
        let login_time_nsecs: i64 =
            row.try_get("login_time_nsecs").map_err(sqlite::map_sqlx_error)?;
        let visits: i64 = row.try_get("visits").map_err(sqlite::map_sqlx_error)?;

        let access_token = AccessToken::new(access_token)?;
        let username = Username::new(username)?;
        let login_time = build_timestamp(login_time_secs, login_time_nsecs)?;
        let visits = visits_from_i64(visits)?;

        Ok(Session::new(access_token, username, login_time, visits))
    }
}

/// Saves a session.
pub(crate) async fn put_session(ex: &mut Executor, session: &Session) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO sessions (access_token, username, login_time)
                VALUES ($1, $2, $3)";
            let done = sqlx::query(query_str)
                .bind(session.access_token().as_str())
                .bind(session.username().as_str())
                .bind(session.login_time())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (login_time_secs, login_time_nsecs) = unpack_timestamp(session.login_time());

            let query_str = "
                INSERT INTO sessions (access_token, username, login_time_secs, login_time_nsecs)
                VALUES (?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(session.access_token().as_str())
                .bind(session.username().as_str())
                .bind(login_time_secs)
                .bind(login_time_nsecs)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(())
}

/// Gets a session from its access token.
pub(crate) async fn get_session(
    ex: &mut Executor,
    access_token: &AccessToken,
) -> DbResult<Session> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT access_token, username, login_time, visits
                FROM sessions
                WHERE access_token = $1";
            let raw_session = sqlx::query(query_str)
                .bind(access_token.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Session::try_from(raw_session)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT access_token, username, login_time_secs, login_time_nsecs, visits
                FROM sessions
                WHERE access_token = ?";
            let raw_session = sqlx::query(query_str)
                .bind(access_token.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Session::try_from(raw_session)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Deletes a session, invalidating its access token.
pub(crate) async fn delete_session(ex: &mut Executor, session: Session) -> DbResult<()> {
    let access_token = session.take_access_token();

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM sessions WHERE access_token = $1";
            let done = sqlx::query(query_str)
                .bind(access_token.as_str())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM sessions WHERE access_token = ?";
            let done = sqlx::query(query_str)
                .bind(access_token.as_str())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}

/// Increments the dashboard visit counter of the session identified by `access_token` and
/// returns the new value.
pub(crate) async fn bump_visits(ex: &mut Executor, access_token: &AccessToken) -> DbResult<u32> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE sessions SET visits = visits + 1
                WHERE access_token = $1
                RETURNING visits";
            let row = sqlx::query(query_str)
                .bind(access_token.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            let visits: i32 = row.try_get("visits").map_err(postgres::map_sqlx_error)?;
            visits_from_i64(i64::from(visits))
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE sessions SET visits = visits + 1
                WHERE access_token = ?
                RETURNING visits";
            let row = sqlx::query(query_str)
                .bind(access_token.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let visits: i64 = row.try_get("visits").map_err(sqlite::map_sqlx_error)?;
            visits_from_i64(visits)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}
