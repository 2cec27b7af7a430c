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

//! Database queries to manipulate drivers, who double as the users of the service.

#[cfg(feature = "postgres")]
use crate::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use crate::db::sqlite;
use crate::db::{escape_like, DbError, DbResult, Executor};
use crate::model::{Driver, HashedPassword, LicenseNumber, Username};
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Driver {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i32 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let username: String = row.try_get("username").map_err(postgres::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(postgres::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(postgres::map_sqlx_error)?;
        let license_number: String =
            row.try_get("license_number").map_err(postgres::map_sqlx_error)?;

        let username = Username::new(username)?;
        let license_number = LicenseNumber::new(license_number)?;

        Ok(Driver::new(id, username, first_name, last_name, license_number))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Driver {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i32 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let username: String = row.try_get("username").map_err(sqlite::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(sqlite::map_sqlx_error)?;
        let license_number: String =
            row.try_get("license_number").map_err(sqlite::map_sqlx_error)?;

        let username = Username::new(username)?;
        let license_number = LicenseNumber::new(license_number)?;

        Ok(Driver::new(id, username, first_name, last_name, license_number))
    }
}

/// Creates a new driver account and returns its public representation.
pub(crate) async fn create_user(
    ex: &mut Executor,
    username: Username,
    password: HashedPassword,
    first_name: String,
    last_name: String,
    license_number: LicenseNumber,
) -> DbResult<Driver> {
    let id = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO users (username, password, first_name, last_name, license_number)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(username.as_str())
                .bind(password.as_str())
                .bind(&first_name)
                .bind(&last_name)
                .bind(license_number.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO users (username, password, first_name, last_name, license_number)
                VALUES (?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(username.as_str())
                .bind(password.as_str())
                .bind(&first_name)
                .bind(&last_name)
                .bind(license_number.as_str())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            i32::try_from(done.last_insert_rowid())
                .map_err(|e| DbError::DataIntegrityError(format!("Invalid id: {}", e)))?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    Ok(Driver::new(id, username, first_name, last_name, license_number))
}

/// Gets the public information of the driver with identifier `id`.
pub(crate) async fn get_driver(ex: &mut Executor, id: i32) -> DbResult<Driver> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id, username, first_name, last_name, license_number
                FROM users WHERE id = $1";
            let raw_driver = sqlx::query(query_str)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Driver::try_from(raw_driver)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT id, username, first_name, last_name, license_number
                FROM users WHERE id = ?";
            let raw_driver = sqlx::query(query_str)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Driver::try_from(raw_driver)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the public information of the driver whose username is `username`.
pub(crate) async fn get_user_by_username(
    ex: &mut Executor,
    username: &Username,
) -> DbResult<Driver> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id, username, first_name, last_name, license_number
                FROM users WHERE username = $1";
            let raw_driver = sqlx::query(query_str)
                .bind(username.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Driver::try_from(raw_driver)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT id, username, first_name, last_name, license_number
                FROM users WHERE username = ?";
            let raw_driver = sqlx::query(query_str)
                .bind(username.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Driver::try_from(raw_driver)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the password hash of the user named `username`.
pub(crate) async fn get_user_password(
    ex: &mut Executor,
    username: &Username,
) -> DbResult<HashedPassword> {
    let password: String = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT password FROM users WHERE username = $1";
            let row = sqlx::query(query_str)
                .bind(username.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("password").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT password FROM users WHERE username = ?";
            let row = sqlx::query(query_str)
                .bind(username.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("password").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(HashedPassword::new(password))
}

/// Lists drivers ordered by identifier, optionally keeping only those whose username contains
/// `filter` (case-insensitively), returning at most `limit` entries starting at `offset`.
pub(crate) async fn list_drivers(
    ex: &mut Executor,
    filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<Driver>> {
    let pattern = filter.map(|f| format!("%{}%", escape_like(f)));

    let raw_drivers = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id, username, first_name, last_name, license_number
                FROM users
                WHERE ($1::TEXT IS NULL OR username ILIKE $1 ESCAPE '\\')
                ORDER BY id
                LIMIT $2 OFFSET $3";
            sqlx::query(query_str)
                .bind(&pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .into_iter()
                .map(Driver::try_from)
                .collect::<DbResult<Vec<Driver>>>()?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT id, username, first_name, last_name, license_number
                FROM users
                WHERE (? IS NULL OR username LIKE ? ESCAPE '\\')
                ORDER BY id
                LIMIT ? OFFSET ?";
            sqlx::query(query_str)
                .bind(&pattern)
                .bind(&pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
                .into_iter()
                .map(Driver::try_from)
                .collect::<DbResult<Vec<Driver>>>()?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(raw_drivers)
}

/// Counts all registered drivers.
pub(crate) async fn count_users(ex: &mut Executor) -> DbResult<i64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM users";
            let row = sqlx::query(query_str)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("count").map_err(postgres::map_sqlx_error)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM users";
            let row = sqlx::query(query_str)
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("count").map_err(sqlite::map_sqlx_error)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Updates the license number of the driver with identifier `id`.
pub(crate) async fn update_license(
    ex: &mut Executor,
    id: i32,
    license_number: &LicenseNumber,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE users SET license_number = $1 WHERE id = $2";
            let done = sqlx::query(query_str)
                .bind(license_number.as_str())
                .bind(id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE users SET license_number = ? WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(license_number.as_str())
                .bind(id)
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
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Deletes the driver with identifier `id`, cascading to any assignments and sessions.
pub(crate) async fn delete_user(ex: &mut Executor, id: i32) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM users WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM users WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id)
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
