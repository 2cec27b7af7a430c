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

//! Database queries to manipulate manufacturers.

#[cfg(feature = "postgres")]
use crate::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use crate::db::sqlite;
use crate::db::{escape_like, DbError, DbResult, Executor};
use crate::model::Manufacturer;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Manufacturer {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i32 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let country: String = row.try_get("country").map_err(postgres::map_sqlx_error)?;
        Ok(Manufacturer::new(id, name, country))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Manufacturer {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i32 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let country: String = row.try_get("country").map_err(sqlite::map_sqlx_error)?;
        Ok(Manufacturer::new(id, name, country))
    }
}

/// Creates a new manufacturer.  Fails with `AlreadyExists` if the name is taken.
pub(crate) async fn create_manufacturer(
    ex: &mut Executor,
    name: String,
    country: String,
) -> DbResult<Manufacturer> {
    let id = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "INSERT INTO manufacturers (name, country) VALUES ($1, $2) RETURNING id";
            let row = sqlx::query(query_str)
                .bind(&name)
                .bind(&country)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO manufacturers (name, country) VALUES (?, ?)";
            let done = sqlx::query(query_str)
                .bind(&name)
                .bind(&country)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            i32::try_from(done.last_insert_rowid())
                .map_err(|e| DbError::DataIntegrityError(format!("Invalid id: {}", e)))?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    Ok(Manufacturer::new(id, name, country))
}

/// Gets the manufacturer with identifier `id`.
pub(crate) async fn get_manufacturer(ex: &mut Executor, id: i32) -> DbResult<Manufacturer> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT id, name, country FROM manufacturers WHERE id = $1";
            let raw = sqlx::query(query_str)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Manufacturer::try_from(raw)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT id, name, country FROM manufacturers WHERE id = ?";
            let raw = sqlx::query(query_str)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Manufacturer::try_from(raw)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Replaces the name and country of the manufacturer with identifier `id`.
pub(crate) async fn update_manufacturer(
    ex: &mut Executor,
    id: i32,
    name: &str,
    country: &str,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE manufacturers SET name = $1, country = $2 WHERE id = $3";
            let done = sqlx::query(query_str)
                .bind(name)
                .bind(country)
                .bind(id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE manufacturers SET name = ?, country = ? WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(name)
                .bind(country)
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

/// Deletes the manufacturer with identifier `id`, cascading to its cars.
pub(crate) async fn delete_manufacturer(ex: &mut Executor, id: i32) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM manufacturers WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM manufacturers WHERE id = ?";
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

/// Lists manufacturers ordered by identifier, optionally keeping only those whose name contains
/// `filter` (case-insensitively), returning at most `limit` entries starting at `offset`.
pub(crate) async fn list_manufacturers(
    ex: &mut Executor,
    filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<Manufacturer>> {
    let pattern = filter.map(|f| format!("%{}%", escape_like(f)));

    let raw = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id, name, country
                FROM manufacturers
                WHERE ($1::TEXT IS NULL OR name ILIKE $1 ESCAPE '\\')
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
                .map(Manufacturer::try_from)
                .collect::<DbResult<Vec<Manufacturer>>>()?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT id, name, country
                FROM manufacturers
                WHERE (? IS NULL OR name LIKE ? ESCAPE '\\')
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
                .map(Manufacturer::try_from)
                .collect::<DbResult<Vec<Manufacturer>>>()?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(raw)
}

/// Counts all manufacturers.
pub(crate) async fn count_manufacturers(ex: &mut Executor) -> DbResult<i64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM manufacturers";
            let row = sqlx::query(query_str)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("count").map_err(postgres::map_sqlx_error)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM manufacturers";
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
