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

//! Database queries to manipulate cars.
//!
//! Cars always travel with their manufacturer, so all the `SELECT`s in this module join against
//! the manufacturers table with stable column aliases that the row converters rely on.

#[cfg(feature = "postgres")]
use crate::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use crate::db::sqlite;
use crate::db::{escape_like, DbError, DbResult, Executor};
use crate::model::{Car, Manufacturer};
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Car {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i32 = row.try_get("car_id").map_err(postgres::map_sqlx_error)?;
        let model: String = row.try_get("model").map_err(postgres::map_sqlx_error)?;
        let manufacturer_id: i32 =
            row.try_get("manufacturer_id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let country: String = row.try_get("country").map_err(postgres::map_sqlx_error)?;

        Ok(Car::new(id, model, Manufacturer::new(manufacturer_id, name, country)))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Car {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i32 = row.try_get("car_id").map_err(sqlite::map_sqlx_error)?;
        let model: String = row.try_get("model").map_err(sqlite::map_sqlx_error)?;
        let manufacturer_id: i32 =
            row.try_get("manufacturer_id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let country: String = row.try_get("country").map_err(sqlite::map_sqlx_error)?;

        Ok(Car::new(id, model, Manufacturer::new(manufacturer_id, name, country)))
    }
}

/// Creates a new car of model `model` built by `manufacturer_id` and returns its identifier.
/// Fails with `NotFound` if the manufacturer does not exist.
pub(crate) async fn create_car(
    ex: &mut Executor,
    model: &str,
    manufacturer_id: i32,
) -> DbResult<i32> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "INSERT INTO cars (model, manufacturer_id) VALUES ($1, $2) RETURNING id";
            let row = sqlx::query(query_str)
                .bind(model)
                .bind(manufacturer_id)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id").map_err(postgres::map_sqlx_error)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO cars (model, manufacturer_id) VALUES (?, ?)";
            let done = sqlx::query(query_str)
                .bind(model)
                .bind(manufacturer_id)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            i32::try_from(done.last_insert_rowid())
                .map_err(|e| DbError::DataIntegrityError(format!("Invalid id: {}", e)))
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the car with identifier `id`, including its manufacturer.
pub(crate) async fn get_car(ex: &mut Executor, id: i32) -> DbResult<Car> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT cars.id AS car_id, cars.model,
                       manufacturers.id AS manufacturer_id, manufacturers.name,
                       manufacturers.country
                FROM cars JOIN manufacturers ON manufacturers.id = cars.manufacturer_id
                WHERE cars.id = $1";
            let raw = sqlx::query(query_str)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Car::try_from(raw)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT cars.id AS car_id, cars.model,
                       manufacturers.id AS manufacturer_id, manufacturers.name,
                       manufacturers.country
                FROM cars JOIN manufacturers ON manufacturers.id = cars.manufacturer_id
                WHERE cars.id = ?";
            let raw = sqlx::query(query_str)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Car::try_from(raw)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Replaces the model and manufacturer of the car with identifier `id`.
pub(crate) async fn update_car(
    ex: &mut Executor,
    id: i32,
    model: &str,
    manufacturer_id: i32,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE cars SET model = $1, manufacturer_id = $2 WHERE id = $3";
            let done = sqlx::query(query_str)
                .bind(model)
                .bind(manufacturer_id)
                .bind(id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE cars SET model = ?, manufacturer_id = ? WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(model)
                .bind(manufacturer_id)
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

/// Deletes the car with identifier `id`, cascading to its assignments.
pub(crate) async fn delete_car(ex: &mut Executor, id: i32) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM cars WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM cars WHERE id = ?";
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

/// Lists cars ordered by identifier, optionally keeping only those whose model contains
/// `filter` (case-insensitively), returning at most `limit` entries starting at `offset`.
pub(crate) async fn list_cars(
    ex: &mut Executor,
    filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<Car>> {
    let pattern = filter.map(|f| format!("%{}%", escape_like(f)));

    let raw = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT cars.id AS car_id, cars.model,
                       manufacturers.id AS manufacturer_id, manufacturers.name,
                       manufacturers.country
                FROM cars JOIN manufacturers ON manufacturers.id = cars.manufacturer_id
                WHERE ($1::TEXT IS NULL OR cars.model ILIKE $1 ESCAPE '\\')
                ORDER BY cars.id
                LIMIT $2 OFFSET $3";
            sqlx::query(query_str)
                .bind(&pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .into_iter()
                .map(Car::try_from)
                .collect::<DbResult<Vec<Car>>>()?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT cars.id AS car_id, cars.model,
                       manufacturers.id AS manufacturer_id, manufacturers.name,
                       manufacturers.country
                FROM cars JOIN manufacturers ON manufacturers.id = cars.manufacturer_id
                WHERE (? IS NULL OR cars.model LIKE ? ESCAPE '\\')
                ORDER BY cars.id
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
                .map(Car::try_from)
                .collect::<DbResult<Vec<Car>>>()?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(raw)
}

/// Counts all cars.
pub(crate) async fn count_cars(ex: &mut Executor) -> DbResult<i64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM cars";
            let row = sqlx::query(query_str)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("count").map_err(postgres::map_sqlx_error)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM cars";
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
