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

//! Database queries for the many-to-many assignment between drivers and cars.

#[cfg(feature = "postgres")]
use crate::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use crate::db::sqlite;
use crate::db::{DbError, DbResult, Executor};
use crate::model::{Car, Driver};

/// Assigns the driver `driver_id` to the car `car_id`.
///
/// Fails with `NotFound` if either endpoint does not exist and with `AlreadyExists` if the
/// assignment is already in place.
pub(crate) async fn add_assignment(
    ex: &mut Executor,
    car_id: i32,
    driver_id: i32,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO car_drivers (car_id, driver_id) VALUES ($1, $2)";
            let done = sqlx::query(query_str)
                .bind(car_id)
                .bind(driver_id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO car_drivers (car_id, driver_id) VALUES (?, ?)";
            let done = sqlx::query(query_str)
                .bind(car_id)
                .bind(driver_id)
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

/// Removes the assignment of driver `driver_id` to car `car_id` if it exists.  Returns whether
/// an assignment was actually removed.
pub(crate) async fn remove_assignment(
    ex: &mut Executor,
    car_id: i32,
    driver_id: i32,
) -> DbResult<bool> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM car_drivers WHERE car_id = $1 AND driver_id = $2";
            let done = sqlx::query(query_str)
                .bind(car_id)
                .bind(driver_id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM car_drivers WHERE car_id = ? AND driver_id = ?";
            let done = sqlx::query(query_str)
                .bind(car_id)
                .bind(driver_id)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}

/// Lists the drivers assigned to the car `car_id`, ordered by identifier.
pub(crate) async fn drivers_of_car(ex: &mut Executor, car_id: i32) -> DbResult<Vec<Driver>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT users.id, users.username, users.first_name, users.last_name,
                       users.license_number
                FROM car_drivers JOIN users ON users.id = car_drivers.driver_id
                WHERE car_drivers.car_id = $1
                ORDER BY users.id";
            sqlx::query(query_str)
                .bind(car_id)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .into_iter()
                .map(Driver::try_from)
                .collect::<DbResult<Vec<Driver>>>()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT users.id, users.username, users.first_name, users.last_name,
                       users.license_number
                FROM car_drivers JOIN users ON users.id = car_drivers.driver_id
                WHERE car_drivers.car_id = ?
                ORDER BY users.id";
            sqlx::query(query_str)
                .bind(car_id)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
                .into_iter()
                .map(Driver::try_from)
                .collect::<DbResult<Vec<Driver>>>()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Lists the cars assigned to the driver `driver_id`, ordered by identifier.
pub(crate) async fn cars_of_driver(ex: &mut Executor, driver_id: i32) -> DbResult<Vec<Car>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT cars.id AS car_id, cars.model,
                       manufacturers.id AS manufacturer_id, manufacturers.name,
                       manufacturers.country
                FROM car_drivers
                    JOIN cars ON cars.id = car_drivers.car_id
                    JOIN manufacturers ON manufacturers.id = cars.manufacturer_id
                WHERE car_drivers.driver_id = $1
                ORDER BY cars.id";
            sqlx::query(query_str)
                .bind(driver_id)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .into_iter()
                .map(Car::try_from)
                .collect::<DbResult<Vec<Car>>>()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT cars.id AS car_id, cars.model,
                       manufacturers.id AS manufacturer_id, manufacturers.name,
                       manufacturers.country
                FROM car_drivers
                    JOIN cars ON cars.id = car_drivers.car_id
                    JOIN manufacturers ON manufacturers.id = cars.manufacturer_id
                WHERE car_drivers.driver_id = ?
                ORDER BY cars.id";
            sqlx::query(query_str)
                .bind(driver_id)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
                .into_iter()
                .map(Car::try_from)
                .collect::<DbResult<Vec<Car>>>()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}
