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

//! Operations on cars.

use crate::db::{self, DbError, Executor};
use crate::driver::{page_offset, DriverError, DriverResult, FleetDriver, PAGE_SIZE};
use crate::model::{AccessToken, Car, CarDetail};

/// Ensures that the free-form fields of a car are usable.
fn validate_fields(model: &str) -> DriverResult<()> {
    if model.is_empty() {
        return Err(DriverError::InvalidInput("Car model cannot be empty".to_owned()));
    }
    Ok(())
}

/// Replaces the set of drivers assigned to `car_id` with `driver_ids`.
async fn replace_assignments(
    ex: &mut Executor,
    car_id: i32,
    driver_ids: &[i32],
) -> DriverResult<()> {
    let current = db::assignments::drivers_of_car(ex, car_id).await?;
    for driver in current {
        db::assignments::remove_assignment(ex, car_id, *driver.id()).await?;
    }
    for driver_id in driver_ids {
        match db::assignments::add_assignment(ex, car_id, *driver_id).await {
            Ok(()) => (),
            Err(DbError::AlreadyExists) => {
                return Err(DriverError::InvalidInput(format!(
                    "Duplicate driver {} in assignment set",
                    driver_id
                )))
            }
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound(format!("Driver {} not found", driver_id)))
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

impl FleetDriver {
    /// Returns the `page`th page of cars whose model matches `filter`, if any.
    pub(crate) async fn list_cars(
        self,
        token: AccessToken,
        filter: Option<&str>,
        page: u32,
    ) -> DriverResult<Vec<Car>> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        let cars = db::cars::list_cars(&mut ex, filter, PAGE_SIZE, page_offset(page)).await?;
        Ok(cars)
    }

    /// Gets the car with identifier `id` along with its assigned drivers.
    pub(crate) async fn get_car(self, token: AccessToken, id: i32) -> DriverResult<CarDetail> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        let car = db::cars::get_car(&mut ex, id).await?;
        let drivers = db::assignments::drivers_of_car(&mut ex, id).await?;
        Ok(CarDetail::new(car, drivers))
    }

    /// Registers a new car, optionally assigning the drivers in `driver_ids` to it.
    pub(crate) async fn create_car(
        self,
        token: AccessToken,
        model: String,
        manufacturer_id: i32,
        driver_ids: Option<Vec<i32>>,
    ) -> DriverResult<CarDetail> {
        validate_fields(&model)?;

        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        self.get_session(tx.ex(), now, &token).await?;

        let manufacturer = match db::manufacturers::get_manufacturer(tx.ex(), manufacturer_id)
            .await
        {
            Ok(manufacturer) => manufacturer,
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound(format!(
                    "Manufacturer {} not found",
                    manufacturer_id
                )))
            }
            Err(e) => return Err(e.into()),
        };

        let id = db::cars::create_car(tx.ex(), &model, manufacturer_id).await?;
        if let Some(driver_ids) = driver_ids {
            replace_assignments(tx.ex(), id, &driver_ids).await?;
        }
        let drivers = db::assignments::drivers_of_car(tx.ex(), id).await?;
        tx.commit().await?;

        Ok(CarDetail::new(Car::new(id, model, manufacturer), drivers))
    }

    /// Replaces the details of the car with identifier `id`.  When `driver_ids` is given, the
    /// set of assigned drivers is replaced as well; otherwise it is left untouched.
    pub(crate) async fn update_car(
        self,
        token: AccessToken,
        id: i32,
        model: String,
        manufacturer_id: i32,
        driver_ids: Option<Vec<i32>>,
    ) -> DriverResult<CarDetail> {
        validate_fields(&model)?;

        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        self.get_session(tx.ex(), now, &token).await?;

        match db::manufacturers::get_manufacturer(tx.ex(), manufacturer_id).await {
            Ok(_) => (),
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound(format!(
                    "Manufacturer {} not found",
                    manufacturer_id
                )))
            }
            Err(e) => return Err(e.into()),
        }

        db::cars::update_car(tx.ex(), id, &model, manufacturer_id).await?;
        if let Some(driver_ids) = driver_ids {
            replace_assignments(tx.ex(), id, &driver_ids).await?;
        }
        let car = db::cars::get_car(tx.ex(), id).await?;
        let drivers = db::assignments::drivers_of_car(tx.ex(), id).await?;
        tx.commit().await?;

        Ok(CarDetail::new(car, drivers))
    }

    /// Unregisters the car with identifier `id`, dropping any assignments it had.
    pub(crate) async fn delete_car(self, token: AccessToken, id: i32) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        db::cars::delete_car(&mut ex, id).await?;
        Ok(())
    }
}
