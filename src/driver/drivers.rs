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

//! Operations on drivers.

use crate::db::{self, DbError};
use crate::driver::{page_offset, DriverError, DriverResult, FleetDriver, PAGE_SIZE};
use crate::model::{AccessToken, Driver, DriverDetail, LicenseNumber, Password, Username};

/// Checks whether a password is strong enough to be allowed, returning a message describing the
/// problem when it is not.
fn password_validator(password: &str) -> Option<&'static str> {
    if password.len() < 8 {
        return Some("Must be at least 8 characters long");
    }
    if !password.chars().any(|ch| ch.is_ascii_alphabetic())
        || !password.chars().any(|ch| ch.is_ascii_digit())
    {
        return Some("Must contain both letters and digits");
    }
    None
}

impl FleetDriver {
    /// Returns the `page`th page of drivers whose username matches `filter`, if any.
    pub(crate) async fn list_drivers(
        self,
        token: AccessToken,
        filter: Option<&str>,
        page: u32,
    ) -> DriverResult<Vec<Driver>> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        let drivers = db::users::list_drivers(&mut ex, filter, PAGE_SIZE, page_offset(page)).await?;
        Ok(drivers)
    }

    /// Gets the driver with identifier `id` along with the cars assigned to them.
    pub(crate) async fn get_driver(self, token: AccessToken, id: i32) -> DriverResult<DriverDetail> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        let driver = db::users::get_driver(&mut ex, id).await?;
        let cars = db::assignments::cars_of_driver(&mut ex, id).await?;
        Ok(DriverDetail::new(driver, cars))
    }

    /// Registers a new driver account.
    ///
    /// The two copies of the password must match and survive the strength check, and the
    /// password is persisted in hashed form only.
    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn create_driver(
        self,
        token: AccessToken,
        username: Username,
        password1: Password,
        password2: Password,
        first_name: String,
        last_name: String,
        license_number: LicenseNumber,
    ) -> DriverResult<Driver> {
        if password1 != password2 {
            return Err(DriverError::InvalidInput("Passwords do not match".to_owned()));
        }
        let hashed = password1.validate_and_hash(password_validator)?;

        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        match db::users::create_user(&mut ex, username, hashed, first_name, last_name, license_number)
            .await
        {
            Ok(driver) => Ok(driver),
            Err(DbError::AlreadyExists) => {
                Err(DriverError::AlreadyExists("Username is already taken".to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the license number of the driver with identifier `id`.
    pub(crate) async fn update_license(
        self,
        token: AccessToken,
        id: i32,
        license_number: LicenseNumber,
    ) -> DriverResult<Driver> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        db::users::update_license(&mut ex, id, &license_number).await?;
        let driver = db::users::get_driver(&mut ex, id).await?;
        Ok(driver)
    }

    /// Unregisters the driver with identifier `id`, dropping their assignments and sessions.
    pub(crate) async fn delete_driver(self, token: AccessToken, id: i32) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        db::users::delete_user(&mut ex, id).await?;
        Ok(())
    }
}
