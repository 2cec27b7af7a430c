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

//! Test utilities for the business layer.

use crate::clocks::testutils::{utc_datetime, SettableClock};
use crate::db::{self, init_schema, Db};
use crate::driver::{FleetDriver, FleetOptions};
use crate::model::{
    AccessToken, Car, Driver, LicenseNumber, Manufacturer, Password, Username,
};
use std::sync::Arc;

/// Password assigned to every account created by `TestContext::create_test_driver`.
pub(crate) const TEST_PASSWORD: &str = "the password";

/// State of a running test backed by an in-memory database and a settable clock.
///
/// The database holds a single connection, so tests must make sure to drop any executor they
/// acquired directly before invoking a driver operation.
pub(crate) struct TestContext {
    /// The in-memory database shared by the driver and the test code.
    db: Arc<dyn Db + Send + Sync>,

    /// The fake clock given to the driver.
    pub(crate) clock: Arc<SettableClock>,

    /// The driver under test.
    driver: FleetDriver,
}

impl TestContext {
    /// Initializes the database and the driver with default options.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::from(db::sqlite::testutils::setup().await);
        {
            let mut ex = db.ex().await.unwrap();
            init_schema(&mut ex).await.unwrap();
        }
        let clock = Arc::from(SettableClock::new(utc_datetime(2024, 6, 9, 14, 30, 0)));
        let driver = FleetDriver::new(db.clone(), clock.clone(), FleetOptions::default());
        Self { db, clock, driver }
    }

    /// Returns the database used by this test.
    pub(crate) fn db(&self) -> &Arc<dyn Db + Send + Sync> {
        &self.db
    }

    /// Returns a clone of the driver under test, given that operations consume it.
    pub(crate) fn driver(&self) -> FleetDriver {
        self.driver.clone()
    }

    /// Creates a driver account named `username` with `TEST_PASSWORD` as its password and
    /// `license` as its license number.
    pub(crate) async fn create_test_driver(&self, username: &str, license: &str) -> Driver {
        let password = Password::new(TEST_PASSWORD).unwrap();
        let hashed = password.validate_and_hash(|_| None).unwrap();
        let mut ex = self.db.ex().await.unwrap();
        db::users::create_user(
            &mut ex,
            Username::new(username).unwrap(),
            hashed,
            "Test".to_owned(),
            "Driver".to_owned(),
            LicenseNumber::new(license).unwrap(),
        )
        .await
        .unwrap()
    }

    /// Logs the previously-created account `username` in and returns its access token.
    pub(crate) async fn do_login(&self, username: &str) -> AccessToken {
        let session = self
            .driver()
            .login(Username::new(username).unwrap(), Password::new(TEST_PASSWORD).unwrap())
            .await
            .unwrap();
        session.take_access_token()
    }

    /// Creates a manufacturer directly in the database.
    pub(crate) async fn create_test_manufacturer(&self, name: &str, country: &str) -> Manufacturer {
        let mut ex = self.db.ex().await.unwrap();
        db::manufacturers::create_manufacturer(&mut ex, name.to_owned(), country.to_owned())
            .await
            .unwrap()
    }

    /// Creates a car of `model` built by `manufacturer` directly in the database.
    pub(crate) async fn create_test_car(&self, model: &str, manufacturer: &Manufacturer) -> Car {
        let mut ex = self.db.ex().await.unwrap();
        let id = db::cars::create_car(&mut ex, model, *manufacturer.id()).await.unwrap();
        Car::new(id, model.to_owned(), manufacturer.clone())
    }
}
