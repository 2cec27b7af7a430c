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

//! Extends the driver with the `toggle_assignment` method.

use crate::db;
use crate::driver::{DriverResult, FleetDriver};
use crate::model::{AccessToken, CarDetail};

impl FleetDriver {
    /// Toggles the assignment between the car with identifier `car_id` and the driver that owns
    /// the session identified by `token`: assigned drivers are unassigned and vice versa.
    ///
    /// The read-then-write runs inside a single transaction so that two concurrent toggles
    /// cannot insert the same edge twice.
    pub(crate) async fn toggle_assignment(
        self,
        token: AccessToken,
        car_id: i32,
    ) -> DriverResult<CarDetail> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        let session = self.get_session(tx.ex(), now, &token).await?;
        let me = db::users::get_user_by_username(tx.ex(), session.username()).await?;

        let car = db::cars::get_car(tx.ex(), car_id).await?;
        let removed = db::assignments::remove_assignment(tx.ex(), car_id, *me.id()).await?;
        if !removed {
            db::assignments::add_assignment(tx.ex(), car_id, *me.id()).await?;
        }
        let drivers = db::assignments::drivers_of_car(tx.ex(), car_id).await?;
        tx.commit().await?;

        Ok(CarDetail::new(car, drivers))
    }
}
