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

//! Extends the driver with the `dashboard` method.

use crate::db;
use crate::driver::{DriverResult, FleetDriver};
use crate::model::AccessToken;
use serde::Serialize;

/// Entity totals and the per-session visit counter shown on the dashboard.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, PartialEq, serde::Deserialize))]
pub(crate) struct DashboardSummary {
    /// Total number of registered manufacturers.
    num_manufacturers: i64,

    /// Total number of registered cars.
    num_cars: i64,

    /// Total number of registered drivers.
    num_drivers: i64,

    /// Number of times the calling session has viewed the dashboard, this view included.
    num_visits: u32,
}

impl FleetDriver {
    /// Computes the dashboard counters for the session identified by `token`.
    ///
    /// Every call bumps the session's visit counter, so the first view reports 1.
    pub(crate) async fn dashboard(self, token: AccessToken) -> DriverResult<DashboardSummary> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        let session = self.get_session(&mut ex, now, &token).await?;

        let num_manufacturers = db::manufacturers::count_manufacturers(&mut ex).await?;
        let num_cars = db::cars::count_cars(&mut ex).await?;
        let num_drivers = db::users::count_users(&mut ex).await?;
        let num_visits = db::sessions::bump_visits(&mut ex, session.access_token()).await?;

        Ok(DashboardSummary { num_manufacturers, num_cars, num_drivers, num_visits })
    }
}
