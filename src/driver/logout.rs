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

//! Extends the driver with the `logout` method.

use crate::db;
use crate::driver::{DriverResult, FleetDriver};
use crate::model::AccessToken;

impl FleetDriver {
    /// Invalidates the session identified by `token`.
    pub(crate) async fn logout(self, token: AccessToken) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        let session = self.get_session(&mut ex, now, &token).await?;
        db::sessions::delete_session(&mut ex, session).await?;
        Ok(())
    }
}
