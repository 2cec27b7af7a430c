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

//! Extends the driver with the `login` method.

use crate::db::{self, DbError};
use crate::driver::{DriverError, DriverResult, FleetDriver};
use crate::model::{AccessToken, Password, Session, Username};

impl FleetDriver {
    /// Logs the driver `username` in and returns the newly-created session.
    pub(crate) async fn login(self, username: Username, password: Password) -> DriverResult<Session> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        let hash = match db::users::get_user_password(&mut ex, &username).await {
            Ok(hash) => hash,
            Err(DbError::NotFound) => {
                return Err(DriverError::Unauthorized("Unknown user".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        if !password.verify(&hash)? {
            return Err(DriverError::Unauthorized("Invalid password".to_owned()));
        }

        let access_token = AccessToken::generate();
        let session = Session::new(access_token, username, now, 0);
        db::sessions::put_session(&mut ex, &session).await?;

        Ok(session)
    }
}
