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

//! Operations on manufacturers.

use crate::db;
use crate::driver::{page_offset, DriverError, DriverResult, FleetDriver, PAGE_SIZE};
use crate::model::{AccessToken, Manufacturer};

/// Ensures that the free-form fields of a manufacturer are usable.
fn validate_fields(name: &str, country: &str) -> DriverResult<()> {
    if name.is_empty() {
        return Err(DriverError::InvalidInput("Manufacturer name cannot be empty".to_owned()));
    }
    if country.is_empty() {
        return Err(DriverError::InvalidInput("Manufacturer country cannot be empty".to_owned()));
    }
    Ok(())
}

impl FleetDriver {
    /// Returns the `page`th page of manufacturers whose name matches `filter`, if any.
    pub(crate) async fn list_manufacturers(
        self,
        token: AccessToken,
        filter: Option<&str>,
        page: u32,
    ) -> DriverResult<Vec<Manufacturer>> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        let manufacturers =
            db::manufacturers::list_manufacturers(&mut ex, filter, PAGE_SIZE, page_offset(page))
                .await?;
        Ok(manufacturers)
    }

    /// Registers a new manufacturer.
    pub(crate) async fn create_manufacturer(
        self,
        token: AccessToken,
        name: String,
        country: String,
    ) -> DriverResult<Manufacturer> {
        validate_fields(&name, &country)?;

        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        let manufacturer = db::manufacturers::create_manufacturer(&mut ex, name, country).await?;
        Ok(manufacturer)
    }

    /// Replaces the details of the manufacturer with identifier `id`.
    pub(crate) async fn update_manufacturer(
        self,
        token: AccessToken,
        id: i32,
        name: String,
        country: String,
    ) -> DriverResult<Manufacturer> {
        validate_fields(&name, &country)?;

        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        db::manufacturers::update_manufacturer(&mut ex, id, &name, &country).await?;
        Ok(Manufacturer::new(id, name, country))
    }

    /// Unregisters the manufacturer with identifier `id` and all of its cars.
    pub(crate) async fn delete_manufacturer(
        self,
        token: AccessToken,
        id: i32,
    ) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        let now = self.clock.now_utc();

        self.get_session(&mut ex, now, &token).await?;
        db::manufacturers::delete_manufacturer(&mut ex, id).await?;
        Ok(())
    }
}
