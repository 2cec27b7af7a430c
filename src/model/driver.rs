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

//! The `Driver` and `DriverDetail` data types.

use crate::model::{Car, LicenseNumber, Username};
use derive_getters::Getters;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// Representation of a driver's public information.
///
/// The password hash never travels with this type; it only lives in the database layer.
#[derive(Clone, Constructor, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize))]
pub(crate) struct Driver {
    /// Identifier assigned by the database.
    id: i32,

    /// Name the driver logs in with.
    username: Username,

    /// First name of the driver.
    first_name: String,

    /// Last name of the driver.
    last_name: String,

    /// The driver's license number.
    license_number: LicenseNumber,
}

/// A driver plus the cars currently assigned to them.
#[derive(Constructor, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct DriverDetail {
    /// The driver themselves.
    #[serde(flatten)]
    driver: Driver,

    /// Cars assigned to the driver, ordered by identifier.
    cars: Vec<Car>,
}
