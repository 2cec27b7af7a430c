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

//! API to register a new driver account.

use crate::driver::FleetDriver;
use crate::model::{Driver, LicenseNumber, Password, Username};
use crate::rest::httputils::get_bearer_auth;
use crate::rest::{RestResult, REALM};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

/// Message sent to the server to create a driver account.
///
/// The free-form fields are taken as plain strings and validated here so that malformed values
/// surface as regular invalid-request errors instead of deserialization failures.
#[derive(Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct CreateDriverRequest {
    /// Username for the new account.
    username: String,

    /// Password for the new account.
    password1: Password,

    /// Confirmation copy of the password.
    password2: Password,

    /// First name of the driver.
    #[serde(default)]
    first_name: String,

    /// Last name of the driver.
    #[serde(default)]
    last_name: String,

    /// License number of the driver.
    license_number: String,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<FleetDriver>,
    headers: HeaderMap,
    Json(request): Json<CreateDriverRequest>,
) -> RestResult<(StatusCode, Json<Driver>)> {
    let token = get_bearer_auth(&headers, REALM)?;

    let username = Username::new(request.username)?;
    let license_number = LicenseNumber::new(request.license_number)?;

    let driver = driver
        .create_driver(
            token,
            username,
            request.password1,
            request.password2,
            request.first_name,
            request.last_name,
            license_number,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(driver)))
}
