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

//! API to register a new manufacturer.

use crate::driver::FleetDriver;
use crate::model::Manufacturer;
use crate::rest::httputils::get_bearer_auth;
use crate::rest::{RestResult, REALM};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

/// Message sent to the server to create a manufacturer.
#[derive(Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct CreateManufacturerRequest {
    /// Name of the manufacturer.
    name: String,

    /// Country the manufacturer operates from.
    country: String,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<FleetDriver>,
    headers: HeaderMap,
    Json(request): Json<CreateManufacturerRequest>,
) -> RestResult<(StatusCode, Json<Manufacturer>)> {
    let token = get_bearer_auth(&headers, REALM)?;
    let manufacturer = driver.create_manufacturer(token, request.name, request.country).await?;
    Ok((StatusCode::CREATED, Json(manufacturer)))
}
