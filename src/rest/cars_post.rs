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

//! API to register a new car.

use crate::driver::FleetDriver;
use crate::model::CarDetail;
use crate::rest::httputils::get_bearer_auth;
use crate::rest::{RestResult, REALM};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

/// Message sent to the server to create a car.
#[derive(Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct CreateCarRequest {
    /// Model of the car.
    model: String,

    /// Identifier of the manufacturer that builds the car.
    manufacturer_id: i32,

    /// Identifiers of the drivers to assign to the car right away, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    drivers: Option<Vec<i32>>,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<FleetDriver>,
    headers: HeaderMap,
    Json(request): Json<CreateCarRequest>,
) -> RestResult<(StatusCode, Json<CarDetail>)> {
    let token = get_bearer_auth(&headers, REALM)?;
    let detail = driver
        .create_car(token, request.model, request.manufacturer_id, request.drivers)
        .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}
