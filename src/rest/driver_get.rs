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

//! API to query the details of a driver, including the cars assigned to them.

use crate::driver::FleetDriver;
use crate::model::DriverDetail;
use crate::rest::httputils::get_bearer_auth;
use crate::rest::{EmptyBody, RestResult, REALM};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<FleetDriver>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    _: EmptyBody,
) -> RestResult<Json<DriverDetail>> {
    let token = get_bearer_auth(&headers, REALM)?;
    let detail = driver.get_driver(token, id).await?;
    Ok(Json(detail))
}
