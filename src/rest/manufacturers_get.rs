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

//! API to query the list of manufacturers.

use crate::driver::FleetDriver;
use crate::model::Manufacturer;
use crate::rest::httputils::get_bearer_auth;
use crate::rest::{EmptyBody, RestResult, REALM};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Query parameters accepted by this API.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Default, Serialize))]
pub(crate) struct ListManufacturersQuery {
    /// Case-insensitive substring to filter manufacturer names with.
    name: Option<String>,

    /// 1-based page to return.
    page: Option<u32>,
}

/// Message returned by the server with a page of manufacturers.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize))]
pub(crate) struct ListManufacturersResponse {
    /// The manufacturers in the requested page.
    manufacturers: Vec<Manufacturer>,

    /// The page that was returned.
    page: u32,

    /// The name filter that was applied, if any.
    name: Option<String>,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<FleetDriver>,
    Query(query): Query<ListManufacturersQuery>,
    headers: HeaderMap,
    _: EmptyBody,
) -> RestResult<Json<ListManufacturersResponse>> {
    let token = get_bearer_auth(&headers, REALM)?;

    // An empty filter in the query string means "no filter".
    let name = query.name.filter(|name| !name.is_empty());
    let page = query.page.unwrap_or(1);

    let manufacturers = driver.list_manufacturers(token, name.as_deref(), page).await?;
    Ok(Json(ListManufacturersResponse { manufacturers, page, name }))
}
