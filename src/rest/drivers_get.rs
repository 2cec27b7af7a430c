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

//! API to query the list of drivers.

use crate::driver::FleetDriver;
use crate::model::Driver;
use crate::rest::httputils::get_bearer_auth;
use crate::rest::{EmptyBody, RestResult, REALM};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Query parameters accepted by this API.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Default, Serialize))]
pub(crate) struct ListDriversQuery {
    /// Case-insensitive substring to filter usernames with.
    username: Option<String>,

    /// 1-based page to return.
    page: Option<u32>,
}

/// Message returned by the server with a page of drivers.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize))]
pub(crate) struct ListDriversResponse {
    /// The drivers in the requested page.
    drivers: Vec<Driver>,

    /// The page that was returned.
    page: u32,

    /// The username filter that was applied, if any.
    username: Option<String>,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<FleetDriver>,
    Query(query): Query<ListDriversQuery>,
    headers: HeaderMap,
    _: EmptyBody,
) -> RestResult<Json<ListDriversResponse>> {
    let token = get_bearer_auth(&headers, REALM)?;

    // An empty filter in the query string means "no filter".
    let username = query.username.filter(|username| !username.is_empty());
    let page = query.page.unwrap_or(1);

    let drivers = driver.list_drivers(token, username.as_deref(), page).await?;
    Ok(Json(ListDriversResponse { drivers, page, username }))
}
