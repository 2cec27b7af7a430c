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

//! API to replace the details of a manufacturer.

use crate::driver::FleetDriver;
use crate::model::Manufacturer;
use crate::rest::httputils::get_bearer_auth;
use crate::rest::{RestResult, REALM};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

/// Message sent to the server to update a manufacturer.
#[derive(Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct UpdateManufacturerRequest {
    /// New name of the manufacturer.
    name: String,

    /// New country the manufacturer operates from.
    country: String,
}

/// PUT handler for this API.
pub(crate) async fn handler(
    State(driver): State<FleetDriver>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(request): Json<UpdateManufacturerRequest>,
) -> RestResult<Json<Manufacturer>> {
    let token = get_bearer_auth(&headers, REALM)?;
    let manufacturer =
        driver.update_manufacturer(token, id, request.name, request.country).await?;
    Ok(Json(manufacturer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;

    fn route(id: i32) -> (http::Method, String) {
        (http::Method::PUT, format!("/api/manufacturers/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        context.create_driver_account("hello", "ABC12345").await;
        let manufacturer = context.create_manufacturer("Forge Motors", "ES").await;
        let token = context.login("hello").await;

        let updated = OneShotBuilder::new(context.into_app(), route(*manufacturer.id()))
            .with_bearer_auth(token.as_str())
            .send_json(UpdateManufacturerRequest {
                name: "Forge Works".to_owned(),
                country: "PT".to_owned(),
            })
            .await
            .expect_json::<Manufacturer>()
            .await;

        assert_eq!(manufacturer.id(), updated.id());
        assert_eq!("Forge Works", updated.name().as_str());
        assert_eq!("PT", updated.country().as_str());
    }

    #[tokio::test]
    async fn test_missing() {
        let context = TestContext::setup().await;
        context.create_driver_account("hello", "ABC12345").await;
        let token = context.login("hello").await;

        OneShotBuilder::new(context.into_app(), route(123))
            .with_bearer_auth(token.as_str())
            .send_json(UpdateManufacturerRequest {
                name: "Forge Works".to_owned(),
                country: "PT".to_owned(),
            })
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("not found")
            .await;
    }

    test_requires_bearer_auth!(
        route(1),
        UpdateManufacturerRequest { name: "Forge Works".to_owned(), country: "PT".to_owned() }
    );
}
