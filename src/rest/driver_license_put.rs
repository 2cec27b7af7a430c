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

//! API to replace the license number of a driver.

use crate::driver::FleetDriver;
use crate::model::{Driver, LicenseNumber};
use crate::rest::httputils::get_bearer_auth;
use crate::rest::{RestResult, REALM};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

/// Message sent to the server to update a driver's license.
#[derive(Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct UpdateLicenseRequest {
    /// The new license number, validated in the handler.
    license_number: String,
}

/// PUT handler for this API.
pub(crate) async fn handler(
    State(driver): State<FleetDriver>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(request): Json<UpdateLicenseRequest>,
) -> RestResult<Json<Driver>> {
    let token = get_bearer_auth(&headers, REALM)?;
    let license_number = LicenseNumber::new(request.license_number)?;
    let updated = driver.update_license(token, id, license_number).await?;
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;

    fn route(id: i32) -> (http::Method, String) {
        (http::Method::PUT, format!("/api/drivers/{}/license", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let me = context.create_driver_account("hello", "ABC12345").await;
        let token = context.login("hello").await;

        let updated = OneShotBuilder::new(context.into_app(), route(*me.id()))
            .with_bearer_auth(token.as_str())
            .send_json(UpdateLicenseRequest { license_number: "XYZ98765".to_owned() })
            .await
            .expect_json::<Driver>()
            .await;

        assert_eq!(me.id(), updated.id());
        assert_eq!("XYZ98765", updated.license_number().as_str());
    }

    #[tokio::test]
    async fn test_invalid_license() {
        let context = TestContext::setup().await;
        let me = context.create_driver_account("hello", "ABC12345").await;
        let token = context.login("hello").await;

        OneShotBuilder::new(context.into_app(), route(*me.id()))
            .with_bearer_auth(token.as_str())
            .send_json(UpdateLicenseRequest { license_number: "12345XYZ".to_owned() })
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("uppercase letters")
            .await;
    }

    #[tokio::test]
    async fn test_missing() {
        let context = TestContext::setup().await;
        context.create_driver_account("hello", "ABC12345").await;
        let token = context.login("hello").await;

        OneShotBuilder::new(context.into_app(), route(123))
            .with_bearer_auth(token.as_str())
            .send_json(UpdateLicenseRequest { license_number: "XYZ98765".to_owned() })
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("not found")
            .await;
    }

    test_requires_bearer_auth!(
        route(1),
        UpdateLicenseRequest { license_number: "XYZ98765".to_owned() }
    );
}
