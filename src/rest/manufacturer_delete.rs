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

//! API to unregister a manufacturer.

use crate::driver::FleetDriver;
use crate::rest::httputils::get_bearer_auth;
use crate::rest::{EmptyBody, RestResult, REALM};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};

/// DELETE handler for this API.
pub(crate) async fn handler(
    State(driver): State<FleetDriver>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    _: EmptyBody,
) -> RestResult<StatusCode> {
    let token = get_bearer_auth(&headers, REALM)?;
    driver.delete_manufacturer(token, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;

    fn route(id: i32) -> (http::Method, String) {
        (http::Method::DELETE, format!("/api/manufacturers/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        context.create_driver_account("hello", "ABC12345").await;
        let manufacturer = context.create_manufacturer("Forge Motors", "ES").await;
        let token = context.login("hello").await;

        OneShotBuilder::new(context.app(), route(*manufacturer.id()))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        assert!(!context.manufacturer_exists(*manufacturer.id()).await);
    }

    #[tokio::test]
    async fn test_missing() {
        let context = TestContext::setup().await;
        context.create_driver_account("hello", "ABC12345").await;
        let token = context.login("hello").await;

        OneShotBuilder::new(context.into_app(), route(123))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("not found")
            .await;
    }

    test_payload_must_be_empty!(route(1));

    test_requires_bearer_auth!(route(1));
}
