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

//! API to create a new session for an existing driver account.

use crate::driver::{DriverError, FleetDriver};
use crate::model::AccessToken;
use crate::rest::httputils::get_basic_auth;
use crate::rest::{EmptyBody, RestError, RestResult, REALM};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;

/// Message returned by the server after a successful login attempt.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize))]
pub(crate) struct LoginResponse {
    /// Access token for this session.
    access_token: AccessToken,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<FleetDriver>,
    headers: HeaderMap,
    _: EmptyBody,
) -> RestResult<Json<LoginResponse>> {
    let (username, password) = get_basic_auth(&headers, REALM)?;

    // This is the only API where the challenge advertises basic authentication, given that the
    // caller does not have a token yet.
    let session = match driver.login(username, password).await {
        Ok(session) => session,
        Err(DriverError::Unauthorized(message)) => {
            return Err(RestError::Unauthorized { scheme: "Basic", realm: REALM, message });
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(LoginResponse { access_token: session.take_access_token() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/api/login".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        context.create_driver_account("hello", "ABC12345").await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_basic_auth("hello", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_json::<LoginResponse>()
            .await;

        assert!(context.session_exists(&response.access_token).await);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route())
            .with_basic_auth("hello", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("Unknown user")
            .await;
    }

    #[tokio::test]
    async fn test_invalid_password() {
        let context = TestContext::setup().await;
        context.create_driver_account("hello", "ABC12345").await;

        OneShotBuilder::new(context.into_app(), route())
            .with_basic_auth("hello", "this is not it")
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("Invalid password")
            .await;
    }

    #[tokio::test]
    async fn test_challenge_advertises_basic_scheme() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_header("WWW-Authenticate", "Basic realm=\"fleetd\"")
            .expect_error("Missing Authorization")
            .await;
    }

    test_payload_must_be_empty!(route());
}
