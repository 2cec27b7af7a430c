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

//! REST handlers for the service.
//!
//! Every API is put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This may
//! seem overkill, but putting every API in its own file makes it easy to ensure all the
//! integration tests for the given API truly belong to that API.
//!
//! More specifically, the `tests` module within an API defines a `route` method that returns the
//! HTTP method and the API path under test.  All integration tests within the module then rely
//! on `route` to obtain this information, ensuring that they all test the desired API.

use crate::driver::{DriverError, FleetDriver};
use crate::model::ModelError;
use async_trait::async_trait;
use axum::body::HttpBody;
use axum::extract::{FromRequest, Request};
use axum::http::header::AsHeaderName;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

mod car_delete;
mod car_get;
mod car_put;
mod car_toggle_assign_post;
mod cars_get;
mod cars_post;
mod dashboard_get;
mod driver_delete;
mod driver_get;
mod driver_license_put;
mod drivers_get;
mod drivers_post;
pub(crate) mod httputils;
mod login_post;
mod logout_post;
mod manufacturer_delete;
mod manufacturer_put;
mod manufacturers_get;
mod manufacturers_post;
#[cfg(test)]
pub(crate) mod testutils;

/// Authentication realm returned in `WWW-Authenticate` challenges.
pub(crate) const REALM: &str = "fleetd";

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum RestError {
    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,

    /// Indicates an authentication problem.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Expected authorization scheme.
        scheme: &'static str,

        /// Expected authorization realm.
        realm: &'static str,

        /// Descriptive message explaining the nature of the problem.
        message: String,
    },
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::AlreadyExists(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::InvalidInput(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
            DriverError::Unauthorized(msg) => {
                RestError::Unauthorized { scheme: "Bearer", realm: REALM, message: msg }
            }
        }
    }
}

impl From<ModelError> for RestError {
    fn from(e: ModelError) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let status;
        let mut headers = HeaderMap::new();
        match &self {
            RestError::InternalError(_) => {
                status = http::StatusCode::INTERNAL_SERVER_ERROR;
            }
            RestError::InvalidRequest(_) => {
                status = http::StatusCode::BAD_REQUEST;
            }
            RestError::NotFound(_) => {
                status = http::StatusCode::NOT_FOUND;
            }
            RestError::PayloadNotEmpty => {
                status = http::StatusCode::PAYLOAD_TOO_LARGE;
            }
            RestError::Unauthorized { scheme, realm, message: _ } => {
                status = http::StatusCode::UNAUTHORIZED;
                headers.insert(
                    "WWW-Authenticate",
                    format!("{} realm=\"{}\"", scheme, realm)
                        .parse()
                        .unwrap_or_else(|_| HeaderValue::from_static("Bearer")),
                );
            }
        };

        let response = ErrorResponse { message: self.to_string() };

        (status, headers, Json(response)).into_response()
    }
}

/// Result type for this module.
pub(crate) type RestResult<T> = Result<T, RestError>;

/// Representation of the details of an error response.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ErrorResponse {
    /// Textual representation of the error message.
    pub(crate) message: String,
}

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data that we
/// don't care about.  This future-proofs the service.
pub(crate) struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// Extracts the header `name` from `headers` and ensures it has at most one value.
pub(crate) fn get_unique_header<K: AsHeaderName + Copy>(
    headers: &HeaderMap,
    name: K,
) -> RestResult<Option<&HeaderValue>> {
    let mut iter = headers.get_all(name).iter();
    let value = iter.next();
    if iter.next().is_some() {
        return Err(RestError::InvalidRequest(format!(
            "Header {} cannot have more than one value",
            name.as_str()
        )));
    }
    Ok(value)
}

/// Creates the router for the application.
pub(crate) fn app(driver: FleetDriver) -> Router {
    use axum::routing::{get, post, put};
    Router::new()
        .route("/api/login", post(login_post::handler))
        .route("/api/logout", post(logout_post::handler))
        .route("/api/dashboard", get(dashboard_get::handler))
        .route(
            "/api/manufacturers",
            get(manufacturers_get::handler).post(manufacturers_post::handler),
        )
        .route(
            "/api/manufacturers/:id",
            put(manufacturer_put::handler).delete(manufacturer_delete::handler),
        )
        .route("/api/cars", get(cars_get::handler).post(cars_post::handler))
        .route(
            "/api/cars/:id",
            get(car_get::handler).put(car_put::handler).delete(car_delete::handler),
        )
        .route("/api/cars/:id/toggle-assign", post(car_toggle_assign_post::handler))
        .route("/api/drivers", get(drivers_get::handler).post(drivers_post::handler))
        .route("/api/drivers/:id", get(driver_get::handler).delete(driver_delete::handler))
        .route("/api/drivers/:id/license", put(driver_license_put::handler))
        .with_state(driver)
}
