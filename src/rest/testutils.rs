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

//! Test utilities for the REST API.

use crate::clocks::testutils::{utc_datetime, SettableClock};
use crate::clocks::Clock;
use crate::db::{self, init_schema, Db, DbError};
use crate::driver::{FleetDriver, FleetOptions};
use crate::model::{
    AccessToken, Car, Driver, LicenseNumber, Manufacturer, Password, Session, Username,
};
use crate::rest::{app, ErrorResponse};
use axum::extract::Request;
use axum::http::{self, HeaderName, HeaderValue};
use axum::Router;
use base64::engine::general_purpose;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Maximum body size for testing purposes.
const MAX_BODY_SIZE: usize = 10 * 1024;

/// Password assigned to every account created by `TestContext::create_driver_account`.
pub(crate) const TEST_PASSWORD: &str = "the password";

/// State of a running REST test: the in-memory database, the fake clock and the router.
pub(crate) struct TestContext {
    /// The in-memory database shared by the app and the test code.
    db: Arc<dyn Db + Send + Sync>,

    /// The fake clock given to the driver behind the app.
    pub(crate) clock: Arc<SettableClock>,

    /// The router under test.
    app: Router,
}

impl TestContext {
    /// Initializes the database, the driver and the router with default options.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::from(db::sqlite::testutils::setup().await);
        {
            let mut ex = db.ex().await.unwrap();
            init_schema(&mut ex).await.unwrap();
        }
        let clock = Arc::from(SettableClock::new(utc_datetime(2024, 6, 9, 14, 30, 0)));
        let driver = FleetDriver::new(db.clone(), clock.clone(), FleetOptions::default());
        let app = app(driver);
        Self { db, clock, app }
    }

    /// Returns a clone of the router under test.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the router under test.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Creates a driver account named `username` with `TEST_PASSWORD` as its password and
    /// `license` as its license number.
    pub(crate) async fn create_driver_account(&self, username: &str, license: &str) -> Driver {
        let password = Password::new(TEST_PASSWORD).unwrap();
        let hashed = password.validate_and_hash(|_| None).unwrap();
        let mut ex = self.db.ex().await.unwrap();
        db::users::create_user(
            &mut ex,
            Username::new(username).unwrap(),
            hashed,
            "Test".to_owned(),
            "Driver".to_owned(),
            LicenseNumber::new(license).unwrap(),
        )
        .await
        .unwrap()
    }

    /// Creates a session for the previously-created account `username` and returns its token.
    pub(crate) async fn login(&self, username: &str) -> AccessToken {
        let token = AccessToken::generate();
        let session = Session::new(
            token.clone(),
            Username::new(username).unwrap(),
            self.clock.now_utc(),
            0,
        );
        let mut ex = self.db.ex().await.unwrap();
        db::sessions::put_session(&mut ex, &session).await.unwrap();
        token
    }

    /// Checks if the session identified by `token` exists.
    pub(crate) async fn session_exists(&self, token: &AccessToken) -> bool {
        let mut ex = self.db.ex().await.unwrap();
        match db::sessions::get_session(&mut ex, token).await {
            Ok(_) => true,
            Err(DbError::NotFound) => false,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Creates a manufacturer directly in the database.
    pub(crate) async fn create_manufacturer(&self, name: &str, country: &str) -> Manufacturer {
        let mut ex = self.db.ex().await.unwrap();
        db::manufacturers::create_manufacturer(&mut ex, name.to_owned(), country.to_owned())
            .await
            .unwrap()
    }

    /// Checks if the manufacturer with identifier `id` exists.
    pub(crate) async fn manufacturer_exists(&self, id: i32) -> bool {
        let mut ex = self.db.ex().await.unwrap();
        match db::manufacturers::get_manufacturer(&mut ex, id).await {
            Ok(_) => true,
            Err(DbError::NotFound) => false,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Creates a car of `model` built by `manufacturer` directly in the database.
    pub(crate) async fn create_car(&self, model: &str, manufacturer: &Manufacturer) -> Car {
        let mut ex = self.db.ex().await.unwrap();
        let id = db::cars::create_car(&mut ex, model, *manufacturer.id()).await.unwrap();
        Car::new(id, model.to_owned(), manufacturer.clone())
    }

    /// Checks if the car with identifier `id` exists.
    pub(crate) async fn car_exists(&self, id: i32) -> bool {
        let mut ex = self.db.ex().await.unwrap();
        match db::cars::get_car(&mut ex, id).await {
            Ok(_) => true,
            Err(DbError::NotFound) => false,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Checks if the driver with identifier `id` exists.
    pub(crate) async fn driver_exists(&self, id: i32) -> bool {
        let mut ex = self.db.ex().await.unwrap();
        match db::users::get_driver(&mut ex, id).await {
            Ok(_) => true,
            Err(DbError::NotFound) => false,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Assigns `driver` to `car` directly in the database.
    pub(crate) async fn assign(&self, car: &Car, driver: &Driver) {
        let mut ex = self.db.ex().await.unwrap();
        db::assignments::add_assignment(&mut ex, *car.id(), *driver.id()).await.unwrap();
    }

    /// Lists the drivers assigned to `car` directly from the database.
    pub(crate) async fn drivers_of_car(&self, car: &Car) -> Vec<Driver> {
        let mut ex = self.db.ex().await.unwrap();
        db::assignments::drivers_of_car(&mut ex, *car.id()).await.unwrap()
    }
}

/// Builder for a single request to the API server.
#[must_use]
pub(crate) struct OneShotBuilder {
    /// The router for the app being tested.
    app: Router,

    /// Builder for the request that will be sent to the app.
    builder: axum::http::request::Builder,
}

impl OneShotBuilder {
    /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
    pub(crate) fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
        let builder = Request::builder().method(method).uri(uri.as_ref());
        Self { app, builder }
    }

    /// Extends the URI in the request with a `query`.
    pub(crate) fn with_query<Q: Serialize>(mut self, query: Q) -> Self {
        let uri = self.builder.uri_ref().unwrap().to_string();
        assert!(!uri.contains('?'), "URI already contains a query: {}", uri);
        self.builder =
            self.builder.uri(format!("{}?{}", uri, serde_urlencoded::to_string(query).unwrap()));
        self
    }

    /// Adds basic authentication to the request.
    pub(crate) fn with_basic_auth<U, P>(mut self, username: U, password: P) -> Self
    where
        U: fmt::Display,
        P: fmt::Display,
    {
        let value = format!(
            "Basic {}",
            general_purpose::STANDARD.encode(format!("{}:{}", username, password))
        );
        self.builder = self.builder.header(http::header::AUTHORIZATION, value);
        self
    }

    /// Adds bearer authentication to the request.
    pub(crate) fn with_bearer_auth<T>(mut self, token: T) -> Self
    where
        T: fmt::Display,
    {
        let value = format!("Bearer {}", token);
        self.builder = self.builder.header(http::header::AUTHORIZATION, value);
        self
    }

    /// Sets the header `name` to `value` in the outgoing request.
    #[allow(unused)]
    pub(crate) fn with_header<K, V>(mut self, name: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Finishes building the request and sends it with an empty payload.
    pub(crate) async fn send_empty(self) -> ResponseChecker {
        let request = self.builder.body(axum::body::Body::empty()).unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }

    /// Finishes building the request and sends it with a text payload.
    pub(crate) async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
        let request = self
            .builder
            .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
            .body(axum::body::Body::from(text.into()))
            .unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }

    /// Finishes building the request and sends it with a JSON payload.
    pub(crate) async fn send_json<T: Serialize>(self, request: T) -> ResponseChecker {
        let request = self
            .builder
            .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(axum::body::Body::from(serde_json::to_vec(&request).unwrap()))
            .unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }
}

/// Type alias for the complex type returned by the `oneshot` function.
type HttpResponse = hyper::Response<axum::body::Body>;

/// Validator for the outcome of a request sent by a `OneShotBuilder`.
#[must_use]
pub(crate) struct ResponseChecker {
    /// Actual response that we received from the app.
    response: HttpResponse,

    /// Expected HTTP status code in the response above.
    exp_status: http::StatusCode,
}

impl From<HttpResponse> for ResponseChecker {
    fn from(response: HttpResponse) -> Self {
        Self { response, exp_status: http::StatusCode::OK }
    }
}

impl ResponseChecker {
    /// Sets the expected exit HTTP status to `status`.
    pub(crate) fn expect_status(mut self, status: http::StatusCode) -> Self {
        self.exp_status = status;
        self
    }

    /// Performs common validation operations on the response.
    pub(crate) fn verify(&self) {
        assert_eq!(self.exp_status, self.response.status());
    }

    /// Ensures that the response carries the header `name` with value `exp_value`.
    pub(crate) fn expect_header(self, name: &str, exp_value: &str) -> Self {
        match self.response.headers().get(name) {
            Some(value) => assert_eq!(exp_value, value.to_str().unwrap()),
            None => panic!("Response does not carry header {}", name),
        }
        self
    }

    /// Finishes checking the response and expects it to contain an empty body.
    pub(crate) async fn expect_empty(self) {
        self.verify();

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.is_empty(), "Body not empty; got {}", body);
    }

    /// Finishes checking the response and expects its body to be an `ErrorResponse` that
    /// matches `exp_re`.
    pub(crate) async fn expect_error(self, exp_re: &str) {
        self.verify();

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        let response: ErrorResponse = match serde_json::from_slice(&body) {
            Ok(response) => response,
            Err(e) => {
                let body = String::from_utf8(body.to_vec()).unwrap();
                panic!("Invalid error response due to {}; content was {}", e, body);
            }
        };
        let re = regex::Regex::new(exp_re).unwrap();
        assert!(
            re.is_match(&response.message),
            "Response content '{:?}' does not match re '{}'",
            response,
            exp_re
        );
    }

    /// Finishes checking the response and expects it to contain a valid JSON object of type `T`.
    pub(crate) async fn expect_json<T: DeserializeOwned>(self) -> T {
        self.verify();

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        serde_json::from_slice::<T>(&body).unwrap()
    }
}

/// Generates a test to verify that an API that does not expect a payload fails as necessary.
macro_rules! test_payload_must_be_empty {
    ( $route:expr ) => {
        #[tokio::test]
        async fn test_payload_must_be_empty() {
            let context = TestContext::setup().await;
            OneShotBuilder::new(context.into_app(), $route)
                .send_text("should not be here")
                .await
                .expect_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE)
                .expect_error("should be empty")
                .await;
        }
    };
}

pub(crate) use test_payload_must_be_empty;

/// Generates a test to verify that an API rejects requests without a bearer token.  APIs that
/// expect a JSON payload must provide one so that the check exercises the handler itself.
macro_rules! test_requires_bearer_auth {
    ( $route:expr ) => {
        #[tokio::test]
        async fn test_requires_bearer_auth() {
            let context = TestContext::setup().await;
            OneShotBuilder::new(context.into_app(), $route)
                .send_empty()
                .await
                .expect_status(axum::http::StatusCode::UNAUTHORIZED)
                .expect_error("Missing Authorization")
                .await;
        }
    };
    ( $route:expr, $body:expr ) => {
        #[tokio::test]
        async fn test_requires_bearer_auth() {
            let context = TestContext::setup().await;
            OneShotBuilder::new(context.into_app(), $route)
                .send_json($body)
                .await
                .expect_status(axum::http::StatusCode::UNAUTHORIZED)
                .expect_error("Missing Authorization")
                .await;
        }
    };
}

pub(crate) use test_requires_bearer_auth;
