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

//! API to query the list of cars.

use crate::driver::FleetDriver;
use crate::model::Car;
use crate::rest::httputils::get_bearer_auth;
use crate::rest::{EmptyBody, RestResult, REALM};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Query parameters accepted by this API.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Default, Serialize))]
pub(crate) struct ListCarsQuery {
    /// Case-insensitive substring to filter car models with.
    model: Option<String>,

    /// 1-based page to return.
    page: Option<u32>,
}

/// Message returned by the server with a page of cars.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize))]
pub(crate) struct ListCarsResponse {
    /// The cars in the requested page.
    cars: Vec<Car>,

    /// The page that was returned.
    page: u32,

    /// The model filter that was applied, if any.
    model: Option<String>,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<FleetDriver>,
    Query(query): Query<ListCarsQuery>,
    headers: HeaderMap,
    _: EmptyBody,
) -> RestResult<Json<ListCarsResponse>> {
    let token = get_bearer_auth(&headers, REALM)?;

    // An empty filter in the query string means "no filter".
    let model = query.model.filter(|model| !model.is_empty());
    let page = query.page.unwrap_or(1);

    let cars = driver.list_cars(token, model.as_deref(), page).await?;
    Ok(Json(ListCarsResponse { cars, page, model }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/api/cars".to_owned())
    }

    #[tokio::test]
    async fn test_pages() {
        let context = TestContext::setup().await;
        context.create_driver_account("hello", "ABC12345").await;
        let manufacturer = context.create_manufacturer("Forge Motors", "ES").await;
        for i in 0..7 {
            context.create_car(&format!("Model {}", i), &manufacturer).await;
        }
        let token = context.login("hello").await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<ListCarsResponse>()
            .await;
        assert_eq!(5, response.cars.len());
        assert_eq!(1, response.page);
        assert_eq!(None, response.model);

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_bearer_auth(token.as_str())
            .with_query(ListCarsQuery { page: Some(2), ..Default::default() })
            .send_empty()
            .await
            .expect_json::<ListCarsResponse>()
            .await;
        assert_eq!(2, response.cars.len());
        assert_eq!(2, response.page);
    }

    #[tokio::test]
    async fn test_filter_is_echoed() {
        let context = TestContext::setup().await;
        context.create_driver_account("hello", "ABC12345").await;
        let manufacturer = context.create_manufacturer("Forge Motors", "ES").await;
        context.create_car("Roadster", &manufacturer).await;
        context.create_car("Vagabond", &manufacturer).await;
        let token = context.login("hello").await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_bearer_auth(token.as_str())
            .with_query(ListCarsQuery { model: Some("ROAD".to_owned()), ..Default::default() })
            .send_empty()
            .await
            .expect_json::<ListCarsResponse>()
            .await;
        assert_eq!(
            vec!["Roadster"],
            response.cars.iter().map(|c| c.model().as_str()).collect::<Vec<&str>>()
        );
        assert_eq!(Some("ROAD".to_owned()), response.model);
    }

    test_payload_must_be_empty!(route());

    test_requires_bearer_auth!(route());
}
