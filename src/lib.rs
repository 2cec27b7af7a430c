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

//! Fleet management service: manufacturers, cars, drivers and the
//! many-to-many assignment between the last two.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use crate::clocks::SystemClock;
use crate::db::Db;
use crate::driver::{FleetDriver, FleetOptions};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub mod clocks;
pub mod db;
pub mod driver;
pub mod env;
pub(crate) mod model;
mod rest;
use rest::app;

/// Instantiates all resources to serve the application on `bind_addr` against `db`.
///
/// The database schema must have been initialized before calling this function.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
    opts: FleetOptions,
) -> Result<(), Box<dyn Error>> {
    let clock = Arc::from(SystemClock::default());
    let driver = FleetDriver::new(db, clock, opts);
    let app = app(driver);

    let listener = tokio::net::TcpListener::bind(bind_addr.into()).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
