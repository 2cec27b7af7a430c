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

//! High-level data types for the fleet domain.

mod car;
mod driver;
mod license;
mod manufacturer;
mod passwords;
mod session;
mod token;
mod username;

pub(crate) use car::{Car, CarDetail};
pub(crate) use driver::{Driver, DriverDetail};
pub(crate) use license::LicenseNumber;
pub(crate) use manufacturer::Manufacturer;
pub(crate) use passwords::{HashedPassword, Password};
pub(crate) use session::Session;
pub(crate) use token::AccessToken;
pub(crate) use username::Username;

/// An error in the validation of model data.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub(crate) struct ModelError(pub(crate) String);

/// Result type for model validation errors.
pub(crate) type ModelResult<T> = Result<T, ModelError>;
