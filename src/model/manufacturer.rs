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

//! The `Manufacturer` data type.

use derive_getters::Getters;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// Representation of a car manufacturer.
#[derive(Clone, Constructor, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize))]
pub(crate) struct Manufacturer {
    /// Identifier assigned by the database.
    id: i32,

    /// Name of the manufacturer, unique across all manufacturers.
    name: String,

    /// Country the manufacturer operates from.
    country: String,
}
