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

//! The `LicenseNumber` data type.

use crate::model::{ModelError, ModelResult};
use serde::{de::Visitor, Deserialize, Serialize};

/// Length of a license number: 3 letters followed by 5 digits.
const LICENSE_LENGTH: usize = 8;

/// Represents a correctly-formatted driver's license number.
///
/// License numbers are exactly 8 characters long: the first 3 are uppercase ASCII letters and
/// the last 5 are ASCII digits.  Lowercase letters are rejected, not folded.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub(crate) struct LicenseNumber(String);

impl LicenseNumber {
    /// Creates a new license number from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.len() != LICENSE_LENGTH {
            return Err(ModelError(format!(
                "License number must be {} characters long",
                LICENSE_LENGTH
            )));
        }

        let bytes = s.as_bytes();
        if !bytes[0..3].iter().all(|b| b.is_ascii_uppercase()) {
            return Err(ModelError(
                "First 3 characters of a license number must be uppercase letters".to_owned(),
            ));
        }
        if !bytes[3..8].iter().all(|b| b.is_ascii_digit()) {
            return Err(ModelError(
                "Last 5 characters of a license number must be digits".to_owned(),
            ));
        }

        Ok(Self(s))
    }

    /// Returns a string view of the license number.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
impl From<&'static str> for LicenseNumber {
    /// Creates a new license number from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        LicenseNumber::new(s).expect("Hardcoded license numbers must be valid")
    }
}

/// A deserialization visitor for a `LicenseNumber`.
struct LicenseNumberVisitor;

impl Visitor<'_> for LicenseNumberVisitor {
    type Value = LicenseNumber;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        LicenseNumber::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        LicenseNumber::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for LicenseNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(LicenseNumberVisitor)
    }
}
