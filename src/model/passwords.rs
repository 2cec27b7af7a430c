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

//! The `Password` and `HashedPassword` data types.

use crate::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque type to hold a password, protecting it from leaking into logs.
#[derive(Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
#[cfg_attr(test, derive(Clone))]
pub(crate) struct Password(String);

impl Password {
    /// Creates a new password from a literal string.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.len() > 56 {
            return Err(ModelError("Password is too long".to_owned()));
        }
        Ok(Password(s))
    }

    /// Returns a string view of the password.
    #[cfg(test)]
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// Hashes the password after validating that it is sufficiently complex via the `validator`
    /// hook.  Consumes the password because there is no context in which keeping the password
    /// alive once we have generated its hash is correct.
    pub(crate) fn validate_and_hash(
        self,
        validator: fn(&str) -> Option<&'static str>,
    ) -> ModelResult<HashedPassword> {
        if let Some(error) = validator(&self.0) {
            return Err(ModelError(format!("Weak password: {}", error)));
        }
        let hashed =
            bcrypt::hash(self.0, 10).map_err(|e| ModelError(format!("Password error: {}", e)))?;
        Ok(HashedPassword::new(hashed))
    }

    /// Verifies if this password matches a given `hash`.
    pub(crate) fn verify(self, hash: &HashedPassword) -> ModelResult<bool> {
        bcrypt::verify(self.0, hash.as_str())
            .map_err(|e| ModelError(format!("Password error: {}", e)))
    }
}

#[cfg(test)]
impl From<&'static str> for Password {
    /// Creates a new password from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        Password::new(s).expect("Hardcoded passwords must be valid")
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed password")
    }
}

/// An opaque type to hold a hashed password, protecting it from leaking into logs.
#[derive(PartialEq)]
#[cfg_attr(test, derive(Clone))]
pub(crate) struct HashedPassword(String);

impl HashedPassword {
    /// Creates a new hashed password from a literal string.
    pub(crate) fn new<S: Into<String>>(s: S) -> Self {
        HashedPassword(s.into())
    }

    /// Returns a string view of the hash.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed hash")
    }
}
