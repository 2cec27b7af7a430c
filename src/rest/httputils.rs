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

//! Utilities to deal with HTTP authorization.

use crate::model::{AccessToken, Password, Username};
use crate::rest::{get_unique_header, RestError, RestResult};
use base64::engine::general_purpose;
use base64::Engine;
use http::header::HeaderMap;

/// Validates that the `Authorization` HTTP header contains a textual payload for the
/// `exp_scheme` scheme and returns it.
fn get_authorization_header<'a>(
    headers: &'a HeaderMap,
    exp_scheme: &'static str,
    exp_realm: &'static str,
) -> RestResult<&'a str> {
    let authz = match get_unique_header(headers, "Authorization") {
        Ok(Some(value)) => value,
        Ok(None) => {
            return Err(RestError::Unauthorized {
                scheme: exp_scheme,
                realm: exp_realm,
                message: "Missing Authorization header".to_owned(),
            });
        }
        Err(e) => {
            return Err(RestError::Unauthorized {
                scheme: exp_scheme,
                realm: exp_realm,
                message: e.to_string(),
            });
        }
    };

    let authz = match authz.to_str() {
        Ok(value) => value,
        Err(e) => {
            return Err(RestError::Unauthorized {
                scheme: exp_scheme,
                realm: exp_realm,
                message: format!("Bad encoding in Authorization header: {}", e),
            });
        }
    };

    let mut fields = authz.splitn(2, ' ');
    let scheme = match fields.next() {
        Some(s) if !s.is_empty() => s,
        _ => {
            return Err(RestError::Unauthorized {
                scheme: exp_scheme,
                realm: exp_realm,
                message: "Bad Authorization header: missing scheme".to_owned(),
            });
        }
    };
    let payload = match fields.next() {
        Some(s) => s,
        None => {
            return Err(RestError::Unauthorized {
                scheme: exp_scheme,
                realm: exp_realm,
                message: "Bad Authorization header: missing payload".to_owned(),
            });
        }
    };
    assert!(fields.next().is_none());

    if scheme != exp_scheme {
        return Err(RestError::Unauthorized {
            scheme: exp_scheme,
            realm: exp_realm,
            message: "Unsupported scheme".to_owned(),
        });
    }

    Ok(payload)
}

/// Assumes that the `headers` contain basic authentication credentials and extracts them.
pub(crate) fn get_basic_auth(
    headers: &HeaderMap,
    exp_realm: &'static str,
) -> RestResult<(Username, Password)> {
    let base64_payload = get_authorization_header(headers, "Basic", exp_realm)?;

    let payload = match general_purpose::STANDARD.decode(base64_payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            return Err(RestError::Unauthorized {
                scheme: "Basic",
                realm: exp_realm,
                message: format!("Bad base64 encoding in payload: {}", e),
            });
        }
    };

    // Both the username and the password have to be strings, so it is easier to convert the
    // payload first in one go instead of doing two conversions after splitting the bytes.
    let payload = match String::from_utf8(payload) {
        Ok(s) => s,
        Err(e) => {
            return Err(RestError::Unauthorized {
                scheme: "Basic",
                realm: exp_realm,
                message: format!("Bad UTF-8 encoding in payload: {}", e),
            });
        }
    };

    let split = match payload.chars().position(|x| x == ':') {
        Some(index) => index,
        None => {
            return Err(RestError::Unauthorized {
                scheme: "Basic",
                realm: exp_realm,
                message: "Bad content".to_owned(),
            });
        }
    };

    let (username, password) = payload.split_at(split);
    let password = &password[1..];

    Ok((Username::new(username)?, Password::new(password)?))
}

/// Assumes that the `headers` contain a bearer access token and extracts it.
pub(crate) fn get_bearer_auth(
    headers: &HeaderMap,
    exp_realm: &'static str,
) -> RestResult<AccessToken> {
    let payload = get_authorization_header(headers, "Bearer", exp_realm)?;
    match AccessToken::new(payload) {
        Ok(token) => Ok(token),
        Err(e) => Err(RestError::Unauthorized {
            scheme: "Bearer",
            realm: exp_realm,
            message: e.to_string(),
        }),
    }
}
