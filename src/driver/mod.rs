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

//! Business logic for the fleet management service.

use crate::clocks::Clock;
use crate::db::{self, Db, DbError, Executor};
use crate::env::get_optional_var;
use crate::model::{AccessToken, ModelError, Session};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

mod assignments;
mod cars;
mod dashboard;
mod drivers;
mod login;
mod logout;
mod manufacturers;
#[cfg(test)]
pub(crate) mod testutils;

pub(crate) use dashboard::DashboardSummary;

/// Number of entries returned by every paginated list operation.
pub(crate) const PAGE_SIZE: i64 = 5;

/// Default value for the `SESSION_MAX_AGE_SECONDS` setting when not specified.
const DEFAULT_SESSION_MAX_AGE_SECONDS: u64 = 24 * 60 * 60;

/// Business logic errors.  These errors encompass backend and logical errors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// Indicates that a request to create an entry failed because it already exists.
    #[error("{0}")]
    AlreadyExists(String),

    /// Catch-all error type for unexpected database errors.
    #[error("{0}")]
    BackendError(String),

    /// Indicates an error in the input data.
    #[error("{0}")]
    InvalidInput(String),

    /// Indicates that a requested entry does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that the caller is not allowed to perform the operation.
    #[error("{0}")]
    Unauthorized(String),
}

impl From<DbError> for DriverError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::AlreadyExists => DriverError::AlreadyExists(e.to_string()),
            DbError::BackendError(_) => DriverError::BackendError(e.to_string()),
            DbError::DataIntegrityError(_) => DriverError::BackendError(e.to_string()),
            DbError::NotFound => DriverError::NotFound(e.to_string()),
            DbError::Unavailable => DriverError::BackendError(e.to_string()),
        }
    }
}

impl From<ModelError> for DriverError {
    fn from(e: ModelError) -> Self {
        DriverError::InvalidInput(e.to_string())
    }
}

/// Result type for this module.
pub type DriverResult<T> = Result<T, DriverError>;

/// Configuration options for the fleet driver.
#[derive(Clone, Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct FleetOptions {
    /// The amount of time we consider sessions valid for.
    pub session_max_age: Duration,
}

impl Default for FleetOptions {
    fn default() -> Self {
        Self { session_max_age: Duration::from_secs(DEFAULT_SESSION_MAX_AGE_SECONDS) }
    }
}

impl FleetOptions {
    /// Creates a new set of options from environment variables.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            session_max_age: get_optional_var::<u64>(prefix, "SESSION_MAX_AGE_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or_else(|| Duration::from_secs(DEFAULT_SESSION_MAX_AGE_SECONDS)),
        })
    }
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub struct FleetDriver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Options for the fleet driver.
    opts: FleetOptions,
}

impl FleetDriver {
    /// Creates a new driver backed by the given dependencies.
    pub fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        opts: FleetOptions,
    ) -> Self {
        Self { db, clock, opts }
    }

    /// Obtains the current time from the driver.
    #[cfg(test)]
    pub(crate) fn now_utc(&self) -> OffsetDateTime {
        self.clock.now_utc()
    }

    /// Looks up the session identified by `token` and validates that it has not expired yet.
    ///
    /// Every operation other than `login` must call this before touching any entity, which is
    /// what makes the whole service inaccessible to anonymous callers.
    async fn get_session(
        &self,
        ex: &mut Executor,
        now: OffsetDateTime,
        token: &AccessToken,
    ) -> DriverResult<Session> {
        let session = match db::sessions::get_session(ex, token).await {
            Ok(session) => session,
            Err(DbError::NotFound) => {
                return Err(DriverError::Unauthorized("Invalid session".to_owned()))
            }
            Err(e) => return Err(e.into()),
        };

        let expired = session.login_time() < (now - self.opts.session_max_age);
        if expired {
            return Err(DriverError::Unauthorized(
                "Session expired; please log in again".to_owned(),
            ));
        }

        Ok(session)
    }
}

/// Clamps a 1-based page number to the offset of its first entry.
fn page_offset(page: u32) -> i64 {
    i64::from(page.max(1) - 1) * PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use super::*;
    use crate::model::{Password, Username};

    #[test]
    fn test_options_from_env_all_missing() {
        temp_env::with_var_unset("PREFIX_SESSION_MAX_AGE_SECONDS", || {
            let opts = FleetOptions::from_env("PREFIX").unwrap();
            assert_eq!(FleetOptions::default(), opts);
        });
    }

    #[test]
    fn test_options_from_env_all_present() {
        temp_env::with_var("PREFIX_SESSION_MAX_AGE_SECONDS", Some("600"), || {
            let opts = FleetOptions::from_env("PREFIX").unwrap();
            assert_eq!(FleetOptions { session_max_age: Duration::from_secs(600) }, opts);
        });
    }

    #[test]
    fn test_options_from_env_bad_type() {
        temp_env::with_var("PREFIX_SESSION_MAX_AGE_SECONDS", Some("10m"), || {
            FleetOptions::from_env("PREFIX").unwrap_err();
        });
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(0, page_offset(0));
        assert_eq!(0, page_offset(1));
        assert_eq!(5, page_offset(2));
        assert_eq!(20, page_offset(5));
    }

    #[tokio::test]
    async fn test_get_session_ok() {
        let context = TestContext::setup().await;
        context.create_test_driver("walter", "ABC12345").await;
        let token = context.do_login("walter").await;

        let mut ex = context.db().ex().await.unwrap();
        let now = context.clock.now_utc();
        let session = context.driver().get_session(&mut ex, now, &token).await.unwrap();
        assert_eq!(&Username::from("walter"), session.username());
    }

    #[tokio::test]
    async fn test_get_session_invalid_token() {
        let context = TestContext::setup().await;

        let mut ex = context.db().ex().await.unwrap();
        let now = context.clock.now_utc();
        let token = AccessToken::generate();
        match context.driver().get_session(&mut ex, now, &token).await {
            Err(DriverError::Unauthorized(msg)) => assert!(msg.contains("Invalid session")),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_get_session_expired() {
        let context = TestContext::setup().await;
        context.create_test_driver("walter", "ABC12345").await;
        let token = context.do_login("walter").await;

        context.clock.advance(Duration::from_secs(23 * 60 * 60));
        {
            let mut ex = context.db().ex().await.unwrap();
            let now = context.clock.now_utc();
            context.driver().get_session(&mut ex, now, &token).await.unwrap();
        }

        context.clock.advance(Duration::from_secs(2 * 60 * 60));
        let mut ex = context.db().ex().await.unwrap();
        let now = context.clock.now_utc();
        match context.driver().get_session(&mut ex, now, &token).await {
            Err(DriverError::Unauthorized(msg)) => assert!(msg.contains("expired")),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_operations_consume_the_driver() {
        let context = TestContext::setup().await;
        let err = context
            .driver()
            .login(Username::from("nobody"), Password::from("irrelevant"))
            .await
            .unwrap_err();
        assert_eq!(DriverError::Unauthorized("Unknown user".to_owned()), err);
    }
}
