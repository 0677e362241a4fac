use std::{env, fmt, time::Duration};

use super::error::Error;

/// Connection settings for a Workday tenant. `host`, `user_name`, `tenant` and
/// `password` are required; a client refuses to start without them.
#[derive(Clone, Default)]
pub struct Configuration {
    pub host: Option<String>,
    pub user_name: Option<String>,
    pub tenant: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<Duration>,
}

/// Validated form of [`Configuration`].
#[derive(Clone)]
pub(crate) struct Credentials {
    pub host: String,
    pub user_name: String,
    pub tenant: String,
    pub password: String,
}

impl Configuration {
    pub fn new(
        host: impl Into<String>,
        user_name: impl Into<String>,
        tenant: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: Some(host.into()),
            user_name: Some(user_name.into()),
            tenant: Some(tenant.into()),
            password: Some(password.into()),
            timeout: None,
        }
    }

    /// Reads `WWS_HOST`, `WWS_USER_NAME`, `WWS_TENANT`, `WWS_PASSWORD` and
    /// `WWS_TIMEOUT_SECS`. Unset variables stay unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        Self {
            host: lookup("WWS_HOST"),
            user_name: lookup("WWS_USER_NAME"),
            tenant: lookup("WWS_TENANT"),
            password: lookup("WWS_PASSWORD"),
            timeout: lookup("WWS_TIMEOUT_SECS")
                .and_then(|secs| secs.parse().ok())
                .map(Duration::from_secs),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn validate(&self) -> Result<Credentials, Error> {
        Ok(Credentials {
            host: required("Host", &self.host)?,
            user_name: required("UserName", &self.user_name)?,
            tenant: required("Tenant", &self.tenant)?,
            password: required("Password", &self.password)?,
        })
    }
}

fn required(field: &'static str, value: &Option<String>) -> Result<String, Error> {
    value.clone().ok_or(Error::MissingConfiguration(field))
}

fn redacted(password: &Option<String>) -> Option<&'static str> {
    password.as_ref().map(|_| "***")
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("host", &self.host)
            .field("user_name", &self.user_name)
            .field("tenant", &self.tenant)
            .field("password", &redacted(&self.password))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("user_name", &self.user_name)
            .field("tenant", &self.tenant)
            .field("password", &"***")
            .finish()
    }
}
