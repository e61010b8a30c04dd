//! A single probed service.

use std::fmt;

use crate::config::ServiceConfig;

/// Route answering the liveness probe.
pub const HEALTH_PATH: &str = "/health";

/// Route answering the workload probe.
pub const WORK_PATH: &str = "/work";

/// A probed service. Its name is the `app` label of every metric it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    name: String,
    base_url: String,
}

impl Target {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            name: name.into(),
            base_url,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the liveness route.
    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, HEALTH_PATH)
    }

    /// URL of the workload route.
    pub fn work_url(&self) -> String {
        format!("{}{}", self.base_url, WORK_PATH)
    }
}

impl From<&ServiceConfig> for Target {
    fn from(config: &ServiceConfig) -> Self {
        Target::new(config.name.clone(), config.url.clone())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.base_url)
    }
}
