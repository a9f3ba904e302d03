//! Registration configuration.
//!
//! Domain and task-list placement is passed explicitly at registration
//! time instead of being read off the executable's type; defaults are
//! resolved once, when the executable is registered.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Domain used when a registration does not name one.
pub const DEFAULT_DOMAIN: &str = "default";

/// Task list used when a registration does not name one.
pub const DEFAULT_TASK_LIST: &str = "default";

/// Per-registration overrides for an executable's name and placement.
///
/// Every field is optional; unset fields fall back to the executable's own
/// `name()` and the `DEFAULT_DOMAIN`/`DEFAULT_TASK_LIST` constants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableConfig {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub task_list: Option<String>,
}

impl ExecutableConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_task_list(mut self, task_list: impl Into<String>) -> Self {
        self.task_list = Some(task_list.into());
        self
    }
}

/// The (domain, task list) pair partitioning lookups, pollers, and
/// concurrency isolation. Work registered under one key never competes
/// for a poller slot with another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationKey {
    domain: String,
    task_list: String,
}

impl RegistrationKey {
    pub fn new(
        domain: impl Into<String>,
        task_list: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let domain = domain.into();
        let task_list = task_list.into();

        if domain.is_empty() {
            return Err(ConfigurationError::EmptyDomain);
        }
        if task_list.is_empty() {
            return Err(ConfigurationError::EmptyTaskList);
        }

        Ok(Self { domain, task_list })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn task_list(&self) -> &str {
        &self.task_list
    }
}

impl std::fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.domain, self.task_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_key_rejects_empty_parts() {
        assert!(matches!(
            RegistrationKey::new("", "tasks"),
            Err(ConfigurationError::EmptyDomain)
        ));
        assert!(matches!(
            RegistrationKey::new("domain", ""),
            Err(ConfigurationError::EmptyTaskList)
        ));

        let key = RegistrationKey::new("domain", "tasks").unwrap();
        assert_eq!(key.domain(), "domain");
        assert_eq!(key.task_list(), "tasks");
    }
}
