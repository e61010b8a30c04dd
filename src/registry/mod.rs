//! Target registry.
//!
//! # Responsibilities
//! - Hold the fixed, ordered list of probed services
//! - Carry the global [`MonitorPolicy`]
//!
//! Built once from a validated [`MonitorConfig`]; name uniqueness is
//! checked by config validation, not here.

pub mod policy;
pub mod target;

pub use policy::MonitorPolicy;
pub use target::Target;

use crate::config::MonitorConfig;

/// Ordered, immutable set of targets.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: Vec<Target>,
}

impl TargetRegistry {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        let targets = config.services.iter().map(Target::from).collect();
        Self { targets }
    }

    /// Targets in registry (probing) order.
    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl<'a> IntoIterator for &'a TargetRegistry {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    #[test]
    fn test_registry_keeps_config_order() {
        let mut config = MonitorConfig::default();
        for name in ["c", "a", "b"] {
            config.services.push(ServiceConfig {
                name: name.into(),
                url: format!("http://{name}:80"),
            });
        }
        let registry = TargetRegistry::from_config(&config);
        let names: Vec<_> = registry.iter().map(Target::name).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }
}
