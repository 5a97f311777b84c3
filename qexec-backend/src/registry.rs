//! Named backend lookup

use crate::backend::{SimulationBackend, StateVectorBackend};
use crate::{BackendError, Result};
use std::sync::Arc;
use tracing::warn;

/// Backend selected when no name is configured
pub const DEFAULT_BACKEND: &str = StateVectorBackend::SEQUENTIAL;

/// Registry of simulation backends keyed by name
///
/// # Example
/// ```
/// use qexec_backend::BackendRegistry;
///
/// let registry = BackendRegistry::with_defaults();
/// assert_eq!(registry.names(), vec!["statevector", "statevector-parallel"]);
///
/// // Unknown names fall back to the default
/// assert_eq!(registry.resolve("quantum-annealer").unwrap().name(), "statevector");
/// ```
#[derive(Debug)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn SimulationBackend>>,
    default_name: String,
}

impl BackendRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
            default_name: DEFAULT_BACKEND.to_string(),
        }
    }

    /// Registry holding the sequential and parallel state-vector backends
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(StateVectorBackend::sequential()));
        registry.register(Arc::new(StateVectorBackend::parallel()));
        registry
    }

    /// Add a backend, replacing any existing one with the same name
    pub fn register(&mut self, backend: Arc<dyn SimulationBackend>) {
        match self.backends.iter_mut().find(|b| b.name() == backend.name()) {
            Some(slot) => *slot = backend,
            None => self.backends.push(backend),
        }
    }

    /// Change the fallback backend
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        if self.get(name).is_none() {
            return Err(BackendError::BackendNotFound(name.to_string()));
        }
        self.default_name = name.to_string();
        Ok(())
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Backend registered under `name`
    pub fn get(&self, name: &str) -> Option<Arc<dyn SimulationBackend>> {
        self.backends.iter().find(|b| b.name() == name).cloned()
    }

    /// The default backend, or the first registered if the default is absent
    pub fn default_backend(&self) -> Result<Arc<dyn SimulationBackend>> {
        self.get(&self.default_name)
            .or_else(|| self.backends.first().cloned())
            .ok_or(BackendError::EmptyRegistry)
    }

    /// Backend named `name`, falling back to the default with a warning
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn SimulationBackend>> {
        if let Some(backend) = self.get(name) {
            return Ok(backend);
        }
        let fallback = self.default_backend()?;
        warn!(
            requested = name,
            fallback = fallback.name(),
            "unknown backend, using default"
        );
        Ok(fallback)
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_is_an_error() {
        let registry = BackendRegistry::new();
        assert!(matches!(registry.resolve("statevector"), Err(BackendError::EmptyRegistry)));
        assert!(matches!(registry.default_backend(), Err(BackendError::EmptyRegistry)));
    }

    #[test]
    fn test_lookup_by_name() {
        let registry = BackendRegistry::with_defaults();
        assert_eq!(
            registry.resolve("statevector-parallel").unwrap().name(),
            "statevector-parallel"
        );
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = BackendRegistry::with_defaults();
        registry.register(Arc::new(StateVectorBackend::sequential().without_batching()));
        assert_eq!(registry.len(), 2);
        assert!(!registry.get("statevector").unwrap().supports_batching());
    }

    #[test]
    fn test_set_default() {
        let mut registry = BackendRegistry::with_defaults();
        registry.set_default("statevector-parallel").unwrap();
        assert_eq!(registry.resolve("nope").unwrap().name(), "statevector-parallel");
        assert!(registry.set_default("nope").is_err());
        assert_eq!(registry.default_name(), "statevector-parallel");
    }

    #[test]
    fn test_default_absent_uses_first() {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(StateVectorBackend::new("custom", "test", false)));
        assert_eq!(registry.default_backend().unwrap().name(), "custom");
    }
}
