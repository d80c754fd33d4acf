//! Name → algorithm registry

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use super::{Algorithm, EdDSA, SharedAlgorithm, HS256, HS384, HS512};

/// Registry of authentication algorithms, keyed by upper-cased name
///
/// Lookups take a shared lock and never block each other; registration takes
/// the exclusive lock. A registry is normally filled once at startup and then
/// shared (e.g. behind an `Arc`) with every [`Parser`](crate::Parser).
#[derive(Default)]
pub struct AlgorithmRegistry {
    algorithms: RwLock<HashMap<String, SharedAlgorithm>>,
}

impl AlgorithmRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in algorithms
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_builtin();
        registry
    }

    /// Register `HS256`, `HS384`, `HS512` and `EDDSA`
    pub fn register_builtin(&self) {
        self.register(HS256);
        self.register(HS384);
        self.register(HS512);
        self.register(EdDSA);
    }

    /// Register an algorithm under its upper-cased name
    ///
    /// A previous registration under the same name is replaced.
    pub fn register(&self, algorithm: impl Algorithm + 'static) {
        self.register_shared(Arc::new(algorithm));
    }

    /// Register an already shared algorithm
    pub fn register_shared(&self, algorithm: SharedAlgorithm) {
        let name = algorithm.name().to_uppercase();
        let mut algorithms = self
            .algorithms
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if algorithms.insert(name.clone(), algorithm).is_some() {
            if is_builtin(&name) {
                warn!(algorithm = %name, "replaced built-in algorithm");
            } else {
                debug!(algorithm = %name, "replaced registered algorithm");
            }
        } else {
            debug!(algorithm = %name, "registered algorithm");
        }
    }

    /// Look up an algorithm by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<SharedAlgorithm> {
        self.algorithms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name.to_uppercase())
            .cloned()
    }

    /// Whether an algorithm is registered under the name (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.algorithms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&name.to_uppercase())
    }

    /// Names of all registered algorithms, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .algorithms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

/// Whether an upper-cased name belongs to one of the built-in algorithms
fn is_builtin(name: &str) -> bool {
    matches!(name, "HS256" | "HS384" | "HS512" | "EDDSA")
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.list())
            .finish()
    }
}
