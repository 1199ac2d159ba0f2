//! Secret store abstraction
//!
//! Secrets are opaque values injected by the surrounding runner environment
//! only when the trigger context allows it; pull requests from forks never
//! receive them. An absent secret is an expected configuration state, so the
//! lookup surface is `Option`, never an error. Secret values are never
//! logged and never defaulted.

use std::collections::HashMap;

/// Lookup interface for named secrets
pub trait SecretStore: Send + Sync {
    /// Look up a secret by name, `None` when unavailable
    fn lookup(&self, name: &str) -> Option<String>;

    /// Check availability without exposing the value
    fn available(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

/// Secret store backed by the process environment
///
/// CI runners inject secrets as environment variables when the trigger
/// context permits; an unset or empty variable counts as unavailable.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }
}

impl SecretStore for EnvSecretStore {
    fn lookup(&self, name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }
}

/// Fixed in-memory secret store
///
/// Used by tests and by workflow-call embedding, where the caller hands the
/// embedded run an explicit secret set.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    values: HashMap<String, String>,
}

impl StaticSecretStore {
    /// Store with no secrets at all (the fork pull-request context)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a secret, builder style
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    /// Insert a secret
    pub fn insert(&mut self, name: String, value: String) {
        self.values.insert(name, value);
    }
}

impl SecretStore for StaticSecretStore {
    fn lookup(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}
