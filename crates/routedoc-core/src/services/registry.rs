//! Scoped document registry.
//!
//! Maps stable names to [`DocProvider`] trait objects. A registry is created
//! by the composition root and handed to whichever HTTP handler serves the
//! documents; there is no process-wide instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::ports::{DocProvider, RegistryError};

/// Name → provider lookup shared between registration and serving code.
#[derive(Default)]
pub struct DocRegistry {
    providers: RwLock<HashMap<String, Arc<dyn DocProvider>>>,
}

impl DocRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider under `name`. Fails if the name is taken.
    pub fn register(
        &self,
        name: impl Into<String>,
        provider: Arc<dyn DocProvider>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        if providers.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        providers.insert(name, provider);
        Ok(())
    }

    /// Add or overwrite the provider under `name`, returning the previous one.
    pub fn replace(
        &self,
        name: impl Into<String>,
        provider: Arc<dyn DocProvider>,
    ) -> Option<Arc<dyn DocProvider>> {
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), provider)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn DocProvider>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Look up `name` and produce its document.
    ///
    /// The lock is released before the provider runs, so slow file reads do
    /// not block registration.
    pub fn read_doc(&self, name: &str) -> Result<String, RegistryError> {
        let provider = self
            .get(name)
            .ok_or_else(|| RegistryError::NotRegistered(name.to_string()))?;
        Ok(provider.read_doc()?)
    }

    /// As [`read_doc`](Self::read_doc), returning the provider's bytes
    /// unmodified.
    pub fn read_doc_bytes(&self, name: &str) -> Result<Vec<u8>, RegistryError> {
        let provider = self
            .get(name)
            .ok_or_else(|| RegistryError::NotRegistered(name.to_string()))?;
        Ok(provider.read_doc_bytes()?)
    }
}

impl fmt::Debug for DocRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocRegistry")
            .field("names", &self.names())
            .finish()
    }
}
