//! Process-wide module cache.
//!
//! Maps [`ModuleId`] to the loaded [`Module`]. Entries are only added by
//! [`ModuleCache::get_or_load`] and only removed by
//! [`ModuleCache::invalidate`]; which entries go is decided by the caller's
//! predicate (see [`crate::invalidate::InvalidationPolicy`]).

use crate::error::LoadError;
use crate::loader::ModuleLoader;
use crate::module::{Module, ModuleKind};
use crate::module_id::ModuleId;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ModuleCache {
    modules: RwLock<FxHashMap<ModuleId, Arc<Module>>>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ModuleId) -> Option<Arc<Module>> {
        self.modules.read().get(id).cloned()
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.modules.read().contains_key(id)
    }

    /// Insert a module, replacing any previous entry with the same identity.
    pub fn insert(&self, module: Module) -> Arc<Module> {
        let module = Arc::new(module);
        self.modules
            .write()
            .insert(module.id().clone(), Arc::clone(&module));
        module
    }

    /// Return the cached module or load it through `loader`.
    ///
    /// The loader runs without holding the lock. If another caller populated
    /// the entry with the same kind in the meantime, the first value wins so
    /// every holder sees the same `Arc`. An entry cached as a different kind
    /// is reloaded as `kind` and replaced.
    pub fn get_or_load(
        &self,
        id: &ModuleId,
        kind: ModuleKind,
        loader: &dyn ModuleLoader,
    ) -> Result<Arc<Module>, LoadError> {
        if let Some(module) = self.get(id).filter(|module| module.kind() == kind) {
            return Ok(module);
        }

        let loaded = Arc::new(loader.load(id, kind)?);
        let mut modules = self.modules.write();
        match modules.get(id) {
            Some(existing) if existing.kind() == kind => Ok(Arc::clone(existing)),
            _ => {
                modules.insert(id.clone(), Arc::clone(&loaded));
                Ok(loaded)
            }
        }
    }

    /// Remove every entry matching `predicate`, returning how many went.
    pub fn invalidate<F>(&self, predicate: F) -> usize
    where
        F: Fn(&ModuleId) -> bool,
    {
        let mut modules = self.modules.write();
        let before = modules.len();
        modules.retain(|id, _| !predicate(id));
        before - modules.len()
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }

    /// Cached identities in sorted order.
    pub fn ids(&self) -> Vec<ModuleId> {
        let mut ids: Vec<_> = self.modules.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn clear(&self) {
        self.modules.write().clear();
    }
}
