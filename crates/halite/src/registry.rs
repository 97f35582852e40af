use crate::error::{Error, Result};
use crate::presenter::Presenter;
use crate::resource::ResourceType;
use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Default presenter per resource type.
///
/// Registration happens during setup; afterwards the registry is read from
/// any number of threads. A lookup that only succeeds through an ancestor
/// type is cached against the original type, so the chain is walked at most
/// once per type. Cache writes store the value any concurrent writer would
/// store, so racing fills are harmless. Any registration clears the cache.
#[derive(Default)]
pub struct PresenterRegistry {
    entries: RwLock<HashMap<ResourceType, Presenter>>,
    inherited: RwLock<HashMap<ResourceType, Presenter>>,
}

impl PresenterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `presenter` the default for `resource_type`, replacing any
    /// previous registration.
    pub fn register(&self, resource_type: &ResourceType, presenter: &Presenter) {
        debug!(
            resource_type = resource_type.name(),
            presenter = presenter.name(),
            "registering default presenter"
        );
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(resource_type.clone(), presenter.clone());
        self.inherited
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Register a presenter for the type it declared with `presents`.
    pub fn register_presenter(&self, presenter: &Presenter) -> Result<()> {
        let resource_type = presenter.resource_type().ok_or_else(|| {
            Error::Configuration(format!(
                "presenter '{}' does not declare a resource type",
                presenter.name()
            ))
        })?;
        self.register(resource_type, presenter);
        Ok(())
    }

    /// Exact match first, then the nearest registered ancestor.
    pub fn resolve(&self, resource_type: &ResourceType) -> Option<Presenter> {
        if let Some(presenter) = self.lookup(resource_type) {
            return Some(presenter);
        }
        if let Some(presenter) = self.cached(resource_type) {
            return Some(presenter);
        }

        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let (ancestor, presenter) = resource_type
            .ancestors()
            .find_map(|ancestor| entries.get(ancestor).map(|p| (ancestor, p.clone())))?;

        debug!(
            resource_type = resource_type.name(),
            ancestor = ancestor.name(),
            presenter = presenter.name(),
            "caching presenter inherited from ancestor"
        );
        // `entries` stays read-locked until the fill lands; `register` clears after.
        self.inherited
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(resource_type.clone(), presenter.clone());

        Some(presenter)
    }

    pub fn len(&self) -> usize {
        self.read_len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_len() == 0
    }

    fn lookup(&self, resource_type: &ResourceType) -> Option<Presenter> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(resource_type)
            .cloned()
    }

    fn cached(&self, resource_type: &ResourceType) -> Option<Presenter> {
        self.inherited
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(resource_type)
            .cloned()
    }

    fn read_len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl fmt::Debug for PresenterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_map()
            .entries(entries.iter().map(|(ty, p)| (ty.name(), p.name())))
            .finish()
    }
}
