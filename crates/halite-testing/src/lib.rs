//! Testing infrastructure for halite integration tests.
//!
//! - `fixtures`: the users/documents catalog and its sample graph
//! - `assertions`: JSON shape checks with readable failures
//! - `CallCounter`: observe how often a handler runs

pub mod assertions;
pub mod fixtures;

pub use fixtures::Catalog;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared invocation counter, cloneable into `'static` handlers.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
