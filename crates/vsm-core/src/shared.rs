//! Thread-safe handle to a single recipe process.
//!
//! Every call takes the process lock for its whole duration, so the
//! check/consume/produce sequence of a craft is never interleaved with
//! another caller's mutation. Separate processes have separate locks.

use crate::factory::{BatchReport, CraftError, CraftReport, RecipeProcess};
use crate::inventory::InventoryError;
use crate::product::Product;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable, lock-protected [`RecipeProcess`].
#[derive(Debug, Clone)]
pub struct SharedRecipeProcess {
    inner: Arc<Mutex<RecipeProcess>>,
}

impl SharedRecipeProcess {
    pub fn new(process: RecipeProcess) -> Self {
        Self {
            inner: Arc::new(Mutex::new(process)),
        }
    }

    // Operations validate before mutating; a poisoned lock still guards a
    // consistent process.
    fn lock(&self) -> MutexGuard<'_, RecipeProcess> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn craft(&self) -> Result<CraftReport, CraftError> {
        self.lock().craft()
    }

    pub fn run_batch(&self, runs: u32) -> BatchReport {
        self.lock().run_batch(runs)
    }

    pub fn craft_batch(&self, runs: u32) -> Result<u32, CraftError> {
        self.lock().craft_batch(runs)
    }

    pub fn can_craft(&self) -> bool {
        self.lock().can_craft()
    }

    pub fn add(&self, product: &Product, quantity: u32) -> Result<(), InventoryError> {
        self.lock().add(product, quantity)
    }

    pub fn remove(&self, product: &Product, quantity: u32) -> Result<(), InventoryError> {
        self.lock().remove(product, quantity)
    }

    pub fn quantity_of(&self, product: &Product) -> u32 {
        self.lock().quantity_of(product)
    }

    pub fn snapshot(&self) -> BTreeMap<Product, u32> {
        self.lock().snapshot()
    }

    /// Run `f` with exclusive access to the process.
    pub fn with<R>(&self, f: impl FnOnce(&mut RecipeProcess) -> R) -> R {
        f(&mut self.lock())
    }
}

impl From<RecipeProcess> for SharedRecipeProcess {
    fn from(process: RecipeProcess) -> Self {
        Self::new(process)
    }
}
