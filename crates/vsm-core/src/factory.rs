//! Recipe-driven production.
//!
//! A [`RecipeProcess`] wraps a [`Process`] with a signed [`Recipe`], a
//! timing model and an efficiency factor. Each craft is one atomic inventory
//! transaction:
//!
//! 1. **Check** -- every input must be on hand in full. Otherwise the craft
//!    is rejected and nothing changes.
//! 2. **Plan** -- inputs are consumed at their recipe amount, outputs are
//!    produced at `floor(amount * efficiency / 100)` (zero yields are
//!    skipped). Every entry is planned from the pre-craft stock, so the
//!    order of entries never matters.
//! 3. **Apply** -- the plan is written to the inventory in a single
//!    [`Transaction`].
//! 4. **Time** -- the elapsed time is sampled from
//!    `N(base_duration, duration_variability)`.

use crate::config::{ConfigError, RecipeProcessConfig};
use crate::efficiency::scale_percent;
use crate::inventory::{InventoryError, Transaction};
use crate::process::{Process, ProcessKind, ProcessNode};
use crate::product::Product;
use crate::recipe::{Recipe, RecipeError};
use crate::rng::SimRng;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// An input that is not available in the quantity the recipe needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub product: Product,
    pub required: u32,
    pub available: u32,
}

/// Why a craft was rejected. Nothing in the inventory changes on any of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CraftError {
    #[error("craft is infeasible: {} input(s) short", .shortfalls.len())]
    Infeasible { shortfalls: Vec<Shortfall> },
    #[error("producing {produced} of {product} would overflow its stock of {current}")]
    OutputOverflow {
        product: Product,
        current: u32,
        produced: u64,
    },
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

impl CraftError {
    pub fn is_infeasible(&self) -> bool {
        matches!(self, CraftError::Infeasible { .. })
    }
}

/// What one successful craft did.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftReport {
    /// Sampled processing time. This is the raw normal sample: with a large
    /// variability relative to the base duration it can be zero or negative,
    /// and callers treating it as a real duration must clamp or reject it.
    pub elapsed: f64,
    /// Inputs removed from stock.
    pub consumed: Vec<(Product, u32)>,
    /// Outputs added to stock (after efficiency, zero yields omitted).
    pub produced: Vec<(Product, u32)>,
}

/// Outcome of a batch of crafts.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub completed: u32,
    /// Sum of the elapsed times of the completed crafts.
    pub total_elapsed: f64,
    /// The rejection that ended the batch early, if any.
    pub stopped_by: Option<CraftError>,
}

/// What removing a recipe entry took out of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedEntry {
    pub product: Product,
    /// The signed recipe quantity that was removed.
    pub quantity: i32,
    /// Stock thrown away with the product. Always 0 for a secure removal.
    pub discarded: u32,
}

// ---------------------------------------------------------------------------
// RecipeProcess
// ---------------------------------------------------------------------------

/// A process that crafts outputs from inputs according to its recipe.
#[derive(Debug, Clone)]
pub struct RecipeProcess {
    process: Process,
    recipe: Recipe,
    config: RecipeProcessConfig,
    rng: SimRng,
}

impl RecipeProcess {
    /// Build a process with an empty recipe. The configuration is validated here.
    pub fn new(name: impl Into<String>, config: RecipeProcessConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            process: Process::new(name),
            recipe: Recipe::new(),
            rng: SimRng::new(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &RecipeProcessConfig {
        &self.config
    }

    /// Efficiency/quality percentage applied to every output.
    pub fn efficiency(&self) -> f64 {
        self.config.efficiency
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn process(&self) -> &Process {
        &self.process
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.process.set_name(name);
    }

    // -- Recipe editing ------------------------------------------------------

    /// Add a recipe entry and register its product in the inventory.
    ///
    /// Negative quantities are consumed, positive ones produced. A product
    /// already in the recipe must be removed before it can be redefined.
    pub fn set_recipe_entry(&mut self, product: Product, quantity: i32) -> Result<(), RecipeError> {
        self.recipe.insert(product.clone(), quantity)?;
        self.process.register(product);
        Ok(())
    }

    /// Drop a recipe entry and its product from the inventory.
    ///
    /// With `secure` set, the product's stock must be exactly 0. Without it
    /// any remaining stock is discarded and reported in [`RemovedEntry`].
    pub fn remove_recipe_entry(
        &mut self,
        product: &Product,
        secure: bool,
    ) -> Result<RemovedEntry, RecipeError> {
        let quantity = self
            .recipe
            .get(product)
            .ok_or_else(|| RecipeError::UnknownRecipeEntry(product.clone()))?;
        let stock = self.process.quantity_of(product);
        if secure && stock != 0 {
            return Err(RecipeError::NonEmptyProduct {
                product: product.clone(),
                quantity: stock,
            });
        }
        self.recipe.remove(product);
        let discarded = self.process.purge(product).unwrap_or(0);
        Ok(RemovedEntry {
            product: product.clone(),
            quantity,
            discarded,
        })
    }

    /// [`remove_recipe_entry`](Self::remove_recipe_entry) with secure delete on.
    pub fn remove_recipe_entry_secure(&mut self, product: &Product) -> Result<RemovedEntry, RecipeError> {
        self.remove_recipe_entry(product, true)
    }

    // -- Inventory forwarding -----------------------------------------------

    pub fn register(&mut self, product: Product) {
        self.process.register(product);
    }

    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), InventoryError> {
        self.process.add(product, quantity)
    }

    pub fn remove(&mut self, product: &Product, quantity: u32) -> Result<(), InventoryError> {
        self.process.remove(product, quantity)
    }

    /// Deregister a product that is not part of the recipe.
    pub fn deregister(&mut self, product: &Product) -> Result<(), RecipeError> {
        if self.recipe.contains(product) {
            return Err(RecipeError::ReferencedByRecipe(product.clone()));
        }
        self.process.deregister(product)?;
        Ok(())
    }

    pub fn quantity_of(&self, product: &Product) -> u32 {
        self.process.quantity_of(product)
    }

    pub fn is_empty(&self, product: &Product) -> bool {
        self.process.is_empty(product)
    }

    pub fn can_deregister(&self, product: &Product) -> bool {
        self.process.can_deregister(product)
    }

    pub fn snapshot(&self) -> BTreeMap<Product, u32> {
        self.process.snapshot()
    }

    // -- Crafting -----------------------------------------------------------

    /// Inputs the current stock cannot cover.
    pub fn shortfalls(&self) -> Vec<Shortfall> {
        self.recipe
            .inputs()
            .filter_map(|(product, required)| {
                let available = self.process.quantity_of(product);
                (available < required).then(|| Shortfall {
                    product: product.clone(),
                    required,
                    available,
                })
            })
            .collect()
    }

    /// Whether every input is on hand. Outputs never block a craft.
    pub fn can_craft(&self) -> bool {
        self.recipe
            .inputs()
            .all(|(product, required)| self.process.quantity_of(product) >= required)
    }

    fn plan(&self) -> Result<Transaction, CraftError> {
        let shortfalls = self.shortfalls();
        if !shortfalls.is_empty() {
            return Err(CraftError::Infeasible { shortfalls });
        }

        let mut tx = Transaction::new();
        for (product, required) in self.recipe.inputs() {
            tx.consume(product.clone(), required);
        }
        for (product, nominal) in self.recipe.outputs() {
            let produced = scale_percent(nominal, self.config.efficiency);
            if produced == 0 {
                continue;
            }
            let current = self.process.quantity_of(product);
            let fits = u32::try_from(produced)
                .ok()
                .filter(|p| current.checked_add(*p).is_some());
            match fits {
                Some(p) => {
                    tx.produce(product.clone(), p);
                }
                None => {
                    return Err(CraftError::OutputOverflow {
                        product: product.clone(),
                        current,
                        produced,
                    });
                }
            }
        }
        Ok(tx)
    }

    /// Run the recipe once.
    ///
    /// Rejections leave the inventory untouched. On success the returned
    /// [`CraftReport::elapsed`] is the unclamped duration sample.
    pub fn craft(&mut self) -> Result<CraftReport, CraftError> {
        let tx = match self.plan() {
            Ok(tx) => tx,
            Err(err) => {
                tracing::trace!(process = %self.process.name(), %err, "craft rejected");
                return Err(err);
            }
        };
        self.process.apply(&tx)?;

        let elapsed = self
            .rng
            .normal(self.config.base_duration, self.config.duration_variability);
        let (consumed, produced) = tx.into_parts();
        tracing::debug!(
            process = %self.process.name(),
            elapsed,
            consumed = consumed.len(),
            produced = produced.len(),
            "craft completed"
        );
        Ok(CraftReport {
            elapsed,
            consumed,
            produced,
        })
    }

    /// Craft up to `runs` times, stopping at the first rejection.
    pub fn run_batch(&mut self, runs: u32) -> BatchReport {
        let mut report = BatchReport {
            completed: 0,
            total_elapsed: 0.0,
            stopped_by: None,
        };
        for _ in 0..runs {
            match self.craft() {
                Ok(craft) => {
                    report.completed += 1;
                    report.total_elapsed += craft.elapsed;
                }
                Err(err) => {
                    report.stopped_by = Some(err);
                    break;
                }
            }
        }
        tracing::debug!(
            process = %self.process.name(),
            requested = runs,
            completed = report.completed,
            "batch finished"
        );
        report
    }

    /// Craft up to `runs` times and return how many succeeded.
    ///
    /// Running out of inputs part-way ends the batch with `Ok`. Any other
    /// rejection is returned as the error; the crafts completed before it
    /// stay applied, and [`run_batch`](Self::run_batch) reports their count.
    pub fn craft_batch(&mut self, runs: u32) -> Result<u32, CraftError> {
        let report = self.run_batch(runs);
        match report.stopped_by {
            Some(err) if !err.is_infeasible() => Err(err),
            _ => Ok(report.completed),
        }
    }
}

impl ProcessNode for RecipeProcess {
    fn name(&self) -> &str {
        self.process.name()
    }

    fn kind(&self) -> ProcessKind {
        ProcessKind::Recipe
    }

    fn describe(&self) -> String {
        format!("{} [{}]", self.process.name(), self.kind())
    }
}

impl fmt::Display for RecipeProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecipeProcess: {} - {}",
            self.process.name(),
            self.process.inventory()
        )
    }
}

// ---------------------------------------------------------------------------
// Many processes
// ---------------------------------------------------------------------------

/// Run [`RecipeProcess::craft_batch`] on each process and collect the
/// per-process outcomes. Inventories are independent, so no coordination is needed.
#[cfg(not(feature = "parallel"))]
pub fn craft_all(processes: &mut [RecipeProcess], runs: u32) -> Vec<Result<u32, CraftError>> {
    processes.iter_mut().map(|p| p.craft_batch(runs)).collect()
}

/// Run [`RecipeProcess::craft_batch`] on each process across the rayon pool
/// and collect the per-process outcomes in input order.
#[cfg(feature = "parallel")]
pub fn craft_all(processes: &mut [RecipeProcess], runs: u32) -> Vec<Result<u32, CraftError>> {
    use rayon::prelude::*;
    processes.par_iter_mut().map(|p| p.craft_batch(runs)).collect()
}
