//! VSM Core -- inventory ledger and recipe engine for value-stream models.
//!
//! A value stream is a set of processes that each hold stock of typed
//! products. Recipe processes turn inputs into outputs: every craft checks
//! that the inputs are on hand, consumes them, produces the outputs scaled
//! by the process efficiency, and samples how long the craft took.
//!
//! # Layers
//!
//! 1. [`inventory::Inventory`] -- per-process ledger. All stock changes
//!    validate before they write; multi-product changes go through an atomic
//!    [`inventory::Transaction`].
//! 2. [`process::Process`] -- a named owner of one inventory.
//! 3. [`factory::RecipeProcess`] -- a process plus a signed
//!    [`recipe::Recipe`], timing and efficiency.
//!
//! # Crafting
//!
//! ```rust
//! use vsm_core::config::RecipeProcessConfig;
//! use vsm_core::factory::RecipeProcess;
//! use vsm_core::product::Product;
//!
//! let iron = Product::new("iron");
//! let gear = Product::new("gear");
//!
//! let mut press = RecipeProcess::new("Press", RecipeProcessConfig::new(4.0)).unwrap();
//! press.set_recipe_entry(iron.clone(), -2).unwrap();
//! press.set_recipe_entry(gear.clone(), 1).unwrap();
//! press.add(&iron, 5).unwrap();
//!
//! assert_eq!(press.craft_batch(10), Ok(2));
//! assert_eq!(press.quantity_of(&iron), 1);
//! assert_eq!(press.quantity_of(&gear), 2);
//! ```
//!
//! The engine is synchronous and single-threaded; wrap a process in
//! [`shared::SharedRecipeProcess`] to share it between threads. It performs
//! no I/O. Outcomes are returned as values and mirrored as `tracing` events.

pub mod config;
pub mod efficiency;
pub mod factory;
pub mod inventory;
pub mod process;
pub mod product;
pub mod recipe;
pub mod rng;
pub mod shared;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
