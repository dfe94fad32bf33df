//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::config::RecipeProcessConfig;
use crate::factory::RecipeProcess;
use crate::product::Product;

// ===========================================================================
// Products
// ===========================================================================

pub fn iron() -> Product {
    Product::new("iron")
}
pub fn copper() -> Product {
    Product::new("copper")
}
pub fn gear() -> Product {
    Product::new("gear")
}
pub fn circuit() -> Product {
    Product::new("circuit")
}

// ===========================================================================
// Process builders
// ===========================================================================

/// A recipe process with unit duration, no timing noise and the given efficiency.
pub fn make_recipe_process(name: &str, efficiency: f64) -> RecipeProcess {
    let config = RecipeProcessConfig::new(1.0).with_efficiency(efficiency);
    RecipeProcess::new(name, config).expect("test config is valid")
}

/// Build a recipe process from `(product, signed quantity)` entries.
pub fn make_recipe(name: &str, efficiency: f64, entries: &[(Product, i32)]) -> RecipeProcess {
    let mut proc = make_recipe_process(name, efficiency);
    for (product, quantity) in entries {
        proc.set_recipe_entry(product.clone(), *quantity)
            .expect("test recipe entry is valid");
    }
    proc
}

/// Register `product` and put `quantity` of it in stock.
pub fn stock(proc: &mut RecipeProcess, product: &Product, quantity: u32) {
    proc.register(product.clone());
    if quantity > 0 {
        proc.add(product, quantity).expect("stock fits");
    }
}

/// The two-inputs, one-output recipe from the reference scenarios:
/// `{iron: -1, copper: -1, gear: +2}` with 10 of each in stock.
pub fn reference_assembler(efficiency: f64) -> RecipeProcess {
    let mut proc = make_recipe(
        "Assembler",
        efficiency,
        &[(iron(), -1), (copper(), -1), (gear(), 2)],
    );
    for product in [iron(), copper(), gear()] {
        stock(&mut proc, &product, 10);
    }
    proc
}
