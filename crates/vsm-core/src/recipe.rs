//! Signed recipe ("nomenclature") container.
//!
//! Negative quantities are consumed per craft, positive quantities are
//! produced per craft. A product appears at most once, so it can never be
//! both an input and an output of the same recipe.

use crate::inventory::InventoryError;
use crate::product::Product;
use std::collections::BTreeMap;

/// Errors raised while editing a recipe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeError {
    #[error("recipe quantity for {0} must be non-zero")]
    InvalidRecipeQuantity(Product),
    #[error("{product} is already in the recipe with quantity {existing}")]
    DuplicateRecipeEntry { product: Product, existing: i32 },
    #[error("{0} is not in the recipe")]
    UnknownRecipeEntry(Product),
    #[error("cannot remove {product} from the recipe: {quantity} still in stock")]
    NonEmptyProduct { product: Product, quantity: u32 },
    #[error("{0} is referenced by the recipe; remove the recipe entry instead")]
    ReferencedByRecipe(Product),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipe {
    entries: BTreeMap<Product, i32>,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new entry. Zero quantities and redefinitions are rejected.
    pub fn insert(&mut self, product: Product, quantity: i32) -> Result<(), RecipeError> {
        if quantity == 0 {
            return Err(RecipeError::InvalidRecipeQuantity(product));
        }
        if let Some(&existing) = self.entries.get(&product) {
            return Err(RecipeError::DuplicateRecipeEntry { product, existing });
        }
        self.entries.insert(product, quantity);
        Ok(())
    }

    pub fn remove(&mut self, product: &Product) -> Option<i32> {
        self.entries.remove(product)
    }

    pub fn get(&self, product: &Product) -> Option<i32> {
        self.entries.get(product).copied()
    }

    pub fn contains(&self, product: &Product) -> bool {
        self.entries.contains_key(product)
    }

    /// Consumed products with the amount used per craft.
    pub fn inputs(&self) -> impl Iterator<Item = (&Product, u32)> + '_ {
        self.entries
            .iter()
            .filter(|&(_, &q)| q < 0)
            .map(|(p, q)| (p, q.unsigned_abs()))
    }

    /// Produced products with the nominal amount per craft (before efficiency).
    pub fn outputs(&self) -> impl Iterator<Item = (&Product, u32)> + '_ {
        self.entries
            .iter()
            .filter(|&(_, &q)| q > 0)
            .map(|(p, q)| (p, q.unsigned_abs()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Product, i32)> + '_ {
        self.entries.iter().map(|(p, q)| (p, *q))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
