//! Per-process stock ledger.
//!
//! An [`Inventory`] maps each registered [`Product`] to an on-hand quantity.
//! Products must be registered (held at quantity 0) before stock can be
//! added, and can only be deregistered once empty. Every mutation validates
//! before it writes, so a failed call never leaves a partial change behind.

use crate::product::Product;
use std::collections::BTreeMap;
use std::collections::btree_map;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by inventory mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("unknown product: {0}")]
    UnknownProduct(Product),
    #[error("insufficient stock of {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: Product,
        requested: u64,
        available: u32,
    },
    #[error("cannot deregister {product}: {quantity} still in stock")]
    NonEmptyProduct { product: Product, quantity: u32 },
    #[error("quantity for {0} must be at least 1")]
    InvalidQuantity(Product),
    #[error("stock of {product} would overflow: {current} + {added}")]
    Overflow {
        product: Product,
        current: u32,
        added: u64,
    },
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A set of consume/produce lines applied to one inventory as a unit.
///
/// Lines for the same product are netted: consumption is checked against
/// the current stock, then production is added on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    consume: Vec<(Product, u32)>,
    produce: Vec<(Product, u32)>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn consume(&mut self, product: Product, quantity: u32) -> &mut Self {
        self.consume.push((product, quantity));
        self
    }

    pub fn produce(&mut self, product: Product, quantity: u32) -> &mut Self {
        self.produce.push((product, quantity));
        self
    }

    pub fn consumed(&self) -> &[(Product, u32)] {
        &self.consume
    }

    pub fn produced(&self) -> &[(Product, u32)] {
        &self.produce
    }

    pub fn is_empty(&self) -> bool {
        self.consume.is_empty() && self.produce.is_empty()
    }

    /// Split into `(consumed, produced)` lines.
    pub fn into_parts(self) -> (Vec<(Product, u32)>, Vec<(Product, u32)>) {
        (self.consume, self.produce)
    }
}

/// Per-product totals gathered while validating a transaction.
#[derive(Default)]
struct NetLine {
    consume: u64,
    produce: u64,
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Stock ledger owned by a single process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    stock: BTreeMap<Product, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product at quantity 0. No-op if already registered.
    pub fn register(&mut self, product: Product) {
        self.stock.entry(product).or_insert(0);
    }

    pub fn is_registered(&self, product: &Product) -> bool {
        self.stock.contains_key(product)
    }

    /// Add stock to a registered product.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity(product.clone()));
        }
        let current = self
            .stock
            .get_mut(product)
            .ok_or_else(|| InventoryError::UnknownProduct(product.clone()))?;
        let before = *current;
        *current = before
            .checked_add(quantity)
            .ok_or_else(|| InventoryError::Overflow {
                product: product.clone(),
                current: before,
                added: u64::from(quantity),
            })?;
        Ok(())
    }

    /// Remove stock. Fails without side effects if less than `quantity` is on hand.
    pub fn remove(&mut self, product: &Product, quantity: u32) -> Result<(), InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity(product.clone()));
        }
        match self.stock.get_mut(product) {
            Some(current) if *current >= quantity => {
                *current -= quantity;
                Ok(())
            }
            other => Err(InventoryError::InsufficientStock {
                product: product.clone(),
                requested: u64::from(quantity),
                available: other.map(|q| *q).unwrap_or(0),
            }),
        }
    }

    /// Drop a product from the ledger. Only allowed at zero stock.
    pub fn deregister(&mut self, product: &Product) -> Result<(), InventoryError> {
        let quantity = self.quantity_of(product);
        if quantity != 0 {
            return Err(InventoryError::NonEmptyProduct {
                product: product.clone(),
                quantity,
            });
        }
        self.stock.remove(product);
        Ok(())
    }

    /// Drop a product regardless of stock. Returns the discarded quantity,
    /// or `None` if the product was not registered.
    pub fn purge(&mut self, product: &Product) -> Option<u32> {
        let discarded = self.stock.remove(product)?;
        if discarded > 0 {
            tracing::debug!(%product, discarded, "purged product with stock");
        }
        Some(discarded)
    }

    /// On-hand quantity. Unknown products read as 0.
    pub fn quantity_of(&self, product: &Product) -> u32 {
        self.stock.get(product).copied().unwrap_or(0)
    }

    pub fn is_empty(&self, product: &Product) -> bool {
        self.quantity_of(product) == 0
    }

    pub fn can_deregister(&self, product: &Product) -> bool {
        self.quantity_of(product) == 0
    }

    /// Independent copy of the ledger.
    pub fn snapshot(&self) -> BTreeMap<Product, u32> {
        self.stock.clone()
    }

    /// Number of registered products.
    pub fn len(&self) -> usize {
        self.stock.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Product, u32> {
        self.stock.iter()
    }

    /// Apply every line of `tx` or none of them.
    pub fn apply(&mut self, tx: &Transaction) -> Result<(), InventoryError> {
        let mut net: BTreeMap<&Product, NetLine> = BTreeMap::new();
        for (product, quantity) in &tx.consume {
            if *quantity == 0 {
                return Err(InventoryError::InvalidQuantity(product.clone()));
            }
            net.entry(product).or_default().consume += u64::from(*quantity);
        }
        for (product, quantity) in &tx.produce {
            if *quantity == 0 {
                return Err(InventoryError::InvalidQuantity(product.clone()));
            }
            net.entry(product).or_default().produce += u64::from(*quantity);
        }

        // Validate everything before touching the ledger.
        let mut updates = Vec::with_capacity(net.len());
        for (product, line) in net {
            let available = match self.stock.get(product) {
                Some(q) => *q,
                None if line.consume > 0 => {
                    return Err(InventoryError::InsufficientStock {
                        product: product.clone(),
                        requested: line.consume,
                        available: 0,
                    });
                }
                None => return Err(InventoryError::UnknownProduct(product.clone())),
            };
            if line.consume > u64::from(available) {
                return Err(InventoryError::InsufficientStock {
                    product: product.clone(),
                    requested: line.consume,
                    available,
                });
            }
            let after = u64::from(available) - line.consume + line.produce;
            let after = u32::try_from(after).map_err(|_| InventoryError::Overflow {
                product: product.clone(),
                current: available,
                added: line.produce,
            })?;
            updates.push((product, after));
        }

        for (product, after) in updates {
            if let Some(slot) = self.stock.get_mut(product) {
                *slot = after;
            }
        }
        tracing::trace!(
            consumed = tx.consume.len(),
            produced = tx.produce.len(),
            "applied inventory transaction"
        );
        Ok(())
    }
}

impl std::fmt::Display for Inventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (product, quantity)) in self.stock.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{product}: {quantity}")?;
        }
        f.write_str("}")
    }
}
