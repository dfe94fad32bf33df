use crate::inventory::{Inventory, InventoryError, Transaction};
use crate::product::Product;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Node identity
// ---------------------------------------------------------------------------

/// Which flavour of process a node is. Graph exporters pick node shapes from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    /// Holds stock only.
    Plain,
    /// Transforms inputs into outputs via a recipe.
    Recipe,
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessKind::Plain => f.write_str("plain"),
            ProcessKind::Recipe => f.write_str("recipe"),
        }
    }
}

/// The structural view of a process handed to graph builders.
///
/// Only identity is exposed here; recipes and stock stay private to the
/// process.
pub trait ProcessNode {
    fn name(&self) -> &str;

    fn kind(&self) -> ProcessKind;

    /// Label used when exporting the process network.
    fn describe(&self) -> String {
        self.name().to_string()
    }
}

// ---------------------------------------------------------------------------
// Process
// ---------------------------------------------------------------------------

/// A named process owning exactly one inventory.
///
/// All stock changes go through these methods, which forward to the
/// [`Inventory`] with the same contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    name: String,
    inventory: Inventory,
}

impl Default for Process {
    fn default() -> Self {
        Self::new("Process")
    }
}

impl Process {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inventory: Inventory::new(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn register(&mut self, product: Product) {
        self.inventory.register(product);
    }

    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), InventoryError> {
        self.inventory.add(product, quantity)
    }

    pub fn remove(&mut self, product: &Product, quantity: u32) -> Result<(), InventoryError> {
        self.inventory.remove(product, quantity)
    }

    pub fn deregister(&mut self, product: &Product) -> Result<(), InventoryError> {
        self.inventory.deregister(product)
    }

    pub fn quantity_of(&self, product: &Product) -> u32 {
        self.inventory.quantity_of(product)
    }

    pub fn is_empty(&self, product: &Product) -> bool {
        self.inventory.is_empty(product)
    }

    pub fn can_deregister(&self, product: &Product) -> bool {
        self.inventory.can_deregister(product)
    }

    pub fn snapshot(&self) -> BTreeMap<Product, u32> {
        self.inventory.snapshot()
    }

    pub(crate) fn purge(&mut self, product: &Product) -> Option<u32> {
        self.inventory.purge(product)
    }

    pub(crate) fn apply(&mut self, tx: &Transaction) -> Result<(), InventoryError> {
        self.inventory.apply(tx)
    }
}

impl ProcessNode for Process {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProcessKind {
        ProcessKind::Plain
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Process: {} - {}", self.name, self.inventory)
    }
}
