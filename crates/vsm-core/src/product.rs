use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a type of good tracked by an inventory.
///
/// Equality, ordering and hashing come from the name alone, so two
/// `Product` values built from the same name are interchangeable as map keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product(String);

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Product {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Product {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
