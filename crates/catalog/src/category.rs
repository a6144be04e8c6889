use serde::{Deserialize, Serialize};

use storecms_core::{CategoryId, DomainError, DomainResult, StoreId};

/// A product category within a store.
///
/// Variants hang off categories, so deleting a category cascades to its
/// variants and products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub store_id: StoreId,
    pub name: String,
}

impl Category {
    pub fn new(store_id: StoreId, name: impl Into<String>) -> DomainResult<Self> {
        Ok(Self {
            id: CategoryId::new(),
            store_id,
            name: validate_name(name.into())?,
        })
    }

    pub fn rename(&mut self, name: impl Into<String>) -> DomainResult<()> {
        self.name = validate_name(name.into())?;
        Ok(())
    }
}

fn validate_name(name: String) -> DomainResult<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(DomainError::validation("category name cannot be empty"));
    }
    Ok(name)
}
