use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storecms_core::{AdminId, DomainError, DomainResult, StoreId};

/// A store owned by an admin.
///
/// # Invariants
/// - The owning admin is immutable after creation.
/// - The name is non-empty (after trimming).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub admin_id: AdminId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn new(
        admin_id: AdminId,
        name: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: StoreId::new(),
            admin_id,
            name: validate_name(name.into())?,
            description: description.into().trim().to_string(),
            created_at,
        })
    }

    /// Replace the mutable fields. Ownership and identity stay fixed.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> DomainResult<()> {
        self.name = validate_name(name.into())?;
        self.description = description.into().trim().to_string();
        Ok(())
    }
}

fn validate_name(name: String) -> DomainResult<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(DomainError::validation("store name cannot be empty"));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_store_trims_input() {
        let store = Store::new(AdminId::new(), "  Outdoor Gear ", " all things camping ", Utc::now())
            .unwrap();
        assert_eq!(store.name, "Outdoor Gear");
        assert_eq!(store.description, "all things camping");
    }

    #[test]
    fn create_store_rejects_blank_name() {
        let result = Store::new(AdminId::new(), "   ", "", Utc::now());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn update_keeps_identity() {
        let mut store = Store::new(AdminId::new(), "Old", "", Utc::now()).unwrap();
        let id = store.id;
        store.update("New", "fresh paint").unwrap();
        assert_eq!(store.id, id);
        assert_eq!(store.name, "New");
    }
}
