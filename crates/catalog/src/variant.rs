use serde::{Deserialize, Serialize};

use storecms_core::{CategoryId, DomainError, DomainResult, VariantId, VariantOptionId};

/// A variant axis of a category, e.g. "Size" or "Color".
///
/// `weight` is the display order used by the dashboard; lower comes first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub weight: i32,
    pub options: Vec<VariantOption>,
}

/// One value of a variant axis, e.g. "M" for "Size".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantOption {
    pub id: VariantOptionId,
    pub variant_id: VariantId,
    pub value: String,
    pub description: String,
    pub weight: i32,
}

impl Variant {
    /// Create a variant together with its options.
    ///
    /// Options are raw `(value, description, weight)` tuples so callers never
    /// have to fabricate option IDs that would then be discarded.
    pub fn new(
        category_id: CategoryId,
        name: impl Into<String>,
        description: impl Into<String>,
        weight: i32,
        options: Vec<(String, String, i32)>,
    ) -> DomainResult<Self> {
        let id = VariantId::new();
        let options = options
            .into_iter()
            .map(|(value, description, weight)| VariantOption::new(id, value, description, weight))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self {
            id,
            category_id,
            name: validate_name(name.into())?,
            description: description.into().trim().to_string(),
            weight,
            options,
        })
    }

    /// Replace name/description/order and the full option set.
    ///
    /// Options are replaced wholesale; the dashboard edits the variant as a
    /// single form.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        weight: i32,
        options: Vec<(String, String, i32)>,
    ) -> DomainResult<()> {
        self.name = validate_name(name.into())?;
        self.description = description.into().trim().to_string();
        self.weight = weight;
        self.options = options
            .into_iter()
            .map(|(value, description, weight)| {
                VariantOption::new(self.id, value, description, weight)
            })
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(())
    }

    pub fn option_ids(&self) -> impl Iterator<Item = VariantOptionId> + '_ {
        self.options.iter().map(|o| o.id)
    }
}

impl VariantOption {
    pub fn new(
        variant_id: VariantId,
        value: impl Into<String>,
        description: impl Into<String>,
        weight: i32,
    ) -> DomainResult<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(DomainError::validation("variant option value cannot be empty"));
        }
        Ok(Self {
            id: VariantOptionId::new(),
            variant_id,
            value,
            description: description.into().trim().to_string(),
            weight,
        })
    }
}

fn validate_name(name: String) -> DomainResult<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(DomainError::validation("variant name cannot be empty"));
    }
    Ok(name)
}
