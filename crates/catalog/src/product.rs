use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storecms_core::{
    CategoryId, DomainError, DomainResult, ProductId, ProductItemId, StoreId, VariantId,
    VariantOptionId,
};

use crate::variant::Variant;

// ─────────────────────────────────────────────────────────────────────────────
// Product
// ─────────────────────────────────────────────────────────────────────────────

/// A product listed in a store.
///
/// # Invariants
/// - Belongs to exactly one store and one category of that store.
/// - `rating`, when present, is within `0.0..=5.0`.
/// - Item SKUs are unique within the product.
/// - Each item's variant options reference distinct variants of the
///   product's category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub rating: Option<f32>,
    pub is_featured: bool,
    pub is_archived: bool,
    pub items: Vec<ProductItem>,
    pub created_at: DateTime<Utc>,
}

/// One purchasable item of a product: a concrete combination of variant
/// options with its own SKU, stock and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductItem {
    pub id: ProductItemId,
    pub product_id: ProductId,
    pub sku: String,
    pub quantity: i64,
    /// Price in minor units (cents).
    pub price: i64,
    /// Optional sale price in minor units; never above `price`.
    pub discounted_price: Option<i64>,
    pub variant_option_ids: Vec<VariantOptionId>,
}

impl Product {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store_id: StoreId,
        category_id: CategoryId,
        name: impl Into<String>,
        description: impl Into<String>,
        rating: Option<f32>,
        is_featured: bool,
        is_archived: bool,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: ProductId::new(),
            store_id,
            category_id,
            name: validate_name(name.into())?,
            description: validate_description(description.into())?,
            rating: validate_rating(rating)?,
            is_featured,
            is_archived,
            items: Vec::new(),
            created_at,
        })
    }

    /// Replace the scalar fields. Store and identity stay fixed; the
    /// category may move within the same store (the caller checks that).
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        category_id: CategoryId,
        name: impl Into<String>,
        description: impl Into<String>,
        rating: Option<f32>,
        is_featured: bool,
        is_archived: bool,
    ) -> DomainResult<()> {
        self.category_id = category_id;
        self.name = validate_name(name.into())?;
        self.description = validate_description(description.into())?;
        self.rating = validate_rating(rating)?;
        self.is_featured = is_featured;
        self.is_archived = is_archived;
        Ok(())
    }

    /// Replace the item set, enforcing per-product SKU uniqueness.
    pub fn set_items(&mut self, items: Vec<ProductItem>) -> DomainResult<()> {
        let mut seen = HashSet::new();
        for item in &items {
            if item.product_id != self.id {
                return Err(DomainError::invariant("item belongs to another product"));
            }
            if !seen.insert(item.sku.clone()) {
                return Err(DomainError::conflict(format!(
                    "duplicate SKU within product: {}",
                    item.sku
                )));
            }
        }
        self.items = items;
        Ok(())
    }
}

impl ProductItem {
    pub fn new(
        product_id: ProductId,
        sku: impl Into<String>,
        quantity: i64,
        price: i64,
        discounted_price: Option<i64>,
        variant_option_ids: Vec<VariantOptionId>,
    ) -> DomainResult<Self> {
        let sku = sku.into().trim().to_string();
        if sku.is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if quantity < 0 {
            return Err(DomainError::validation("quantity must be 0 or greater"));
        }
        if price < 0 {
            return Err(DomainError::validation("price must be 0 or greater"));
        }
        if let Some(discounted) = discounted_price {
            if discounted < 0 {
                return Err(DomainError::validation("discounted price must be 0 or greater"));
            }
            if discounted > price {
                return Err(DomainError::validation(
                    "discounted price cannot exceed the regular price",
                ));
            }
        }

        Ok(Self {
            id: ProductItemId::new(),
            product_id,
            sku,
            quantity,
            price,
            discounted_price,
            variant_option_ids,
        })
    }
}

fn validate_name(name: String) -> DomainResult<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(DomainError::validation("product name cannot be empty"));
    }
    Ok(name)
}

fn validate_description(description: String) -> DomainResult<String> {
    let description = description.trim().to_string();
    if description.is_empty() {
        return Err(DomainError::validation("product description cannot be empty"));
    }
    Ok(description)
}

fn validate_rating(rating: Option<f32>) -> DomainResult<Option<f32>> {
    if let Some(r) = rating {
        if !(0.0..=5.0).contains(&r) {
            return Err(DomainError::validation("rating must be between 0 and 5"));
        }
    }
    Ok(rating)
}

// ─────────────────────────────────────────────────────────────────────────────
// Variant combinations
// ─────────────────────────────────────────────────────────────────────────────

/// Cartesian product of the option sets of the given variants, in variant
/// order. With no variants this yields a single empty combination (one
/// unvarianted item); a variant with no options yields no combinations.
pub fn item_combinations(variants: &[Variant]) -> Vec<Vec<VariantOptionId>> {
    variants.iter().fold(vec![Vec::new()], |acc, variant| {
        acc.iter()
            .flat_map(|combo| {
                variant.options.iter().map(move |option| {
                    let mut next = combo.clone();
                    next.push(option.id);
                    next
                })
            })
            .collect()
    })
}

/// Check that every option referenced by every item belongs to one of the
/// given variants, and that no item references two options of the same
/// variant.
pub fn validate_item_options(items: &[ProductItem], variants: &[Variant]) -> DomainResult<()> {
    let option_owner: HashMap<VariantOptionId, VariantId> = variants
        .iter()
        .flat_map(|v| v.options.iter().map(|o| (o.id, v.id)))
        .collect();

    for item in items {
        let mut used_variants = HashSet::new();
        for option_id in &item.variant_option_ids {
            let Some(variant_id) = option_owner.get(option_id) else {
                return Err(DomainError::invariant(format!(
                    "item {} references an option outside the product's category",
                    item.sku
                )));
            };
            if !used_variants.insert(*variant_id) {
                return Err(DomainError::invariant(format!(
                    "item {} references two options of the same variant",
                    item.sku
                )));
            }
        }
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn variant(name: &str, values: &[&str]) -> Variant {
        Variant::new(
            CategoryId::new(),
            name,
            "",
            0,
            values
                .iter()
                .map(|v| (v.to_string(), String::new(), 0))
                .collect(),
        )
        .unwrap()
    }

    fn product() -> Product {
        Product::new(
            StoreId::new(),
            CategoryId::new(),
            "Trail Tent",
            "Two-person tent",
            Some(4.5),
            true,
            false,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn create_product_success() {
        let p = product();
        assert_eq!(p.name, "Trail Tent");
        assert!(p.items.is_empty());
    }

    #[test]
    fn create_product_rejects_out_of_range_rating() {
        let result = Product::new(
            StoreId::new(),
            CategoryId::new(),
            "Tent",
            "desc",
            Some(5.1),
            false,
            false,
            Utc::now(),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn item_rejects_discount_above_price() {
        let result = ProductItem::new(ProductId::new(), "SKU-1", 1, 1000, Some(1200), vec![]);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn set_items_rejects_duplicate_sku() {
        let mut p = product();
        let a = ProductItem::new(p.id, "SKU-1", 1, 100, None, vec![]).unwrap();
        let b = ProductItem::new(p.id, "SKU-1", 2, 200, None, vec![]).unwrap();
        let result = p.set_items(vec![a, b]);
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn set_items_rejects_foreign_item() {
        let mut p = product();
        let foreign = ProductItem::new(ProductId::new(), "SKU-1", 1, 100, None, vec![]).unwrap();
        let result = p.set_items(vec![foreign]);
        assert!(matches!(result, Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn combinations_cover_all_option_pairs() {
        let size = variant("Size", &["S", "M", "L"]);
        let color = variant("Color", &["Red", "Blue"]);

        let combos = item_combinations(&[size.clone(), color.clone()]);
        assert_eq!(combos.len(), 6);
        for combo in &combos {
            assert_eq!(combo.len(), 2);
            assert!(size.options.iter().any(|o| o.id == combo[0]));
            assert!(color.options.iter().any(|o| o.id == combo[1]));
        }
    }

    #[test]
    fn combinations_of_nothing_is_one_empty_combination() {
        assert_eq!(item_combinations(&[]), vec![Vec::new()]);
    }

    #[test]
    fn combinations_with_optionless_variant_are_empty() {
        let empty = variant("Material", &[]);
        assert!(item_combinations(&[empty]).is_empty());
    }

    #[test]
    fn item_options_must_belong_to_category_variants() {
        let size = variant("Size", &["S"]);
        let stray = variant("Color", &["Red"]);
        let p = product();

        let item = ProductItem::new(p.id, "SKU-1", 0, 0, None, vec![stray.options[0].id]).unwrap();
        let result = validate_item_options(&[item], std::slice::from_ref(&size));
        assert!(matches!(result, Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn item_cannot_use_two_options_of_one_variant() {
        let size = variant("Size", &["S", "M"]);
        let p = product();

        let item = ProductItem::new(
            p.id,
            "SKU-1",
            0,
            0,
            None,
            vec![size.options[0].id, size.options[1].id],
        )
        .unwrap();
        let result = validate_item_options(&[item], std::slice::from_ref(&size));
        assert!(matches!(result, Err(DomainError::InvariantViolation(_))));
    }

    proptest! {
        // The combination count is the product of the option counts, and
        // every combination picks exactly one option per variant, in order.
        #[test]
        fn combination_grid_shape(option_counts in proptest::collection::vec(1usize..5, 0..4)) {
            let variants: Vec<Variant> = option_counts
                .iter()
                .enumerate()
                .map(|(i, &n)| {
                    let values: Vec<String> = (0..n).map(|j| format!("v{i}-{j}")).collect();
                    Variant::new(
                        CategoryId::new(),
                        format!("axis-{i}"),
                        "",
                        i as i32,
                        values.into_iter().map(|v| (v, String::new(), 0)).collect(),
                    )
                    .unwrap()
                })
                .collect();

            let combos = item_combinations(&variants);
            let expected: usize = option_counts.iter().product();
            prop_assert_eq!(combos.len(), expected);

            for combo in &combos {
                prop_assert_eq!(combo.len(), variants.len());
                for (slot, variant) in combo.iter().zip(&variants) {
                    prop_assert!(variant.options.iter().any(|o| o.id == *slot));
                }
            }
        }
    }
}
