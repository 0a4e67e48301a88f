use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatewaysim_core::{
    DomainError, DomainResult, Resource, ResourceId, ResourceKind, optional_text, required_text,
};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ResourceId,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn checked_price(price: f64) -> DomainResult<f64> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(DomainError::bad_request("Price must be a non-negative number"))
    }
}

impl Resource for Product {
    type Draft = NewProduct;
    type Patch = ProductPatch;

    const KIND: ResourceKind = ResourceKind {
        singular: "product",
        plural: "products",
        label: "Product",
    };

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn from_draft(
        id: ResourceId,
        draft: NewProduct,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let (Some(name), Some(price)) = (required_text(draft.name), draft.price) else {
            return Err(DomainError::bad_request("Name and price are required"));
        };

        Ok(Self {
            id,
            name,
            price: checked_price(price)?,
            description: optional_text(draft.description),
            category: optional_text(draft.category),
            tags: draft.tags.unwrap_or_default(),
            created_at,
        })
    }

    fn with_id(self, id: ResourceId) -> Self {
        Self { id, ..self }
    }

    fn apply_patch(&mut self, patch: ProductPatch) -> DomainResult<()> {
        let price = patch.price.map(checked_price).transpose()?;

        if let Some(name) = optional_text(patch.name) {
            self.name = name;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(description) = optional_text(patch.description) {
            self.description = Some(description);
        }
        if let Some(category) = optional_text(patch.category) {
            self.category = Some(category);
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product() -> Product {
        Product::from_draft(
            ResourceId::from("1"),
            NewProduct {
                name: Some("Sample Product 1".into()),
                price: Some(29.99),
                category: Some("Electronics".into()),
                tags: Some(vec!["sample".into()]),
                ..NewProduct::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn create_requires_name_and_price() {
        let err = Product::from_draft(
            ResourceId::from("1"),
            NewProduct {
                name: Some("Nameless price".into()),
                ..NewProduct::default()
            },
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err, DomainError::bad_request("Name and price are required"));
    }

    #[test]
    fn create_rejects_negative_price() {
        let err = Product::from_draft(
            ResourceId::from("1"),
            NewProduct {
                name: Some("Refund".into()),
                price: Some(-1.0),
                ..NewProduct::default()
            },
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::BadRequest(_)));
    }

    #[test]
    fn rejected_patch_leaves_product_unchanged() {
        let mut product = test_product();
        let before = product.clone();

        let err = product
            .apply_patch(ProductPatch {
                name: Some("Renamed".into()),
                price: Some(-5.0),
                ..ProductPatch::default()
            })
            .unwrap_err();

        assert!(matches!(err, DomainError::BadRequest(_)));
        assert_eq!(product, before);
    }

    #[test]
    fn patch_replaces_tags_and_keeps_category() {
        let mut product = test_product();
        product
            .apply_patch(ProductPatch {
                tags: Some(vec!["clearance".into()]),
                ..ProductPatch::default()
            })
            .unwrap();

        assert_eq!(product.tags, vec!["clearance".to_string()]);
        assert_eq!(product.category.as_deref(), Some("Electronics"));
        assert_eq!(product.price, 29.99);
    }

    #[test]
    fn serialized_product_omits_absent_optionals() {
        let value = serde_json::to_value(test_product()).unwrap();
        assert!(value.get("description").is_none());
        assert_eq!(value["category"], "Electronics");
    }
}
