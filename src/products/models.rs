use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A catalogue product, as stored in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = "7b0c2f4e9a1d4c3b8e6f5a4d3c2b1a09")]
    pub id: String,
    #[schema(example = "Desk lamp")]
    pub name: String,
    #[schema(example = 24.5)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 12)]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Adjustable LED lamp")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of POST /api/products/create
///
/// `name` and `price` are required, but are checked by the service so that a
/// missing field gets the same message as an empty one.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateProduct {
    #[schema(example = "Desk lamp")]
    pub name: Option<String>,
    #[schema(example = 24.5)]
    pub price: Option<f64>,
    #[schema(example = 12)]
    pub stock: Option<i64>,
    #[schema(example = "Adjustable LED lamp")]
    pub description: Option<String>,
}

/// Body of PUT /api/products/{id}
///
/// All fields are optional to support partial updates
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1))]
    #[schema(example = "Desk lamp (v2)")]
    pub name: Option<String>,
    #[schema(example = 19.99)]
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub description: Option<String>,
}

/// Fields written when a product is created
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields merged into an existing product; absent fields are left untouched
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProductPatch {
    pub fn from_update(update: UpdateProduct, now: DateTime<Utc>) -> Self {
        Self {
            name: update.name,
            price: update.price,
            stock: update.stock,
            description: update.description,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_uses_camel_case_and_omits_absent_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Lamp",
            "price": 10.0,
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(product.stock, None);
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("stock").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_patch_only_carries_present_fields() {
        let patch = ProductPatch::from_update(
            UpdateProduct {
                price: Some(5.0),
                ..Default::default()
            },
            Utc::now(),
        );

        let json = serde_json::to_value(&patch).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(json["price"], 5.0);
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_update_name_must_not_be_empty() {
        let update = UpdateProduct {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateProduct {
            name: Some("Chair".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert!(UpdateProduct::default().validate().is_ok());
    }
}
