use chrono::Utc;
use validator::Validate;

use crate::products::{
    CreateProduct, NewProduct, Product, ProductError, ProductPatch, ProductRepository,
    UpdateProduct,
};
use crate::validation::{validate_positive_price, validate_stock};

/// Service for product business logic
#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
}

impl ProductService {
    /// Create a new ProductService
    pub fn new(repo: ProductRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Product>, ProductError> {
        self.repo.find_all().await
    }

    pub async fn get(&self, id: &str) -> Result<Product, ProductError> {
        self.repo.find_by_id(id).await?.ok_or(ProductError::NotFound)
    }

    /// Create a product and return its id
    ///
    /// # Errors
    /// * `Validation` - missing/empty name, missing price, non-positive price, negative stock
    pub async fn create(&self, input: CreateProduct) -> Result<String, ProductError> {
        let name = input
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(ProductError::fields_required)?;
        let price = input.price.ok_or_else(ProductError::fields_required)?;

        validate_positive_price(price).map_err(|_| ProductError::invalid_price())?;
        if let Some(stock) = input.stock {
            validate_stock(stock).map_err(|_| ProductError::invalid_stock())?;
        }

        let now = Utc::now();
        let product = self
            .repo
            .create(&NewProduct {
                name,
                price,
                stock: input.stock,
                description: input.description,
                created_at: now,
                updated_at: now,
            })
            .await?;

        Ok(product.id)
    }

    /// Apply a partial update and return the product id
    ///
    /// Existence is checked before the fields, so an unknown id is reported as
    /// `NotFound` even when the body is invalid.
    pub async fn update(&self, id: &str, input: UpdateProduct) -> Result<String, ProductError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound);
        }

        input.validate().map_err(|_| ProductError::empty_name())?;
        if let Some(price) = input.price {
            validate_positive_price(price).map_err(|_| ProductError::invalid_price())?;
        }
        if let Some(stock) = input.stock {
            validate_stock(stock).map_err(|_| ProductError::invalid_stock())?;
        }

        let patch = ProductPatch::from_update(input, Utc::now());
        let product = self
            .repo
            .update(id, &patch)
            .await?
            .ok_or(ProductError::NotFound)?;

        Ok(product.id)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ProductError> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(ProductError::NotFound)
        }
    }
}
