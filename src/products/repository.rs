use crate::products::{NewProduct, Product, ProductError, ProductPatch};
use crate::store::{encode, SharedStore};

/// Collection holding product documents
pub const PRODUCTS_COLLECTION: &str = "products";

/// Repository for product operations
#[derive(Clone)]
pub struct ProductRepository {
    store: SharedStore,
}

impl ProductRepository {
    /// Create a new ProductRepository
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All products, oldest first
    pub async fn find_all(&self) -> Result<Vec<Product>, ProductError> {
        let documents = self.store.list(PRODUCTS_COLLECTION).await?;

        let products = documents
            .into_iter()
            .map(|doc| doc.decode())
            .collect::<Result<Vec<Product>, _>>()?;
        Ok(products)
    }

    /// Find a product by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Product>, ProductError> {
        let document = self.store.get(PRODUCTS_COLLECTION, id).await?;
        Ok(document.map(|doc| doc.decode()).transpose()?)
    }

    pub async fn create(&self, product: &NewProduct) -> Result<Product, ProductError> {
        let document = self
            .store
            .create(PRODUCTS_COLLECTION, encode(product)?)
            .await?;
        Ok(document.decode()?)
    }

    /// Merge `patch` into the product; `None` if it does not exist
    pub async fn update(
        &self,
        id: &str,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, ProductError> {
        let document = self
            .store
            .update(PRODUCTS_COLLECTION, id, encode(patch)?)
            .await?;
        Ok(document.map(|doc| doc.decode()).transpose()?)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ProductError> {
        Ok(self.store.delete(PRODUCTS_COLLECTION, id).await?)
    }
}
