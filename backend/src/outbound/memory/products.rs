//! In-memory `ProductRepository`.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{Product, ProductId};

#[derive(Debug, Default)]
pub struct MemoryProductRepository {
    products: Mutex<Vec<Product>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_name(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by(|a, b| a.name.cmp(&b.name));
    products
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        self.products.lock().await.push(product.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let products = self.products.lock().await;
        Ok(products.iter().find(|p| &p.id == id).cloned())
    }

    async fn find_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, ProductRepositoryError> {
        let products = self.products.lock().await;
        Ok(products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        Ok(by_name(self.products.lock().await.clone()))
    }

    async fn list_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let products = self.products.lock().await;
        Ok(by_name(
            products
                .iter()
                .filter(|p| p.category == category)
                .cloned()
                .collect(),
        ))
    }

    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let mut products = self.products.lock().await;
        let Some(stored) = products.iter_mut().find(|p| p.id == product.id) else {
            return Ok(false);
        };
        *stored = product.clone();
        Ok(true)
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let mut products = self.products.lock().await;
        let before = products.len();
        products.retain(|p| &p.id != id);
        Ok(products.len() != before)
    }
}
