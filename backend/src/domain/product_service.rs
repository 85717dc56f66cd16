//! Product catalog service. Reads are public; writes need the admin flag.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    ProductCommand, ProductQuery, ProductRepository, ProductRepositoryError,
};
use crate::domain::{
    Caller, Error, Product, ProductChanges, ProductDraft, ProductId, ProductInput,
};

const NOT_FOUND: &str = "Product not found";

pub(super) fn map_product_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
    }
}

/// Service implementing the catalog driving ports.
#[derive(Clone)]
pub struct ProductCatalogService<P> {
    products: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> ProductCatalogService<P> {
    pub fn new(products: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { products, clock }
    }
}

impl<P: ProductRepository> ProductCatalogService<P> {
    async fn load(&self, id: &ProductId) -> Result<Product, Error> {
        self.products
            .find_by_id(id)
            .await
            .map_err(map_product_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }
}

#[async_trait]
impl<P: ProductRepository> ProductCommand for ProductCatalogService<P> {
    async fn create(&self, caller: &Caller, input: ProductInput) -> Result<Product, Error> {
        caller.require_admin()?;
        let draft = ProductDraft::try_from_input(&input)?;
        let now = self.clock.utc();
        let product = Product {
            id: ProductId::random(),
            name: draft.name,
            price: draft.price,
            image: draft.image,
            category: draft.category,
            description: draft.description,
            rating: draft.rating,
            reviews: draft.reviews,
            is_new: draft.is_new,
            created_at: now,
            updated_at: now,
        };
        self.products
            .insert(&product)
            .await
            .map_err(map_product_error)?;
        info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    async fn update(
        &self,
        caller: &Caller,
        id: &ProductId,
        input: ProductInput,
    ) -> Result<Product, Error> {
        caller.require_admin()?;
        let mut product = self.load(id).await?;
        ProductChanges::try_from_input(&input)?.apply(&mut product, self.clock.utc());
        if !self
            .products
            .update(&product)
            .await
            .map_err(map_product_error)?
        {
            return Err(Error::not_found(NOT_FOUND));
        }
        Ok(product)
    }

    async fn delete(&self, caller: &Caller, id: &ProductId) -> Result<(), Error> {
        caller.require_admin()?;
        let deleted = self.products.delete(id).await.map_err(map_product_error)?;
        if deleted {
            info!(product_id = %id, "product deleted");
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND))
        }
    }
}

#[async_trait]
impl<P: ProductRepository> ProductQuery for ProductCatalogService<P> {
    async fn list(&self) -> Result<Vec<Product>, Error> {
        self.products.list().await.map_err(map_product_error)
    }

    async fn list_by_category(&self, category: String) -> Result<Vec<Product>, Error> {
        self.products
            .list_by_category(&category)
            .await
            .map_err(map_product_error)
    }

    async fn get(&self, id: &ProductId) -> Result<Product, Error> {
        self.load(id).await
    }
}
