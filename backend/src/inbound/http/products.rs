//! Product catalog handlers. Reads are public; writes require an admin.
//!
//! ```text
//! GET /api/products
//! GET /api/products/category/Toys
//! POST /api/products {"name":"Chew Toy","price":4.99,"category":"Toys"}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Product, ProductId, ProductInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ID, parse_id};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub is_new: Option<bool>,
}

impl From<ProductRequest> for ProductInput {
    fn from(value: ProductRequest) -> Self {
        Self {
            name: value.name,
            price: value.price,
            image: value.image,
            category: value.category,
            description: value.description,
            rating: value.rating,
            reviews: value.reviews,
            is_new: value.is_new,
        }
    }
}

/// `{success, message}` acknowledgement used by the shop endpoints.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    pub count: usize,
    pub products: Vec<Product>,
}

impl From<Vec<Product>> for ProductListResponse {
    fn from(products: Vec<Product>) -> Self {
        Self {
            success: true,
            count: products.len(),
            products,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProductResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub product: Product,
}

impl ProductResponse {
    fn found(product: Product) -> Self {
        Self {
            success: true,
            message: None,
            product,
        }
    }

    fn with_message(product: Product, message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_owned()),
            product,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses((status = 200, description = "Products ordered by name", body = ProductListResponse)),
    tags = ["products"],
    operation_id = "listProducts",
    security([])
)]
#[get("/products")]
pub async fn list_products(state: web::Data<HttpState>) -> ApiResult<web::Json<ProductListResponse>> {
    let products = state.products_query.list().await?;
    Ok(web::Json(products.into()))
}

#[utoipa::path(
    get,
    path = "/api/products/category/{category}",
    params(("category" = String, Path, description = "Exact category name")),
    responses((status = 200, description = "Products in the category", body = ProductListResponse)),
    tags = ["products"],
    operation_id = "listProductsByCategory",
    security([])
)]
#[get("/products/category/{category}")]
pub async fn list_products_by_category(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProductListResponse>> {
    let products = state
        .products_query
        .list_by_category(path.into_inner())
        .await?;
    Ok(web::Json(products.into()))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProduct",
    security([])
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProductResponse>> {
    let id: ProductId = parse_id(&path, ID)?;
    let product = state.products_query.get(&id).await?;
    Ok(web::Json(ProductResponse::found(product)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Please provide all required fields", body = Error),
        (status = 403, description = "Admin access required", body = Error)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    let product = state
        .products
        .create(session.caller(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(ProductResponse::with_message(
        product,
        "Product created successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 403, description = "Admin access required", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<web::Json<ProductResponse>> {
    let id: ProductId = parse_id(&path, ID)?;
    let product = state
        .products
        .update(session.caller(), &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(ProductResponse::with_message(
        product,
        "Product updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product deleted", body = SuccessResponse),
        (status = 403, description = "Admin access required", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let id: ProductId = parse_id(&path, ID)?;
    state.products.delete(session.caller(), &id).await?;
    Ok(web::Json(SuccessResponse::new("Product deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TestBackend, bearer};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn catalog_reads_are_public_and_sorted_by_name() {
        let backend = TestBackend::new();
        backend.add_product("Water Bowl", 8.0, "Accessories").await;
        backend.add_product("Chew Toy", 4.99, "Toys").await;
        let app = test::init_service(backend.app()).await;

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/api/products").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);
        assert_eq!(body["products"][0]["name"], "Chew Toy");
        assert_eq!(body["products"][0]["price"], 4.99);
        assert_eq!(body["products"][0]["rating"], 0.0);
        assert_eq!(body["products"][0]["isNew"], false);

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/products/category/Toys")
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["products"][0]["category"], "Toys");
    }

    #[actix_web::test]
    async fn only_admins_create_products() {
        let backend = TestBackend::new();
        let jane = backend.register("jane@example.com").await;
        let admin = backend.register_admin("admin@example.com").await;
        let app = test::init_service(backend.app()).await;
        let payload = json!({ "name": "Chew Toy", "price": 4.99, "category": "Toys" });

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/products")
                .insert_header(bearer(&jane.token))
                .set_json(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/products")
                .insert_header(bearer(&admin.token))
                .set_json(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Product created successfully");
        assert_eq!(body["product"]["name"], "Chew Toy");
    }

    #[actix_web::test]
    async fn missing_required_fields_are_rejected() {
        let backend = TestBackend::new();
        let admin = backend.register_admin("admin@example.com").await;
        let app = test::init_service(backend.app()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/products")
                .insert_header(bearer(&admin.token))
                .set_json(json!({ "name": "Chew Toy" }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Please provide all required fields");
    }

    #[actix_web::test]
    async fn unknown_product_is_not_found() {
        let backend = TestBackend::new();
        let app = test::init_service(backend.app()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/products/{}", ProductId::random()))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Product not found");
    }
}
