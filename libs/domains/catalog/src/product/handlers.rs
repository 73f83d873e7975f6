//! HTTP handlers for the products API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::get,
};
use axum_helpers::{
    IdPath, QueryParams, ValidatedJson,
    errors::responses::{
        BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
        ValidationErrorResponse,
    },
};
use database::{Page, PageQuery, UnitOfWork};
use std::sync::Arc;
use utoipa::OpenApi;

use super::models::{ProductDetailsDto, ProductDto, ProductFilter};
use super::repository::ProductRepository;
use super::service::ProductService;
use crate::category::{CategoryDto, CategoryRepository};
use crate::error::CatalogResult;
use crate::http::created;

#[derive(OpenApi)]
#[openapi(
    paths(list_products, get_product, create_product, update_product, delete_product),
    components(
        schemas(ProductDto, ProductDetailsDto, CategoryDto),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            ValidationErrorResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<P, C, U> = Arc<ProductService<P, C, U>>;

pub fn router<P, C, U>(service: ProductService<P, C, U>) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
    U: UnitOfWork + 'static,
{
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(Arc::new(service))
}

/// List products, optionally filtered by name fragment and category
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(PageQuery, ProductFilter),
    responses(
        (status = 200, description = "One page of products", body = Page<ProductDto>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<P, C, U>(
    State(service): State<SharedService<P, C, U>>,
    QueryParams(query): QueryParams<PageQuery>,
    QueryParams(filter): QueryParams<ProductFilter>,
) -> CatalogResult<Json<Page<ProductDto>>>
where
    P: ProductRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    let page = service.list_paged(filter, query.into()).await?;
    Ok(Json(page))
}

/// Get a product with its categories
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductDetailsDto),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<P, C, U>(
    State(service): State<SharedService<P, C, U>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<ProductDetailsDto>>
where
    P: ProductRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    Ok(Json(service.get_by_id(id).await?))
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductDetailsDto,
    responses(
        (status = 201, description = "Product created", body = ProductDto,
            headers(("location" = String, description = "URL of the new product"))),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<P, C, U>(
    State(service): State<SharedService<P, C, U>>,
    ValidatedJson(dto): ValidatedJson<ProductDetailsDto>,
) -> CatalogResult<Response>
where
    P: ProductRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    let product = service.create(dto).await?;
    Ok(created("products", product.id, product))
}

/// Replace a product's fields and categories
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductDetailsDto,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<P, C, U>(
    State(service): State<SharedService<P, C, U>>,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<ProductDetailsDto>,
) -> CatalogResult<Json<ProductDto>>
where
    P: ProductRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    Ok(Json(service.update(id, dto).await?))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<P, C, U>(
    State(service): State<SharedService<P, C, U>>,
    IdPath(id): IdPath,
) -> CatalogResult<StatusCode>
where
    P: ProductRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
