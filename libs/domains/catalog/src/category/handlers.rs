//! HTTP handlers for the categories API

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
        BadRequestResponse, DatabaseConflictResponse, InternalServerErrorResponse,
        NotFoundResponse, ValidationErrorResponse,
    },
};
use database::{Page, PageQuery, UnitOfWork};
use std::sync::Arc;
use utoipa::OpenApi;

use super::models::CategoryDto;
use super::repository::CategoryRepository;
use super::service::CategoryService;
use crate::error::CatalogResult;
use crate::http::created;

#[derive(OpenApi)]
#[openapi(
    paths(list_categories, get_category, create_category, update_category, delete_category),
    components(
        schemas(CategoryDto),
        responses(
            NotFoundResponse,
            DatabaseConflictResponse,
            BadRequestResponse,
            ValidationErrorResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Categories", description = "Category management endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<C, U> = Arc<CategoryService<C, U>>;

pub fn router<C, U>(service: CategoryService<C, U>) -> Router
where
    C: CategoryRepository + 'static,
    U: UnitOfWork + 'static,
{
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .with_state(Arc::new(service))
}

/// List categories page by page
#[utoipa::path(
    get,
    path = "",
    tag = "Categories",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of categories", body = Page<CategoryDto>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<C: CategoryRepository, U: UnitOfWork>(
    State(service): State<SharedService<C, U>>,
    QueryParams(query): QueryParams<PageQuery>,
) -> CatalogResult<Json<Page<CategoryDto>>> {
    let page = service.list_paged(query.into()).await?;
    Ok(Json(page))
}

/// Get a category by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryDto),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<C: CategoryRepository, U: UnitOfWork>(
    State(service): State<SharedService<C, U>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<CategoryDto>> {
    Ok(Json(service.get_by_id(id).await?))
}

/// Create a category
#[utoipa::path(
    post,
    path = "",
    tag = "Categories",
    request_body = CategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryDto,
            headers(("location" = String, description = "URL of the new category"))),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<C: CategoryRepository, U: UnitOfWork>(
    State(service): State<SharedService<C, U>>,
    ValidatedJson(dto): ValidatedJson<CategoryDto>,
) -> CatalogResult<Response> {
    let category = service.create(dto).await?;
    Ok(created("categories", category.id, category))
}

/// Rename a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryDto,
    responses(
        (status = 200, description = "Category updated", body = CategoryDto),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<C: CategoryRepository, U: UnitOfWork>(
    State(service): State<SharedService<C, U>>,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<CategoryDto>,
) -> CatalogResult<Json<CategoryDto>> {
    Ok(Json(service.update(id, dto).await?))
}

/// Delete a category no product or user references
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, response = DatabaseConflictResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<C: CategoryRepository, U: UnitOfWork>(
    State(service): State<SharedService<C, U>>,
    IdPath(id): IdPath,
) -> CatalogResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
