//! HTTP handlers for the users API

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

use super::models::{UserDetailsDto, UserDto};
use super::repository::UserRepository;
use super::service::UserService;
use crate::category::{CategoryDto, CategoryRepository};
use crate::error::CatalogResult;
use crate::http::created;

#[derive(OpenApi)]
#[openapi(
    paths(list_users, get_user, create_user, update_user, delete_user),
    components(
        schemas(UserDto, UserDetailsDto, CategoryDto),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            ValidationErrorResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<R, C, U> = Arc<UserService<R, C, U>>;

pub fn router<R, C, U>(service: UserService<R, C, U>) -> Router
where
    R: UserRepository + 'static,
    C: CategoryRepository + 'static,
    U: UnitOfWork + 'static,
{
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(Arc::new(service))
}

/// List users page by page
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of users", body = Page<UserDto>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R, C, U>(
    State(service): State<SharedService<R, C, U>>,
    QueryParams(query): QueryParams<PageQuery>,
) -> CatalogResult<Json<Page<UserDto>>>
where
    R: UserRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    Ok(Json(service.list_paged(query.into()).await?))
}

/// Get a user with the categories they follow
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDetailsDto),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R, C, U>(
    State(service): State<SharedService<R, C, U>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<UserDetailsDto>>
where
    R: UserRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    Ok(Json(service.get_by_id(id).await?))
}

/// Register a user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = UserDetailsDto,
    responses(
        (status = 201, description = "User created", body = UserDto,
            headers(("location" = String, description = "URL of the new user"))),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R, C, U>(
    State(service): State<SharedService<R, C, U>>,
    ValidatedJson(dto): ValidatedJson<UserDetailsDto>,
) -> CatalogResult<Response>
where
    R: UserRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    let user = service.create(dto).await?;
    Ok(created("users", user.id, user))
}

/// Replace a user's fields and followed categories
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserDetailsDto,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R, C, U>(
    State(service): State<SharedService<R, C, U>>,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<UserDetailsDto>,
) -> CatalogResult<Json<UserDto>>
where
    R: UserRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    Ok(Json(service.update(id, dto).await?))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R, C, U>(
    State(service): State<SharedService<R, C, U>>,
    IdPath(id): IdPath,
) -> CatalogResult<StatusCode>
where
    R: UserRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
