use axum_helpers::{FieldError, StandardError};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(StandardError, FieldError)),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Categories, products and users of the catalog"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/categories", api = domain_catalog::category::ApiDoc),
        (path = "/products", api = domain_catalog::product::ApiDoc),
        (path = "/users", api = domain_catalog::user::ApiDoc)
    )
)]
pub struct ApiDoc;
