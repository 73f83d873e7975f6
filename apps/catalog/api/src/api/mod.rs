use axum::{Router, routing::get};
use domain_catalog::category::{CategoryService, PgCategoryRepository};
use domain_catalog::product::{PgProductRepository, ProductService};
use domain_catalog::user::{PgUserRepository, UserService};

use crate::state::AppState;

pub mod health;

/// Creates the API routes without the `/api` prefix, which `create_router` adds.
///
/// Every service opens its transactions on the shared pool.
pub fn routes(state: &AppState) -> Router {
    let categories = CategoryService::new(PgCategoryRepository::new(), state.db.clone());
    let products = ProductService::new(
        PgProductRepository::new(),
        PgCategoryRepository::new(),
        state.db.clone(),
    );
    let users = UserService::new(
        PgUserRepository::new(),
        PgCategoryRepository::new(),
        state.db.clone(),
    );

    Router::new()
        .nest("/categories", domain_catalog::category::router(categories))
        .nest("/products", domain_catalog::product::router(products))
        .nest("/users", domain_catalog::user::router(users))
}

/// Router with `GET /ready`, mergeable with the stateless app router.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{app_info, server::ServerConfig};
    use database::postgres::PostgresConfig;
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use tower::ServiceExt;

    fn state(db: sea_orm::DatabaseConnection) -> AppState {
        AppState {
            config: Config {
                app: app_info!(),
                database: PostgresConfig::default(),
                server: ServerConfig::default(),
                environment: Environment::Development,
                run_migrations: false,
            },
            db,
        }
    }

    #[tokio::test]
    async fn test_ready_reports_unreachable_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".to_string())])
            .into_connection();

        let response = ready_router(state(db))
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "not ready");
        assert_eq!(json["checks"]["database"], "disconnected");
    }
}
