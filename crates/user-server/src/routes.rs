use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::db::StoreHandle;
use crate::handlers::{health as health_handlers, users as user_handlers};
use crate::repository::UserRepository;
use crate::Config;

#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub store: StoreHandle,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, store: StoreHandle) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            store,
            config,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(
            "/",
            get(user_handlers::list_users).post(user_handlers::create_user),
        )
        .route(
            "/:id",
            get(user_handlers::get_user)
                .put(user_handlers::update_user)
                .delete(user_handlers::delete_user),
        );

    Router::new()
        .route("/api/health", get(health_handlers::health))
        .route("/api/dbstate", get(health_handlers::db_state))
        .nest("/api/users", user_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
