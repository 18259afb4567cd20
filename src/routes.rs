use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers;
use crate::store::RecipeStore;

/// Builds the route table once at startup; the store is the only shared state.
pub fn app_router(store: Arc<RecipeStore>) -> Router {
    Router::new()
        .route("/home/", get(handlers::home))
        .route(
            "/recipes/",
            get(handlers::list_recipes).post(handlers::create_recipe),
        )
        .route("/recipes/delete/{id}/", get(handlers::delete_recipe))
        .route(
            "/recipes/edit/{id}/",
            get(handlers::edit_recipe).post(handlers::update_recipe),
        )
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}
