use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use recipe_share::config::Config;
use recipe_share::routes::app_router;
use recipe_share::store::RecipeStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load();
    let store = RecipeStore::open(&config.database_path).expect("failed to open recipe database");
    let app = app_router(Arc::new(store));

    // Bind to 0.0.0.0 so other machines on the LAN can reach it
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.port))
        .await
        .expect("failed to bind to address");

    info!("listening on http://localhost:{}", config.port);
    axum::serve(listener, app).await.expect("server error");
}
