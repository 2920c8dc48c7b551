use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tastematch_api::{
    config::Config,
    routes::{create_router, AppState},
    services::store::SupabaseStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Missing credentials fail here, before anything binds
    let config = Config::from_env()?;
    let store = SupabaseStore::from_config(&config)?;

    let state = AppState::new(Arc::new(store)).with_default_top_n(config.default_top_n);
    let app = create_router(Arc::new(state));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
