use anyhow::Context;
use std::sync::Arc;

use reelshelf::{
    config::Config,
    db::{AppwriteClient, DocumentStore, MemoryDocumentStore},
    routes::{create_router, AppState},
    services::{
        AccountProvider, LocalAccounts, PopularityTracker, RemoteDataClient, SavedMoviesRegistry,
        TmdbProvider,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "reelshelf=debug,tower_http=info".to_string());
    tracing_subscriber::fmt().with_env_filter(&env_filter).init();

    let config = Config::from_env()?;

    let (store, accounts): (Arc<dyn DocumentStore>, Arc<dyn AccountProvider>) =
        match &config.appwrite_project_id {
            Some(project_id) => {
                let client = Arc::new(AppwriteClient::new(
                    config.appwrite_endpoint.clone(),
                    project_id.clone(),
                    config.appwrite_api_key.clone(),
                    config.appwrite_database_id.clone(),
                )?);
                let store: Arc<dyn DocumentStore> = client.clone();
                let accounts: Arc<dyn AccountProvider> = client;
                (store, accounts)
            }
            None => {
                tracing::warn!("APPWRITE_PROJECT_ID not set, using in-memory store without accounts");
                let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
                let accounts: Arc<dyn AccountProvider> = Arc::new(LocalAccounts);
                (store, accounts)
            }
        };

    let movies = Arc::new(TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    let remote = Arc::new(RemoteDataClient::new(movies, store, accounts));

    let collections = config.collections();
    let state = Arc::new(AppState {
        tracker: Arc::new(PopularityTracker::new(
            remote.clone(),
            collections.search_popularity,
        )),
        registry: Arc::new(SavedMoviesRegistry::new(
            remote.clone(),
            collections.saved_movies,
        )),
        remote,
        trending_limit: config.trending_limit,
    });

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Gateway listening");

    axum::serve(listener, app).await?;
    Ok(())
}
