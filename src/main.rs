use server_notices::{
    build_router,
    event::InMemoryEventCreator,
    membership::InMemoryMembershipStore,
    room::InMemoryRoomCreator,
    AppConfig, AppState, NoticeDispatcher, NoticeRoomResolver,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; real deployments set the environment directly
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server_notices=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!("Starting server notices service");
    if !config.notices.is_enabled() {
        warn!("SERVER_NOTICES_SYSTEM_MXID is not set, server notices are disabled");
    }

    // In-memory collaborators; swap for persistent implementations behind the same traits
    let notices_config = Arc::new(config.notices.clone());
    let membership_store = Arc::new(InMemoryMembershipStore::new());
    let room_creator = Arc::new(InMemoryRoomCreator::new(membership_store.clone()));
    let event_creator = Arc::new(InMemoryEventCreator::new(membership_store.clone()));

    let resolver = Arc::new(NoticeRoomResolver::new(
        notices_config.clone(),
        membership_store,
        room_creator,
    ));
    let dispatcher = Arc::new(NoticeDispatcher::new(notices_config, resolver, event_creator));

    let app = build_router(AppState::new(dispatcher));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
