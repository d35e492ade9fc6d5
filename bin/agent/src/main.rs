//! Agent process entrypoint.
//!
//! Wires the retriever, contact store, calendar client, and NATS
//! session transport together, then consumes inbound session events
//! until shutdown. Each session gets its own worker; turn routing and
//! tool dispatch live in the library crates.

mod config;
mod db;
mod error;

use config::AgentConfig;
use db::PgContactStore;
use error::BootstrapError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use switchboard_calendar::NylasCalendar;
use switchboard_contacts::{ContactOperations, ContactStore, ContactToolDispatcher};
use switchboard_conversation::nats::NatsChannelFactory;
use switchboard_conversation::{run_inbound_loop, DialogueCoordinator, SessionRegistry};
use switchboard_core::Result;
use switchboard_retrieval::HttpRetriever;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(error) = run().await {
        tracing::error!(%error, "agent failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BootstrapError> {
    let config = AgentConfig::from_env().map_err(|e| BootstrapError::InvalidConfig {
        details: e.to_string(),
    })?;
    tracing::info!("Loaded configuration");

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| BootstrapError::DatabaseUnavailable {
            details: e.to_string(),
        })?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| BootstrapError::DatabaseUnavailable {
            details: e.to_string(),
        })?;

    let store: Arc<dyn ContactStore> = Arc::new(PgContactStore::new(db_pool));

    let retriever = Arc::new(HttpRetriever::new(config.retrieval).map_err(|e| {
        BootstrapError::ClientBuildFailed {
            component: "retrieval",
            details: e.to_string(),
        }
    })?);
    let calendar = Arc::new(NylasCalendar::new(config.calendar).map_err(|e| {
        BootstrapError::ClientBuildFailed {
            component: "calendar",
            details: e.to_string(),
        }
    })?);

    let coordinator = Arc::new(DialogueCoordinator::new(
        retriever,
        Arc::clone(&store),
        config.retrieval_policy,
    ));
    let ops = Arc::new(ContactOperations::new(store, calendar, config.scheduling));
    let dispatcher = Arc::new(ContactToolDispatcher::new(ops));

    tracing::info!(url = %config.nats.url, "Connecting to NATS...");
    let nats = async_nats::connect(&config.nats.url).await.map_err(|e| {
        BootstrapError::MessagingUnavailable {
            details: e.to_string(),
        }
    })?;

    let registry = Arc::new(SessionRegistry::new(
        coordinator,
        dispatcher,
        Arc::new(NatsChannelFactory::new(nats.clone())),
    ));

    tracing::info!("Agent ready");
    run_inbound_loop(nats, registry)
        .await
        .map_err(|e| BootstrapError::MessagingUnavailable {
            details: e.to_string(),
        })?;

    Ok(())
}
