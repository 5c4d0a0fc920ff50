use callscreen::config;
use callscreen::core::{account, recorder, session::SessionStore};
use callscreen::errors::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load screening defaults; a missing config.toml just means built-in defaults
    let defaults = match config::defaults::load_default_config() {
        Ok(defaults) => defaults,
        Err(e) => {
            warn!("No usable config.toml ({e}), using built-in screening defaults.");
            config::defaults::DefaultsConfig::default()
        }
    };
    info!(
        seed_rules = defaults.rules.len(),
        "Screening defaults loaded."
    );

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ready."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Provision existing accounts that have no settings or rules yet
    for acct in account::list_active_accounts(&db).await? {
        config::defaults::provision_account_defaults(&db, acct.id, &defaults)
            .await
            .inspect_err(|e| error!("Failed to provision account {}: {}", acct.id, e))?;
    }
    info!("Account screening defaults provisioned.");

    // 6. Session store and its sweep settings
    let store = Arc::new(SessionStore::new());
    let session_settings = config::session::session_settings_from_env();
    info!(
        idle_secs = session_settings.idle_timeout.as_secs(),
        sweep_secs = session_settings.sweep_interval.as_secs(),
        "Session store ready."
    );

    // 7. Run the idle-session sweep until shutdown. Evicted sessions are
    // finalized as abandoned so their records are never lost.
    let mut sweep = tokio::time::interval(session_settings.sweep_interval);
    sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received.");
                break;
            }
            _ = sweep.tick() => {
                let evicted = store.evict_idle(session_settings.idle_timeout);
                for session in evicted {
                    let session_id = session.session_id.clone();
                    let outcome = recorder::outcome_from_session(
                        session,
                        recorder::InteractionStatus::Abandoned,
                    );
                    if let Err(e) = recorder::finalize_interaction(&db, outcome).await {
                        error!(session_id = %session_id, "Failed to finalize evicted session: {}", e);
                    }
                }
            }
        }
    }

    // Finalize whatever is still active before exiting.
    let remaining = store.evict_idle(std::time::Duration::ZERO);
    info!(count = remaining.len(), "Finalizing remaining sessions before exit.");
    for session in remaining {
        let session_id = session.session_id.clone();
        let outcome =
            recorder::outcome_from_session(session, recorder::InteractionStatus::Abandoned);
        if let Err(e) = recorder::finalize_interaction(&db, outcome).await {
            error!(session_id = %session_id, "Failed to finalize session at shutdown: {}", e);
        }
    }

    Ok(())
}
