use crate::state::AppState;
use anyhow::Result;
use nutri_db::RefreshTokenRepo;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawn the refresh-token sweeper background task.
///
/// Periodically deletes refresh tokens past their expiry so signed-out or
/// abandoned sessions do not accumulate.
pub fn start(state: AppState, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        run_loop(state, cancel).await;
    })
}

async fn run_loop(state: AppState, cancel: CancellationToken) {
    let interval = Duration::from_secs(state.config.auth.sweep_interval_secs);
    tracing::info!("Refresh token sweeper started (interval={:?})", interval);

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {},
            _ = cancel.cancelled() => {
                tracing::info!("Refresh token sweeper shutting down");
                return;
            }
        }

        if let Err(e) = sweep_once(&state).await {
            tracing::error!("Refresh token sweep error: {:#}", e);
        }
    }
}

/// Run a single sweep. Returns the number of tokens removed.
pub async fn sweep_once(state: &AppState) -> Result<u64> {
    let removed = RefreshTokenRepo::delete_expired(&state.pool).await?;
    if removed > 0 {
        tracing::info!("Purged {} expired refresh token(s)", removed);
    }
    Ok(removed)
}
