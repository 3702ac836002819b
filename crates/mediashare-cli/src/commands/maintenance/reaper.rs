//! Background purge loop.
//!
//! Sweeps run on a tokio interval, each one on the blocking pool since
//! SQLite calls block. The first sweep happens at startup so a restarted
//! daemon clears whatever expired while it was down.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use mediashare_core::{Clock, EntryStore, Persistence};

use crate::app::AppContext;
use crate::cli::ReaperArgs;
use crate::helpers::parse_duration;

pub fn handle_reaper(ctx: &AppContext, args: &ReaperArgs) -> anyhow::Result<()> {
    let interval = match args.interval.as_deref() {
        Some(value) => parse_duration(value)?
            .to_std()
            .map_err(|e| anyhow::anyhow!("Invalid interval {}: {}", value, e))?,
        None => ctx.config()?.reaper_interval(),
    };
    let store = Arc::new(ctx.open_store()?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to start runtime: {}", e))?;
    runtime.block_on(run_reaper(store, interval));
    Ok(())
}

async fn run_reaper<P, C>(store: Arc<EntryStore<P, C>>, interval: Duration)
where
    P: Persistence + 'static,
    C: Clock + 'static,
{
    info!(interval_secs = interval.as_secs(), "reaper started");

    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("reaper stopping");
                break;
            }
            _ = timer.tick() => {
                sweep(&store).await;
            }
        }
    }
}

/// One purge pass. Failures are logged; the loop keeps going.
async fn sweep<P, C>(store: &Arc<EntryStore<P, C>>) -> usize
where
    P: Persistence + 'static,
    C: Clock + 'static,
{
    let store = Arc::clone(store);
    match tokio::task::spawn_blocking(move || store.reap_now()).await {
        Ok(Ok(0)) => {
            debug!("no expired shares");
            0
        }
        Ok(Ok(removed)) => {
            info!(removed, "purged expired shares");
            removed
        }
        Ok(Err(e)) => {
            warn!(error = %e, "reaper sweep failed");
            0
        }
        Err(e) => {
            warn!(error = %e, "reaper task did not complete");
            0
        }
    }
}
