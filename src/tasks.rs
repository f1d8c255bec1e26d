//! Background refresh loop for the translation cache. The loop runs one cycle
//! immediately, then once per interval, and stops through a watch channel so an
//! in-flight cycle always finishes before the task exits.

use crate::i18n;
use crate::state::AppContext;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Drive `cycle` until `stop` fires. Cycles never overlap: the next one starts
/// only after the previous finished and the interval elapsed.
pub async fn run_refresh_loop<F, Fut>(mut cycle: F, interval: Duration, mut stop: watch::Receiver<bool>)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        cycle().await;
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = stop.changed() => break,
        }
    }
}

async fn refresh_once(ctx: AppContext) {
    match i18n::fetch_bulk(&ctx.pool, &ctx.settings.languages).await {
        Ok(map) => {
            let total: usize = map.values().map(|by_key| by_key.len()).sum();
            if let Err(e) = i18n::save_to_cache(&ctx.settings.translation_cache_file, &map) {
                tracing::warn!(error = %e, "failed to write translation cache file");
            }
            *ctx.translations_mut() = map;
            tracing::info!(translations = total, "translation cache refreshed");
        }
        // Keep serving the previous cache; the next cycle retries.
        Err(e) => tracing::warn!(error = %e, "translation cache refresh failed"),
    }
}

/// Handle to the spawned refresh task. Dropping it without `shutdown` leaves the
/// task running for the process lifetime.
pub struct CacheRefreshTask {
    handle: JoinHandle<()>,
    stop: watch::Sender<bool>,
}

impl CacheRefreshTask {
    pub fn spawn(ctx: AppContext) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let interval = ctx.settings.cache_refresh_interval;
        tracing::info!(interval_secs = interval.as_secs(), "starting translation cache refresh task");
        let handle = tokio::spawn(async move {
            run_refresh_loop(move || refresh_once(ctx.clone()), interval, stop_rx).await;
            tracing::info!("translation cache refresh task stopped");
        });
        CacheRefreshTask {
            handle,
            stop: stop_tx,
        }
    }

    /// Signal the loop to stop and wait for the in-flight cycle to finish.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "translation cache refresh task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_then_per_interval() {
        let count = Arc::new(AtomicUsize::new(0));
        let (_stop_tx, stop_rx) = watch::channel(false);
        let counter = count.clone();
        tokio::spawn(run_refresh_loop(
            move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            },
            Duration::from_secs(60),
            stop_rx,
        ));

        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1, "first cycle runs without delay");

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::advance(Duration::from_secs(120)).await;
        settle().await;
        // Missed intervals do not queue extra cycles.
        assert!(count.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_finishes_inflight_cycle() {
        let count = Arc::new(AtomicUsize::new(0));
        let (stop_tx, stop_rx) = watch::channel(false);
        let counter = count.clone();
        let handle = tokio::spawn(run_refresh_loop(
            move || {
                let counter = counter.clone();
                async move {
                    // Slow cycle: the stop signal arrives while this sleep runs.
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            },
            Duration::from_secs(60),
            stop_rx,
        ));

        settle().await;
        stop_tx.send(true).unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        handle.await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1, "in-flight cycle completed before exit");

        tokio::time::advance(Duration::from_secs(300)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1, "no cycles after stop");
    }
}
