//! Poll-cycle orchestration.
//!
//! The watcher owns every piece of mutable state in the crate: the current
//! process descriptor, the last published watch state, and the poll-task
//! handle. Each is replaced wholesale under a short lock, never mutated in
//! place, and no lock is held across an await.

use crate::error::{CoreError, CoreResult};
use crate::modules::classifier::QuotaClassifier;
use crate::modules::config::WatcherConfig;
use crate::modules::locator::{PortInspector, ProcessIndex, ProcessLocator};
use gravimeter_types::{ProcessInfo, QuotaSnapshot, WatchState};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Runs locate/fetch/classify cycles on a fixed interval and publishes the
/// result as a [`WatchState`].
pub struct QuotaWatcher {
    config: WatcherConfig,
    locator: ProcessLocator,
    classifier: QuotaClassifier,
    process: RwLock<Option<ProcessInfo>>,
    state: RwLock<WatchState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl QuotaWatcher {
    /// Watcher backed by the real process table and socket tools.
    pub fn new(config: WatcherConfig) -> Self {
        Self {
            locator: ProcessLocator::new(),
            classifier: QuotaClassifier::new(),
            config,
            process: RwLock::new(None),
            state: RwLock::new(WatchState::Detecting),
            task: Mutex::new(None),
        }
    }

    /// Watcher with injected enumeration strategies (used by tests).
    pub fn with_parts(
        config: WatcherConfig,
        index: Arc<dyn ProcessIndex>,
        inspector: Arc<dyn PortInspector>,
    ) -> Self {
        Self {
            locator: ProcessLocator::with_parts(index, inspector),
            classifier: QuotaClassifier::new(),
            config,
            process: RwLock::new(None),
            state: RwLock::new(WatchState::Detecting),
            task: Mutex::new(None),
        }
    }

    /// Last published state (cheap clone).
    pub fn state(&self) -> WatchState {
        self.state.read().clone()
    }

    /// Connection parameters of the currently tracked server, if any.
    pub fn process(&self) -> Option<ProcessInfo> {
        self.process.read().clone()
    }

    /// Run one locate/fetch/classify cycle and publish the outcome.
    pub async fn refresh(&self) -> CoreResult<QuotaSnapshot> {
        match self.refresh_inner().await {
            Ok(snapshot) => {
                *self.state.write() = WatchState::Ready(snapshot.clone());
                Ok(snapshot)
            },
            Err(e) => {
                tracing::warn!("poll cycle failed: {e}");
                *self.state.write() = WatchState::Unavailable;
                Err(e)
            },
        }
    }

    async fn refresh_inner(&self) -> CoreResult<QuotaSnapshot> {
        let info = match self.process() {
            Some(info) => info,
            None => self.detect().await?,
        };

        match self.classifier.fetch_and_classify(&info).await {
            Ok(snapshot) => Ok(snapshot),
            Err(first) => {
                // The IDE may have restarted the server on a new port since
                // the last cycle. Re-detect once, retry once, then report
                // this cycle as failed; the next tick starts from scratch.
                tracing::debug!("fetch failed ({first}), re-detecting");
                *self.process.write() = None;
                let fresh = self.detect().await?;
                match self.classifier.fetch_and_classify(&fresh).await {
                    Ok(snapshot) => Ok(snapshot),
                    Err(second) => {
                        *self.process.write() = None;
                        Err(second)
                    },
                }
            },
        }
    }

    async fn detect(&self) -> CoreResult<ProcessInfo> {
        let found = self.locator.locate(self.config.workspace_hint.as_deref()).await;
        *self.process.write() = found.clone();
        found.ok_or_else(|| {
            CoreError::ProcessNotFound("no running language server".to_string())
        })
    }

    /// Start the poll loop. The first cycle runs immediately; a second
    /// `start` replaces (and aborts) a previous loop.
    pub fn start(self: &Arc<Self>) {
        let watcher = Arc::clone(self);
        let interval = self.config.effective_poll_interval();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                // refresh already published the failure; nothing else to do.
                let _ = watcher.refresh().await;
            }
        });
        if let Some(previous) = self.task.lock().replace(handle) {
            previous.abort();
        }
        tracing::info!(interval_secs = interval.as_secs(), "quota watcher started");
    }

    /// Stop the poll loop. The last published state stays readable.
    pub fn stop(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
            tracing::info!("quota watcher stopped");
        }
    }
}
