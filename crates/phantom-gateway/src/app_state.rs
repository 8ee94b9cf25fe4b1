//! Shared application state for the phantom gateway.
//!
//! Owns the collaborators the ingest handler needs: the metrics registry
//! (injected as the handler's counter sink) and the debug switch. Nothing is
//! reached through globals.

use std::sync::Arc;

use phantom_core::error::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::PhantomConfig;
use crate::control::{self, ControlSender, DebugSwitch};
use crate::ingest::{IngestHandler, IngestSettings};
use crate::obs::IngestMetrics;

const CONTROL_CHANNEL_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    ingest: Arc<IngestHandler>,
}

struct AppStateInner {
    cfg: PhantomConfig,
    metrics: Arc<IngestMetrics>,
    debug: Arc<DebugSwitch>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: PhantomConfig) -> Result<Self> {
        let settings = IngestSettings::from_config(&cfg.server)?;
        let metrics = Arc::new(IngestMetrics::default());
        let debug = Arc::new(DebugSwitch::new(cfg.server.debug));

        let sink = Arc::clone(&metrics);
        let ingest = IngestHandler::new(settings, Arc::clone(&debug), sink);

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, metrics, debug }),
            ingest: Arc::new(ingest),
        })
    }

    pub fn cfg(&self) -> &PhantomConfig {
        &self.inner.cfg
    }

    pub fn ingest(&self) -> Arc<IngestHandler> {
        Arc::clone(&self.ingest)
    }

    pub fn metrics(&self) -> Arc<IngestMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    pub fn debug(&self) -> Arc<DebugSwitch> {
        Arc::clone(&self.inner.debug)
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    /// Gauges rendered next to the registry.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![("phantom_debug_mode", u64::from(self.inner.debug.is_enabled()))]
    }

    /// Spawn the control loop for this state's debug switch.
    /// The loop ends once the returned sender (and its clones) are dropped.
    pub fn start_control(&self) -> (ControlSender, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(CONTROL_CHANNEL_CAPACITY);
        let handle = control::spawn_control_loop(self.debug(), rx);
        (tx, handle)
    }
}
