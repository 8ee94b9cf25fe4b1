//! Runtime control of the ingest handler.
//!
//! The debug flag lives in a shared `DebugSwitch`. Out-of-band events (today
//! only SIGUSR1) never touch it directly: they send a `ControlCommand` over an
//! mpsc channel and the control loop applies it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Atomic debug toggle shared between the handler and the control loop.
#[derive(Debug, Default)]
pub struct DebugSwitch {
    enabled: AtomicBool,
}

impl DebugSwitch {
    pub fn new(enabled: bool) -> Self {
        Self { enabled: AtomicBool::new(enabled) }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::AcqRel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    ToggleDebug,
    SetDebug(bool),
}

pub type ControlSender = mpsc::Sender<ControlCommand>;

/// Apply commands until every sender is dropped.
pub fn spawn_control_loop(
    switch: Arc<DebugSwitch>,
    mut rx: mpsc::Receiver<ControlCommand>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(cmd) = rx.recv().await {
            let enabled = match cmd {
                ControlCommand::ToggleDebug => switch.toggle(),
                ControlCommand::SetDebug(v) => {
                    switch.set(v);
                    v
                }
            };
            tracing::info!(?cmd, enabled, "debug mode changed");
        }
        tracing::debug!("control channel closed");
    })
}

/// Translate every SIGUSR1 into `ToggleDebug`.
#[cfg(unix)]
pub fn spawn_signal_listener(tx: ControlSender) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut usr1 = signal(SignalKind::user_defined1())?;
    Ok(tokio::spawn(async move {
        while usr1.recv().await.is_some() {
            if tx.send(ControlCommand::ToggleDebug).await.is_err() {
                break;
            }
        }
    }))
}
