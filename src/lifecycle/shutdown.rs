//! Signal handling for shutdown
//!
//! In raw mode Ctrl-C arrives as a keystroke, so only signals sent from
//! outside (SIGTERM, or SIGINT between reads) end up here.

use std::io;

use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::debug;

/// Handles shutdown signals (SIGTERM, SIGINT)
pub struct ShutdownSignal {
    sigterm: Signal,
    sigint: Signal,
}

impl ShutdownSignal {
    /// Register the signal handlers
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for a shutdown signal and return its name
    pub async fn wait(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => {
                debug!("received SIGTERM");
                "SIGTERM"
            }
            _ = self.sigint.recv() => {
                debug!("received SIGINT");
                "SIGINT"
            }
        }
    }
}
