//! smek: command decoder for the SMEK switch panel
//!
//! The panel's 41 switches are wired to an IPAC-4 encoder that shows up
//! as a USB keyboard. This program:
//! - Reads the encoder one raw keystroke at a time
//! - Decodes keystrokes into commands, ended by the EXECUTE switch
//! - Selects a sound effect for every accepted key
//! - Prints each command with the panel grid
//!
//! Audio output itself is not part of this program; the effect player
//! only tracks which resource each key selects.

mod config;
mod effects;
mod events;
mod input;
mod lifecycle;
mod sequencer;
mod session;
mod switch;

use std::io;
use std::thread;

use anyhow::{anyhow, Context, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::effects::{EffectPlayer, SoundRegistry};
use crate::events::SwitchEvent;
use crate::lifecycle::ShutdownSignal;
use crate::sequencer::SwitchSequencer;
use crate::session::SessionSummary;
use crate::switch::map_char_to_switch;

fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        input::restore_terminal();
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, commands to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(io::stderr)
        .init();

    setup_panic_hook();

    info!(version = env!("CARGO_PKG_VERSION"), "smek starting");

    let config = Config::load()?;
    info!(
        quit = ?config.quit_char,
        output = ?config.output,
        raw_mode = config.raw_mode,
        "configuration loaded"
    );

    let registry = SoundRegistry::load(&config.sounds_path)?;
    if registry.is_empty() {
        warn!("sound registry is empty, no effects will play");
    }

    let mut shutdown = ShutdownSignal::new().context("failed to register signal handlers")?;

    // Reader thread -> effect player
    let (event_tx, event_rx) = mpsc::channel::<SwitchEvent>(64);
    let player = tokio::spawn(EffectPlayer::new(registry).run(event_rx));

    // The reader blocks on the encoder, so it gets its own thread
    let (done_tx, done_rx) = oneshot::channel();
    thread::Builder::new()
        .name("switch-reader".to_string())
        .spawn(move || {
            let result = run_reader(&config, event_tx);
            let _ = done_tx.send(result);
        })
        .context("failed to spawn reader thread")?;

    info!("decoder initialized, waiting for input");

    let session = tokio::select! {
        result = done_rx => {
            Some(result.unwrap_or_else(|_| Err(anyhow!("reader thread exited without a result"))))
        }
        signal = shutdown.wait() => {
            info!(signal, "shutdown signal received");
            input::restore_terminal();
            None
        }
    };

    match session {
        Some(result) => {
            match player.await {
                Ok(stats) => info!(
                    started = stats.started,
                    missing = stats.missing,
                    stopped = stats.stopped,
                    "effect player finished"
                ),
                Err(e) => warn!(?e, "effect player task failed"),
            }
            let summary = result.inspect_err(|e| error!(?e, "session failed"))?;
            info!(
                commands = summary.commands,
                ignored = summary.ignored,
                "smek stopped"
            );
        }
        None => {
            // The reader may still be blocked on a read; it goes away with the process
            player.abort();
            info!("smek stopped");
        }
    }

    Ok(())
}

/// Run the decoder on the current thread until quit or input failure
fn run_reader(config: &Config, event_tx: mpsc::Sender<SwitchEvent>) -> Result<SessionSummary> {
    let observer_tx = event_tx.clone();
    let mut sequencer = SwitchSequencer::with_observer(config.quit_char, move |ch| {
        if let Some(switch) = map_char_to_switch(ch) {
            let event = SwitchEvent::SwitchPressed { switch, character: ch };
            if observer_tx.blocking_send(event).is_err() {
                debug!("effect player gone, dropping key event");
            }
        }
    });

    let mut source = input::open(config.raw_mode);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    session::run(&mut sequencer, &mut source, &mut out, config.output, |event| {
        if event_tx.blocking_send(event).is_err() {
            debug!("effect player gone, dropping session event");
        }
    })
}
