//! Effect player task
//!
//! Follows the switch events from the reader thread and keeps track of
//! which effect is playing. A new key stops the previous effect before
//! starting its own; finishing a command stops everything.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::events::SwitchEvent;
use crate::switch::Switch;

use super::registry::SoundRegistry;

/// Totals reported when the player exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Effects started
    pub started: u64,
    /// Keys with no resource assigned
    pub missing: u64,
    /// Effects stopped before the next one
    pub stopped: u64,
}

#[derive(Debug)]
struct NowPlaying {
    switch: Switch,
    resource: PathBuf,
}

/// Selects the effect for each accepted key
pub struct EffectPlayer {
    registry: SoundRegistry,
    now_playing: Option<NowPlaying>,
    stats: PlaybackStats,
}

impl EffectPlayer {
    pub fn new(registry: SoundRegistry) -> Self {
        Self {
            registry,
            now_playing: None,
            stats: PlaybackStats::default(),
        }
    }

    /// Consume events until the session ends or the sender goes away
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<SwitchEvent>) -> PlaybackStats {
        info!(effects = self.registry.len(), "effect player started");

        while let Some(event) = event_rx.recv().await {
            if !self.handle(&event) {
                break;
            }
        }

        self.stop();
        debug!(stats = ?self.stats, "effect player stopped");
        self.stats
    }

    /// Apply one event. Returns false once the session has ended.
    pub fn handle(&mut self, event: &SwitchEvent) -> bool {
        debug!(%event, "effect player event");

        match event {
            SwitchEvent::SwitchPressed { switch, character } => {
                echo_key(*switch, *character);
                self.stop();
                self.start(*switch);
                true
            }
            SwitchEvent::CommandCompleted { .. } | SwitchEvent::CommandIgnored => {
                self.stop();
                true
            }
            SwitchEvent::SessionEnded => false,
        }
    }

    fn start(&mut self, switch: Switch) {
        match self.registry.effect_for(switch) {
            Some(resource) => {
                info!(%switch, ?resource, "playing effect");
                self.now_playing = Some(NowPlaying {
                    switch,
                    resource: resource.to_path_buf(),
                });
                self.stats.started += 1;
            }
            None => {
                warn!(%switch, "no effect assigned to switch");
                self.stats.missing += 1;
            }
        }
    }

    fn stop(&mut self) {
        if let Some(playing) = self.now_playing.take() {
            debug!(switch = %playing.switch, resource = ?playing.resource, "stopping effect");
            self.stats.stopped += 1;
        }
    }
}

/// Log the key the way it arrived from the encoder
fn echo_key(switch: Switch, character: char) {
    let ordinal = character as u32;
    if character.is_ascii_graphic() {
        info!("[{}] '{}' {}", switch, character, ordinal);
    } else {
        info!("[{}] not printable {}", switch, ordinal);
    }
}

#[cfg(test)]
impl EffectPlayer {
    fn now_playing(&self) -> Option<Switch> {
        self.now_playing.as_ref().map(|p| p.switch)
    }

    fn stats(&self) -> PlaybackStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(n: u8, character: char) -> SwitchEvent {
        SwitchEvent::SwitchPressed {
            switch: Switch::new(n).unwrap(),
            character,
        }
    }

    #[test]
    fn test_new_key_replaces_effect() {
        let mut player = EffectPlayer::new(SoundRegistry::builtin());

        assert!(player.handle(&pressed(1, 'a')));
        assert_eq!(player.now_playing(), Switch::new(1));

        assert!(player.handle(&pressed(2, 'b')));
        assert_eq!(player.now_playing(), Switch::new(2));

        let stats = player.stats();
        assert_eq!(stats.started, 2);
        assert_eq!(stats.stopped, 1);
    }

    #[test]
    fn test_command_completion_stops_effect() {
        let mut player = EffectPlayer::new(SoundRegistry::builtin());
        player.handle(&pressed(27, '0'));

        assert!(player.handle(&SwitchEvent::CommandCompleted {
            active_count: 1,
            sequence: "0".to_string(),
        }));
        assert!(player.now_playing().is_none());

        player.handle(&pressed(27, '0'));
        assert!(player.handle(&SwitchEvent::CommandIgnored));
        assert!(player.now_playing().is_none());
    }

    #[test]
    fn test_missing_effect_is_counted() {
        let registry = SoundRegistry::from_json(r#"{"effects":[]}"#).unwrap();
        let mut player = EffectPlayer::new(registry);

        player.handle(&pressed(5, 'e'));
        assert!(player.now_playing().is_none());
        assert_eq!(player.stats().missing, 1);
    }

    #[test]
    fn test_session_end_stops_handling() {
        let mut player = EffectPlayer::new(SoundRegistry::builtin());
        assert!(!player.handle(&SwitchEvent::SessionEnded));
    }

    #[test]
    fn test_run_until_session_ended() {
        let (tx, rx) = mpsc::channel(8);
        tx.try_send(pressed(1, 'a')).unwrap();
        tx.try_send(pressed(37, '-')).unwrap();
        tx.try_send(SwitchEvent::SessionEnded).unwrap();
        tx.try_send(pressed(2, 'b')).unwrap();

        let player = EffectPlayer::new(SoundRegistry::builtin());
        let stats = tokio_test::block_on(player.run(rx));

        assert_eq!(stats.started, 2);
        assert_eq!(stats.stopped, 2);
    }

    #[test]
    fn test_run_exits_when_sender_dropped() {
        let (tx, rx) = mpsc::channel(8);
        tx.try_send(pressed(3, 'c')).unwrap();
        drop(tx);

        let player = EffectPlayer::new(SoundRegistry::builtin());
        let stats = tokio_test::block_on(player.run(rx));
        assert_eq!(stats.started, 1);
        assert_eq!(stats.stopped, 1);
    }
}
