//! Registry of sound resources, indexed by switch

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::switch::Switch;

/// Resources used when no manifest is installed
const BUILTIN_EFFECTS: [&str; 38] = [
    "sounds/582369main_Mercury-4_Clock-Started.mp3",
    "sounds/582368main_Mercury-6_God-Speed.mp3",
    "sounds/582367main_Mercury-6_Zero-G.mp3",
    "sounds/582371main_Aurora-7_Liftoff.mp3",
    "sounds/582374main_Aurora-7_Fireflies.mp3",
    "sounds/590320main_ringtone_apollo11_countdown.mp3",
    "sounds/569462main_eagle_has_landed.mp3",
    "sounds/590331main_ringtone_smallStep.mp3",
    "sounds/574928main_houston_problem.mp3",
    "sounds/586447main_JFKwechoosemoonspeech.mp3",
    "sounds/591240main_JFKmoonspeech.mp3",
    "sounds/640148main_APU Shutdown.mp3",
    "sounds/640149main_Computers are in Control.mp3",
    "sounds/663784main_SLS_Audio_D.mp3",
    "sounds/578626main_sputnik-beep.mp3",
    "sounds/578628main_hskquindar.mp3",
    "sounds/578629main_hawquindar.mp3",
    "sounds/590189main_ringtone_131_launchNats.mp3",
    "sounds/590318main_ringtone_135_launch.mp3",
    "sounds/640165main_Lookin At It.mp3",
    "sounds/640166main_MECO.mp3",
    "sounds/Apollo11-gonogo_for_powered_decent.wav",
    "sounds/Apollo11-GoNoGo-for-landing.wav",
    "sounds/Apollo11-1201-alarm.wav",
    "sounds/Apollo11-1202-alarm.wav",
    "sounds/Apollo11-keep-chatter-down.wav",
    "sounds/Apollo11-only-callouts-are-fuel.wav",
    "sounds/Apollo11-stay-no-stay.wav",
    "sounds/autodestructsequencearmed_ep.mp3",
    "sounds/computer_error.mp3",
    "sounds/computer_work_beep.mp3",
    "sounds/computerbeep_2.mp3",
    "sounds/consolewarning.mp3",
    "sounds/input_ok_3_clean.mp3",
    "sounds/tos_bridge_1_activate.mp3",
    "sounds/tos_destructsequence_ep.mp3",
    "sounds/tos_hailing_frequencies_open.mp3",
    "sounds/console_explo_01.mp3",
];

/// On-disk manifest format
#[derive(Debug, Deserialize)]
struct Manifest {
    effects: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    switch: Switch,
    path: PathBuf,
}

/// Sound resource assigned to each switch
#[derive(Debug, Clone, Default)]
pub struct SoundRegistry {
    effects: BTreeMap<Switch, PathBuf>,
}

impl SoundRegistry {
    /// The built-in table, one resource per reachable switch
    pub fn builtin() -> Self {
        let effects = BUILTIN_EFFECTS
            .iter()
            .zip(Switch::all())
            .map(|(path, switch)| (switch, PathBuf::from(path)))
            .collect();
        Self { effects }
    }

    /// Load the manifest at `path`, falling back to the built-in table if
    /// there is no file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(?path, "no sound manifest, using built-in table");
            return Ok(Self::builtin());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read sound manifest {}", path.display()))?;
        let registry = Self::from_json(&raw)
            .with_context(|| format!("invalid sound manifest {}", path.display()))?;

        info!(?path, effects = registry.len(), "sound manifest loaded");
        Ok(registry)
    }

    /// Parse a manifest document
    pub fn from_json(raw: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(raw)?;
        let mut effects = BTreeMap::new();

        for entry in manifest.effects {
            if !entry.switch.is_reachable() {
                warn!(switch = %entry.switch, "no key selects this switch, effect will never play");
            }
            if let Some(previous) = effects.insert(entry.switch, entry.path) {
                warn!(switch = %entry.switch, ?previous, "duplicate manifest entry replaced");
            }
        }

        Ok(Self { effects })
    }

    /// Resource for a switch, if one is assigned
    pub fn effect_for(&self, switch: Switch) -> Option<&Path> {
        self.effects.get(&switch).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sw(n: u8) -> Switch {
        Switch::new(n).unwrap()
    }

    #[test]
    fn test_builtin_covers_reachable_switches() {
        let registry = SoundRegistry::builtin();
        assert_eq!(registry.len(), 38);
        assert!(Switch::all()
            .filter(|s| s.is_reachable())
            .all(|s| registry.effect_for(s).is_some()));
        assert!(registry.effect_for(Switch::EXECUTE).is_none());
        assert_eq!(
            registry.effect_for(sw(7)),
            Some(Path::new("sounds/569462main_eagle_has_landed.mp3"))
        );
    }

    #[test]
    fn test_from_json() {
        let raw = r#"{"effects":[
            {"switch":1,"path":"a.wav"},
            {"switch":38,"path":"dot.wav"},
            {"switch":1,"path":"a2.wav"}
        ]}"#;
        let registry = SoundRegistry::from_json(raw).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.effect_for(sw(1)), Some(Path::new("a2.wav")));
        assert!(registry.effect_for(sw(2)).is_none());
    }

    #[test]
    fn test_from_json_rejects_bad_switch() {
        let raw = r#"{"effects":[{"switch":42,"path":"x.wav"}]}"#;
        assert!(SoundRegistry::from_json(raw).is_err());
    }

    #[test]
    fn test_load_missing_file_uses_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SoundRegistry::load(&dir.path().join("sounds.json")).unwrap();
        assert_eq!(registry.len(), 38);
    }

    #[test]
    fn test_load_manifest_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"effects":[{{"switch":27,"path":"zero.wav"}}]}}"#).unwrap();

        let registry = SoundRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.effect_for(sw(27)), Some(Path::new("zero.wav")));
    }

    #[test]
    fn test_load_invalid_manifest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(SoundRegistry::load(file.path()).is_err());
    }
}
