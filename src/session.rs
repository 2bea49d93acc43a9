//! Session loop: read commands until quit and report each one

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::OutputFormat;
use crate::events::SwitchEvent;
use crate::input::CharacterSource;
use crate::sequencer::{CommandSnapshot, Outcome, SwitchSequencer};
use crate::switch::layout;

/// Counts for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Commands reported
    pub commands: u64,
    /// EXECUTE presses with no active switches
    pub ignored: u64,
}

/// Read commands from `source` until the quit character
///
/// Each command with active switches is written to `out`; `notify`
/// receives an event for every command and for the end of the session,
/// including when the source fails.
pub fn run<S, W, N>(
    sequencer: &mut SwitchSequencer,
    source: &mut S,
    out: &mut W,
    format: OutputFormat,
    mut notify: N,
) -> Result<SessionSummary>
where
    S: CharacterSource + ?Sized,
    W: Write,
    N: FnMut(SwitchEvent),
{
    let mut summary = SessionSummary::default();
    info!(quit = ?sequencer.quit_char(), "waiting for commands");

    loop {
        let outcome = match sequencer.read_command(source) {
            Ok(outcome) => outcome,
            Err(e) => {
                notify(SwitchEvent::SessionEnded);
                return Err(e).context("failed to read from encoder");
            }
        };

        match outcome {
            Outcome::Completed(snapshot) if snapshot.is_noop() => {
                debug!("execute with no active switches, ignoring");
                summary.ignored += 1;
                notify(SwitchEvent::CommandIgnored);
            }
            Outcome::Completed(snapshot) => {
                write_report(out, &snapshot, format).context("failed to write command")?;
                info!(
                    active = snapshot.active_count,
                    sequence = %snapshot.sequence,
                    "command completed"
                );
                summary.commands += 1;
                notify(SwitchEvent::CommandCompleted {
                    active_count: snapshot.active_count,
                    sequence: snapshot.sequence,
                });
            }
            Outcome::Quit => {
                notify(SwitchEvent::SessionEnded);
                return Ok(summary);
            }
        }
    }
}

/// Write one command in the configured format
pub fn write_report<W: Write>(
    out: &mut W,
    snapshot: &CommandSnapshot,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out)?;
            writeln!(out, "Sequence: {}", snapshot.sequence)?;
            writeln!(out, "Sorted:   {}", snapshot.sorted_unique)?;
            writeln!(out, "Active switches: {}", snapshot.active_count)?;
            writeln!(out, "Command: ")?;
            write!(out, "{}", layout::render_grid(&snapshot.switches))?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, snapshot)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::input::ReaderSource;

    fn run_script(script: &str, format: OutputFormat) -> (Result<SessionSummary>, String, Vec<SwitchEvent>) {
        let mut sequencer = SwitchSequencer::new('Q');
        let mut source = ReaderSource::new(Cursor::new(script.as_bytes().to_vec()));
        let mut out = Vec::new();
        let mut events = Vec::new();

        let result = run(&mut sequencer, &mut source, &mut out, format, |e| events.push(e));
        (result, String::from_utf8(out).unwrap(), events)
    }

    #[test]
    fn test_text_report() {
        let (result, out, events) = run_script("a1-.\rQ", OutputFormat::Text);

        assert_eq!(result.unwrap(), SessionSummary { commands: 1, ignored: 0 });
        assert!(out.contains("Sequence: a1-.\n"));
        assert!(out.contains("Sorted:   -.1a\n"));
        assert!(out.contains("Active switches: 4\n"));
        assert!(out.contains("[S01]"));
        assert!(out.contains("[S28]"));
        assert!(out.contains("[S37]"));
        assert!(out.contains("[S38]"));
        assert!(!out.contains("[S02]"));
        assert_eq!(
            events,
            vec![
                SwitchEvent::CommandCompleted {
                    active_count: 4,
                    sequence: "a1-.".to_string(),
                },
                SwitchEvent::SessionEnded,
            ]
        );
    }

    #[test]
    fn test_json_report() {
        let (result, out, _) = run_script("bb\rQ", OutputFormat::Json);
        result.unwrap();

        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["active_count"], 1);
        assert_eq!(value["sequence"], "b");
        assert_eq!(value["sorted_unique"], "b");
        assert_eq!(value["switches"], serde_json::json!([2]));
    }

    #[test]
    fn test_noop_command_not_reported() {
        let (result, out, events) = run_script("\rx\rQ", OutputFormat::Json);

        assert_eq!(result.unwrap(), SessionSummary { commands: 1, ignored: 1 });
        assert_eq!(out.lines().count(), 1);
        assert_eq!(events[0], SwitchEvent::CommandIgnored);
    }

    #[test]
    fn test_input_closed_is_error() {
        let (result, out, events) = run_script("ab", OutputFormat::Text);
        assert!(result.is_err());
        assert!(out.is_empty());
        assert_eq!(events, vec![SwitchEvent::SessionEnded]);
    }

    #[test]
    fn test_punctuation_quit_char() {
        let mut sequencer = SwitchSequencer::new('~');
        let mut source = ReaderSource::new(Cursor::new(b"a~".to_vec()));
        let mut out = Vec::new();

        let result = run(&mut sequencer, &mut source, &mut out, OutputFormat::Text, |_| {});
        assert_eq!(result.unwrap(), SessionSummary::default());
    }

    #[test]
    fn test_quit_mid_command() {
        let (result, out, events) = run_script("abQ", OutputFormat::Text);
        assert_eq!(result.unwrap(), SessionSummary::default());
        assert!(out.is_empty());
        assert_eq!(events, vec![SwitchEvent::SessionEnded]);
    }
}
