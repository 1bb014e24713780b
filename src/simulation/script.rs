//! Timed input scripts for headless runs
//!
//! A script is a comma-separated list of `FRAME:ACTION[=ARG]` entries:
//!
//! ```text
//! 0:navigate=projects, 600:press=accelerate, 660:release=accelerate, 700:horn
//! ```

use anyhow::{bail, Context, Result};

use super::input::{Control, InputEvent};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputScript {
    /// Events sorted by frame, stable for equal frames
    entries: Vec<(u64, InputEvent)>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for raw in text.split(',') {
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }
            entries.extend(
                parse_entry(entry).with_context(|| format!("invalid script entry '{entry}'"))?,
            );
        }
        entries.sort_by_key(|(frame, _)| *frame);
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Events scheduled for exactly this frame
    pub fn events_at(&self, frame: u64) -> impl Iterator<Item = &InputEvent> + '_ {
        self.entries
            .iter()
            .filter(move |(f, _)| *f == frame)
            .map(|(_, event)| event)
    }

    /// Frame of the last scheduled event
    pub fn last_frame(&self) -> Option<u64> {
        self.entries.last().map(|(frame, _)| *frame)
    }
}

fn parse_entry(entry: &str) -> Result<Vec<(u64, InputEvent)>> {
    let (frame, action) = entry.split_once(':').context("expected FRAME:ACTION")?;
    let frame: u64 = frame
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a frame number", frame.trim()))?;

    let (verb, arg) = match action.trim().split_once('=') {
        Some((verb, arg)) => (verb.trim(), Some(arg.trim())),
        None => (action.trim(), None),
    };

    let control = |arg: Option<&str>| -> Result<Control> {
        let name = arg.context("missing control name")?;
        Control::from_button(name)
            .or_else(|| Control::from_key(name))
            .with_context(|| format!("unknown control '{name}'"))
    };

    let events = match verb {
        "press" => vec![(frame, InputEvent::Press(control(arg)?))],
        "release" => vec![(frame, InputEvent::Release(control(arg)?))],
        "horn" => vec![
            (frame, InputEvent::Press(Control::Horn)),
            (frame + 1, InputEvent::Release(Control::Horn)),
        ],
        "navigate" => {
            let id = arg.context("missing station id")?;
            vec![(frame, InputEvent::Navigate(id.to_string()))]
        }
        other => bail!("unknown action '{other}'"),
    };
    Ok(events)
}
