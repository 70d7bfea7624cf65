//! Scripted commands for the simulator
//!
//! A step is written `MS:COMMAND`, e.g. `2500:pause` or `6000:goto=2`.

use std::fmt;
use std::str::FromStr;

use carousel::{Engine, TransitionOverrides};

/// Engine command a script can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    Play,
    Pause,
    Stop,
    Restart,
    First,
    Previous,
    Next,
    Last,
    GoTo(usize),
}

impl ScriptCommand {
    pub fn apply<S>(self, engine: &mut Engine<S>) -> carousel::Result<()> {
        let overrides = TransitionOverrides::new();
        match self {
            ScriptCommand::Play => engine.play(&overrides),
            ScriptCommand::Pause => engine.pause(),
            ScriptCommand::Stop => engine.stop(),
            ScriptCommand::Restart => engine.restart(&overrides),
            ScriptCommand::First => engine.first(&overrides),
            ScriptCommand::Previous => engine.previous(&overrides),
            ScriptCommand::Next => engine.next(&overrides),
            ScriptCommand::Last => engine.last(&overrides),
            ScriptCommand::GoTo(index) => engine.go_to(index, &overrides),
        }
    }
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptCommand::Play => f.write_str("play"),
            ScriptCommand::Pause => f.write_str("pause"),
            ScriptCommand::Stop => f.write_str("stop"),
            ScriptCommand::Restart => f.write_str("restart"),
            ScriptCommand::First => f.write_str("first"),
            ScriptCommand::Previous => f.write_str("previous"),
            ScriptCommand::Next => f.write_str("next"),
            ScriptCommand::Last => f.write_str("last"),
            ScriptCommand::GoTo(index) => write!(f, "goto={}", index),
        }
    }
}

impl FromStr for ScriptCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Some(index) = lower.strip_prefix("goto=") {
            return index
                .parse()
                .map(ScriptCommand::GoTo)
                .map_err(|_| format!("Invalid slide index in '{}'", s));
        }
        match lower.as_str() {
            "play" => Ok(ScriptCommand::Play),
            "pause" => Ok(ScriptCommand::Pause),
            "stop" => Ok(ScriptCommand::Stop),
            "restart" => Ok(ScriptCommand::Restart),
            "first" => Ok(ScriptCommand::First),
            "previous" | "prev" => Ok(ScriptCommand::Previous),
            "next" => Ok(ScriptCommand::Next),
            "last" => Ok(ScriptCommand::Last),
            _ => Err(format!(
                "Unknown command '{}' (expected play|pause|stop|restart|first|previous|next|last|goto=N)",
                s
            )),
        }
    }
}

/// Command issued at a point in simulated time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    pub at_ms: u64,
    pub command: ScriptCommand,
}

impl FromStr for ScriptStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (at, command) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected MS:COMMAND, got '{}'", s))?;
        let at_ms = at
            .trim()
            .parse()
            .map_err(|_| format!("Invalid time '{}' in '{}'", at, s))?;
        Ok(ScriptStep {
            at_ms,
            command: command.parse()?,
        })
    }
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.at_ms, self.command)
    }
}
