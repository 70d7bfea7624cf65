//! Headless simulation on virtual time
//!
//! The engine runs on a [`ManualClock`] with a [`TimedStage`]. Instead of
//! sleeping, the simulator jumps straight to the next moment something can
//! happen: an engine wakeup or a scripted command.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use carousel::{millis, Channel, Clock, Engine, EngineConfig, ManualClock, Snapshot, TimedStage};
use serde::Serialize;
use tracing::{debug, info_span};

use crate::script::ScriptStep;

/// One published event
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EventRecord {
    pub at_ms: u64,
    pub channel: Channel,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

/// Result of a finished simulation
#[derive(Debug, Clone)]
pub struct Report {
    pub events: Vec<EventRecord>,
    pub last: Snapshot,
    pub duration_ms: u64,
}

/// Simulation parameters
#[derive(Debug, Clone)]
pub struct Simulation {
    config: EngineConfig,
    slides: usize,
    script: Vec<ScriptStep>,
    duration: Duration,
}

impl Simulation {
    pub fn new(config: EngineConfig, slides: usize, duration: Duration) -> Self {
        Self {
            config,
            slides,
            script: Vec::new(),
            duration,
        }
    }

    /// Commands to issue; steps sharing a timestamp run in the given order
    pub fn with_script(mut self, mut script: Vec<ScriptStep>) -> Self {
        script.sort_by_key(|step| step.at_ms);
        self.script = script;
        self
    }

    pub fn run(&self) -> Result<Report> {
        let span = info_span!(
            "simulate",
            slides = self.slides,
            duration_ms = millis(self.duration)
        );
        let _enter = span.enter();

        let clock = ManualClock::new();
        let events = Rc::new(RefCell::new(Vec::new()));

        let mut builder = Engine::builder(self.config.clone())
            .slides(0..self.slides)
            .clock(clock.clone())
            .stage(TimedStage::new());
        for channel in Channel::ALL {
            let events = Rc::clone(&events);
            let clock = clock.clone();
            builder = builder.on(channel, move |snapshot| {
                events.borrow_mut().push(EventRecord {
                    at_ms: millis(clock.now()),
                    channel,
                    snapshot: *snapshot,
                });
            });
        }
        let mut engine = builder.build().context("Failed to build engine")?;

        let mut steps = self.script.iter().peekable();
        loop {
            let wakeup = engine.next_wakeup();
            let scripted = steps.peek().map(|step| Duration::from_millis(step.at_ms));
            let Some(next) = [wakeup, scripted].into_iter().flatten().min() else {
                debug!("Nothing left to do");
                break;
            };
            if next > self.duration {
                break;
            }

            clock.set(next.max(clock.now()));
            engine.tick()?;

            let now = clock.now();
            while let Some(step) = steps.next_if(|step| Duration::from_millis(step.at_ms) <= now) {
                debug!(%step, "Running scripted command");
                step.command
                    .apply(&mut engine)
                    .with_context(|| format!("Scripted command '{}' failed", step))?;
            }
        }

        let events = events.borrow().clone();
        Ok(Report {
            events,
            last: engine.snapshot(),
            duration_ms: millis(self.duration),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptCommand;

    fn config() -> EngineConfig {
        EngineConfig {
            rotation_speed_ms: 1_000,
            ..EngineConfig::default()
        }
    }

    fn channels(report: &Report) -> Vec<(u64, Channel)> {
        report
            .events
            .iter()
            .map(|event| (event.at_ms, event.channel))
            .collect()
    }

    #[test]
    fn test_autoplay_timeline() {
        let report = Simulation::new(config(), 3, Duration::from_millis(2_600))
            .run()
            .unwrap();

        assert_eq!(
            channels(&report),
            vec![
                (0, Channel::Ready),
                (0, Channel::Play),
                (1_000, Channel::TransitionStart),
                (1_500, Channel::TransitionComplete),
                (2_000, Channel::TransitionStart),
                (2_500, Channel::TransitionComplete),
            ]
        );
        assert_eq!(report.last.current, 2);
        assert_eq!(report.last.iteration, 2);
    }

    #[test]
    fn test_scripted_pause_stops_autoplay() {
        let script = vec![ScriptStep {
            at_ms: 1_200,
            command: ScriptCommand::Pause,
        }];
        let report = Simulation::new(config(), 3, Duration::from_secs(5))
            .with_script(script)
            .run()
            .unwrap();

        assert_eq!(report.last.iteration, 1);
        assert_eq!(
            channels(&report).last(),
            Some(&(1_500, Channel::TransitionComplete))
        );
    }

    #[test]
    fn test_script_error_is_reported() {
        let script = vec![ScriptStep {
            at_ms: 10,
            command: ScriptCommand::GoTo(7),
        }];
        let err = Simulation::new(config(), 3, Duration::from_secs(1))
            .with_script(script)
            .run()
            .unwrap_err();
        assert!(format!("{:#}", err).contains("goto=7"));
    }
}
