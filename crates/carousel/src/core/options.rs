//! Transition parameters and their merge rules
//!
//! [`TransitionOptions`] is the fully resolved set a strategy receives.
//! [`TransitionOverrides`] is what a caller passes with a command; every field
//! is optional and only the ones that are set replace the configured defaults.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Travel direction for directional strategies such as `slide`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown direction: {}", s))
    }
}

/// Timing curve for animated strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Easing {
    #[default]
    Swing,
    Linear,
}

impl Easing {
    /// Map linear progress in `[0, 1]` onto the curve
    pub fn ease(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Swing => 0.5 - (t * PI).cos() / 2.0,
            Easing::Linear => t,
        }
    }

    /// Equivalent CSS timing function
    pub fn css_name(self) -> &'static str {
        match self {
            Easing::Swing => "ease-in-out",
            Easing::Linear => "linear",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Easing::Swing => "swing",
            Easing::Linear => "linear",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Easing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "swing" => Ok(Easing::Swing),
            "linear" => Ok(Easing::Linear),
            _ => Err(format!("Unknown easing: {}", s)),
        }
    }
}

/// Fully resolved transition parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionOptions {
    /// Strategy identifier (`none`, `fade`, `slide`, `reveal`, or a custom one)
    #[serde(rename = "type")]
    pub kind: String,
    pub direction: Direction,
    pub speed_ms: u64,
    pub easing: Easing,
    /// Strategy-specific options
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            kind: "fade".to_string(),
            direction: Direction::default(),
            speed_ms: 500,
            easing: Easing::default(),
            extra: Map::new(),
        }
    }
}

impl TransitionOptions {
    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    /// Apply `overrides` on top of these options
    ///
    /// Set fields replace the default; `extra` is merged key by key, recursing
    /// into nested objects so sibling keys survive.
    pub fn merged(&self, overrides: &TransitionOverrides) -> TransitionOptions {
        let mut extra = self.extra.clone();
        merge_object(&mut extra, &overrides.extra);
        TransitionOptions {
            kind: overrides.kind.clone().unwrap_or_else(|| self.kind.clone()),
            direction: overrides.direction.unwrap_or(self.direction),
            speed_ms: overrides.speed_ms.unwrap_or(self.speed_ms),
            easing: overrides.easing.unwrap_or(self.easing),
            extra,
        }
    }
}

/// Per-command overrides for [`TransitionOptions`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionOverrides {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransitionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn speed_ms(mut self, speed_ms: u64) -> Self {
        self.speed_ms = Some(speed_ms);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.direction.is_none()
            && self.speed_ms.is_none()
            && self.easing.is_none()
            && self.extra.is_empty()
    }
}

/// Recursively merge `patch` into `base`
pub fn merge_value(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => merge_object(base, patch),
        (base, patch) => *base = patch.clone(),
    }
}

fn merge_object(base: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        match base.get_mut(key) {
            Some(existing) => merge_value(existing, value),
            None => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}
