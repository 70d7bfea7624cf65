//! Terminal colorization for simulator output
//!
//! Applies ANSI escape codes to event lines using crossterm.

use carousel::{Channel, Status};
use crossterm::style::{Color, Stylize};

/// Color used for a channel name
///
/// - Lifecycle (`ready`): Green
/// - Status changes (`play`, `pause`, `stop`, `restart`): Cyan / Yellow / Red / Magenta
/// - Transitions: Blue, dark blue once complete
pub fn channel_color(channel: Channel) -> Color {
    match channel {
        Channel::Ready => Color::Green,
        Channel::Play => Color::Cyan,
        Channel::Pause => Color::Yellow,
        Channel::Stop => Color::Red,
        Channel::Restart => Color::Magenta,
        Channel::TransitionStart => Color::Blue,
        Channel::TransitionComplete => Color::DarkBlue,
    }
}

pub fn status_color(status: Status) -> Color {
    match status {
        Status::Playing => Color::Green,
        Status::Paused => Color::Yellow,
        Status::Stopped => Color::Red,
    }
}

/// Paint `text` in the channel's color
pub fn paint_channel(channel: Channel, text: &str) -> String {
    format!("{}", text.with(channel_color(channel)))
}

pub fn paint_status(status: Status, text: &str) -> String {
    format!("{}", text.with(status_color(status)))
}

/// Dim secondary text such as timestamps
pub fn dim(text: &str) -> String {
    format!("{}", text.dark_grey())
}
