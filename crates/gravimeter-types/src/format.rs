//! Human-readable time formatting for countdowns and reset clocks.

use chrono::{DateTime, Duration, TimeZone};
use serde::{Deserialize, Serialize};

/// Format a countdown the way the indicator displays it.
///
/// Anything at or below zero is `"Now"`; under an hour only minutes are
/// shown; under a day hours and minutes; from a day upward days and hours.
/// Zero trailing components are omitted ("2h", "1d").
pub fn format_countdown(remaining: Duration) -> String {
    if remaining <= Duration::zero() {
        return "Now".to_string();
    }

    let minutes = remaining.num_minutes();
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours < 24 {
        return if mins > 0 { format!("{}h {}m", hours, mins) } else { format!("{}h", hours) };
    }

    let days = hours / 24;
    let hrs = hours % 24;
    if hrs > 0 {
        format!("{}d {}h", days, hrs)
    } else {
        format!("{}d", days)
    }
}

/// How absolute reset instants are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockMode {
    /// Pick for the user (currently 24-hour)
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// "3:45 PM"
    #[serde(rename = "12h")]
    TwelveHour,
    /// "15:45"
    #[serde(rename = "24h")]
    TwentyFourHour,
}

/// Render an absolute instant as a wall-clock time in the given mode.
///
/// The caller picks the timezone (pass a `Local` datetime for user-facing
/// output).
pub fn format_clock<Tz: TimeZone>(at: DateTime<Tz>, mode: ClockMode) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match mode {
        ClockMode::TwelveHour => at.format("%-I:%M %p").to_string(),
        ClockMode::Auto | ClockMode::TwentyFourHour => at.format("%H:%M").to_string(),
    }
}
