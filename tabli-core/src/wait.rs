use serde::{Deserialize, Serialize};
use std::fmt;

/// Average minutes a table stays occupied when the restaurant has not set one.
pub const DEFAULT_TURNOVER_MINUTES: f64 = 45.0;

/// Banded wait estimate shown to customers. Ordered from shortest to longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WaitBand {
    #[serde(rename = "10-15 min")]
    TenToFifteen,
    #[serde(rename = "15-25 min")]
    FifteenToTwentyFive,
    #[serde(rename = "25-35 min")]
    TwentyFiveToThirtyFive,
    #[serde(rename = "35-50 min")]
    ThirtyFiveToFifty,
    #[serde(rename = "50+ min")]
    OverFifty,
}

impl WaitBand {
    pub const ALL: [WaitBand; 5] = [
        WaitBand::TenToFifteen,
        WaitBand::FifteenToTwentyFive,
        WaitBand::TwentyFiveToThirtyFive,
        WaitBand::ThirtyFiveToFifty,
        WaitBand::OverFifty,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WaitBand::TenToFifteen => "10-15 min",
            WaitBand::FifteenToTwentyFive => "15-25 min",
            WaitBand::TwentyFiveToThirtyFive => "25-35 min",
            WaitBand::ThirtyFiveToFifty => "35-50 min",
            WaitBand::OverFifty => "50+ min",
        }
    }

    fn from_minutes(minutes: f64) -> Self {
        if minutes < 15.0 {
            WaitBand::TenToFifteen
        } else if minutes < 25.0 {
            WaitBand::FifteenToTwentyFive
        } else if minutes < 35.0 {
            WaitBand::TwentyFiveToThirtyFive
        } else if minutes < 50.0 {
            WaitBand::ThirtyFiveToFifty
        } else {
            WaitBand::OverFifty
        }
    }
}

impl fmt::Display for WaitBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rough minutes until a table frees up: half a turnover per party ahead.
pub fn estimate_minutes(position: u32, turnover_minutes: Option<f64>) -> f64 {
    let turnover = match turnover_minutes {
        Some(t) if t.is_finite() && t > 0.0 => t,
        _ => DEFAULT_TURNOVER_MINUTES,
    };
    position as f64 * (turnover / 2.0)
}

/// Position 0 still lands in the lowest band.
pub fn estimate_wait(position: u32, turnover_minutes: Option<f64>) -> WaitBand {
    WaitBand::from_minutes(estimate_minutes(position, turnover_minutes))
}
