//! Cosmetic display bands.
//!
//! These are fixed display mappings of a raw value, not health judgments.
//! The backend's alert thresholds are separate and may disagree with them.

use serde::Serialize;

/// Colour band of a vital-sign gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Success,
    Warning,
    Danger,
}

impl Band {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage > 80.0 {
            Band::Danger
        } else if percentage > 60.0 {
            Band::Warning
        } else {
            Band::Success
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Band::Success => "success",
            Band::Warning => "warning",
            Band::Danger => "danger",
        }
    }
}

/// Highlight of an analysis row by threshold-exceeded percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowBand {
    None,
    Info,
    Warning,
    Danger,
}

impl RowBand {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage > 50.0 {
            RowBand::Danger
        } else if percentage > 25.0 {
            RowBand::Warning
        } else if percentage > 0.0 {
            RowBand::Info
        } else {
            RowBand::None
        }
    }
}

fn clamp(percentage: f64) -> f64 {
    percentage.clamp(0.0, 100.0)
}

pub fn heart_rate_percentage(bpm: f64) -> f64 {
    clamp(bpm * 100.0 / 200.0)
}

pub fn systolic_percentage(mmhg: f64) -> f64 {
    clamp(mmhg * 100.0 / 200.0)
}

pub fn temperature_percentage(celsius: f64) -> f64 {
    clamp((celsius - 35.0) * 100.0 / 5.0)
}

pub fn glucose_percentage(mg_dl: f64) -> f64 {
    clamp(mg_dl * 100.0 / 300.0)
}

pub fn oxygen_percentage(saturation: f64) -> f64 {
    clamp(saturation)
}
