//! Health panel view model.

use super::bands::{self, Band, RowBand};
use super::trend::TrendPoint;
use crate::api::{HealthAnalysis, HealthData, Readings};
use serde::Serialize;

pub const HEART_RATE: &[&str] = &["heart_rate", "heartrate"];
pub const SYSTOLIC: &[&str] = &["systolic_bp"];
pub const DIASTOLIC: &[&str] = &["diastolic_bp"];
pub const GLUCOSE: &[&str] = &["glucose", "blood_glucose"];
pub const OXYGEN: &[&str] = &["oxygen_saturation", "oxygen_level"];
pub const TEMPERATURE: &[&str] = &["temperature"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Vital {
    HeartRate,
    BloodPressure,
    Glucose,
    OxygenSaturation,
    Temperature,
}

impl Vital {
    pub fn label(self) -> &'static str {
        match self {
            Vital::HeartRate => "Heart Rate",
            Vital::BloodPressure => "Blood Pressure",
            Vital::Glucose => "Glucose",
            Vital::OxygenSaturation => "Oxygen Saturation",
            Vital::Temperature => "Temperature",
        }
    }
}

/// One gauge row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalRow {
    pub vital: Vital,
    pub value: String,
    /// Display percentage; `None` when the raw value is not numeric
    pub percentage: Option<f64>,
    pub band: Option<Band>,
}

impl VitalRow {
    fn new(vital: Vital, value: String, percentage: Option<f64>) -> Self {
        Self {
            vital,
            value,
            percentage,
            band: percentage.map(Band::for_percentage),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthView {
    pub vitals: Vec<VitalRow>,
    /// First reading as `key: value`, `No readings`, or `No data`
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisView>,
}

impl HealthView {
    pub fn from_data(data: &HealthData) -> Self {
        let (vitals, summary) = match &data.latest_readings {
            Some(readings) => (vital_rows(readings), readings.summary()),
            None => (Vec::new(), "No data".to_string()),
        };

        Self {
            vitals,
            summary,
            analysis: data.analysis.as_ref().map(AnalysisView::from_analysis),
        }
    }

    pub fn metric_count(&self) -> usize {
        self.vitals.len()
    }
}

/// Rows for every present metric, in display order.
pub fn vital_rows(readings: &Readings) -> Vec<VitalRow> {
    let mut rows = Vec::new();

    if let Some(text) = readings.text(HEART_RATE) {
        let pct = readings.number(HEART_RATE).map(bands::heart_rate_percentage);
        rows.push(VitalRow::new(Vital::HeartRate, format!("{} bpm", text), pct));
    }

    // Blood pressure needs both halves
    if let (Some(sys), Some(dia)) = (readings.text(SYSTOLIC), readings.text(DIASTOLIC)) {
        let pct = readings.number(SYSTOLIC).map(bands::systolic_percentage);
        rows.push(VitalRow::new(
            Vital::BloodPressure,
            format!("{}/{} mmHg", sys, dia),
            pct,
        ));
    }

    if let Some(text) = readings.text(GLUCOSE) {
        let pct = readings.number(GLUCOSE).map(bands::glucose_percentage);
        rows.push(VitalRow::new(Vital::Glucose, format!("{} mg/dL", text), pct));
    }

    if let Some(text) = readings.text(OXYGEN) {
        let pct = readings.number(OXYGEN).map(bands::oxygen_percentage);
        rows.push(VitalRow::new(Vital::OxygenSaturation, format!("{}%", text), pct));
    }

    if let Some(text) = readings.text(TEMPERATURE) {
        let pct = readings.number(TEMPERATURE).map(bands::temperature_percentage);
        rows.push(VitalRow::new(Vital::Temperature, format!("{}°C", text), pct));
    }

    rows
}

/// Trend point for a snapshot; absent readings give an all-`None` point.
pub fn trend_point(readings: Option<&Readings>) -> TrendPoint {
    match readings {
        Some(r) => TrendPoint {
            heart_rate: r.number(HEART_RATE),
            systolic: r.number(SYSTOLIC),
            diastolic: r.number(DIASTOLIC),
        },
        None => TrendPoint::default(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub name: String,
    pub total_readings: u64,
    pub threshold_exceeded: u64,
    pub percentage: String,
    pub band: RowBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisView {
    pub total_readings: u64,
    pub total_alerts: u64,
    pub alert_percentage: String,
    pub notified_count: u64,
    pub metrics: Vec<MetricRow>,
    /// Alert counts per metric, without the `total` entry
    pub distribution: Vec<(String, u64)>,
}

impl AnalysisView {
    pub fn from_analysis(analysis: &HealthAnalysis) -> Self {
        let metrics = analysis
            .metric_stats
            .iter()
            .map(|(metric, stats)| MetricRow {
                name: humanize(metric),
                total_readings: stats.total_readings,
                threshold_exceeded: stats.threshold_exceeded,
                percentage: format!("{:.1}%", stats.percentage),
                band: RowBand::for_percentage(stats.percentage),
            })
            .collect();

        let distribution = analysis
            .alert_counts
            .iter()
            .filter(|(metric, _)| metric.as_str() != "total")
            .map(|(metric, count)| (humanize(metric), *count))
            .collect();

        Self {
            total_readings: analysis.total_readings,
            total_alerts: analysis.alert_counts.get("total").copied().unwrap_or(0),
            alert_percentage: format!("{:.1}%", analysis.alert_percentage),
            notified_count: analysis.notified_count,
            metrics,
            distribution,
        }
    }
}

/// `blood_pressure` -> `Blood Pressure`
pub fn humanize(metric: &str) -> String {
    metric
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
