//! Rolling vital-sign trend.
//!
//! Labels and every series advance in lockstep: a point always appends one
//! label and one value per series (`None` when the metric was absent), and
//! eviction drops the oldest of each together.

use serde::Serialize;
use std::collections::VecDeque;

/// One trend point before it is split into series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendPoint {
    pub heart_rate: Option<f64>,
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
}

/// Fixed-capacity FIFO of labelled heart-rate / blood-pressure points.
#[derive(Debug, Clone, Serialize)]
pub struct TrendBuffer {
    #[serde(skip)]
    capacity: usize,
    labels: VecDeque<String>,
    heart_rate: VecDeque<Option<f64>>,
    systolic: VecDeque<Option<f64>>,
    diastolic: VecDeque<Option<f64>>,
}

impl TrendBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            labels: VecDeque::with_capacity(capacity),
            heart_rate: VecDeque::with_capacity(capacity),
            systolic: VecDeque::with_capacity(capacity),
            diastolic: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a point, evicting the oldest first when full.
    pub fn push(&mut self, label: impl Into<String>, point: TrendPoint) {
        if self.labels.len() >= self.capacity {
            self.labels.pop_front();
            self.heart_rate.pop_front();
            self.systolic.pop_front();
            self.diastolic.pop_front();
        }
        self.labels.push_back(label.into());
        self.heart_rate.push_back(point.heart_rate);
        self.systolic.push_back(point.systolic);
        self.diastolic.push_back(point.diastolic);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn heart_rate(&self) -> &VecDeque<Option<f64>> {
        &self.heart_rate
    }

    pub fn systolic(&self) -> &VecDeque<Option<f64>> {
        &self.systolic
    }

    pub fn diastolic(&self) -> &VecDeque<Option<f64>> {
        &self.diastolic
    }

    /// Most recent point, if any.
    pub fn latest(&self) -> Option<(&str, TrendPoint)> {
        let label = self.labels.back()?;
        Some((
            label.as_str(),
            TrendPoint {
                heart_rate: self.heart_rate.back().copied().flatten(),
                systolic: self.systolic.back().copied().flatten(),
                diastolic: self.diastolic.back().copied().flatten(),
            },
        ))
    }
}
