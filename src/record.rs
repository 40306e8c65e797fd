use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One training-session observation, already normalized at the ingest
/// boundary. Records are immutable once loaded; the engine only derives
/// aggregates from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub full_name: String,
    pub team: String,
    pub age: Option<u32>,
    pub metric: String,
    pub date: Option<NaiveDate>,
    pub attempts: [Option<f64>; 3],
    pub last_attempt: Option<f64>,
    /// Representative value for the session.
    pub average: Option<f64>,
    /// Session bounding attempt values.
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
}

impl Record {
    pub fn age_group(&self) -> AgeGroup {
        match self.age {
            Some(age) => AgeGroup::from_age(age),
            None => AgeGroup::Unknown,
        }
    }
}

/// Banded age cohort used to select performance targets. Boundary ages
/// belong to the lower band (8 is 8U, 9 is 10U). `Unknown` marks rows
/// whose age could not be parsed; they stay in listings but are excluded
/// from target comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    U8,
    U10,
    U12,
    U14,
    U16,
    Unknown,
}

impl AgeGroup {
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=8 => AgeGroup::U8,
            9..=10 => AgeGroup::U10,
            11..=12 => AgeGroup::U12,
            13..=14 => AgeGroup::U14,
            _ => AgeGroup::U16,
        }
    }

    /// Band a fractional age (a team's mean age) with the same thresholds.
    pub fn from_mean_age(age: f64) -> Self {
        if !age.is_finite() || age < 0.0 {
            return AgeGroup::Unknown;
        }
        if age <= 8.0 {
            AgeGroup::U8
        } else if age <= 10.0 {
            AgeGroup::U10
        } else if age <= 12.0 {
            AgeGroup::U12
        } else if age <= 14.0 {
            AgeGroup::U14
        } else {
            AgeGroup::U16
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::U8 => "8U",
            AgeGroup::U10 => "10U",
            AgeGroup::U12 => "12U",
            AgeGroup::U14 => "14U",
            AgeGroup::U16 => "16U",
            AgeGroup::Unknown => "?",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "8U" => Some(AgeGroup::U8),
            "10U" => Some(AgeGroup::U10),
            "12U" => Some(AgeGroup::U12),
            "14U" => Some(AgeGroup::U14),
            "16U" => Some(AgeGroup::U16),
            _ => None,
        }
    }
}
