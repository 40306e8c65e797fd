use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::record::AgeGroup;

/// Whether a metric improves by going up or down. Sprint and agility times
/// shrink as players improve; strength and skill numbers grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherBetter,
    LowerBetter,
}

/// Static target configuration: one target value per (age group, metric),
/// plus the set of metrics where lower is better. A missing entry means
/// "no target defined" and must stay absent downstream, never zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Age-group label ("8U".."16U") -> metric -> target value.
    pub targets: HashMap<String, HashMap<String, f64>>,
    pub lower_is_better: HashSet<String>,
}

impl TargetConfig {
    /// The canonical built-in table. Earlier drifting copies of this table
    /// exist in the source data; this is the final iteration's version, and
    /// deployments can override it wholesale via `load`.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn direction(&self, metric: &str) -> Direction {
        if self.lower_is_better.contains(metric) {
            Direction::LowerBetter
        } else {
            Direction::HigherBetter
        }
    }

    /// Target for an (age group, metric) pair. `Unknown` age groups have no
    /// targets by definition.
    pub fn target(&self, group: AgeGroup, metric: &str) -> Option<f64> {
        if group == AgeGroup::Unknown {
            return None;
        }
        self.targets
            .get(group.label())
            .and_then(|by_metric| by_metric.get(metric))
            .copied()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read target config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parse target config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let json = serde_json::to_string_pretty(self).context("serialize target config")?;
        fs::write(path, json).with_context(|| format!("write target config {}", path.display()))?;
        Ok(())
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

static BUILTIN: Lazy<TargetConfig> = Lazy::new(|| {
    let rows: &[(&str, &[(&str, f64)])] = &[
        (
            "8U",
            &[
                ("Bench", 30.0),
                ("Squat", 50.0),
                ("Pull Ups", 2.0),
                ("BES - Tee", 40.0),
                ("BES Flip", 35.0),
                ("10 yard sprint", 2.2),
                ("Pro Agility", 5.5),
                ("Arm Speed Regular", 35.0),
                ("Arm Speed Pitch", 30.0),
                ("Home to 1B sprint", 4.5),
            ],
        ),
        (
            "10U",
            &[
                ("Bench", 40.0),
                ("Squat", 70.0),
                ("Pull Ups", 4.0),
                ("BES - Tee", 50.0),
                ("BES Flip", 45.0),
                ("10 yard sprint", 2.0),
                ("Pro Agility", 5.0),
                ("Arm Speed Regular", 45.0),
                ("Arm Speed Pitch", 40.0),
                ("Home to 1B sprint", 4.2),
            ],
        ),
        (
            "12U",
            &[
                ("Bench", 50.0),
                ("Squat", 90.0),
                ("Pull Ups", 6.0),
                ("BES - Tee", 60.0),
                ("BES Flip", 55.0),
                ("10 yard sprint", 1.9),
                ("Pro Agility", 4.8),
                ("Arm Speed Regular", 55.0),
                ("Arm Speed Pitch", 50.0),
                ("Home to 1B sprint", 4.0),
            ],
        ),
        (
            "14U",
            &[
                ("Bench", 70.0),
                ("Squat", 110.0),
                ("Pull Ups", 8.0),
                ("BES - Tee", 70.0),
                ("BES Flip", 65.0),
                ("10 yard sprint", 1.8),
                ("Pro Agility", 4.6),
                ("Arm Speed Regular", 65.0),
                ("Arm Speed Pitch", 60.0),
                ("Home to 1B sprint", 3.9),
            ],
        ),
        (
            "16U",
            &[
                ("Bench", 90.0),
                ("Squat", 140.0),
                ("Pull Ups", 10.0),
                ("BES - Tee", 80.0),
                ("BES Flip", 75.0),
                ("10 yard sprint", 1.7),
                ("Pro Agility", 4.5),
                ("Arm Speed Regular", 75.0),
                ("Arm Speed Pitch", 70.0),
                ("Home to 1B sprint", 3.8),
            ],
        ),
    ];

    let targets = rows
        .iter()
        .map(|(group, metrics)| {
            let by_metric = metrics
                .iter()
                .map(|(metric, value)| (metric.to_string(), *value))
                .collect::<HashMap<_, _>>();
            (group.to_string(), by_metric)
        })
        .collect();

    let lower_is_better = ["10 yard sprint", "Pro Agility", "Home to 1B sprint"]
        .into_iter()
        .map(str::to_string)
        .collect();

    TargetConfig {
        targets,
        lower_is_better,
    }
});
