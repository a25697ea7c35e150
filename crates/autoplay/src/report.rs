use crate::HarnessError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskCounts {
    /// Participant-races that faced this checkpoint.
    pub exposures: u64,
    pub passed: u64,
    pub tired: u64,
    pub crabs: u64,
    /// Distinct participants caught here, counted once per race.
    pub caught: u64,
}

impl RiskCounts {
    pub fn absorb(&mut self, other: &RiskCounts) {
        self.exposures += other.exposures;
        self.passed += other.passed;
        self.tired += other.tired;
        self.crabs += other.crabs;
        self.caught += other.caught;
    }

    pub fn crab_percentage(&self) -> f64 {
        if self.exposures == 0 {
            return 0.0;
        }
        self.caught as f64 / self.exposures as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    Acceptable,
    Risked,
    HighRisk,
}

impl RiskLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 35.0 {
            Self::HighRisk
        } else if percentage > 15.0 {
            Self::Risked
        } else {
            Self::Acceptable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Acceptable => "",
            Self::Risked => "RISKED",
            Self::HighRisk => "HIGH RISK",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskRow {
    pub location: u32,
    pub limit: u32,
    pub counts: RiskCounts,
    pub crab_percentage: f64,
    pub risk: RiskLevel,
}

impl RiskRow {
    pub fn new(location: u32, limit: u32, counts: RiskCounts) -> Self {
        let crab_percentage = counts.crab_percentage();
        Self {
            location,
            limit,
            counts,
            crab_percentage,
            risk: RiskLevel::from_percentage(crab_percentage),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryStats {
    pub total_rounds: u64,
    pub wall_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarnessReport {
    pub seed: u64,
    pub tables: u32,
    pub batch: u32,
    pub races: u64,
    pub rows: Vec<RiskRow>,
    pub summary: SummaryStats,
}

impl HarnessReport {
    pub fn row(&self, location: u32, limit: u32) -> Option<&RiskRow> {
        self.rows
            .iter()
            .find(|row| row.location == location && row.limit == limit)
    }

    pub fn to_text_report(&self) -> String {
        let rule = "=".repeat(75);
        let thin = "-".repeat(75);
        let mut lines = vec![
            format!(
                "simulation: {} races ({} tables x {}) seed {} in {} ms",
                self.races, self.tables, self.batch, self.seed, self.summary.wall_time_ms
            ),
            format!("rounds played: {}", self.summary.total_rounds),
            String::new(),
            rule,
            format!(
                "{:<8} | {:<6} | {:<8} | {:<8} | {:<8} | {:<8} | CRAB %",
                "CHECK", "LIMIT", "PASSED", "TIRED", "CAUGHT", "TOTAL"
            ),
            thin.clone(),
        ];
        let mut current = None;
        for row in &self.rows {
            if current.is_some_and(|location| location != row.location) {
                lines.push(thin.clone());
            }
            current = Some(row.location);
            let mut line = format!(
                "{:<8} | {:<6} | {:<8} | {:<8} | {:<8} | {:<8} | {:>6.2}%",
                row.location,
                row.limit,
                row.counts.passed,
                row.counts.tired,
                row.counts.caught,
                row.counts.exposures,
                row.crab_percentage
            );
            if row.risk != RiskLevel::Acceptable {
                line.push_str(&format!(" [!] {}", row.risk.label()));
            }
            lines.push(line);
        }
        lines.push(thin);
        lines.join("\n")
    }
}

pub fn write_json(path: &Path, report: &HarnessReport) -> Result<(), HarnessError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(report)?;
    fs::write(path, body)?;
    Ok(())
}

pub fn write_text(path: &Path, report: &HarnessReport) -> Result<(), HarnessError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, report.to_text_report())?;
    Ok(())
}
