use serde::{Deserialize, Serialize};

use crate::extraction::lines::DEFAULT_LINE_TOLERANCE;
use crate::model::{Market, ReportKind};
use crate::reconcile::ReconcileOptions;

/// A report profile: which report to build and the options it is built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProfile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub kind: ReportKind,
    /// If set, only sheet rows with this `DESTINO` are reconciled.
    #[serde(default)]
    pub destination: Option<String>,
    /// Vertical distance in points within which words share a line.
    #[serde(default)]
    pub line_tolerance: Option<f32>,
    #[serde(default)]
    pub markets: Vec<Market>,
}

impl ReportProfile {
    pub fn line_tolerance(&self) -> f32 {
        self.line_tolerance.unwrap_or(DEFAULT_LINE_TOLERANCE)
    }

    /// Options for this profile with `extra_markets` added once each.
    pub fn options(&self, extra_markets: &[Market]) -> ReconcileOptions {
        let mut markets = self.markets.clone();
        for m in extra_markets {
            if !markets.contains(m) {
                markets.push(*m);
            }
        }
        ReconcileOptions {
            markets,
            destination: self.destination.clone(),
        }
    }
}
