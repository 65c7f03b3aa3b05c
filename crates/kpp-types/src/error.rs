// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Error taxonomy for the simulation core.
//!
//! Validation failures and programming errors are `KppError` values.
//! Physical-limit events encountered mid-run are *warnings*: they are
//! accumulated and returned with the cycle result so a run always
//! completes with inspectable output.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One offending configuration field, with the value that was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigIssue {
    pub field: String,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}: {}", self.field, self.value, self.reason)
    }
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ConfigIssue::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum KppError {
    /// Every invalid field is listed, not just the first one found.
    #[error("configuration invalid ({} field(s)): {}", issues.len(), join_issues(issues))]
    ConfigValidation { issues: Vec<ConfigIssue> },

    /// Out-of-range input to a pure physics function.
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Programming error (e.g. gas-state query on a water-filled
    /// floater). Fatal, not user-recoverable.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type KppResult<T> = Result<T, KppError>;

/// Non-fatal physical-limit event. The simulation continues; the
/// result is flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicalLimitWarning {
    /// Blended gas-law volume exceeded the floater shell; the excess
    /// air is treated as vented.
    GasVolumeClamped {
        floater_id: usize,
        tick: u64,
        requested_m3: f64,
        shell_m3: f64,
    },
    /// Mean chain torque over the cycle was negative: the machine
    /// consumed more energy than it produced.
    NegativeNetEnergy { cycle: usize, deficit_j: f64 },
    /// The cooperative cancellation flag was observed; the cycle
    /// result covers only the ticks that ran.
    Cancelled { tick: u64 },
}

impl fmt::Display for PhysicalLimitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalLimitWarning::GasVolumeClamped {
                floater_id,
                tick,
                requested_m3,
                shell_m3,
            } => write!(
                f,
                "floater {floater_id} tick {tick}: gas volume {requested_m3:.4} m3 \
                 clamped to shell capacity {shell_m3:.4} m3"
            ),
            PhysicalLimitWarning::NegativeNetEnergy { cycle, deficit_j } => write!(
                f,
                "cycle {cycle}: negative net energy, deficit {deficit_j:.1} J"
            ),
            PhysicalLimitWarning::Cancelled { tick } => {
                write!(f, "run cancelled at tick {tick}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = KppError::ConfigValidation {
            issues: vec![
                ConfigIssue {
                    field: "nanobubble_void_fraction".into(),
                    value: "0.55".into(),
                    reason: "must be 0 or within [0.05, 0.40]".into(),
                },
                ConfigIssue {
                    field: "floater_shell_mass".into(),
                    value: "-3".into(),
                    reason: "must be positive".into(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 field(s)"));
        assert!(msg.contains("nanobubble_void_fraction"));
        assert!(msg.contains("floater_shell_mass"));
    }

    #[test]
    fn test_warning_display() {
        let w = PhysicalLimitWarning::GasVolumeClamped {
            floater_id: 7,
            tick: 120,
            requested_m3: 0.31,
            shell_m3: 0.25,
        };
        let msg = w.to_string();
        assert!(msg.contains("floater 7"));
        assert!(msg.contains("clamped"));
    }
}
