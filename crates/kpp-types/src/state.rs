// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — State & Result Records
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Floater lifecycle phases and the per-cycle result records returned
//! to external consumers (UI, plotting, export).

use crate::error::PhysicalLimitWarning;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a floater on the chain loop.
///
/// Transitions are strictly cyclic; `next()` is the single transition
/// function, testable as a pure state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloaterPhase {
    /// At position 0, water-filled, awaiting the injection scheduler.
    EmptyAtBottom,
    /// Compressed-air injection in progress.
    Filling,
    /// Buoyancy-driven travel up the ascending leg.
    Ascending,
    /// Air pocket discarded at the top; mass resets to water-filled.
    VentingAtTop,
    /// Gravity-driven travel down the descending leg.
    Descending,
}

impl FloaterPhase {
    /// The unique successor phase in the cycle.
    pub fn next(self) -> Self {
        match self {
            FloaterPhase::EmptyAtBottom => FloaterPhase::Filling,
            FloaterPhase::Filling => FloaterPhase::Ascending,
            FloaterPhase::Ascending => FloaterPhase::VentingAtTop,
            FloaterPhase::VentingAtTop => FloaterPhase::Descending,
            FloaterPhase::Descending => FloaterPhase::EmptyAtBottom,
        }
    }

    /// A floater carries an internal gas pocket iff it is filling or
    /// ascending.
    pub fn is_gas_bearing(self) -> bool {
        matches!(self, FloaterPhase::Filling | FloaterPhase::Ascending)
    }
}

/// Energy attributed to each hypothesis module over one cycle [J].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HypothesisContribution {
    /// H1: nanobubble density/drag reduction on the descending leg.
    pub h1_j: f64,
    /// H2: isothermal expansion boost over the adiabatic baseline.
    pub h2_j: f64,
    /// H3: generator output sustained by the flywheel while the clutch
    /// is disengaged.
    pub h3_j: f64,
}

/// Aggregate result of one full cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    /// Mean chain torque at the sprocket over the cycle [N·m].
    pub net_torque_nm: f64,
    /// Mean electrical output power over the cycle [W].
    pub electrical_power_w: f64,
    /// Mean chain (and therefore floater) speed over the cycle [m/s].
    pub floater_speed_mps: f64,
    /// 100 · energy_out / energy_in for this cycle. Zero when no
    /// injection energy was spent.
    pub cycle_efficiency_pct: f64,
    /// Per-hypothesis energy attribution for this cycle.
    pub per_hypothesis_contribution: HypothesisContribution,
    /// Compressor work spent on injections this cycle [J].
    pub energy_in_j: f64,
    /// Electrical energy delivered this cycle [J].
    pub energy_out_j: f64,
    /// Energy of air vented at the top, an explicit logged loss [J].
    pub vented_energy_j: f64,
    /// Physical-limit events observed this cycle.
    pub warnings: Vec<PhysicalLimitWarning>,
}

/// Read-only snapshot of the per-tick telemetry channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Simulation time [s].
    pub t_s: Vec<f64>,
    /// Chain torque at the sprocket [N·m].
    pub torque_nm: Vec<f64>,
    /// Electrical output power [W].
    pub power_w: Vec<f64>,
}
