// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Floater
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One buoyant unit on the chain: lifecycle state machine and
//! per-phase force computation.
//!
//! Sign convention: `net_force` returns the force component that
//! drives the chain loop forward [N]. Ascending buoyancy and
//! descending weight both count positive; drag always subtracts.

use crate::environment::Environment;
use crate::gas::GasState;
use crate::nanobubble::NanobubbleColumn;
use kpp_types::error::{KppError, KppResult};
use kpp_types::state::FloaterPhase;

/// Archimedes: `F = ρ·V·g` [N], directed against gravity.
pub fn buoyant_force(volume_m3: f64, fluid_density: f64, gravity: f64) -> f64 {
    fluid_density * volume_m3 * gravity
}

/// Quadratic drag magnitude `½·Cd·ρ·A·v²` [N]. Opposes the direction
/// of travel; callers subtract it from the driving force.
pub fn drag_force(fluid_density: f64, speed_mps: f64, drag_coefficient: f64, area_m2: f64) -> f64 {
    0.5 * drag_coefficient * fluid_density * area_m2 * speed_mps * speed_mps
}

/// A sealed buoyant unit on the main chain loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Floater {
    pub id: usize,
    /// Fixed shell volume [m³].
    pub volume_m3: f64,
    pub shell_mass_kg: f64,
    pub cross_section_m2: f64,
    pub drag_coefficient: f64,
    phase: FloaterPhase,
    position_m: f64,
    internal_gas: Option<GasState>,
    venting_ticks_left: u32,
    venting_ticks_total: u32,
}

impl Floater {
    /// A water-filled floater waiting at the bottom.
    pub fn new(
        id: usize,
        volume_m3: f64,
        shell_mass_kg: f64,
        cross_section_m2: f64,
        drag_coefficient: f64,
    ) -> Self {
        Floater {
            id,
            volume_m3,
            shell_mass_kg,
            cross_section_m2,
            drag_coefficient,
            phase: FloaterPhase::EmptyAtBottom,
            position_m: 0.0,
            internal_gas: None,
            venting_ticks_left: 0,
            venting_ticks_total: 0,
        }
    }

    pub fn phase(&self) -> FloaterPhase {
        self.phase
    }

    pub fn position_m(&self) -> f64 {
        self.position_m
    }

    /// Direct placement used by engine initialization and reset.
    /// Enforces the gas-presence invariant and the position range.
    pub fn place(
        &mut self,
        phase: FloaterPhase,
        position_m: f64,
        gas: Option<GasState>,
        column_height_m: f64,
    ) -> KppResult<()> {
        if position_m < 0.0 || position_m > column_height_m {
            return Err(KppError::InvalidParameter {
                name: "position_m",
                value: position_m,
                reason: "must be within [0, H]",
            });
        }
        if phase.is_gas_bearing() != gas.is_some() {
            return Err(KppError::InvalidState(format!(
                "floater {}: phase {:?} requires internal gas iff filling/ascending",
                self.id, phase
            )));
        }
        self.phase = phase;
        self.position_m = position_m;
        self.internal_gas = gas;
        self.venting_ticks_left = 0;
        self.venting_ticks_total = 0;
        Ok(())
    }

    /// Set an exact position; writes outside [0, H] are rejected.
    pub fn set_position(&mut self, position_m: f64, column_height_m: f64) -> KppResult<()> {
        if position_m < 0.0 || position_m > column_height_m {
            return Err(KppError::InvalidParameter {
                name: "position_m",
                value: position_m,
                reason: "must be within [0, H]",
            });
        }
        self.position_m = position_m;
        Ok(())
    }

    /// Advance along the leg, clamping defensively into [0, H].
    pub fn advance_position(&mut self, delta_m: f64, column_height_m: f64) {
        self.position_m = (self.position_m + delta_m).clamp(0.0, column_height_m);
    }

    /// The air pocket; `InvalidState` outside Filling/Ascending.
    pub fn internal_gas(&self) -> KppResult<&GasState> {
        self.internal_gas.as_ref().ok_or_else(|| {
            KppError::InvalidState(format!(
                "floater {}: gas query in non-gas-bearing phase {:?}",
                self.id, self.phase
            ))
        })
    }

    pub fn internal_gas_mut(&mut self) -> KppResult<&mut GasState> {
        let id = self.id;
        let phase = self.phase;
        self.internal_gas.as_mut().ok_or_else(|| {
            KppError::InvalidState(format!(
                "floater {id}: gas query in non-gas-bearing phase {phase:?}"
            ))
        })
    }

    /// EmptyAtBottom → Filling; the scheduler attaches the new pocket.
    pub fn begin_filling(&mut self, gas: GasState) -> KppResult<()> {
        if self.phase != FloaterPhase::EmptyAtBottom {
            return Err(KppError::InvalidState(format!(
                "floater {}: cannot start filling from {:?}",
                self.id, self.phase
            )));
        }
        self.phase = self.phase.next();
        self.internal_gas = Some(gas);
        Ok(())
    }

    /// Filling → Ascending; the pocket now holds bottom
    /// pressure/volume as its reference state.
    pub fn finish_filling(&mut self, bottom_pressure_pa: f64, bottom_volume_m3: f64) -> KppResult<()> {
        if self.phase != FloaterPhase::Filling {
            return Err(KppError::InvalidState(format!(
                "floater {}: cannot finish filling from {:?}",
                self.id, self.phase
            )));
        }
        let gas = self.internal_gas_mut()?;
        gas.set_reference(bottom_pressure_pa, bottom_volume_m3);
        self.phase = FloaterPhase::Ascending;
        Ok(())
    }

    /// Ascending → VentingAtTop. The discarded pocket is returned so
    /// the engine can log its energy as an explicit loss.
    pub fn begin_venting(&mut self, transition_ticks: u32) -> KppResult<GasState> {
        if self.phase != FloaterPhase::Ascending {
            return Err(KppError::InvalidState(format!(
                "floater {}: cannot vent from {:?}",
                self.id, self.phase
            )));
        }
        let gas = self.internal_gas.take().ok_or_else(|| {
            KppError::InvalidState(format!("floater {}: ascending without gas", self.id))
        })?;
        self.phase = FloaterPhase::VentingAtTop;
        self.venting_ticks_left = transition_ticks;
        self.venting_ticks_total = transition_ticks;
        Ok(gas)
    }

    /// One venting tick; returns true when the transition completes
    /// (VentingAtTop → Descending).
    pub fn step_venting(&mut self) -> KppResult<bool> {
        if self.phase != FloaterPhase::VentingAtTop {
            return Err(KppError::InvalidState(format!(
                "floater {}: venting step in {:?}",
                self.id, self.phase
            )));
        }
        if self.venting_ticks_left > 0 {
            self.venting_ticks_left -= 1;
            return Ok(false);
        }
        self.phase = FloaterPhase::Descending;
        Ok(true)
    }

    /// Descending → EmptyAtBottom at position 0.
    pub fn arrive_at_bottom(&mut self) -> KppResult<()> {
        if self.phase != FloaterPhase::Descending {
            return Err(KppError::InvalidState(format!(
                "floater {}: cannot dock at bottom from {:?}",
                self.id, self.phase
            )));
        }
        self.phase = FloaterPhase::EmptyAtBottom;
        self.position_m = 0.0;
        Ok(())
    }

    /// Mass when fully water-filled [kg].
    pub fn water_filled_mass_kg(&self, water_density: f64) -> f64 {
        self.shell_mass_kg + water_density * self.volume_m3
    }

    /// Fraction of the filled mass/drag applied during the venting
    /// ramp (1.0 once the transition completes or when no ramp is
    /// configured).
    fn venting_ramp(&self) -> f64 {
        if self.venting_ticks_total == 0 {
            return 1.0;
        }
        1.0 - self.venting_ticks_left as f64 / self.venting_ticks_total as f64
    }

    /// Driving force this floater contributes to the chain [N].
    ///
    /// Internal water is neutral (its weight equals its own buoyancy),
    /// so ascending floaters reduce to
    /// `ρ_w·V_gas·g − (m_shell + m_gas)·g − drag`, and descending ones
    /// to `(m_shell + ρ_w·V)·g − ρ_eff·V·g − drag·drag_mult`.
    pub fn net_force(
        &self,
        env: &Environment,
        column: &NanobubbleColumn,
        chain_speed_mps: f64,
    ) -> KppResult<f64> {
        let g = env.constants().gravity;
        let rho_w = env.ambient_water_density();
        let molar_mass = env.constants().molar_mass_air;

        match self.phase {
            // Waiting in the bottom gallery; not coupled to the chain.
            FloaterPhase::EmptyAtBottom => Ok(0.0),

            FloaterPhase::Filling | FloaterPhase::Ascending => {
                let gas = self.internal_gas()?;
                let buoy = buoyant_force(gas.volume_m3, rho_w, g);
                let weight = (self.shell_mass_kg + gas.mass_kg(molar_mass)) * g;
                let drag = drag_force(
                    rho_w,
                    chain_speed_mps,
                    self.drag_coefficient,
                    self.cross_section_m2,
                );
                Ok(buoy - weight - drag)
            }

            FloaterPhase::VentingAtTop => {
                // Partial submersion ramp: the filled mass and drag
                // phase in over transition_ticks.
                let ramp = self.venting_ramp();
                let weight = self.water_filled_mass_kg(rho_w) * g;
                let buoy = buoyant_force(self.volume_m3, rho_w, g);
                let drag = drag_force(
                    rho_w,
                    chain_speed_mps,
                    self.drag_coefficient,
                    self.cross_section_m2,
                );
                Ok(ramp * (weight - buoy - drag))
            }

            FloaterPhase::Descending => {
                let rho_eff = column.effective_density();
                let cd_eff = column.effective_drag_coefficient(self.drag_coefficient);
                let weight = self.water_filled_mass_kg(rho_w) * g;
                let buoy = buoyant_force(self.volume_m3, rho_eff, g);
                let drag = drag_force(rho_eff, chain_speed_mps, cd_eff, self.cross_section_m2);
                Ok(weight - buoy - drag)
            }
        }
    }

    /// Retarding force opposing a descending floater [N]: mixture
    /// buoyancy plus mixture drag. Strictly decreases with the void
    /// fraction (H1).
    pub fn descending_resistance(
        &self,
        env: &Environment,
        column: &NanobubbleColumn,
        chain_speed_mps: f64,
    ) -> f64 {
        let g = env.constants().gravity;
        let rho_eff = column.effective_density();
        let cd_eff = column.effective_drag_coefficient(self.drag_coefficient);
        buoyant_force(self.volume_m3, rho_eff, g)
            + drag_force(rho_eff, chain_speed_mps, cd_eff, self.cross_section_m2)
    }
}
