// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Full configuration surface of the simulation engine.
//!
//! Every field is user-settable and carries a default, so partial JSON
//! configs load. `validate()` reports *every* out-of-range field in a
//! single error; nothing is silently clamped.

use crate::constants::PhysicalConstants;
use crate::error::{ConfigIssue, KppError, KppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KppConfig {
    /// Total floaters on the chain loop.
    #[serde(default = "default_number_of_floaters")]
    pub number_of_floaters: usize,

    /// Fixed shell volume of one floater [m³].
    #[serde(default = "default_floater_volume")]
    pub floater_volume_m3: f64,

    /// Dry shell mass of one floater [kg].
    #[serde(default = "default_floater_shell_mass")]
    pub floater_shell_mass_kg: f64,

    /// Frontal area for the drag law [m²].
    #[serde(default = "default_cross_section_area")]
    pub cross_section_area_m2: f64,

    /// Drag coefficient Cd.
    #[serde(default = "default_drag_coefficient")]
    pub drag_coefficient: f64,

    /// Height of the water column (both legs) [m].
    #[serde(default = "default_water_column_height")]
    pub water_column_height_m: f64,

    /// Reference water density at 20 °C [kg/m³].
    #[serde(default = "default_water_density_ref")]
    pub water_density_ref: f64,

    /// Reference air density [kg/m³].
    #[serde(default = "default_air_density_ref")]
    pub air_density_ref: f64,

    /// Ambient water temperature [°C].
    #[serde(default = "default_ambient_temperature")]
    pub ambient_temperature_c: f64,

    /// Compressor delivery pressure [Pa].
    #[serde(default = "default_air_injection_pressure")]
    pub air_injection_pressure_pa: f64,

    /// Duration of one injection [s].
    #[serde(default = "default_air_fill_time")]
    pub air_fill_time_s: f64,

    /// Displaced-water jet velocity during injection [m/s].
    #[serde(default = "default_jet_velocity")]
    pub jet_velocity_mps: f64,

    /// H2: heat-exchange fraction f ∈ [0, 1]. 0 = adiabatic,
    /// 1 = fully isothermal expansion.
    #[serde(default = "default_heat_exchange_fraction")]
    pub heat_exchange_fraction: f64,

    /// H1: nanobubble void fraction φ. 0 disables the hypothesis;
    /// otherwise the physically tested range is [0.05, 0.40].
    #[serde(default = "default_nanobubble_void_fraction")]
    pub nanobubble_void_fraction: f64,

    /// H1: independent Cd multiplier on the descending leg
    /// (bubble "lubrication", separate from buoyancy reduction).
    #[serde(default = "default_nanobubble_drag_multiplier")]
    pub nanobubble_drag_multiplier: f64,

    /// Chain sprocket radius [m].
    #[serde(default = "default_sprocket_radius")]
    pub sprocket_radius_m: f64,

    /// Gearbox ratio ω_gen / ω_chain.
    #[serde(default = "default_gear_ratio")]
    pub gear_ratio: f64,

    /// H3: flywheel moment of inertia [kg·m²].
    #[serde(default = "default_flywheel_inertia")]
    pub flywheel_inertia_kgm2: f64,

    #[serde(default = "default_gearbox_efficiency")]
    pub gearbox_efficiency: f64,

    #[serde(default = "default_generator_efficiency")]
    pub generator_efficiency: f64,

    #[serde(default = "default_clutch_efficiency")]
    pub clutch_efficiency: f64,

    /// Fixed simulation time step [s]. Recommended 0.02–0.1.
    #[serde(default = "default_time_step")]
    pub time_step_s: f64,

    /// Cycles per run.
    #[serde(default = "default_num_cycles")]
    pub num_cycles: usize,

    /// Initial chain linear speed; also sets the nominal cycle
    /// duration 2H / v.
    #[serde(default = "default_chain_speed")]
    pub chain_speed_mps: f64,

    /// Constant resistive load torque at the generator shaft [N·m].
    #[serde(default = "default_generator_load_torque")]
    pub generator_load_torque_nm: f64,

    /// Bearing friction on the freewheeling generator side [N·m].
    #[serde(default = "default_flywheel_friction_torque")]
    pub flywheel_friction_torque_nm: f64,

    /// Venting ramp: ticks before the full water-filled mass and drag
    /// apply after the top is reached.
    #[serde(default)]
    pub transition_ticks: u32,

    /// Physical-constants override block (altitude/gravity variants).
    #[serde(default)]
    pub constants: PhysicalConstants,
}

fn default_number_of_floaters() -> usize {
    40
}
fn default_floater_volume() -> f64 {
    0.25
}
fn default_floater_shell_mass() -> f64 {
    20.0
}
fn default_cross_section_area() -> f64 {
    0.2
}
fn default_drag_coefficient() -> f64 {
    0.8
}
fn default_water_column_height() -> f64 {
    20.0
}
fn default_water_density_ref() -> f64 {
    997.0
}
fn default_air_density_ref() -> f64 {
    1.2
}
fn default_ambient_temperature() -> f64 {
    20.0
}
fn default_air_injection_pressure() -> f64 {
    4.0e5
}
fn default_air_fill_time() -> f64 {
    1.5
}
fn default_jet_velocity() -> f64 {
    5.0
}
fn default_heat_exchange_fraction() -> f64 {
    0.7
}
fn default_nanobubble_void_fraction() -> f64 {
    0.15
}
fn default_nanobubble_drag_multiplier() -> f64 {
    1.0
}
fn default_sprocket_radius() -> f64 {
    0.6
}
fn default_gear_ratio() -> f64 {
    1.0
}
fn default_flywheel_inertia() -> f64 {
    25.0
}
fn default_gearbox_efficiency() -> f64 {
    0.87
}
fn default_generator_efficiency() -> f64 {
    0.95
}
fn default_clutch_efficiency() -> f64 {
    0.97
}
fn default_time_step() -> f64 {
    0.05
}
fn default_num_cycles() -> usize {
    10
}
fn default_chain_speed() -> f64 {
    0.3
}
fn default_generator_load_torque() -> f64 {
    180.0
}
fn default_flywheel_friction_torque() -> f64 {
    0.5
}

impl Default for KppConfig {
    fn default() -> Self {
        // Deserializing an empty object applies every serde default.
        serde_json::from_str("{}").expect("defaults must deserialize")
    }
}

impl KppConfig {
    /// Load from a JSON file and validate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> KppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Ambient water temperature in Kelvin.
    pub fn ambient_temperature_k(&self) -> f64 {
        self.ambient_temperature_c + crate::constants::CELSIUS_TO_KELVIN
    }

    /// Ticks in one nominal cycle: one full loop of the chain
    /// (2H of travel) at the configured chain speed.
    pub fn ticks_per_cycle(&self) -> u64 {
        let cycle_s = 2.0 * self.water_column_height_m / self.chain_speed_mps;
        ((cycle_s / self.time_step_s).round() as u64).max(1)
    }

    /// Check every field; collect all violations before failing.
    pub fn validate(&self) -> KppResult<()> {
        let mut issues: Vec<ConfigIssue> = Vec::new();

        let mut reject = |field: &str, value: String, reason: &str| {
            issues.push(ConfigIssue {
                field: field.to_string(),
                value,
                reason: reason.to_string(),
            });
        };

        if self.number_of_floaters < 2 {
            reject(
                "number_of_floaters",
                self.number_of_floaters.to_string(),
                "need at least 2 floaters (one per leg)",
            );
        }
        if self.floater_volume_m3 <= 0.0 {
            reject(
                "floater_volume_m3",
                self.floater_volume_m3.to_string(),
                "must be positive",
            );
        }
        if self.floater_shell_mass_kg <= 0.0 {
            reject(
                "floater_shell_mass_kg",
                self.floater_shell_mass_kg.to_string(),
                "must be positive",
            );
        }
        if self.cross_section_area_m2 <= 0.0 {
            reject(
                "cross_section_area_m2",
                self.cross_section_area_m2.to_string(),
                "must be positive",
            );
        }
        if self.drag_coefficient <= 0.0 {
            reject(
                "drag_coefficient",
                self.drag_coefficient.to_string(),
                "must be positive",
            );
        }
        if self.water_column_height_m <= 0.0 {
            reject(
                "water_column_height_m",
                self.water_column_height_m.to_string(),
                "must be positive",
            );
        }
        if self.water_density_ref <= 0.0 {
            reject(
                "water_density_ref",
                self.water_density_ref.to_string(),
                "must be positive",
            );
        }
        if self.air_density_ref <= 0.0 {
            reject(
                "air_density_ref",
                self.air_density_ref.to_string(),
                "must be positive",
            );
        }
        if !(0.0..=100.0).contains(&self.ambient_temperature_c) {
            reject(
                "ambient_temperature_c",
                self.ambient_temperature_c.to_string(),
                "must be within [0, 100] °C",
            );
        }
        if self.air_injection_pressure_pa <= self.constants.atmospheric_pressure_pa {
            reject(
                "air_injection_pressure_pa",
                self.air_injection_pressure_pa.to_string(),
                "must exceed atmospheric pressure",
            );
        }
        if self.air_fill_time_s <= 0.0 {
            reject(
                "air_fill_time_s",
                self.air_fill_time_s.to_string(),
                "must be positive",
            );
        }
        if self.jet_velocity_mps < 0.0 {
            reject(
                "jet_velocity_mps",
                self.jet_velocity_mps.to_string(),
                "must be non-negative",
            );
        }
        if !(0.0..=1.0).contains(&self.heat_exchange_fraction) {
            reject(
                "heat_exchange_fraction",
                self.heat_exchange_fraction.to_string(),
                "must be within [0, 1]",
            );
        }
        let phi = self.nanobubble_void_fraction;
        if phi != 0.0 && !(0.05..=0.40).contains(&phi) {
            reject(
                "nanobubble_void_fraction",
                phi.to_string(),
                "must be 0 (disabled) or within the tested range [0.05, 0.40]",
            );
        }
        if !(0.0..=1.0).contains(&self.nanobubble_drag_multiplier) {
            reject(
                "nanobubble_drag_multiplier",
                self.nanobubble_drag_multiplier.to_string(),
                "must be within [0, 1]",
            );
        }
        if self.sprocket_radius_m <= 0.0 {
            reject(
                "sprocket_radius_m",
                self.sprocket_radius_m.to_string(),
                "must be positive",
            );
        }
        if self.gear_ratio <= 0.0 {
            reject("gear_ratio", self.gear_ratio.to_string(), "must be positive");
        }
        if self.flywheel_inertia_kgm2 < 0.0 {
            reject(
                "flywheel_inertia_kgm2",
                self.flywheel_inertia_kgm2.to_string(),
                "must be non-negative",
            );
        }
        for (name, eta) in [
            ("gearbox_efficiency", self.gearbox_efficiency),
            ("generator_efficiency", self.generator_efficiency),
            ("clutch_efficiency", self.clutch_efficiency),
        ] {
            if !(0.0..=1.0).contains(&eta) {
                reject(name, eta.to_string(), "efficiency must be within [0, 1]");
            }
        }
        if self.time_step_s <= 0.0 || self.time_step_s > 1.0 {
            reject(
                "time_step_s",
                self.time_step_s.to_string(),
                "must be within (0, 1] s",
            );
        }
        if self.num_cycles == 0 {
            reject("num_cycles", "0".to_string(), "must be at least 1");
        }
        if self.chain_speed_mps <= 0.0 {
            reject(
                "chain_speed_mps",
                self.chain_speed_mps.to_string(),
                "must be positive",
            );
        }
        // Stability: a floater must not cross more than one phase
        // boundary per tick.
        if self.chain_speed_mps * self.time_step_s >= self.water_column_height_m
            && self.water_column_height_m > 0.0
        {
            reject(
                "time_step_s",
                self.time_step_s.to_string(),
                "chain travel per tick must stay below the column height",
            );
        }
        if self.generator_load_torque_nm < 0.0 {
            reject(
                "generator_load_torque_nm",
                self.generator_load_torque_nm.to_string(),
                "must be non-negative",
            );
        }
        if self.flywheel_friction_torque_nm < 0.0 {
            reject(
                "flywheel_friction_torque_nm",
                self.flywheel_friction_torque_nm.to_string(),
                "must be non-negative",
            );
        }
        if self.constants.gravity <= 0.0 {
            reject(
                "constants.gravity",
                self.constants.gravity.to_string(),
                "must be positive",
            );
        }
        if self.constants.atmospheric_pressure_pa <= 0.0 {
            reject(
                "constants.atmospheric_pressure_pa",
                self.constants.atmospheric_pressure_pa.to_string(),
                "must be positive",
            );
        }
        if self.constants.gamma_air <= 1.0 {
            reject(
                "constants.gamma_air",
                self.constants.gamma_air.to_string(),
                "heat capacity ratio must exceed 1",
            );
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(KppError::ConfigValidation { issues })
        }
    }
}
