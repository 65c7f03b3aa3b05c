// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Physical Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical constants as an explicit, per-run structure.
//!
//! Every component takes a `PhysicalConstants` at construction instead
//! of reading module-level globals, so test runs with altitude/gravity
//! variants never share mutable state.

use serde::{Deserialize, Serialize};

/// Reference temperature for the density and viscosity models [°C].
pub const REFERENCE_TEMPERATURE_C: f64 = 20.0;

/// Celsius offset to Kelvin.
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Gravitational acceleration [m/s²].
    #[serde(default = "default_gravity")]
    pub gravity: f64,

    /// Atmospheric pressure at the water surface [Pa].
    #[serde(default = "default_atmospheric_pressure")]
    pub atmospheric_pressure_pa: f64,

    /// Universal gas constant [J/(mol·K)].
    #[serde(default = "default_gas_constant")]
    pub gas_constant: f64,

    /// Specific gas constant of dry air [J/(kg·K)].
    #[serde(default = "default_r_air")]
    pub r_air: f64,

    /// Molar mass of dry air [kg/mol].
    #[serde(default = "default_molar_mass_air")]
    pub molar_mass_air: f64,

    /// Heat capacity ratio of air (cp/cv).
    #[serde(default = "default_gamma_air")]
    pub gamma_air: f64,

    /// Linear thermal-expansion coefficient of water [1/°C].
    #[serde(default = "default_water_thermal_expansion")]
    pub water_thermal_expansion: f64,

    /// Dynamic viscosity of water at 20 °C [Pa·s].
    #[serde(default = "default_viscosity_ref")]
    pub viscosity_ref_pa_s: f64,

    /// Fractional viscosity decrease per °C above 20 °C.
    #[serde(default = "default_viscosity_decline")]
    pub viscosity_decline_per_c: f64,
}

fn default_gravity() -> f64 {
    9.81
}
fn default_atmospheric_pressure() -> f64 {
    101_325.0
}
fn default_gas_constant() -> f64 {
    8.314
}
fn default_r_air() -> f64 {
    287.05
}
fn default_molar_mass_air() -> f64 {
    0.028_96
}
fn default_gamma_air() -> f64 {
    1.4
}
fn default_water_thermal_expansion() -> f64 {
    2.14e-4
}
fn default_viscosity_ref() -> f64 {
    1.002e-3
}
fn default_viscosity_decline() -> f64 {
    0.02
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        PhysicalConstants {
            gravity: default_gravity(),
            atmospheric_pressure_pa: default_atmospheric_pressure(),
            gas_constant: default_gas_constant(),
            r_air: default_r_air(),
            molar_mass_air: default_molar_mass_air(),
            gamma_air: default_gamma_air(),
            water_thermal_expansion: default_water_thermal_expansion(),
            viscosity_ref_pa_s: default_viscosity_ref(),
            viscosity_decline_per_c: default_viscosity_decline(),
        }
    }
}
