// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Environment
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Temperature/pressure-dependent fluid property lookups.
//!
//! All lookups are pure functions of validated inputs. Out-of-range
//! inputs fail with `InvalidParameter`; nothing is clamped silently.

use kpp_types::constants::{PhysicalConstants, REFERENCE_TEMPERATURE_C};
use kpp_types::error::{KppError, KppResult};

/// Water column environment shared by all floaters.
#[derive(Debug, Clone)]
pub struct Environment {
    constants: PhysicalConstants,
    /// Ambient water temperature [°C].
    pub temperature_c: f64,
    /// Water density at the 20 °C reference [kg/m³].
    pub water_density_ref: f64,
    /// Column height H [m]; floater positions live in [0, H].
    pub column_height_m: f64,
}

impl Environment {
    pub fn new(
        constants: PhysicalConstants,
        temperature_c: f64,
        water_density_ref: f64,
        column_height_m: f64,
    ) -> KppResult<Self> {
        if !(0.0..=100.0).contains(&temperature_c) {
            return Err(KppError::InvalidParameter {
                name: "temperature_c",
                value: temperature_c,
                reason: "must be within [0, 100] °C",
            });
        }
        if water_density_ref <= 0.0 {
            return Err(KppError::InvalidParameter {
                name: "water_density_ref",
                value: water_density_ref,
                reason: "must be positive",
            });
        }
        if column_height_m <= 0.0 {
            return Err(KppError::InvalidParameter {
                name: "column_height_m",
                value: column_height_m,
                reason: "must be positive",
            });
        }
        Ok(Environment {
            constants,
            temperature_c,
            water_density_ref,
            column_height_m,
        })
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Water density at temperature T [kg/m³].
    ///
    /// Linear thermal-expansion model around the 20 °C reference:
    /// `ρ(T) = ρ_ref · (1 − β·(T − 20))`.
    pub fn water_density(&self, temperature_c: f64) -> KppResult<f64> {
        if !(0.0..=100.0).contains(&temperature_c) {
            return Err(KppError::InvalidParameter {
                name: "temperature_c",
                value: temperature_c,
                reason: "must be within [0, 100] °C",
            });
        }
        let beta = self.constants.water_thermal_expansion;
        Ok(self.water_density_ref * (1.0 - beta * (temperature_c - REFERENCE_TEMPERATURE_C)))
    }

    /// Water density at the ambient temperature [kg/m³].
    pub fn ambient_water_density(&self) -> f64 {
        let beta = self.constants.water_thermal_expansion;
        self.water_density_ref * (1.0 - beta * (self.temperature_c - REFERENCE_TEMPERATURE_C))
    }

    /// Air density from the ideal gas law: `ρ = P / (R_air · T)`.
    pub fn air_density(&self, pressure_pa: f64, temperature_k: f64) -> KppResult<f64> {
        if pressure_pa <= 0.0 {
            return Err(KppError::InvalidParameter {
                name: "pressure_pa",
                value: pressure_pa,
                reason: "must be positive",
            });
        }
        if temperature_k <= 0.0 {
            return Err(KppError::InvalidParameter {
                name: "temperature_k",
                value: temperature_k,
                reason: "must be positive",
            });
        }
        Ok(pressure_pa / (self.constants.r_air * temperature_k))
    }

    /// Dynamic viscosity of water [Pa·s].
    ///
    /// Empirical ~2 %/°C decline from 1.002×10⁻³ Pa·s at 20 °C:
    /// `μ(T) = μ_ref · (1 − d)^(T − 20)`.
    pub fn dynamic_viscosity(&self, temperature_c: f64) -> KppResult<f64> {
        if !(0.0..=100.0).contains(&temperature_c) {
            return Err(KppError::InvalidParameter {
                name: "temperature_c",
                value: temperature_c,
                reason: "must be within [0, 100] °C",
            });
        }
        let decline = 1.0 - self.constants.viscosity_decline_per_c;
        Ok(self.constants.viscosity_ref_pa_s
            * decline.powf(temperature_c - REFERENCE_TEMPERATURE_C))
    }

    /// Hydrostatic pressure at a depth below the surface [Pa]:
    /// `P(z) = P_atm + ρ·g·depth`.
    pub fn hydrostatic_pressure(&self, depth_m: f64) -> KppResult<f64> {
        if depth_m < 0.0 || depth_m > self.column_height_m {
            return Err(KppError::InvalidParameter {
                name: "depth_m",
                value: depth_m,
                reason: "depth must be within [0, H]",
            });
        }
        Ok(self.constants.atmospheric_pressure_pa
            + self.ambient_water_density() * self.constants.gravity * depth_m)
    }

    /// Hydrostatic pressure at a floater position (height above the
    /// bottom) [Pa]. Position H is the surface.
    pub fn pressure_at_position(&self, position_m: f64) -> KppResult<f64> {
        self.hydrostatic_pressure(self.column_height_m - position_m)
    }
}
