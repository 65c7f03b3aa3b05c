// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Gas State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ideal-gas thermodynamics of the air pocket in an ascending floater.
//!
//! Expansion during ascent blends the isothermal and adiabatic laws by
//! the heat-exchange fraction f (H2):
//!
//!   V_iso  = P₀·V₀ / P_z
//!   V_adia = V₀ · (P₀/P_z)^(1/γ)
//!   V_z    = f·V_iso + (1−f)·V_adia
//!
//! f = 1 reduces exactly to Boyle's law; f = 0 is fully adiabatic.

use kpp_types::error::{KppError, KppResult};

/// Blended isothermal/adiabatic volume at absolute pressure `p_z`.
pub fn blended_volume(p0: f64, v0: f64, p_z: f64, heat_fraction: f64, gamma: f64) -> f64 {
    let v_iso = p0 * v0 / p_z;
    let v_adia = v0 * (p0 / p_z).powf(1.0 / gamma);
    heat_fraction * v_iso + (1.0 - heat_fraction) * v_adia
}

/// Air pocket inside a filling or ascending floater.
///
/// Moles are fixed at injection; pressure tracks local hydrostatic
/// pressure and volume follows the blended law, clamped to the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct GasState {
    /// Amount of injected air [mol]; constant after injection.
    pub moles: f64,
    /// Pocket temperature [K]; the water bath pins it.
    pub temperature_k: f64,
    /// Current absolute pressure [Pa].
    pub pressure_pa: f64,
    /// Current volume [m³].
    pub volume_m3: f64,
    /// Reference pressure P₀ (pocket state when injection completed).
    reference_pressure_pa: f64,
    /// Reference volume V₀.
    reference_volume_m3: f64,
}

impl GasState {
    /// Pocket holding `volume_m3` at `pressure_pa` and `temperature_k`;
    /// moles follow from PV = nRT.
    pub fn from_injection(
        pressure_pa: f64,
        volume_m3: f64,
        temperature_k: f64,
        gas_constant: f64,
    ) -> KppResult<Self> {
        if pressure_pa <= 0.0 {
            return Err(KppError::InvalidParameter {
                name: "pressure_pa",
                value: pressure_pa,
                reason: "must be positive",
            });
        }
        if volume_m3 <= 0.0 {
            return Err(KppError::InvalidParameter {
                name: "volume_m3",
                value: volume_m3,
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
        Ok(GasState {
            moles: pressure_pa * volume_m3 / (gas_constant * temperature_k),
            temperature_k,
            pressure_pa,
            volume_m3,
            reference_pressure_pa: pressure_pa,
            reference_volume_m3: volume_m3,
        })
    }

    /// Mass of the pocket [kg].
    pub fn mass_kg(&self, molar_mass_air: f64) -> f64 {
        self.moles * molar_mass_air
    }

    /// Reference pressure P₀ the blended law expands from [Pa].
    pub fn reference_pressure_pa(&self) -> f64 {
        self.reference_pressure_pa
    }

    /// Reference volume V₀ the blended law expands from [m³].
    pub fn reference_volume_m3(&self) -> f64 {
        self.reference_volume_m3
    }

    /// Re-anchor the reference state (used when injection completes
    /// and the pocket holds bottom pressure/volume).
    pub fn set_reference(&mut self, pressure_pa: f64, volume_m3: f64) {
        self.reference_pressure_pa = pressure_pa;
        self.reference_volume_m3 = volume_m3;
        self.pressure_pa = pressure_pa;
        self.volume_m3 = volume_m3;
    }

    /// Update the pocket to the local pressure `p_z` via the blended
    /// law, clamped to `shell_volume_m3`.
    ///
    /// Returns the excess volume [m³] if the clamp engaged (the excess
    /// air is treated as vented and logged by the caller).
    pub fn update_at_pressure(
        &mut self,
        p_z: f64,
        heat_fraction: f64,
        gamma: f64,
        shell_volume_m3: f64,
    ) -> Option<f64> {
        let v = blended_volume(
            self.reference_pressure_pa,
            self.reference_volume_m3,
            p_z,
            heat_fraction,
            gamma,
        );
        self.pressure_pa = p_z;
        if v > shell_volume_m3 {
            self.volume_m3 = shell_volume_m3;
            Some(v - shell_volume_m3)
        } else {
            self.volume_m3 = v;
            None
        }
    }

    /// Compressor work to deliver this pocket's moles from atmospheric
    /// pressure to the injection line pressure [J].
    ///
    /// Flow (open-system) work, blended like the expansion model:
    ///   W_iso  = nRT·ln(r)
    ///   W_adia = nRT·γ/(γ−1)·(r^((γ−1)/γ) − 1),  r = P_inj/P_atm
    pub fn compression_work_j(
        &self,
        atmospheric_pa: f64,
        injection_pa: f64,
        heat_fraction: f64,
        gamma: f64,
    ) -> f64 {
        // nRT taken from the pocket's own reference state keeps the
        // figure consistent with the moles actually injected.
        let nrt = self.reference_pressure_pa * self.reference_volume_m3;
        let r = injection_pa / atmospheric_pa;
        let w_iso = nrt * r.ln();
        let w_adia = nrt * gamma / (gamma - 1.0) * (r.powf((gamma - 1.0) / gamma) - 1.0);
        heat_fraction * w_iso + (1.0 - heat_fraction) * w_adia
    }

    /// Isothermal expansion work still available against ambient
    /// pressure [J]; this is what venting at the top throws away.
    pub fn available_work_j(&self, ambient_pa: f64) -> f64 {
        if self.pressure_pa <= ambient_pa {
            return 0.0;
        }
        self.pressure_pa * self.volume_m3 * (self.pressure_pa / ambient_pa).ln()
    }
}
