// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Nanobubble Column
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! H1: effective two-phase density and drag reduction on the
//! descending leg.
//!
//! `ρ_eff = (1−φ)·ρ_water + φ·ρ_air`. The drag multiplier captures
//! bubble lubrication independently of the buoyancy reduction.

use kpp_types::error::{KppError, KppResult};

/// Physically tested void-fraction range.
const PHI_MIN: f64 = 0.05;
const PHI_MAX: f64 = 0.40;

/// Descending-leg fluid state.
#[derive(Debug, Clone, PartialEq)]
pub struct NanobubbleColumn {
    /// Void fraction φ; 0 disables the hypothesis.
    pub void_fraction: f64,
    /// Plain water density at ambient temperature [kg/m³].
    pub base_density: f64,
    /// Entrained air density [kg/m³].
    pub air_density: f64,
    /// Cd multiplier applied to descending floaters.
    pub drag_multiplier: f64,
}

impl NanobubbleColumn {
    /// φ must be 0 (disabled) or within [0.05, 0.40].
    pub fn new(
        void_fraction: f64,
        base_density: f64,
        air_density: f64,
        drag_multiplier: f64,
    ) -> KppResult<Self> {
        if void_fraction != 0.0 && !(PHI_MIN..=PHI_MAX).contains(&void_fraction) {
            return Err(KppError::InvalidParameter {
                name: "void_fraction",
                value: void_fraction,
                reason: "must be 0 (disabled) or within the tested range [0.05, 0.40]",
            });
        }
        if !(0.0..=1.0).contains(&drag_multiplier) {
            return Err(KppError::InvalidParameter {
                name: "drag_multiplier",
                value: drag_multiplier,
                reason: "must be within [0, 1]",
            });
        }
        Ok(NanobubbleColumn {
            void_fraction,
            base_density,
            air_density,
            drag_multiplier,
        })
    }

    /// Pure water column (H1 off).
    pub fn disabled(base_density: f64, air_density: f64) -> Self {
        NanobubbleColumn {
            void_fraction: 0.0,
            base_density,
            air_density,
            drag_multiplier: 1.0,
        }
    }

    /// Mixture density seen by descending floaters [kg/m³].
    pub fn effective_density(&self) -> f64 {
        (1.0 - self.void_fraction) * self.base_density + self.void_fraction * self.air_density
    }

    /// Effective drag coefficient for a descending floater.
    pub fn effective_drag_coefficient(&self, drag_coefficient: f64) -> f64 {
        if self.void_fraction == 0.0 {
            drag_coefficient
        } else {
            drag_coefficient * self.drag_multiplier
        }
    }
}
