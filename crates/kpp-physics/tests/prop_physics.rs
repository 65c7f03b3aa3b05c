// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Property-Based Tests (proptest) for kpp-physics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for kpp-physics using proptest.
//!
//! Covers: Archimedes over all volumes, drag-law shape, blended
//! gas-law bounds and the isothermal boundary case, hydrostatic
//! pressure monotonicity, nanobubble mixture bounds.

use kpp_physics::environment::Environment;
use kpp_physics::floater::{buoyant_force, drag_force};
use kpp_physics::gas::blended_volume;
use kpp_physics::nanobubble::NanobubbleColumn;
use kpp_types::constants::PhysicalConstants;
use proptest::prelude::*;

const GAMMA: f64 = 1.4;

fn env() -> Environment {
    Environment::new(PhysicalConstants::default(), 20.0, 997.0, 20.0).unwrap()
}

// ── Archimedes & Drag ────────────────────────────────────────────────

proptest! {
    /// Archimedes check: ρ_w·V·9.81 for every positive volume.
    #[test]
    fn archimedes_for_all_volumes(v in 1e-6f64..100.0) {
        let f = buoyant_force(v, 997.0, 9.81);
        let expected = 997.0 * v * 9.81;
        prop_assert!((f - expected).abs() <= expected * 1e-12,
            "buoyancy {} vs {}", f, expected);
    }

    /// Buoyancy is linear in volume and density.
    #[test]
    fn buoyancy_linearity(
        v in 1e-3f64..10.0,
        rho in 1.0f64..2000.0,
        k in 0.1f64..10.0,
    ) {
        let base = buoyant_force(v, rho, 9.81);
        let scaled = buoyant_force(k * v, rho, 9.81);
        prop_assert!((scaled - k * base).abs() < base.abs() * k * 1e-9);
    }

    /// Drag is non-negative and quadratic: F(2v) = 4·F(v).
    #[test]
    fn drag_quadratic_scaling(
        v in 0.01f64..10.0,
        cd in 0.1f64..2.0,
        area in 0.01f64..2.0,
    ) {
        let d = drag_force(997.0, v, cd, area);
        let d2 = drag_force(997.0, 2.0 * v, cd, area);
        prop_assert!(d >= 0.0);
        prop_assert!((d2 - 4.0 * d).abs() < d * 1e-9,
            "quadratic scaling broken: {} vs {}", d2, 4.0 * d);
    }
}

// ── Blended Gas Law ──────────────────────────────────────────────────

proptest! {
    /// On expansion (P_z < P₀) the blend lies between the adiabatic
    /// and isothermal volumes for every f in (0, 1).
    #[test]
    fn blend_bounded_by_pure_laws(
        p0 in 1.5e5f64..5.0e5,
        v0 in 0.01f64..0.5,
        ratio in 0.2f64..0.99,
        f in 0.01f64..0.99,
    ) {
        let p_z = p0 * ratio;
        let v_iso = blended_volume(p0, v0, p_z, 1.0, GAMMA);
        let v_adia = blended_volume(p0, v0, p_z, 0.0, GAMMA);
        let v = blended_volume(p0, v0, p_z, f, GAMMA);

        prop_assert!(v_adia < v_iso, "expansion: adiabatic below isothermal");
        prop_assert!(v >= v_adia && v <= v_iso,
            "blend {} outside [{}, {}]", v, v_adia, v_iso);
    }

    /// Boundary: f = 1.0 reduces exactly to V = P₀·V₀/P_z.
    #[test]
    fn isothermal_boundary_exact(
        p0 in 1.5e5f64..5.0e5,
        v0 in 0.01f64..0.5,
        ratio in 0.2f64..0.99,
    ) {
        let p_z = p0 * ratio;
        let v = blended_volume(p0, v0, p_z, 1.0, GAMMA);
        let boyle = p0 * v0 / p_z;
        prop_assert!((v - boyle).abs() <= boyle * 1e-14,
            "f=1 must be pure Boyle: {} vs {}", v, boyle);
    }

    /// Volume at constant pressure is the identity for both laws.
    #[test]
    fn same_pressure_is_identity(
        p0 in 1.5e5f64..5.0e5,
        v0 in 0.01f64..0.5,
        f in 0.0f64..1.0,
    ) {
        let v = blended_volume(p0, v0, p0, f, GAMMA);
        prop_assert!((v - v0).abs() <= v0 * 1e-12);
    }

    /// Expansion volume is monotonically non-decreasing in f.
    #[test]
    fn blend_monotone_in_heat_fraction(
        p0 in 1.5e5f64..5.0e5,
        v0 in 0.01f64..0.5,
        ratio in 0.2f64..0.99,
        f1 in 0.0f64..1.0,
        f2 in 0.0f64..1.0,
    ) {
        let p_z = p0 * ratio;
        let (lo, hi) = if f1 <= f2 { (f1, f2) } else { (f2, f1) };
        let v_lo = blended_volume(p0, v0, p_z, lo, GAMMA);
        let v_hi = blended_volume(p0, v0, p_z, hi, GAMMA);
        prop_assert!(v_hi >= v_lo - v_lo * 1e-14);
    }
}

// ── Environment ──────────────────────────────────────────────────────

proptest! {
    /// Hydrostatic pressure is strictly increasing with depth.
    #[test]
    fn pressure_monotone_in_depth(d1 in 0.0f64..20.0, d2 in 0.0f64..20.0) {
        prop_assume!((d1 - d2).abs() > 1e-9);
        let e = env();
        let p1 = e.hydrostatic_pressure(d1).unwrap();
        let p2 = e.hydrostatic_pressure(d2).unwrap();
        prop_assert_eq!(p1 < p2, d1 < d2);
    }

    /// Water density stays within a plausible band over [0, 100] °C.
    #[test]
    fn water_density_plausible(t in 0.0f64..100.0) {
        let rho = env().water_density(t).unwrap();
        prop_assert!(rho > 950.0 && rho < 1010.0, "ρ({}) = {}", t, rho);
    }
}

// ── Nanobubble Mixture ───────────────────────────────────────────────

proptest! {
    /// Effective density is bounded by the pure phases and strictly
    /// decreasing in φ over the tested range.
    #[test]
    fn mixture_density_bounds(phi in 0.05f64..=0.40) {
        let col = NanobubbleColumn::new(phi, 997.0, 1.2, 1.0).unwrap();
        let rho = col.effective_density();
        prop_assert!(rho < 997.0 && rho > 1.2);

        let denser = NanobubbleColumn::new((phi - 0.01).max(0.05), 997.0, 1.2, 1.0)
            .unwrap()
            .effective_density();
        if phi - 0.01 >= 0.05 {
            prop_assert!(rho < denser);
        }
    }
}
