// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Property-Based Tests (proptest) for kpp-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for kpp-types using proptest.
//!
//! Covers: phase state-machine invariants, configuration validation
//! completeness, serialization roundtrip.

use kpp_types::config::KppConfig;
use kpp_types::error::KppError;
use kpp_types::state::FloaterPhase;
use proptest::prelude::*;

const ALL_PHASES: [FloaterPhase; 5] = [
    FloaterPhase::EmptyAtBottom,
    FloaterPhase::Filling,
    FloaterPhase::Ascending,
    FloaterPhase::VentingAtTop,
    FloaterPhase::Descending,
];

// ── Phase State Machine ──────────────────────────────────────────────

proptest! {
    /// Advancing any phase by 5 steps returns to itself; no shorter
    /// period exists (the cycle visits all five states).
    #[test]
    fn phase_cycle_period_is_exactly_five(start_idx in 0usize..5) {
        let start = ALL_PHASES[start_idx];
        let mut phase = start;
        for step in 1..=5usize {
            phase = phase.next();
            if step < 5 {
                prop_assert_ne!(phase, start, "cycle closed early at step {}", step);
            }
        }
        prop_assert_eq!(phase, start);
    }

    /// Exactly two phases in any full cycle are gas-bearing, and they
    /// are adjacent (Filling then Ascending).
    #[test]
    fn gas_bearing_phases_are_adjacent(start_idx in 0usize..5) {
        let mut phase = ALL_PHASES[start_idx];
        let mut bearing = Vec::new();
        for _ in 0..5 {
            if phase.is_gas_bearing() {
                bearing.push(phase);
            }
            phase = phase.next();
        }
        prop_assert_eq!(bearing.len(), 2);
        let has_pair = bearing.contains(&FloaterPhase::Filling)
            && bearing.contains(&FloaterPhase::Ascending);
        prop_assert!(has_pair);
        prop_assert_eq!(FloaterPhase::Filling.next(), FloaterPhase::Ascending);
    }
}

// ── Configuration Validation ─────────────────────────────────────────

fn assert_single_issue_names(config: KppConfig, field: &str) -> Result<(), TestCaseError> {
    match config.validate() {
        Err(KppError::ConfigValidation { issues }) => {
            prop_assert!(
                issues.iter().any(|i| i.field == field),
                "expected issue for '{}', got {:?}",
                field,
                issues
            );
            Ok(())
        }
        other => {
            prop_assert!(false, "expected ConfigValidation, got {:?}", other.err());
            Ok(())
        }
    }
}

proptest! {
    /// Any out-of-range heat-exchange fraction is rejected and named.
    #[test]
    fn bad_heat_exchange_fraction_named(f in prop_oneof![-10.0f64..-1e-9, 1.0 + 1e-9..10.0]) {
        let mut config = KppConfig::default();
        config.heat_exchange_fraction = f;
        assert_single_issue_names(config, "heat_exchange_fraction")?;
    }

    /// Any void fraction outside {0} ∪ [0.05, 0.40] is rejected and named.
    #[test]
    fn bad_void_fraction_named(phi in prop_oneof![1e-6f64..0.05 - 1e-6, 0.40 + 1e-6..2.0]) {
        let mut config = KppConfig::default();
        config.nanobubble_void_fraction = phi;
        assert_single_issue_names(config, "nanobubble_void_fraction")?;
    }

    /// Any efficiency above 1 or below 0 is rejected and named.
    #[test]
    fn bad_efficiency_named(
        which in 0usize..3,
        eta in prop_oneof![-5.0f64..-1e-9, 1.0 + 1e-9..5.0],
    ) {
        let mut config = KppConfig::default();
        let field = match which {
            0 => { config.gearbox_efficiency = eta; "gearbox_efficiency" }
            1 => { config.generator_efficiency = eta; "generator_efficiency" }
            _ => { config.clutch_efficiency = eta; "clutch_efficiency" }
        };
        assert_single_issue_names(config, field)?;
    }

    /// In-range values validate; every issue count matches the number
    /// of fields actually broken.
    #[test]
    fn issue_count_matches_broken_fields(
        break_mass in proptest::bool::ANY,
        break_dt in proptest::bool::ANY,
        break_temp in proptest::bool::ANY,
    ) {
        let mut config = KppConfig::default();
        let mut expected = 0usize;
        if break_mass {
            config.floater_shell_mass_kg = -1.0;
            expected += 1;
        }
        if break_dt {
            config.time_step_s = 0.0;
            expected += 1;
        }
        if break_temp {
            config.ambient_temperature_c = 140.0;
            expected += 1;
        }

        match config.validate() {
            Ok(()) => prop_assert_eq!(expected, 0),
            Err(KppError::ConfigValidation { issues }) => {
                prop_assert_eq!(issues.len(), expected);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    /// Serialization roundtrip preserves the config exactly.
    #[test]
    fn config_roundtrip(
        n in 2usize..200,
        volume in 0.01f64..2.0,
        f in 0.0f64..1.0,
    ) {
        let mut config = KppConfig::default();
        config.number_of_floaters = n;
        config.floater_volume_m3 = volume;
        config.heat_exchange_fraction = f;

        let json = serde_json::to_string(&config).unwrap();
        let parsed: KppConfig = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, config);
    }
}

/// JSON parsing must recover every f64 bit for bit; values near the
/// 17-significant-digit edge are where a lossy parser drifts by 1 ULP.
#[test]
fn full_precision_float_survives_json() {
    let mut config = KppConfig::default();
    config.floater_volume_m3 = 1.865_521_781_375_589_8;

    let json = serde_json::to_string(&config).unwrap();
    let parsed: KppConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(
        parsed.floater_volume_m3.to_bits(),
        config.floater_volume_m3.to_bits(),
        "float parse drifted: {} vs {}",
        parsed.floater_volume_m3,
        config.floater_volume_m3
    );
}
