// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Injection Event
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One-shot force pulse from a compressed-air injection.
//!
//! Two components act over the fill window [start, start + duration):
//! the buoyancy "bang" of the arriving air volume and the reaction of
//! the displaced-water jet, `F_jet = ṁ·v_jet` with
//! `ṁ = ρ_w·V_air / fill_time`. The buoyancy bang enters through the
//! floater's own force as the pocket grows toward `V_air`; the jet
//! reaction pushes on the structure and surrounding water instead, so
//! the engine feeds it into the drivetrain torque accumulator
//! directly. Summing both here would count the displaced volume twice.

/// Transient force record for one fill.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionEvent {
    pub floater_id: usize,
    /// Compressor line pressure [Pa].
    pub air_pressure_pa: f64,
    pub fill_time_s: f64,
    pub jet_velocity_mps: f64,
    /// ρ_w·V_air·g, spread over the fill window [N].
    pub buoyancy_pulse_n: f64,
    /// ṁ·v_jet [N].
    pub jet_force_n: f64,
    pub start_tick: u64,
    pub duration_ticks: u64,
}

impl InjectionEvent {
    /// `air_volume_m3` is the pocket volume the fill will reach at
    /// bottom pressure; `water_density` the displaced fluid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        floater_id: usize,
        air_volume_m3: f64,
        water_density: f64,
        gravity: f64,
        air_pressure_pa: f64,
        fill_time_s: f64,
        jet_velocity_mps: f64,
        start_tick: u64,
        time_step_s: f64,
    ) -> Self {
        let mass_flow = water_density * air_volume_m3 / fill_time_s;
        InjectionEvent {
            floater_id,
            air_pressure_pa,
            fill_time_s,
            jet_velocity_mps,
            buoyancy_pulse_n: water_density * air_volume_m3 * gravity,
            jet_force_n: mass_flow * jet_velocity_mps,
            start_tick,
            duration_ticks: ((fill_time_s / time_step_s).ceil() as u64).max(1),
        }
    }

    /// Forces apply only within [start_tick, start_tick + duration).
    pub fn is_active(&self, tick: u64) -> bool {
        tick >= self.start_tick && tick < self.start_tick + self.duration_ticks
    }

    /// Tick at which the fill completes.
    pub fn end_tick(&self) -> u64 {
        self.start_tick + self.duration_ticks
    }

    /// Fill progress in [0, 1] at the given tick.
    pub fn progress(&self, tick: u64) -> f64 {
        if tick <= self.start_tick {
            0.0
        } else if tick >= self.end_tick() {
            1.0
        } else {
            (tick - self.start_tick) as f64 / self.duration_ticks as f64
        }
    }

    /// Jet reaction applied to the drivetrain while active [N]. The
    /// buoyancy component is not included; the growing pocket already
    /// carries it through the floater's force.
    pub fn jet_reaction_n(&self, tick: u64) -> f64 {
        if self.is_active(tick) {
            self.jet_force_n
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> InjectionEvent {
        // 0.085 m³ of air displacing 997 kg/m³ water over 1.5 s.
        InjectionEvent::new(3, 0.085, 997.0, 9.81, 4.0e5, 1.5, 5.0, 100, 0.05)
    }

    #[test]
    fn test_pulse_components() {
        let e = event();
        let expected_buoy = 997.0 * 0.085 * 9.81;
        let expected_jet = 997.0 * 0.085 / 1.5 * 5.0;
        assert!((e.buoyancy_pulse_n - expected_buoy).abs() < 1e-9);
        assert!((e.jet_force_n - expected_jet).abs() < 1e-9);
    }

    #[test]
    fn test_active_window_is_half_open() {
        let e = event();
        assert_eq!(e.duration_ticks, 30);
        assert!(!e.is_active(99));
        assert!(e.is_active(100));
        assert!(e.is_active(129));
        assert!(!e.is_active(130));
    }

    #[test]
    fn test_jet_reaction_zero_outside_window() {
        let e = event();
        assert_eq!(e.jet_reaction_n(99), 0.0);
        assert!((e.jet_reaction_n(115) - e.jet_force_n).abs() < 1e-12);
        assert_eq!(e.jet_reaction_n(130), 0.0);
    }

    #[test]
    fn test_jet_reaction_excludes_buoyancy() {
        // The pocket's buoyancy flows through the floater force; the
        // drivetrain-side reaction is the jet alone.
        let e = event();
        assert!(e.jet_reaction_n(115) < e.buoyancy_pulse_n);
    }

    #[test]
    fn test_progress_ramps_linearly() {
        let e = event();
        assert_eq!(e.progress(100), 0.0);
        assert!((e.progress(115) - 0.5).abs() < 1e-12);
        assert_eq!(e.progress(130), 1.0);
        assert_eq!(e.progress(500), 1.0);
    }

    #[test]
    fn test_duration_rounds_up_to_full_tick() {
        let e = InjectionEvent::new(0, 0.1, 997.0, 9.81, 4.0e5, 0.07, 5.0, 0, 0.05);
        assert_eq!(e.duration_ticks, 2);
    }
}
