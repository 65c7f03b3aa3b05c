// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Cycle Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fixed-step cycle orchestrator.
//!
//! Per-tick order: cancellation check, injection scheduling, force
//! aggregation, drivetrain integration, telemetry, phase/position
//! advancement. The loop is deterministic: the same configuration
//! always produces bit-for-bit identical results.

use crate::drivetrain::Drivetrain;
use crate::telemetry::TickRecorder;
use kpp_physics::environment::Environment;
use kpp_physics::floater::Floater;
use kpp_physics::gas::{blended_volume, GasState};
use kpp_physics::injection::InjectionEvent;
use kpp_physics::nanobubble::NanobubbleColumn;
use kpp_types::config::KppConfig;
use kpp_types::error::{KppResult, PhysicalLimitWarning};
use kpp_types::state::{CycleResult, FloaterPhase, HypothesisContribution};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Telemetry retention cap; older samples roll off.
const MAX_TELEMETRY_SAMPLES: usize = 200_000;

/// Per-cycle accumulators, zeroed at every cycle boundary.
#[derive(Debug, Clone, Default)]
struct CycleAccumulator {
    ticks: u64,
    torque_sum_nm: f64,
    power_sum_w: f64,
    speed_sum_mps: f64,
    energy_in_j: f64,
    energy_out_j: f64,
    vented_energy_j: f64,
    h1_j: f64,
    h2_j: f64,
    h3_j: f64,
    warnings: Vec<PhysicalLimitWarning>,
}

/// The simulation engine: floaters, water column, drivetrain and the
/// bookkeeping around them.
#[derive(Debug, Clone)]
pub struct CycleEngine {
    config: KppConfig,
    env: Environment,
    column: NanobubbleColumn,
    /// Plain-water column used as the H1 attribution baseline.
    baseline_column: NanobubbleColumn,
    drivetrain: Drivetrain,
    floaters: Vec<Floater>,
    active_injection: Option<InjectionEvent>,
    /// Round-robin start index for the injection scheduler.
    injection_cursor: usize,
    tick: u64,
    ticks_per_cycle: u64,
    cycles_completed: usize,
    acc: CycleAccumulator,
    recorder: TickRecorder,
    cancel: Arc<AtomicBool>,
    /// One clamp warning per floater per fill; reset on re-injection.
    clamp_warned: Vec<bool>,
}

impl CycleEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: KppConfig) -> KppResult<Self> {
        config.validate()?;

        let env = Environment::new(
            config.constants.clone(),
            config.ambient_temperature_c,
            config.water_density_ref,
            config.water_column_height_m,
        )?;
        let rho_w = env.ambient_water_density();
        let column = NanobubbleColumn::new(
            config.nanobubble_void_fraction,
            rho_w,
            config.air_density_ref,
            config.nanobubble_drag_multiplier,
        )?;
        let baseline_column = NanobubbleColumn::disabled(rho_w, config.air_density_ref);

        let floaters = Self::initial_floaters(&config, &env)?;

        // Lumped translating mass on the sprocket: every shell plus the
        // average water ballast over the loop (descenders full, the
        // ascending leg roughly half displaced).
        let chain_mass_kg: f64 = floaters
            .iter()
            .map(|f| f.shell_mass_kg + rho_w * f.volume_m3 / 2.0)
            .sum();
        let drivetrain = Drivetrain::new(&config, chain_mass_kg);

        let ticks_per_cycle = config.ticks_per_cycle();
        let retain = ((ticks_per_cycle as usize).saturating_mul(config.num_cycles))
            .min(MAX_TELEMETRY_SAMPLES)
            .max(1);
        let n = config.number_of_floaters;

        Ok(CycleEngine {
            config,
            env,
            column,
            baseline_column,
            drivetrain,
            floaters,
            active_injection: None,
            injection_cursor: 0,
            tick: 0,
            ticks_per_cycle,
            cycles_completed: 0,
            acc: CycleAccumulator::default(),
            recorder: TickRecorder::new(retain),
            cancel: Arc::new(AtomicBool::new(false)),
            clamp_warned: vec![false; n],
        })
    }

    /// Half the floaters ascend (evenly spaced, gas equilibrated to
    /// local pressure), the rest descend water-filled.
    fn initial_floaters(config: &KppConfig, env: &Environment) -> KppResult<Vec<Floater>> {
        let n = config.number_of_floaters;
        let n_up = n / 2;
        let n_down = n - n_up;
        let h = config.water_column_height_m;
        let t_k = config.ambient_temperature_k();
        let p_bottom = env.pressure_at_position(0.0)?;
        let gamma = config.constants.gamma_air;

        let mut floaters = Vec::with_capacity(n);
        for id in 0..n {
            let mut f = Floater::new(
                id,
                config.floater_volume_m3,
                config.floater_shell_mass_kg,
                config.cross_section_area_m2,
                config.drag_coefficient,
            );
            if id < n_up {
                let position = h * (id as f64 + 0.5) / n_up as f64;
                let v0 = Self::bottom_charge_volume(config, p_bottom);
                let mut gas = GasState::from_injection(
                    p_bottom,
                    v0,
                    t_k,
                    config.constants.gas_constant,
                )?;
                let p_local = env.pressure_at_position(position)?;
                gas.update_at_pressure(
                    p_local,
                    config.heat_exchange_fraction,
                    gamma,
                    config.floater_volume_m3,
                );
                f.place(FloaterPhase::Ascending, position, Some(gas), h)?;
            } else {
                let position = h * ((id - n_up) as f64 + 0.5) / n_down as f64;
                f.place(FloaterPhase::Descending, position, None, h)?;
            }
            floaters.push(f);
        }
        Ok(floaters)
    }

    /// Injected volume at bottom pressure, sized so the pocket exactly
    /// fills the shell when it reaches the surface isothermally.
    fn bottom_charge_volume(config: &KppConfig, bottom_pressure_pa: f64) -> f64 {
        config.floater_volume_m3 * config.constants.atmospheric_pressure_pa / bottom_pressure_pa
    }

    /// Cooperative cancellation flag; set from any thread, observed at
    /// tick granularity.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn cycles_completed(&self) -> usize {
        self.cycles_completed
    }

    pub fn floaters(&self) -> &[Floater] {
        &self.floaters
    }

    pub fn drivetrain(&self) -> &Drivetrain {
        &self.drivetrain
    }

    /// Telemetry snapshot; read-only, call any time.
    pub fn time_series(&self) -> kpp_types::state::TimeSeries {
        self.recorder.snapshot()
    }

    /// Rebuild the initial state from the stored configuration.
    /// Idempotent: reset-reset equals reset.
    pub fn reset(&mut self) -> KppResult<()> {
        let rebuilt = CycleEngine::new(self.config.clone())?;
        let cancel = Arc::clone(&self.cancel);
        *self = rebuilt;
        cancel.store(false, Ordering::SeqCst);
        self.cancel = cancel;
        Ok(())
    }

    /// Run one full cycle (one nominal loop of the chain) and return
    /// its aggregate result. Cancellation truncates the cycle; the
    /// result then covers only the ticks that ran.
    pub fn run_cycle(&mut self) -> KppResult<CycleResult> {
        self.acc = CycleAccumulator::default();

        for _ in 0..self.ticks_per_cycle {
            if self.cancel.load(Ordering::SeqCst) {
                self.acc
                    .warnings
                    .push(PhysicalLimitWarning::Cancelled { tick: self.tick });
                break;
            }
            self.step_tick()?;
        }

        let cycle_index = self.cycles_completed;
        self.cycles_completed += 1;

        let ticks = self.acc.ticks.max(1) as f64;
        let ran = self.acc.ticks > 0;
        let net_torque_nm = if ran { self.acc.torque_sum_nm / ticks } else { 0.0 };
        let electrical_power_w = if ran { self.acc.power_sum_w / ticks } else { 0.0 };
        let floater_speed_mps = if ran { self.acc.speed_sum_mps / ticks } else { 0.0 };
        let cycle_efficiency_pct = if self.acc.energy_in_j > 0.0 {
            100.0 * self.acc.energy_out_j / self.acc.energy_in_j
        } else {
            0.0
        };

        let mut warnings = std::mem::take(&mut self.acc.warnings);
        if ran && net_torque_nm < 0.0 {
            warnings.push(PhysicalLimitWarning::NegativeNetEnergy {
                cycle: cycle_index,
                deficit_j: self.acc.energy_in_j - self.acc.energy_out_j,
            });
        }

        Ok(CycleResult {
            net_torque_nm,
            electrical_power_w,
            floater_speed_mps,
            cycle_efficiency_pct,
            per_hypothesis_contribution: HypothesisContribution {
                h1_j: self.acc.h1_j,
                h2_j: self.acc.h2_j,
                h3_j: self.acc.h3_j,
            },
            energy_in_j: self.acc.energy_in_j,
            energy_out_j: self.acc.energy_out_j,
            vented_energy_j: self.acc.vented_energy_j,
            warnings,
        })
    }

    /// One simulation tick.
    fn step_tick(&mut self) -> KppResult<()> {
        let dt = self.config.time_step_s;

        self.schedule_injection()?;

        let speed = self.drivetrain.chain_speed_mps();
        let net_force_n = self.aggregate_forces(speed, dt)?;

        let torque_nm = self.drivetrain.chain_torque_nm(net_force_n);
        let out = self.drivetrain.step(torque_nm, dt);
        self.acc.energy_out_j += out.electrical_power_w * dt;
        if !out.clutch_engaged {
            // H3: output sustained purely by the flywheel.
            self.acc.h3_j += out.electrical_power_w * dt;
        }

        let t_s = self.tick as f64 * dt;
        self.recorder
            .push(t_s, torque_nm, out.electrical_power_w);
        self.acc.ticks += 1;
        self.acc.torque_sum_nm += torque_nm;
        self.acc.power_sum_w += out.electrical_power_w;
        self.acc.speed_sum_mps += speed;

        self.advance_floaters(dt)?;
        self.tick += 1;
        Ok(())
    }

    /// One injection line: start the next fill as soon as the previous
    /// one completes, picking waiting floaters round-robin.
    fn schedule_injection(&mut self) -> KppResult<()> {
        if self.active_injection.is_some() {
            return Ok(());
        }
        let n = self.floaters.len();
        let Some(idx) = (0..n)
            .map(|k| (self.injection_cursor + k) % n)
            .find(|&i| self.floaters[i].phase() == FloaterPhase::EmptyAtBottom)
        else {
            return Ok(());
        };
        self.injection_cursor = (idx + 1) % n;

        let p_bottom = self.env.pressure_at_position(0.0)?;
        let v0 = Self::bottom_charge_volume(&self.config, p_bottom);
        let mut gas = GasState::from_injection(
            p_bottom,
            v0,
            self.config.ambient_temperature_k(),
            self.config.constants.gas_constant,
        )?;
        // The pocket starts empty; the fill ramp grows it toward v0.
        gas.volume_m3 = 0.0;
        self.acc.energy_in_j += gas.compression_work_j(
            self.config.constants.atmospheric_pressure_pa,
            self.config.air_injection_pressure_pa,
            self.config.heat_exchange_fraction,
            self.config.constants.gamma_air,
        );

        let event = InjectionEvent::new(
            idx,
            v0,
            self.env.ambient_water_density(),
            self.config.constants.gravity,
            self.config.air_injection_pressure_pa,
            self.config.air_fill_time_s,
            self.config.jet_velocity_mps,
            self.tick,
            self.config.time_step_s,
        );

        self.clamp_warned[idx] = false;
        self.floaters[idx].begin_filling(gas)?;
        self.active_injection = Some(event);
        Ok(())
    }

    /// Sum of all floater driving forces plus the active injection
    /// pulse [N]. Accumulates the H1 and H2 attributions as a side
    /// effect (analytic per-tick deltas against the disabled models).
    fn aggregate_forces(&mut self, speed: f64, dt: f64) -> KppResult<f64> {
        let rho_w = self.env.ambient_water_density();
        let g = self.config.constants.gravity;
        let gamma = self.config.constants.gamma_air;
        let h1_enabled = self.column.void_fraction > 0.0;
        let h2_enabled = self.config.heat_exchange_fraction > 0.0;

        let mut total = 0.0;
        for f in &self.floaters {
            total += f.net_force(&self.env, &self.column, speed)?;

            match f.phase() {
                FloaterPhase::Descending if h1_enabled => {
                    let r_base = f.descending_resistance(&self.env, &self.baseline_column, speed);
                    let r_eff = f.descending_resistance(&self.env, &self.column, speed);
                    self.acc.h1_j += (r_base - r_eff).max(0.0) * speed * dt;
                }
                FloaterPhase::Ascending if h2_enabled => {
                    let gas = f.internal_gas()?;
                    let v_adia = blended_volume(
                        gas.reference_pressure_pa(),
                        gas.reference_volume_m3(),
                        gas.pressure_pa,
                        0.0,
                        gamma,
                    )
                    .min(f.volume_m3);
                    let extra = (gas.volume_m3 - v_adia).max(0.0);
                    self.acc.h2_j += rho_w * g * extra * speed * dt;
                }
                _ => {}
            }
        }

        // Jet reaction only: the fill's buoyancy already acts through
        // the filling floater's ramped pocket volume.
        if let Some(event) = &self.active_injection {
            total += event.jet_reaction_n(self.tick);
        }
        Ok(total)
    }

    /// Advance phases and positions with the post-integration speed.
    fn advance_floaters(&mut self, dt: f64) -> KppResult<()> {
        let speed = self.drivetrain.chain_speed_mps();
        let h = self.config.water_column_height_m;
        let f_heat = self.config.heat_exchange_fraction;
        let gamma = self.config.constants.gamma_air;
        let shell = self.config.floater_volume_m3;
        let atm = self.config.constants.atmospheric_pressure_pa;
        let next_tick = self.tick + 1;

        let fill = self
            .active_injection
            .as_ref()
            .map(|e| (e.floater_id, e.progress(next_tick), e.end_tick()));

        for i in 0..self.floaters.len() {
            match self.floaters[i].phase() {
                FloaterPhase::EmptyAtBottom => {}

                FloaterPhase::Filling => {
                    let Some((fid, progress, end_tick)) = fill else {
                        continue;
                    };
                    if fid != i {
                        continue;
                    }
                    let floater = &mut self.floaters[i];
                    let gas = floater.internal_gas_mut()?;
                    let v0 = gas.reference_volume_m3();
                    let p0 = gas.reference_pressure_pa();
                    gas.volume_m3 = v0 * progress;
                    if next_tick >= end_tick {
                        floater.finish_filling(p0, v0)?;
                        self.active_injection = None;
                    }
                }

                FloaterPhase::Ascending => {
                    let floater = &mut self.floaters[i];
                    floater.advance_position(speed * dt, h);
                    if floater.position_m() >= h {
                        let gas = floater.begin_venting(self.config.transition_ticks)?;
                        self.acc.vented_energy_j += gas.available_work_j(atm);
                    } else {
                        let p_local = self.env.pressure_at_position(floater.position_m())?;
                        let excess = floater
                            .internal_gas_mut()?
                            .update_at_pressure(p_local, f_heat, gamma, shell);
                        if let Some(excess_m3) = excess {
                            if !self.clamp_warned[i] {
                                self.clamp_warned[i] = true;
                                self.acc.warnings.push(
                                    PhysicalLimitWarning::GasVolumeClamped {
                                        floater_id: i,
                                        tick: self.tick,
                                        requested_m3: shell + excess_m3,
                                        shell_m3: shell,
                                    },
                                );
                            }
                        }
                    }
                }

                FloaterPhase::VentingAtTop => {
                    self.floaters[i].step_venting()?;
                }

                FloaterPhase::Descending => {
                    let floater = &mut self.floaters[i];
                    floater.advance_position(-speed * dt, h);
                    if floater.position_m() <= 0.0 {
                        floater.arrive_at_bottom()?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CycleEngine {
        let mut config = KppConfig::default();
        config.number_of_floaters = 8;
        config.num_cycles = 1;
        CycleEngine::new(config).unwrap()
    }

    #[test]
    fn test_initial_layout_splits_legs() {
        let e = engine();
        let up = e
            .floaters()
            .iter()
            .filter(|f| f.phase() == FloaterPhase::Ascending)
            .count();
        let down = e
            .floaters()
            .iter()
            .filter(|f| f.phase() == FloaterPhase::Descending)
            .count();
        assert_eq!(up, 4);
        assert_eq!(down, 4);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = KppConfig::default();
        config.nanobubble_void_fraction = 0.9;
        assert!(CycleEngine::new(config).is_err());
    }

    #[test]
    fn test_bottom_charge_expands_to_shell_at_surface() {
        let config = KppConfig::default();
        let p_bottom = 101_325.0 + 997.0 * 9.81 * 20.0;
        let v0 = CycleEngine::bottom_charge_volume(&config, p_bottom);
        // Boyle back to atmospheric recovers the shell volume.
        let at_surface = v0 * p_bottom / 101_325.0;
        assert!((at_surface - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_single_cycle_produces_output() {
        let mut e = engine();
        let result = e.run_cycle().unwrap();
        assert!(result.energy_in_j > 0.0, "scheduler must have injected");
        assert!(result.energy_out_j > 0.0, "generator must have produced");
        assert!(result.floater_speed_mps > 0.0);
    }

    #[test]
    fn test_telemetry_grows_with_ticks() {
        let mut e = engine();
        e.run_cycle().unwrap();
        let series = e.time_series();
        assert_eq!(series.t_s.len() as u64, e.tick());
        assert_eq!(series.torque_nm.len(), series.power_w.len());
    }

    #[test]
    fn test_cancellation_truncates_and_flags() {
        let mut e = engine();
        e.cancellation_flag().store(true, Ordering::SeqCst);
        let result = e.run_cycle().unwrap();
        assert!(matches!(
            result.warnings.as_slice(),
            [PhysicalLimitWarning::Cancelled { tick: 0 }]
        ));
        assert_eq!(result.energy_in_j, 0.0);
        assert_eq!(e.tick(), 0);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut e = engine();
        e.run_cycle().unwrap();
        e.reset().unwrap();
        assert_eq!(e.tick(), 0);
        assert_eq!(e.cycles_completed(), 0);
        assert!(e.time_series().t_s.is_empty());
        let fresh = engine();
        assert_eq!(e.floaters(), fresh.floaters());
    }

    #[test]
    fn test_fill_window_adds_only_the_jet_reaction() {
        let mut e = engine();
        // A fresh engine has no EmptyAtBottom floater; step ticks until
        // the scheduler actually starts a fill.
        for _ in 0..10_000 {
            if e.active_injection.is_some() {
                break;
            }
            e.step_tick().unwrap();
        }
        let event = e.active_injection.clone().unwrap();
        let speed = e.drivetrain.chain_speed_mps();
        let dt = e.config.time_step_s;

        let floaters_only: f64 = e
            .floaters
            .iter()
            .map(|f| f.net_force(&e.env, &e.column, speed).unwrap())
            .sum();
        let total = e.aggregate_forces(speed, dt).unwrap();

        let extra = total - floaters_only;
        assert!(
            (extra - event.jet_force_n).abs() < 1e-9,
            "fill window must add the jet reaction only, got extra {extra} N"
        );
        assert!(
            extra < event.buoyancy_pulse_n,
            "pocket buoyancy must not be counted a second time"
        );
    }

    #[test]
    fn test_one_injection_line_at_a_time() {
        let mut e = engine();
        // Walk plenty of ticks; at most one floater may ever be Filling.
        for _ in 0..500 {
            e.step_tick().unwrap();
            let filling = e
                .floaters()
                .iter()
                .filter(|f| f.phase() == FloaterPhase::Filling)
                .count();
            assert!(filling <= 1, "injection lines overlapped");
        }
    }
}
