// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Drivetrain
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Sprocket → gearbox → one-way clutch/flywheel → generator chain (H3).
//!
//! The clutch is a freewheel: the chain can push the generator, the
//! generator can never drag the chain backward. Engagement is decided
//! *before* force integration each tick, so locked-inertia changes
//! never happen mid-step.

use kpp_types::config::KppConfig;

/// Velocity tolerance for the kinematic engagement test [rad/s].
const ENGAGE_TOL: f64 = 1e-9;

/// Result of one drivetrain integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrivetrainTick {
    pub electrical_power_w: f64,
    pub clutch_engaged: bool,
}

/// Mechanical/electrical transmission state.
#[derive(Debug, Clone, PartialEq)]
pub struct Drivetrain {
    sprocket_radius_m: f64,
    gear_ratio: f64,
    chain_inertia_kgm2: f64,
    flywheel_inertia_kgm2: f64,
    gearbox_efficiency: f64,
    generator_efficiency: f64,
    clutch_efficiency: f64,
    load_torque_nm: f64,
    friction_torque_nm: f64,
    pub clutch_engaged: bool,
    /// Chain-side (sprocket) angular velocity [rad/s], never negative.
    pub chain_angular_velocity: f64,
    /// Generator-side angular velocity [rad/s], never negative.
    pub generator_angular_velocity: f64,
}

impl Drivetrain {
    /// `chain_mass_kg` is the lumped translating mass riding the
    /// sprocket; its inertia at the sprocket radius is `m·r²`.
    pub fn new(config: &KppConfig, chain_mass_kg: f64) -> Self {
        let omega0 = config.chain_speed_mps / config.sprocket_radius_m;
        Drivetrain {
            sprocket_radius_m: config.sprocket_radius_m,
            gear_ratio: config.gear_ratio,
            chain_inertia_kgm2: chain_mass_kg * config.sprocket_radius_m * config.sprocket_radius_m,
            flywheel_inertia_kgm2: config.flywheel_inertia_kgm2,
            gearbox_efficiency: config.gearbox_efficiency,
            generator_efficiency: config.generator_efficiency,
            clutch_efficiency: config.clutch_efficiency,
            load_torque_nm: config.generator_load_torque_nm,
            friction_torque_nm: config.flywheel_friction_torque_nm,
            clutch_engaged: true,
            chain_angular_velocity: omega0,
            generator_angular_velocity: omega0 * config.gear_ratio,
        }
    }

    /// Linear chain (and floater) speed [m/s].
    pub fn chain_speed_mps(&self) -> f64 {
        self.chain_angular_velocity * self.sprocket_radius_m
    }

    pub fn sprocket_radius_m(&self) -> f64 {
        self.sprocket_radius_m
    }

    pub fn gear_ratio(&self) -> f64 {
        self.gear_ratio
    }

    /// Chain torque at the sprocket from the aggregated floater force.
    pub fn chain_torque_nm(&self, net_force_n: f64) -> f64 {
        net_force_n * self.sprocket_radius_m
    }

    /// Advance one tick under the given chain torque.
    pub fn step(&mut self, torque_chain_nm: f64, dt: f64) -> DrivetrainTick {
        // Clutch decision before integration.
        let kinematically_coupled = self.chain_angular_velocity + ENGAGE_TOL
            >= self.generator_angular_velocity / self.gear_ratio;

        let mut engaged = false;
        if kinematically_coupled {
            // Locked trial step: would the freewheel have to pull the
            // generator side down to keep the lock?
            let resist = (self.load_torque_nm + self.friction_torque_nm) * self.gear_ratio;
            let locked_inertia = self.chain_inertia_kgm2
                + self.flywheel_inertia_kgm2 * self.gear_ratio * self.gear_ratio;
            let alpha = (torque_chain_nm - resist) / locked_inertia;

            let lock_holds = if self.flywheel_inertia_kgm2 > 0.0 {
                // Torque the clutch must transmit at the generator
                // shaft; a pull (negative) releases the freewheel.
                self.flywheel_inertia_kgm2 * alpha * self.gear_ratio
                    + self.load_torque_nm
                    + self.friction_torque_nm
                    >= 0.0
            } else {
                // No flywheel: a decelerating lock releases instantly,
                // the inertia-free generator side just stops.
                alpha >= 0.0
            };

            if lock_holds {
                engaged = true;
                self.chain_angular_velocity =
                    (self.chain_angular_velocity + alpha * dt).max(0.0);
                self.generator_angular_velocity = self.chain_angular_velocity * self.gear_ratio;
            }
        }

        if !engaged {
            // Freewheeling: each side evolves on its own inertia.
            let alpha_chain = torque_chain_nm / self.chain_inertia_kgm2;
            self.chain_angular_velocity =
                (self.chain_angular_velocity + alpha_chain * dt).max(0.0);

            if self.flywheel_inertia_kgm2 > 0.0 {
                let alpha_gen =
                    -(self.load_torque_nm + self.friction_torque_nm) / self.flywheel_inertia_kgm2;
                self.generator_angular_velocity =
                    (self.generator_angular_velocity + alpha_gen * dt).max(0.0);
            } else {
                // No flywheel: nothing sustains the generator side.
                self.generator_angular_velocity = 0.0;
            }
        }

        self.clutch_engaged = engaged;

        // Engaged power flows through the clutch; coasting power comes
        // off the flywheel, on the generator side of it.
        let clutch_factor = if engaged { self.clutch_efficiency } else { 1.0 };
        let electrical_power_w = self.load_torque_nm
            * self.generator_angular_velocity
            * self.gearbox_efficiency
            * self.generator_efficiency
            * clutch_factor;

        DrivetrainTick {
            electrical_power_w,
            clutch_engaged: engaged,
        }
    }
}
