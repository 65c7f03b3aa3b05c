// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — External API
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The four-call surface external consumers see: create an engine,
//! run cycles, read telemetry, reset. Everything else stays internal.

use crate::engine::CycleEngine;
use kpp_types::config::KppConfig;
use kpp_types::error::KppResult;
use kpp_types::state::{CycleResult, TimeSeries};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Opaque handle around a configured engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    engine: CycleEngine,
}

impl EngineHandle {
    /// Cooperative cancellation flag for the current run. Hand the
    /// clone to another thread; the engine checks it once per tick.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        self.engine.cancellation_flag()
    }

    pub fn cycles_completed(&self) -> usize {
        self.engine.cycles_completed()
    }
}

/// Validate the configuration and build a ready-to-run engine.
/// Rejects invalid configs with every offending field listed.
pub fn create_engine(config: KppConfig) -> KppResult<EngineHandle> {
    Ok(EngineHandle {
        engine: CycleEngine::new(config)?,
    })
}

/// Advance the simulation by one full cycle and return its aggregate
/// result. Deterministic: identical configs give identical results.
pub fn run_cycle(handle: &mut EngineHandle) -> KppResult<CycleResult> {
    handle.engine.run_cycle()
}

/// Snapshot of the per-tick telemetry accumulated so far. Read-only;
/// never mutates the engine.
pub fn get_time_series(handle: &EngineHandle) -> TimeSeries {
    handle.engine.time_series()
}

/// Return the engine to its exact initial state (same configuration,
/// cleared telemetry and counters). Idempotent.
pub fn reset(handle: &mut EngineHandle) -> KppResult<()> {
    handle.engine.reset()
}
