// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — KPP Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Drivetrain transmission, per-tick telemetry, the cycle orchestrator,
//! and the narrow external API.

pub mod api;
pub mod drivetrain;
pub mod engine;
pub mod telemetry;
