//! GOES SGPS proton-channel reduction.
//!
//! During a solar-energetic-particle event the reference flux fed to the
//! spectrum synthesizer is the ≥100 MeV integral proton flux. The GOES SGPS
//! instrument reports that range as four differential channels plus one
//! integral tail channel; this module folds them into the single number the
//! pipeline consumes.

/// SGPS differential channel bounds above 100 MeV, in MeV: P8B, P8C, P9, P10.
pub const SGPS_CHANNEL_BOUNDS_MEV: [(f64, f64); 4] =
    [(99.0, 118.0), (118.0, 150.0), (150.0, 275.0), (275.0, 500.0)];

/// SGPS differential fluxes are reported per keV; channel widths are MeV.
const KEV_PER_MEV: f64 = 1.0e3;

/// The CLI accepts the reference flux as a daily fluence.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Integrates the four ≥100 MeV differential channels and adds the P11
/// (>500 MeV) integral channel.
///
/// `differential_per_kev` is one flux per channel in particles/cm²/s/keV, in
/// [`SGPS_CHANNEL_BOUNDS_MEV`] order; `integral_tail` is particles/cm²/s.
pub fn flux_above_100_mev(differential_per_kev: &[f64; 4], integral_tail: f64) -> f64 {
    SGPS_CHANNEL_BOUNDS_MEV
        .iter()
        .zip(differential_per_kev)
        .map(|((low, high), flux)| flux * KEV_PER_MEV * (high - low))
        .sum::<f64>()
        + integral_tail
}

/// Converts a daily fluence (particles/cm²/day) into a mean rate
/// (particles/cm²/s).
pub fn daily_fluence_to_rate(fluence_per_day: f64) -> f64 {
    fluence_per_day / SECONDS_PER_DAY
}
