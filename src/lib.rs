// ============================================================================
// MODULE DECLARATIONS
// ============================================================================
pub mod core;
pub mod io;
pub mod math;
pub mod model;
pub mod physics;

// ============================================================================
// RE-EXPORTS (Public API)
// ============================================================================
pub use crate::core::environment::{EnvironmentModel, EnvironmentalState};
pub use crate::core::table::{CoefficientTable, EnergyBin, TableLayout};
pub use crate::io::parser;
pub use crate::math::calendar::CalendarDate;
pub use crate::model::standard::StandardEnvironment;
pub use crate::physics::dose::integrate_dose_rate;
pub use crate::physics::flux::FluxAssembler;
pub use crate::physics::sep::SepSpectrum;

use anyhow::{Context, Result};

/// Aviation altitudes arrive in feet; the atmosphere model wants km.
pub const FEET_TO_KM: f64 = 0.3048e-3;

// ============================================================================
// HIGH-LEVEL INTERFACE
// ============================================================================

/// Inputs of one dose evaluation.
#[derive(Debug, Clone)]
pub struct ExposureConfig {
    pub date: CalendarDate,
    /// Decimal degrees, north positive.
    pub latitude_deg: f64,
    /// Decimal degrees, east positive.
    pub longitude_deg: f64,
    /// Barometric altitude in feet.
    pub altitude_ft: f64,
    /// Spectral-shape parameter forwarded to the base flux model.
    pub spectral_shape: f64,
    /// Rate-normalized ≥100 MeV SEP reference proton flux, particles/cm²/s.
    /// Zero outside SEP events.
    pub sep_reference_flux: f64,
}

/// One evaluation's result: the dose rate plus the environment it was
/// computed under.
#[derive(Debug, Clone, Copy)]
pub struct DoseEstimate {
    pub dose_rate_usv_h: f64,
    pub environment: EnvironmentalState,
}

/// The master pipeline: resolve the environment once, assemble per-bin
/// fluxes, fold them with the coefficient table.
pub fn estimate_dose_rate<M: EnvironmentModel>(
    table: &CoefficientTable,
    config: &ExposureConfig,
    model: &M,
) -> Result<DoseEstimate> {
    let altitude_km = config.altitude_ft * FEET_TO_KM;

    let environment = model
        .resolve(
            &config.date,
            config.latitude_deg,
            config.longitude_deg,
            altitude_km,
        )
        .context("Environment resolution failed")?;
    log::debug!(
        "Resolved environment for {} at ({:.3}°, {:.3}°, {:.3} km): {:?}",
        config.date,
        config.latitude_deg,
        config.longitude_deg,
        altitude_km,
        environment
    );

    let assembler = FluxAssembler::new(
        model,
        environment,
        config.spectral_shape,
        config.sep_reference_flux,
    );
    let dose_rate_usv_h = integrate_dose_rate(table, &assembler);

    Ok(DoseEstimate {
        dose_rate_usv_h,
        environment,
    })
}
