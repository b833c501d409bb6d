use crate::math::calendar::CalendarDate;
use anyhow::Result;

/// The three environmental scalars every flux evaluation depends on.
/// Resolved once per run, before any bin is processed, and constant
/// throughout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentalState {
    /// Solar-cycle modulation parameter (heliospheric suppression state).
    pub solar_modulation: f64,
    /// Geomagnetic vertical cutoff rigidity in GV.
    pub rigidity_cutoff_gv: f64,
    /// Atmospheric overburden above the point of interest, g/cm².
    pub atmospheric_depth: f64,
}

/// The heliosphere/magnetosphere/atmosphere collaborator.
///
/// The dose pipeline only consumes these five functions; it never looks
/// inside the model. Swapping in a stub or an alternative model changes the
/// numbers, not the integration.
pub trait EnvironmentModel {
    /// Solar-cycle modulation parameter for a calendar date. Rejects dates
    /// outside the model's domain (e.g. impossible calendar days).
    fn solar_modulation(&self, date: &CalendarDate) -> Result<f64>;

    /// Geomagnetic vertical cutoff rigidity (GV) at a location.
    fn rigidity_cutoff(&self, latitude_deg: f64, longitude_deg: f64) -> Result<f64>;

    /// Atmospheric overburden (g/cm²) at an altitude and latitude.
    fn atmospheric_depth(&self, altitude_km: f64, latitude_deg: f64) -> Result<f64>;

    /// Differential flux (particles/cm²/s/MeV) of one species at one energy.
    /// Contracted to return a finite, non-negative value for physically
    /// sensible inputs.
    fn base_flux(
        &self,
        species: usize,
        env: &EnvironmentalState,
        energy_mev: f64,
        spectral_shape: f64,
    ) -> f64;

    /// Total flux (particles/cm²/s) of the isotropic 511 keV annihilation
    /// line. The assembler spreads it over a single energy bin.
    fn line_flux_511(&self, env: &EnvironmentalState) -> f64;

    /// Evaluates the three scalars once and packs them up. Collaborator-side
    /// validation failures propagate; nothing is silently defaulted.
    fn resolve(
        &self,
        date: &CalendarDate,
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_km: f64,
    ) -> Result<EnvironmentalState> {
        Ok(EnvironmentalState {
            solar_modulation: self.solar_modulation(date)?,
            rigidity_cutoff_gv: self.rigidity_cutoff(latitude_deg, longitude_deg)?,
            atmospheric_depth: self.atmospheric_depth(altitude_km, latitude_deg)?,
        })
    }
}
