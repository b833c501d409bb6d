use crate::core::environment::{EnvironmentModel, EnvironmentalState};
use crate::core::table::EnergyBin;
use crate::physics::sep::SepSpectrum;

// ============================================================================
// SPECIAL-CASE CELLS OF THE REFERENCE TABLE
// ============================================================================

/// Particle column carrying photons in the reference table; the 511 keV
/// annihilation line is injected into this column.
pub const ANNIHILATION_SPECIES: usize = 33;

/// Zero-based index of the energy bin containing 0.511 MeV (data row 78 of
/// the reference table).
pub const ANNIHILATION_BIN: usize = 77;

/// Particle column of protons, the only species SEP events contribute to.
pub const SEP_PROTON_SPECIES: usize = 2;

/// Vertical cutoff rigidity (GV) below which SEP protons penetrate the
/// geomagnetic field. Locations with a stiffer cutoff see no SEP dose.
pub const SEP_RIGIDITY_ADMISSION_GV: f64 = 0.4445;

// ============================================================================
// ASSEMBLER
// ============================================================================

/// Builds the total per-(species, bin) flux: the base model spectrum, plus
/// the annihilation-line point injection, plus the geomagnetically gated SEP
/// contribution.
pub struct FluxAssembler<'a, M: EnvironmentModel + ?Sized> {
    model: &'a M,
    environment: EnvironmentalState,
    spectral_shape: f64,
    sep: SepSpectrum,
}

impl<'a, M: EnvironmentModel + ?Sized> FluxAssembler<'a, M> {
    pub fn new(
        model: &'a M,
        environment: EnvironmentalState,
        spectral_shape: f64,
        sep_reference_flux: f64,
    ) -> Self {
        Self {
            model,
            environment,
            spectral_shape,
            sep: SepSpectrum::new(sep_reference_flux),
        }
    }

    /// SEP protons only reach locations where the cutoff rigidity is low
    /// (polar latitudes); elsewhere the field deflects them back to space.
    pub fn sep_admitted(&self) -> bool {
        self.environment.rigidity_cutoff_gv < SEP_RIGIDITY_ADMISSION_GV
    }

    /// SEP differential flux at this bin's midpoint. Evaluated once per bin;
    /// the same value feeds the proton column whenever the gate admits it.
    pub fn sep_flux(&self, bin: &EnergyBin) -> f64 {
        self.sep
            .flux_at(bin.midpoint_mev, self.environment.atmospheric_depth)
    }

    /// Total differential flux for one (species, bin) cell.
    pub fn total_flux(&self, species: usize, bin_index: usize, bin: &EnergyBin, sep_flux: f64) -> f64 {
        let mut flux = self.model.base_flux(
            species,
            &self.environment,
            bin.midpoint_mev,
            self.spectral_shape,
        );

        if species == ANNIHILATION_SPECIES && bin_index == ANNIHILATION_BIN {
            // The line model yields a total flux; spreading it over this one
            // bin turns it back into a flux density.
            flux += self.model.line_flux_511(&self.environment) / bin.width_mev;
        }

        if species == SEP_PROTON_SPECIES && self.sep_admitted() {
            flux += sep_flux;
        }

        flux
    }
}
