/// The synthesizer is defined only above this energy; below it the SEP
/// contribution is identically zero.
pub const SEP_MIN_ENERGY_MEV: f64 = 100.0;

/// Fixed differential spectral index of the event spectrum.
pub const SEP_SPECTRAL_INDEX: f64 = 1.8;

/// Normalization pivot: the power-law integral above this energy equals the
/// reference flux.
pub const SEP_PIVOT_ENERGY_MEV: f64 = 50.0;

/// Exponential attenuation scale, in the same unit as the atmospheric depth
/// (g/cm²).
pub const SEP_ATTENUATION_DEPTH: f64 = 50.0;

/// Closed-form solar-energetic-particle proton spectrum.
///
/// A single power law with a fixed index, pinned to a measured integral
/// reference flux and attenuated exponentially with atmospheric depth. A
/// first-order shielding approximation, not a transport calculation; adequate
/// for the coarse dose estimate this pipeline targets.
#[derive(Debug, Clone, Copy)]
pub struct SepSpectrum {
    /// Power-law normalization, precomputed from the reference flux.
    normalization: f64,
}

impl SepSpectrum {
    /// `reference_flux` is the rate-normalized ≥100 MeV integral proton flux
    /// (particles/cm²/s); zero outside SEP events.
    pub fn new(reference_flux: f64) -> Self {
        let normalization = reference_flux
            * (SEP_SPECTRAL_INDEX - 1.0)
            * SEP_PIVOT_ENERGY_MEV.powf(SEP_SPECTRAL_INDEX - 1.0);
        Self { normalization }
    }

    /// Differential proton flux (particles/cm²/s/MeV) at `energy_mev` under
    /// `depth` g/cm² of atmosphere.
    pub fn flux_at(&self, energy_mev: f64, depth: f64) -> f64 {
        if energy_mev < SEP_MIN_ENERGY_MEV {
            return 0.0;
        }
        let top_of_atmosphere = self.normalization * energy_mev.powf(-SEP_SPECTRAL_INDEX);
        top_of_atmosphere * (-depth / SEP_ATTENUATION_DEPTH).exp()
    }
}
