//! First-order built-in environment model.
//!
//! Production deployments of this calculator plug a full heliosphere /
//! magnetosphere / atmosphere code into the [`EnvironmentModel`] seam. This
//! module is a self-contained analytic stand-in so the binary produces
//! sensible numbers out of the box: a sinusoidal solar cycle, a Störmer
//! dipole cutoff, an ISA barometric depth profile and a force-field-modulated
//! power-law spectrum. It is tuned for plausibility at aviation altitudes,
//! not a transport calculation.

use crate::core::environment::{EnvironmentModel, EnvironmentalState};
use crate::math::calendar::CalendarDate;
use crate::physics::flux::{ANNIHILATION_SPECIES, SEP_PROTON_SPECIES};
use anyhow::{bail, Result};

// ============================================================================
// SOLAR CYCLE
// ============================================================================

/// Solar minimum anchoring the cycle phase (December 2019).
const SOLAR_MINIMUM: CalendarDate = CalendarDate {
    year: 2019,
    month: 12,
    day: 15,
};

/// Mean length of the solar activity cycle, days.
const SOLAR_CYCLE_DAYS: f64 = 11.0 * 365.25;

/// Mean force-field potential over the cycle, MV.
const MODULATION_MEAN_MV: f64 = 650.0;

/// Half the minimum-to-maximum swing of the potential, MV.
const MODULATION_AMPLITUDE_MV: f64 = 350.0;

// ============================================================================
// GEOMAGNETIC FIELD
// ============================================================================

/// Centered-dipole north pole, degrees (IGRF-13, epoch 2020).
const DIPOLE_POLE_LAT_DEG: f64 = 80.7;
const DIPOLE_POLE_LON_DEG: f64 = -72.7;

/// Störmer vertical cutoff coefficient at the Earth's surface, GV.
const STORMER_COEFFICIENT_GV: f64 = 14.9;

// ============================================================================
// ATMOSPHERE (ISA)
// ============================================================================

/// ISA sea-level pressure, hPa.
const SEA_LEVEL_PRESSURE_HPA: f64 = 1013.25;

/// ISA sea-level temperature, K.
const SEA_LEVEL_TEMPERATURE_K: f64 = 288.15;

/// Tropospheric lapse rate, K/km.
const TROPOSPHERE_LAPSE_K_PER_KM: f64 = 6.5;

/// Tropopause altitude, km.
const TROPOPAUSE_KM: f64 = 11.0;

/// Exponent of the tropospheric pressure power law (g·M / R·L).
const TROPOSPHERE_EXPONENT: f64 = 5.2561;

/// ISA pressure at the tropopause, hPa.
const TROPOPAUSE_PRESSURE_HPA: f64 = 226.32;

/// Scale height of the isothermal lower stratosphere, km.
const STRATOSPHERE_SCALE_KM: f64 = 6.3416;

/// Base of the warming stratosphere branch, km / hPa / K.
const UPPER_STRATOSPHERE_BASE_KM: f64 = 20.0;
const UPPER_STRATOSPHERE_BASE_HPA: f64 = 54.749;
const UPPER_STRATOSPHERE_BASE_K: f64 = 216.65;

/// Warming rate above 20 km, K/km, and the matching pressure exponent.
const UPPER_STRATOSPHERE_LAPSE_K_PER_KM: f64 = 1.0;
const UPPER_STRATOSPHERE_EXPONENT: f64 = 34.163;

/// Ceiling of the barometric profile, km.
const ATMOSPHERE_CEILING_KM: f64 = 32.0;

/// Column overburden per unit pressure: 1 hPa weighs ~1.02 g/cm².
const DEPTH_PER_HPA: f64 = 1.019_72;

/// Mild thinning of the polar column relative to the ISA mid-latitude one.
const POLAR_THINNING: f64 = 0.015;

// ============================================================================
// PARTICLE SPECTRUM
// ============================================================================

/// Proton rest mass, MeV.
const PROTON_REST_MASS_MEV: f64 = 938.272;

/// Unmodulated (local interstellar) spectrum normalization.
const LIS_NORMALIZATION: f64 = 1.7e4;

/// Spectral index of the local interstellar spectrum.
const LIS_INDEX: f64 = 2.7;

/// Nucleon attenuation length in air, g/cm².
const NUCLEON_ATTENUATION_G_CM2: f64 = 120.0;

/// Sharpness of the geomagnetic admission gate.
const GEOMAGNETIC_GATE_SHARPNESS: f64 = 6.0;

/// Pivot energy (MeV) around which the spectral-shape parameter tilts the
/// spectrum, and the shape value at which the tilt is neutral.
const SHAPE_PIVOT_MEV: f64 = 100.0;
const SHAPE_NEUTRAL: f64 = -1.5;

/// Leading weight and fall-off ratio of the heavy-ion columns.
const HEAVY_ION_LEAD: f64 = 0.12;
const HEAVY_ION_RATIO: f64 = 0.62;

/// Depth of the annihilation-line production maximum, g/cm², and the line
/// flux at that maximum under mean modulation, particles/cm²/s.
const LINE_PRODUCTION_DEPTH_G_CM2: f64 = 90.0;
const LINE_FLUX_SCALE: f64 = 0.35;

// ============================================================================
// MODEL
// ============================================================================

/// The built-in analytic environment model.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardEnvironment;

impl EnvironmentModel for StandardEnvironment {
    fn solar_modulation(&self, date: &CalendarDate) -> Result<f64> {
        if !date.is_valid() {
            bail!("{date} is not a valid calendar date");
        }
        let elapsed = (date.day_number() - SOLAR_MINIMUM.day_number()) as f64;
        let phase = std::f64::consts::TAU * elapsed / SOLAR_CYCLE_DAYS;
        Ok(MODULATION_MEAN_MV - MODULATION_AMPLITUDE_MV * phase.cos())
    }

    fn rigidity_cutoff(&self, latitude_deg: f64, longitude_deg: f64) -> Result<f64> {
        if !(-90.0..=90.0).contains(&latitude_deg) {
            bail!("latitude {latitude_deg}° is outside [-90°, 90°]");
        }
        let magnetic_latitude = geomagnetic_latitude(latitude_deg, longitude_deg);
        Ok(STORMER_COEFFICIENT_GV * magnetic_latitude.cos().powi(4))
    }

    fn atmospheric_depth(&self, altitude_km: f64, latitude_deg: f64) -> Result<f64> {
        let pressure_hpa = barometric_pressure_hpa(altitude_km)?;
        let column = pressure_hpa * DEPTH_PER_HPA;
        Ok(column * (1.0 - POLAR_THINNING * latitude_deg.to_radians().sin().powi(2)))
    }

    fn base_flux(
        &self,
        species: usize,
        env: &EnvironmentalState,
        energy_mev: f64,
        spectral_shape: f64,
    ) -> f64 {
        let weight = species_weight(species);
        if weight == 0.0 || energy_mev <= 0.0 {
            return 0.0;
        }

        // Force-field modulation: lift the energy by the potential, rescale
        // by the ratio of relativistic momenta squared.
        let phi = env.solar_modulation.max(0.0);
        let lifted = energy_mev + phi;
        let interstellar = LIS_NORMALIZATION * (lifted + PROTON_REST_MASS_MEV).powf(-LIS_INDEX);
        let momentum_ratio = (energy_mev * (energy_mev + 2.0 * PROTON_REST_MASS_MEV))
            / (lifted * (lifted + 2.0 * PROTON_REST_MASS_MEV));

        // Primaries below the cutoff-equivalent energy are bent back to space.
        let cutoff_mev = rigidity_to_kinetic_mev(env.rigidity_cutoff_gv);
        let gate = energy_mev.powf(GEOMAGNETIC_GATE_SHARPNESS)
            / (energy_mev.powf(GEOMAGNETIC_GATE_SHARPNESS)
                + cutoff_mev.powf(GEOMAGNETIC_GATE_SHARPNESS));

        let attenuation = (-env.atmospheric_depth / NUCLEON_ATTENUATION_G_CM2).exp();

        // Caller-controlled tilt, neutral at the default shape value.
        let tilt = (energy_mev / SHAPE_PIVOT_MEV).powf(spectral_shape - SHAPE_NEUTRAL);

        weight * interstellar * momentum_ratio * gate * attenuation * tilt
    }

    fn line_flux_511(&self, env: &EnvironmentalState) -> f64 {
        // Production peaks near the Pfotzer maximum and dies off toward both
        // the top of the atmosphere and the ground.
        let x = env.atmospheric_depth / LINE_PRODUCTION_DEPTH_G_CM2;
        let profile = x * (1.0 - x).exp();
        // More line flux where the cutoff admits more primaries, and when the
        // heliosphere is quiet.
        let access = (1.0 + env.rigidity_cutoff_gv).powf(-0.8);
        let quiet = MODULATION_MEAN_MV / env.solar_modulation.max(1.0);
        LINE_FLUX_SCALE * profile * access * quiet
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Latitude relative to the centered dipole axis, radians.
fn geomagnetic_latitude(latitude_deg: f64, longitude_deg: f64) -> f64 {
    let lat = latitude_deg.to_radians();
    let pole_lat = DIPOLE_POLE_LAT_DEG.to_radians();
    let dlon = (longitude_deg - DIPOLE_POLE_LON_DEG).to_radians();
    // sin(magnetic latitude) = cos(angular distance to the dipole pole)
    let sin_magnetic = lat.sin() * pole_lat.sin() + lat.cos() * pole_lat.cos() * dlon.cos();
    sin_magnetic.clamp(-1.0, 1.0).asin()
}

/// ISA pressure profile: power-law troposphere, isothermal lower stratosphere,
/// slowly warming upper stratosphere.
fn barometric_pressure_hpa(altitude_km: f64) -> Result<f64> {
    if altitude_km > ATMOSPHERE_CEILING_KM {
        bail!(
            "altitude {altitude_km:.1} km is above the {ATMOSPHERE_CEILING_KM:.0} km model ceiling"
        );
    }
    let pressure = if altitude_km <= TROPOPAUSE_KM {
        let t = SEA_LEVEL_TEMPERATURE_K - TROPOSPHERE_LAPSE_K_PER_KM * altitude_km;
        SEA_LEVEL_PRESSURE_HPA * (t / SEA_LEVEL_TEMPERATURE_K).powf(TROPOSPHERE_EXPONENT)
    } else if altitude_km <= UPPER_STRATOSPHERE_BASE_KM {
        TROPOPAUSE_PRESSURE_HPA * (-(altitude_km - TROPOPAUSE_KM) / STRATOSPHERE_SCALE_KM).exp()
    } else {
        let t = UPPER_STRATOSPHERE_BASE_K
            + UPPER_STRATOSPHERE_LAPSE_K_PER_KM * (altitude_km - UPPER_STRATOSPHERE_BASE_KM);
        UPPER_STRATOSPHERE_BASE_HPA
            * (UPPER_STRATOSPHERE_BASE_K / t).powf(UPPER_STRATOSPHERE_EXPONENT)
    };
    Ok(pressure)
}

/// Kinetic energy (MeV) of a proton whose rigidity matches the cutoff.
fn rigidity_to_kinetic_mev(rigidity_gv: f64) -> f64 {
    let pc = rigidity_gv * 1.0e3;
    (pc * pc + PROTON_REST_MASS_MEV * PROTON_REST_MASS_MEV).sqrt() - PROTON_REST_MASS_MEV
}

/// Relative abundance of each particle column in the reference table. The
/// leading secondaries dominate the aviation-altitude field; the heavy-ion
/// columns fall off geometrically.
fn species_weight(species: usize) -> f64 {
    match species {
        0 => 0.9,
        1 => 0.35,
        SEP_PROTON_SPECIES => 1.0,
        3 => 0.25,
        4 => 0.2,
        ANNIHILATION_SPECIES => 0.15,
        s => HEAVY_ION_LEAD * HEAVY_ION_RATIO.powi(s as i32 - 4),
    }
}
