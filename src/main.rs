use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use cosmic_dose_calculator::{
    estimate_dose_rate, io::goes, parser, CalendarDate, ExposureConfig, StandardEnvironment,
    TableLayout,
};

#[derive(Parser)]
#[command(author, version, about = "Cosmic-Ray Dose Rate Calculator")]
struct Cli {
    /// Calendar year of the evaluation.
    #[arg(default_value_t = 2025)]
    year: i32,

    /// Calendar month (1-12).
    #[arg(default_value_t = 1)]
    month: u32,

    /// Day of month.
    #[arg(default_value_t = 1)]
    day: u32,

    /// Latitude in decimal degrees, north positive.
    #[arg(default_value_t = 37.5, allow_hyphen_values = true)]
    latitude: f64,

    /// Longitude in decimal degrees, east positive.
    #[arg(default_value_t = 127.0, allow_hyphen_values = true)]
    longitude: f64,

    /// Barometric altitude in feet.
    #[arg(default_value_t = 35000.0)]
    altitude: f64,

    /// Spectral-shape parameter of the base flux model.
    #[arg(default_value_t = -1.5, allow_hyphen_values = true)]
    g_param: f64,

    /// ≥100 MeV SEP reference proton fluence, particles/cm²/day.
    /// Leave at zero outside SEP events.
    #[arg(default_value_t = 0.0)]
    proton_flux: f64,

    /// Dose-conversion coefficient table.
    #[arg(long, default_value = "dcc/ICRP116.inp")]
    table: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    log::info!("Loading coefficient table {:?}...", cli.table);
    let layout = TableLayout::default();
    let table = parser::load_coefficients(&cli.table, &layout)
        .with_context(|| format!("Could not load coefficient table {:?}", cli.table))?;
    log::info!(
        "-> {} energy bins x {} particle species.",
        table.bin_count(),
        table.species_count()
    );

    let config = ExposureConfig {
        date: CalendarDate {
            year: cli.year,
            month: cli.month,
            day: cli.day,
        },
        latitude_deg: cli.latitude,
        longitude_deg: cli.longitude,
        altitude_ft: cli.altitude,
        spectral_shape: cli.g_param,
        // The CLI takes a daily fluence; the synthesizer wants a mean rate.
        sep_reference_flux: goes::daily_fluence_to_rate(cli.proton_flux),
    };

    let estimate = estimate_dose_rate(&table, &config, &StandardEnvironment)?;
    log::info!(
        "Environment: s={:.1}, r={:.3} GV, d={:.1} g/cm²",
        estimate.environment.solar_modulation,
        estimate.environment.rigidity_cutoff_gv,
        estimate.environment.atmospheric_depth
    );

    // The sole output contract: one number, µSv/h, newline.
    println!("{}", estimate.dose_rate_usv_h);
    Ok(())
}
