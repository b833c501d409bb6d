use crate::core::environment::EnvironmentModel;
use crate::core::table::CoefficientTable;
use crate::physics::flux::FluxAssembler;

/// Accumulation runs in pSv/s; the reported rate is µSv/h.
pub const PSV_PER_S_TO_USV_PER_H: f64 = 3600.0 * 1.0e-6;

/// Folds the assembled flux with the dose-conversion coefficients.
///
/// Bins run in ascending energy order, species in column order within each
/// bin, so repeated runs over the same table are bit-identical. Every
/// contribution is `flux × coefficient × width`, all non-negative for
/// physically valid inputs; there is no cancellation in this model.
pub fn integrate_dose_rate<M: EnvironmentModel + ?Sized>(
    table: &CoefficientTable,
    assembler: &FluxAssembler<'_, M>,
) -> f64 {
    let mut rate_psv_s = 0.0;

    for (ie, bin) in table.bins().iter().enumerate() {
        let sep_flux = assembler.sep_flux(bin);
        for ip in 0..table.species_count() {
            let flux = assembler.total_flux(ip, ie, bin, sep_flux);
            rate_psv_s += flux * table.coefficient(ip, ie) * bin.width_mev;
        }
    }

    rate_psv_s * PSV_PER_S_TO_USV_PER_H
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::environment::EnvironmentalState;
    use crate::core::table::EnergyBin;
    use crate::math::calendar::CalendarDate;
    use crate::physics::flux::SEP_PROTON_SPECIES;
    use crate::physics::sep::SepSpectrum;
    use anyhow::Result;
    use nalgebra::DMatrix;

    struct FlatModel {
        base: f64,
    }

    impl EnvironmentModel for FlatModel {
        fn solar_modulation(&self, _date: &CalendarDate) -> Result<f64> {
            Ok(0.0)
        }
        fn rigidity_cutoff(&self, _lat: f64, _lon: f64) -> Result<f64> {
            Ok(0.0)
        }
        fn atmospheric_depth(&self, _alt_km: f64, _lat: f64) -> Result<f64> {
            Ok(0.0)
        }
        fn base_flux(&self, _species: usize, _env: &EnvironmentalState, _e: f64, _g: f64) -> f64 {
            self.base
        }
        fn line_flux_511(&self, _env: &EnvironmentalState) -> f64 {
            0.0
        }
    }

    fn state(rigidity_cutoff_gv: f64, atmospheric_depth: f64) -> EnvironmentalState {
        EnvironmentalState {
            solar_modulation: 400.0,
            rigidity_cutoff_gv,
            atmospheric_depth,
        }
    }

    fn single_cell_table(midpoint_mev: f64, width_mev: f64, coefficient: f64) -> CoefficientTable {
        let bins = vec![EnergyBin {
            midpoint_mev,
            width_mev,
        }];
        CoefficientTable::new(bins, DMatrix::from_element(1, 1, coefficient)).unwrap()
    }

    #[test]
    fn single_cell_closed_form() {
        // flux 2.0 × coefficient 1.0 × width 1.0 → 2 pSv/s → 0.0072 µSv/h.
        let table = single_cell_table(10.0, 1.0, 1.0);
        let model = FlatModel { base: 2.0 };
        let assembler = FluxAssembler::new(&model, state(10.0, 0.0), -1.5, 0.0);
        let dose = integrate_dose_rate(&table, &assembler);
        assert!((dose - 0.0072).abs() < 1e-15);
    }

    #[test]
    fn sep_event_adds_exactly_its_weighted_contribution() {
        // Three species so the proton column exists; one 2 MeV wide bin at
        // 200 MeV, above the SEP energy floor.
        let bins = vec![EnergyBin {
            midpoint_mev: 200.0,
            width_mev: 2.0,
        }];
        let coefficients = DMatrix::from_row_slice(3, 1, &[1.0, 0.5, 2.0]);
        let table = CoefficientTable::new(bins, coefficients).unwrap();
        let model = FlatModel { base: 1.0 };

        let quiet = FluxAssembler::new(&model, state(0.2, 30.0), -1.5, 0.0);
        let event = FluxAssembler::new(&model, state(0.2, 30.0), -1.5, 5.0);

        let quiet_dose = integrate_dose_rate(&table, &quiet);
        let event_dose = integrate_dose_rate(&table, &event);

        let sep_flux = SepSpectrum::new(5.0).flux_at(200.0, 30.0);
        let proton_coefficient = table.coefficient(SEP_PROTON_SPECIES, 0);
        let expected_boost = sep_flux * proton_coefficient * 2.0 * PSV_PER_S_TO_USV_PER_H;

        assert!(expected_boost > 0.0);
        assert!((event_dose - quiet_dose - expected_boost).abs() < 1e-15);
    }

    #[test]
    fn non_negative_for_non_negative_inputs() {
        let table = single_cell_table(1.0, 0.5, 7.3);
        let model = FlatModel { base: 0.0 };
        let assembler = FluxAssembler::new(&model, state(5.0, 100.0), -1.5, 0.0);
        assert!(integrate_dose_rate(&table, &assembler) >= 0.0);
    }
}
