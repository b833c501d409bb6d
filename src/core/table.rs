use nalgebra::DMatrix;

// ============================================================================
// LAYOUT
// ============================================================================

/// Expected dimensions of a dose-conversion coefficient table.
///
/// The reference table carries 140 energy bins and 34 particle columns. Both
/// counts are runtime values so a table regenerated on a different transport
/// grid cannot silently overflow fixed-size storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub bin_count: usize,
    pub species_count: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            bin_count: 140,
            species_count: 34,
        }
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One row of the energy grid: bin midpoint and width, both in MeV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBin {
    pub midpoint_mev: f64,
    pub width_mev: f64,
}

/// Dose-conversion coefficients indexed by (species, energy bin), plus the
/// energy grid they were tabulated on. Populated once by the loader and
/// read-only for the rest of the run.
#[derive(Debug, Clone)]
pub struct CoefficientTable {
    /// Ascending in energy; ordering is significant for the per-bin passes.
    bins: Vec<EnergyBin>,
    /// pSv·cm² per particle. One row per species, one column per bin.
    coefficients: DMatrix<f64>,
}

impl CoefficientTable {
    pub fn new(bins: Vec<EnergyBin>, coefficients: DMatrix<f64>) -> Result<Self, &'static str> {
        if bins.is_empty() {
            return Err("Coefficient table has no energy bins.");
        }
        if coefficients.nrows() == 0 {
            return Err("Coefficient table has no particle species.");
        }
        if coefficients.ncols() != bins.len() {
            return Err("Coefficient matrix does not match the energy grid.");
        }
        Ok(Self { bins, coefficients })
    }

    pub fn bins(&self) -> &[EnergyBin] {
        &self.bins
    }

    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn species_count(&self) -> usize {
        self.coefficients.nrows()
    }

    /// Dose-conversion coefficient (pSv·cm²/particle) for one grid cell.
    pub fn coefficient(&self, species: usize, bin: usize) -> f64 {
        self.coefficients[(species, bin)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_grid() {
        let bins = vec![EnergyBin {
            midpoint_mev: 1.0,
            width_mev: 0.5,
        }];
        let coefficients = DMatrix::zeros(2, 3);
        assert!(CoefficientTable::new(bins, coefficients).is_err());
    }

    #[test]
    fn rejects_empty_table() {
        assert!(CoefficientTable::new(Vec::new(), DMatrix::zeros(0, 0)).is_err());
    }

    #[test]
    fn indexes_by_species_then_bin() {
        let bins = vec![
            EnergyBin {
                midpoint_mev: 1.0,
                width_mev: 0.5,
            },
            EnergyBin {
                midpoint_mev: 2.0,
                width_mev: 0.5,
            },
        ];
        let mut coefficients = DMatrix::zeros(2, 2);
        coefficients[(1, 0)] = 3.5;
        let table = CoefficientTable::new(bins, coefficients).unwrap();
        assert_eq!(table.species_count(), 2);
        assert_eq!(table.bin_count(), 2);
        assert_eq!(table.coefficient(1, 0), 3.5);
        assert_eq!(table.coefficient(0, 1), 0.0);
    }
}
