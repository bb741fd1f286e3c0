//! Parallel evaluation of many cells.
//!
//! Each cell carries its own result: one failing cell never aborts the batch.

use crate::engine::{PropertyBundle, PropertyEngine, PropertyService};
use crate::error::PropertyResult;
use crate::oracle::RegionOracle;
use crate::state::SpecEnthalpy;
use rayon::prelude::*;
use sp_core::units::{Pressure, Temperature};
use tracing::debug;

impl<O: RegionOracle> PropertyEngine<O> {
    /// Evaluate (p, T) cells in parallel; results keep the input order.
    pub fn evaluate_pt_batch(
        &self,
        cells: &[(Pressure, Temperature)],
    ) -> Vec<PropertyResult<PropertyBundle>> {
        debug!(cells = cells.len(), "evaluating (p, T) batch");
        cells
            .par_iter()
            .map(|&(p, t)| self.evaluate_pt(p, t))
            .collect()
    }

    /// Evaluate (p, h) cells in parallel; results keep the input order.
    pub fn evaluate_ph_batch(
        &self,
        cells: &[(Pressure, SpecEnthalpy)],
    ) -> Vec<PropertyResult<PropertyBundle>> {
        debug!(cells = cells.len(), "evaluating (p, h) batch");
        cells
            .par_iter()
            .map(|&(p, h)| self.evaluate_ph(p, h))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sp_core::units::{k, pa};

    #[test]
    fn batch_preserves_order() {
        let engine = PropertyEngine::new();
        let cells: Vec<_> = (0..32)
            .map(|i| (pa(1.0e6), k(300.0 + 10.0 * f64::from(i))))
            .collect();
        let results = engine.evaluate_pt_batch(&cells);
        assert_eq!(results.len(), cells.len());
        for (cell, result) in cells.iter().zip(&results) {
            let bundle = result.as_ref().unwrap();
            assert_eq!(bundle.t, cell.1);
            assert_eq!(*bundle, engine.evaluate_pt(cell.0, cell.1).unwrap());
        }
    }

    #[test]
    fn failing_cell_stays_local() {
        let engine = PropertyEngine::new();
        let cells = [
            (pa(1.0e5), 1.0e5),
            (pa(1.0e5), f64::NAN),
            (pa(1.0e5), 3.0e6),
        ];
        let results = engine.evaluate_ph_batch(&cells);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
