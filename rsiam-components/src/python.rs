use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::{pymodule, Bound, PyResult};
use rsiam_core::create_component_builder;

use crate::components::damages::{CoacchTable, DEFAULT_QUANTILE};
use crate::components::{Coacch, CoacchParameters, CobbDouglas, CobbDouglasParameters};

create_component_builder!(CobbDouglasBuilder, CobbDouglas, CobbDouglasParameters);
create_component_builder!(CoacchBuilder, Coacch, CoacchParameters);

/// Select the COACCH parameters from a calibration table
///
/// `table` maps region names to rows of `{column: value}`. The result can be passed to
/// `CoacchBuilder.from_parameters`.
#[pyfunction]
#[pyo3(signature = (table, quantile=DEFAULT_QUANTILE, slr_with_adaptation=true))]
fn coacch_parameters_from_table<'py>(
    table: Bound<'py, PyAny>,
    quantile: f64,
    slr_with_adaptation: bool,
) -> PyResult<Bound<'py, PyAny>> {
    let rows: CoacchTable =
        pythonize::depythonize(&table).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let parameters = rows.select(quantile, slr_with_adaptation)?;
    pythonize::pythonize(table.py(), &parameters).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
pub fn components(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<CobbDouglasBuilder>()?;
    m.add_class::<CoacchBuilder>()?;
    m.add_function(wrap_pyfunction!(coacch_parameters_from_table, m)?)?;
    Ok(())
}
