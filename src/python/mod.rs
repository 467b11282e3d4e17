use pyo3::prelude::*;
use pyo3::wrap_pymodule;
use rsiam_components::python::components;
use rsiam_core::python::core;

#[pymodule]
#[pyo3(name = "_lib")]
fn rsiam(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(core))?;
    m.add_wrapped(wrap_pymodule!(components))?;

    set_path(m, "rsiam._lib.core", "core")?;
    set_path(m, "rsiam._lib.components", "components")?;

    Ok(())
}

/// Register a submodule in `sys.modules` so that it can be imported by its dotted path
fn set_path(m: &Bound<'_, PyModule>, path: &str, module: &str) -> PyResult<()> {
    let code = format!(
        "\
import sys
sys.modules['{path}'] = {module}
    "
    );
    m.py().run_bound(&code, None, Some(&m.dict()))
}
