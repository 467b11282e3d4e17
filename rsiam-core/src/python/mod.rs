use crate::component::{Component, RequirementDefinition, RequirementType};
use crate::errors::RSIAMError;
use crate::evaluate::FixedPointEvaluator;
use crate::model::{Model, ModelBuilder};
use crate::standard_variables::find_standard_variable;
use crate::timeseries::{FloatValue, RegionalTrajectory, Time, TimeAxis};
use numpy::{IntoPyArray, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::sync::Arc;

/// Create a component builder that can be used by python to instantiate components created Rust.
///
/// The component type must provide
/// `from_parameters(parameters) -> RSIAMResult<Self>`.
#[macro_export]
macro_rules! create_component_builder {
    ($builder_name:ident, $rust_component:ty, $component_parameters:ty) => {
        #[pyclass]
        pub struct $builder_name {
            parameters: $component_parameters,
        }

        #[pymethods]
        impl $builder_name {
            #[staticmethod]
            pub fn from_parameters(parameters: Bound<PyAny>) -> PyResult<Self> {
                use pyo3::exceptions::PyValueError;

                let parameters = pythonize::depythonize::<$component_parameters>(&parameters);
                match parameters {
                    Ok(parameters) => Ok(Self { parameters }),
                    Err(e) => Err(PyValueError::new_err(format!("{}", e))),
                }
            }

            pub fn build(&self) -> PyResult<$crate::python::PyRustComponent> {
                let component = <$rust_component>::from_parameters(self.parameters.clone())?;
                Ok($crate::python::PyRustComponent(std::sync::Arc::new(
                    component,
                )))
            }
        }
    };
}

/// Python wrapper for a Component defined in Rust
///
/// Instances of ['PyRustComponent'] are created via an associated ComponentBuilder for each
/// component of interest.
#[derive(Debug, Clone)]
#[pyclass]
#[pyo3(name = "RustComponent")]
pub struct PyRustComponent(pub Arc<dyn Component>);

#[pymethods]
impl PyRustComponent {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        self.0.definitions()
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.0)
    }
}

#[pyclass]
#[pyo3(name = "ModelBuilder")]
pub struct PyModelBuilder(pub ModelBuilder);

#[pymethods]
impl PyModelBuilder {
    #[new]
    fn new() -> Self {
        Self(ModelBuilder::new())
    }

    fn with_time_axis(
        mut self_: PyRefMut<'_, Self>,
        start: Time,
        end: Time,
        dt: Time,
    ) -> PyResult<PyRefMut<'_, Self>> {
        let time_axis = TimeAxis::from_bounds(start, end, dt)?;
        self_.0.with_time_axis(time_axis);
        Ok(self_)
    }

    fn with_regions(mut self_: PyRefMut<'_, Self>, regions: Vec<String>) -> PyRefMut<'_, Self> {
        self_.0.with_regions(regions);
        self_
    }

    /// Supply a regional trajectory with shape `(len(years), n_regions)`
    fn with_exogenous<'py>(
        mut self_: PyRefMut<'py, Self>,
        name: String,
        years: PyReadonlyArray1<'py, Time>,
        values: PyReadonlyArray2<'py, FloatValue>,
    ) -> PyResult<PyRefMut<'py, Self>> {
        let trajectory = RegionalTrajectory::new(
            years.as_array().to_owned(),
            values.as_array().to_owned(),
        )?;
        self_.0.with_exogenous(&name, trajectory);
        Ok(self_)
    }

    /// Fix one of the standard variables to the provided `(time, region)` values
    fn with_fixed_variable<'py>(
        mut self_: PyRefMut<'py, Self>,
        name: String,
        values: PyReadonlyArray2<'py, FloatValue>,
    ) -> PyResult<PyRefMut<'py, Self>> {
        let definition = find_standard_variable(&name)
            .ok_or_else(|| RSIAMError::UnknownVariable(name.clone()))?;
        self_
            .0
            .with_fixed_variable(*definition, values.as_array().to_owned());
        Ok(self_)
    }

    fn with_t0(mut self_: PyRefMut<'_, Self>, t0: FloatValue) -> PyRefMut<'_, Self> {
        self_.0.with_t0(t0);
        self_
    }

    fn with_component(
        mut self_: PyRefMut<'_, Self>,
        component: PyRustComponent,
    ) -> PyRefMut<'_, Self> {
        self_.0.with_component(component.0);
        self_
    }

    fn build(&self) -> PyResult<PyModel> {
        Ok(PyModel(self.0.build()?))
    }
}

#[pyclass]
#[pyo3(name = "Model")]
pub struct PyModel(pub Model);

#[pymethods]
impl PyModel {
    fn constraint_names(&self) -> Vec<String> {
        self.0.constraint_names()
    }

    fn component_names(&self) -> Vec<String> {
        self.0.component_names()
    }

    /// Every generated equation as `label: lhs == rhs`
    fn equations(&self) -> Vec<String> {
        self.0.constraints().iter().map(|c| c.to_string()).collect()
    }

    fn as_dot(&self) -> String {
        format!("{:?}", self.0.as_dot())
    }

    /// Evaluate the model, returning a dict of `(time, region)` arrays keyed by variable name
    #[pyo3(signature = (max_iterations=1000, tolerance=1e-12))]
    fn evaluate<'py>(
        &self,
        py: Python<'py>,
        max_iterations: usize,
        tolerance: FloatValue,
    ) -> PyResult<Bound<'py, PyDict>> {
        let evaluator = FixedPointEvaluator::new(max_iterations, tolerance);
        let values = self.0.evaluate(&evaluator)?;

        let result = PyDict::new_bound(py);
        for (name, array) in values.into_inner() {
            result.set_item(name, array.into_pyarray_bound(py))?;
        }
        Ok(result)
    }
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyModelBuilder>()?;
    m.add_class::<PyModel>()?;
    m.add_class::<PyRustComponent>()?;
    m.add_class::<RequirementDefinition>()?;
    m.add_class::<RequirementType>()?;
    Ok(())
}
