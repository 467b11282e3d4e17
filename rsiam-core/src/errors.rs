use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum RSIAMError {
    #[error("{0}")]
    Error(String),
    #[error("Extrapolation is not allowed. Target={0}, {1} interpolation range={2}")]
    ExtrapolationNotAllowed(f64, String, String),
    #[error("Unknown variable '{0}'. Variables must be declared before they are used")]
    UnknownVariable(String),
    #[error("Variable '{0}' has already been declared")]
    DuplicateVariable(String),
    #[error("Index {index} is not valid for variable '{variable}' with domain {domain}")]
    InvalidIndex {
        variable: String,
        index: String,
        domain: String,
    },
    #[error("Unknown region '{0}'")]
    UnknownRegion(String),
    #[error("Missing parameter '{parameter}' for region '{region}'")]
    MissingRegionalParameter { parameter: String, region: String },
    #[error("Invalid value for parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },
    #[error("Wrong shape for '{name}'. Expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        name: String,
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("Exogenous data '{0}' has not been provided")]
    MissingExogenousData(String),
    #[error("Variable '{variable}' is required by {component} but is neither produced nor fixed")]
    MissingExogenousVariable { variable: String, component: String },
    #[error("Variable '{variable}' is produced by both {first} and {second}")]
    DuplicateProducer {
        variable: String,
        first: String,
        second: String,
    },
    #[error("The component graph contains a cycle involving {0}")]
    CyclicDependency(String),
    #[error("Unknown damage functional form '{0}'. Expected one of Linear, Quadratic or Logistic")]
    UnknownDamageForm(String),
    #[error("Constraint '{0}' is not in explicit form (variable == expression)")]
    NotExplicit(String),
    #[error("Constraint '{constraint}' assigns to the fixed variable '{variable}'")]
    AssignsFixedVariable {
        constraint: String,
        variable: String,
    },
    #[error("Constraint '{constraint}' evaluated to a non-finite value")]
    NonFiniteValue { constraint: String },
    #[error("No convergence at step {t} after {iterations} sweeps (max change {max_change:e})")]
    NotConverged {
        t: usize,
        iterations: usize,
        max_change: f64,
    },
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Convenience type for `Result<T, RSIAMError>`.
pub type RSIAMResult<T> = Result<T, RSIAMError>;

impl From<toml::de::Error> for RSIAMError {
    fn from(e: toml::de::Error) -> Self {
        RSIAMError::ConfigError(e.to_string())
    }
}

impl From<RSIAMError> for pyo3::PyErr {
    fn from(e: RSIAMError) -> Self {
        pyo3::exceptions::PyValueError::new_err(e.to_string())
    }
}
