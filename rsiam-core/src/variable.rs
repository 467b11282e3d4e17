//! Variable definitions and indexing.
//!
//! Every quantity solved for by the model is a variable declared in the shared
//! [`ModelContext`](crate::context::ModelContext). A variable is defined over a [`Domain`]
//! (some combination of time steps and regions) and individual elements are addressed with
//! an [`Index`].
//!
//! Variables used across components are defined once as constants using the
//! [`define_variable!`](crate::define_variable) macro so that producers and consumers agree
//! on names, units and domains. See [`standard_variables`](crate::standard_variables).

use crate::expr::Expr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The set of indices a variable is defined over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    /// A single value
    Scalar,
    /// One value per time step
    Time,
    /// One value per region
    Region,
    /// One value per time step and region
    TimeRegion,
}

impl Domain {
    /// Shape of the storage for this domain as `(time, region)`.
    ///
    /// Dimensions that the domain does not cover have length 1.
    pub fn shape(&self, n_time: usize, n_regions: usize) -> (usize, usize) {
        match self {
            Domain::Scalar => (1, 1),
            Domain::Time => (n_time, 1),
            Domain::Region => (1, n_regions),
            Domain::TimeRegion => (n_time, n_regions),
        }
    }

    /// Enumerate every index of this domain
    pub fn indices(&self, n_time: usize, n_regions: usize) -> Vec<Index> {
        match self {
            Domain::Scalar => vec![Index::Scalar],
            Domain::Time => (0..n_time).map(Index::Time).collect(),
            Domain::Region => (0..n_regions).map(Index::Region).collect(),
            Domain::TimeRegion => (0..n_time)
                .flat_map(|t| (0..n_regions).map(move |r| Index::TimeRegion(t, r)))
                .collect(),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Scalar => write!(f, "Scalar"),
            Domain::Time => write!(f, "Time"),
            Domain::Region => write!(f, "Region"),
            Domain::TimeRegion => write!(f, "TimeRegion"),
        }
    }
}

/// Position of a single element of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Index {
    Scalar,
    Time(usize),
    Region(usize),
    TimeRegion(usize, usize),
}

impl Index {
    pub fn domain(&self) -> Domain {
        match self {
            Index::Scalar => Domain::Scalar,
            Index::Time(_) => Domain::Time,
            Index::Region(_) => Domain::Region,
            Index::TimeRegion(_, _) => Domain::TimeRegion,
        }
    }

    /// Time step of this index, if it has one
    pub fn time(&self) -> Option<usize> {
        match self {
            Index::Time(t) | Index::TimeRegion(t, _) => Some(*t),
            Index::Scalar | Index::Region(_) => None,
        }
    }

    /// Region of this index, if it has one
    pub fn region(&self) -> Option<usize> {
        match self {
            Index::Region(r) | Index::TimeRegion(_, r) => Some(*r),
            Index::Scalar | Index::Time(_) => None,
        }
    }

    /// Position in `(time, region)` storage, see [`Domain::shape`]
    pub fn position(&self) -> (usize, usize) {
        (self.time().unwrap_or(0), self.region().unwrap_or(0))
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Scalar => Ok(()),
            Index::Time(t) => write!(f, "[{}]", t),
            Index::Region(r) => write!(f, "[{}]", r),
            Index::TimeRegion(t, r) => write!(f, "[{},{}]", t, r),
        }
    }
}

/// Reference to a single element of a variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarRef {
    pub name: String,
    pub index: Index,
}

impl VarRef {
    pub fn new(name: impl Into<String>, index: Index) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.index)
    }
}

/// Definition of a model variable.
///
/// Definitions are `const` so they can be shared between the component that produces a
/// variable and the components that consume it.
///
/// # Example
///
/// ```rust
/// use rsiam_core::variable::{Domain, Index, VariableDefinition};
///
/// const CAPITAL: VariableDefinition =
///     VariableDefinition::new("capital_stock", "trillion USD", Domain::TimeRegion, "Capital");
///
/// let expr = CAPITAL.at(1, 0);
/// assert_eq!(expr.to_string(), "capital_stock[1,0]");
/// assert_eq!(CAPITAL.reference(Index::TimeRegion(1, 0)).to_string(), "capital_stock[1,0]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableDefinition {
    /// Unique identifier for the variable (e.g., "capital_stock")
    pub name: &'static str,
    /// Canonical unit for the variable
    pub unit: &'static str,
    pub domain: Domain,
    /// Human-readable description
    pub description: &'static str,
}

impl VariableDefinition {
    pub const fn new(
        name: &'static str,
        unit: &'static str,
        domain: Domain,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            unit,
            domain,
            description,
        }
    }

    pub fn reference(&self, index: Index) -> VarRef {
        VarRef::new(self.name, index)
    }

    /// Expression for element `[t, r]` of a time and region indexed variable
    pub fn at(&self, t: usize, r: usize) -> Expr {
        Expr::Var(self.reference(Index::TimeRegion(t, r)))
    }

    /// Expression for element `[t]` of a time indexed variable
    pub fn at_time(&self, t: usize) -> Expr {
        Expr::Var(self.reference(Index::Time(t)))
    }

    /// Expression for element `[r]` of a region indexed variable
    pub fn at_region(&self, r: usize) -> Expr {
        Expr::Var(self.reference(Index::Region(r)))
    }

    pub fn scalar(&self) -> Expr {
        Expr::Var(self.reference(Index::Scalar))
    }
}

/// Define a variable as a constant [`VariableDefinition`].
///
/// ```rust
/// use rsiam_core::define_variable;
/// use rsiam_core::variable::Domain;
///
/// define_variable!(
///     VAR_EXAMPLE,
///     name = "example",
///     unit = "1",
///     domain = Domain::Time,
///     description = "An example variable",
/// );
///
/// assert_eq!(VAR_EXAMPLE.name, "example");
/// ```
#[macro_export]
macro_rules! define_variable {
    (
        $ident:ident,
        name = $name:expr,
        unit = $unit:expr,
        domain = $domain:expr,
        description = $description:expr $(,)?
    ) => {
        pub const $ident: $crate::variable::VariableDefinition =
            $crate::variable::VariableDefinition::new($name, $unit, $domain, $description);
    };
}
