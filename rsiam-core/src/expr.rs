//! Symbolic expressions.
//!
//! Components describe the model as a set of equations between [`Expr`] trees rather than
//! computing values directly. The resulting equations are handed to a solver which determines
//! all variable values jointly.
//!
//! Expressions are built with the usual arithmetic operators, mixing [`Expr`] and plain
//! [`FloatValue`]s:
//!
//! ```rust
//! use rsiam_core::expr::{Expr, Real};
//! use rsiam_core::variable::{Index, VarRef};
//! use std::collections::HashMap;
//!
//! let k = Expr::Var(VarRef::new("capital_stock", Index::TimeRegion(0, 0)));
//! let output = 2.0 * k.clone().powf(Expr::from(0.5));
//!
//! let values = HashMap::from([(VarRef::new("capital_stock", Index::TimeRegion(0, 0)), 16.0)]);
//! assert_eq!(output.evaluate(&values).unwrap(), 8.0);
//! ```
//!
//! Formulae that should be usable both symbolically and numerically are written once against
//! the [`Real`] trait, which is implemented for both [`Expr`] and [`FloatValue`].

use crate::errors::{RSIAMError, RSIAMResult};
use crate::timeseries::FloatValue;
use crate::variable::VarRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Arithmetic needed to express the model equations.
///
/// Implemented for [`FloatValue`] (numeric evaluation) and [`Expr`] (symbolic construction).
pub trait Real:
    Clone
    + From<FloatValue>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Add<FloatValue, Output = Self>
    + Sub<FloatValue, Output = Self>
    + Mul<FloatValue, Output = Self>
    + Div<FloatValue, Output = Self>
{
    fn powf(self, exponent: Self) -> Self;
    fn exp(self) -> Self;
    fn tanh(self) -> Self;
}

impl Real for FloatValue {
    fn powf(self, exponent: Self) -> Self {
        FloatValue::powf(self, exponent)
    }

    fn exp(self) -> Self {
        FloatValue::exp(self)
    }

    fn tanh(self) -> Self {
        FloatValue::tanh(self)
    }
}

/// Source of variable values used when evaluating an expression
pub trait VariableLookup {
    fn lookup(&self, var: &VarRef) -> RSIAMResult<FloatValue>;
}

impl VariableLookup for HashMap<VarRef, FloatValue> {
    fn lookup(&self, var: &VarRef) -> RSIAMResult<FloatValue> {
        self.get(var)
            .copied()
            .ok_or_else(|| RSIAMError::UnknownVariable(var.to_string()))
    }
}

/// A symbolic expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Const(FloatValue),
    Var(VarRef),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Exp(Box<Expr>),
    Tanh(Box<Expr>),
}

impl Expr {
    /// Build the equality constraint `self == rhs`
    pub fn equals(self, rhs: impl Into<Expr>) -> Equation {
        Equation {
            lhs: self,
            rhs: rhs.into(),
        }
    }

    /// Evaluate the expression using the provided variable values
    pub fn evaluate(&self, values: &impl VariableLookup) -> RSIAMResult<FloatValue> {
        Ok(match self {
            Expr::Const(v) => *v,
            Expr::Var(var) => values.lookup(var)?,
            Expr::Neg(a) => -a.evaluate(values)?,
            Expr::Add(a, b) => a.evaluate(values)? + b.evaluate(values)?,
            Expr::Sub(a, b) => a.evaluate(values)? - b.evaluate(values)?,
            Expr::Mul(a, b) => a.evaluate(values)? * b.evaluate(values)?,
            Expr::Div(a, b) => a.evaluate(values)? / b.evaluate(values)?,
            Expr::Pow(a, b) => a.evaluate(values)?.powf(b.evaluate(values)?),
            Expr::Exp(a) => a.evaluate(values)?.exp(),
            Expr::Tanh(a) => a.evaluate(values)?.tanh(),
        })
    }

    /// All variable references in the expression, in order of appearance
    pub fn variables(&self) -> Vec<&VarRef> {
        let mut found = Vec::new();
        self.collect_variables(&mut found);
        found
    }

    fn collect_variables<'a>(&'a self, found: &mut Vec<&'a VarRef>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(var) => found.push(var),
            Expr::Neg(a) | Expr::Exp(a) | Expr::Tanh(a) => a.collect_variables(found),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => {
                a.collect_variables(found);
                b.collect_variables(found);
            }
        }
    }

    /// The value of the expression if it does not depend on any variable
    pub fn as_constant(&self) -> Option<FloatValue> {
        match self {
            Expr::Const(v) => Some(*v),
            _ => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) | Expr::Div(..) => 2,
            Expr::Neg(..) => 3,
            Expr::Const(v) if *v < 0.0 => 3,
            Expr::Pow(..) => 4,
            Expr::Const(_) | Expr::Var(_) | Expr::Exp(_) | Expr::Tanh(_) => 5,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parenthesise: bool) -> fmt::Result {
        if parenthesise {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.precedence();
        match self {
            Expr::Const(v) => write!(f, "{}", v),
            Expr::Var(var) => write!(f, "{}", var),
            Expr::Neg(a) => {
                write!(f, "-")?;
                a.fmt_operand(f, a.precedence() <= p)
            }
            Expr::Exp(a) => write!(f, "exp({})", a),
            Expr::Tanh(a) => write!(f, "tanh({})", a),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                let op = match self {
                    Expr::Add(..) => "+",
                    Expr::Sub(..) => "-",
                    Expr::Mul(..) => "*",
                    _ => "/",
                };
                // Right operands of non-associative operators bind tighter
                let strict_right = matches!(self, Expr::Sub(..) | Expr::Div(..));
                a.fmt_operand(f, a.precedence() < p)?;
                write!(f, " {} ", op)?;
                b.fmt_operand(f, b.precedence() < p || (strict_right && b.precedence() == p))
            }
            Expr::Pow(a, b) => {
                a.fmt_operand(f, a.precedence() <= p)?;
                write!(f, "**")?;
                b.fmt_operand(f, b.precedence() < p)
            }
        }
    }
}

impl From<FloatValue> for Expr {
    fn from(value: FloatValue) -> Self {
        Expr::Const(value)
    }
}

impl From<VarRef> for Expr {
    fn from(var: VarRef) -> Self {
        Expr::Var(var)
    }
}

impl Real for Expr {
    fn powf(self, exponent: Self) -> Self {
        match (self, exponent) {
            (Expr::Const(a), Expr::Const(b)) => Expr::Const(a.powf(b)),
            (a, b) => Expr::Pow(Box::new(a), Box::new(b)),
        }
    }

    fn exp(self) -> Self {
        match self {
            Expr::Const(a) => Expr::Const(a.exp()),
            a => Expr::Exp(Box::new(a)),
        }
    }

    fn tanh(self) -> Self {
        match self {
            Expr::Const(a) => Expr::Const(a.tanh()),
            a => Expr::Tanh(Box::new(a)),
        }
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        match self {
            Expr::Const(a) => Expr::Const(-a),
            a => Expr::Neg(Box::new(a)),
        }
    }
}

// Constants are folded eagerly so that parameter-only subexpressions stay numbers
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $variant:ident, $op:tt) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                match (self, rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a $op b),
                    (a, b) => Expr::$variant(Box::new(a), Box::new(b)),
                }
            }
        }

        impl $trait<FloatValue> for Expr {
            type Output = Expr;

            fn $method(self, rhs: FloatValue) -> Expr {
                self.$method(Expr::Const(rhs))
            }
        }

        impl $trait<Expr> for FloatValue {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::Const(self).$method(rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, Add, +);
impl_binary_op!(Sub, sub, Sub, -);
impl_binary_op!(Mul, mul, Mul, *);
impl_binary_op!(Div, div, Div, /);

/// An equality constraint `lhs == rhs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    /// `lhs - rhs` evaluated at the provided values
    pub fn residual(&self, values: &impl VariableLookup) -> RSIAMResult<FloatValue> {
        Ok(self.lhs.evaluate(values)? - self.rhs.evaluate(values)?)
    }

    /// The variable on the left hand side if the equation has the form `var == expr`
    pub fn explicit_variable(&self) -> Option<&VarRef> {
        match &self.lhs {
            Expr::Var(var) => Some(var),
            _ => None,
        }
    }

    pub fn variables(&self) -> Vec<&VarRef> {
        let mut found = self.lhs.variables();
        found.extend(self.rhs.variables());
        found
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.lhs, self.rhs)
    }
}
