mod coacch;
mod functional_form;
mod table;

pub use coacch::{Coacch, CoacchParameters};
pub use functional_form::{logistic, DamageForm, DamageFunctionParameters};
pub use table::{CoacchTable, TableValue, DEFAULT_QUANTILE};
