mod cobb_douglas;
pub mod damages;

pub use cobb_douglas::{calc_gross_gdp, calc_utility, CobbDouglas, CobbDouglasParameters};
pub use damages::{Coacch, CoacchParameters};
