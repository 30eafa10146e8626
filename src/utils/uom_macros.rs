#![warn(missing_docs)]
//! Module for uom macros that facilitate the creation of wavelengths and other single length values
/// helper macro to create the units
#[macro_export]
macro_rules! uom_unit_creator {
    ($unit:ident, $unit_type:ident, $val1:expr) => {
        $unit_type::new::<$unit>($val1)
    };
}

///macro to create a Length in micrometer
#[macro_export]
macro_rules! micrometer {
    ($x:expr) => {{
        use uom::si::{f64::Length, length::micrometer};
        $crate::uom_unit_creator![micrometer, Length, $x]
    }};
}
///macro to create a Length in nanometer
#[macro_export]
macro_rules! nanometer {
    ($x:expr) => {{
        use uom::si::{f64::Length, length::nanometer};
        $crate::uom_unit_creator![nanometer, Length, $x]
    }};
}
