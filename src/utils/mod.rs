//! Module for helpers shared by the simulation and its tests
pub mod test_helper;
pub mod uom_macros;
