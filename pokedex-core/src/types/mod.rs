//! Domain types for the Pokedex client.
//!
//! - [`LocationAreaPage`]: one page of the location-area listing
//! - [`LocationArea`]: a single area and the Pokemon encountered there
//! - [`Pokemon`]: a single Pokemon record
//! - [`Pokedex`]: the user's collection of caught Pokemon

mod catalog;
mod pokedex;

pub use catalog::*;
pub use pokedex::*;
