//! Catch rolls for the Pokedex client.
//!
//! A throw succeeds with even odds for any Pokemon that has a base
//! experience; Pokemon without one never escape.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod roll;

pub use roll::{attempt_catch, CatchOutcome};
