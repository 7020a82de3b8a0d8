//! # Pokedex Core
//!
//! Core types, errors, and traits shared by the Pokedex crates.
//!
//! - **Types**: catalog records decoded from PokeAPI and the user's [`Pokedex`]
//! - **Errors**: the [`PokedexError`] hierarchy
//! - **Constants**: API endpoints and default tuning values
//! - **Traits**: the [`ResponseCache`] and [`CatalogSource`] seams
//!
//! ## Example
//!
//! ```rust
//! use pokedex_core::{Pokedex, Pokemon};
//!
//! let mut pokedex = Pokedex::default();
//! assert!(pokedex.add(Pokemon { name: "pikachu".into(), ..Default::default() }));
//! assert!(pokedex.get("pikachu").is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{PokedexError, Result};
pub use traits::*;
pub use types::*;
