//! PokeAPI client for the Pokedex.
//!
//! Every lookup consults a [`pokedex_core::ResponseCache`] keyed by request
//! URL before going to the network, and stores raw response bodies on a miss.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;

pub use client::{ClientConfig, PokeApiClient};
