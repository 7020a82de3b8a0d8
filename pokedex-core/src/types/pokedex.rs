//! The user's collection of caught Pokemon.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::Pokemon;

/// Caught Pokemon keyed by name.
///
/// Ordered by name so listings are stable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Pokedex {
    entries: BTreeMap<String, Pokemon>,
}

impl Pokedex {
    /// Adds a Pokemon, replacing an earlier catch of the same name.
    ///
    /// Returns true if the Pokemon was not in the Pokedex before.
    pub fn add(&mut self, pokemon: Pokemon) -> bool {
        self.entries.insert(pokemon.name.clone(), pokemon).is_none()
    }

    /// Looks up a caught Pokemon by name.
    pub fn get(&self, name: &str) -> Option<&Pokemon> {
        self.entries.get(name)
    }

    /// Names of all caught Pokemon, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns true if nothing has been caught yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
