//! Catalog records decoded from PokeAPI responses.
//!
//! Only the fields the client reads are modeled. Unknown fields are ignored
//! and missing ones fall back to their defaults, so partial or newer API
//! payloads still decode.

use serde::{Deserialize, Serialize};

/// A name plus the API URL of the full record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name (e.g. "canalave-city-area")
    pub name: String,
    /// URL of the full resource
    #[serde(default)]
    pub url: String,
}

/// One page of the paginated location-area listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationAreaPage {
    /// Total number of location areas
    pub count: u64,
    /// URL of the next page, absent on the last page
    pub next: Option<String>,
    /// URL of the previous page, absent on the first page
    pub previous: Option<String>,
    /// Areas on this page
    pub results: Vec<NamedResource>,
}

/// A location area and the Pokemon that can be encountered there.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationArea {
    /// Numeric identifier
    pub id: u32,
    /// Area name
    pub name: String,
    /// Pokemon encountered in this area
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

impl LocationArea {
    /// Names of the Pokemon encountered here, in API order.
    pub fn pokemon_names(&self) -> impl Iterator<Item = &str> {
        self.pokemon_encounters
            .iter()
            .map(|encounter| encounter.pokemon.name.as_str())
    }
}

/// A single encounter entry of a location area.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonEncounter {
    /// The Pokemon that can be encountered
    pub pokemon: NamedResource,
}

/// A Pokemon record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pokemon {
    /// Numeric identifier
    pub id: u32,
    /// Pokemon name
    pub name: String,
    /// Base experience gained for defeating it; null for some forms
    pub base_experience: Option<u32>,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    /// Base stats
    pub stats: Vec<PokemonStat>,
    /// Types, ordered by slot
    pub types: Vec<PokemonType>,
}

impl Pokemon {
    /// Names of this Pokemon's types, ordered by slot.
    pub fn type_names(&self) -> Vec<&str> {
        let mut types: Vec<&PokemonType> = self.types.iter().collect();
        types.sort_by_key(|t| t.slot);
        types.into_iter().map(|t| t.kind.name.as_str()).collect()
    }
}

/// A base stat of a Pokemon.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    /// Base value
    pub base_stat: u32,
    /// Effort points gained for defeating this Pokemon
    #[serde(default)]
    pub effort: u32,
    /// Which stat this is
    pub stat: NamedResource,
}

/// A type slot of a Pokemon.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonType {
    /// Slot order (1 = primary)
    #[serde(default)]
    pub slot: u8,
    /// The type itself
    #[serde(rename = "type")]
    pub kind: NamedResource,
}
