//! REPL command table and input parsing.

use anyhow::{bail, Result};

/// A parsed REPL command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    MapBack,
    Explore(String),
    Catch(String),
    Inspect(String),
    Pokedex,
    Cache,
}

/// Name, usage and description of a command, for `help`.
pub struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "help",
        usage: "help",
        description: "Displays a help message",
    },
    CommandInfo {
        name: "exit",
        usage: "exit",
        description: "Exit the Pokedex",
    },
    CommandInfo {
        name: "map",
        usage: "map",
        description: "Show the next 20 location areas",
    },
    CommandInfo {
        name: "mapb",
        usage: "mapb",
        description: "Show the previous 20 location areas",
    },
    CommandInfo {
        name: "explore",
        usage: "explore <LOCATION_AREA>",
        description: "List the Pokemon found in a location area",
    },
    CommandInfo {
        name: "catch",
        usage: "catch <POKEMON>",
        description: "Throw a Pokeball and try to add a Pokemon to your Pokedex",
    },
    CommandInfo {
        name: "inspect",
        usage: "inspect <POKEMON>",
        description: "Show name, height, weight, stats and types of a caught Pokemon",
    },
    CommandInfo {
        name: "pokedex",
        usage: "pokedex",
        description: "List every Pokemon you have caught",
    },
    CommandInfo {
        name: "cache",
        usage: "cache",
        description: "Show response cache statistics",
    },
];

/// Trims, lowercases and splits a line into words.
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

impl Command {
    /// Parses cleaned input words; the first word is the command name.
    pub fn parse(words: &[String]) -> Result<Self> {
        let Some((name, args)) = words.split_first() else {
            bail!("Unknown command");
        };
        let arg = args.first().cloned();

        let command = match name.as_str() {
            "help" => Command::Help,
            "exit" => Command::Exit,
            "map" => Command::Map,
            "mapb" => Command::MapBack,
            "explore" => Command::Explore(required(arg, "explore", "a location area name")?),
            "catch" => Command::Catch(required(arg, "catch", "a Pokemon name")?),
            "inspect" => Command::Inspect(required(arg, "inspect", "a Pokemon name")?),
            "pokedex" => Command::Pokedex,
            "cache" => Command::Cache,
            _ => bail!("Unknown command"),
        };
        Ok(command)
    }
}

fn required(arg: Option<String>, command: &str, what: &str) -> Result<String> {
    match arg {
        Some(arg) => Ok(arg),
        None => bail!("{command} requires {what}"),
    }
}
