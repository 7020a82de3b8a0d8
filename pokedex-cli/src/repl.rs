//! Interactive read-eval-print loop.
//!
//! The loop reads one line at a time, dispatches it to a command handler and
//! keeps going until `exit` or end of input. Handler errors are printed and
//! never end the session.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::*;
use rand::Rng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use pokedex_cache::ExpiringCache;
use pokedex_catch::{attempt_catch, CatchOutcome};
use pokedex_core::types::{LocationAreaPage, Pokedex};
use pokedex_core::{CatalogSource, PokedexError};

use crate::commands::{clean_input, Command, COMMANDS};

/// Prompt printed before every line of input.
pub const PROMPT: &str = "Pokedex > ";

/// Whether the loop keeps reading after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Leave the loop
    Exit,
}

/// Paging position and caught Pokemon for one REPL session.
#[derive(Debug, Default)]
pub struct Session {
    next: Option<String>,
    previous: Option<String>,
    paged: bool,
    pokedex: Pokedex,
}

impl Session {
    fn record_page(&mut self, page: &LocationAreaPage) {
        self.next = page.next.clone();
        self.previous = page.previous.clone();
        self.paged = true;
    }

    /// Caught Pokemon so far.
    pub fn pokedex(&self) -> &Pokedex {
        &self.pokedex
    }
}

/// The REPL, generic over where catalog records come from and the catch RNG.
pub struct Repl<S, R> {
    source: S,
    cache: Arc<ExpiringCache>,
    rng: R,
    session: Session,
}

impl<S: CatalogSource, R: Rng> Repl<S, R> {
    /// Creates a REPL with an empty session.
    ///
    /// `cache` is only read for the `cache` command; lookups go through `source`.
    pub fn new(source: S, cache: Arc<ExpiringCache>, rng: R) -> Self {
        Self {
            source,
            cache,
            rng,
            session: Session::default(),
        }
    }

    /// Returns the current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until `exit` or end of input.
    pub async fn run<I, W>(&mut self, input: I, out: &mut W) -> Result<()>
    where
        I: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        loop {
            write!(out, "{}", PROMPT.bold())?;
            out.flush()?;

            let Some(line) = lines.next_line().await.context("Failed to read input")? else {
                writeln!(out)?;
                self.execute(Command::Exit, out).await?;
                return Ok(());
            };

            let words = clean_input(&line);
            if words.is_empty() {
                continue;
            }

            let command = match Command::parse(&words) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "{}", e.to_string().yellow())?;
                    continue;
                }
            };

            match self.execute(command, out).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(e) => {
                    writeln!(out, "{} {:#}", "Error:".red().bold(), e)?;
                    let recoverable = e
                        .downcast_ref::<PokedexError>()
                        .is_some_and(PokedexError::is_recoverable);
                    if recoverable {
                        writeln!(out, "{}", "This may be temporary, try again.".dimmed())?;
                    }
                }
            }
        }
    }

    /// Executes a single command.
    pub async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        debug!(?command, "Executing command");

        match command {
            Command::Help => self.help(out)?,
            Command::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                return Ok(Flow::Exit);
            }
            Command::Map => self.map(out).await?,
            Command::MapBack => self.map_back(out).await?,
            Command::Explore(area) => self.explore(&area, out).await?,
            Command::Catch(name) => self.catch(&name, out).await?,
            Command::Inspect(name) => self.inspect(&name, out)?,
            Command::Pokedex => self.list_pokedex(out)?,
            Command::Cache => self.cache_stats(out)?,
        }
        Ok(Flow::Continue)
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", "Welcome to the Pokedex!".bold())?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for info in COMMANDS {
            writeln!(out, "{}: {}", info.usage.cyan(), info.description)?;
        }
        writeln!(out)?;
        Ok(())
    }

    async fn map<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if self.session.paged && self.session.next.is_none() {
            bail!("you're on the last page");
        }
        let url = self.session.next.clone();
        let page = self.source.location_areas(url.as_deref()).await?;
        self.show_page(&page, out)
    }

    async fn map_back<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let Some(url) = self.session.previous.clone() else {
            bail!("you're on the first page");
        };
        let page = self.source.location_areas(Some(&url)).await?;
        self.show_page(&page, out)
    }

    fn show_page<W: Write>(&mut self, page: &LocationAreaPage, out: &mut W) -> Result<()> {
        self.session.record_page(page);
        for area in &page.results {
            writeln!(out, "{}", area.name)?;
        }
        Ok(())
    }

    async fn explore<W: Write>(&mut self, area: &str, out: &mut W) -> Result<()> {
        writeln!(out, "Exploring {}...", area.cyan())?;
        let area = self.source.location_area(area).await?;

        if area.pokemon_encounters.is_empty() {
            writeln!(out, "No Pokemon found in this area")?;
            return Ok(());
        }
        writeln!(out, "Found Pokemon:")?;
        for name in area.pokemon_names() {
            writeln!(out, " - {name}")?;
        }
        Ok(())
    }

    async fn catch<W: Write>(&mut self, name: &str, out: &mut W) -> Result<()> {
        writeln!(out, "Throwing a Pokeball at {}...", name.cyan())?;
        let pokemon = self.source.pokemon(name).await?;

        let base_experience = pokemon.base_experience.unwrap_or(0);
        match attempt_catch(base_experience, &mut self.rng) {
            CatchOutcome::Caught => {
                writeln!(out, "{} was caught!", pokemon.name.green().bold())?;
                writeln!(out, "You may now inspect it with the inspect command.")?;
                self.session.pokedex.add(pokemon);
            }
            CatchOutcome::Escaped => {
                writeln!(out, "{} escaped!", pokemon.name.yellow())?;
            }
        }
        Ok(())
    }

    fn inspect<W: Write>(&self, name: &str, out: &mut W) -> Result<()> {
        let Some(pokemon) = self.session.pokedex.get(name) else {
            writeln!(out, "you have not caught that pokemon")?;
            return Ok(());
        };

        writeln!(out, "Name: {}", pokemon.name.bold())?;
        writeln!(out, "Height: {}", pokemon.height)?;
        writeln!(out, "Weight: {}", pokemon.weight)?;
        writeln!(out, "Stats:")?;
        for stat in &pokemon.stats {
            writeln!(out, "  - {}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(out, "Types:")?;
        for kind in pokemon.type_names() {
            writeln!(out, "  - {kind}")?;
        }
        Ok(())
    }

    fn list_pokedex<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.session.pokedex.is_empty() {
            writeln!(out, "Your Pokedex is empty. Go catch some Pokemon!")?;
            return Ok(());
        }
        writeln!(out, "Your Pokedex:")?;
        for name in self.session.pokedex.names() {
            writeln!(out, " - {name}")?;
        }
        Ok(())
    }

    fn cache_stats<W: Write>(&self, out: &mut W) -> Result<()> {
        let stats = self.cache.stats();
        writeln!(out, "{}", "Response cache".bold())?;
        writeln!(out, "  Entries: {}", stats.total_entries)?;
        writeln!(out, "  Fresh:   {}", stats.total_entries - stats.expired_entries)?;
        writeln!(out, "  Expired: {}", stats.expired_entries)?;
        writeln!(out, "  TTL:     {}s", stats.ttl.as_secs_f64())?;
        Ok(())
    }
}
