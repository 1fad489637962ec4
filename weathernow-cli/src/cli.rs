use std::sync::Arc;

use anyhow::{Result, bail, ensure};
use clap::{ArgAction, Parser, Subcommand};
use weathernow_core::{Config, LookupStatus, OpenMeteoClient, WeatherLookupOrchestrator};

use crate::{configure, logging, render, search};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "Quick weather conditions for any city")]
pub struct Cli {
    /// Language code for place names; overrides the config file.
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current conditions for a city.
    Show {
        /// City name, e.g. "New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search interactively with suggestions as you type.
    Search {
        /// Text to start with.
        initial: Option<String>,
    },

    /// Edit the configuration file interactively.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Logs would scribble over the full-screen prompt unless asked for.
        let default_level = match self.command {
            Command::Search { .. } => "off",
            _ => "warn",
        };
        logging::init(self.verbose, default_level)?;

        match self.command {
            Command::Configure => configure::run(),
            Command::Show { city, json } => {
                let config = Config::load()?.with_language(self.language);
                config.validate()?;
                show(&config, &city.join(" "), json).await
            }
            Command::Search { initial } => {
                let config = Config::load()?.with_language(self.language);
                config.validate()?;
                search::run(&config, initial).await
            }
        }
    }
}

async fn show(config: &Config, city: &str, json: bool) -> Result<()> {
    let city = city.trim();
    ensure!(!city.is_empty(), "Enter a city name to check the weather conditions");

    let client = Arc::new(OpenMeteoClient::from_config(config)?);
    let mut lookup =
        WeatherLookupOrchestrator::new(client.clone(), client, config.language.clone());

    match lookup.resolve(city).await {
        LookupStatus::Success(view) if json => {
            println!("{}", serde_json::to_string_pretty(view)?);
        }
        LookupStatus::Success(view) => {
            for line in render::report(view) {
                println!("{line}");
            }
        }
        LookupStatus::Failed(message) => bail!("{message}"),
        other => bail!("Lookup ended without a result: {other:?}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_joins_words() {
        let cli = Cli::try_parse_from(["weathernow", "show", "New", "York", "--json"]).unwrap();

        match cli.command {
            Command::Show { city, json } => {
                assert_eq!(city.join(" "), "New York");
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn show_requires_a_city() {
        assert!(Cli::try_parse_from(["weathernow", "show"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = ["weathernow", "search", "Ber", "--language", "de", "-vv"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.language.as_deref(), Some("de"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Search { initial: Some(ref s) } if s == "Ber"));
    }

    #[test]
    fn configure_takes_no_arguments() {
        assert!(Cli::try_parse_from(["weathernow", "configure"]).is_ok());
        assert!(Cli::try_parse_from(["weathernow", "configure", "extra"]).is_err());
    }
}
