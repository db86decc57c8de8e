// SPDX-License-Identifier: GPL-2.0-or-later
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_config, Config};

/// Serve the soundboard API over HTTP, or answer a single platform invocation.
///
/// # Logging
///
/// Log levels and filtering are controlled by tracing_subscriber's EnvFilter using the
/// RUST_LOG environment variable. Refer to the documentation at
/// https://docs.rs/tracing-subscriber/0.3/tracing_subscriber/filter/struct.EnvFilter.html
/// for complete details.
///
/// The most basic form is one of "trace", "debug", "info", "warn", or "error". For example:
///
/// RUST_LOG=warn
///
/// # Configuration
///
/// The configuration file is expected to be in TOML format. It is optional; without it the
/// defaults are used and the database URL comes from DATABASE_URL.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Soundboard {
    /// Path to the soundboard configuration file
    #[arg(long, value_parser = load_config, env = "SOUNDBOARD_CONFIG")]
    pub config: Option<Config>,
    /// The PostgreSQL connection string; overrides the configuration file
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

impl Soundboard {
    /// The effective configuration: the file (or defaults) with command-line overrides applied.
    pub fn config(&self) -> Config {
        self.config
            .clone()
            .unwrap_or_default()
            .with_database_url(self.database_url.clone())
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {},
    /// Handle one invocation event and print the response as JSON
    Invoke {
        /// Path to a JSON event with "httpMethod", "body" and "queryStringParameters";
        /// read from stdin when not given
        #[arg(long, short)]
        event: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Soundboard::command().debug_assert();
    }

    #[test]
    fn test_database_url_flag_wins() {
        let opts = Soundboard::try_parse_from([
            "soundboard-server",
            "--database-url",
            "postgres://flag/db",
            "invoke",
            "--event",
            "event.json",
        ])
        .unwrap();

        assert_eq!(opts.config().database_url, "postgres://flag/db");
        match opts.command {
            Command::Invoke { event } => assert_eq!(event, Some(PathBuf::from("event.json"))),
            other => panic!("Unexpected command {other:?}"),
        }
    }
}
