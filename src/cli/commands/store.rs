use crate::kiosk::store::{valid_table_name, DEFAULT_TABLE};
use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_DSN: &str = "dsn";
pub const ARG_TABLE: &str = "table";

#[derive(Debug)]
pub struct Options {
    pub dsn: SecretString,
    pub table: String,
}

impl Options {
    /// # Errors
    /// Returns an error if the DSN is missing or the table name is not a plain identifier.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let dsn = matches
            .get_one::<String>(ARG_DSN)
            .cloned()
            .context("missing required argument: --dsn")?;

        let table = matches
            .get_one::<String>(ARG_TABLE)
            .cloned()
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        if !valid_table_name(&table) {
            return Err(anyhow!(
                "Invalid table name: {table} (expected lower-case letters, digits and underscores)"
            ));
        }

        Ok(Self {
            dsn: SecretString::from(dsn),
            table,
        })
    }
}

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long(ARG_DSN)
                .help("Database connection string")
                .env("KIOSK_DSN")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TABLE)
                .long(ARG_TABLE)
                .help("Table holding the boarding passes")
                .env("KIOSK_TABLE")
                .default_value(DEFAULT_TABLE),
        )
}
