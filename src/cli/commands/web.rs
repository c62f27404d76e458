use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use url::Url;

pub const ARG_BASE_URL: &str = "base-url";
pub const ARG_STATIC_DIR: &str = "static-dir";

#[derive(Debug)]
pub struct Options {
    pub base_url: String,
    pub static_dir: PathBuf,
}

impl Options {
    /// # Errors
    /// Returns an error if the base URL is not an absolute http(s) URL.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let base_url = matches
            .get_one::<String>(ARG_BASE_URL)
            .cloned()
            .context("missing required argument: --base-url")?;

        let parsed =
            Url::parse(&base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!("Base URL must be http(s): {base_url}"));
        }

        let static_dir = matches
            .get_one::<String>(ARG_STATIC_DIR)
            .map_or_else(|| PathBuf::from("views"), PathBuf::from);

        Ok(Self {
            base_url,
            static_dir,
        })
    }
}

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BASE_URL)
                .long(ARG_BASE_URL)
                .help("Public URL of the kiosk, used for links in the pages")
                .env("KIOSK_BASE_URL")
                .default_value("http://localhost:8080"),
        )
        .arg(
            Arg::new(ARG_STATIC_DIR)
                .long(ARG_STATIC_DIR)
                .help("Directory with the stylesheet, scripts and images")
                .env("KIOSK_STATIC_DIR")
                .default_value("views"),
        )
}
