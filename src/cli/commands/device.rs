use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use url::Url;

pub const ARG_DEVICE_URL: &str = "device-url";

#[derive(Debug)]
pub struct Options {
    pub url: String,
}

impl Options {
    /// # Errors
    /// Returns an error if the device URL is missing or not http(s).
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let url = matches
            .get_one::<String>(ARG_DEVICE_URL)
            .cloned()
            .context("missing required argument: --device-url")?;

        let parsed = Url::parse(&url).with_context(|| format!("Invalid device URL: {url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!("Device URL must be http(s): {url}"));
        }

        Ok(Self { url })
    }
}

pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_DEVICE_URL)
            .long(ARG_DEVICE_URL)
            .help("Finger vein device API base URL, example: http://192.168.0.20:5000")
            .env("KIOSK_DEVICE_URL")
            .required(true),
    )
}
