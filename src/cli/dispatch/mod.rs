//! Maps validated CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{device, store, web, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let store_opts = store::Options::parse(matches)?;
    let device_opts = device::Options::parse(matches)?;
    let web_opts = web::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn: store_opts.dsn,
        table: store_opts.table,
        device_url: device_opts.url,
        base_url: web_opts.base_url,
        static_dir: web_opts.static_dir,
    }))
}
