use clap::{Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names in verbosity order; `KIOSK_LOG_LEVEL` takes a name or its index.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Parse a `KIOSK_LOG_LEVEL` value into a verbosity count.
///
/// # Errors
/// Returns an error for anything but a level name or an index into [`LOG_LEVELS`].
pub fn parse_log_level(level: &str) -> Result<u8, String> {
    let level = level.trim().to_lowercase();

    LOG_LEVELS
        .iter()
        .zip(0u8..)
        .find_map(|(name, count)| (*name == level || count.to_string() == level).then_some(count))
        .ok_or_else(|| format!("invalid log level: {level}, expected one of {LOG_LEVELS:?}"))
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Increase verbosity, -v warn, -vv info, -vvv debug, -vvvv trace (default: error)")
            .env("KIOSK_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(parse_log_level),
    )
}
