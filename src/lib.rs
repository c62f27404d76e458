//! # Boarding Kiosk
//!
//! `boarding-kiosk` runs the web front of an airport boarding-pass kiosk. A
//! traveler presents a finger to the finger-vein device, the device matches it
//! against its enrolled templates, and the kiosk shows the boarding pass stored
//! under the matched template number.
//!
//! ## Flows
//!
//! - **Login**: blink the device LED, run a 1:N verification, turn the LED
//!   steady, look the boarding pass up and render it.
//! - **Register**: blink, capture a template, turn the LED steady, store the
//!   template on the device and show the assigned template number so staff can
//!   attach flight details through the submit form.
//! - **Submit**: upsert the boarding pass keyed by template number.
//!
//! Every failure is recovered at the handler and rendered as an inline message
//! inside the normal page shell.

pub mod cli;
pub mod kiosk;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
