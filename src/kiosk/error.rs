use super::{device::DeviceError, render::RenderError};
use thiserror::Error;

/// Failures a kiosk workflow can end in.
///
/// The `Display` text is what the traveler sees, lower-cased, after `sorry, `.
#[derive(Debug, Error)]
pub enum KioskError {
    #[error("Finger vein not recognized.")]
    NotRecognized(#[from] DeviceError),
    #[error("Boarding pass not found.")]
    NotFound,
    #[error("Invalid registration form.")]
    InvalidForm(&'static str),
    #[error("Something went wrong.")]
    Storage(#[from] sqlx::Error),
    #[error("Something went wrong.")]
    Render(#[from] RenderError),
}

impl KioskError {
    /// Inline message shown inside the page shell.
    #[must_use]
    pub fn message(&self) -> String {
        format!("sorry, {}", self.to_string().to_lowercase())
    }
}
