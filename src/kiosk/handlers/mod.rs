//! Route handlers for the kiosk pages.
//!
//! Each workflow runs its steps in order inside one function returning
//! `Result<String, KioskError>`; the handler converts any failure into the home
//! shell with an inline error, so travelers never see an HTTP error status.

pub mod health;
pub mod home;
pub mod login;
pub mod logout;
pub mod register;
pub mod submit;


pub use self::{
    health::health, home::home, login::login, logout::logout, register::register,
    submit::submit,
};

use super::{error::KioskError, render::escape_html, Kiosk};
use axum::response::Html;
use tracing::error;

/// Turn a workflow outcome into the page sent to the browser.
pub(crate) fn respond(kiosk: &Kiosk, outcome: Result<String, KioskError>) -> Html<String> {
    match outcome {
        Ok(html) => Html(html),
        Err(err) => {
            error!("Error: {err:?}");
            error_page(kiosk, &err)
        }
    }
}

pub(crate) fn error_page(kiosk: &Kiosk, err: &KioskError) -> Html<String> {
    let message = err.message();

    match kiosk.pages.message("error", &message) {
        Ok(html) => Html(html),
        Err(render_err) => {
            // The layout itself is broken, fall back to a bare message.
            error!("Failed to render error page: {render_err}");
            Html(format!(r#"<p id="error">{}</p>"#, escape_html(&message)))
        }
    }
}
