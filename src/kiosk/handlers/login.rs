use crate::kiosk::{error::KioskError, Kiosk};
use axum::{extract::Extension, response::Html};
use std::sync::Arc;
use tracing::{debug, info, instrument};

// axum handler for login, scans a finger and shows the matching boarding pass
#[instrument(skip(kiosk))]
pub async fn login(kiosk: Extension<Arc<Kiosk>>) -> Html<String> {
    let outcome = show_boarding_pass(&kiosk).await;

    super::respond(&kiosk, outcome)
}

async fn show_boarding_pass(kiosk: &Kiosk) -> Result<String, KioskError> {
    kiosk.device.signal_blink().await;

    info!("Calling finger vein verification 1 to N API");
    let verified = kiosk.device.verify_one().await;

    // The scan is over either way, stop blinking before judging the result.
    kiosk.device.signal_steady().await;
    let template_number = verified?;

    info!("Loading boarding pass");
    let pass = kiosk
        .store
        .find_by_template_number(template_number)
        .await?
        .ok_or(KioskError::NotFound)?;

    debug!("Showing boarding pass for template {template_number}");

    Ok(kiosk.pages.boarding_pass(&pass)?)
}
