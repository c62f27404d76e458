use crate::kiosk::{error::KioskError, Kiosk};
use axum::{extract::Extension, response::Html};
use std::sync::Arc;
use tracing::{info, instrument};

// axum handler for enrollment, captures a template and stores it on the device
#[instrument(skip(kiosk))]
pub async fn register(kiosk: Extension<Arc<Kiosk>>) -> Html<String> {
    let outcome = enroll(&kiosk).await;

    super::respond(&kiosk, outcome)
}

async fn enroll(kiosk: &Kiosk) -> Result<String, KioskError> {
    kiosk.device.signal_blink().await;

    info!("Calling finger vein receive template API");
    let captured = kiosk.device.capture_template().await;

    kiosk.device.signal_steady().await;
    let template = captured?;

    info!("Calling finger vein send template API");
    let template_number = kiosk.device.register_template(&template).await?;

    info!("Showing registration page for template {template_number}");

    Ok(kiosk.pages.registration(template_number)?)
}
