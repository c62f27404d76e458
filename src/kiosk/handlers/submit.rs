use crate::kiosk::{
    boarding_pass::{BoardingPass, SubmitForm},
    error::KioskError,
    Kiosk,
};
use axum::{
    extract::{Extension, Form},
    response::Html,
};
use std::sync::Arc;
use tracing::{info, instrument};

// axum handler for the registration form
#[instrument(skip(kiosk, form))]
pub async fn submit(kiosk: Extension<Arc<Kiosk>>, form: Option<Form<SubmitForm>>) -> Html<String> {
    let outcome = match form {
        Some(Form(form)) => save(&kiosk, form).await,
        None => Err(KioskError::InvalidForm("form")),
    };

    super::respond(&kiosk, outcome)
}

async fn save(kiosk: &Kiosk, form: SubmitForm) -> Result<String, KioskError> {
    let pass = BoardingPass::try_from(form)?;

    info!(
        "Saving boarding pass for template {}",
        pass.verified_template_number
    );
    kiosk
        .store
        .upsert_by_template_number(pass.verified_template_number, &pass)
        .await?;

    Ok(kiosk
        .pages
        .message("register", "Registration succeeded.")?)
}
