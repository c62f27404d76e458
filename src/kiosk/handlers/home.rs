use crate::kiosk::Kiosk;
use axum::{extract::Extension, response::Html};
use std::sync::Arc;

// axum handler for the landing page
pub async fn home(kiosk: Extension<Arc<Kiosk>>) -> Html<String> {
    super::respond(&kiosk, kiosk.pages.home().map_err(Into::into))
}
