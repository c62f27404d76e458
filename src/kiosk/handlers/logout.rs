use axum::response::Redirect;

/// There is no session to clear; logging out just returns to the landing page.
pub async fn logout() -> Redirect {
    Redirect::to("/")
}
