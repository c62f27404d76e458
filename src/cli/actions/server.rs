use crate::kiosk::{
    self, device::FingerVeinClient, render::Pages, store::PgBoardingPassStore, Kiosk,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: SecretString,
    pub table: String,
    pub device_url: String,
    pub base_url: String,
    pub static_dir: PathBuf,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable, the device client cannot be
/// built, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let store = PgBoardingPassStore::connect(args.dsn.expose_secret(), &args.table)
        .await
        .context("Could not open the boarding pass store")?;
    info!("DB server connected");

    let device =
        FingerVeinClient::new(&args.device_url).context("Could not build the device client")?;

    let kiosk = Arc::new(Kiosk::new(
        Arc::new(device),
        Arc::new(store),
        Pages::new(&args.base_url),
    ));

    kiosk::serve(args.port, kiosk, Some(args.static_dir)).await
}
