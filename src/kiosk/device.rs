//! Finger-vein device client.
//!
//! The device exposes a small HTTP API next to the kiosk. LED calls drive the
//! green indicator that tells the traveler when to present a finger; the other
//! calls run a scan and answer with `{"response": "ok", ...}` on success.
//!
//! LED signals are awaited so the indicator state follows the workflow, but
//! their failures are only logged. Scan failures of any kind surface as a
//! [`DeviceError`], which handlers report as "finger vein not recognized".

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

const LED_GREEN_BLINK: &str = "/api/ledgreenblink";
const LED_GREEN_ON: &str = "/api/ledgreenon";
const LED_GREEN_OFF: &str = "/api/ledgreenoff";
const VERIFICATION_1_TO_N: &str = "/api/verification_1toN";
const RECEIVE_TEMPLATE: &str = "/api/receive_template";
const SEND_TEMPLATE: &str = "/api/send_template";

const RESPONSE_OK: &str = "ok";

/// Template number assigned by the device; also the boarding pass key.
pub type TemplateNumber = i64;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("device answered {0:?}")]
    Rejected(String),
    #[error("device response is missing {0}")]
    Incomplete(&'static str),
}

/// Captured biometric template, passed through to the device untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiometricTemplate(pub Value);

#[async_trait]
pub trait Device: Send + Sync {
    /// Blink the indicator to ask for a finger.
    async fn signal_blink(&self);

    /// Turn the indicator steady on.
    async fn signal_steady(&self);

    /// Turn the indicator off.
    async fn signal_off(&self);

    /// Run a 1:N match and return the verified template number.
    async fn verify_one(&self) -> Result<TemplateNumber, DeviceError>;

    /// Capture a new template from the presented finger.
    async fn capture_template(&self) -> Result<BiometricTemplate, DeviceError>;

    /// Store a captured template on the device and return its number.
    async fn register_template(
        &self,
        template: &BiometricTemplate,
    ) -> Result<TemplateNumber, DeviceError>;
}

#[derive(Deserialize, Debug)]
struct VerificationResponse {
    response: String,
    #[serde(rename = "verifiedTemplateNumber")]
    verified_template_number: Option<TemplateNumber>,
}

#[derive(Deserialize, Debug)]
struct ReceiveTemplateResponse {
    response: String,
    template: Option<Value>,
}

#[derive(Serialize, Debug)]
struct SendTemplateRequest<'a> {
    template: &'a BiometricTemplate,
}

#[derive(Deserialize, Debug)]
struct SendTemplateResponse {
    response: String,
    #[serde(rename = "templateNumber")]
    template_number: Option<TemplateNumber>,
}

fn ensure_ok(response: &str) -> Result<(), DeviceError> {
    if response == RESPONSE_OK {
        Ok(())
    } else {
        Err(DeviceError::Rejected(response.to_string()))
    }
}

/// HTTP client for the finger-vein device API.
#[derive(Debug, Clone)]
pub struct FingerVeinClient {
    client: Client,
    base_url: String,
}

impl FingerVeinClient {
    /// Build a client for the device API rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, DeviceError> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn signal(&self, path: &str) {
        match self.client.get(self.endpoint(path)).send().await {
            Ok(response) => debug!("LED signal {path}: {}", response.status()),
            Err(err) => warn!("LED signal {path} failed: {err}"),
        }
    }
}

#[async_trait]
impl Device for FingerVeinClient {
    async fn signal_blink(&self) {
        self.signal(LED_GREEN_BLINK).await;
    }

    async fn signal_steady(&self) {
        self.signal(LED_GREEN_ON).await;
    }

    async fn signal_off(&self) {
        self.signal(LED_GREEN_OFF).await;
    }

    #[instrument(skip(self))]
    async fn verify_one(&self) -> Result<TemplateNumber, DeviceError> {
        let body: VerificationResponse = self
            .client
            .get(self.endpoint(VERIFICATION_1_TO_N))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        ensure_ok(&body.response)?;

        body.verified_template_number
            .ok_or(DeviceError::Incomplete("verifiedTemplateNumber"))
    }

    #[instrument(skip(self))]
    async fn capture_template(&self) -> Result<BiometricTemplate, DeviceError> {
        let body: ReceiveTemplateResponse = self
            .client
            .get(self.endpoint(RECEIVE_TEMPLATE))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        ensure_ok(&body.response)?;

        body.template
            .map(BiometricTemplate)
            .ok_or(DeviceError::Incomplete("template"))
    }

    #[instrument(skip(self, template))]
    async fn register_template(
        &self,
        template: &BiometricTemplate,
    ) -> Result<TemplateNumber, DeviceError> {
        let body: SendTemplateResponse = self
            .client
            .post(self.endpoint(SEND_TEMPLATE))
            .json(&SendTemplateRequest { template })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        ensure_ok(&body.response)?;

        body.template_number
            .ok_or(DeviceError::Incomplete("templateNumber"))
    }
}
