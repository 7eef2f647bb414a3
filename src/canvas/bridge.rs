use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;

use crate::canvas::settings::CanvasSettings;
use crate::canvas::shapes::TextAnnotation;

pub const SAVE_PATH: &str = "/api/v1/handwriting/save";
pub const ERASE_PATH: &str = "/api/v1/handwriting/erase";
pub const MODE_TOGGLE_PATH: &str = "/api/v1/handwriting";

/// Body of the save request. The image is a PNG data URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandwritingPayload {
    #[serde(rename = "handWritingImg")]
    pub hand_writing_img: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<TextAnnotation>,
}

/// Notified after the surface has been cleared locally.
pub trait ClearListener: Send + Sync {
    fn on_clear(&self);
}

#[derive(Debug, Clone)]
pub struct HandwritingClient {
    client: Client,
    base_url: String,
}

impl HandwritingClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("handwriting-canvas")
            .build()
            .context("build handwriting http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn from_settings(settings: &CanvasSettings) -> Result<Self> {
        Self::new(
            &settings.api_base_url,
            Duration::from_secs(settings.request_timeout_seconds),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn save(&self, payload: &HandwritingPayload) -> Result<()> {
        let url = self.url(SAVE_PATH);
        let resp = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .with_context(|| format!("post handwriting to {url}"))?;
        if !resp.status().is_success() {
            return Err(anyhow!("handwriting save rejected with {}", resp.status()));
        }
        tracing::info!(bytes = payload.hand_writing_img.len(), "handwriting saved");
        Ok(())
    }

    pub fn notify_erase(&self) -> Result<()> {
        self.post_empty(ERASE_PATH)
    }

    /// Tells the backend the user switched in or out of handwriting mode.
    pub fn toggle_mode(&self) -> Result<()> {
        self.post_empty(MODE_TOGGLE_PATH)
    }

    fn post_empty(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        let resp = self
            .client
            .post(&url)
            .send()
            .with_context(|| format!("post to {url}"))?;
        if !resp.status().is_success() {
            return Err(anyhow!("{path} returned {}", resp.status()));
        }
        Ok(())
    }
}

/// Posts the erase notification on a detached thread. Failures are logged only.
#[derive(Debug, Clone)]
pub struct HttpClearListener {
    client: HandwritingClient,
}

impl HttpClearListener {
    pub fn new(client: HandwritingClient) -> Self {
        Self { client }
    }

    /// Returns a listener only when `notify_on_clear` is enabled.
    pub fn from_settings(settings: &CanvasSettings) -> Result<Option<Self>> {
        if !settings.notify_on_clear {
            return Ok(None);
        }
        HandwritingClient::from_settings(settings).map(|client| Some(Self::new(client)))
    }
}

impl ClearListener for HttpClearListener {
    fn on_clear(&self) {
        let client = self.client.clone();
        let spawned = std::thread::Builder::new()
            .name("handwriting-erase".into())
            .spawn(move || {
                if let Err(err) = client.notify_erase() {
                    tracing::error!(?err, "handwriting erase notification failed");
                }
            });
        if let Err(err) = spawned {
            tracing::error!(?err, "failed to spawn erase notification thread");
        }
    }
}
