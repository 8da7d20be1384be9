//! Renderer collaborators.
//!
//! Rendering internals live outside this service. The dispatcher talks to
//! two renderer contracts: an overlay renderer that stamps processed values
//! onto an official form's bytes, and a template renderer that produces a
//! document from a freely-authored template. The production implementations
//! call the renderer services over HTTP.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("renderer returned status {status}: {detail}")]
    Status { status: u16, detail: String },
}

/// Stamps processed form data onto an official form's bytes.
#[async_trait]
pub trait OverlayRenderer: Send + Sync {
    async fn overlay(
        &self,
        form_bytes: &[u8],
        data: &HashMap<String, Value>,
        sub_jurisdiction: &str,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Renders processed form data into a custom template.
#[async_trait]
pub trait TemplateRenderer: Send + Sync {
    async fn render(
        &self,
        template_path: &str,
        data: &HashMap<String, Value>,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Renderer service endpoints, from the environment.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub overlay_url: String,
    pub template_url: String,
}

impl RendererConfig {
    pub fn from_env() -> Result<Self, std::env::VarError> {
        Ok(Self {
            overlay_url: std::env::var("OVERLAY_RENDERER_URL")?,
            template_url: std::env::var("TEMPLATE_RENDERER_URL")?,
        })
    }
}

#[derive(Serialize)]
struct OverlayRequest<'a> {
    form_pdf: String,
    sub_jurisdiction: &'a str,
    data: &'a HashMap<String, Value>,
}

#[derive(Serialize)]
struct TemplateRequest<'a> {
    template_path: &'a str,
    data: &'a HashMap<String, Value>,
}

pub struct HttpOverlayRenderer {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpOverlayRenderer {
    pub fn new(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

#[async_trait]
impl OverlayRenderer for HttpOverlayRenderer {
    async fn overlay(
        &self,
        form_bytes: &[u8],
        data: &HashMap<String, Value>,
        sub_jurisdiction: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let body = OverlayRequest {
            form_pdf: BASE64.encode(form_bytes),
            sub_jurisdiction,
            data,
        };
        post_for_bytes(&self.client, &self.endpoint, &body).await
    }
}

pub struct HttpTemplateRenderer {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTemplateRenderer {
    pub fn new(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

#[async_trait]
impl TemplateRenderer for HttpTemplateRenderer {
    async fn render(
        &self,
        template_path: &str,
        data: &HashMap<String, Value>,
    ) -> Result<Vec<u8>, RenderError> {
        let body = TemplateRequest {
            template_path,
            data,
        };
        post_for_bytes(&self.client, &self.endpoint, &body).await
    }
}

async fn post_for_bytes<T: Serialize>(
    client: &reqwest::Client,
    endpoint: &str,
    body: &T,
) -> Result<Vec<u8>, RenderError> {
    let response = client.post(endpoint).json(body).send().await?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(RenderError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    Ok(response.bytes().await?.to_vec())
}
