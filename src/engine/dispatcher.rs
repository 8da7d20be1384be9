//! Document generation dispatcher.
//!
//! Routes a validated, processed form to the official-form overlay path, the
//! custom-template path, or the hybrid combination of both, enforcing the
//! monetization gate first. Generation is the only async, I/O-bearing
//! operation in the engine; the result is all-or-nothing, so a cancelled
//! call leaves no partial artifact behind.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

use crate::assets::{AssetError, AssetLoader};
use crate::render::{OverlayRenderer, RenderError, TemplateRenderer};

use super::model::{DocumentStrategy, FormType, PaymentTiming};
use super::processor;
use super::transforms::{FieldTransformError, TransformRegistry};
use super::validation::{summarize, ValidationError};

/// Why a generation attempt did not produce a document.
///
/// Everything except `Transform` is an expected, recoverable outcome the
/// caller can act on. A transform failure indicates a strategy configuration
/// defect and is surfaced as a server fault rather than a user error.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<ValidationError>),
    #[error("strategy '{0}' has no official form path configured")]
    MissingOfficialFormPath(String),
    #[error("strategy '{0}' has no template path configured")]
    MissingTemplatePath(String),
    #[error("form asset unavailable at {path}: {source}")]
    AssetUnavailable {
        path: String,
        #[source]
        source: AssetError,
    },
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("field transform failed: {0}")]
    Transform(#[from] FieldTransformError),
}

/// A successfully generated document.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub generated_at: String,
}

/// Outcome of a generation call that did not error.
#[derive(Debug)]
pub enum GenerationOutcome {
    Document(GeneratedDocument),
    /// The strategy requires payment before download and the external
    /// payment confirmation signal was not present.
    PaymentRequired,
}

/// Dispatches generation requests to the external renderer collaborators.
pub struct GenerationDispatcher {
    transforms: Arc<TransformRegistry>,
    assets: Arc<dyn AssetLoader>,
    overlay: Arc<dyn OverlayRenderer>,
    templates: Arc<dyn TemplateRenderer>,
}

impl GenerationDispatcher {
    pub fn new(
        transforms: Arc<TransformRegistry>,
        assets: Arc<dyn AssetLoader>,
        overlay: Arc<dyn OverlayRenderer>,
        templates: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            transforms,
            assets,
            overlay,
            templates,
        }
    }

    pub fn transforms(&self) -> &TransformRegistry {
        &self.transforms
    }

    /// Generate the final document for a strategy and submitted values.
    ///
    /// `payment_confirmed` is the host's external payment signal for this
    /// session; without it, a before-download strategy short-circuits to
    /// [`GenerationOutcome::PaymentRequired`] before any validation or I/O.
    pub async fn generate(
        &self,
        strategy: &DocumentStrategy,
        form_data: &HashMap<String, Value>,
        payment_confirmed: bool,
    ) -> Result<GenerationOutcome, GenerateError> {
        if strategy.monetization.payment_required == PaymentTiming::BeforeDownload
            && !payment_confirmed
        {
            return Ok(GenerationOutcome::PaymentRequired);
        }

        let processed = processor::process(strategy, &self.transforms, form_data)?;
        if !processed.validation_errors.is_empty() {
            return Err(GenerateError::Validation(processed.validation_errors));
        }
        let data = processed.processed_data;

        let document = match strategy.form_type {
            FormType::OfficialForm => self.generate_official(strategy, &data).await?,
            FormType::CustomTemplate => self.generate_template(strategy, &data).await?,
            FormType::Hybrid => match self.generate_official(strategy, &data).await {
                Ok(document) => document,
                Err(err) => {
                    log::warn!(
                        "official-form path failed for '{}', falling back to template: {err}",
                        strategy.id
                    );
                    self.generate_template(strategy, &data).await?
                }
            },
        };

        Ok(GenerationOutcome::Document(document))
    }

    async fn generate_official(
        &self,
        strategy: &DocumentStrategy,
        data: &HashMap<String, Value>,
    ) -> Result<GeneratedDocument, GenerateError> {
        let path = strategy
            .official_form_path
            .as_deref()
            .ok_or_else(|| GenerateError::MissingOfficialFormPath(strategy.id.clone()))?;

        let form_bytes =
            self.assets
                .fetch_bytes(path)
                .await
                .map_err(|source| GenerateError::AssetUnavailable {
                    path: path.to_string(),
                    source,
                })?;

        let sub_jurisdiction = strategy.sub_jurisdiction.as_deref().unwrap_or("");
        let bytes = self.overlay.overlay(&form_bytes, data, sub_jurisdiction).await?;

        Ok(self.document(strategy, bytes))
    }

    async fn generate_template(
        &self,
        strategy: &DocumentStrategy,
        data: &HashMap<String, Value>,
    ) -> Result<GeneratedDocument, GenerateError> {
        let path = strategy
            .template_path
            .as_deref()
            .ok_or_else(|| GenerateError::MissingTemplatePath(strategy.id.clone()))?;

        let bytes = self.templates.render(path, data).await?;
        Ok(self.document(strategy, bytes))
    }

    fn document(&self, strategy: &DocumentStrategy, bytes: Vec<u8>) -> GeneratedDocument {
        let mut name = sanitize_filename(&strategy.document_type, "document");
        if let Some(sub) = &strategy.sub_jurisdiction {
            let sub = sanitize_filename(sub, "");
            if !sub.is_empty() {
                name = format!("{name}-{sub}");
            }
        }
        GeneratedDocument {
            filename: format!("{name}.pdf"),
            bytes,
            media_type: "application/pdf".to_string(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Sanitize a string for use in filenames.
fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            if !last_dash && !result.is_empty() {
                result.push('-');
                last_dash = true;
            }
        }
    }

    if result.is_empty() {
        return fallback.to_string();
    }

    result.trim_matches('-').to_string()
}
