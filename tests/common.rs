#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use legaldoc_server::assets::{AssetError, AssetLoader};
use legaldoc_server::engine::model::{
    DocumentStrategy, FieldType, FormSection, FormType, LocalizedText, Monetization,
    PaymentTiming, Pricing, QuestionField,
};
use legaldoc_server::engine::{GenerationDispatcher, TransformRegistry};
use legaldoc_server::render::{OverlayRenderer, RenderError, TemplateRenderer};

/// In-memory asset source; anything not seeded is NotFound.
pub struct MockAssetLoader {
    files: HashMap<String, Vec<u8>>,
}

impl MockAssetLoader {
    pub fn empty() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    pub fn with_file(path: &str, bytes: &[u8]) -> Self {
        let mut files = HashMap::new();
        files.insert(path.to_string(), bytes.to_vec());
        Self { files }
    }
}

#[async_trait]
impl AssetLoader for MockAssetLoader {
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound {
                path: path.to_string(),
            })
    }
}

/// Overlay renderer that prefixes the form bytes with the region tag.
pub struct MockOverlayRenderer;

#[async_trait]
impl OverlayRenderer for MockOverlayRenderer {
    async fn overlay(
        &self,
        form_bytes: &[u8],
        _data: &HashMap<String, Value>,
        sub_jurisdiction: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let mut out = format!("OVERLAY:{sub_jurisdiction}:").into_bytes();
        out.extend_from_slice(form_bytes);
        Ok(out)
    }
}

/// Overlay renderer that always fails, for hybrid fallback tests.
pub struct FailingOverlayRenderer;

#[async_trait]
impl OverlayRenderer for FailingOverlayRenderer {
    async fn overlay(
        &self,
        _form_bytes: &[u8],
        _data: &HashMap<String, Value>,
        _sub_jurisdiction: &str,
    ) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Status {
            status: 500,
            detail: "overlay renderer down".to_string(),
        })
    }
}

/// Template renderer that echoes the template path.
pub struct MockTemplateRenderer;

#[async_trait]
impl TemplateRenderer for MockTemplateRenderer {
    async fn render(
        &self,
        template_path: &str,
        _data: &HashMap<String, Value>,
    ) -> Result<Vec<u8>, RenderError> {
        Ok(format!("TEMPLATE:{template_path}").into_bytes())
    }
}

pub fn dispatcher_with(
    assets: impl AssetLoader + 'static,
    overlay: impl OverlayRenderer + 'static,
    templates: impl TemplateRenderer + 'static,
) -> GenerationDispatcher {
    GenerationDispatcher::new(
        Arc::new(TransformRegistry::with_builtins()),
        Arc::new(assets),
        Arc::new(overlay),
        Arc::new(templates),
    )
}

pub fn field(id: &str, required: bool) -> QuestionField {
    QuestionField {
        id: id.to_string(),
        field_type: FieldType::Text,
        label: LocalizedText::en(id),
        placeholder: None,
        required,
        validation: None,
        options: None,
        conditional_logic: None,
    }
}

pub fn section(id: &str, order: u32, fields: Vec<QuestionField>) -> FormSection {
    FormSection {
        id: id.to_string(),
        title: LocalizedText::en(id),
        description: None,
        order,
        icon: None,
        fields,
    }
}

/// The two-section fixture: section "a" (order 2, required f1) and section
/// "b" (order 1, optional f2).
pub fn two_section_strategy(
    form_type: FormType,
    payment_required: PaymentTiming,
) -> DocumentStrategy {
    DocumentStrategy {
        id: "fixture-doc-us-en".to_string(),
        document_type: "fixture-doc".to_string(),
        jurisdiction: "US".to_string(),
        sub_jurisdiction: Some("FL".to_string()),
        language: Some("en".to_string()),
        form_type,
        template_path: Some("/templates/en/fixture-doc.md".to_string()),
        official_form_path: Some("/forms/fixture-doc/fl/FORM-1.pdf".to_string()),
        question_flow: vec![
            section("a", 2, vec![field("f1", true)]),
            section("b", 1, vec![field("f2", false)]),
        ],
        field_mappings: HashMap::new(),
        pricing: Pricing {
            base_price: 9.95,
            currency: "USD".to_string(),
            price_breakdown: Vec::new(),
        },
        compliance: Default::default(),
        monetization: Monetization {
            allow_preview: true,
            preview_limitations: Vec::new(),
            payment_required,
            trial_mode: None,
        },
    }
}
