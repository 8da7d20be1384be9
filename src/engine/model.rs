//! Strategy data model.
//!
//! A `DocumentStrategy` is the full configuration bundle describing how one
//! document type is collected, validated, and rendered for one jurisdiction
//! and language combination. Strategies are immutable once registered in the
//! catalog; sessions only ever hold a shared `Arc` to them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Catch-all jurisdiction marker used by the lowest-priority fallback key.
pub const GENERIC_JURISDICTION: &str = "generic";

/// Per-language text mapping, e.g. `{"en": "Year", "es": "Año"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(value_type = Object)]
pub struct LocalizedText(pub HashMap<String, String>);

impl LocalizedText {
    pub fn en(text: &str) -> Self {
        let mut map = HashMap::new();
        map.insert("en".to_string(), text.to_string());
        Self(map)
    }

    pub fn en_es(en: &str, es: &str) -> Self {
        let mut map = HashMap::new();
        map.insert("en".to_string(), en.to_string());
        map.insert("es".to_string(), es.to_string());
        Self(map)
    }

    /// Look up the text for a language, falling back to English.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.0
            .get(language)
            .or_else(|| self.0.get("en"))
            .map(String::as_str)
    }
}

/// Input widget kinds a question field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Select,
    Checkbox,
    Number,
    Date,
    Email,
    Phone,
    Textarea,
}

/// Declarative constraints carried by a field for the UI layer.
///
/// The form data processor only enforces `required`; pattern and range checks
/// are consumed by the host UI. Patterns are compile-checked at registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// One selectable value for a `select` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldOption {
    pub value: String,
    pub label: LocalizedText,
}

/// Show/hide dependency on another field's current value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConditionalLogic {
    pub show_if: FieldCondition,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldCondition {
    pub field: String,
    #[schema(value_type = Object)]
    pub value: Value,
}

/// One form input within a section.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionField {
    #[schema(example = "vin")]
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<LocalizedText>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalLogic>,
}

impl QuestionField {
    /// Whether the field is currently shown, given the submitted values.
    ///
    /// A field with no conditional logic is always visible. The dependency is
    /// a plain equality edge on another field's value.
    pub fn is_visible(&self, form_data: &HashMap<String, Value>) -> bool {
        match &self.conditional_logic {
            Some(logic) => {
                let current = form_data.get(&logic.show_if.field);
                current == Some(&logic.show_if.value)
            }
            None => true,
        }
    }
}

/// An ordered group of related fields presented together to the user.
///
/// `order` is only the default ordering; the authoritative order for
/// rendering is whatever the question flow adapter returns.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormSection {
    #[schema(example = "vehicle_information")]
    pub id: String,
    pub title: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedText>,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Car")]
    pub icon: Option<String>,
    pub fields: Vec<QuestionField>,
}

/// Field id → PDF placement plus optional named value transform.
///
/// Transforms are referenced by name and resolved against the
/// [`TransformRegistry`](crate::engine::transforms::TransformRegistry), so
/// strategy data stays serializable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldMapping {
    #[schema(example = "sale_price_field")]
    pub pdf_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "currency_usd")]
    pub transform: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceComponent {
    #[schema(example = "smart_completion")]
    pub component: String,
    pub price: f64,
    pub description: LocalizedText,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Pricing {
    #[schema(example = 19.95)]
    pub base_price: f64,
    #[schema(example = "USD")]
    pub currency: String,
    #[serde(default)]
    pub price_breakdown: Vec<PriceComponent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpecialRequirement {
    #[serde(rename = "type")]
    #[schema(example = "odometer_disclosure")]
    pub kind: String,
    pub description: LocalizedText,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Compliance {
    #[serde(default)]
    pub requires_notary: bool,
    #[serde(default)]
    pub requires_witness: bool,
    #[serde(default)]
    pub requires_recording: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special_requirements: Vec<SpecialRequirement>,
}

/// When payment must be collected relative to document delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentTiming {
    #[serde(rename = "before_download")]
    BeforeDownload,
    #[serde(rename = "after_preview")]
    AfterPreview,
    #[serde(rename = "none")]
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrialMode {
    pub allowed_actions: Vec<String>,
    pub limitations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Monetization {
    pub allow_preview: bool,
    #[serde(default)]
    pub preview_limitations: Vec<String>,
    pub payment_required: PaymentTiming,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_mode: Option<TrialMode>,
}

/// Generation mode. Closed so the dispatcher and adapter match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FormType {
    #[serde(rename = "custom-template")]
    CustomTemplate,
    #[serde(rename = "official-form")]
    OfficialForm,
    #[serde(rename = "hybrid")]
    Hybrid,
}

/// The aggregate configuration unit addressed by the strategy catalog.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentStrategy {
    #[schema(example = "vehicle-bill-of-sale-us-fl-en")]
    pub id: String,
    #[schema(example = "vehicle-bill-of-sale")]
    pub document_type: String,
    #[schema(example = "US")]
    pub jurisdiction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "FL")]
    pub sub_jurisdiction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "en")]
    pub language: Option<String>,
    pub form_type: FormType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "/templates/en/vehicle-bill-of-sale.md")]
    pub template_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "/forms/vehicle-bill-of-sale/florida/HSMV-82050.pdf")]
    pub official_form_path: Option<String>,
    pub question_flow: Vec<FormSection>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_mappings: HashMap<String, FieldMapping>,
    pub pricing: Pricing,
    #[serde(default)]
    pub compliance: Compliance,
    pub monetization: Monetization,
}

impl DocumentStrategy {
    /// Composite catalog key derived from the strategy's declared
    /// specificity. Fully-specified strategies key on all four dimensions;
    /// a strategy without a language serves any language for its region, a
    /// strategy without a sub-jurisdiction serves the whole jurisdiction,
    /// and a `generic`-jurisdiction strategy is the document-wide catch-all.
    pub fn catalog_key(&self) -> String {
        if self.jurisdiction == GENERIC_JURISDICTION {
            return format!("{}:{}", self.document_type, GENERIC_JURISDICTION);
        }
        match (&self.sub_jurisdiction, &self.language) {
            (Some(sub), Some(lang)) => {
                format!("{}:{}:{}:{}", self.document_type, self.jurisdiction, sub, lang)
            }
            (Some(sub), None) => {
                format!("{}:{}:{}", self.document_type, self.jurisdiction, sub)
            }
            (None, _) => format!("{}:{}", self.document_type, self.jurisdiction),
        }
    }

    /// Total number of fields across the full question flow.
    pub fn field_count(&self) -> usize {
        self.question_flow.iter().map(|s| s.fields.len()).sum()
    }
}

/// Lookup request for the resolver: what the caller knows about the user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StrategyKey {
    #[schema(example = "vehicle-bill-of-sale")]
    pub document_type: String,
    #[schema(example = "US")]
    pub jurisdiction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "FL")]
    pub sub_jurisdiction: Option<String>,
    #[serde(default = "default_language")]
    #[schema(example = "en")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl StrategyKey {
    pub fn new(document_type: &str, jurisdiction: &str) -> Self {
        Self {
            document_type: document_type.to_string(),
            jurisdiction: jurisdiction.to_string(),
            sub_jurisdiction: None,
            language: default_language(),
        }
    }

    pub fn with_sub_jurisdiction(mut self, sub: &str) -> Self {
        self.sub_jurisdiction = Some(sub.to_string());
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Candidate catalog keys in strict priority order, most specific first:
    /// exact four-dimension match, then ignoring language, then document type
    /// plus jurisdiction, then the generic catch-all.
    pub fn candidates(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(4);
        if let Some(sub) = &self.sub_jurisdiction {
            keys.push(format!(
                "{}:{}:{}:{}",
                self.document_type, self.jurisdiction, sub, self.language
            ));
            keys.push(format!(
                "{}:{}:{}",
                self.document_type, self.jurisdiction, sub
            ));
        }
        keys.push(format!("{}:{}", self.document_type, self.jurisdiction));
        keys.push(format!("{}:{}", self.document_type, GENERIC_JURISDICTION));
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_priority_order() {
        let key = StrategyKey::new("vehicle-bill-of-sale", "US")
            .with_sub_jurisdiction("FL")
            .with_language("en");

        assert_eq!(
            key.candidates(),
            vec![
                "vehicle-bill-of-sale:US:FL:en",
                "vehicle-bill-of-sale:US:FL",
                "vehicle-bill-of-sale:US",
                "vehicle-bill-of-sale:generic",
            ]
        );
    }

    #[test]
    fn test_candidates_without_sub_jurisdiction() {
        let key = StrategyKey::new("lease-agreement", "DE");
        assert_eq!(
            key.candidates(),
            vec!["lease-agreement:DE", "lease-agreement:generic"]
        );
    }

    #[test]
    fn test_localized_text_falls_back_to_english() {
        let text = LocalizedText::en_es("Year", "Año");
        assert_eq!(text.get("es"), Some("Año"));
        assert_eq!(text.get("fr"), Some("Year"));
    }

    #[test]
    fn test_form_type_serde_tags() {
        let json = serde_json::to_string(&FormType::OfficialForm).unwrap();
        assert_eq!(json, "\"official-form\"");
        let parsed: FormType = serde_json::from_str("\"custom-template\"").unwrap();
        assert_eq!(parsed, FormType::CustomTemplate);
    }

    #[test]
    fn test_field_visibility_follows_dependency_edge() {
        let field = QuestionField {
            id: "warranty_text".to_string(),
            field_type: FieldType::Textarea,
            label: LocalizedText::en("Warranty Details"),
            placeholder: None,
            required: false,
            validation: None,
            options: None,
            conditional_logic: Some(ConditionalLogic {
                show_if: FieldCondition {
                    field: "as_is".to_string(),
                    value: Value::Bool(false),
                },
            }),
        };

        let mut data = HashMap::new();
        assert!(!field.is_visible(&data));
        data.insert("as_is".to_string(), Value::Bool(false));
        assert!(field.is_visible(&data));
        data.insert("as_is".to_string(), Value::Bool(true));
        assert!(!field.is_visible(&data));
    }
}
