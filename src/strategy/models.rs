use serde::Serialize;
use utoipa::ToSchema;

use crate::engine::model::{DocumentStrategy, FormSection, FormType};

/// Catalog-level view of a strategy, without the full question flow.
#[derive(Debug, Serialize, ToSchema)]
pub struct StrategySummary {
    #[schema(example = "vehicle-bill-of-sale-us-fl-en")]
    pub id: String,
    #[schema(example = "vehicle-bill-of-sale")]
    pub document_type: String,
    #[schema(example = "US")]
    pub jurisdiction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "FL")]
    pub sub_jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "en")]
    pub language: Option<String>,
    pub form_type: FormType,
    #[schema(example = 19.95)]
    pub base_price: f64,
    #[schema(example = "USD")]
    pub currency: String,
    pub section_count: usize,
    pub field_count: usize,
    pub requires_notary: bool,
}

impl From<&DocumentStrategy> for StrategySummary {
    fn from(strategy: &DocumentStrategy) -> Self {
        Self {
            id: strategy.id.clone(),
            document_type: strategy.document_type.clone(),
            jurisdiction: strategy.jurisdiction.clone(),
            sub_jurisdiction: strategy.sub_jurisdiction.clone(),
            language: strategy.language.clone(),
            form_type: strategy.form_type,
            base_price: strategy.pricing.base_price,
            currency: strategy.pricing.currency.clone(),
            section_count: strategy.question_flow.len(),
            field_count: strategy.field_count(),
            requires_notary: strategy.compliance.requires_notary,
        }
    }
}

/// Adapted, authoritative section order for a resolved strategy.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionFlowResponse {
    #[schema(example = "vehicle-bill-of-sale-us-fl-en")]
    pub strategy_id: String,
    pub sections: Vec<FormSection>,
}
