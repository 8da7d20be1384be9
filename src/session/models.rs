use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::model::{FormSection, FormType};
use crate::engine::validation::ValidationError;
use crate::state::WizardSession;
use crate::strategy::models::StrategySummary;

/// Response to starting a wizard session: the id to drive it with plus the
/// adapted section order the UI should render.
#[derive(Debug, Serialize, ToSchema)]
pub struct StartSessionResponse {
    #[schema(example = "f1e2d3c4-b5a6-7890-1234-567890abcdef")]
    pub session_id: Uuid,
    pub strategy: StrategySummary,
    pub sections: Vec<FormSection>,
}

/// Progress and monetization view of a running session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    #[schema(example = "vehicle-bill-of-sale-us-fl-en")]
    pub strategy_id: String,
    pub form_type: FormType,
    pub current_section: usize,
    pub section_count: usize,
    #[schema(example = 62.5)]
    pub completion_percentage: f64,
    pub validation_errors: Vec<ValidationError>,
    /// Field ids currently hidden by conditional logic.
    pub hidden_fields: Vec<String>,
    pub is_complete: bool,
    pub can_preview: bool,
    pub requires_payment: bool,
    pub preview_limitations: Vec<String>,
    pub payment_confirmed: bool,
}

impl SessionSnapshot {
    pub fn of(session_id: Uuid, session: &WizardSession) -> Self {
        let wizard = &session.wizard;
        Self {
            session_id,
            strategy_id: wizard.strategy().id.clone(),
            form_type: wizard.strategy().form_type,
            current_section: wizard.current_section(),
            section_count: wizard.sections().len(),
            completion_percentage: wizard.completion_percentage(),
            validation_errors: wizard.validation_errors().to_vec(),
            hidden_fields: wizard.hidden_fields(),
            is_complete: wizard.is_complete(),
            can_preview: wizard.can_preview(),
            requires_payment: wizard.requires_payment(),
            preview_limitations: wizard.preview_limitations().to_vec(),
            payment_confirmed: session.payment_confirmed,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FieldUpdateRequest {
    #[schema(example = "seller_name")]
    pub field_id: String,
    #[schema(value_type = Object, example = "Jane Doe")]
    pub value: Value,
}

/// Progress after a field edit.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressResponse {
    #[schema(example = 75.0)]
    pub completion_percentage: f64,
    pub validation_errors: Vec<ValidationError>,
    pub is_complete: bool,
}

/// Cursor position after a navigation call.
#[derive(Debug, Serialize, ToSchema)]
pub struct NavigationResponse {
    pub current_section: usize,
    #[schema(example = "vehicle_information")]
    pub section_id: Option<String>,
    /// False when the cursor was already at the boundary.
    pub moved: bool,
}

/// Result of validating only the current section.
#[derive(Debug, Serialize, ToSchema)]
pub struct SectionValidationResponse {
    pub current_section: usize,
    #[schema(example = "seller_information")]
    pub section_id: Option<String>,
    pub valid: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentConfirmationRequest {
    /// The host's external payment signal for this session.
    pub confirmed: bool,
}

/// 422 body when generation is refused because required fields are missing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationFailureResponse {
    #[schema(example = "ValidationFailed")]
    pub error: String,
    pub message: String,
    pub fields: Vec<ValidationError>,
    pub timestamp: String,
}

impl ValidationFailureResponse {
    pub fn new(message: String, fields: Vec<ValidationError>) -> Self {
        Self {
            error: "ValidationFailed".to_string(),
            message,
            fields,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
