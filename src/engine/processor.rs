//! Form data processor.
//!
//! Validates submitted values against field requirements, computes the
//! completion percentage, and applies per-field transforms. Completion is
//! computed over the strategy's full question flow regardless of conditional
//! visibility; a field hidden by conditional logic still counts toward the
//! denominator.
//!
//! Only the `required` flag is enforced here. Pattern and range rules are
//! declarative data for the host UI, which consumes `validation_errors`
//! alongside its own checks.

use std::collections::HashMap;

use serde_json::Value;

use super::model::DocumentStrategy;
use super::transforms::{FieldTransformError, TransformRegistry};
use super::validation::ValidationError;

/// Validation and completion state for a set of submitted values.
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    pub validation_errors: Vec<ValidationError>,
    pub completion_percentage: f64,
}

/// A fully processed form: progress plus transformed values ready for a
/// renderer.
#[derive(Debug, Clone)]
pub struct ProcessedForm {
    pub processed_data: HashMap<String, Value>,
    pub validation_errors: Vec<ValidationError>,
    pub completion_percentage: f64,
}

/// Whether a submitted value counts as filled in.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Compute validation errors and completion percentage without touching
/// transforms. This is what the wizard recomputes on every field edit.
pub fn progress(
    strategy: &DocumentStrategy,
    form_data: &HashMap<String, Value>,
) -> ProgressSnapshot {
    let mut validation_errors = Vec::new();
    let mut total_fields = 0usize;
    let mut completed_fields = 0usize;

    for section in &strategy.question_flow {
        for field in &section.fields {
            total_fields += 1;
            let value = form_data.get(&field.id);
            if is_present(value) {
                completed_fields += 1;
            } else if field.required {
                let label = field.label.get("en").unwrap_or(field.id.as_str());
                validation_errors.push(ValidationError::missing_required(&field.id, label));
            }
        }
    }

    let completion_percentage = if total_fields > 0 {
        completed_fields as f64 / total_fields as f64 * 100.0
    } else {
        0.0
    };

    ProgressSnapshot {
        validation_errors,
        completion_percentage,
    }
}

/// Full processing pass: progress plus per-field transforms.
///
/// Transforms are pure functions of a single field's value; a failing
/// transform indicates a strategy/data mismatch and aborts the whole pass
/// rather than being folded into the validation errors.
pub fn process(
    strategy: &DocumentStrategy,
    transforms: &TransformRegistry,
    form_data: &HashMap<String, Value>,
) -> Result<ProcessedForm, FieldTransformError> {
    let snapshot = progress(strategy, form_data);
    let mut processed_data = HashMap::with_capacity(form_data.len());

    for section in &strategy.question_flow {
        for field in &section.fields {
            let Some(value) = form_data.get(&field.id) else {
                continue;
            };
            let transform = strategy
                .field_mappings
                .get(&field.id)
                .and_then(|m| m.transform.as_deref());

            let processed = match transform {
                Some(name) if !value.is_null() => {
                    transforms
                        .apply(name, value)
                        .map_err(|source| FieldTransformError {
                            field: field.id.clone(),
                            source,
                        })?
                }
                _ => value.clone(),
            };
            processed_data.insert(field.id.clone(), processed);
        }
    }

    Ok(ProcessedForm {
        processed_data,
        validation_errors: snapshot.validation_errors,
        completion_percentage: snapshot.completion_percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::{
        FieldMapping, FieldType, FormSection, FormType, LocalizedText, Monetization,
        PaymentTiming, Pricing, QuestionField,
    };
    use serde_json::json;

    fn field(id: &str, required: bool) -> QuestionField {
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

    fn two_section_strategy() -> DocumentStrategy {
        DocumentStrategy {
            id: "fixture".to_string(),
            document_type: "fixture-doc".to_string(),
            jurisdiction: "US".to_string(),
            sub_jurisdiction: None,
            language: Some("en".to_string()),
            form_type: FormType::CustomTemplate,
            template_path: Some("/templates/en/fixture.md".to_string()),
            official_form_path: None,
            question_flow: vec![
                FormSection {
                    id: "a".to_string(),
                    title: LocalizedText::en("A"),
                    description: None,
                    order: 2,
                    icon: None,
                    fields: vec![field("f1", true)],
                },
                FormSection {
                    id: "b".to_string(),
                    title: LocalizedText::en("B"),
                    description: None,
                    order: 1,
                    icon: None,
                    fields: vec![field("f2", false)],
                },
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
                payment_required: PaymentTiming::None,
                trial_mode: None,
            },
        }
    }

    #[test]
    fn test_empty_form_has_zero_completion_and_required_errors() {
        let strategy = two_section_strategy();
        let snapshot = progress(&strategy, &HashMap::new());

        assert_eq!(snapshot.completion_percentage, 0.0);
        assert_eq!(snapshot.validation_errors.len(), 1);
        assert_eq!(snapshot.validation_errors[0].field, "f1");
    }

    #[test]
    fn test_filling_the_required_field_clears_errors() {
        let strategy = two_section_strategy();
        let mut data = HashMap::new();
        data.insert("f1".to_string(), json!("x"));

        let snapshot = progress(&strategy, &data);
        assert_eq!(snapshot.completion_percentage, 50.0);
        assert!(snapshot.validation_errors.is_empty());
    }

    #[test]
    fn test_completion_is_monotonic_in_filled_fields() {
        let strategy = two_section_strategy();
        let mut data = HashMap::new();
        let empty = progress(&strategy, &data).completion_percentage;

        data.insert("f1".to_string(), json!("x"));
        let one = progress(&strategy, &data).completion_percentage;

        data.insert("f2".to_string(), json!("y"));
        let two = progress(&strategy, &data).completion_percentage;

        assert!(empty <= one && one <= two);
        assert_eq!(two, 100.0);
    }

    #[test]
    fn test_empty_string_does_not_count_as_present() {
        let strategy = two_section_strategy();
        let mut data = HashMap::new();
        data.insert("f1".to_string(), json!(""));

        let snapshot = progress(&strategy, &data);
        assert_eq!(snapshot.completion_percentage, 0.0);
        assert_eq!(snapshot.validation_errors.len(), 1);
    }

    #[test]
    fn test_transforms_replace_mapped_values_only() {
        let mut strategy = two_section_strategy();
        strategy.field_mappings.insert(
            "f1".to_string(),
            FieldMapping {
                pdf_field: "f1_field".to_string(),
                transform: Some("uppercase".to_string()),
            },
        );

        let mut data = HashMap::new();
        data.insert("f1".to_string(), json!("abc"));
        data.insert("f2".to_string(), json!("unchanged"));

        let registry = TransformRegistry::with_builtins();
        let processed = process(&strategy, &registry, &data).unwrap();

        assert_eq!(processed.processed_data["f1"], json!("ABC"));
        assert_eq!(processed.processed_data["f2"], json!("unchanged"));
    }

    #[test]
    fn test_transform_failure_aborts_processing() {
        let mut strategy = two_section_strategy();
        strategy.field_mappings.insert(
            "f1".to_string(),
            FieldMapping {
                pdf_field: "f1_field".to_string(),
                transform: Some("currency_usd".to_string()),
            },
        );

        let mut data = HashMap::new();
        data.insert("f1".to_string(), json!("not a number"));

        let registry = TransformRegistry::with_builtins();
        let err = process(&strategy, &registry, &data).unwrap_err();
        assert_eq!(err.field, "f1");
    }

    #[test]
    fn test_unknown_form_keys_are_ignored() {
        let strategy = two_section_strategy();
        let mut data = HashMap::new();
        data.insert("stray".to_string(), json!("value"));

        let registry = TransformRegistry::with_builtins();
        let processed = process(&strategy, &registry, &data).unwrap();
        assert!(!processed.processed_data.contains_key("stray"));
    }
}
