//! Wizard state machine.
//!
//! One `FormWizard` per user session, driving the user through a strategy's
//! adapted section list. The wizard owns the mutable form data; the strategy
//! it references is shared and read-only across all sessions. "Complete" is
//! derived from progress, never stored.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::flow::adapt_question_flow;
use super::model::{DocumentStrategy, FormSection, PaymentTiming};
use super::processor::{self, ProgressSnapshot};
use super::validation::ValidationError;

pub struct FormWizard {
    strategy: Arc<DocumentStrategy>,
    flow: Vec<FormSection>,
    current_section: usize,
    form_data: HashMap<String, Value>,
    completion_percentage: f64,
    validation_errors: Vec<ValidationError>,
}

impl FormWizard {
    /// Start a session at the first section of the adapted flow.
    pub fn new(strategy: Arc<DocumentStrategy>) -> Self {
        let flow = adapt_question_flow(&strategy);
        let mut wizard = Self {
            strategy,
            flow,
            current_section: 0,
            form_data: HashMap::new(),
            completion_percentage: 0.0,
            validation_errors: Vec::new(),
        };
        wizard.refresh_progress();
        wizard
    }

    pub fn strategy(&self) -> &Arc<DocumentStrategy> {
        &self.strategy
    }

    /// The adapted, authoritative section order for this session.
    pub fn sections(&self) -> &[FormSection] {
        &self.flow
    }

    pub fn current_section(&self) -> usize {
        self.current_section
    }

    pub fn current_section_data(&self) -> Option<&FormSection> {
        self.flow.get(self.current_section)
    }

    /// Advance the cursor. Returns false at the last section. The state
    /// machine enforces no validation gate; callers decide whether to check
    /// `validate_current_section` first.
    pub fn next_section(&mut self) -> bool {
        if self.current_section + 1 < self.flow.len() {
            self.current_section += 1;
            true
        } else {
            false
        }
    }

    /// Retreat the cursor. Returns false at the first section; never blocked
    /// otherwise.
    pub fn previous_section(&mut self) -> bool {
        if self.current_section > 0 {
            self.current_section -= 1;
            true
        } else {
            false
        }
    }

    /// Record a field edit and recompute progress over the whole flow.
    pub fn update_form_data(&mut self, field_id: impl Into<String>, value: Value) {
        self.form_data.insert(field_id.into(), value);
        self.refresh_progress();
    }

    pub fn form_data(&self) -> &HashMap<String, Value> {
        &self.form_data
    }

    pub fn completion_percentage(&self) -> f64 {
        self.completion_percentage
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    /// Derived completion: every field filled and nothing failing.
    pub fn is_complete(&self) -> bool {
        self.completion_percentage >= 100.0 && self.validation_errors.is_empty()
    }

    /// True when every required field in the current section (only) has a
    /// non-empty value. Deliberately independent of `validation_errors`,
    /// which covers the whole flow.
    pub fn validate_current_section(&self) -> bool {
        let Some(section) = self.flow.get(self.current_section) else {
            return true;
        };
        section.fields.iter().all(|field| {
            if !field.required {
                return true;
            }
            match self.form_data.get(&field.id) {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            }
        })
    }

    /// Field ids currently hidden by conditional logic, for the host UI.
    pub fn hidden_fields(&self) -> Vec<String> {
        self.flow
            .iter()
            .flat_map(|s| &s.fields)
            .filter(|f| !f.is_visible(&self.form_data))
            .map(|f| f.id.clone())
            .collect()
    }

    pub fn can_preview(&self) -> bool {
        self.strategy.monetization.allow_preview
    }

    pub fn requires_payment(&self) -> bool {
        self.strategy.monetization.payment_required == PaymentTiming::BeforeDownload
    }

    pub fn preview_limitations(&self) -> &[String] {
        &self.strategy.monetization.preview_limitations
    }

    pub fn trial_actions(&self) -> &[String] {
        self.strategy
            .monetization
            .trial_mode
            .as_ref()
            .map(|t| t.allowed_actions.as_slice())
            .unwrap_or(&[])
    }

    fn refresh_progress(&mut self) {
        let ProgressSnapshot {
            validation_errors,
            completion_percentage,
        } = processor::progress(&self.strategy, &self.form_data);
        self.validation_errors = validation_errors;
        self.completion_percentage = completion_percentage;
    }
}
