//! Strategy catalog and priority-ordered fallback resolver.
//!
//! The catalog is an explicitly constructed object injected into whatever
//! needs lookups, so tests can run against small fixture catalogs. Lookups
//! are continuous and registration is rare; entries are fully built before
//! being published behind the lock, so readers never observe a
//! partially-written strategy. Re-registering a key replaces the previous
//! entry (last-writer-wins, no versioning).

use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use thiserror::Error;

use super::model::{DocumentStrategy, StrategyKey};

/// Resolution miss. Recoverable: the caller falls back to a generic
/// experience instead of crashing.
#[derive(Debug, Error)]
#[error("no strategy registered for '{document_type}' in '{jurisdiction}'")]
pub struct StrategyNotFound {
    pub document_type: String,
    pub jurisdiction: String,
}

/// Rejected registration. Strategy data defects fail loudly at load time
/// rather than surfacing mid-session.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("strategy '{strategy}': duplicate field id '{field}'")]
    DuplicateFieldId { strategy: String, field: String },
    #[error("strategy '{strategy}': field '{field}' has an invalid pattern: {source}")]
    InvalidPattern {
        strategy: String,
        field: String,
        #[source]
        source: regex::Error,
    },
}

/// Immutable collection of strategies addressable by composite key.
#[derive(Default)]
pub struct StrategyCatalog {
    entries: RwLock<HashMap<String, Arc<DocumentStrategy>>>,
}

impl StrategyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and publish a strategy under its catalog key.
    ///
    /// Returns the shared handle now held by the catalog. Any prior entry at
    /// the same key is replaced atomically.
    pub fn register(
        &self,
        strategy: DocumentStrategy,
    ) -> Result<Arc<DocumentStrategy>, RegistrationError> {
        validate_strategy(&strategy)?;

        let key = strategy.catalog_key();
        let entry = Arc::new(strategy);
        let replaced = self
            .entries
            .write()
            .insert(key.clone(), Arc::clone(&entry))
            .is_some();

        if replaced {
            log::info!("replaced strategy at '{key}'");
        } else {
            log::info!("registered strategy at '{key}'");
        }
        Ok(entry)
    }

    /// Priority-ordered fallback lookup: the first candidate key with an
    /// entry wins in full; no partial merging of strategies.
    pub fn resolve(&self, key: &StrategyKey) -> Result<Arc<DocumentStrategy>, StrategyNotFound> {
        let entries = self.entries.read();
        for candidate in key.candidates() {
            if let Some(strategy) = entries.get(&candidate) {
                log::debug!("resolved '{candidate}' for {}:{}", key.document_type, key.jurisdiction);
                return Ok(Arc::clone(strategy));
            }
        }
        Err(StrategyNotFound {
            document_type: key.document_type.clone(),
            jurisdiction: key.jurisdiction.clone(),
        })
    }

    /// Remove the entry at a strategy's exact catalog key.
    pub fn remove(&self, catalog_key: &str) -> Option<Arc<DocumentStrategy>> {
        self.entries.write().remove(catalog_key)
    }

    /// Snapshot of all registered strategies, in no particular order.
    pub fn all(&self) -> Vec<Arc<DocumentStrategy>> {
        self.entries.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Load every `*.json` strategy file from a directory.
    ///
    /// The files come from the external configuration pipeline and are
    /// treated as pre-validated apart from the registration checks.
    pub fn load_json_dir(&self, dir: &Path) -> anyhow::Result<usize> {
        let mut loaded = 0;
        let read_dir = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read strategy config dir {}", dir.display()))?;

        for entry in read_dir {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let strategy: DocumentStrategy = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            self.register(strategy)
                .with_context(|| format!("failed to register {}", path.display()))?;
            loaded += 1;
        }
        Ok(loaded)
    }
}

fn validate_strategy(strategy: &DocumentStrategy) -> Result<(), RegistrationError> {
    let mut seen = HashSet::new();
    for section in &strategy.question_flow {
        for field in &section.fields {
            if !seen.insert(field.id.as_str()) {
                return Err(RegistrationError::DuplicateFieldId {
                    strategy: strategy.id.clone(),
                    field: field.id.clone(),
                });
            }
            if let Some(pattern) = field.validation.as_ref().and_then(|v| v.pattern.as_deref()) {
                regex::Regex::new(pattern).map_err(|source| RegistrationError::InvalidPattern {
                    strategy: strategy.id.clone(),
                    field: field.id.clone(),
                    source,
                })?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::{
        FieldType, FormSection, FormType, LocalizedText, Monetization, PaymentTiming, Pricing,
        QuestionField, GENERIC_JURISDICTION,
    };

    fn field(id: &str) -> QuestionField {
        QuestionField {
            id: id.to_string(),
            field_type: FieldType::Text,
            label: LocalizedText::en(id),
            placeholder: None,
            required: false,
            validation: None,
            options: None,
            conditional_logic: None,
        }
    }

    fn strategy(id: &str, jurisdiction: &str, sub: Option<&str>, lang: Option<&str>) -> DocumentStrategy {
        DocumentStrategy {
            id: id.to_string(),
            document_type: "vehicle-bill-of-sale".to_string(),
            jurisdiction: jurisdiction.to_string(),
            sub_jurisdiction: sub.map(str::to_string),
            language: lang.map(str::to_string),
            form_type: FormType::CustomTemplate,
            template_path: Some("/templates/en/vehicle-bill-of-sale.md".to_string()),
            official_form_path: None,
            question_flow: vec![FormSection {
                id: "main".to_string(),
                title: LocalizedText::en("Main"),
                description: None,
                order: 1,
                icon: None,
                fields: vec![field("f1")],
            }],
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
    fn test_exact_match_beats_generic_fallback() {
        let catalog = StrategyCatalog::new();
        catalog
            .register(strategy("exact", "US", Some("FL"), Some("en")))
            .unwrap();
        catalog
            .register(strategy("fallback", GENERIC_JURISDICTION, None, None))
            .unwrap();

        let key = StrategyKey::new("vehicle-bill-of-sale", "US").with_sub_jurisdiction("FL");
        assert_eq!(catalog.resolve(&key).unwrap().id, "exact");

        catalog.remove("vehicle-bill-of-sale:US:FL:en");
        assert_eq!(catalog.resolve(&key).unwrap().id, "fallback");
    }

    #[test]
    fn test_language_agnostic_entry_serves_any_language() {
        let catalog = StrategyCatalog::new();
        catalog
            .register(strategy("fl-any-lang", "US", Some("FL"), None))
            .unwrap();

        let key = StrategyKey::new("vehicle-bill-of-sale", "US")
            .with_sub_jurisdiction("FL")
            .with_language("pt");
        assert_eq!(catalog.resolve(&key).unwrap().id, "fl-any-lang");
    }

    #[test]
    fn test_resolution_miss_is_recoverable() {
        let catalog = StrategyCatalog::new();
        let key = StrategyKey::new("last-will", "US");
        let err = catalog.resolve(&key).unwrap_err();
        assert_eq!(err.document_type, "last-will");
    }

    #[test]
    fn test_registration_is_last_writer_wins() {
        let catalog = StrategyCatalog::new();
        catalog.register(strategy("first", "US", None, None)).unwrap();
        catalog.register(strategy("second", "US", None, None)).unwrap();
        assert_eq!(catalog.len(), 1);

        let key = StrategyKey::new("vehicle-bill-of-sale", "US");
        assert_eq!(catalog.resolve(&key).unwrap().id, "second");
    }

    #[test]
    fn test_duplicate_field_ids_rejected() {
        let mut bad = strategy("dup", "US", None, None);
        bad.question_flow[0].fields.push(field("f1"));

        let catalog = StrategyCatalog::new();
        let err = catalog.register(bad).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateFieldId { field, .. } if field == "f1"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut bad = strategy("badpattern", "US", None, None);
        bad.question_flow[0].fields[0].validation =
            Some(crate::engine::model::FieldValidation {
                pattern: Some("[unclosed".to_string()),
                ..Default::default()
            });

        let catalog = StrategyCatalog::new();
        let err = catalog.register(bad).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidPattern { .. }));
    }
}
