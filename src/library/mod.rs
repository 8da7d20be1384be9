//! Builtin strategy library.
//!
//! Data-only per-jurisdiction strategy tables registered at startup. The
//! catalog can be extended at runtime through the registration endpoint or a
//! strategy config directory; nothing here is special-cased by the engine.

pub mod vehicle_bill_of_sale;

use crate::engine::catalog::{RegistrationError, StrategyCatalog};

/// Register every builtin strategy. Returns the number registered.
pub fn register_builtins(catalog: &StrategyCatalog) -> Result<usize, RegistrationError> {
    let mut count = 0;
    for strategy in vehicle_bill_of_sale::strategies() {
        catalog.register(strategy)?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::StrategyKey;

    #[test]
    fn test_builtins_register_cleanly() {
        let catalog = StrategyCatalog::new();
        let count = register_builtins(&catalog).unwrap();
        assert!(count > 10);
        assert_eq!(catalog.len(), count);
    }

    #[test]
    fn test_florida_resolves_to_official_form() {
        let catalog = StrategyCatalog::new();
        register_builtins(&catalog).unwrap();

        let key = StrategyKey::new("vehicle-bill-of-sale", "US")
            .with_sub_jurisdiction("FL")
            .with_language("en");
        let strategy = catalog.resolve(&key).unwrap();
        assert_eq!(strategy.form_type, crate::engine::model::FormType::OfficialForm);
        assert!(strategy.official_form_path.as_deref().unwrap().contains("HSMV-82050"));
    }

    #[test]
    fn test_other_states_fall_back_to_generic_template() {
        let catalog = StrategyCatalog::new();
        register_builtins(&catalog).unwrap();

        let key = StrategyKey::new("vehicle-bill-of-sale", "US")
            .with_sub_jurisdiction("OR")
            .with_language("en");
        let strategy = catalog.resolve(&key).unwrap();
        assert_eq!(strategy.form_type, crate::engine::model::FormType::CustomTemplate);
    }
}
