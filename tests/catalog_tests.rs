mod common;

use common::two_section_strategy;
use legaldoc_server::engine::model::{FormType, PaymentTiming, StrategyKey, GENERIC_JURISDICTION};
use legaldoc_server::engine::StrategyCatalog;
use legaldoc_server::library;

#[test]
fn resolution_walks_the_fallback_chain_most_specific_first() {
    let catalog = StrategyCatalog::new();

    let mut generic = two_section_strategy(FormType::CustomTemplate, PaymentTiming::None);
    generic.id = "generic".to_string();
    generic.jurisdiction = GENERIC_JURISDICTION.to_string();
    generic.sub_jurisdiction = None;
    catalog.register(generic).unwrap();

    let mut country = two_section_strategy(FormType::CustomTemplate, PaymentTiming::None);
    country.id = "country".to_string();
    country.sub_jurisdiction = None;
    country.language = None;
    catalog.register(country).unwrap();

    let mut exact = two_section_strategy(FormType::OfficialForm, PaymentTiming::None);
    exact.id = "exact".to_string();
    catalog.register(exact).unwrap();

    let key = StrategyKey::new("fixture-doc", "US")
        .with_sub_jurisdiction("FL")
        .with_language("en");

    // exact match wins in full
    assert_eq!(catalog.resolve(&key).unwrap().id, "exact");

    // removing it exposes the next rung
    catalog.remove("fixture-doc:US:FL:en");
    assert_eq!(catalog.resolve(&key).unwrap().id, "country");

    catalog.remove("fixture-doc:US");
    assert_eq!(catalog.resolve(&key).unwrap().id, "generic");

    catalog.remove("fixture-doc:generic");
    assert!(catalog.resolve(&key).is_err());
}

#[test]
fn unlisted_states_inherit_the_generic_us_strategy() {
    let catalog = StrategyCatalog::new();
    library::register_builtins(&catalog).unwrap();

    // Vermont has no official form and no dedicated entry
    let key = StrategyKey::new("vehicle-bill-of-sale", "US")
        .with_sub_jurisdiction("VT")
        .with_language("en");
    let strategy = catalog.resolve(&key).unwrap();
    assert_eq!(strategy.form_type, FormType::CustomTemplate);
    assert!(strategy.sub_jurisdiction.is_none());
}

#[test]
fn resolution_ignores_language_below_the_exact_rung() {
    let catalog = StrategyCatalog::new();
    library::register_builtins(&catalog).unwrap();

    // builtins are registered as English; a Spanish request for Florida
    // still lands on the Florida strategy via the coarser rungs
    let key = StrategyKey::new("vehicle-bill-of-sale", "US")
        .with_sub_jurisdiction("FL")
        .with_language("es");
    let strategy = catalog.resolve(&key).unwrap();
    assert_eq!(strategy.form_type, FormType::CustomTemplate);
}
