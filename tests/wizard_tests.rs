use std::sync::Arc;

use serde_json::json;

use legaldoc_server::engine::model::StrategyKey;
use legaldoc_server::engine::{FormWizard, StrategyCatalog};
use legaldoc_server::library;

fn florida_wizard() -> FormWizard {
    let catalog = StrategyCatalog::new();
    library::register_builtins(&catalog).unwrap();
    let strategy = catalog
        .resolve(
            &StrategyKey::new("vehicle-bill-of-sale", "US")
                .with_sub_jurisdiction("FL")
                .with_language("en"),
        )
        .unwrap();
    FormWizard::new(strategy)
}

#[test]
fn wizard_walks_the_adapted_florida_flow() {
    let mut wizard = florida_wizard();
    assert_eq!(wizard.current_section_data().unwrap().id, "vehicle_information");

    // walk to the end; the cursor stops at the last section
    let section_count = wizard.sections().len();
    for _ in 0..section_count - 1 {
        assert!(wizard.next_section());
    }
    assert!(!wizard.next_section());
    assert_eq!(wizard.current_section(), section_count - 1);
}

#[test]
fn completion_never_decreases_as_fields_fill_in() {
    let mut wizard = florida_wizard();
    let mut last = wizard.completion_percentage();

    let edits = [
        ("state", json!("FL")),
        ("year", json!(2019)),
        ("make", json!("Toyota")),
        ("model", json!("Corolla")),
        ("vin", json!("1hgcm82633a004352")),
        ("odometer", json!(42000)),
        ("seller_name", json!("Jane Seller")),
        ("price", json!(12500)),
    ];
    for (field, value) in edits {
        wizard.update_form_data(field, value);
        let current = wizard.completion_percentage();
        assert!(current >= last, "completion decreased after '{field}'");
        last = current;
    }
}

#[test]
fn hidden_fields_still_count_toward_completion() {
    let mut wizard = florida_wizard();
    let before = wizard.completion_percentage();

    // hide warranty_text by declaring the sale as-is
    wizard.update_form_data("as_is", json!(true));
    assert!(wizard.hidden_fields().contains(&"warranty_text".to_string()));

    // the hidden field still sits in the denominator, so completion moved
    // only by the one field just filled
    let per_field = 100.0 / wizard.strategy().field_count() as f64;
    let after = wizard.completion_percentage();
    assert!((after - before - per_field).abs() < 1e-9);
}

#[test]
fn strategy_is_shared_read_only_between_sessions() {
    let catalog = StrategyCatalog::new();
    library::register_builtins(&catalog).unwrap();
    let strategy = catalog
        .resolve(&StrategyKey::new("vehicle-bill-of-sale", "US"))
        .unwrap();

    let mut first = FormWizard::new(Arc::clone(&strategy));
    let second = FormWizard::new(strategy);

    first.update_form_data("seller_name", json!("only in the first session"));
    assert!(second.form_data().is_empty());
    assert_eq!(second.completion_percentage(), 0.0);
}
