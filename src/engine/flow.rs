//! Question flow adapter.
//!
//! Reorders a strategy's sections for presentation. Official forms follow a
//! per-sub-jurisdiction preferred section order (matching the scanned form's
//! field layout); custom templates sort by their own `order` attribute;
//! hybrid strategies sort first and then apply the official reordering when
//! an official form asset is configured, so the reordering composes and is
//! idempotent. Every section in the input appears exactly once in the output.

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::model::{DocumentStrategy, FormSection, FormType};

lazy_static! {
    /// Preferred section-id order per sub-jurisdiction, matching the layout
    /// of that region's official form. Adding a region here never affects
    /// any other region.
    static ref OFFICIAL_FORM_SECTION_ORDER: HashMap<&'static str, &'static [&'static str]> = {
        let mut orders: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        // Florida HSMV-82050
        orders.insert("FL", &[
            "vehicle_information",
            "seller_information",
            "buyer_information",
            "transaction_details",
            "odometer_disclosure",
            "notary_acknowledgment",
        ]);
        // California REG-135, smog certification ahead of odometer
        orders.insert("CA", &[
            "vehicle_information",
            "seller_information",
            "buyer_information",
            "transaction_details",
            "smog_certification",
            "odometer_disclosure",
        ]);
        // Texas, lien details last
        orders.insert("TX", &[
            "vehicle_information",
            "seller_information",
            "buyer_information",
            "transaction_details",
            "odometer_disclosure",
            "lien_information",
        ]);
        orders
    };
}

/// Produce the authoritative, ordered section list for a strategy.
pub fn adapt_question_flow(strategy: &DocumentStrategy) -> Vec<FormSection> {
    match strategy.form_type {
        FormType::OfficialForm => reorder_for_official_form(
            strategy.question_flow.clone(),
            strategy.sub_jurisdiction.as_deref(),
        ),
        FormType::CustomTemplate => sort_by_order(strategy.question_flow.clone()),
        FormType::Hybrid => {
            let sorted = sort_by_order(strategy.question_flow.clone());
            if strategy.official_form_path.is_some() {
                reorder_for_official_form(sorted, strategy.sub_jurisdiction.as_deref())
            } else {
                sorted
            }
        }
    }
}

fn sort_by_order(mut sections: Vec<FormSection>) -> Vec<FormSection> {
    sections.sort_by_key(|s| s.order);
    sections
}

/// Sections named in the region's preferred order come first, in that order;
/// everything else is appended in its original relative order. All emitted
/// sections are renumbered sequentially.
fn reorder_for_official_form(
    sections: Vec<FormSection>,
    sub_jurisdiction: Option<&str>,
) -> Vec<FormSection> {
    let preferred = match sub_jurisdiction.and_then(|s| OFFICIAL_FORM_SECTION_ORDER.get(s)) {
        Some(order) => *order,
        None => return sections,
    };

    let mut remaining: Vec<Option<FormSection>> = sections.into_iter().map(Some).collect();
    let mut reordered = Vec::with_capacity(remaining.len());

    for id in preferred {
        if let Some(slot) = remaining
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|s| s.id == *id))
        {
            reordered.push(slot.take().expect("slot checked above"));
        }
    }
    reordered.extend(remaining.into_iter().flatten());

    for (index, section) in reordered.iter_mut().enumerate() {
        section.order = index as u32 + 1;
    }
    reordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::LocalizedText;

    fn section(id: &str, order: u32) -> FormSection {
        FormSection {
            id: id.to_string(),
            title: LocalizedText::en(id),
            description: None,
            order,
            icon: None,
            fields: Vec::new(),
        }
    }

    fn ids(sections: &[FormSection]) -> Vec<&str> {
        sections.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_custom_template_sorts_by_order_attribute() {
        let sections = vec![section("a", 2), section("b", 1)];
        let sorted = sort_by_order(sections);
        assert_eq!(ids(&sorted), vec!["b", "a"]);
    }

    #[test]
    fn test_official_reorder_preserves_the_section_set() {
        let sections = vec![
            section("notary_acknowledgment", 1),
            section("vehicle_information", 2),
            section("custom_extra", 3),
            section("seller_information", 4),
        ];
        let reordered = reorder_for_official_form(sections, Some("FL"));

        assert_eq!(
            ids(&reordered),
            vec![
                "vehicle_information",
                "seller_information",
                "notary_acknowledgment",
                "custom_extra",
            ]
        );
        // renumbered sequentially
        let orders: Vec<u32> = reordered.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_unknown_sub_jurisdiction_keeps_original_order() {
        let sections = vec![section("b", 2), section("a", 1)];
        let reordered = reorder_for_official_form(sections, Some("ZZ"));
        assert_eq!(ids(&reordered), vec!["b", "a"]);
    }

    #[test]
    fn test_official_reorder_is_idempotent() {
        let sections = vec![
            section("transaction_details", 1),
            section("vehicle_information", 2),
            section("buyer_information", 3),
        ];
        let once = reorder_for_official_form(sections, Some("TX"));
        let twice = reorder_for_official_form(once.clone(), Some("TX"));
        assert_eq!(ids(&once), ids(&twice));
    }
}
