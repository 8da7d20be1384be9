//! Vehicle bill of sale strategies for the United States.
//!
//! One generic custom-template strategy covers every state; states with a
//! mandatory official DMV form get their own official-form strategy layered
//! on top of the shared question flow.

use std::collections::HashMap;

use chrono::Datelike;

use crate::engine::model::{
    Compliance, ConditionalLogic, DocumentStrategy, FieldCondition, FieldMapping, FieldOption,
    FieldType, FieldValidation, FormSection, FormType, LocalizedText, Monetization, PaymentTiming,
    PriceComponent, Pricing, QuestionField, SpecialRequirement, TrialMode,
};

const DOCUMENT_TYPE: &str = "vehicle-bill-of-sale";

#[rustfmt::skip]
const STATE_NAMES: &[(&str, &str, &str)] = &[
    ("AL", "Alabama", "Alabama"), ("AK", "Alaska", "Alaska"),
    ("AZ", "Arizona", "Arizona"), ("AR", "Arkansas", "Arkansas"),
    ("CA", "California", "California"), ("CO", "Colorado", "Colorado"),
    ("CT", "Connecticut", "Connecticut"), ("DE", "Delaware", "Delaware"),
    ("FL", "Florida", "Florida"), ("GA", "Georgia", "Georgia"),
    ("HI", "Hawaii", "Hawái"), ("ID", "Idaho", "Idaho"),
    ("IL", "Illinois", "Illinois"), ("IN", "Indiana", "Indiana"),
    ("IA", "Iowa", "Iowa"), ("KS", "Kansas", "Kansas"),
    ("KY", "Kentucky", "Kentucky"), ("LA", "Louisiana", "Luisiana"),
    ("ME", "Maine", "Maine"), ("MD", "Maryland", "Maryland"),
    ("MA", "Massachusetts", "Massachusetts"), ("MI", "Michigan", "Míchigan"),
    ("MN", "Minnesota", "Minnesota"), ("MS", "Mississippi", "Misisipi"),
    ("MO", "Missouri", "Misuri"), ("MT", "Montana", "Montana"),
    ("NE", "Nebraska", "Nebraska"), ("NV", "Nevada", "Nevada"),
    ("NH", "New Hampshire", "Nuevo Hampshire"), ("NJ", "New Jersey", "Nueva Jersey"),
    ("NM", "New Mexico", "Nuevo México"), ("NY", "New York", "Nueva York"),
    ("NC", "North Carolina", "Carolina del Norte"), ("ND", "North Dakota", "Dakota del Norte"),
    ("OH", "Ohio", "Ohio"), ("OK", "Oklahoma", "Oklahoma"),
    ("OR", "Oregon", "Oregón"), ("PA", "Pennsylvania", "Pensilvania"),
    ("RI", "Rhode Island", "Rhode Island"), ("SC", "South Carolina", "Carolina del Sur"),
    ("SD", "South Dakota", "Dakota del Sur"), ("TN", "Tennessee", "Tennessee"),
    ("TX", "Texas", "Texas"), ("UT", "Utah", "Utah"),
    ("VT", "Vermont", "Vermont"), ("VA", "Virginia", "Virginia"),
    ("WA", "Washington", "Washington"), ("WV", "West Virginia", "Virginia Occidental"),
    ("WI", "Wisconsin", "Wisconsin"), ("WY", "Wyoming", "Wyoming"),
];

/// States whose DMV mandates an official bill of sale form, with the form
/// number used in the asset path.
const OFFICIAL_FORM_STATES: &[(&str, &str)] = &[
    ("AL", "MVT-32-13B"),
    ("CO", "DR-2116"),
    ("FL", "HSMV-82050"),
    ("GA", "T-7"),
    ("ID", "ITD-3738"),
    ("KS", "TR-312"),
    ("MD", "VR-181"),
    ("MT", "MV-24"),
    ("ND", "SFN-2888"),
    ("WV", "DMV-7-TR"),
];

pub fn strategies() -> Vec<DocumentStrategy> {
    let mut all = vec![generic_us()];
    for (state, form_number) in OFFICIAL_FORM_STATES {
        all.push(official_state(state, form_number));
    }
    all
}

/// Custom-template strategy used by every state without an official form.
fn generic_us() -> DocumentStrategy {
    DocumentStrategy {
        id: format!("{DOCUMENT_TYPE}-us-generic-en"),
        document_type: DOCUMENT_TYPE.to_string(),
        jurisdiction: "US".to_string(),
        sub_jurisdiction: None,
        language: Some("en".to_string()),
        form_type: FormType::CustomTemplate,
        template_path: Some("/templates/en/vehicle-bill-of-sale.md".to_string()),
        official_form_path: None,
        question_flow: base_flow(),
        field_mappings: HashMap::new(),
        pricing: Pricing {
            base_price: 14.95,
            currency: "USD".to_string(),
            price_breakdown: vec![
                price_component(
                    "custom_template",
                    10.95,
                    "Professional Vehicle Bill of Sale Template",
                    "Plantilla Profesional de Contrato de Compraventa de Vehículo",
                ),
                price_component(
                    "smart_completion",
                    4.00,
                    "Smart Form Completion & Legal Validation",
                    "Completado Inteligente y Validación Legal",
                ),
            ],
        },
        compliance: Compliance::default(),
        monetization: standard_monetization(),
    }
}

/// Official-form strategy for one state, overlaying the state's DMV form.
fn official_state(state: &str, form_number: &str) -> DocumentStrategy {
    let mut flow = base_flow();
    flow.push(odometer_disclosure_section(flow.len() as u32 + 1));
    flow.push(notary_acknowledgment_section(flow.len() as u32 + 1));

    DocumentStrategy {
        id: format!("{DOCUMENT_TYPE}-us-{}-en", state.to_lowercase()),
        document_type: DOCUMENT_TYPE.to_string(),
        jurisdiction: "US".to_string(),
        sub_jurisdiction: Some(state.to_string()),
        language: Some("en".to_string()),
        form_type: FormType::OfficialForm,
        template_path: Some("/templates/en/vehicle-bill-of-sale.md".to_string()),
        official_form_path: Some(format!(
            "/forms/{DOCUMENT_TYPE}/{}/{form_number}.pdf",
            state.to_lowercase()
        )),
        question_flow: flow,
        field_mappings: official_field_mappings(),
        pricing: Pricing {
            base_price: 19.95,
            currency: "USD".to_string(),
            price_breakdown: vec![
                price_component(
                    "official_form",
                    15.95,
                    &format!("{form_number} Official State Form"),
                    &format!("Formulario Oficial {form_number} del Estado"),
                ),
                price_component(
                    "smart_completion",
                    4.00,
                    "Smart Form Completion & Validation",
                    "Completado Inteligente y Validación del Formulario",
                ),
            ],
        },
        compliance: Compliance {
            requires_notary: true,
            requires_witness: false,
            requires_recording: false,
            special_requirements: vec![SpecialRequirement {
                kind: "odometer_disclosure".to_string(),
                description: LocalizedText::en_es(
                    "Federal and state law requires accurate odometer disclosure",
                    "La ley federal y estatal requiere declaración precisa del odómetro",
                ),
            }],
        },
        monetization: standard_monetization(),
    }
}

fn official_field_mappings() -> HashMap<String, FieldMapping> {
    let mut mappings = HashMap::new();
    let direct = [
        ("year", "year_field"),
        ("make", "make_field"),
        ("model", "model_field"),
        ("odometer", "odometer_field"),
        ("seller_name", "seller_name_field"),
        ("seller_address", "seller_address_field"),
        ("buyer_name", "buyer_name_field"),
        ("buyer_address", "buyer_address_field"),
    ];
    for (field, pdf_field) in direct {
        mappings.insert(field.to_string(), mapping(pdf_field, None));
    }
    mappings.insert("vin".to_string(), mapping("vin_field", Some("uppercase")));
    mappings.insert(
        "price".to_string(),
        mapping("sale_price_field", Some("currency_usd")),
    );
    mappings.insert(
        "sale_date".to_string(),
        mapping("sale_date_field", Some("date_us")),
    );
    mappings
}

fn base_flow() -> Vec<FormSection> {
    vec![
        FormSection {
            id: "jurisdiction_selection".to_string(),
            title: LocalizedText::en_es(
                "Location & Legal Requirements",
                "Ubicación y Requisitos Legales",
            ),
            description: Some(LocalizedText::en_es(
                "Select your state to ensure compliance with local laws",
                "Selecciona tu estado para cumplir con las leyes locales",
            )),
            order: 1,
            icon: Some("MapPin".to_string()),
            fields: vec![QuestionField {
                id: "state".to_string(),
                field_type: FieldType::Select,
                label: LocalizedText::en_es(
                    "State of Sale (Governing Law & Notary)",
                    "Estado de Venta (Ley Aplicable y Notario)",
                ),
                placeholder: None,
                required: true,
                validation: None,
                options: Some(state_options()),
                conditional_logic: None,
            }],
        },
        FormSection {
            id: "vehicle_information".to_string(),
            title: LocalizedText::en_es("Vehicle Information", "Información del Vehículo"),
            description: None,
            order: 2,
            icon: Some("Car".to_string()),
            fields: vec![
                QuestionField {
                    id: "year".to_string(),
                    field_type: FieldType::Number,
                    label: LocalizedText::en_es("Year", "Año"),
                    placeholder: None,
                    required: true,
                    validation: Some(FieldValidation {
                        min: Some(1900.0),
                        max: Some((chrono::Utc::now().year() + 1) as f64),
                        ..Default::default()
                    }),
                    options: None,
                    conditional_logic: None,
                },
                text_field("make", "Make", "Marca", true),
                text_field("model", "Model", "Modelo", true),
                QuestionField {
                    id: "vin".to_string(),
                    field_type: FieldType::Text,
                    label: LocalizedText::en_es(
                        "VIN (Vehicle Identification Number)",
                        "VIN (Número de Identificación del Vehículo)",
                    ),
                    placeholder: None,
                    required: true,
                    validation: Some(FieldValidation {
                        pattern: Some("^[A-HJ-NPR-Z0-9]{17}$".to_string()),
                        ..Default::default()
                    }),
                    options: None,
                    conditional_logic: None,
                },
                QuestionField {
                    id: "odometer".to_string(),
                    field_type: FieldType::Number,
                    label: LocalizedText::en_es(
                        "Odometer Reading (Miles)",
                        "Lectura del Odómetro (Millas)",
                    ),
                    placeholder: None,
                    required: true,
                    validation: Some(FieldValidation {
                        min: Some(0.0),
                        ..Default::default()
                    }),
                    options: None,
                    conditional_logic: None,
                },
            ],
        },
        party_section(
            "seller_information",
            "Seller Information",
            "Información del Vendedor",
            3,
            "UserCheck",
            "seller",
        ),
        party_section(
            "buyer_information",
            "Buyer Information",
            "Información del Comprador",
            4,
            "UserPlus",
            "buyer",
        ),
        FormSection {
            id: "transaction_details".to_string(),
            title: LocalizedText::en_es("Sale Details", "Detalles de la Venta"),
            description: None,
            order: 5,
            icon: Some("DollarSign".to_string()),
            fields: vec![
                QuestionField {
                    id: "price".to_string(),
                    field_type: FieldType::Number,
                    label: LocalizedText::en_es("Sale Price ($)", "Precio de Venta ($)"),
                    placeholder: None,
                    required: true,
                    validation: Some(FieldValidation {
                        min: Some(0.0),
                        ..Default::default()
                    }),
                    options: None,
                    conditional_logic: None,
                },
                QuestionField {
                    id: "sale_date".to_string(),
                    field_type: FieldType::Date,
                    label: LocalizedText::en_es("Date of Sale", "Fecha de Venta"),
                    placeholder: None,
                    required: true,
                    validation: None,
                    options: None,
                    conditional_logic: None,
                },
                QuestionField {
                    id: "payment_method".to_string(),
                    field_type: FieldType::Select,
                    label: LocalizedText::en_es("Payment Method", "Método de Pago"),
                    placeholder: None,
                    required: false,
                    validation: None,
                    options: Some(vec![
                        option("cash", "Cash", "Efectivo"),
                        option("check", "Check", "Cheque"),
                        option("wire", "Wire Transfer", "Transferencia bancaria"),
                        option("credit_card", "Credit or Debit Card", "Tarjeta de crédito o débito"),
                    ]),
                    conditional_logic: None,
                },
                QuestionField {
                    id: "existing_liens".to_string(),
                    field_type: FieldType::Textarea,
                    label: LocalizedText::en_es(
                        "Existing Liens or Encumbrances",
                        "Gravámenes o cargas existentes",
                    ),
                    placeholder: Some(LocalizedText::en_es(
                        "e.g., None or Loan with XYZ Bank",
                        "ej., Ninguno o Préstamo con Banco XYZ",
                    )),
                    required: false,
                    validation: None,
                    options: None,
                    conditional_logic: None,
                },
            ],
        },
        FormSection {
            id: "condition_and_warranty".to_string(),
            title: LocalizedText::en_es("Condition and Warranty", "Condición y Garantía"),
            description: None,
            order: 6,
            icon: Some("ShieldCheck".to_string()),
            fields: vec![
                QuestionField {
                    id: "as_is".to_string(),
                    field_type: FieldType::Checkbox,
                    label: LocalizedText::en_es(
                        "Vehicle is sold as-is (no warranties)",
                        "Vehículo vendido en el estado en que se encuentra (sin garantías)",
                    ),
                    placeholder: None,
                    required: false,
                    validation: None,
                    options: None,
                    conditional_logic: None,
                },
                QuestionField {
                    id: "warranty_text".to_string(),
                    field_type: FieldType::Textarea,
                    label: LocalizedText::en_es(
                        "Warranty Details (if provided)",
                        "Detalles de garantía (si aplica)",
                    ),
                    placeholder: Some(LocalizedText::en_es(
                        "Describe any warranty coverage or limitations",
                        "Describa la cobertura o límites de la garantía",
                    )),
                    required: false,
                    validation: None,
                    options: None,
                    conditional_logic: Some(ConditionalLogic {
                        show_if: FieldCondition {
                            field: "as_is".to_string(),
                            value: serde_json::Value::Bool(false),
                        },
                    }),
                },
            ],
        },
        FormSection {
            id: "notary_details".to_string(),
            title: LocalizedText::en_es("Notary Details", "Detalles de notario"),
            description: None,
            order: 7,
            icon: Some("Feather".to_string()),
            fields: vec![text_field(
                "county",
                "County for notarization",
                "Condado para notarización",
                false,
            )],
        },
    ]
}

fn odometer_disclosure_section(order: u32) -> FormSection {
    FormSection {
        id: "odometer_disclosure".to_string(),
        title: LocalizedText::en_es(
            "Odometer Disclosure (Required by State Law)",
            "Declaración del Odómetro (Requerido por la Ley Estatal)",
        ),
        description: None,
        order,
        icon: Some("Gauge".to_string()),
        fields: vec![
            QuestionField {
                id: "odometer_accurate".to_string(),
                field_type: FieldType::Checkbox,
                label: LocalizedText::en_es(
                    "I certify that the odometer reading is accurate",
                    "Certifico que la lectura del odómetro es precisa",
                ),
                placeholder: None,
                required: true,
                validation: None,
                options: None,
                conditional_logic: None,
            },
            QuestionField {
                id: "odometer_discrepancy".to_string(),
                field_type: FieldType::Select,
                label: LocalizedText::en_es("Odometer Status", "Estado del Odómetro"),
                placeholder: None,
                required: true,
                validation: None,
                options: Some(vec![
                    option("actual", "Actual mileage", "Millaje real"),
                    option("not_actual", "NOT actual mileage", "NO es millaje real"),
                    option(
                        "exceeds_limit",
                        "Exceeds mechanical limits",
                        "Excede límites mecánicos",
                    ),
                ]),
                conditional_logic: None,
            },
        ],
    }
}

fn notary_acknowledgment_section(order: u32) -> FormSection {
    FormSection {
        id: "notary_acknowledgment".to_string(),
        title: LocalizedText::en_es(
            "Notary Acknowledgment",
            "Reconocimiento Notarial",
        ),
        description: None,
        order,
        icon: Some("Shield".to_string()),
        fields: vec![QuestionField {
            id: "notary_required".to_string(),
            field_type: FieldType::Checkbox,
            label: LocalizedText::en_es(
                "I understand this document must be notarized to be valid in this state",
                "Entiendo que este documento debe ser notarizado para ser válido en este estado",
            ),
            placeholder: None,
            required: true,
            validation: None,
            options: None,
            conditional_logic: None,
        }],
    }
}

fn party_section(
    id: &str,
    title_en: &str,
    title_es: &str,
    order: u32,
    icon: &str,
    prefix: &str,
) -> FormSection {
    FormSection {
        id: id.to_string(),
        title: LocalizedText::en_es(title_en, title_es),
        description: None,
        order,
        icon: Some(icon.to_string()),
        fields: vec![
            text_field(
                &format!("{prefix}_name"),
                "Full Legal Name",
                "Nombre Legal Completo",
                true,
            ),
            QuestionField {
                id: format!("{prefix}_address"),
                field_type: FieldType::Textarea,
                label: LocalizedText::en_es("Complete Address", "Dirección Completa"),
                placeholder: None,
                required: true,
                validation: None,
                options: None,
                conditional_logic: None,
            },
            QuestionField {
                id: format!("{prefix}_phone"),
                field_type: FieldType::Phone,
                label: LocalizedText::en_es("Phone Number", "Número de Teléfono"),
                placeholder: None,
                required: false,
                validation: None,
                options: None,
                conditional_logic: None,
            },
        ],
    }
}

fn state_options() -> Vec<FieldOption> {
    STATE_NAMES
        .iter()
        .map(|(code, en, es)| option(code, en, es))
        .collect()
}

fn standard_monetization() -> Monetization {
    Monetization {
        allow_preview: true,
        preview_limitations: vec![
            "watermark_overlay".to_string(),
            "no_download_until_payment".to_string(),
        ],
        payment_required: PaymentTiming::BeforeDownload,
        trial_mode: Some(TrialMode {
            allowed_actions: vec![
                "preview".to_string(),
                "form_completion".to_string(),
                "validation".to_string(),
            ],
            limitations: vec![
                "no_download".to_string(),
                "watermarked_preview".to_string(),
            ],
        }),
    }
}

fn text_field(id: &str, label_en: &str, label_es: &str, required: bool) -> QuestionField {
    QuestionField {
        id: id.to_string(),
        field_type: FieldType::Text,
        label: LocalizedText::en_es(label_en, label_es),
        placeholder: None,
        required,
        validation: None,
        options: None,
        conditional_logic: None,
    }
}

fn option(value: &str, label_en: &str, label_es: &str) -> FieldOption {
    FieldOption {
        value: value.to_string(),
        label: LocalizedText::en_es(label_en, label_es),
    }
}

fn mapping(pdf_field: &str, transform: Option<&str>) -> FieldMapping {
    FieldMapping {
        pdf_field: pdf_field.to_string(),
        transform: transform.map(str::to_string),
    }
}

fn price_component(component: &str, price: f64, en: &str, es: &str) -> PriceComponent {
    PriceComponent {
        component: component.to_string(),
        price,
        description: LocalizedText::en_es(en, es),
    }
}
