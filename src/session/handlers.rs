use actix_web::{
    web::{self, Path},
    HttpResponse, Responder,
};
use uuid::Uuid;

use crate::engine::dispatcher::{GenerateError, GenerationOutcome};
use crate::engine::model::StrategyKey;
use crate::engine::validation::summarize;
use crate::engine::FormWizard;
use crate::metrics::record_outcome;
use crate::state::{AppState, WizardSession};
use crate::strategy::models::StrategySummary;
use crate::ErrorResponse;

use super::models::{
    FieldUpdateRequest, NavigationResponse, PaymentConfirmationRequest, ProgressResponse,
    SectionValidationResponse, SessionSnapshot, StartSessionResponse, ValidationFailureResponse,
};

#[utoipa::path(
    context_path = "/api",
    tag = "Wizard Service",
    post,
    path = "/sessions",
    request_body = StrategyKey,
    responses(
        (status = 201, description = "Session started", body = StartSessionResponse),
        (status = 404, description = "No strategy available for the key", body = ErrorResponse)
    )
)]
pub async fn start_session(
    req: web::Json<StrategyKey>,
    data: web::Data<AppState>,
) -> impl Responder {
    let strategy = match data.catalog.resolve(&req) {
        Ok(strategy) => strategy,
        Err(err) => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found(&err.to_string()))
        }
    };

    let wizard = FormWizard::new(strategy);
    let summary = StrategySummary::from(wizard.strategy().as_ref());
    let sections = wizard.sections().to_vec();
    let session_id = data.sessions.insert(WizardSession::new(wizard));

    HttpResponse::Created().json(StartSessionResponse {
        session_id,
        strategy: summary,
        sections,
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Wizard Service",
    get,
    path = "/sessions/{id}",
    responses(
        (status = 200, description = "Current session state", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session id"))
)]
pub async fn get_session(id: Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    let id = id.into_inner();
    match data.sessions.get(&id) {
        Some(session) => HttpResponse::Ok().json(SessionSnapshot::of(id, &session.lock())),
        None => session_not_found(),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Wizard Service",
    delete,
    path = "/sessions/{id}",
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session id"))
)]
pub async fn delete_session(id: Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    if data.sessions.remove(&id.into_inner()) {
        HttpResponse::NoContent().finish()
    } else {
        session_not_found()
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Wizard Service",
    put,
    path = "/sessions/{id}/fields",
    request_body = FieldUpdateRequest,
    responses(
        (status = 200, description = "Progress after the edit", body = ProgressResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session id"))
)]
pub async fn update_field(
    id: Path<Uuid>,
    req: web::Json<FieldUpdateRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let Some(session) = data.sessions.get(&id.into_inner()) else {
        return session_not_found();
    };
    let mut session = session.lock();
    let req = req.into_inner();
    session.wizard.update_form_data(req.field_id, req.value);

    HttpResponse::Ok().json(ProgressResponse {
        completion_percentage: session.wizard.completion_percentage(),
        validation_errors: session.wizard.validation_errors().to_vec(),
        is_complete: session.wizard.is_complete(),
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Wizard Service",
    post,
    path = "/sessions/{id}/next",
    responses(
        (status = 200, description = "Cursor after advancing", body = NavigationResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session id"))
)]
pub async fn next_section(id: Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    navigate(id.into_inner(), data, |wizard| wizard.next_section())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Wizard Service",
    post,
    path = "/sessions/{id}/previous",
    responses(
        (status = 200, description = "Cursor after retreating", body = NavigationResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session id"))
)]
pub async fn previous_section(id: Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    navigate(id.into_inner(), data, |wizard| wizard.previous_section())
}

fn navigate(
    id: Uuid,
    data: web::Data<AppState>,
    step: impl FnOnce(&mut FormWizard) -> bool,
) -> HttpResponse {
    let Some(session) = data.sessions.get(&id) else {
        return session_not_found();
    };
    let mut session = session.lock();
    let moved = step(&mut session.wizard);

    HttpResponse::Ok().json(NavigationResponse {
        current_section: session.wizard.current_section(),
        section_id: session.wizard.current_section_data().map(|s| s.id.clone()),
        moved,
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Wizard Service",
    post,
    path = "/sessions/{id}/validate",
    responses(
        (status = 200, description = "Whether the current section's required fields are filled", body = SectionValidationResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session id"))
)]
pub async fn validate_section(id: Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    let Some(session) = data.sessions.get(&id.into_inner()) else {
        return session_not_found();
    };
    let session = session.lock();

    HttpResponse::Ok().json(SectionValidationResponse {
        current_section: session.wizard.current_section(),
        section_id: session.wizard.current_section_data().map(|s| s.id.clone()),
        valid: session.wizard.validate_current_section(),
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Wizard Service",
    post,
    path = "/sessions/{id}/payment",
    request_body = PaymentConfirmationRequest,
    responses(
        (status = 200, description = "Session state after recording the signal", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session id"))
)]
pub async fn confirm_payment(
    id: Path<Uuid>,
    req: web::Json<PaymentConfirmationRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let id = id.into_inner();
    let Some(session) = data.sessions.get(&id) else {
        return session_not_found();
    };
    let mut session = session.lock();
    session.payment_confirmed = req.confirmed;

    HttpResponse::Ok().json(SessionSnapshot::of(id, &session))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Wizard Service",
    post,
    path = "/sessions/{id}/generate",
    responses(
        (status = 200, description = "Generated document bytes", content_type = "application/pdf", body = Vec<u8>),
        (status = 402, description = "Payment required before download", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 422, description = "Required fields missing", body = ValidationFailureResponse),
        (status = 502, description = "Asset or renderer collaborator failed", body = ErrorResponse),
        (status = 500, description = "Strategy configuration defect", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session id"))
)]
pub async fn generate_document(id: Path<Uuid>, data: web::Data<AppState>) -> impl Responder {
    let Some(session) = data.sessions.get(&id.into_inner()) else {
        return session_not_found();
    };

    // Snapshot what generation needs and release the session lock before
    // awaiting on renderer I/O.
    let (strategy, form_data, payment_confirmed) = {
        let session = session.lock();
        (
            session.wizard.strategy().clone(),
            session.wizard.form_data().clone(),
            session.payment_confirmed,
        )
    };

    match data
        .dispatcher
        .generate(&strategy, &form_data, payment_confirmed)
        .await
    {
        Ok(GenerationOutcome::Document(document)) => {
            record_outcome("document");
            HttpResponse::Ok()
                .content_type(document.media_type.clone())
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", document.filename),
                ))
                .body(document.bytes)
        }
        Ok(GenerationOutcome::PaymentRequired) => {
            record_outcome("payment_required");
            HttpResponse::PaymentRequired().json(ErrorResponse::new(
                "PaymentRequired",
                "Payment must be completed before this document can be generated",
            ))
        }
        Err(GenerateError::Validation(fields)) => {
            record_outcome("validation_failed");
            let message = summarize(&fields);
            HttpResponse::UnprocessableEntity()
                .json(ValidationFailureResponse::new(message, fields))
        }
        Err(err @ GenerateError::AssetUnavailable { .. }) => {
            record_outcome("asset_unavailable");
            log::error!("generation failed for '{}': {err}", strategy.id);
            HttpResponse::BadGateway().json(ErrorResponse::new("AssetUnavailable", &err.to_string()))
        }
        Err(err @ GenerateError::Render(_)) => {
            record_outcome("render_failed");
            log::error!("generation failed for '{}': {err}", strategy.id);
            HttpResponse::BadGateway().json(ErrorResponse::new("RenderFailed", &err.to_string()))
        }
        Err(err) => {
            // Transform failures and missing paths are strategy defects;
            // fail loudly instead of folding them into user-facing errors.
            record_outcome(match &err {
                GenerateError::Transform(_) => "transform_failed",
                _ => "strategy_misconfigured",
            });
            log::error!("strategy defect in '{}': {err}", strategy.id);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&err.to_string()))
        }
    }
}

fn session_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found("Session not found or expired"))
}
