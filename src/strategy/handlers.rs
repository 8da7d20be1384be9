use actix_web::{web, HttpResponse, Responder};

use crate::engine::flow::adapt_question_flow;
use crate::engine::model::{DocumentStrategy, StrategyKey};
use crate::state::AppState;
use crate::ErrorResponse;

use super::models::{QuestionFlowResponse, StrategySummary};

#[utoipa::path(
    context_path = "/api",
    tag = "Strategy Catalog",
    get,
    path = "/strategies",
    responses(
        (status = 200, description = "Summaries of all registered strategies", body = [StrategySummary])
    )
)]
pub async fn get_all_strategies(data: web::Data<AppState>) -> impl Responder {
    let mut summaries: Vec<StrategySummary> = data
        .catalog
        .all()
        .iter()
        .map(|s| StrategySummary::from(s.as_ref()))
        .collect();
    summaries.sort_by(|a, b| a.id.cmp(&b.id));
    HttpResponse::Ok().json(summaries)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Strategy Catalog",
    post,
    path = "/strategies",
    request_body = DocumentStrategy,
    responses(
        (status = 201, description = "Strategy registered", body = StrategySummary),
        (status = 400, description = "Strategy data rejected", body = ErrorResponse)
    )
)]
pub async fn register_strategy(
    req: web::Json<DocumentStrategy>,
    data: web::Data<AppState>,
) -> impl Responder {
    match data.catalog.register(req.into_inner()) {
        Ok(strategy) => {
            HttpResponse::Created().json(StrategySummary::from(strategy.as_ref()))
        }
        Err(err) => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string())),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Strategy Catalog",
    post,
    path = "/strategies/resolve",
    request_body = StrategyKey,
    responses(
        (status = 200, description = "Best-matching strategy for the key", body = StrategySummary),
        (status = 404, description = "No strategy available", body = ErrorResponse)
    )
)]
pub async fn resolve_strategy(
    req: web::Json<StrategyKey>,
    data: web::Data<AppState>,
) -> impl Responder {
    match data.catalog.resolve(&req) {
        Ok(strategy) => HttpResponse::Ok().json(StrategySummary::from(strategy.as_ref())),
        Err(err) => HttpResponse::NotFound().json(ErrorResponse::not_found(&err.to_string())),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Strategy Catalog",
    post,
    path = "/strategies/flow",
    request_body = StrategyKey,
    responses(
        (status = 200, description = "Adapted section order for the resolved strategy", body = QuestionFlowResponse),
        (status = 404, description = "No strategy available", body = ErrorResponse)
    )
)]
pub async fn get_question_flow(
    req: web::Json<StrategyKey>,
    data: web::Data<AppState>,
) -> impl Responder {
    match data.catalog.resolve(&req) {
        Ok(strategy) => HttpResponse::Ok().json(QuestionFlowResponse {
            strategy_id: strategy.id.clone(),
            sections: adapt_question_flow(&strategy),
        }),
        Err(err) => HttpResponse::NotFound().json(ErrorResponse::not_found(&err.to_string())),
    }
}
