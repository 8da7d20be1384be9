use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod assets;
pub mod engine;
pub mod library;
pub mod metrics;
pub mod render;
pub mod session;
pub mod state;
pub mod strategy;

pub use crate::state::AppState;

use crate::assets::{AssetLoader, HttpAssetLoader, StaticDirAssetLoader};
use crate::engine::{GenerationDispatcher, StrategyCatalog, TransformRegistry};
use crate::render::{HttpOverlayRenderer, HttpTemplateRenderer, RendererConfig};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Mount the `/api` surface. Shared by `run()` and the integration tests.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::resource("/strategies")
                    .route(web::get().to(strategy::handlers::get_all_strategies))
                    .route(web::post().to(strategy::handlers::register_strategy)),
            )
            .service(
                web::resource("/strategies/resolve")
                    .route(web::post().to(strategy::handlers::resolve_strategy)),
            )
            .service(
                web::resource("/strategies/flow")
                    .route(web::post().to(strategy::handlers::get_question_flow)),
            )
            .service(
                web::resource("/sessions").route(web::post().to(session::handlers::start_session)),
            )
            .service(
                web::resource("/sessions/{id}")
                    .route(web::get().to(session::handlers::get_session))
                    .route(web::delete().to(session::handlers::delete_session)),
            )
            .service(
                web::resource("/sessions/{id}/fields")
                    .route(web::put().to(session::handlers::update_field)),
            )
            .service(
                web::resource("/sessions/{id}/next")
                    .route(web::post().to(session::handlers::next_section)),
            )
            .service(
                web::resource("/sessions/{id}/previous")
                    .route(web::post().to(session::handlers::previous_section)),
            )
            .service(
                web::resource("/sessions/{id}/validate")
                    .route(web::post().to(session::handlers::validate_section)),
            )
            .service(
                web::resource("/sessions/{id}/payment")
                    .route(web::post().to(session::handlers::confirm_payment)),
            )
            .service(
                web::resource("/sessions/{id}/generate")
                    .route(web::post().to(session::handlers::generate_document)),
            ),
    );
}

pub async fn run() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::strategy::handlers::get_all_strategies,
            crate::strategy::handlers::register_strategy,
            crate::strategy::handlers::resolve_strategy,
            crate::strategy::handlers::get_question_flow,
            crate::session::handlers::start_session,
            crate::session::handlers::get_session,
            crate::session::handlers::delete_session,
            crate::session::handlers::update_field,
            crate::session::handlers::next_section,
            crate::session::handlers::previous_section,
            crate::session::handlers::validate_section,
            crate::session::handlers::confirm_payment,
            crate::session::handlers::generate_document
        ),
        components(
            schemas(
                engine::model::DocumentStrategy,
                engine::model::StrategyKey,
                engine::model::FormSection,
                engine::model::QuestionField,
                engine::model::FieldType,
                engine::model::FieldValidation,
                engine::model::FieldOption,
                engine::model::ConditionalLogic,
                engine::model::FieldCondition,
                engine::model::FieldMapping,
                engine::model::FormType,
                engine::model::Pricing,
                engine::model::PriceComponent,
                engine::model::Compliance,
                engine::model::SpecialRequirement,
                engine::model::Monetization,
                engine::model::PaymentTiming,
                engine::model::TrialMode,
                engine::model::LocalizedText,
                engine::validation::ValidationError,
                strategy::models::StrategySummary,
                strategy::models::QuestionFlowResponse,
                session::models::StartSessionResponse,
                session::models::SessionSnapshot,
                session::models::FieldUpdateRequest,
                session::models::ProgressResponse,
                session::models::NavigationResponse,
                session::models::SectionValidationResponse,
                session::models::PaymentConfirmationRequest,
                session::models::ValidationFailureResponse,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Strategy Catalog", description = "Strategy resolution and registration endpoints."),
            (name = "Wizard Service", description = "Wizard session and document generation endpoints.")
        ),
        servers(
            (url = "http://127.0.0.1:8080", description = "Localhost server")
        )
    )]
    struct ApiDoc;

    dotenvy::dotenv().ok(); // Load .env file

    let catalog = Arc::new(StrategyCatalog::new());
    match library::register_builtins(&catalog) {
        Ok(count) => log::info!("registered {count} builtin strategies"),
        Err(err) => {
            log::error!("builtin strategy registration failed: {err}");
            std::process::exit(1);
        }
    }
    if let Ok(dir) = std::env::var("STRATEGY_CONFIG_DIR") {
        match catalog.load_json_dir(Path::new(&dir)) {
            Ok(count) => log::info!("loaded {count} strategies from {dir}"),
            Err(err) => {
                log::error!("failed to load strategy config dir {dir}: {err:#}");
                std::process::exit(1);
            }
        }
    }

    let http_client = reqwest::Client::builder()
        .user_agent("legaldoc-server/0.4")
        .build()
        .expect("Failed to create reqwest client");

    let asset_loader: Arc<dyn AssetLoader> = match std::env::var("FORM_ASSETS_BASE_URL") {
        Ok(base_url) => Arc::new(HttpAssetLoader::new(base_url, http_client.clone())),
        Err(_) => Arc::new(StaticDirAssetLoader::from_env()),
    };

    let renderer_config = match RendererConfig::from_env() {
        Ok(config) => config,
        Err(_) => {
            log::error!(
                "OVERLAY_RENDERER_URL and TEMPLATE_RENDERER_URL must be set in .env or the environment"
            );
            std::process::exit(1);
        }
    };

    let dispatcher = Arc::new(GenerationDispatcher::new(
        Arc::new(TransformRegistry::with_builtins()),
        asset_loader,
        Arc::new(HttpOverlayRenderer::new(
            renderer_config.overlay_url,
            http_client.clone(),
        )),
        Arc::new(HttpTemplateRenderer::new(
            renderer_config.template_url,
            http_client,
        )),
    ));

    let app_state = web::Data::new(AppState::new(catalog, dispatcher));

    let prometheus = PrometheusMetricsBuilder::new("legaldoc_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    log::info!("Starting server at http://0.0.0.0:8080");

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .configure(configure_api)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .backlog(8192)
    .max_connections(25000)
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
