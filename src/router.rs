use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::actor::require_registrar;
use crate::modules::curricula::router::{
    init_courses_router, init_curricula_router, init_programs_router,
};
use crate::modules::enrollments::router::{
    init_enrollment_decisions_router, init_enrollments_router,
};
use crate::modules::offerings::router::{init_offerings_router, init_sections_router};
use crate::modules::schedules::router::init_section_schedules_router;
use crate::modules::terms::router::init_terms_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest(
                    "/users",
                    init_users_router().route_layer(middleware::from_fn(require_registrar)),
                )
                .nest(
                    "/terms",
                    init_terms_router().route_layer(middleware::from_fn(require_registrar)),
                )
                .nest(
                    "/programs",
                    init_programs_router().route_layer(middleware::from_fn(require_registrar)),
                )
                .nest(
                    "/courses",
                    init_courses_router().route_layer(middleware::from_fn(require_registrar)),
                )
                .nest(
                    "/curricula",
                    init_curricula_router().route_layer(middleware::from_fn(require_registrar)),
                )
                .nest(
                    "/offerings",
                    init_offerings_router().route_layer(middleware::from_fn(require_registrar)),
                )
                .nest(
                    "/sections",
                    init_sections_router()
                        .merge(init_section_schedules_router())
                        .route_layer(middleware::from_fn(require_registrar)),
                )
                // Students hit the enrollment endpoints themselves; the
                // handlers still require a valid acting identity. Deciding
                // enrollments stays registrar-only.
                .nest(
                    "/enrollments",
                    init_enrollments_router().merge(
                        init_enrollment_decisions_router()
                            .route_layer(middleware::from_fn(require_registrar)),
                    ),
                ),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                    HeaderName::from_static("x-acting-user"),
                    HeaderName::from_static("x-acting-role"),
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
